// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address bar and navigation port.

use url::Url;

/// What a page can do with its own address.
pub trait Navigator {
    /// The address the page was loaded from.
    fn current_url(&self) -> &Url;

    /// Swap the visible address for `path` on the same origin, dropping query
    /// and fragment. No history entry is added.
    fn replace_url(&mut self, path: &str);

    /// Full navigation to another address.
    fn navigate_to(&mut self, url: Url);
}

/// Navigator that records what the page asked for.
///
/// The HTTP host turns the recorded outcome into a redirect response; tests
/// inspect it directly.
#[derive(Debug, Clone)]
pub struct RecordingNavigator {
    current: Url,
    replaced: bool,
    navigation: Option<Url>,
}

impl RecordingNavigator {
    pub fn new(current: Url) -> Self {
        Self {
            current,
            replaced: false,
            navigation: None,
        }
    }

    /// Whether the address was rewritten in place.
    pub fn was_replaced(&self) -> bool {
        self.replaced
    }

    /// Pending full navigation, if one was issued.
    pub fn navigation(&self) -> Option<&Url> {
        self.navigation.as_ref()
    }
}

impl Navigator for RecordingNavigator {
    fn current_url(&self) -> &Url {
        &self.current
    }

    fn replace_url(&mut self, path: &str) {
        self.current.set_path(path);
        self.current.set_query(None);
        self.current.set_fragment(None);
        self.replaced = true;
    }

    fn navigate_to(&mut self, url: Url) {
        tracing::debug!(target_url = %url.origin().ascii_serialization(), "Navigating");
        self.navigation = Some(url);
    }
}
