//! Active tab / URL tracking
//!
//! Decides whether a tab notification means the panel is now looking at a
//! different document. Fragment-only navigation (`#section` jumps) keeps the
//! current outline; anything else asks for a re-extraction.

use crate::host::{TabId, TabInfo};
use crate::page_url::{base_url, is_url_change};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackerState {
    /// No URL known yet (startup, or the active-tab query failed)
    #[default]
    Idle,
    Tracking { tab_id: TabId, url: String },
}

/// What the panel should do about a tab notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerDecision {
    Ignore,
    /// Clear the current result, then re-extract after the settle delay
    Resync,
}

#[derive(Debug, Clone, Default)]
pub struct TabTracker {
    state: TrackerState,
}

impl TabTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Full URL of the tracked tab, fragment included
    pub fn url(&self) -> Option<&str> {
        match &self.state {
            TrackerState::Tracking { url, .. } => Some(url),
            TrackerState::Idle => None,
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.url().map(base_url)
    }

    pub fn tab_id(&self) -> Option<&TabId> {
        match &self.state {
            TrackerState::Tracking { tab_id, .. } => Some(tab_id),
            TrackerState::Idle => None,
        }
    }

    /// Adopt the result of an active-tab query
    pub fn sync(&mut self, tab: &TabInfo) {
        match &tab.url {
            Some(url) => {
                self.state = TrackerState::Tracking { tab_id: tab.id.clone(), url: url.clone() };
            }
            None => {
                log::debug!("Active tab {} exposes no URL", tab.id);
                self.state = TrackerState::Idle;
            }
        }
    }

    /// Adopt an active-tab query only while nothing is tracked yet.
    ///
    /// Once tracking, the URL moves only on tab events, so a query that
    /// already sees the next document cannot hide its URL update.
    pub fn adopt_if_idle(&mut self, tab: &TabInfo) -> bool {
        if self.state != TrackerState::Idle {
            return false;
        }
        self.sync(tab);
        true
    }

    pub fn on_url_updated(&mut self, tab_id: &TabId, url: Option<&str>, active: bool) -> TrackerDecision {
        let Some(url) = url.filter(|_| active) else {
            return TrackerDecision::Ignore;
        };

        if let Some(current) = self.url() {
            if !is_url_change(current, url) {
                log::trace!("Fragment-only navigation to {}", url);
                self.state = TrackerState::Tracking { tab_id: tab_id.clone(), url: url.to_string() };
                return TrackerDecision::Ignore;
            }
        }

        log::debug!("URL changed to {}", url);
        self.state = TrackerState::Tracking { tab_id: tab_id.clone(), url: url.to_string() };
        TrackerDecision::Resync
    }

    /// A tab switch always means a different document instance
    pub fn on_tab_activated(&mut self, tab_id: &TabId, url: Option<&str>) -> TrackerDecision {
        log::debug!("Tab {} activated", tab_id);
        match url {
            Some(url) => {
                self.state = TrackerState::Tracking { tab_id: tab_id.clone(), url: url.to_string() };
            }
            None => {
                if let TrackerState::Tracking { tab_id: tracked, .. } = &mut self.state {
                    *tracked = tab_id.clone();
                }
            }
        }
        TrackerDecision::Resync
    }
}
