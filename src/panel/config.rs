use crate::extract::ExtractOptions;
use crate::navigate::HighlightTiming;
use std::time::Duration;

/// Timing and extraction policy of a [`Panel`](crate::panel::Panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Pause between a navigation signal and the re-extraction
    pub settle_delay: Duration,

    /// Idle gap required after the last resize before re-extracting
    pub resize_debounce: Duration,

    /// Extra time the loading flag stays up after a manual refresh
    pub manual_refresh_hold: Duration,

    pub extract: ExtractOptions,

    pub highlight: HighlightTiming,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
            resize_debounce: Duration::from_millis(400),
            manual_refresh_hold: Duration::from_millis(500),
            extract: ExtractOptions::default(),
            highlight: HighlightTiming::default(),
        }
    }
}

impl PanelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn resize_debounce(mut self, delay: Duration) -> Self {
        self.resize_debounce = delay;
        self
    }

    pub fn manual_refresh_hold(mut self, hold: Duration) -> Self {
        self.manual_refresh_hold = hold;
        self
    }

    pub fn extract(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    pub fn highlight(mut self, timing: HighlightTiming) -> Self {
        self.highlight = timing;
        self
    }
}
