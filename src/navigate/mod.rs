//! Scroll the page to an outline entry and flash a highlight on it

use crate::host::{PageHost, PageScript};
use serde::Deserialize;
use std::time::Duration;

/// How long a highlight stays, then how long it takes to fade out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightTiming {
    pub visible: Duration,
    pub fade: Duration,
}

impl Default for HighlightTiming {
    fn default() -> Self {
        Self { visible: Duration::from_millis(1000), fade: Duration::from_millis(1000) }
    }
}

/// What a navigation request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Element scrolled into view and highlighted
    Highlighted,
    /// No element with that id in the current document
    NotFound,
    /// No active tab, or the page rejected the script. Already logged.
    Failed(String),
}

#[derive(Deserialize)]
struct ScrollReply {
    found: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator {
    timing: HighlightTiming,
}

impl Navigator {
    pub fn new(timing: HighlightTiming) -> Self {
        Self { timing }
    }

    /// Scroll the active tab to the element with `id`.
    ///
    /// Never fails: a missing element is a no-op and every other problem is
    /// reported through the log.
    pub async fn scroll_to(&self, host: &dyn PageHost, id: &str) -> NavigationOutcome {
        let tab = match host.active_tab().await {
            Ok(tab) => tab,
            Err(e) => {
                log::warn!("Error scrolling to element '{}': {}", id, e);
                return NavigationOutcome::Failed(e.to_string());
            }
        };

        let script = PageScript::ScrollToElement { id: id.to_string(), timing: self.timing };
        let reply = match host.execute(&tab.id, &script).await {
            Ok(serde_json::Value::String(raw)) => serde_json::from_str::<ScrollReply>(&raw),
            Ok(value) => serde_json::from_value::<ScrollReply>(value),
            Err(e) => {
                log::warn!("Error scrolling to element '{}': {}", id, e);
                return NavigationOutcome::Failed(e.to_string());
            }
        };

        match reply {
            Ok(ScrollReply { found: true }) => NavigationOutcome::Highlighted,
            Ok(ScrollReply { found: false }) => {
                log::debug!("Element '{}' not present in tab {}", id, tab.id);
                NavigationOutcome::NotFound
            }
            Err(e) => {
                log::warn!("Unexpected reply scrolling to '{}': {}", id, e);
                NavigationOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PageAction, StaticPageHost};

    const PAGE: &str = "<h1 id='t1'>Title</h1><p id='p1'>A paragraph long enough to list.</p>";

    #[tokio::test]
    async fn test_scroll_to_existing_element() {
        let host = StaticPageHost::new();
        let tab = host.open_tab("https://x.com/p", PAGE).unwrap();

        let outcome = Navigator::default().scroll_to(&host, "p1").await;

        assert_eq!(outcome, NavigationOutcome::Highlighted);
        assert_eq!(host.highlighted(&tab).as_deref(), Some("p1"));
        assert_eq!(host.actions(), vec![PageAction::ScrolledTo { tab, id: "p1".to_string() }]);
    }

    #[tokio::test]
    async fn test_missing_element_is_noop() {
        let host = StaticPageHost::new();
        let tab = host.open_tab("https://x.com/p", PAGE).unwrap();

        let outcome = Navigator::default().scroll_to(&host, "gone").await;

        assert_eq!(outcome, NavigationOutcome::NotFound);
        assert!(host.highlighted(&tab).is_none());
        assert!(host.actions().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let host = StaticPageHost::new();
        assert!(matches!(Navigator::default().scroll_to(&host, "t1").await, NavigationOutcome::Failed(_)));

        let tab = host.open_tab("chrome://newtab", PAGE).unwrap();
        host.set_scriptable(&tab, false).unwrap();
        assert!(matches!(Navigator::default().scroll_to(&host, "t1").await, NavigationOutcome::Failed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_is_removed_after_timing() {
        let host = StaticPageHost::new();
        let tab = host.open_tab("https://x.com/p", PAGE).unwrap();
        let navigator = Navigator::default();

        assert_eq!(navigator.scroll_to(&host, "t1").await, NavigationOutcome::Highlighted);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(navigator.scroll_to(&host, "p1").await, NavigationOutcome::Highlighted);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(host.highlighted(&tab).as_deref(), Some("p1"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(host.highlighted(&tab).is_none());
    }

    #[test]
    fn test_default_timing() {
        let timing = HighlightTiming::default();
        assert_eq!(timing.visible, Duration::from_secs(1));
        assert_eq!(timing.fade, Duration::from_secs(1));
    }
}
