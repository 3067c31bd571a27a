//! Turns polled Chrome tab state into [`BrowserEvent`]s

use crate::host::chrome::{ChromeHost, TabObservation};
use crate::host::config::WatcherConfig;
use crate::host::BrowserEvent;
use crate::panel::PanelHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Polls a [`ChromeHost`] and forwards tab activity to a panel
pub struct ChromeTabWatcher {
    host: ChromeHost,
    config: WatcherConfig,
}

impl ChromeTabWatcher {
    pub fn new(host: ChromeHost, config: WatcherConfig) -> Self {
        Self { host, config }
    }

    /// Poll until the panel goes away
    pub async fn run(self, panel: PanelHandle) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut previous: Option<TabObservation> = None;

        loop {
            ticker.tick().await;
            if panel.is_closed() {
                break;
            }

            let observation = match self.host.observe().await {
                Ok(observation) => observation,
                Err(e) => {
                    log::trace!("Tab poll failed: {}", e);
                    continue;
                }
            };

            for event in diff(previous.as_ref(), &observation) {
                log::debug!("Browser event: {:?}", event);
                if panel.notify(event).is_err() {
                    log::debug!("Panel closed, stopping tab watcher");
                    return;
                }
            }
            previous = Some(observation);
        }
    }
}

/// Events implied by going from `previous` to `next`
///
/// The first observation only establishes a baseline.
pub fn diff(previous: Option<&TabObservation>, next: &TabObservation) -> Vec<BrowserEvent> {
    let Some(previous) = previous else {
        return Vec::new();
    };

    let mut events = Vec::new();

    if previous.tab.id != next.tab.id {
        events.push(BrowserEvent::TabActivated { tab_id: next.tab.id.clone(), url: next.tab.url.clone() });
    } else if previous.tab.url != next.tab.url {
        events.push(BrowserEvent::UrlUpdated {
            tab_id: next.tab.id.clone(),
            url: next.tab.url.clone(),
            active: true,
        });
    }

    if let (Some(before), Some(after)) = (previous.viewport, next.viewport) {
        if before != after {
            events.push(BrowserEvent::WindowResized);
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{TabId, TabInfo};

    fn observation(id: &str, url: &str, viewport: Option<(u32, u32)>) -> TabObservation {
        TabObservation { tab: TabInfo::new(TabId::new(id), url), viewport }
    }

    #[test]
    fn test_first_observation_is_baseline() {
        assert!(diff(None, &observation("a", "https://x.com", Some((800, 600)))).is_empty());
    }

    #[test]
    fn test_unchanged() {
        let obs = observation("a", "https://x.com", Some((800, 600)));
        assert!(diff(Some(&obs), &obs.clone()).is_empty());
    }

    #[test]
    fn test_tab_switch() {
        let before = observation("a", "https://x.com", None);
        let after = observation("b", "https://y.com", None);

        assert_eq!(
            diff(Some(&before), &after),
            vec![BrowserEvent::TabActivated { tab_id: TabId::new("b"), url: Some("https://y.com".to_string()) }]
        );
    }

    #[test]
    fn test_url_change_in_same_tab() {
        let before = observation("a", "https://x.com/1", None);
        let after = observation("a", "https://x.com/2", None);

        assert_eq!(
            diff(Some(&before), &after),
            vec![BrowserEvent::UrlUpdated {
                tab_id: TabId::new("a"),
                url: Some("https://x.com/2".to_string()),
                active: true,
            }]
        );
    }

    #[test]
    fn test_viewport_change() {
        let before = observation("a", "https://x.com", Some((800, 600)));
        let resized = observation("a", "https://x.com", Some((1024, 600)));
        let unknown = observation("a", "https://x.com", None);

        assert_eq!(diff(Some(&before), &resized), vec![BrowserEvent::WindowResized]);
        assert!(diff(Some(&before), &unknown).is_empty());
    }
}
