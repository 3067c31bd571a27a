use crate::error::{OutlineError, Result};
use crate::host::config::{ConnectionOptions, LaunchOptions};
use crate::host::script::PageScript;
use crate::host::{PageHost, TabId, TabInfo};
use async_trait::async_trait;
use headless_chrome::{Browser, Tab};
use std::{sync::Arc, time::Duration};

/// Active tab plus the viewport size the watcher compares between polls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabObservation {
    pub tab: TabInfo,
    pub viewport: Option<(u32, u32)>,
}

/// [`PageHost`] backed by a Chrome/Chromium instance
///
/// headless_chrome is blocking, so every call runs on tokio's blocking pool.
#[derive(Clone)]
pub struct ChromeHost {
    browser: Arc<Browser>,
}

impl ChromeHost {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let browser =
            Browser::new(chrome_launch_options(options)).map_err(|e| OutlineError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| OutlineError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser: Arc::new(browser) })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, options.idle_timeout)
            .map_err(|e| OutlineError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser: Arc::new(browser) })
    }

    /// Open `url` in a new tab, wait for it to load and bring it to front
    pub fn open(&self, url: &str) -> Result<TabInfo> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| OutlineError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;

        tab.navigate_to(url)
            .map_err(|e| OutlineError::TabOperationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        tab.wait_until_navigated().map_err(|e| {
            OutlineError::TabOperationFailed(format!("Navigation to {} did not complete: {}", url, e))
        })?;

        tab.activate()
            .map_err(|e| OutlineError::TabOperationFailed(format!("Failed to activate tab: {}", e)))?;

        Ok(tab_info(&tab))
    }

    /// Active tab and its viewport, queried in one blocking round-trip
    pub async fn observe(&self) -> Result<TabObservation> {
        self.blocking(|browser| {
            let tab = find_active_tab(browser)?;
            Ok(TabObservation { tab: tab_info(&tab), viewport: viewport_size(&tab) })
        })
        .await
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Browser) -> Result<T> + Send + 'static,
    {
        let browser = Arc::clone(&self.browser);
        tokio::task::spawn_blocking(move || f(&browser))
            .await
            .map_err(|e| OutlineError::TabOperationFailed(format!("Browser task failed: {}", e)))?
    }
}

#[async_trait]
impl PageHost for ChromeHost {
    async fn active_tab(&self) -> Result<TabInfo> {
        self.blocking(|browser| find_active_tab(browser).map(|tab| tab_info(&tab))).await
    }

    async fn execute(&self, tab: &TabId, script: &PageScript) -> Result<serde_json::Value> {
        let js = script.to_javascript()?;
        let name = script.name();
        let tab_id = tab.clone();

        self.blocking(move |browser| {
            let tab = find_tab(browser, &tab_id)?;
            let result = tab
                .evaluate(&js, false)
                .map_err(|e| OutlineError::InjectionFailed(format!("{} in tab {}: {}", name, tab_id, e)))?;

            result
                .value
                .ok_or_else(|| OutlineError::InjectionFailed(format!("No value returned from {}", name)))
        })
        .await
    }
}

/// headless_chrome options with Chrome's own default arguments left untouched
fn chrome_launch_options(options: LaunchOptions) -> headless_chrome::LaunchOptions<'static> {
    let mut launch_opts = headless_chrome::LaunchOptions::default();

    // The panel may sit idle for a long time between tab events
    launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

    launch_opts.headless = options.headless;
    launch_opts.window_size = Some((options.window_width, options.window_height));
    launch_opts.sandbox = options.sandbox;

    if let Some(path) = options.chrome_path {
        launch_opts.path = Some(path);
    }

    if let Some(dir) = options.user_data_dir {
        launch_opts.user_data_dir = Some(dir);
    }

    launch_opts
}

fn tab_info(tab: &Tab) -> TabInfo {
    let url = tab.get_url();
    TabInfo {
        id: TabId::new(tab.get_target_id().clone()),
        url: (!url.is_empty()).then_some(url),
    }
}

fn tabs(browser: &Browser) -> Result<Vec<Arc<Tab>>> {
    let tabs = browser
        .get_tabs()
        .lock()
        .map_err(|e| OutlineError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
        .clone();

    Ok(tabs)
}

fn find_tab(browser: &Browser, id: &TabId) -> Result<Arc<Tab>> {
    tabs(browser)?
        .into_iter()
        .find(|tab| tab.get_target_id().as_str() == id.as_str())
        .ok_or_else(|| OutlineError::TabNotFound(id.to_string()))
}

fn evaluates_true(tab: &Tab, js: &str) -> bool {
    match tab.evaluate(js, false) {
        Ok(remote_object) => remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false),
        Err(e) => {
            log::debug!("Failed to check tab status: {}", e);
            false
        }
    }
}

/// Currently active tab by document visibility and focus state
fn find_active_tab(browser: &Browser) -> Result<Arc<Tab>> {
    let tabs = tabs(browser)?;

    // First pass: visible and focused (strongest signal)
    if let Some(tab) = tabs
        .iter()
        .find(|tab| evaluates_true(tab, "document.visibilityState === 'visible' && document.hasFocus()"))
    {
        return Ok(Arc::clone(tab));
    }

    // Second pass: just visible
    tabs.iter()
        .find(|tab| evaluates_true(tab, "document.visibilityState === 'visible'"))
        .cloned()
        .ok_or(OutlineError::NoActiveTab)
}

/// Evaluated without return-by-value, so the array has to come back as a JSON string
const VIEWPORT_JS: &str = "JSON.stringify([window.innerWidth, window.innerHeight])";

fn viewport_size(tab: &Tab) -> Option<(u32, u32)> {
    match tab.evaluate(VIEWPORT_JS, false) {
        Ok(remote_object) => remote_object.value.as_ref().and_then(parse_viewport),
        Err(e) => {
            log::trace!("Failed to read viewport size: {}", e);
            None
        }
    }
}

/// Decode the `"[width,height]"` string returned by [`VIEWPORT_JS`]
fn parse_viewport(value: &serde_json::Value) -> Option<(u32, u32)> {
    let raw = value.as_str()?;
    let [width, height]: [u32; 2] = serde_json::from_str(raw).ok()?;
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractOptions;
    use serde_json::json;

    #[test]
    fn test_launch_options_keep_default_args() {
        let opts = chrome_launch_options(LaunchOptions::new().headless(false).window_size(800, 600));

        assert!(opts.args.is_empty());
        assert!(opts.ignore_default_args.is_empty());
        assert!(!opts.headless);
        assert_eq!(opts.window_size, Some((800, 600)));
        assert_eq!(opts.idle_browser_timeout, Duration::from_secs(60 * 60));
    }

    #[test]
    fn test_parse_viewport() {
        assert_eq!(parse_viewport(&json!("[1280,800]")), Some((1280, 800)));
        assert_eq!(parse_viewport(&json!("[1280, 800]")), Some((1280, 800)));
    }

    #[test]
    fn test_parse_viewport_rejects_other_shapes() {
        // An unstringified array is never returned by value
        assert_eq!(parse_viewport(&json!([1280, 800])), None);
        assert_eq!(parse_viewport(&json!("[1280]")), None);
        assert_eq!(parse_viewport(&json!("[1280.5,800]")), None);
        assert_eq!(parse_viewport(&json!("not json")), None);
    }

    // Integration tests (require Chrome to be installed)
    #[tokio::test]
    #[ignore] // Ignore by default, run with: cargo test -- --ignored
    async fn test_active_tab() {
        let host = ChromeHost::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        host.open("data:text/html,<h1 id='t'>Title</h1>").expect("Failed to open tab");

        let tab = host.active_tab().await;
        assert!(tab.is_ok());
    }

    #[tokio::test]
    #[ignore]
    async fn test_execute_collect_script() {
        let host = ChromeHost::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        let tab = host
            .open("data:text/html,<h1 id='t1'>Title</h1><p id='p1'>A paragraph that is long enough.</p>")
            .expect("Failed to open tab");

        let value = host
            .execute(&tab.id, &PageScript::CollectContent(ExtractOptions::default()))
            .await
            .expect("Script failed");

        let raw = value.as_str().expect("Expected JSON string");
        assert!(raw.contains("\"t1\""));
        assert!(raw.contains("\"p1\""));
    }

    #[tokio::test]
    #[ignore]
    async fn test_unknown_tab() {
        let host = ChromeHost::launch(LaunchOptions::new().headless(true)).expect("Failed to launch browser");
        let result = host
            .execute(&TabId::new("missing"), &PageScript::CollectContent(ExtractOptions::default()))
            .await;

        assert!(matches!(result, Err(OutlineError::TabNotFound(_))));
    }
}
