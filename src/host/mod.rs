//! Browser capabilities consumed by the panel
//!
//! The panel never talks to a browser directly. It is handed a [`PageHost`]
//! at construction, which can:
//! - report the active tab,
//! - run a [`PageScript`] inside a tab and return its serializable result.
//!
//! Implementations:
//! - [`ChromeHost`]: Chrome/Chromium over CDP (headless_chrome)
//! - [`StaticPageHost`]: in-memory HTML documents, used for tests and offline runs
//!
//! Tab activity reaches the panel as [`BrowserEvent`]s; [`ChromeTabWatcher`]
//! produces them for a Chrome session.

pub mod chrome;
pub mod config;
pub mod script;
pub mod static_page;
pub mod watcher;

pub use chrome::ChromeHost;
pub use config::{ConnectionOptions, LaunchOptions, WatcherConfig};
pub use script::PageScript;
pub use static_page::{PageAction, StaticPageHost};
pub use watcher::ChromeTabWatcher;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser-assigned tab identifier (a CDP target id for Chrome)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of an active-tab query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    /// Missing when the browser does not expose it (e.g. restricted pages)
    pub url: Option<String>,
}

impl TabInfo {
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self { id, url: Some(url.into()) }
    }
}

/// Notification delivered to the panel by the host shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    /// A tab's URL changed
    UrlUpdated { tab_id: TabId, url: Option<String>, active: bool },

    /// Focus switched to another tab
    TabActivated { tab_id: TabId, url: Option<String> },

    /// The window hosting the panel was resized
    WindowResized,
}

/// Execute functions in the page context of browser tabs
#[async_trait]
pub trait PageHost: Send + Sync {
    /// The currently focused tab
    async fn active_tab(&self) -> Result<TabInfo>;

    /// Run `script` inside `tab` and return its result
    async fn execute(&self, tab: &TabId, script: &PageScript) -> Result<serde_json::Value>;
}
