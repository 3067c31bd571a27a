//! # page-outline
//!
//! A live outline of the page in the active browser tab: headings, paragraphs,
//! links and images that carry an `id`, each one a jump target.
//!
//! ## Features
//!
//! - **Extraction**: collect outline items from the active tab with a configurable policy
//! - **Navigation**: scroll the page to an item and flash a highlight on it
//! - **Tracking**: re-extract when the active tab or its document changes, but not on `#fragment` jumps
//! - **Hosts**: Chrome/Chromium over CDP, or in-memory HTML for offline use and tests
//!
//! ## Running the panel
//!
//! ```bash
//! # Launch a browser and follow its active tab
//! cargo run -- --headed --open example.com
//!
//! # Outline a local HTML file without a browser
//! cargo run -- --html page.html --links --images
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use page_outline::{Panel, PanelConfig, PageHost, StaticPageHost};
//! use std::sync::Arc;
//!
//! # async fn run() -> page_outline::Result<()> {
//! let host = Arc::new(StaticPageHost::new());
//! host.open_tab("https://example.com", "<h1 id='intro'>Introduction</h1>")?;
//!
//! let host: Arc<dyn PageHost> = host;
//! let (panel, _task) = Panel::spawn(host, PanelConfig::default());
//!
//! let mut updates = panel.subscribe();
//! updates.changed().await.ok();
//! panel.navigate("intro")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`content`]: outline items, stats and extraction results
//! - [`extract`]: extraction policy and the in-page collector
//! - [`navigate`]: scroll-and-highlight
//! - [`host`]: browser capabilities ([`PageHost`]) and their implementations
//! - [`tracker`]: active tab / URL change detection
//! - [`panel`]: the state controller tying everything together
//! - [`render`]: plain-text presentation
//! - [`error`]: Error types and result aliases

pub mod content;
pub mod error;
pub mod extract;
pub mod host;
pub mod navigate;
pub mod page_url;
pub mod panel;
pub mod render;
pub mod timer;
pub mod tracker;

pub use content::{ContentItem, ContentKind, ContentStats, ExtractionResult, HeadingLevel};
pub use error::{OutlineError, Result};
pub use extract::{ExtractOptions, Extractor, PageSnapshot};
pub use host::{
    BrowserEvent, ChromeHost, ChromeTabWatcher, ConnectionOptions, LaunchOptions, PageHost, PageScript,
    StaticPageHost, TabId, TabInfo, WatcherConfig,
};
pub use navigate::{HighlightTiming, NavigationOutcome, Navigator};
pub use panel::{Panel, PanelCommand, PanelConfig, PanelHandle, PanelState};
pub use render::DisplayOptions;
pub use tracker::{TabTracker, TrackerDecision, TrackerState};
