use crate::error::{OutlineError, Result};
use crate::extract::{ExtractOptions, IdAllocator, PageElement, PageSnapshot};
use crate::host::script::PageScript;
use crate::host::{PageHost, TabId, TabInfo};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;
use url::Url;

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Something a script did to a page, in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Collected { tab: TabId },
    ScrolledTo { tab: TabId, id: String },
}

struct StaticTab {
    id: TabId,
    url: String,
    html: String,
    scriptable: bool,
    /// Ids written into headings by a collection with `auto_generate_ids`
    generated_ids: HashMap<String, usize>,
    highlight: Option<Highlight>,
}

/// Highlight applied by a scroll, gone once its visible and fade phases end
struct Highlight {
    id: String,
    until: Instant,
}

#[derive(Default)]
struct Pages {
    tabs: Vec<StaticTab>,
    active: Option<usize>,
    next_id: u64,
    actions: Vec<PageAction>,
    latency: Duration,
}

impl Pages {
    fn tab_mut(&mut self, id: &TabId) -> Result<&mut StaticTab> {
        self.tabs
            .iter_mut()
            .find(|tab| &tab.id == id)
            .ok_or_else(|| OutlineError::TabNotFound(id.to_string()))
    }
}

/// In-memory [`PageHost`] serving fixed HTML documents.
///
/// Scripts are interpreted natively with the same semantics as the injected
/// JavaScript, so the panel can run without a browser.
#[derive(Default)]
pub struct StaticPageHost {
    pages: Mutex<Pages>,
}

impl StaticPageHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay applied to every script execution
    pub fn set_latency(&self, latency: Duration) {
        if let Ok(mut pages) = self.pages.lock() {
            pages.latency = latency;
        }
    }

    /// Open a tab and make it the active one
    pub fn open_tab(&self, url: impl Into<String>, html: impl Into<String>) -> Result<TabId> {
        let mut pages = self.lock()?;
        pages.next_id += 1;
        let id = TabId::new(format!("static-{}", pages.next_id));
        pages.tabs.push(StaticTab {
            id: id.clone(),
            url: url.into(),
            html: html.into(),
            scriptable: true,
            generated_ids: HashMap::new(),
            highlight: None,
        });
        pages.active = Some(pages.tabs.len() - 1);
        Ok(id)
    }

    /// Load a new document into an existing tab
    pub fn navigate(&self, tab: &TabId, url: impl Into<String>, html: impl Into<String>) -> Result<()> {
        let mut pages = self.lock()?;
        let tab = pages.tab_mut(tab)?;
        tab.url = url.into();
        tab.html = html.into();
        tab.generated_ids.clear();
        tab.highlight = None;
        Ok(())
    }

    /// Change only the URL, keeping the document (e.g. a fragment jump)
    pub fn set_url(&self, tab: &TabId, url: impl Into<String>) -> Result<()> {
        let mut pages = self.lock()?;
        pages.tab_mut(tab)?.url = url.into();
        Ok(())
    }

    pub fn activate(&self, tab: &TabId) -> Result<()> {
        let mut pages = self.lock()?;
        let index = pages
            .tabs
            .iter()
            .position(|t| &t.id == tab)
            .ok_or_else(|| OutlineError::TabNotFound(tab.to_string()))?;
        pages.active = Some(index);
        Ok(())
    }

    /// Scripts fail on non-scriptable tabs, like internal browser pages
    pub fn set_scriptable(&self, tab: &TabId, scriptable: bool) -> Result<()> {
        let mut pages = self.lock()?;
        pages.tab_mut(tab)?.scriptable = scriptable;
        Ok(())
    }

    /// Id of the element currently highlighted in `tab`
    pub fn highlighted(&self, tab: &TabId) -> Option<String> {
        let mut pages = self.lock().ok()?;
        let tab = pages.tab_mut(tab).ok()?;
        if tab.highlight.as_ref().is_some_and(|h| Instant::now() >= h.until) {
            tab.highlight = None;
        }
        tab.highlight.as_ref().map(|h| h.id.clone())
    }

    pub fn actions(&self) -> Vec<PageAction> {
        self.lock().map(|pages| pages.actions.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Pages>> {
        self.pages
            .lock()
            .map_err(|e| OutlineError::TabOperationFailed(format!("Static pages poisoned: {}", e)))
    }

    fn latency(&self) -> Duration {
        self.lock().map(|pages| pages.latency).unwrap_or_default()
    }

    fn run(&self, tab_id: &TabId, script: &PageScript) -> Result<serde_json::Value> {
        let mut pages = self.lock()?;
        let tab = pages.tab_mut(tab_id)?;

        if !tab.scriptable {
            return Err(OutlineError::InjectionFailed(format!("Cannot access contents of {}", tab.url)));
        }

        let (value, action) = match script {
            PageScript::CollectContent(options) => {
                let snapshot = collect(tab, options)?;
                (json!(serde_json::to_string(&snapshot)?), PageAction::Collected { tab: tab_id.clone() })
            }
            PageScript::ScrollToElement { id, timing } => {
                if !contains_element(tab, id)? {
                    return Ok(json!({ "found": false }));
                }
                // Replaces any earlier highlight and restarts its timers
                tab.highlight = Some(Highlight { id: id.clone(), until: Instant::now() + timing.visible + timing.fade });
                (json!({ "found": true }), PageAction::ScrolledTo { tab: tab_id.clone(), id: id.clone() })
            }
        };

        pages.actions.push(action);
        Ok(value)
    }
}

#[async_trait]
impl PageHost for StaticPageHost {
    async fn active_tab(&self) -> Result<TabInfo> {
        let pages = self.lock()?;
        let tab = pages.active.and_then(|i| pages.tabs.get(i)).ok_or(OutlineError::NoActiveTab)?;
        Ok(TabInfo::new(tab.id.clone(), tab.url.clone()))
    }

    async fn execute(&self, tab: &TabId, script: &PageScript) -> Result<serde_json::Value> {
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.run(tab, script)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| OutlineError::InjectionFailed(format!("Invalid selector '{}': {:?}", css, e)))
}

fn with_id(css: &str, options: &ExtractOptions) -> String {
    if options.require_identifier {
        css.split(',').map(|s| format!("{}[id]", s.trim())).collect::<Vec<_>>().join(", ")
    } else {
        css.to_string()
    }
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect()
}

fn resolve(base: &str, reference: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(reference))
        .map(String::from)
        .unwrap_or_else(|_| reference.to_string())
}

fn page_element(element: &ElementRef<'_>, id: Option<&str>) -> PageElement {
    let mut node = PageElement::new(element.value().name()).with_text(text_of(element));
    if let Some(id) = id.filter(|id| !id.is_empty()) {
        node.add_attribute("id", id);
    }
    node
}

fn now_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Mirror of `collect_content.js` over a parsed document
fn collect(tab: &mut StaticTab, options: &ExtractOptions) -> Result<PageSnapshot> {
    let document = Html::parse_document(&tab.html);
    let mut elements = Vec::new();

    let any_id = selector("[id]")?;
    let mut allocator = IdAllocator::new(
        document.select(&any_id).filter_map(|el| el.value().attr("id")).map(str::to_string),
    );

    let headings = if options.auto_generate_ids {
        selector(HEADING_SELECTOR)?
    } else {
        selector(&with_id(HEADING_SELECTOR, options))?
    };

    let mut generated = HashMap::new();
    for (ordinal, heading) in document.select(&headings).enumerate() {
        let mut id = heading.value().attr("id").map(str::to_string);
        let text = text_of(&heading);
        if options.auto_generate_ids && id.as_deref().is_none_or(str::is_empty) && !text.trim().is_empty() {
            let new_id = allocator.allocate(text.trim());
            generated.insert(new_id.clone(), ordinal);
            id = Some(new_id);
        }
        elements.push(page_element(&heading, id.as_deref()));
    }
    if options.auto_generate_ids {
        tab.generated_ids = generated;
    }

    if options.include_links {
        for link in document.select(&selector(&with_id("a[href]", options))?) {
            let href = link.value().attr("href").unwrap_or_default();
            let node = page_element(&link, link.value().attr("id")).with_attribute("href", resolve(&tab.url, href));
            elements.push(node);
        }
    }

    if options.include_images {
        for img in document.select(&selector(&with_id("img[src]", options))?) {
            let src = img.value().attr("src").unwrap_or_default();
            let node = page_element(&img, img.value().attr("id"))
                .with_attribute("src", resolve(&tab.url, src))
                .with_attribute("alt", img.value().attr("alt").unwrap_or_default());
            elements.push(node);
        }
    }

    for p in document.select(&selector(&with_id("p", options))?) {
        elements.push(page_element(&p, p.value().attr("id")));
    }

    Ok(PageSnapshot::new(tab.url.clone(), now_millis()).with_elements(elements))
}

fn contains_element(tab: &StaticTab, id: &str) -> Result<bool> {
    if tab.generated_ids.contains_key(id) {
        return Ok(true);
    }
    let document = Html::parse_document(&tab.html);
    let any_id = selector("[id]")?;
    Ok(document.select(&any_id).any(|el| el.value().attr("id") == Some(id)))
}
