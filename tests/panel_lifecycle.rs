use page_outline::host::PageAction;
use page_outline::{
    BrowserEvent, ContentItem, ExtractOptions, HeadingLevel, PageHost, Panel, PanelConfig, PanelHandle,
    StaticPageHost, TabId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const PAGE_A: &str = r#"
    <h1 id="t1">Title</h1>
    <p id="p1">abcdefghijklmnopqrstuvwxy</p>
"#;

const PAGE_B: &str = r#"
    <h1 id="welcome">Welcome</h1>
    <h2 id="setup">Setup</h2>
    <h2>Untracked</h2>
    <p id="short">Too short.</p>
    <p id="body">This paragraph is comfortably longer than twenty characters.</p>
"#;

const PAGE_C: &str = r#"<h1 id="other">Other</h1>"#;

async fn settle() {
    sleep(Duration::from_millis(1)).await;
}

fn spawn(host: &Arc<StaticPageHost>, config: PanelConfig) -> PanelHandle {
    let host: Arc<dyn PageHost> = host.clone();
    Panel::spawn(host, config).0
}

fn heading_ids(panel: &PanelHandle) -> Vec<String> {
    panel
        .state()
        .result
        .map(|result| result.headings().filter_map(|h| h.id().map(str::to_string)).collect())
        .unwrap_or_default()
}

fn collections(host: &StaticPageHost) -> usize {
    host.actions().iter().filter(|a| matches!(a, PageAction::Collected { .. })).count()
}

fn url_updated(tab: &TabId, url: &str) -> BrowserEvent {
    BrowserEvent::UrlUpdated { tab_id: tab.clone(), url: Some(url.to_string()), active: true }
}

#[tokio::test(start_paused = true)]
async fn test_initial_scenario() {
    let host = Arc::new(StaticPageHost::new());
    host.open_tab("https://x.com/p", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;

    let state = panel.state();
    let result = state.result.expect("expected an extraction");
    assert_eq!(
        result.content(),
        &[
            ContentItem::Heading {
                tag: "h1".to_string(),
                level: HeadingLevel::from_tag("h1"),
                text: "Title".to_string(),
                id: Some("t1".to_string()),
            },
            ContentItem::Paragraph {
                tag: "p".to_string(),
                text: "abcdefghijklmnopqrstuvwxy".to_string(),
                id: Some("p1".to_string()),
            },
        ]
    );
    let stats = result.stats();
    assert_eq!((stats.headings, stats.paragraphs, stats.links, stats.images, stats.total), (1, 1, 0, 0, 2));
    assert_eq!(result.url(), "https://x.com/p");
}

#[tokio::test(start_paused = true)]
async fn test_url_change_clears_then_reextracts_after_settle() {
    let host = Arc::new(StaticPageHost::new());
    let tab = host.open_tab("https://x.com/a", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;
    assert_eq!(heading_ids(&panel), ["t1"]);

    host.navigate(&tab, "https://x.com/b", PAGE_B).unwrap();
    panel.notify(url_updated(&tab, "https://x.com/b")).unwrap();
    settle().await;

    let state = panel.state();
    assert!(state.result.is_none());
    assert_eq!(state.url.as_deref(), Some("https://x.com/b"));

    sleep(Duration::from_millis(400)).await;
    assert!(panel.state().result.is_none());

    sleep(Duration::from_millis(150)).await;
    assert_eq!(heading_ids(&panel), ["welcome", "setup"]);
    assert_eq!(panel.state().result.unwrap().url(), "https://x.com/b");
}

#[tokio::test(start_paused = true)]
async fn test_refresh_ahead_of_url_event_still_resyncs() {
    let host = Arc::new(StaticPageHost::new());
    let tab = host.open_tab("https://x.com/a", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;

    // The extraction already sees /b when the URL-updated event arrives
    host.navigate(&tab, "https://x.com/b", PAGE_B).unwrap();
    panel.refresh(false).unwrap();
    settle().await;
    assert_eq!(collections(&host), 2);
    assert_eq!(panel.state().url.as_deref(), Some("https://x.com/a"));

    panel.notify(url_updated(&tab, "https://x.com/b")).unwrap();
    settle().await;
    assert!(panel.state().result.is_none());
    assert_eq!(panel.state().url.as_deref(), Some("https://x.com/b"));

    sleep(Duration::from_millis(510)).await;
    assert_eq!(collections(&host), 3);
    assert_eq!(heading_ids(&panel), ["welcome", "setup"]);
}

#[tokio::test(start_paused = true)]
async fn test_fragment_only_change_keeps_result() {
    let host = Arc::new(StaticPageHost::new());
    let tab = host.open_tab("https://x.com/p", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;
    let before = panel.state().result;

    host.set_url(&tab, "https://x.com/p#t1").unwrap();
    panel.notify(url_updated(&tab, "https://x.com/p#t1")).unwrap();
    settle().await;
    assert_eq!(panel.state().result, before);

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(collections(&host), 1);
    assert_eq!(panel.state().result, before);
}

#[tokio::test(start_paused = true)]
async fn test_inactive_tab_updates_are_ignored() {
    let host = Arc::new(StaticPageHost::new());
    host.open_tab("https://x.com/p", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;

    panel
        .notify(BrowserEvent::UrlUpdated {
            tab_id: TabId::new("elsewhere"),
            url: Some("https://y.com/".to_string()),
            active: false,
        })
        .unwrap();
    settle().await;

    assert_eq!(panel.state().url.as_deref(), Some("https://x.com/p"));
    assert!(panel.state().result.is_some());
}

#[tokio::test(start_paused = true)]
async fn test_tab_activation_always_resyncs() {
    let host = Arc::new(StaticPageHost::new());
    host.open_tab("https://x.com/p", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;

    // Same URL in a different tab is still a different document
    let second = host.open_tab("https://x.com/p", PAGE_B).unwrap();
    panel
        .notify(BrowserEvent::TabActivated { tab_id: second.clone(), url: Some("https://x.com/p".to_string()) })
        .unwrap();
    settle().await;
    assert!(panel.state().result.is_none());

    sleep(Duration::from_millis(510)).await;
    assert_eq!(heading_ids(&panel), ["welcome", "setup"]);
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_events_yields_one_extraction() {
    let host = Arc::new(StaticPageHost::new());
    let tab = host.open_tab("https://x.com/1", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;

    for url in ["https://x.com/2", "https://x.com/3", "https://x.com/4"] {
        host.set_url(&tab, url).unwrap();
        panel.notify(url_updated(&tab, url)).unwrap();
        sleep(Duration::from_millis(100)).await;
    }

    sleep(Duration::from_millis(600)).await;
    assert_eq!(collections(&host), 2);
    assert_eq!(panel.state().url.as_deref(), Some("https://x.com/4"));
}

#[tokio::test(start_paused = true)]
async fn test_resize_debounce_is_trailing() {
    let host = Arc::new(StaticPageHost::new());
    host.open_tab("https://x.com/p", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;
    assert_eq!(collections(&host), 1);

    panel.notify(BrowserEvent::WindowResized).unwrap();
    sleep(Duration::from_millis(300)).await;
    panel.notify(BrowserEvent::WindowResized).unwrap();
    sleep(Duration::from_millis(300)).await;

    assert_eq!(collections(&host), 1);
    // Resizing never clears the outline
    assert!(panel.state().result.is_some());

    sleep(Duration::from_millis(150)).await;
    assert_eq!(collections(&host), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_refresh_is_discarded() {
    let host = Arc::new(StaticPageHost::new());
    let tab = host.open_tab("https://x.com/p", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;

    // Slow request first, then a fast one that overtakes it
    host.set_latency(Duration::from_millis(300));
    panel.refresh(false).unwrap();
    settle().await;
    host.set_latency(Duration::ZERO);
    host.navigate(&tab, "https://x.com/p", PAGE_B).unwrap();
    panel.refresh(false).unwrap();
    settle().await;

    assert_eq!(heading_ids(&panel), ["welcome", "setup"]);
    assert!(panel.state().loading);

    // The slow request reads whatever document is loaded when it finally runs
    host.navigate(&tab, "https://x.com/p", PAGE_C).unwrap();
    sleep(Duration::from_millis(400)).await;

    assert_eq!(heading_ids(&panel), ["welcome", "setup"]);
    assert!(!panel.state().loading);
}

#[tokio::test(start_paused = true)]
async fn test_navigate_to_missing_element_is_a_no_op() {
    let host = Arc::new(StaticPageHost::new());
    let tab = host.open_tab("https://x.com/p", PAGE_A).unwrap();
    let panel = spawn(&host, PanelConfig::default());
    settle().await;

    panel.navigate("missing").unwrap();
    settle().await;

    assert!(host.highlighted(&tab).is_none());
    assert!(!host.actions().iter().any(|a| matches!(a, PageAction::ScrolledTo { .. })));
    assert!(panel.state().result.is_some());

    panel.navigate("p1").unwrap();
    settle().await;
    assert_eq!(host.highlighted(&tab).as_deref(), Some("p1"));
}

#[tokio::test(start_paused = true)]
async fn test_result_invariants_with_all_options() {
    let host = Arc::new(StaticPageHost::new());
    host.open_tab(
        "https://x.com/docs/",
        r#"
        <h1 id="top">Docs</h1>
        <a id="home" href="/">Home</a>
        <img id="logo" src="logo.png">
        <h3>Generated</h3>
        <p id="long">"#
            .to_string()
            + &"word ".repeat(80)
            + "</p>",
    )
    .unwrap();

    let options = ExtractOptions::default().include_links(true).include_images(true).auto_generate_ids(true);
    let panel = spawn(&host, PanelConfig::new().extract(options));
    settle().await;

    let result = panel.state().result.expect("expected an extraction");
    let stats = result.stats();
    assert!(stats.is_consistent());
    assert_eq!(stats.total, result.content().len());
    assert_eq!((stats.headings, stats.links, stats.images, stats.paragraphs), (2, 1, 1, 1));

    for item in result.content() {
        assert!(item.id().is_some_and(|id| !id.is_empty()));
        if let ContentItem::Paragraph { text, .. } = item {
            assert!(text.chars().count() <= 203);
            assert!(text.ends_with("..."));
        }
    }

    assert_eq!(heading_ids(&panel), ["top", "outline-generated"]);
    assert!(result.content().iter().any(|item| matches!(
        item,
        ContentItem::Link { href, .. } if href == "https://x.com/"
    )));
    assert!(result.content().iter().any(|item| matches!(
        item,
        ContentItem::Image { src, alt, .. } if src == "https://x.com/docs/logo.png" && alt.is_empty()
    )));

    panel.navigate("outline-generated").unwrap();
    settle().await;
    assert!(host.actions().iter().any(|a| matches!(
        a,
        PageAction::ScrolledTo { id, .. } if id == "outline-generated"
    )));
}
