//! Page outline side panel
//!
//! Follows the active tab of a Chrome/Chromium instance (or a local HTML file)
//! and prints its outline. Type an item number to scroll the page to it.

use anyhow::{Context, anyhow};
use clap::Parser;
use page_outline::host::{ChromeHost, ChromeTabWatcher, ConnectionOptions, LaunchOptions, StaticPageHost, WatcherConfig};
use page_outline::page_url::normalize_url;
use page_outline::render::{DisplayOptions, entry_id, render_panel};
use page_outline::{ExtractOptions, PageHost, Panel, PanelConfig, PanelHandle, PanelState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "page-outline")]
#[command(version)]
#[command(about = "Live outline of the active browser tab", long_about = None)]
struct Cli {
    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Open this URL in a new tab on startup
    #[arg(long, value_name = "URL")]
    open: Option<String>,

    /// Outline a local HTML file instead of a browser tab
    #[arg(long, value_name = "FILE", conflicts_with_all = ["ws_endpoint", "open"])]
    html: Option<PathBuf>,

    /// Include links
    #[arg(long)]
    links: bool,

    /// Include images
    #[arg(long)]
    images: bool,

    /// Include elements without an id attribute
    #[arg(long)]
    all_elements: bool,

    /// Generate ids for headings that have none
    #[arg(long)]
    auto_ids: bool,

    /// Show tag names next to items
    #[arg(long)]
    show_tags: bool,

    /// Tab polling interval in milliseconds
    #[arg(long, default_value = "250", value_name = "MS")]
    poll_ms: u64,
}

enum UserInput {
    Refresh,
    Select(usize),
    ToggleTags,
    ToggleHeadingsOnly,
    Quit,
}

fn parse_input(line: &str) -> Option<UserInput> {
    match line.trim() {
        "r" => Some(UserInput::Refresh),
        "t" => Some(UserInput::ToggleTags),
        "h" => Some(UserInput::ToggleHeadingsOnly),
        "q" => Some(UserInput::Quit),
        other => other.parse().ok().map(UserInput::Select),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let extract = ExtractOptions::default()
        .require_identifier(!cli.all_elements)
        .include_links(cli.links)
        .include_images(cli.images)
        .auto_generate_ids(cli.auto_ids);
    let config = PanelConfig::new().extract(extract);

    let (host, chrome) = start_host(&cli).await?;
    let (panel, task) = Panel::spawn(host, config);

    if let Some(chrome) = chrome {
        let watcher_config = WatcherConfig::default().poll_interval(Duration::from_millis(cli.poll_ms.max(1)));
        tokio::spawn(ChromeTabWatcher::new(chrome, watcher_config).run(panel.clone()));
    }

    let mut display = DisplayOptions { show_tags: cli.show_tags, ..DisplayOptions::default() };
    run_ui(&panel, &mut display).await;

    panel.shutdown().ok();
    task.await.context("Panel task failed")?;
    Ok(())
}

/// Host for the panel plus the Chrome session to watch, if any
async fn start_host(cli: &Cli) -> anyhow::Result<(Arc<dyn PageHost>, Option<ChromeHost>)> {
    if let Some(path) = &cli.html {
        let html = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let absolute = path.canonicalize().with_context(|| format!("Failed to resolve {}", path.display()))?;
        let url = url::Url::from_file_path(&absolute)
            .map_err(|_| anyhow!("Cannot build a file URL for {}", absolute.display()))?;

        let host = StaticPageHost::new();
        host.open_tab(url.as_str(), html)?;
        eprintln!("Outlining {}", url);
        let host: Arc<dyn PageHost> = Arc::new(host);
        return Ok((host, None));
    }

    let chrome = match cli.ws_endpoint.clone() {
        Some(endpoint) => {
            eprintln!("WebSocket endpoint: {}", endpoint);
            tokio::task::spawn_blocking(move || ChromeHost::connect(ConnectionOptions::new(endpoint))).await??
        }
        None => {
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(path) = &cli.executable_path {
                eprintln!("Browser executable: {}", path);
                options = options.chrome_path(path);
            }
            if let Some(dir) = &cli.user_data_dir {
                eprintln!("User data directory: {}", dir);
                options = options.user_data_dir(dir);
            }
            eprintln!("Browser mode: {}", if options.headless { "headless" } else { "headed" });
            tokio::task::spawn_blocking(move || ChromeHost::launch(options)).await??
        }
    };

    if let Some(url) = &cli.open {
        let url = normalize_url(url);
        let opener = chrome.clone();
        let tab = tokio::task::spawn_blocking(move || opener.open(&url)).await??;
        log::info!("Opened tab {}", tab.id);
    }

    let host: Arc<dyn PageHost> = Arc::new(chrome.clone());
    Ok((host, Some(chrome)))
}

/// Redraw on every state change and act on typed commands until `q`, EOF or Ctrl-C
async fn run_ui(panel: &PanelHandle, display: &mut DisplayOptions) {
    let mut updates = panel.subscribe();
    let mut input = spawn_stdin_reader();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    draw(&updates.borrow_and_update(), display);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                draw(&state, display);
            }
            line = input.recv() => {
                let Some(line) = line else { break };
                match parse_input(&line) {
                    Some(UserInput::Quit) => break,
                    Some(UserInput::Refresh) => {
                        if panel.refresh(true).is_err() {
                            break;
                        }
                    }
                    Some(UserInput::ToggleTags) => {
                        display.toggle_tags();
                        draw(&panel.state(), display);
                    }
                    Some(UserInput::ToggleHeadingsOnly) => {
                        display.toggle_headings_only();
                        draw(&panel.state(), display);
                    }
                    Some(UserInput::Select(number)) => select(panel, display, number),
                    None => eprintln!("Commands: <number> jump, r refresh, t tags, h headings only, q quit"),
                }
            }
            _ = &mut ctrl_c => break,
        }
    }
}

fn select(panel: &PanelHandle, display: &DisplayOptions, number: usize) {
    let state = panel.state();
    let id = state.result.as_deref().and_then(|result| entry_id(result, display, number));
    match id {
        Some(id) => {
            if let Err(e) = panel.navigate(id) {
                log::warn!("Navigation request failed: {}", e);
            }
        }
        None => eprintln!("No item {} with an id", number),
    }
}

/// Stdin lines on a plain thread; a blocking read cannot be cancelled at shutdown
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn draw(state: &PanelState, display: &DisplayOptions) {
    println!("\n{}", "=".repeat(60));
    print!("{}", render_panel(state, display));
}
