//! Panel state controller
//!
//! A [`Panel`] owns the [`PanelState`] and is the only code that mutates it.
//! It runs as a single task that reacts to three sources:
//! - commands and browser events sent through a [`PanelHandle`],
//! - completions of the extraction/navigation calls it spawned,
//! - its own timers (settle delay, resize debounce, loading hold).
//!
//! Every refresh takes a new generation number, and so does clearing the
//! outline after a navigation. A completed extraction is only applied when
//! its generation is still current, so the last request always wins and an
//! outline from a previous page never reappears under a new URL.

pub mod config;
pub mod state;

pub use config::PanelConfig;
pub use state::PanelState;

use crate::content::ExtractionResult;
use crate::error::{OutlineError, Result};
use crate::extract::Extractor;
use crate::host::{BrowserEvent, PageHost, TabInfo};
use crate::navigate::{NavigationOutcome, Navigator};
use crate::timer::{TimerKind, Timers};
use crate::tracker::{TabTracker, TrackerDecision};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Requests accepted by a running panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    Browser(BrowserEvent),
    /// Re-extract now; `manual` holds the loading flag a little longer afterwards
    Refresh { manual: bool },
    /// Scroll the page to the element with this id
    Navigate { id: String },
    /// Drop the current outline without re-extracting
    Reset,
    Shutdown,
}

enum RefreshOutcome {
    Extracted { tab: TabInfo, result: ExtractionResult },
    TabQueryFailed(OutlineError),
    ExtractionFailed { tab: TabInfo, error: OutlineError },
}

enum TaskReport {
    Refreshed { generation: u64, manual: bool, outcome: RefreshOutcome },
    Navigated { id: String, outcome: NavigationOutcome },
}

/// Cloneable front-end to a running [`Panel`]
#[derive(Debug, Clone)]
pub struct PanelHandle {
    commands: mpsc::UnboundedSender<PanelCommand>,
    state: watch::Receiver<PanelState>,
}

impl PanelHandle {
    pub fn send(&self, command: PanelCommand) -> Result<()> {
        self.commands.send(command).map_err(|_| OutlineError::PanelClosed)
    }

    pub fn notify(&self, event: BrowserEvent) -> Result<()> {
        self.send(PanelCommand::Browser(event))
    }

    pub fn refresh(&self, manual: bool) -> Result<()> {
        self.send(PanelCommand::Refresh { manual })
    }

    pub fn navigate(&self, id: impl Into<String>) -> Result<()> {
        self.send(PanelCommand::Navigate { id: id.into() })
    }

    pub fn reset(&self) -> Result<()> {
        self.send(PanelCommand::Reset)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(PanelCommand::Shutdown)
    }

    /// Copy of the current state
    pub fn state(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

pub struct Panel {
    host: Arc<dyn PageHost>,
    config: PanelConfig,
    extractor: Extractor,
    navigator: Navigator,
    tracker: TabTracker,
    state: PanelState,
    timers: Timers,
    generation: u64,
    in_flight: usize,
    commands: mpsc::UnboundedReceiver<PanelCommand>,
    reports_tx: mpsc::UnboundedSender<TaskReport>,
    reports: mpsc::UnboundedReceiver<TaskReport>,
    published: watch::Sender<PanelState>,
}

impl Panel {
    pub fn new(host: Arc<dyn PageHost>, config: PanelConfig) -> (Self, PanelHandle) {
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (reports_tx, reports) = mpsc::unbounded_channel();
        let (published, state_rx) = watch::channel(PanelState::default());

        let panel = Self {
            host,
            config,
            extractor: Extractor::new(config.extract),
            navigator: Navigator::new(config.highlight),
            tracker: TabTracker::new(),
            state: PanelState::default(),
            timers: Timers::new(),
            generation: 0,
            in_flight: 0,
            commands,
            reports_tx,
            reports,
            published,
        };

        (panel, PanelHandle { commands: commands_tx, state: state_rx })
    }

    /// Create a panel and run it on the current tokio runtime
    pub fn spawn(host: Arc<dyn PageHost>, config: PanelConfig) -> (PanelHandle, JoinHandle<()>) {
        let (panel, handle) = Self::new(host, config);
        (handle, tokio::spawn(panel.run()))
    }

    /// Process commands until shut down or every handle is dropped
    pub async fn run(mut self) {
        log::debug!("Panel started");
        self.start_refresh(false);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(PanelCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(report) = self.reports.recv() => self.handle_report(report),
                kind = self.timers.next_expired() => self.handle_timer(kind),
            }
        }

        self.timers.clear();
        log::debug!("Panel stopped");
    }

    fn handle_command(&mut self, command: PanelCommand) {
        match command {
            PanelCommand::Browser(event) => self.handle_browser_event(event),
            PanelCommand::Refresh { manual } => self.start_refresh(manual),
            PanelCommand::Navigate { id } => self.start_navigation(id),
            PanelCommand::Reset => {
                self.state.result = None;
                self.publish();
            }
            PanelCommand::Shutdown => {}
        }
    }

    fn handle_browser_event(&mut self, event: BrowserEvent) {
        let decision = match &event {
            BrowserEvent::UrlUpdated { tab_id, url, active } => {
                self.tracker.on_url_updated(tab_id, url.as_deref(), *active)
            }
            BrowserEvent::TabActivated { tab_id, url } => self.tracker.on_tab_activated(tab_id, url.as_deref()),
            BrowserEvent::WindowResized => {
                self.timers.schedule(TimerKind::ResizeDebounce, self.config.resize_debounce);
                return;
            }
        };

        match decision {
            TrackerDecision::Resync => self.clear_and_resync(),
            TrackerDecision::Ignore => {
                let url = self.tracker.url().map(str::to_string);
                if url.is_some() && url != self.state.url {
                    self.state.url = url;
                    self.publish();
                }
            }
        }
    }

    fn handle_timer(&mut self, kind: TimerKind) {
        log::trace!("{:?} timer fired", kind);
        match kind {
            TimerKind::Settle | TimerKind::ResizeDebounce => self.start_refresh(false),
            TimerKind::LoadingHold => {
                self.update_loading();
                self.publish();
            }
        }
    }

    /// Navigation happened: forget the old outline now, re-extract once the page settles
    fn clear_and_resync(&mut self) {
        self.generation += 1;
        self.state.result = None;
        self.state.selected = None;
        self.state.url = self.tracker.url().map(str::to_string);
        self.timers.schedule(TimerKind::Settle, self.config.settle_delay);
        self.publish();
    }

    fn start_refresh(&mut self, manual: bool) {
        self.generation += 1;
        self.in_flight += 1;
        let generation = self.generation;
        self.update_loading();
        self.publish();

        let host = Arc::clone(&self.host);
        let extractor = self.extractor;
        let reports = self.reports_tx.clone();

        tokio::spawn(async move {
            let outcome = match host.active_tab().await {
                Err(e) => RefreshOutcome::TabQueryFailed(e),
                Ok(tab) => match extractor.extract(host.as_ref(), &tab.id).await {
                    Ok(result) => RefreshOutcome::Extracted { tab, result },
                    Err(error) => RefreshOutcome::ExtractionFailed { tab, error },
                },
            };
            let _ = reports.send(TaskReport::Refreshed { generation, manual, outcome });
        });
    }

    fn start_navigation(&mut self, id: String) {
        self.state.selected = Some(id.clone());
        self.publish();

        let host = Arc::clone(&self.host);
        let navigator = self.navigator;
        let reports = self.reports_tx.clone();

        tokio::spawn(async move {
            let outcome = navigator.scroll_to(host.as_ref(), &id).await;
            let _ = reports.send(TaskReport::Navigated { id, outcome });
        });
    }

    fn handle_report(&mut self, report: TaskReport) {
        match report {
            TaskReport::Refreshed { generation, manual, outcome } => {
                self.finish_refresh(generation, manual, outcome)
            }
            TaskReport::Navigated { id, outcome } => {
                log::debug!("Navigation to '{}': {:?}", id, outcome);
            }
        }
    }

    fn finish_refresh(&mut self, generation: u64, manual: bool, outcome: RefreshOutcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let current = generation == self.generation;

        match outcome {
            RefreshOutcome::TabQueryFailed(e) => {
                log::warn!("Error getting current tab: {}", e);
            }
            RefreshOutcome::ExtractionFailed { tab, error } => {
                if current {
                    self.sync_tab(&tab);
                }
                log::warn!("Error analyzing content of tab {}: {}", tab.id, error);
            }
            RefreshOutcome::Extracted { tab, result } if current => {
                self.sync_tab(&tab);
                log::debug!(
                    "Extracted {} items ({} headings) from {}",
                    result.stats().total,
                    result.stats().headings,
                    result.url()
                );
                self.state.result = Some(Arc::new(result));
            }
            RefreshOutcome::Extracted { result, .. } => {
                log::debug!(
                    "Discarding stale extraction of {} (generation {} < {})",
                    result.url(),
                    generation,
                    self.generation
                );
            }
        }

        if manual {
            self.timers.schedule(TimerKind::LoadingHold, self.config.manual_refresh_hold);
        }
        self.update_loading();
        self.publish();
    }

    /// Seed the tracker from a query result; tab events own it afterwards
    fn sync_tab(&mut self, tab: &TabInfo) {
        if self.tracker.adopt_if_idle(tab) {
            self.state.url = self.tracker.url().map(str::to_string);
        }
    }

    fn update_loading(&mut self) {
        self.state.loading = self.in_flight > 0 || self.timers.is_pending(TimerKind::LoadingHold);
    }

    fn publish(&self) {
        self.published.send_if_modified(|published| {
            if *published == self.state {
                false
            } else {
                *published = self.state.clone();
                true
            }
        });
    }
}
