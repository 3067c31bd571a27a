//! Plain-text rendering of the panel for terminals

use crate::content::{ContentItem, ExtractionResult};
use crate::panel::PanelState;
use std::fmt::Write;

const INDENT: &str = "  ";

/// View toggles of the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Prefix entries with their tag name, e.g. `<h2>`
    pub show_tags: bool,
    /// List only headings
    pub headings_only: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { show_tags: false, headings_only: true }
    }
}

impl DisplayOptions {
    pub fn toggle_tags(&mut self) {
        self.show_tags = !self.show_tags;
    }

    pub fn toggle_headings_only(&mut self) {
        self.headings_only = !self.headings_only;
    }
}

/// Items shown for `result`, in display (and numbering) order
pub fn visible_items<'a>(result: &'a ExtractionResult, options: &DisplayOptions) -> Vec<&'a ContentItem> {
    result.content().iter().filter(|item| !options.headings_only || item.is_heading()).collect()
}

/// Element id behind the 1-based entry number shown to the user
pub fn entry_id<'a>(result: &'a ExtractionResult, options: &DisplayOptions, number: usize) -> Option<&'a str> {
    let index = number.checked_sub(1)?;
    visible_items(result, options).get(index)?.id()
}

pub fn render_panel(state: &PanelState, options: &DisplayOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Current URL: {}", state.url.as_deref().unwrap_or("No active tab"));
    if state.loading {
        let _ = writeln!(out, "Analyzing...");
    }
    out.push('\n');

    match state.result.as_deref().filter(|result| !result.is_empty()) {
        Some(result) => render_result(&mut out, result, state.selected.as_deref(), options),
        None if state.loading => out.push_str("Analyzing page content...\n"),
        None => out.push_str("No content found with IDs on this page. Make sure elements have ID attributes.\n"),
    }

    out
}

fn render_result(out: &mut String, result: &ExtractionResult, selected: Option<&str>, options: &DisplayOptions) {
    let stats = result.stats();
    let _ = writeln!(out, "Analysis Results");
    let _ = writeln!(
        out,
        "{}Total items: {}  Headings: {}  Links: {}  Images: {}  Paragraphs: {}",
        INDENT, stats.total, stats.headings, stats.links, stats.images, stats.paragraphs
    );
    let _ = writeln!(out, "{}Analyzed at: {}", INDENT, clock_time(result.timestamp()));
    let _ = writeln!(out, "\nContent Items:");

    for (i, item) in visible_items(result, options).into_iter().enumerate() {
        let marker = if selected.is_some() && item.id() == selected { '*' } else { ' ' };
        let _ = writeln!(out, "{}[{:>2}] {}", marker, i + 1, render_item(item, options));
    }
}

/// One outline line: indentation by heading level, `-` below h1
pub fn render_item(item: &ContentItem, options: &DisplayOptions) -> String {
    let tag = if options.show_tags { format!("<{}> ", item.tag()) } else { String::new() };

    match item {
        ContentItem::Heading { level, text, .. } => {
            let depth = usize::from(level.get() - 1);
            let prefix = if depth == 0 { "" } else { "-" };
            format!("{}{}{}{}", INDENT.repeat(depth), tag, prefix, collapse(text))
        }
        ContentItem::Paragraph { text, .. } => format!("{}¶ {}", tag, collapse(text)),
        ContentItem::Link { text, href, .. } => format!("{}→ {} <{}>", tag, collapse(text), href),
        ContentItem::Image { alt, src, .. } => format!("{}[img] {} <{}>", tag, collapse(alt), src),
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `HH:MM:SS UTC` for a millisecond epoch timestamp
fn clock_time(timestamp_ms: u64) -> String {
    let secs = (timestamp_ms / 1000) % 86_400;
    format!("{:02}:{:02}:{:02} UTC", secs / 3600, (secs / 60) % 60, secs % 60)
}
