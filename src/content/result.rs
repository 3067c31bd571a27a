use crate::content::item::{ContentItem, ContentKind};
use serde::{Deserialize, Serialize};

/// Per-category counts of an extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStats {
    pub headings: usize,
    pub links: usize,
    pub images: usize,
    pub paragraphs: usize,
    pub total: usize,
}

impl ContentStats {
    pub fn from_items(items: &[ContentItem]) -> Self {
        let mut stats = Self::default();
        for item in items {
            match item.kind() {
                ContentKind::Heading => stats.headings += 1,
                ContentKind::Link => stats.links += 1,
                ContentKind::Image => stats.images += 1,
                ContentKind::Paragraph => stats.paragraphs += 1,
            }
        }
        stats.total = items.len();
        stats
    }

    /// `total` matches the category counts
    pub fn is_consistent(&self) -> bool {
        self.total == self.headings + self.links + self.images + self.paragraphs
    }
}

/// Snapshot of one extraction. Built once, then only ever replaced whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    content: Vec<ContentItem>,
    stats: ContentStats,
    url: String,
    /// Capture time in milliseconds since the Unix epoch
    timestamp: u64,
}

impl ExtractionResult {
    pub fn new(content: Vec<ContentItem>, url: impl Into<String>, timestamp: u64) -> Self {
        let stats = ContentStats::from_items(&content);
        Self { content, stats, url: url.into(), timestamp }
    }

    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }

    pub fn stats(&self) -> &ContentStats {
        &self.stats
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn headings(&self) -> impl Iterator<Item = &ContentItem> {
        self.content.iter().filter(|item| item.is_heading())
    }

    /// Find an item by its element id
    pub fn find(&self, id: &str) -> Option<&ContentItem> {
        self.content.iter().find(|item| item.id() == Some(id))
    }
}
