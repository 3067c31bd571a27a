//! Outline data model
//!
//! - ContentItem: one heading, paragraph, link or image found on the page
//! - ContentStats: per-category counts
//! - ExtractionResult: immutable snapshot produced by one extraction

pub mod item;
pub mod result;

pub use item::{ContentItem, ContentKind, HeadingLevel};
pub use result::{ContentStats, ExtractionResult};
