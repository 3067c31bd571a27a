//! Page content extraction
//!
//! Extraction is split in two halves:
//! - an in-page collector (`collect_content.js`) that queries the DOM and
//!   returns candidate elements as a [`PageSnapshot`],
//! - the [`Extractor`] policy that turns a snapshot into an
//!   [`ExtractionResult`](crate::content::ExtractionResult).

pub mod element;
pub mod extractor;
pub mod ids;
pub mod snapshot;

pub use element::PageElement;
pub use extractor::{Extractor, MAX_PARAGRAPH_CHARS, MIN_PARAGRAPH_CHARS};
pub use ids::{IdAllocator, slugify};
pub use snapshot::PageSnapshot;

use serde::{Deserialize, Serialize};

/// Which elements make it into the outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Drop elements without an id attribute (they cannot be navigated to)
    pub require_identifier: bool,
    pub include_links: bool,
    pub include_images: bool,
    /// Give untagged headings a generated id in the page before collecting
    pub auto_generate_ids: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            require_identifier: true,
            include_links: false,
            include_images: false,
            auto_generate_ids: false,
        }
    }
}

impl ExtractOptions {
    pub fn require_identifier(mut self, required: bool) -> Self {
        self.require_identifier = required;
        self
    }

    pub fn include_links(mut self, include: bool) -> Self {
        self.include_links = include;
        self
    }

    pub fn include_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    pub fn auto_generate_ids(mut self, generate: bool) -> Self {
        self.auto_generate_ids = generate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_policy() {
        let options = ExtractOptions::default();
        assert!(options.require_identifier);
        assert!(!options.include_links);
        assert!(!options.include_images);
        assert!(!options.auto_generate_ids);
    }

    #[test]
    fn test_options_serialize_camel_case() {
        let options = ExtractOptions::default().include_images(true).auto_generate_ids(true);
        assert_eq!(
            serde_json::to_value(options).unwrap(),
            json!({
                "requireIdentifier": true,
                "includeLinks": false,
                "includeImages": true,
                "autoGenerateIds": true
            })
        );
    }
}
