use crate::error::{OutlineError, Result};
use crate::extract::element::PageElement;
use serde::{Deserialize, Serialize};

/// Raw output of the in-page collector, before the extraction policy runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// `window.location.href` at capture time
    pub url: String,

    /// Milliseconds since the Unix epoch
    pub timestamp: u64,

    /// Candidates grouped by category, each group in document order
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, timestamp: u64) -> Self {
        Self { url: url.into(), timestamp, elements: Vec::new() }
    }

    pub fn with_elements(mut self, elements: Vec<PageElement>) -> Self {
        self.elements = elements;
        self
    }

    /// Decode what the injected script returned.
    ///
    /// The collector returns a JSON string; an already-decoded object is accepted too.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if let Some(json_str) = value.as_str() {
            serde_json::from_str(json_str)
                .map_err(|e| OutlineError::ContentParseFailed(format!("Failed to parse snapshot JSON: {}", e)))
        } else if value.is_object() {
            serde_json::from_value(value)
                .map_err(|e| OutlineError::ContentParseFailed(format!("Failed to decode snapshot: {}", e)))
        } else {
            Err(OutlineError::ContentParseFailed(format!("Unexpected collector result: {}", value)))
        }
    }
}
