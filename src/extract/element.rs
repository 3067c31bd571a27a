use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Candidate element as reported by the in-page collector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageElement {
    /// Lowercase HTML tag name (e.g., "h2", "p", "a", "img")
    pub tag_name: String,

    /// Attributes the extractor cares about: id, href, src, alt.
    /// `href` and `src` are already resolved to absolute URLs by the page.
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text content of the element, untrimmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
}

impl PageElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: HashMap::new(),
            text_content: None,
        }
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set the id attribute
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attribute("id", id)
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Id attribute exactly as written, unless it is blank
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id").filter(|id| !id.trim().is_empty())
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.tag_name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    /// Trimmed text content, empty when absent
    pub fn trimmed_text(&self) -> &str {
        self.text_content.as_deref().map(str::trim).unwrap_or("")
    }
}
