use crate::error::Result;
use crate::extract::ExtractOptions;
use crate::navigate::HighlightTiming;
use serde_json::json;

const COLLECT_CONTENT_JS: &str = include_str!("../extract/collect_content.js");
const SCROLL_TO_ELEMENT_JS: &str = include_str!("../navigate/scroll_to_element.js");

/// A function the panel runs inside a page
#[derive(Debug, Clone, PartialEq)]
pub enum PageScript {
    /// Collect outline candidates; returns a `PageSnapshot` as a JSON string
    CollectContent(ExtractOptions),

    /// Scroll to and highlight the element with this id; returns `{"found": bool}` as a JSON string
    ScrollToElement { id: String, timing: HighlightTiming },
}

impl PageScript {
    pub fn name(&self) -> &'static str {
        match self {
            PageScript::CollectContent(_) => "collect_content",
            PageScript::ScrollToElement { .. } => "scroll_to_element",
        }
    }

    /// Self-invoking JavaScript expression with the arguments inlined as JSON
    pub fn to_javascript(&self) -> Result<String> {
        let source = match self {
            PageScript::CollectContent(options) => {
                format!("({})({})", COLLECT_CONTENT_JS.trim(), serde_json::to_string(options)?)
            }
            PageScript::ScrollToElement { id, timing } => {
                let timing = json!({
                    "visibleMs": timing.visible.as_millis() as u64,
                    "fadeMs": timing.fade.as_millis() as u64,
                });
                format!(
                    "({})({}, {})",
                    SCROLL_TO_ELEMENT_JS.trim(),
                    serde_json::to_string(id)?,
                    timing
                )
            }
        };
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_collect_script_inlines_options() {
        let script = PageScript::CollectContent(ExtractOptions::default().include_links(true));
        let js = script.to_javascript().unwrap();

        assert_eq!(script.name(), "collect_content");
        assert!(js.starts_with("((function (options)"));
        assert!(js.contains("\"includeLinks\":true"));
        assert!(js.contains("\"requireIdentifier\":true"));
    }

    #[test]
    fn test_scroll_script_escapes_id() {
        let script = PageScript::ScrollToElement {
            id: "a\"); alert(1); (\"".to_string(),
            timing: HighlightTiming { visible: Duration::from_millis(1000), fade: Duration::from_millis(250) },
        };
        let js = script.to_javascript().unwrap();

        assert!(js.contains(r#""a\"); alert(1); (\"""#));
        assert!(js.contains("\"fadeMs\":250"));
        assert!(js.contains("\"visibleMs\":1000"));
    }
}
