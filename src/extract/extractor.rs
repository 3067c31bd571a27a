use crate::content::{ContentItem, ExtractionResult, HeadingLevel};
use crate::error::Result;
use crate::extract::element::PageElement;
use crate::extract::snapshot::PageSnapshot;
use crate::extract::ExtractOptions;
use crate::host::{PageHost, PageScript, TabId};

/// Paragraphs must be longer than this (trimmed, in characters)
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// Paragraph text is cut to this many characters before the ellipsis
pub const MAX_PARAGRAPH_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Builds outline snapshots from the active page
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn script(&self) -> PageScript {
        PageScript::CollectContent(self.options)
    }

    /// Run the collector in `tab` and apply the extraction policy to its output
    pub async fn extract(&self, host: &dyn PageHost, tab: &TabId) -> Result<ExtractionResult> {
        let value = host.execute(tab, &self.script()).await?;
        let snapshot = PageSnapshot::from_value(value)?;
        log::debug!("Collected {} candidates from {}", snapshot.elements.len(), snapshot.url);
        Ok(self.build(snapshot))
    }

    /// Turn collector output into a result. Order of the snapshot is kept.
    pub fn build(&self, snapshot: PageSnapshot) -> ExtractionResult {
        let content = snapshot.elements.iter().filter_map(|element| self.item_for(element)).collect();
        ExtractionResult::new(content, snapshot.url, snapshot.timestamp)
    }

    fn item_for(&self, element: &PageElement) -> Option<ContentItem> {
        let id = element.id().map(str::to_string);
        if self.options.require_identifier && id.is_none() {
            return None;
        }

        let tag = element.tag_name.clone();
        let text = element.trimmed_text();

        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => (!text.is_empty()).then(|| ContentItem::Heading {
                level: HeadingLevel::from_tag(&tag),
                text: text.to_string(),
                tag,
                id,
            }),
            "p" => (text.chars().count() > MIN_PARAGRAPH_CHARS).then(|| ContentItem::Paragraph {
                text: truncate(text, MAX_PARAGRAPH_CHARS),
                tag,
                id,
            }),
            "a" if self.options.include_links => {
                let href = element.get_attribute("href").unwrap_or_default();
                (!href.is_empty() && !text.is_empty()).then(|| ContentItem::Link {
                    text: text.to_string(),
                    href: href.to_string(),
                    tag,
                    id,
                })
            }
            "img" if self.options.include_images => {
                let src = element.get_attribute("src").unwrap_or_default();
                (!src.is_empty()).then(|| ContentItem::Image {
                    src: src.to_string(),
                    alt: element.get_attribute("alt").unwrap_or_default().to_string(),
                    tag,
                    id,
                })
            }
            _ => None,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
