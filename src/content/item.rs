use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Heading,
    Paragraph,
    Link,
    Image,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Heading => "heading",
            ContentKind::Paragraph => "paragraph",
            ContentKind::Link => "link",
            ContentKind::Image => "image",
        };
        f.write_str(name)
    }
}

/// Heading level, always within 1..=6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    /// Level from a tag name such as `h3`; anything unrecognised counts as level 1
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        let mut chars = tag.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('h' | 'H'), Some(digit), None) => digit
                .to_digit(10)
                .and_then(|d| Self::new(d as u8))
                .unwrap_or(Self(1)),
            _ => Self(1),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("heading level {} out of range 1-6", value))
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// One entry of the page outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Heading {
        tag: String,
        level: HeadingLevel,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Paragraph {
        tag: String,
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Link {
        tag: String,
        text: String,
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Image {
        tag: String,
        src: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
}

impl ContentItem {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Heading { .. } => ContentKind::Heading,
            ContentItem::Paragraph { .. } => ContentKind::Paragraph,
            ContentItem::Link { .. } => ContentKind::Link,
            ContentItem::Image { .. } => ContentKind::Image,
        }
    }

    /// Lowercase tag name of the source element
    pub fn tag(&self) -> &str {
        match self {
            ContentItem::Heading { tag, .. }
            | ContentItem::Paragraph { tag, .. }
            | ContentItem::Link { tag, .. }
            | ContentItem::Image { tag, .. } => tag,
        }
    }

    /// Display text; images have none (their alt text is separate)
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentItem::Heading { text, .. }
            | ContentItem::Paragraph { text, .. }
            | ContentItem::Link { text, .. } => Some(text),
            ContentItem::Image { .. } => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            ContentItem::Heading { id, .. }
            | ContentItem::Paragraph { id, .. }
            | ContentItem::Link { id, .. }
            | ContentItem::Image { id, .. } => id.as_deref(),
        }
    }

    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            ContentItem::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.kind() == ContentKind::Heading
    }
}
