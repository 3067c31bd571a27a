use std::collections::HashSet;

const ID_PREFIX: &str = "outline-";
const FALLBACK_SLUG: &str = "section";

/// Lowercase the text and join its alphanumeric runs with `-`.
///
/// Alphanumeric means Unicode `Alphabetic` or `Numeric`, which is what
/// `[^\p{Alphabetic}\p{N}]` splits on in `collect_content.js`. Combining
/// vowel signs are `Alphabetic`, so they stay inside a run.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Hands out element ids for headings that have none, never repeating an
/// id already present in the document.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    pub fn new<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { taken: existing.into_iter().map(Into::into).collect() }
    }

    pub fn allocate(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let base = if slug.is_empty() {
            format!("{}{}", ID_PREFIX, FALLBACK_SLUG)
        } else {
            format!("{}{}", ID_PREFIX, slug)
        };

        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        self.taken.insert(candidate.clone());
        candidate
    }
}
