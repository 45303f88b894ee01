//! Machine name cascade

use crate::extract::text::{bracketed_quote, compact_text};
use crate::extract::PageContext;
use scraper::Selector;
use std::sync::LazyLock;

static HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));

/// Headings this long are page copy, not a machine name
const MAX_HEADING_CHARS: usize = 200;

/// Sources for the machine name, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// The table row labelled `自販機名`
    Table,
    /// The first `<h1>`, preferring a `「…」` quote inside it
    Heading,
    /// The `<title>`, preferring a `「…」` quote, else the part before `-`/`|`
    Title,
}

impl NameSource {
    pub const CASCADE: [NameSource; 3] = [Self::Table, Self::Heading, Self::Title];

    /// Tries this source alone
    pub fn extract(self, page: &PageContext<'_>) -> Option<String> {
        match self {
            Self::Table => page.table.name.clone(),
            Self::Heading => {
                let heading = compact_text(page.document.select(&HEADING).next()?);
                if let Some(quoted) = bracketed_quote(&heading) {
                    return Some(quoted.to_string());
                }
                (!heading.is_empty() && heading.chars().count() < MAX_HEADING_CHARS)
                    .then_some(heading)
            }
            Self::Title => {
                let title = compact_text(page.document.select(&TITLE).next()?);
                if let Some(quoted) = bracketed_quote(&title) {
                    return Some(quoted.to_string());
                }
                let before_separator = match title.find(['-', '|']) {
                    Some(idx) => title[..idx].trim_end(),
                    None => title.as_str(),
                };
                (!before_separator.is_empty()).then(|| before_separator.to_string())
            }
        }
    }
}

/// Runs the name cascade, stopping at the first source with a value
pub fn extract_name(page: &PageContext<'_>) -> Option<String> {
    NameSource::CASCADE.iter().find_map(|source| {
        let name = source.extract(page)?;
        tracing::trace!("Name from {:?}: {}", source, name);
        Some(name)
    })
}
