//! Street address cascade

use crate::extract::text::visible_strings;
use crate::extract::PageContext;
use regex::Regex;
use std::sync::LazyLock;

/// Postal code followed by a prefecture-initial place name and a block number
static POSTAL_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"〒?\d{3}-?\d{4}\s*[東京都北海道大阪府京都府].+?[0-9０-９\-ー]+")
        .expect("valid postal address regex")
});

/// Longer text runs are paragraphs that merely mention an address
const MAX_ADDRESS_CHARS: usize = 100;

/// Sources for the street address, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    /// The table row labelled `所在地` or `住所`
    Table,
    /// The first short visible text run that looks like a postal address
    PostalText,
}

impl AddressSource {
    pub const CASCADE: [AddressSource; 2] = [Self::Table, Self::PostalText];

    pub fn extract(self, page: &PageContext<'_>) -> Option<String> {
        match self {
            Self::Table => page.table.address.clone(),
            Self::PostalText => visible_strings(page.document)
                .find(|text| {
                    POSTAL_ADDRESS_RE.is_match(text) && text.chars().count() < MAX_ADDRESS_CHARS
                })
                .map(str::to_string),
        }
    }
}

/// Runs the address cascade, stopping at the first source with a value
pub fn extract_address(page: &PageContext<'_>) -> Option<String> {
    AddressSource::CASCADE.iter().find_map(|source| {
        let address = source.extract(page)?;
        tracing::trace!("Address from {:?}: {}", source, address);
        Some(address)
    })
}
