//! The structured information table on machine pages
//!
//! Pages describe a machine in a `table.has-fixed-layout` whose rows pair a
//! Japanese label cell with a value cell. This is the primary source for
//! every text field.

use crate::extract::text::{compact_text, line_text};
use scraper::{Html, Selector};
use std::sync::LazyLock;

static INFO_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.has-fixed-layout").expect("valid selector"));
static TABLE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TABLE_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th, td").expect("valid selector"));

/// Separators between items in list-valued cells
const LIST_SEPARATORS: &[char] = &['、', ',', '・', '\n', '/'];

/// Which field a table row feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Name,
    Address,
    Merchandise,
    Categories,
    Feature,
}

impl RowKind {
    /// Classifies a row label; the first matching kind wins
    fn classify(label: &str) -> Option<Self> {
        if label.contains("自販機名") {
            Some(Self::Name)
        } else if label.contains("所在地") || label.contains("住所") {
            Some(Self::Address)
        } else if label == "商品" {
            Some(Self::Merchandise)
        } else if label.contains("ジャンル") || label.contains("カテゴリ") {
            Some(Self::Categories)
        } else if label.contains("特徴") {
            Some(Self::Feature)
        } else {
            None
        }
    }
}

/// Field values read from the information table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub merchandise: Vec<String>,
    pub categories: Vec<String>,
    pub features: Vec<String>,
}

impl TableFields {
    /// Reads the first information table in the document
    ///
    /// Single-valued fields and list fields keep the first non-empty row;
    /// every non-empty feature row is appended.
    pub fn parse(document: &Html) -> Self {
        let mut fields = Self::default();

        let Some(table) = document.select(&INFO_TABLE).next() else {
            return fields;
        };

        for row in table.select(&TABLE_ROW) {
            let mut cells = row.select(&TABLE_CELL);
            let (Some(label_cell), Some(value_cell)) = (cells.next(), cells.next()) else {
                continue;
            };

            let label = compact_text(label_cell);
            let Some(kind) = RowKind::classify(&label) else {
                continue;
            };

            match kind {
                RowKind::Name => fill_once(&mut fields.name, compact_text(value_cell)),
                RowKind::Address => fill_once(&mut fields.address, compact_text(value_cell)),
                RowKind::Merchandise => {
                    if fields.merchandise.is_empty() {
                        fields.merchandise = split_list(&line_text(value_cell));
                    }
                }
                RowKind::Categories => {
                    if fields.categories.is_empty() {
                        fields.categories = split_list(&line_text(value_cell));
                    }
                }
                RowKind::Feature => {
                    let value = compact_text(value_cell);
                    if !value.is_empty() {
                        fields.features.push(value);
                    }
                }
            }
        }

        fields
    }
}

fn fill_once(slot: &mut Option<String>, value: String) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value);
    }
}

/// Splits a list cell on `、 , ・ newline /`, dropping empty pieces
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATORS)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rows: &str) -> TableFields {
        let html = format!(
            r#"<html><body><table class="has-fixed-layout"><tbody>{}</tbody></table></body></html>"#,
            rows
        );
        TableFields::parse(&Html::parse_document(&html))
    }

    #[test]
    fn test_reads_all_fields() {
        let fields = parse(
            "<tr><th>自販機名</th><td>Test Machine</td></tr>\
             <tr><th>所在地</th><td>東京都新宿区1-2-3</td></tr>\
             <tr><th>商品</th><td>煎餅、うどん・そば</td></tr>\
             <tr><th>ジャンル</th><td>食品 / 麺類</td></tr>\
             <tr><th>自販機特徴</th><td>24時間稼働</td></tr>\
             <tr><th>商品価格帯</th><td>500円</td></tr>",
        );

        assert_eq!(fields.name.as_deref(), Some("Test Machine"));
        assert_eq!(fields.address.as_deref(), Some("東京都新宿区1-2-3"));
        assert_eq!(fields.merchandise, vec!["煎餅", "うどん", "そば"]);
        assert_eq!(fields.categories, vec!["食品", "麺類"]);
        assert_eq!(fields.features, vec!["24時間稼働"]);
    }

    #[test]
    fn test_address_label_variant() {
        let fields = parse("<tr><td>住所</td><td>大阪府大阪市</td></tr>");
        assert_eq!(fields.address.as_deref(), Some("大阪府大阪市"));
    }

    #[test]
    fn test_merchandise_label_must_be_exact() {
        let fields = parse("<tr><th>商品価格帯</th><td>100円, 200円</td></tr>");
        assert!(fields.merchandise.is_empty());
    }

    #[test]
    fn test_line_breaks_split_items() {
        let fields = parse("<tr><th>商品</th><td>煎餅<br>うどん<br> </td></tr>");
        assert_eq!(fields.merchandise, vec!["煎餅", "うどん"]);
    }

    #[test]
    fn test_inline_markup_does_not_split_items() {
        let fields = parse(
            "<tr><th>商品</th><td>うどん<small>(冷凍)</small>、<b>そば</b>セット</td></tr>\
             <tr><th>カテゴリ</th><td><a href=\"/c/1\">麺</a>類<br><span>冷凍</span>食品</td></tr>",
        );
        assert_eq!(fields.merchandise, vec!["うどん(冷凍)", "そばセット"]);
        assert_eq!(fields.categories, vec!["麺類", "冷凍食品"]);
    }

    #[test]
    fn test_multiple_feature_rows_append() {
        let fields = parse(
            "<tr><th>特徴</th><td>屋外</td></tr><tr><th>自販機特徴</th><td>レトロ</td></tr><tr><th>特徴</th><td></td></tr>",
        );
        assert_eq!(fields.features, vec!["屋外", "レトロ"]);
    }

    #[test]
    fn test_first_non_empty_name_wins() {
        let fields = parse(
            "<tr><th>自販機名</th><td> </td></tr><tr><th>自販機名</th><td>A</td></tr><tr><th>自販機名</th><td>B</td></tr>",
        );
        assert_eq!(fields.name.as_deref(), Some("A"));
    }

    #[test]
    fn test_single_cell_rows_are_ignored() {
        let fields = parse("<tr><th>自販機名</th></tr>");
        assert_eq!(fields, TableFields::default());
    }

    #[test]
    fn test_other_tables_are_ignored() {
        let html = "<table><tr><th>自販機名</th><td>Wrong</td></tr></table>";
        let fields = TableFields::parse(&Html::parse_document(html));
        assert_eq!(fields.name, None);
    }

    #[test]
    fn test_split_list_discards_empty_pieces() {
        assert_eq!(split_list("a、、b,/ c ・"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
