use chrono::{DateTime, FixedOffset};
use regex::Regex;

use crate::dates;
use crate::types::ChangeEntry;

/// Extract product names from a classification tag term.
///
/// Product names are everything after `general:products/` and before the next
/// comma or the end of the string; multiple matches are joined by a single
/// space. A term without product markers yields the empty string, which is
/// defined behavior rather than an error.
pub fn extract_product_names(tag_term: &str) -> String {
    let pattern =
        Regex::new(r"general:products/(.*?)(?:,|$)").expect("Invalid product tag regex");

    pattern
        .captures_iter(tag_term)
        .map(|capture| capture[1].to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build one output row from a feed entry.
///
/// Field order is fixed and part of the output contract: consumers of the
/// uploaded file rely on it. The caller passes the parsed `published`
/// timestamp it already holds from filtering; `short` drops id, link and
/// summary. Fields are joined with `"; "` and free-text fields are not
/// escaped.
pub fn format_row(entry: &ChangeEntry, published: DateTime<FixedOffset>, short: bool) -> String {
    let products = extract_product_names(entry.tags.first().map(String::as_str).unwrap_or(""));
    let published = dates::format_timestamp(&published);

    if short {
        format!("{}; {}; {}", products, published, entry.title)
    } else {
        format!(
            "{}; {}; {}; {}; {}; {}",
            entry.id, products, published, entry.link, entry.title, entry.summary
        )
    }
}
