//! Extraction of internal wikilinks from article wikitext.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches `[[Title]]`, `[[Title|label]]`, `[[Title#section]]` and
    /// `[[Title/subpage]]`, capturing just `Title`. Non-greedy on the title
    /// group so that pipes, anchors and subpage separators are excluded from
    /// it rather than swallowed.
    static ref LINK_RE: Regex =
        Regex::new(r"\[\[([^\[\]:]+?)(?:[#/|][^\[\]]*)?\]\]").expect("static regex is valid");
}

/// Pull the internal article links out of a page's wikitext body, in order.
///
/// Links into other namespaces (anything containing `:`, e.g. `Category:`,
/// `File:`, `en:`) are dropped: the link graph only ever connects article
/// namespace (ns 0) pages. A title linked more than once appears more than
/// once in the result — duplicates are not collapsed, matching upstream.
pub fn extract_links(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for cap in LINK_RE.captures_iter(text) {
        let title = cap[1].trim();
        if title.is_empty() || title.contains(':') {
            continue;
        }
        out.push(title.to_owned());
    }
    out
}
