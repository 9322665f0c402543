//! Assembles per-page text into the single blob the pipeline works on.

use sitfis_extract_models::PageText;

/// Separator placed between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Joins `pages` in page-number order, separated by a blank line.
///
/// Pages are ordered by [`PageText::page_number`], not by their position in
/// the slice. Pages sharing a number keep their relative order.
#[must_use]
pub fn assemble(pages: &[PageText]) -> String {
    let mut ordered: Vec<&PageText> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page_number);

    let text = ordered
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    log::debug!(
        "Assembled {} page(s) into {} characters",
        pages.len(),
        text.len()
    );

    text
}
