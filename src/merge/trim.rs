//! Trailing blank page removal for print mode.
//!
//! A page counts as blank when it has no extractable text (after
//! whitespace trimming) and no image XObject among its resources. The
//! heuristic deliberately ignores vector graphics, so a page holding
//! only lines or a watermark path is not considered blank.

use lopdf::Document;

use crate::engine;

/// Remove blank pages from the end of the document.
///
/// Stops at the first non-blank page, when only one page remains, or
/// when text extraction fails for the last page (an unreadable page is
/// treated as content, not absence of it). Returns the number of pages
/// removed. Running it again on its own output removes nothing.
pub fn trim_trailing_blank_pages(doc: &mut Document) -> usize {
    let mut removed = 0;

    loop {
        let pages = doc.get_pages();
        if pages.len() <= 1 {
            break;
        }
        let Some((&last_number, &last_id)) = pages.iter().next_back() else {
            break;
        };

        let blank = match engine::page_text(doc, last_number) {
            Ok(text) => text.trim().is_empty() && !engine::page_has_images(doc, last_id),
            Err(_) => false,
        };
        if !blank {
            break;
        }

        doc.delete_pages(&[last_number]);
        removed += 1;
    }

    removed
}
