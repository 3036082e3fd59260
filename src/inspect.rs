//! Document inspection.
//!
//! [`analyze`] answers the three questions a caller needs before writing
//! a merge script against a file: how many pages it has, whether it
//! carries bookmarks, and whether it is encrypted.

use serde::{Deserialize, Serialize};

use crate::engine::SourceDocument;
use crate::error::Result;

/// Summary of one PDF document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Number of pages. Zero for encrypted documents.
    pub page_count: usize,
    /// Whether the document has any outline entries. False for
    /// encrypted documents.
    pub has_bookmarks: bool,
    /// Whether the document is encrypted.
    pub is_encrypted: bool,
}

/// Analyze a PDF given as raw bytes.
///
/// An encrypted document is reported as `{0, false, true}` without
/// touching its structure further; that is a successful analysis, not
/// an error. Bytes that do not parse as a PDF at all are
/// [`PdfWeaveError::UnreadableDocument`](crate::error::PdfWeaveError::UnreadableDocument).
pub fn analyze(bytes: &[u8]) -> Result<AnalysisResult> {
    let source = SourceDocument::open(bytes)?;

    if source.is_encrypted() {
        return Ok(AnalysisResult {
            page_count: 0,
            has_bookmarks: false,
            is_encrypted: true,
        });
    }

    Ok(AnalysisResult {
        page_count: source.page_count(),
        has_bookmarks: source.has_outline(),
        is_encrypted: false,
    })
}
