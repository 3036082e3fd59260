//! Merge orchestration.
//!
//! [`merge`] takes the source files as byte buffers plus a parsed
//! script and produces the assembled output as bytes. The flow is:
//! open every source up front (aborting on the first encrypted one),
//! apply the commands in order against an
//! [`OutputBuilder`](crate::engine::OutputBuilder) while collecting
//! remapped bookmarks, install the outline, trim for print mode, and
//! serialize.
//!
//! All documents are owned by the call and dropped on every return
//! path, success or error.

pub mod trim;

use std::time::{Duration, Instant};

use crate::engine::outline::{Bookmark, install_outline};
use crate::engine::{self, OutputBuilder, SourceDocument};
use crate::error::{PdfWeaveError, Result};
use crate::script::ParsedScript;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of source documents opened.
    pub files_opened: usize,

    /// Number of script commands applied (no-op commands included).
    pub commands_applied: usize,

    /// Pages written to the output before any trimming.
    pub pages_written: usize,

    /// Bookmarks installed in the output outline.
    pub bookmarks_added: usize,

    /// Trailing blank pages removed in print mode.
    pub pages_trimmed: usize,

    /// Total time taken for the merge.
    pub merge_time: Duration,
}

/// Result of a merge operation.
pub struct MergeReport {
    /// The serialized output document.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Merge source files according to a parsed script.
///
/// `files` is indexed by the script's 1-based file references, in the
/// order the files were supplied.
///
/// # Errors
///
/// Returns [`PdfWeaveError::EncryptedSource`] for the first encrypted
/// source (with its 1-based position),
/// [`PdfWeaveError::UnreadableDocument`] when a source does not parse,
/// and [`PdfWeaveError::EngineFailure`] when page copying or
/// serialization fails.
pub fn merge(files: &[Vec<u8>], script: &ParsedScript) -> Result<Vec<u8>> {
    merge_with_report(files, script).map(|report| report.bytes)
}

/// Like [`merge`], but also reports statistics.
pub fn merge_with_report(files: &[Vec<u8>], script: &ParsedScript) -> Result<MergeReport> {
    let start = Instant::now();

    // Open everything before copying anything, so a bad source aborts
    // the request with nothing written.
    let mut sources = Vec::with_capacity(files.len());
    for (position, bytes) in files.iter().enumerate() {
        let source = SourceDocument::open(bytes)?;
        if source.is_encrypted() {
            return Err(PdfWeaveError::EncryptedSource {
                position: position + 1,
            });
        }
        sources.push(source);
    }

    let mut builder = OutputBuilder::new();
    let mut bookmarks: Vec<Bookmark> = Vec::new();
    let mut cursor = 0usize;
    let mut commands_applied = 0usize;

    for command in &script.commands {
        commands_applied += 1;

        let source = &sources[command.file_index - 1];
        let pages = command.page_range.expand(source.page_count());
        if pages.is_empty() {
            continue;
        }

        if script.options.keep_bookmarks {
            collect_bookmarks(source, command.file_index, &pages, cursor, &mut bookmarks);
        }

        builder.append_pages(source, &pages)?;
        cursor += pages.len();
    }

    let mut document = builder.finish()?;

    let bookmarks_added = if script.options.keep_bookmarks {
        install_outline(&mut document, &bookmarks)?;
        bookmarks.len()
    } else {
        0
    };

    let pages_trimmed = if script.options.print_mode {
        trim::trim_trailing_blank_pages(&mut document)
    } else {
        0
    };

    let bytes = engine::serialize(document)?;

    Ok(MergeReport {
        bytes,
        statistics: MergeStatistics {
            files_opened: sources.len(),
            commands_applied,
            pages_written: cursor,
            bookmarks_added,
            pages_trimmed,
            merge_time: start.elapsed(),
        },
    })
}

/// Collect the bookmarks one command contributes to the output.
///
/// A source with any outline entries gets a synthetic level-1 marker at
/// the first page this command writes. Each source entry whose target
/// page made it into the selection is carried over one level deeper,
/// pointing at the first occurrence of that page in the selection.
fn collect_bookmarks(
    source: &SourceDocument,
    file_index: usize,
    pages: &[usize],
    cursor: usize,
    bookmarks: &mut Vec<Bookmark>,
) {
    let outline = source.outline();
    if outline.is_empty() {
        return;
    }

    bookmarks.push(Bookmark {
        level: 1,
        title: format!("File {file_index}"),
        page: cursor + 1,
    });

    for entry in &outline {
        if let Some(page) = entry.page
            && let Some(position) = pages.iter().position(|&p| p + 1 == page)
        {
            bookmarks.push(Bookmark {
                level: entry.level + 1,
                title: entry.title.clone(),
                page: cursor + position + 1,
            });
        }
    }
}
