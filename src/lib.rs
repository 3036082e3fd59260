//! pdfweave - Assemble one PDF from many using a merge command script.
//!
//! This library turns an ordered list of PDF byte buffers plus a small
//! textual script into one merged document. The script selects source
//! files and page ranges per line; options control bookmark carry-over
//! and print-mode trimming of trailing blank pages. It supports:
//!
//! - A line-oriented merge command language with strict validation
//! - Lenient page-range expansion (clamped spans, silently dropped
//!   out-of-range pages, order and duplicates preserved)
//! - Bookmark remapping into the merged document, nested under
//!   per-file markers
//! - Trailing blank-page trimming for print workflows
//! - Document inspection (page count, bookmarks, encryption)
//! - Comprehensive error handling
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use pdfweave::{merge, script};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![
//!     std::fs::read("a.pdf")?,
//!     std::fs::read("b.pdf")?,
//! ];
//!
//! let parsed = script::parse_script("--keep-bookmarks\n1:all\n2:1-3", files.len())?;
//! let output = merge::merge(&files, &parsed)?;
//! std::fs::write("merged.pdf", output)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Inspecting a Document
//!
//! ```no_run
//! use pdfweave::inspect;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let info = inspect::analyze(&std::fs::read("input.pdf")?)?;
//! println!("{} pages, bookmarks: {}", info.page_count, info.has_bookmarks);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod merge;
pub mod output;
pub mod script;
pub mod utils;

// Re-export commonly used types
pub use error::{PdfWeaveError, Result};
pub use inspect::AnalysisResult;
pub use script::{ParsedScript, parse_script};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
