//! The merge command script.
//!
//! A script is a small line-oriented language describing how to assemble
//! one PDF from an ordered list of source files:
//!
//! ```text
//! --keep-bookmarks
//! 1:all
//! 2:1,3-5
//! 1:2
//! ```
//!
//! Option lines (`--keep-bookmarks`, `--print`) may appear anywhere and
//! any number of times. Command lines are `<file>:<range>` where `<file>`
//! is a 1-based index into the supplied file list and `<range>` follows
//! the grammar in [`range`]. Blank lines are ignored. Command order is
//! the assembly order of the output.
//!
//! Parsing is pure and fails fast: no document is consulted, and the
//! first bad line aborts the whole script.

pub mod range;

use crate::error::{PdfWeaveError, Result};
use range::PageRange;

/// Option line for keeping source bookmarks in the output.
pub const OPT_KEEP_BOOKMARKS: &str = "--keep-bookmarks";
/// Option line for print mode (trailing blank pages are trimmed).
pub const OPT_PRINT: &str = "--print";

/// One `<file>:<range>` line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCommand {
    /// 1-based index into the supplied file list.
    pub file_index: usize,
    /// Validated page range, unexpanded.
    pub page_range: PageRange,
}

/// The option flags a script can set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Carry source bookmarks into the output, nested under per-file
    /// markers.
    pub keep_bookmarks: bool,
    /// Trim trailing blank pages from the output.
    pub print_mode: bool,
}

/// A fully validated script: commands in assembly order plus options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScript {
    /// Commands in the order they will be applied.
    pub commands: Vec<MergeCommand>,
    /// Options collected from anywhere in the script.
    pub options: MergeOptions,
}

impl ParsedScript {
    /// Render back to script text: options first, then one line per
    /// command. Parsing the result yields a structurally equal script.
    pub fn to_script(&self) -> String {
        let mut out = String::new();
        if self.options.keep_bookmarks {
            out.push_str(OPT_KEEP_BOOKMARKS);
            out.push('\n');
        }
        if self.options.print_mode {
            out.push_str(OPT_PRINT);
            out.push('\n');
        }
        for command in &self.commands {
            out.push_str(&format!("{}:{}\n", command.file_index, command.page_range));
        }
        out
    }
}

/// Parse a script against a known number of supplied files.
///
/// Returns the first error encountered, top to bottom:
/// [`PdfWeaveError::UnknownOption`] for an unrecognized `--` line,
/// [`PdfWeaveError::MalformedLine`] for anything that is not
/// `<digits>:<range>`, [`PdfWeaveError::FileIndexOutOfRange`] when the
/// index does not name a supplied file, and
/// [`PdfWeaveError::InvalidPageRange`] for a bad range expression.
///
/// A script with no command lines is valid and produces an empty merge.
///
/// # Examples
///
/// ```
/// use pdfweave::script::parse_script;
///
/// let script = parse_script("--print\n1:all\n2:3-5", 2).unwrap();
/// assert_eq!(script.commands.len(), 2);
/// assert!(script.options.print_mode);
/// assert!(!script.options.keep_bookmarks);
/// ```
pub fn parse_script(script: &str, file_count: usize) -> Result<ParsedScript> {
    let mut options = MergeOptions::default();
    let mut commands = Vec::new();

    for raw_line in script.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("--") {
            match line {
                OPT_KEEP_BOOKMARKS => options.keep_bookmarks = true,
                OPT_PRINT => options.print_mode = true,
                other => return Err(PdfWeaveError::unknown_option(other)),
            }
            continue;
        }

        let Some((index_part, range_part)) = line.split_once(':') else {
            return Err(PdfWeaveError::malformed_line(line));
        };
        let range_part = range_part.trim();

        // A command line needs both halves; an empty remainder is a bad
        // line, not a bad range.
        if range_part.is_empty()
            || index_part.is_empty()
            || !index_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(PdfWeaveError::malformed_line(line));
        }
        let file_index: usize = index_part
            .parse()
            .map_err(|_| PdfWeaveError::malformed_line(line))?;

        if file_index < 1 || file_index > file_count {
            return Err(PdfWeaveError::FileIndexOutOfRange {
                index: file_index,
                file_count,
            });
        }

        let page_range = PageRange::parse(range_part)?;

        commands.push(MergeCommand {
            file_index,
            page_range,
        });
    }

    Ok(ParsedScript { commands, options })
}
