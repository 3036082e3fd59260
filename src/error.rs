//! Error types for pdfweave.
//!
//! All failures funnel into [`PdfWeaveError`]. The script-facing variants
//! carry the offending fragment verbatim so callers can echo it back;
//! engine-facing variants wrap whatever the PDF engine reported.
//!
//! # Error Categories
//!
//! - **Script errors**: a line of the merge command script does not match
//!   the grammar, or references a file that was not supplied.
//! - **Document errors**: an input is encrypted or not a PDF at all.
//! - **Engine errors**: the PDF engine failed mid-copy or mid-serialize.
//! - **CLI errors**: input collection and output handling on the binary side.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfweave operations.
pub type Result<T> = std::result::Result<T, PdfWeaveError>;

/// Main error type for pdfweave operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfWeaveError {
    /// An option line in the script is not one of the recognized options.
    #[error("unknown option: {option}")]
    UnknownOption {
        /// The option line as written, including the leading `--`.
        option: String,
    },

    /// A script line is neither an option line nor `<index>:<range>`.
    #[error("malformed line: {line}")]
    MalformedLine {
        /// The offending line, trimmed.
        line: String,
    },

    /// A page-range expression does not match the range grammar.
    #[error("invalid page range: {range}")]
    InvalidPageRange {
        /// The expression as written.
        range: String,
    },

    /// A command references a file index outside the supplied file list.
    #[error("file index {index} is out of range: {file_count} file(s) supplied")]
    FileIndexOutOfRange {
        /// The 1-based index the script asked for.
        index: usize,
        /// Number of files actually supplied.
        file_count: usize,
    },

    /// A source document is encrypted; the whole request is rejected.
    #[error("file {position} is encrypted and cannot be processed")]
    EncryptedSource {
        /// 1-based position of the encrypted file in the input list.
        position: usize,
    },

    /// The bytes do not parse as a PDF document at all.
    #[error("not a readable PDF document: {details}")]
    UnreadableDocument {
        /// What the engine reported while parsing.
        details: String,
    },

    /// The PDF engine failed during page copying or serialization.
    #[error("document engine failure: {reason}")]
    EngineFailure {
        /// Description of the engine failure.
        reason: String,
    },

    /// No input files were supplied to merge.
    #[error("no input files specified")]
    NoInputFiles,

    /// An input pattern could not be expanded.
    #[error("invalid input pattern '{pattern}': {details}")]
    InvalidInputPattern {
        /// The pattern as given on the command line.
        pattern: String,
        /// Why expansion failed.
        details: String,
    },

    /// The output file exists and overwriting was not requested.
    #[error("output file already exists: {path}\n  Use --force to overwrite")]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl From<lopdf::Error> for PdfWeaveError {
    fn from(err: lopdf::Error) -> Self {
        Self::engine_failure(err.to_string())
    }
}

impl PdfWeaveError {
    /// Create an UnknownOption error.
    pub fn unknown_option(option: impl Into<String>) -> Self {
        Self::UnknownOption {
            option: option.into(),
        }
    }

    /// Create a MalformedLine error.
    pub fn malformed_line(line: impl Into<String>) -> Self {
        Self::MalformedLine { line: line.into() }
    }

    /// Create an InvalidPageRange error.
    pub fn invalid_page_range(range: impl Into<String>) -> Self {
        Self::InvalidPageRange {
            range: range.into(),
        }
    }

    /// Create an UnreadableDocument error.
    pub fn unreadable_document(details: impl Into<String>) -> Self {
        Self::UnreadableDocument {
            details: details.into(),
        }
    }

    /// Create an EngineFailure error.
    pub fn engine_failure(reason: impl Into<String>) -> Self {
        Self::EngineFailure {
            reason: reason.into(),
        }
    }

    /// Check whether this error was raised while parsing the command script.
    ///
    /// Script errors are always detected before any document is opened.
    pub fn is_script_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownOption { .. }
                | Self::MalformedLine { .. }
                | Self::InvalidPageRange { .. }
                | Self::FileIndexOutOfRange { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownOption { .. }
            | Self::MalformedLine { .. }
            | Self::InvalidPageRange { .. }
            | Self::FileIndexOutOfRange { .. } => 1,
            Self::NoInputFiles | Self::InvalidInputPattern { .. } => 2,
            Self::EncryptedSource { .. } | Self::UnreadableDocument { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::Io { .. } => 5,
            Self::EngineFailure { .. } => 6,
        }
    }
}
