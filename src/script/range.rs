//! Page range expressions.
//!
//! A range expression is either the keyword `all` or a comma-separated
//! list of single pages and spans, e.g. `1,3-5,2`. Page numbers are
//! 1-based in the expression; [`PageRange::expand`] converts to 0-based
//! indices against a concrete page count.
//!
//! Validation is strict (the grammar admits no whitespace, no empty
//! segments, no missing endpoints) but expansion is lenient: pages that
//! fall outside the document are silently dropped and spans are clamped,
//! so a range that validated against one document applies cleanly to a
//! shorter one.

use crate::error::{PdfWeaveError, Result};

/// One comma-separated segment of a range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    /// A single 1-based page number, e.g. `7`.
    Single(usize),
    /// An inclusive 1-based span, e.g. `2-9`.
    Span(usize, usize),
}

/// A validated page range expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRange {
    /// Every page of the source, in order.
    All,
    /// An explicit token list, order and repetition significant.
    Tokens(Vec<RangeToken>),
}

impl PageRange {
    /// Parse and validate a range expression.
    ///
    /// Accepts `all` (lowercase only) or `<seg>(,<seg>)*` where each
    /// segment is `<digits>` or `<digits>-<digits>`. A `0` is valid
    /// syntax and handled leniently at expansion time. Anything else,
    /// including embedded whitespace or empty segments, is an
    /// [`PdfWeaveError::InvalidPageRange`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfweave::script::range::PageRange;
    ///
    /// let range = PageRange::parse("1,3-5").unwrap();
    /// assert_eq!(range.expand(10), vec![0, 2, 3, 4]);
    ///
    /// assert!(PageRange::parse("1, 3").is_err());
    /// ```
    pub fn parse(expr: &str) -> Result<Self> {
        if expr == "all" {
            return Ok(Self::All);
        }

        let invalid = || PdfWeaveError::invalid_page_range(expr);

        if expr.is_empty() {
            return Err(invalid());
        }

        let mut tokens = Vec::new();
        for segment in expr.split(',') {
            let token = match segment.split_once('-') {
                Some((start, end)) => {
                    RangeToken::Span(parse_page(start).ok_or_else(invalid)?, parse_page(end).ok_or_else(invalid)?)
                }
                None => RangeToken::Single(parse_page(segment).ok_or_else(invalid)?),
            };
            tokens.push(token);
        }

        Ok(Self::Tokens(tokens))
    }

    /// Expand to 0-based page indices against a document of `page_count`
    /// pages.
    ///
    /// Order and duplicates are preserved exactly as written. Pages
    /// outside `1..=page_count` are dropped; spans are clamped at both
    /// ends, so a span starting at `0` begins at the first page. A span
    /// whose start exceeds its end contributes nothing. The result may
    /// be empty.
    pub fn expand(&self, page_count: usize) -> Vec<usize> {
        match self {
            Self::All => (0..page_count).collect(),
            Self::Tokens(tokens) => {
                let mut pages = Vec::new();
                for token in tokens {
                    match *token {
                        RangeToken::Single(n) => {
                            if n >= 1 && n <= page_count {
                                pages.push(n - 1);
                            }
                        }
                        RangeToken::Span(start, end) => {
                            // Clamp both ends to the document and let an
                            // inverted span expand to nothing.
                            pages.extend(start.saturating_sub(1)..end.min(page_count));
                        }
                    }
                }
                pages
            }
        }
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Tokens(tokens) => {
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    match *token {
                        RangeToken::Single(n) => write!(f, "{n}")?,
                        RangeToken::Span(start, end) => write!(f, "{start}-{end}")?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Parse one page number: non-empty, all ASCII digits.
///
/// Accepts `0` (expansion drops it); rejects anything with a sign,
/// whitespace, or leading `+`.
fn parse_page(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<usize>().ok()
}
