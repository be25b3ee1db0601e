//! Read-only statement guard.
//!
//! Checks user-submitted query text before it is dispatched to the query
//! gateway. This is a syntactic prefix check, not a parser: it does not
//! detect writes nested in subqueries or CTEs, and it is not a security
//! boundary. Fixed internal aggregate queries bypass it.

use std::fmt;

/// Fixed reason attached to every rejection.
pub const REJECTION_REASON: &str = "Only SELECT statements are allowed";

/// Result of checking a piece of query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The text begins with the SELECT token and may be dispatched.
    Allowed,
    /// The text is not a read-only statement.
    Rejected { reason: &'static str },
}

impl Verdict {
    /// Returns true if the text may be dispatched.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => write!(f, "Allowed"),
            Self::Rejected { reason } => write!(f, "Rejected: {reason}"),
        }
    }
}

/// Checks that `text`, after trimming surrounding whitespace, begins with the
/// case-insensitive token `SELECT`.
///
/// The token is the leading run of ASCII-alphabetic characters, so
/// `select*from t` passes while `selectx` does not. Statements with leading
/// comments are rejected: the comment marker is not the SELECT token.
pub fn check(text: &str) -> Verdict {
    let trimmed = text.trim();
    let token_len = trimmed
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .count();

    if trimmed[..token_len].eq_ignore_ascii_case("select") {
        Verdict::Allowed
    } else {
        Verdict::Rejected {
            reason: REJECTION_REASON,
        }
    }
}
