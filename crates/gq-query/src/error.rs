//! Error types for query lexing and parsing.

use thiserror::Error;

use crate::{builder::BuilderError, lexer::TokenKind};

/// A failure to turn query text into an AST.
///
/// Syntax variants carry the byte position of the offending input so callers can point at it.
/// A malformed query always fails as a whole; no partial tree is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A quoted literal was opened but the input ended before the closing quote.
    #[error("unterminated {quote} literal")]
    UnterminatedLiteral {
        /// The opening quote character.
        quote: char,
        /// Byte position of the opening quote.
        position: usize,
    },

    /// A token that cannot start or continue the current production.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        /// Description of the token that was found.
        found: String,
        /// Kind of the token that was found.
        kind: TokenKind,
        /// Description of what the parser was looking for.
        expected: &'static str,
        /// Byte position of the token.
        position: usize,
    },

    /// Operator nesting exceeded the configured depth limit.
    #[error("query nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep {
        /// The configured limit.
        limit: usize,
        /// Byte position of the token that would have exceeded the limit.
        position: usize,
    },

    /// The parser drove the tree builder incorrectly. Indicates a parser defect, not bad input.
    #[error("internal parser error: {0}")]
    Internal(#[from] BuilderError),
}

impl QueryError {
    /// Returns the byte position in the input where the error occurred.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnterminatedLiteral { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::NestingTooDeep { position, .. } => Some(*position),
            Self::Internal(_) => None,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnterminatedLiteral { quote: '"', .. } => {
                Some("Add a closing quote (\") to complete the literal")
            }
            Self::UnterminatedLiteral { .. } => {
                Some("Add a closing quote (') to complete the literal")
            }
            Self::UnexpectedToken {
                kind: TokenKind::Eof,
                ..
            } => Some("Queries and operators need a search term, e.g., 'highway OR bridge'"),
            Self::UnexpectedToken { kind, .. } if kind.is_keyword() => Some(
                "Quote a keyword to search for it literally, e.g., '\"or\"'",
            ),
            Self::UnexpectedToken { .. } | Self::Internal(_) => None,
            Self::NestingTooDeep { .. } => Some("Remove redundant NOT operators"),
        }
    }

    /// Renders the error with the query and a position indicator.
    pub fn render(&self, query: &str) -> String {
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {self}\n"));
        result.push_str(&format!("  {query}"));
        if let Some(position) = self.position() {
            let clamped = position.min(query.len());
            let column = query
                .get(..clamped)
                .map_or(clamped, |prefix| prefix.chars().count());
            result.push_str(&format!("\n  {}^", " ".repeat(column)));
        }
        if let Some(hint) = self.suggestion() {
            result.push_str(&format!("\nhint: {hint}"));
        }
        result
    }
}
