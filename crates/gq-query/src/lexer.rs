//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser. The stream always ends with
//! a single [`TokenKind::Eof`] token.

use std::{fmt, iter::Peekable, str::CharIndices};

use tracing::{debug, trace};

use crate::error::QueryError;

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// An unquoted bare term.
    Word,
    /// A double-quoted literal.
    DqString,
    /// A single-quoted literal.
    SqString,
    /// The AND keyword.
    And,
    /// The OR keyword.
    Or,
    /// The NOT keyword.
    Not,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns true for the kinds that carry a literal value.
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Word | Self::DqString | Self::SqString)
    }

    /// Returns true for the operator keywords.
    pub fn is_keyword(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "WORD",
            Self::DqString => "DQSTRING",
            Self::SqString => "SQSTRING",
            Self::And => "AND_KW",
            Self::Or => "OR_KW",
            Self::Not => "NOT_KW",
            Self::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// The exact source slice, including quotes for quoted literals.
    pub raw: String,
    /// Byte position of the slice in the input.
    pub position: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, raw: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            raw: raw.into(),
            position,
        }
    }

    /// Returns the literal value of a word or quoted token, with quotes stripped.
    pub fn literal(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Word => Some(&self.raw),
            TokenKind::DqString | TokenKind::SqString => {
                // Quoted raw text always starts and ends with a one-byte quote.
                self.raw.get(1..self.raw.len().saturating_sub(1))
            }
            _ => None,
        }
    }

    /// Byte position just past the end of this token.
    pub fn end(&self) -> usize {
        self.position + self.raw.len()
    }

    /// Describes the token for error messages.
    pub(crate) fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of query".to_string(),
            TokenKind::And | TokenKind::Or | TokenKind::Not => format!("keyword '{}'", self.raw),
            TokenKind::Word => format!("word '{}'", self.raw),
            TokenKind::DqString | TokenKind::SqString => format!("literal {}", self.raw),
        }
    }
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, QueryError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            trace!(kind = %token.kind, raw = %token.raw, position = token.position, "token");
            tokens.push(token);
        }
        tokens.push(Token::new(TokenKind::Eof, "", self.input.len()));

        debug!(count = tokens.len(), "tokenized query");
        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, QueryError> {
        self.skip_whitespace();

        let Some(&(start, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_quoted(start, '"', TokenKind::DqString).map(Some),
            '\'' => self.read_quoted(start, '\'', TokenKind::SqString).map(Some),
            _ => Ok(Some(self.read_word_or_keyword(start))),
        }
    }

    /// Reads a quoted literal up to the matching closing quote.
    fn read_quoted(
        &mut self,
        start: usize,
        quote: char,
        kind: TokenKind,
    ) -> Result<Token, QueryError> {
        self.chars.next(); // consume opening quote

        for (pos, ch) in self.chars.by_ref() {
            if ch == quote {
                let end = pos + ch.len_utf8();
                return Ok(Token::new(kind, &self.input[start..end], start));
            }
        }

        Err(QueryError::UnterminatedLiteral {
            quote,
            position: start,
        })
    }

    /// Reads a bare word, classifying it as a keyword when it matches one.
    fn read_word_or_keyword(&mut self, start: usize) -> Token {
        let mut end = start;

        while let Some(&(pos, ch)) = self.chars.peek() {
            if ch.is_whitespace() || ch == '"' || ch == '\'' {
                break;
            }
            end = pos + ch.len_utf8();
            self.chars.next();
        }

        let word = &self.input[start..end];
        Token::new(keyword_kind(word).unwrap_or(TokenKind::Word), word, start)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, ch)| ch.is_whitespace()).is_some() {}
    }
}

/// Returns the keyword kind for a word, matching case-insensitively.
fn keyword_kind(word: &str) -> Option<TokenKind> {
    if word.eq_ignore_ascii_case("and") {
        Some(TokenKind::And)
    } else if word.eq_ignore_ascii_case("or") {
        Some(TokenKind::Or)
    } else if word.eq_ignore_ascii_case("not") {
        Some(TokenKind::Not)
    } else {
        None
    }
}

/// Returns true if `word` would be read as an operator keyword when unquoted.
pub(crate) fn is_keyword(word: &str) -> bool {
    keyword_kind(word).is_some()
}

/// Tokenizes a query string.
///
/// The returned stream always ends with an [`TokenKind::Eof`] token positioned at
/// `input.len()`. Fails only on an unterminated quoted literal.
pub fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    Lexer::new(input).tokenize()
}
