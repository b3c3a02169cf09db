//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent. Each production opens a
//! frame on a [`TreeBuilder`] when it starts and closes it when it completes; the builder
//! decides the final tree shape.
//!
//! # Grammar
//!
//! ```text
//! query    → or_expr
//! or_expr  → and_expr ("OR" and_expr)*
//! and_expr → not_expr ("AND"? not_expr)*
//! not_expr → "NOT" not_expr | term
//! term     → WORD | DQSTRING | SQSTRING
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Negation: `NOT`
//! 2. AND (explicit keyword or juxtaposition)
//! 3. OR (explicit keyword)

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ast::{AstNode, NodeKind},
    builder::TreeBuilder,
    error::QueryError,
    lexer::{Token, TokenKind, tokenize},
};

/// Largest accepted limit on open builder frames.
///
/// Each frame adds at most two JSON nesting levels (an object and its `children` array), so every
/// tree parsed within this limit stays under `serde_json`'s default recursion limit of 128, with
/// room for a small wrapping document.
pub const MAX_MAX_DEPTH: usize = 60;

/// Default limit on open builder frames.
pub const DEFAULT_MAX_DEPTH: usize = MAX_MAX_DEPTH;

/// Options controlling a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open builder frames, including the root.
    ///
    /// A query without `NOT` needs three frames (query, or, and); each nested `NOT` adds one.
    /// Values above [`MAX_MAX_DEPTH`] are clamped to it.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Recursive descent parser for query expressions.
struct Parser<'t> {
    /// Token stream to parse.
    tokens: &'t [Token],
    /// Current position in token stream.
    position: usize,
    /// Byte position reported for end of input.
    end: usize,
    /// Tree under construction.
    builder: TreeBuilder,
    /// Frame limit.
    max_depth: usize,
}

impl<'t> Parser<'t> {
    /// Creates a new parser from a token stream.
    fn new(tokens: &'t [Token], options: &ParseOptions) -> Self {
        let end = tokens.last().map_or(0, |token| match token.kind {
            TokenKind::Eof => token.position,
            _ => token.end(),
        });
        Self {
            tokens,
            position: 0,
            end,
            builder: TreeBuilder::new(),
            max_depth: options.max_depth.min(MAX_MAX_DEPTH),
        }
    }

    /// Parses the token stream into a `QUERY` tree.
    fn parse(mut self) -> Result<AstNode, QueryError> {
        self.parse_or_expr()?;

        if self.peek_kind() != TokenKind::Eof {
            return Err(self.unexpected("end of query"));
        }

        Ok(self.builder.finish()?)
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<(), QueryError> {
        self.open(NodeKind::Or)?;
        self.parse_and_expr()?;

        while self.peek_kind() == TokenKind::Or {
            self.advance(); // consume OR
            self.parse_and_expr()?;
        }

        Ok(self.builder.close()?)
    }

    /// Parses: and_expr → not_expr ("AND"? not_expr)*
    fn parse_and_expr(&mut self) -> Result<(), QueryError> {
        self.open(NodeKind::And)?;
        self.parse_not_expr()?;

        loop {
            match self.peek_kind() {
                TokenKind::And => {
                    self.advance(); // consume AND
                    self.parse_not_expr()?;
                }
                kind if kind.is_literal() || kind == TokenKind::Not => self.parse_not_expr()?,
                _ => break,
            }
        }

        Ok(self.builder.close()?)
    }

    /// Parses: not_expr → "NOT" not_expr | term
    fn parse_not_expr(&mut self) -> Result<(), QueryError> {
        if self.peek_kind() != TokenKind::Not {
            return self.parse_term();
        }

        self.open(NodeKind::Not)?;
        self.advance(); // consume NOT
        self.parse_not_expr()?;
        Ok(self.builder.close()?)
    }

    /// Parses: term → WORD | DQSTRING | SQSTRING
    fn parse_term(&mut self) -> Result<(), QueryError> {
        let Some(text) = self.peek().and_then(Token::literal) else {
            return Err(self.unexpected("a search term"));
        };

        self.builder.leaf(text);
        self.advance();
        Ok(())
    }

    /// Opens a builder frame, enforcing the depth limit.
    fn open(&mut self, kind: NodeKind) -> Result<(), QueryError> {
        if self.builder.depth() >= self.max_depth {
            return Err(QueryError::NestingTooDeep {
                limit: self.max_depth,
                position: self.peek().map_or(self.end, |token| token.position),
            });
        }
        Ok(self.builder.open(kind)?)
    }

    /// Builds an error for the current token.
    fn unexpected(&self, expected: &'static str) -> QueryError {
        let (found, kind, position) = match self.peek() {
            Some(token) => (token.describe(), token.kind, token.position),
            None => ("end of query".to_string(), TokenKind::Eof, self.end),
        };
        QueryError::UnexpectedToken {
            found,
            kind,
            expected,
            position,
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    /// Returns the kind of the current token, treating exhausted input as end of query.
    fn peek_kind(&self) -> TokenKind {
        self.peek().map_or(TokenKind::Eof, |token| token.kind)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses a token stream into a `QUERY`-rooted AST.
///
/// The stream normally ends with an [`TokenKind::Eof`] token; a stream without one is treated
/// as ending after its last token.
pub fn parse_tokens(tokens: &[Token], options: &ParseOptions) -> Result<AstNode, QueryError> {
    let tree = Parser::new(tokens, options).parse()?;
    debug!(tokens = tokens.len(), "parsed query");
    Ok(tree)
}

/// Parses a query string into an AST using the given options.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<AstNode, QueryError> {
    let tokens = tokenize(input)?;
    parse_tokens(&tokens, options)
}

/// Parses a query string into an AST with default options.
///
/// Returns a [`AstNode::Query`] root for valid queries, or a [`QueryError`] for invalid
/// syntax. Empty and whitespace-only queries are invalid.
pub fn parse(input: &str) -> Result<AstNode, QueryError> {
    parse_with(input, &ParseOptions::default())
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Instant};

    use super::*;

    fn s(text: &str) -> AstNode {
        AstNode::String(text.into())
    }

    fn not(e: AstNode) -> AstNode {
        AstNode::Not(Box::new(e))
    }

    fn and(nodes: Vec<AstNode>) -> AstNode {
        AstNode::And(nodes)
    }

    fn or(nodes: Vec<AstNode>) -> AstNode {
        AstNode::Or(nodes)
    }

    fn query(e: AstNode) -> AstNode {
        AstNode::Query(Box::new(e))
    }

    #[test]
    fn single_word() {
        assert_eq!(parse("foo").unwrap(), query(s("foo")));
    }

    #[test]
    fn juxtaposition_is_and() {
        assert_eq!(parse("foo bar").unwrap(), query(and(vec![s("foo"), s("bar")])));
    }

    #[test]
    fn three_words_fold_into_one_and() {
        assert_eq!(
            parse("highway bridge tunnel").unwrap(),
            query(and(vec![s("highway"), s("bridge"), s("tunnel")]))
        );
    }

    #[test]
    fn explicit_and() {
        assert_eq!(parse("foo and bar").unwrap(), parse("foo bar").unwrap());
        assert_eq!(
            parse("a AND b c").unwrap(),
            query(and(vec![s("a"), s("b"), s("c")]))
        );
    }

    #[test]
    fn simple_or() {
        assert_eq!(parse("foo or bar").unwrap(), query(or(vec![s("foo"), s("bar")])));
    }

    #[test]
    fn chained_or_folds() {
        assert_eq!(
            parse("a OR b Or c").unwrap(),
            query(or(vec![s("a"), s("b"), s("c")]))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // "a b or c" = (a AND b) OR c
        assert_eq!(
            parse("a b or c d").unwrap(),
            query(or(vec![and(vec![s("a"), s("b")]), and(vec![s("c"), s("d")])]))
        );
    }

    #[test]
    fn simple_not() {
        assert_eq!(parse("not foo").unwrap(), query(not(s("foo"))));
    }

    #[test]
    fn not_binds_tighter_than_and() {
        assert_eq!(
            parse("not a not b").unwrap(),
            query(and(vec![not(s("a")), not(s("b"))]))
        );
    }

    #[test]
    fn not_binds_tighter_than_or() {
        assert_eq!(
            parse("not a or b").unwrap(),
            query(or(vec![not(s("a")), s("b")]))
        );
    }

    #[test]
    fn double_negation() {
        assert_eq!(parse("NOT not foo").unwrap(), query(not(not(s("foo")))));
    }

    #[test]
    fn quoted_keywords_are_strings() {
        assert_eq!(parse("\"or\"").unwrap(), query(s("or")));
        assert_eq!(parse("'or'").unwrap(), query(s("or")));
        assert_eq!(
            parse("'not' \"and\"").unwrap(),
            query(and(vec![s("not"), s("and")]))
        );
    }

    #[test]
    fn quoted_literals_strip_quotes() {
        assert_eq!(
            parse("\"main street\" 'old town'").unwrap(),
            query(and(vec![s("main street"), s("old town")]))
        );
    }

    #[test]
    fn mixed_query() {
        assert_eq!(
            parse("highway \"main street\" or not tunnel 'bridge'").unwrap(),
            query(or(vec![
                and(vec![s("highway"), s("main street")]),
                and(vec![not(s("tunnel")), s("bridge")]),
            ]))
        );
    }

    #[test]
    fn error_empty_query() {
        let err = parse("").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnexpectedToken {
                found: "end of query".into(),
                kind: TokenKind::Eof,
                expected: "a search term",
                position: 0,
            }
        );
        assert!(matches!(
            parse("   ").unwrap_err(),
            QueryError::UnexpectedToken { position: 3, .. }
        ));
    }

    #[test]
    fn error_unterminated_literal() {
        assert!(matches!(
            parse("\"unterminated").unwrap_err(),
            QueryError::UnterminatedLiteral {
                quote: '"',
                position: 0
            }
        ));
    }

    #[test]
    fn error_or_at_end() {
        let err = parse("foo or").unwrap_err();
        assert!(matches!(err, QueryError::UnexpectedToken { position: 6, .. }));
        assert!(err.to_string().contains("end of query"));
    }

    #[test]
    fn error_and_at_end() {
        assert!(matches!(
            parse("foo and").unwrap_err(),
            QueryError::UnexpectedToken { position: 7, .. }
        ));
    }

    #[test]
    fn error_not_at_end() {
        assert!(matches!(
            parse("foo not").unwrap_err(),
            QueryError::UnexpectedToken { position: 7, .. }
        ));
    }

    #[test]
    fn error_operator_at_start() {
        let err = parse("or foo").unwrap_err();
        assert_eq!(
            err,
            QueryError::UnexpectedToken {
                found: "keyword 'or'".into(),
                kind: TokenKind::Or,
                expected: "a search term",
                position: 0,
            }
        );
        assert!(parse("AND foo").is_err());
    }

    #[test]
    fn error_adjacent_operators() {
        let err = parse("a or and b").unwrap_err();
        assert!(matches!(err, QueryError::UnexpectedToken { position: 5, .. }));
    }

    #[test]
    fn nesting_limit() {
        // query, or and and frames leave room for MAX_MAX_DEPTH - 3 nested NOTs.
        let allowed = DEFAULT_MAX_DEPTH - 3;
        let deep = format!("{}a", "not ".repeat(allowed));
        let tree = parse(&deep).unwrap();
        let mut depth = 0;
        let mut node = tree.expr().unwrap();
        while let AstNode::Not(inner) = node {
            depth += 1;
            node = inner;
        }
        assert_eq!(depth, allowed);
        assert_eq!(node, &s("a"));

        let too_deep = format!("not {deep}");
        assert!(matches!(
            parse(&too_deep).unwrap_err(),
            QueryError::NestingTooDeep {
                limit: DEFAULT_MAX_DEPTH,
                position
            } if position == 4 * allowed
        ));
    }

    #[test]
    fn oversized_limit_is_clamped() {
        let options = ParseOptions {
            max_depth: 1_000_000,
        };
        let hostile = format!("{}a", "not ".repeat(300_000));
        assert!(matches!(
            parse_with(&hostile, &options).unwrap_err(),
            QueryError::NestingTooDeep {
                limit: MAX_MAX_DEPTH,
                ..
            }
        ));
    }

    #[test]
    fn deepest_tree_reads_back_from_json_text() {
        // An AND and an OR with two operands each put every frame into the JSON.
        let nots = DEFAULT_MAX_DEPTH - 3;
        let text = format!("a b or c {}x", "not ".repeat(nots));
        let tree = parse(&text).unwrap();

        let json = serde_json::to_string(&tree).unwrap();
        let decoded: AstNode = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tree);

        let wrapped = format!("{{\"queries\":[{{\"tree\":{json}}}]}}");
        let value: serde_json::Value = serde_json::from_str(&wrapped).unwrap();
        let decoded: AstNode = serde_json::from_value(value["queries"][0]["tree"].clone()).unwrap();
        assert_eq!(decoded, tree);

        let deeper = format!("a b or c {}x", "not ".repeat(nots + 1));
        assert!(matches!(
            parse(&deeper).unwrap_err(),
            QueryError::NestingTooDeep { .. }
        ));
    }

    #[test]
    fn nesting_limit_position_points_at_not() {
        let options = ParseOptions { max_depth: 4 };
        assert!(parse_with("not a", &options).is_ok());
        let err = parse_with("not not a", &options).unwrap_err();
        assert_eq!(
            err,
            QueryError::NestingTooDeep {
                limit: 4,
                position: 4
            }
        );
    }

    #[test]
    fn tokens_without_eof() {
        let tokens = vec![
            Token::new(TokenKind::Word, "a", 0),
            Token::new(TokenKind::Or, "or", 2),
        ];
        let err = parse_tokens(&tokens, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, QueryError::UnexpectedToken { position: 4, .. }));

        assert!(parse_tokens(&[], &ParseOptions::default()).is_err());
    }

    #[test]
    fn parsing_stops_at_eof() {
        let tokens = vec![
            Token::new(TokenKind::Word, "a", 0),
            Token::new(TokenKind::Eof, "", 1),
            Token::new(TokenKind::Word, "b", 2),
        ];
        assert_eq!(
            parse_tokens(&tokens, &ParseOptions::default()).unwrap(),
            query(s("a"))
        );
    }

    #[test]
    fn canonical_text_round_trips() {
        let queries = [
            "foo",
            "foo bar",
            "foo or bar",
            "not foo",
            "\"or\"",
            "'say \"hi\"' or \"it's\"",
            "a AND b OR NOT not c d",
            "\"\" x",
        ];
        for q in queries {
            let tree = parse(q).unwrap();
            let canonical = tree.to_query_string().unwrap();
            assert_eq!(parse(&canonical).unwrap(), tree, "{q} -> {canonical}");
        }
    }

    #[test]
    fn parses_concurrently() {
        let queries = ["a b", "a or b", "not a", "'x' \"y\""];
        let expected: Vec<AstNode> = queries.iter().map(|q| parse(q).unwrap()).collect();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        queries
                            .iter()
                            .map(|q| parse(q).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn performance_many_queries() {
        let queries = [
            "highway",
            "highway bridge tunnel",
            "\"main street\"",
            "not tunnel",
            "a or b or c",
            "a b or c d",
            "highway \"main street\" or not tunnel 'bridge'",
            "not not not x and y or z",
        ];

        let start = Instant::now();
        for _ in 0..1000 {
            for q in &queries {
                let _ = parse(q).unwrap();
            }
        }
        let elapsed = start.elapsed();

        assert!(
            elapsed.as_millis() < 2000,
            "Parsing 8,000 queries took {:?}, expected < 2s",
            elapsed
        );
    }
}
