//! Query parsing and AST for boolean search expressions.
//!
//! The query language is deliberately small:
//!
//! - **Words**: `highway` - bare search terms
//! - **Quoted literals**: `"main street"` or `'main street'` - opaque text, keywords disabled
//! - **AND**: `highway bridge` or `highway AND bridge` - all operands must match
//! - **OR**: `highway OR bridge` - alternatives
//! - **NOT**: `NOT tunnel` - negation, binds tighter than AND and OR
//!
//! Keywords are case-insensitive. Parsing produces an [`AstNode::Query`] root that downstream
//! query compilers translate into index predicates.
//!
//! # Example
//!
//! ```
//! use gq_query::{AstNode, parse};
//!
//! let query = parse("highway OR bridge").unwrap();
//! assert_eq!(
//!     query.expr(),
//!     Some(&AstNode::Or(vec![
//!         AstNode::String("highway".into()),
//!         AstNode::String("bridge".into()),
//!     ]))
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod builder;
mod error;
mod lexer;
mod parser;

pub use ast::{AstNode, AstShapeError, NodeKind};
pub use builder::{BuilderError, TreeBuilder};
pub use error::QueryError;
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::{DEFAULT_MAX_DEPTH, MAX_MAX_DEPTH, ParseOptions, parse, parse_tokens, parse_with};
