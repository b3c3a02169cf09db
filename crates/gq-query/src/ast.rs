//! Query abstract syntax tree.
//!
//! Represents parsed queries before a downstream compiler turns them into index predicates.
//! The interchange form is a nested record with a `type` tag, an optional `text` and an optional
//! ordered `children` list:
//!
//! ```json
//! {"type": "query", "children": [{"type": "or", "children": [
//!     {"type": "string", "text": "highway"},
//!     {"type": "string", "text": "bridge"}
//! ]}]}
//! ```

use std::{fmt, slice};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lexer::is_keyword;

/// The type tag of an [`AstNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Root of a parsed query.
    Query,
    /// A literal search string.
    String,
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negation.
    Not,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Query => "QUERY",
            Self::String => "STRING",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        };
        f.write_str(name)
    }
}

/// A node of a parsed query.
///
/// `STRING` text holds the literal's content with any surrounding quotes stripped, so `foo`,
/// `"foo"` and `'foo'` all produce `String("foo")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawNode", try_from = "RawNode")]
pub enum AstNode {
    /// Root node wrapping the top-level expression.
    Query(Box<Self>),

    /// A literal search string.
    String(String),

    /// Conjunction: all operands, in textual order. Holds at least two operands.
    And(Vec<Self>),

    /// Disjunction: any operand, in textual order. Holds at least two operands.
    Or(Vec<Self>),

    /// Negation of the inner expression.
    Not(Box<Self>),
}

impl AstNode {
    /// Returns the node's type tag.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Query(_) => NodeKind::Query,
            Self::String(_) => NodeKind::String,
            Self::And(_) => NodeKind::And,
            Self::Or(_) => NodeKind::Or,
            Self::Not(_) => NodeKind::Not,
        }
    }

    /// Returns the literal text of a `STRING` node.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the node's children in order. `STRING` nodes have none.
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Query(inner) | Self::Not(inner) => slice::from_ref(inner),
            Self::And(nodes) | Self::Or(nodes) => nodes,
            Self::String(_) => &[],
        }
    }

    /// Returns the top-level expression of a `QUERY` node.
    pub fn expr(&self) -> Option<&Self> {
        match self {
            Self::Query(inner) => Some(inner),
            _ => None,
        }
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::String(text) => writeln!(f, "{prefix}STRING({text:?})"),
            _ => {
                writeln!(f, "{prefix}{}", self.kind())?;
                for child in self.children() {
                    child.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }

    /// Formats the tree as canonical query text.
    ///
    /// Returns `None` when the tree has no text form that parses back to an equal tree: an
    /// `AND` or `OR` below an `AND`, an `OR` below an `OR`, a `NOT` over `AND`/`OR`, an
    /// operator with too few operands, or a string holding both quote characters.
    pub fn to_query_string(&self) -> Option<String> {
        match self {
            Self::Query(inner) => inner.to_query_string(),
            Self::String(text) => quote_literal(text),
            Self::Not(inner) => match inner.as_ref() {
                Self::String(_) | Self::Not(_) => {
                    Some(format!("not {}", inner.to_query_string()?))
                }
                _ => None,
            },
            Self::And(nodes) => {
                if nodes.len() < 2 {
                    return None;
                }
                let parts = nodes
                    .iter()
                    .map(|node| match node {
                        Self::String(_) | Self::Not(_) => node.to_query_string(),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(parts.join(" "))
            }
            Self::Or(nodes) => {
                if nodes.len() < 2 {
                    return None;
                }
                let parts = nodes
                    .iter()
                    .map(|node| match node {
                        Self::String(_) | Self::Not(_) | Self::And(_) => node.to_query_string(),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(parts.join(" or "))
            }
        }
    }
}

/// Quotes literal text so the lexer reads it back as a single literal with the same content.
fn quote_literal(text: &str) -> Option<String> {
    let bare = !text.is_empty()
        && !is_keyword(text)
        && !text.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if bare {
        Some(text.to_string())
    } else if !text.contains('"') {
        Some(format!("\"{text}\""))
    } else if !text.contains('\'') {
        Some(format!("'{text}'"))
    } else {
        None
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// A node that violates the shape rules of its type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstShapeError {
    /// A `STRING` node without text.
    #[error("string node is missing its text")]
    MissingText,

    /// A non-`STRING` node with text.
    #[error("{kind} node cannot carry text")]
    UnexpectedText {
        /// Kind of the offending node.
        kind: NodeKind,
    },

    /// A node with the wrong number of children.
    #[error("{kind} node cannot have {count} children")]
    Arity {
        /// Kind of the offending node.
        kind: NodeKind,
        /// Number of children present.
        count: usize,
    },

    /// A `QUERY` node below the root.
    #[error("query node can only appear at the root")]
    NestedQuery,
}

/// Serialized form of an [`AstNode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawNode {
    /// Node type tag.
    #[serde(rename = "type")]
    kind: NodeKind,
    /// Literal text, present only on strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Ordered children, absent on strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Self>>,
}

impl From<AstNode> for RawNode {
    fn from(node: AstNode) -> Self {
        let kind = node.kind();
        let (text, children) = match node {
            AstNode::String(text) => (Some(text), None),
            AstNode::Query(inner) | AstNode::Not(inner) => (None, Some(vec![Self::from(*inner)])),
            AstNode::And(nodes) | AstNode::Or(nodes) => {
                (None, Some(nodes.into_iter().map(Self::from).collect()))
            }
        };
        Self {
            kind,
            text,
            children,
        }
    }
}

impl TryFrom<RawNode> for AstNode {
    type Error = AstShapeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        convert(raw, true)
    }
}

/// Converts a raw node, validating its shape. `QUERY` is accepted only at the root.
fn convert(raw: RawNode, root: bool) -> Result<AstNode, AstShapeError> {
    let kind = raw.kind;
    if kind == NodeKind::String {
        let text = raw.text.ok_or(AstShapeError::MissingText)?;
        return match raw.children.map_or(0, |c| c.len()) {
            0 => Ok(AstNode::String(text)),
            count => Err(AstShapeError::Arity { kind, count }),
        };
    }
    if raw.text.is_some() {
        return Err(AstShapeError::UnexpectedText { kind });
    }
    if kind == NodeKind::Query && !root {
        return Err(AstShapeError::NestedQuery);
    }

    let mut children = raw
        .children
        .unwrap_or_default()
        .into_iter()
        .map(|child| convert(child, false))
        .collect::<Result<Vec<_>, _>>()?;
    let count = children.len();

    match kind {
        NodeKind::And if count >= 2 => Ok(AstNode::And(children)),
        NodeKind::Or if count >= 2 => Ok(AstNode::Or(children)),
        NodeKind::Query if count == 1 => Ok(AstNode::Query(Box::new(children.remove(0)))),
        NodeKind::Not if count == 1 => Ok(AstNode::Not(Box::new(children.remove(0)))),
        _ => Err(AstShapeError::Arity { kind, count }),
    }
}
