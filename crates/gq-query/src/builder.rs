//! Stack-based AST construction.
//!
//! The parser drives a [`TreeBuilder`] with `open`/`leaf`/`close` calls as it enters and leaves
//! grammar productions. Closed frames are appended to whichever frame is then on top of the
//! stack, so children always appear in left-to-right textual order no matter how the parser
//! recurses.

use thiserror::Error;

use crate::ast::{AstNode, NodeKind};

/// A construction-protocol violation.
///
/// These indicate a defect in whatever drives the builder, never a malformed query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    /// `close` was called with only the root frame on the stack.
    #[error("cannot close the root frame")]
    CloseRoot,

    /// A frame was closed without the children its node kind requires.
    #[error("{kind} node closed with {children} children")]
    BadArity {
        /// Kind of the frame being closed.
        kind: NodeKind,
        /// Number of children it held.
        children: usize,
    },

    /// `open` was called with a kind that cannot be an inner frame.
    #[error("cannot open a {kind} frame")]
    BadFrame {
        /// The rejected kind.
        kind: NodeKind,
    },

    /// `finish` found frames other than the root still open.
    #[error("{open} frames still open at finish")]
    Unclosed {
        /// Number of open frames, including the root.
        open: usize,
    },
}

/// An open production on the construction stack.
#[derive(Debug)]
struct Frame {
    /// Node kind this frame becomes when closed.
    kind: NodeKind,
    /// Children closed so far, in textual order.
    children: Vec<AstNode>,
}

impl Frame {
    /// Creates an empty frame.
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

/// Incrementally builds a `QUERY`-rooted tree.
///
/// The stack starts with a single `QUERY` frame and must end with exactly that frame, holding
/// one child, when [`TreeBuilder::finish`] is called.
#[derive(Debug)]
pub struct TreeBuilder {
    /// Open frames; the root `QUERY` frame is always at index 0.
    stack: Vec<Frame>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a builder holding only the root `QUERY` frame.
    pub fn new() -> Self {
        Self {
            stack: vec![Frame::new(NodeKind::Query)],
        }
    }

    /// Number of open frames, including the root.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Opens a frame for an `AND`, `OR` or `NOT` production.
    pub fn open(&mut self, kind: NodeKind) -> Result<(), BuilderError> {
        match kind {
            NodeKind::And | NodeKind::Or | NodeKind::Not => {
                self.stack.push(Frame::new(kind));
                Ok(())
            }
            NodeKind::Query | NodeKind::String => Err(BuilderError::BadFrame { kind }),
        }
    }

    /// Appends a `STRING` leaf to the frame on top of the stack.
    pub fn leaf(&mut self, text: impl Into<String>) {
        self.append(AstNode::String(text.into()));
    }

    /// Closes the frame on top of the stack and appends it to its parent.
    ///
    /// An `AND` or `OR` frame holding a single operand is spliced away: the operand is appended
    /// to the parent directly.
    pub fn close(&mut self) -> Result<(), BuilderError> {
        if self.stack.len() <= 1 {
            return Err(BuilderError::CloseRoot);
        }
        let Some(frame) = self.stack.pop() else {
            return Err(BuilderError::CloseRoot);
        };

        let count = frame.children.len();
        let node = match frame.kind {
            NodeKind::And | NodeKind::Or if count == 1 => frame.children.into_iter().next(),
            NodeKind::And if count >= 2 => Some(AstNode::And(frame.children)),
            NodeKind::Or if count >= 2 => Some(AstNode::Or(frame.children)),
            NodeKind::Not if count == 1 => frame
                .children
                .into_iter()
                .next()
                .map(|child| AstNode::Not(Box::new(child))),
            kind => {
                return Err(BuilderError::BadArity {
                    kind,
                    children: count,
                });
            }
        };

        if let Some(node) = node {
            self.append(node);
        }
        Ok(())
    }

    /// Completes construction, returning the `QUERY` root.
    pub fn finish(mut self) -> Result<AstNode, BuilderError> {
        if self.stack.len() != 1 {
            return Err(BuilderError::Unclosed {
                open: self.stack.len(),
            });
        }
        let Some(root) = self.stack.pop() else {
            return Err(BuilderError::Unclosed { open: 0 });
        };

        let children = root.children.len();
        let mut nodes = root.children.into_iter();
        match (nodes.next(), nodes.next()) {
            (Some(expr), None) => Ok(AstNode::Query(Box::new(expr))),
            _ => Err(BuilderError::BadArity {
                kind: NodeKind::Query,
                children,
            }),
        }
    }

    /// Appends a finished node to the frame on top of the stack.
    fn append(&mut self, node: AstNode) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }
}
