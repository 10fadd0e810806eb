//! Error types for tree and selector operations
//!
//! Simple, flat error hierarchy. Absence (no match, no parent) is never an
//! error here; callers get `Option`/empty sequences for that.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SoupError>;

#[derive(Debug, Error)]
pub enum SoupError {
    #[error("Selector syntax error at {position}: {message} (near '{fragment}')")]
    SelectorSyntax {
        message: String,
        fragment: String,
        position: usize,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Stale node handle: {0}")]
    StaleNode(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Unbalanced signal stream: {0}")]
    UnbalancedSignal(String),

    #[error("Maximum element depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },

    #[error("JSON signal stream error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SoupError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SoupError::InvalidOperation(message.into())
    }

    /// True for compile-time selector failures
    pub fn is_selector_syntax(&self) -> bool {
        matches!(self, SoupError::SelectorSyntax { .. })
    }
}
