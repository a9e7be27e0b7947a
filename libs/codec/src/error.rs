//! Codec error types.

use thiserror::Error;

/// Hard parse failure: the line matches none of the grammar alternatives.
///
/// `offset` is the byte position where unmatched input begins — everything
/// before it was consumed by the longest matching prefix. Whether a grammar
/// failure is fatal or silently dropped is the transport's policy decision;
/// the codec only reports it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line matches no protocol grammar alternative (unmatched input at byte {offset})")]
pub struct GrammarError {
    pub offset: usize,
}

pub type ParseResult<T> = Result<T, GrammarError>;
