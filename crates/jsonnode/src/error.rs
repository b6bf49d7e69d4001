use thiserror::Error;

/// Errors returned by the fallible [`Node`](crate::Node) mutators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("scalar nodes have no children")]
    NotAContainer,
    #[error("keyed access requires an object")]
    NotAnObject,
    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },
}
