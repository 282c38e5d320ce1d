use crate::path::Path;
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Path {path} out of range: index {index} with {len} children")]
    PathOutOfRange { path: Path, index: usize, len: usize },

    #[error("Node at {path} is not a container")]
    NotAContainer { path: Path },

    #[error("Node at {path} is not a text node")]
    NotText { path: Path },

    #[error("Path {ancestor} is not an ancestor of {path}")]
    NotAncestor { ancestor: Path, path: Path },

    #[error("Root path has no parent")]
    NoParent,
}

impl ModelError {
    pub fn out_of_range(path: &Path, index: usize, len: usize) -> Self {
        Self::PathOutOfRange {
            path: path.clone(),
            index,
            len,
        }
    }

    pub fn not_a_container(path: impl Into<Path>) -> Self {
        Self::NotAContainer { path: path.into() }
    }

    pub fn not_text(path: impl Into<Path>) -> Self {
        Self::NotText { path: path.into() }
    }
}
