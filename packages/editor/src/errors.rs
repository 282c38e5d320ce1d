//! Error types for the editor

use crate::mutations::MutationError;
use folio_model::ModelError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] MutationError),

    #[error("Normalization did not settle after {passes} passes ({fixes} fixes applied)")]
    NormalizationDiverged { passes: usize, fixes: usize },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
