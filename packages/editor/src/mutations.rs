//! # Raw Mutations
//!
//! Structural edits addressed by [`Path`]. A mutation only changes the tree;
//! it never repairs it. Applying one returns the paths it dirtied (in the
//! coordinates of the tree *after* the edit) so the caller can hand them to
//! the normalizer.
//!
//! ## Mutation Semantics
//!
//! ### Insert / Replace
//! - `path` names where the node ends up
//! - Inserting at `len` appends; anything beyond fails, nothing is clamped
//!
//! ### Move
//! - `new_parent` and `index` are read against the tree *before* the move
//! - `index` is the position among the new parent's children once the node
//!   has been detached
//! - Fails if `new_parent` is the moved node or one of its descendants
//!
//! ### SetText / SetMarks / SetProperty
//! - Atomic replacement, the previous value is discarded

use folio_model::{MarkSet, ModelError, Node, Path};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw structural mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert a node so that it ends up at `path`
    InsertNode { path: Path, node: Node },

    /// Remove the node at `path` with all of its descendants
    RemoveNode { path: Path },

    /// Swap the node at `path` for another one
    ReplaceNode { path: Path, node: Node },

    /// Detach the node at `path` and re-attach it under `new_parent`
    MoveNode {
        path: Path,
        new_parent: Path,
        index: usize,
    },

    /// Replace the payload of a text node
    SetText { path: Path, text: String },

    /// Replace the marks of a text node
    SetMarks { path: Path, marks: MarkSet },

    /// Set (`Some`) or clear (`None`) a container property
    SetProperty {
        path: Path,
        key: String,
        value: Option<String>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Cannot move {path} into its own subtree at {new_parent}")]
    InvalidMove { path: Path, new_parent: Path },
}

impl Mutation {
    /// Apply the mutation to `root`, returning the dirtied paths
    pub fn apply(&self, root: &mut Node) -> Result<Vec<Path>, MutationError> {
        match self {
            Mutation::InsertNode { path, node } => {
                root.insert_node(path, node.clone())?;
                Ok(vec![path.clone()])
            }

            Mutation::RemoveNode { path } => {
                root.remove_node(path)?;
                Ok(vec![path.parent()?])
            }

            Mutation::ReplaceNode { path, node } => {
                root.replace_node(path, node.clone())?;
                Ok(vec![path.clone()])
            }

            Mutation::MoveNode {
                path,
                new_parent,
                index,
            } => Self::apply_move(root, path, new_parent, *index),

            Mutation::SetText { path, text } => {
                root.set_text(path, text.clone())?;
                Ok(vec![path.parent().unwrap_or_default()])
            }

            Mutation::SetMarks { path, marks } => {
                root.set_marks(path, marks.clone())?;
                Ok(vec![path.parent().unwrap_or_default()])
            }

            Mutation::SetProperty { path, key, value } => {
                root.set_property(path, key, value.clone())?;
                Ok(vec![])
            }
        }
    }

    fn apply_move(
        root: &mut Node,
        path: &Path,
        new_parent: &Path,
        index: usize,
    ) -> Result<Vec<Path>, MutationError> {
        // Validate everything up front so a failed move leaves the tree untouched
        let old_parent = path.parent()?;
        root.get(path)?;
        if new_parent.starts_with(path) {
            return Err(MutationError::InvalidMove {
                path: path.clone(),
                new_parent: new_parent.clone(),
            });
        }
        let target = root.get(new_parent)?;
        let len = target
            .children()
            .ok_or_else(|| ModelError::not_a_container(new_parent))?
            .len();
        let len = if *new_parent == old_parent { len - 1 } else { len };
        if index > len {
            return Err(ModelError::out_of_range(&new_parent.child(index), index, len).into());
        }

        let node = root.remove_node(path)?;
        let new_parent = shift_for_removal(new_parent, path);
        let destination = new_parent.child(index);
        root.insert_node(&destination, node)?;

        let old_parent = shift_for_insertion(&shift_for_removal(&old_parent, path), &destination);
        Ok(vec![old_parent, destination])
    }

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertNode { .. } => "insert_node",
            Mutation::RemoveNode { .. } => "remove_node",
            Mutation::ReplaceNode { .. } => "replace_node",
            Mutation::MoveNode { .. } => "move_node",
            Mutation::SetText { .. } => "set_text",
            Mutation::SetMarks { .. } => "set_marks",
            Mutation::SetProperty { .. } => "set_property",
        }
    }
}

/// Where `path` ends up once the node at `removed` is gone.
///
/// `path` must not lie inside the removed subtree.
fn shift_for_removal(path: &Path, removed: &Path) -> Path {
    let Some(depth) = removed.len().checked_sub(1) else {
        return path.clone();
    };
    let mut indices = path.as_slice().to_vec();
    if indices.len() > depth
        && indices[..depth] == removed.as_slice()[..depth]
        && indices[depth] > removed.as_slice()[depth]
    {
        indices[depth] -= 1;
    }
    Path::new(indices)
}

/// Where `path` ends up once a node is inserted at `inserted`
fn shift_for_insertion(path: &Path, inserted: &Path) -> Path {
    let Some(depth) = inserted.len().checked_sub(1) else {
        return path.clone();
    };
    let mut indices = path.as_slice().to_vec();
    if indices.len() > depth
        && indices[..depth] == inserted.as_slice()[..depth]
        && indices[depth] >= inserted.as_slice()[depth]
    {
        indices[depth] += 1;
    }
    Path::new(indices)
}

/// Result of applying a mutation
#[derive(Debug, Clone)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Repairs the normalizer made afterwards
    pub report: crate::NormalizeReport,
}
