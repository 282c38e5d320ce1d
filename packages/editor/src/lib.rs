//! # Folio Editor
//!
//! Keeps a `folio-model` document tree structurally valid across edits.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Node tree, Path, Entries traversal   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations + normalization           │
//! │  - Apply raw path-addressed mutations       │
//! │  - Settle dirtied subtrees bottom-up        │
//! │  - Rule engine runs to a fixed point        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants restored by normalization
//!
//! 1. A container never mixes Blocks with Text/Inline children
//! 2. The Document holds Blocks only
//! 3. Only the root may be an empty container
//! 4. Adjacent Text siblings never share the same marks
//! 5. Every Inline has a Text sibling on each side
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{Editor, Mutation};
//! use folio_model::{Node, Path};
//!
//! let mut editor = Editor::new(Node::document(vec![Node::block(vec![
//!     Node::text("Hello"),
//! ])]))
//! .unwrap();
//!
//! editor
//!     .apply(Mutation::InsertNode {
//!         path: Path::from([0, 1]),
//!         node: Node::text(", world"),
//!     })
//!     .unwrap();
//!
//! assert_eq!(editor.root().string(), "Hello, world");
//! assert_eq!(editor.root().get(&Path::from([0])).unwrap().children().unwrap().len(), 1);
//! ```

mod config;
mod editor;
mod errors;
mod mutations;
mod normalizer;
pub mod rules;

pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use editor::Editor;
pub use errors::{EditorError, EditorResult};
pub use mutations::{Mutation, MutationError, MutationResult};
pub use normalizer::{normalize, AppliedFix, NormalizeReport, Normalizer};
pub use rules::{Fix, NormalizeRule};

// Re-export the model for convenience
pub use folio_model as model;
