//! # Folio Model
//!
//! In-memory rich-text document tree.
//!
//! ```text
//! Document
//! ├── Block                 (block flow: only Blocks below)
//! │   └── Block             (inline flow: Text and Inline below)
//! │       ├── Text "see "
//! │       ├── Inline        (link)
//! │       │   └── Text "docs"
//! │       └── Text ""
//! ```
//!
//! - [`Node`]: closed sum type over `Document`, `Block`, `Inline` and `Text`
//! - [`Path`]: child indices from the root, a pure value
//! - [`Entries`]: lazy pre-order `(node, path)` traversal
//!
//! Structural edits here are raw: they never repair the tree. Repairing is
//! the normalizer's job (`folio-editor`).

pub mod entries;
pub mod error;
pub mod node;
pub mod path;

pub use entries::{Entries, EntriesOptions, Entry};
pub use error::{ModelError, ModelResult};
pub use node::{Element, Mark, MarkSet, Node, NodeKind, Properties, Text};
pub use path::Path;
