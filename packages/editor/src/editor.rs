//! # Editor Handle
//!
//! Owns a document tree and keeps it normalized. Every change goes through
//! [`Editor::apply`] or [`Editor::apply_batch`], which run the raw mutation
//! and then the normalizer before handing control back, so nothing outside
//! ever observes a tree that breaks the invariants.
//!
//! ```text
//! Mutation → raw edit → dirtied paths → normalize → version + 1
//! ```

use crate::config::EditorConfig;
use crate::errors::EditorResult;
use crate::mutations::{Mutation, MutationResult};
use crate::normalizer::{NormalizeReport, Normalizer};
use folio_model::{Entries, EntriesOptions, Node, Path};
use tracing::{debug, instrument, warn};

/// Single-writer handle over a normalized document
#[derive(Debug)]
pub struct Editor {
    root: Node,

    /// Current version number (increments on each successful apply)
    pub version: u64,

    normalizer: Normalizer,
}

impl Editor {
    /// Take ownership of `root` and normalize it with the built-in rules
    pub fn new(root: Node) -> EditorResult<Self> {
        Self::with_normalizer(root, Normalizer::new())
    }

    pub fn with_config(root: Node, config: &EditorConfig) -> EditorResult<Self> {
        Self::with_normalizer(root, Normalizer::from_config(config))
    }

    pub fn with_normalizer(mut root: Node, normalizer: Normalizer) -> EditorResult<Self> {
        let report = normalizer.normalize_all(&mut root)?;
        debug!(fixes = report.fixes.len(), "Normalized initial document");

        Ok(Self {
            root,
            version: 0,
            normalizer,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    pub fn get(&self, path: &Path) -> EditorResult<&Node> {
        Ok(self.root.get(path)?)
    }

    pub fn entries(&self) -> Entries<'_> {
        self.root.entries()
    }

    pub fn entries_with(&self, options: EntriesOptions) -> EditorResult<Entries<'_>> {
        Ok(self.root.entries_with(options)?)
    }

    /// Apply one mutation, then normalize everything it touched.
    ///
    /// If validation or normalization fails the document is left unchanged.
    #[instrument(level = "debug", skip(self, mutation), fields(mutation = mutation.name()))]
    pub fn apply(&mut self, mutation: Mutation) -> EditorResult<MutationResult> {
        let snapshot = self.root.clone();
        let outcome = self.apply_scoped(&mutation);
        self.commit(snapshot, outcome)
    }

    fn apply_scoped(&mut self, mutation: &Mutation) -> EditorResult<NormalizeReport> {
        let dirty = mutation.apply(&mut self.root)?;

        match dirty.split_first() {
            Some((first, rest)) => {
                let scope = rest.iter().fold(first.clone(), |scope, path| scope.common(path));
                self.normalizer.normalize(&mut self.root, &scope)
            }
            None => Ok(NormalizeReport::default()),
        }
    }

    /// Apply several mutations as one unit and normalize once at the end.
    ///
    /// Paths in later mutations address the tree as left by the earlier ones,
    /// before any normalization. If any step fails the document is restored.
    #[instrument(level = "debug", skip(self, mutations), fields(count = mutations.len()))]
    pub fn apply_batch(&mut self, mutations: Vec<Mutation>) -> EditorResult<MutationResult> {
        let snapshot = self.root.clone();

        let outcome = mutations
            .iter()
            .try_for_each(|mutation| mutation.apply(&mut self.root).map(drop))
            .map_err(Into::into)
            .and_then(|()| self.normalizer.normalize_all(&mut self.root));

        self.commit(snapshot, outcome)
    }

    /// Bumps the version on success, otherwise puts `snapshot` back
    fn commit(
        &mut self,
        snapshot: Node,
        outcome: EditorResult<NormalizeReport>,
    ) -> EditorResult<MutationResult> {
        match outcome {
            Ok(report) => {
                self.version += 1;
                Ok(MutationResult {
                    version: self.version,
                    report,
                })
            }
            Err(error) => {
                warn!(%error, "Edit failed, restoring document");
                self.root = snapshot;
                Err(error)
            }
        }
    }

    /// Re-run normalization over the whole document
    pub fn normalize(&mut self) -> EditorResult<NormalizeReport> {
        self.normalizer.normalize_all(&mut self.root)
    }

    pub fn is_normalized(&self) -> bool {
        self.normalizer.is_normalized(&self.root)
    }
}
