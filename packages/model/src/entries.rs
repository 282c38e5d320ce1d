//! # Traversal
//!
//! [`Entries`] walks a tree depth-first in pre-order and yields `(node, path)`
//! pairs. It is a cursor over a stack of `(children, next index)` frames, so
//! each call to `next` does a bounded amount of work and nothing is
//! materialized up front. Dropping the iterator is all it takes to stop early.

use crate::error::ModelResult;
use crate::node::Node;
use crate::path::Path;
use std::cmp::Ordering;

/// A node together with its path from the traversal root
pub type Entry<'a> = (&'a Node, Path);

/// Where a traversal starts and which paths it yields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntriesOptions {
    /// Starting cursor. Ancestors of this path are still yielded (pre-order
    /// reaches them first); everything before it in document order is skipped.
    /// A path to a Text node yields that node alone.
    pub path: Option<Path>,
    /// Inclusive lower bound, by [`Path::compare`]
    pub from: Option<Path>,
    /// Inclusive upper bound, by [`Path::compare`]
    pub to: Option<Path>,
}

impl EntriesOptions {
    pub fn at(path: impl Into<Path>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn range(from: impl Into<Path>, to: impl Into<Path>) -> Self {
        Self {
            path: None,
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }
}

struct Frame<'a> {
    children: &'a [Node],
    next: usize,
}

/// Lazy pre-order iterator; see [`Node::entries`]
pub struct Entries<'a> {
    root: Option<&'a Node>,
    /// Path of `root` from the true root
    root_path: Path,
    stack: Vec<Frame<'a>>,
    /// Path of the container whose frame is on top of the stack
    path: Path,
    start: Path,
    from: Option<Path>,
    to: Option<Path>,
}

impl<'a> Entries<'a> {
    fn new(root: &'a Node, root_path: Path, options: EntriesOptions) -> Self {
        Self {
            root: Some(root),
            stack: Vec::new(),
            path: root_path.clone(),
            root_path,
            start: options.path.unwrap_or_default(),
            from: options.from,
            to: options.to,
        }
    }

    /// First child to visit below `path`: the next step of the start cursor
    /// while still on its spine, otherwise the first child
    fn first_index(&self, path: &Path) -> usize {
        if path.is_ancestor(&self.start) {
            self.start.as_slice()[path.len()]
        } else {
            0
        }
    }

    fn before_range(&self, path: &Path) -> bool {
        self.from
            .as_ref()
            .is_some_and(|from| path.compare(from) == Ordering::Less)
    }

    fn after_range(&self, path: &Path) -> bool {
        self.to
            .as_ref()
            .is_some_and(|to| path.compare(to) == Ordering::Greater)
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, path) = match self.root.take() {
                Some(root) => (root, self.root_path.clone()),
                None => {
                    let frame = self.stack.last_mut()?;
                    let Some(child) = frame.children.get(frame.next) else {
                        self.stack.pop();
                        self.path.pop();
                        continue;
                    };
                    let index = frame.next;
                    frame.next += 1;
                    (child, self.path.child(index))
                }
            };

            // Pre-order never comes back to anything before a path that is
            // already past `to`, and every descendant of a node before
            // `from` is before `from` as well.
            if self.after_range(&path) {
                self.stack.clear();
                return None;
            }
            if self.before_range(&path) {
                continue;
            }

            if let Some(children) = node.children() {
                let next = self.first_index(&path);
                self.stack.push(Frame { children, next });
                self.path = path.clone();
            }
            return Some((node, path));
        }
    }
}

impl Node {
    /// Every node of this tree in depth-first pre-order, starting with `self`
    pub fn entries(&self) -> Entries<'_> {
        Entries::new(self, Path::root(), EntriesOptions::default())
    }

    /// Pre-order traversal positioned and bounded by `options`.
    ///
    /// Every path in `options` must address a live node; out-of-range bounds
    /// are reported instead of clamped.
    pub fn entries_with(&self, options: EntriesOptions) -> ModelResult<Entries<'_>> {
        for path in [&options.from, &options.to].into_iter().flatten() {
            self.get(path)?;
        }
        if let Some(path) = &options.path {
            let start = self.get(path)?;
            if start.is_text() {
                let path = path.clone();
                return Ok(Entries::new(start, path, options));
            }
        }
        Ok(Entries::new(self, Path::root(), options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    fn paths(entries: Entries<'_>) -> Vec<Path> {
        entries.map(|(_, path)| path).collect()
    }

    fn two_blocks() -> Node {
        Node::document(vec![
            Node::block(vec![Node::text("a"), Node::text("b")]),
            Node::block(vec![Node::text("c"), Node::text("d")]),
        ])
    }

    #[test]
    fn test_preorder() {
        let doc = two_blocks();
        assert_eq!(
            paths(doc.entries()),
            vec![
                Path::root(),
                Path::from([0]),
                Path::from([0, 0]),
                Path::from([0, 1]),
                Path::from([1]),
                Path::from([1, 0]),
                Path::from([1, 1]),
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = Node::document(vec![]);
        let entries: Vec<_> = doc.entries().collect();
        assert_eq!(entries, vec![(&doc, Path::root())]);
    }

    #[test]
    fn test_text_root_yields_itself() {
        let text = Node::text("alone");
        assert_eq!(paths(text.entries()), vec![Path::root()]);
    }

    #[test]
    fn test_start_skips_earlier_siblings() {
        let doc = two_blocks();
        let entries = doc.entries_with(EntriesOptions::at([1, 1])).unwrap();
        assert_eq!(
            paths(entries),
            vec![Path::root(), Path::from([1]), Path::from([1, 1])]
        );
    }

    #[test]
    fn test_start_at_text_yields_only_it() {
        let doc = two_blocks();
        let entries: Vec<_> = doc.entries_with(EntriesOptions::at([0, 0])).unwrap().collect();
        let a = Node::text("a");
        assert_eq!(entries, vec![(&a, Path::from([0, 0]))]);

        // Bounds still apply to the single entry
        let options = EntriesOptions {
            path: Some(Path::from([1, 1])),
            from: None,
            to: Some(Path::from([0])),
        };
        assert!(paths(doc.entries_with(options).unwrap()).is_empty());
    }

    #[test]
    fn test_range() {
        let doc = two_blocks();
        let entries = doc.entries_with(EntriesOptions::range([0, 1], [1, 0])).unwrap();
        assert_eq!(
            paths(entries),
            vec![
                Path::root(),
                Path::from([0]),
                Path::from([0, 1]),
                Path::from([1]),
                Path::from([1, 0]),
            ]
        );
    }

    #[test]
    fn test_invalid_bounds_fail() {
        let doc = two_blocks();
        assert!(matches!(
            doc.entries_with(EntriesOptions::range([0], [7])),
            Err(ModelError::PathOutOfRange { index: 7, .. })
        ));
        assert!(matches!(
            doc.entries_with(EntriesOptions::at([0, 0, 0])),
            Err(ModelError::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_stops_early() {
        let doc = two_blocks();
        let mut entries = doc.entries();
        assert_eq!(entries.next().map(|(_, path)| path), Some(Path::root()));
        assert_eq!(entries.next().map(|(_, path)| path), Some(Path::from([0])));
        drop(entries);
    }
}
