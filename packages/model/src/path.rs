//! # Paths
//!
//! A [`Path`] addresses a node by the child indices walked from the root.
//! Paths are plain values: they hold no reference to a tree and are only
//! checked against one when dereferenced (see [`Node::get`](crate::Node::get)).
//!
//! ```text
//! Document            []
//! ├── Block           [0]
//! │   ├── Text        [0, 0]
//! │   └── Text        [0, 1]
//! └── Block           [1]
//!     └── Text        [1, 0]
//! ```

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordered child indices from the root down to a node
///
/// `Path` deliberately does not implement `Ord`: [`Path::compare`] treats a
/// path and its descendants as equal, which is not a total order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The empty path, addressing the root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`Path::is_root`]; pairs with `len`
    pub fn is_empty(&self) -> bool {
        self.is_root()
    }

    /// True for the empty path, which addresses the root itself
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// Index of the node within its parent
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn push(&mut self, index: usize) {
        self.0.push(index);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }

    /// First `len` indices of this path
    pub fn prefix(&self, len: usize) -> Path {
        Path(self.0[..len.min(self.0.len())].to_vec())
    }

    pub fn parent(&self) -> ModelResult<Path> {
        match self.0.split_last() {
            Some((_, rest)) => Ok(Path(rest.to_vec())),
            None => Err(ModelError::NoParent),
        }
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Path(indices)
    }

    /// Appends a path expressed relative to this one
    pub fn join(&self, relative: &Path) -> Path {
        let mut indices = self.0.clone();
        indices.extend_from_slice(&relative.0);
        Path(indices)
    }

    /// Path of the next sibling; `None` for the root
    pub fn next(&self) -> Option<Path> {
        let (last, rest) = self.0.split_last()?;
        let mut indices = rest.to_vec();
        indices.push(last + 1);
        Some(Path(indices))
    }

    /// Path of the previous sibling; `None` for the root or a first child
    pub fn previous(&self) -> Option<Path> {
        let (last, rest) = self.0.split_last()?;
        let index = last.checked_sub(1)?;
        let mut indices = rest.to_vec();
        indices.push(index);
        Some(Path(indices))
    }

    /// Strict ancestors, root first
    pub fn ancestors(&self) -> Vec<Path> {
        (0..self.0.len()).map(|len| self.prefix(len)).collect()
    }

    /// Longest shared prefix of both paths
    pub fn common(&self, other: &Path) -> Path {
        let len = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count();
        self.prefix(len)
    }

    /// Non-strict prefix test
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// True iff `self` is a strict prefix of `other`
    pub fn is_ancestor(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.starts_with(self)
    }

    /// True iff `other` is `self` plus exactly one index
    pub fn is_parent(&self, other: &Path) -> bool {
        self.0.len() + 1 == other.0.len() && other.starts_with(self)
    }

    pub fn is_descendant(&self, other: &Path) -> bool {
        other.is_ancestor(self)
    }

    /// Same parent, different position
    pub fn is_sibling(&self, other: &Path) -> bool {
        match (self.0.split_last(), other.0.split_last()) {
            (Some((a, a_rest)), Some((b, b_rest))) => a_rest == b_rest && a != b,
            _ => false,
        }
    }

    /// Lexicographic order over the shared prefix.
    ///
    /// A path and any of its ancestors or descendants compare `Equal`; use
    /// [`Path::is_ancestor`] when the distinction matters.
    pub fn compare(&self, other: &Path) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                ordering => return ordering,
            }
        }
        Ordering::Equal
    }

    pub fn is_before(&self, other: &Path) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn is_after(&self, other: &Path) -> bool {
        self.compare(other) == Ordering::Greater
    }

    /// True when `self` ends at an earlier index than `other` at the same level
    pub fn ends_before(&self, other: &Path) -> bool {
        let Some((last, rest)) = self.0.split_last() else {
            return false;
        };
        other.0.len() > rest.len()
            && other.0[..rest.len()] == *rest
            && *last < other.0[rest.len()]
    }

    /// Strips `ancestor` from the front of this path
    pub fn relative_to(&self, ancestor: &Path) -> ModelResult<Path> {
        if self.starts_with(ancestor) {
            Ok(Path(self.0[ancestor.0.len()..].to_vec()))
        } else {
            Err(ModelError::NotAncestor {
                ancestor: ancestor.clone(),
                path: self.clone(),
            })
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

impl FromIterator<usize> for Path {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root() {
        assert!(Path::root().is_root());
        assert!(Path::root().is_empty());
        assert!(!Path::from([0]).is_root());
        assert!(!Path::from([0]).is_empty());
    }

    #[test]
    fn test_is_ancestor_is_strict() {
        let a = Path::from([0]);
        assert!(a.is_ancestor(&Path::from([0, 1])));
        assert!(a.is_ancestor(&Path::from([0, 1, 2])));
        assert!(!a.is_ancestor(&a));
        assert!(!a.is_ancestor(&Path::from([1, 0])));
        assert!(Path::root().is_ancestor(&a));
    }

    #[test]
    fn test_is_parent() {
        let a = Path::from([2, 3]);
        assert!(a.is_parent(&Path::from([2, 3, 0])));
        assert!(!a.is_parent(&Path::from([2, 3, 0, 1])));
        assert!(!a.is_parent(&Path::from([2, 4, 0])));
        assert!(!a.is_parent(&a));
    }

    #[test]
    fn test_compare() {
        assert_eq!(Path::from([0, 1]).compare(&Path::from([0, 2])), Ordering::Less);
        assert_eq!(Path::from([1]).compare(&Path::from([0, 5])), Ordering::Greater);
        assert_eq!(Path::from([0, 1]).compare(&Path::from([0, 1])), Ordering::Equal);
        // ancestor and descendant are indistinguishable by compare
        assert_eq!(Path::from([0]).compare(&Path::from([0, 3])), Ordering::Equal);
        assert_eq!(Path::root().compare(&Path::from([4])), Ordering::Equal);
    }

    #[test]
    fn test_relative_to() {
        let path = Path::from([1, 2, 3]);
        assert_eq!(path.relative_to(&Path::from([1])), Ok(Path::from([2, 3])));
        assert_eq!(path.relative_to(&path), Ok(Path::root()));
        assert_eq!(
            path.relative_to(&Path::from([2])),
            Err(ModelError::NotAncestor {
                ancestor: Path::from([2]),
                path: path.clone(),
            })
        );
    }

    #[test]
    fn test_parent_of_root_fails() {
        assert_eq!(Path::root().parent(), Err(ModelError::NoParent));
        assert_eq!(Path::from([3, 1]).parent(), Ok(Path::from([3])));
    }

    #[test]
    fn test_siblings() {
        let path = Path::from([0, 2]);
        assert_eq!(path.next(), Some(Path::from([0, 3])));
        assert_eq!(path.previous(), Some(Path::from([0, 1])));
        assert_eq!(Path::from([0, 0]).previous(), None);
        assert_eq!(Path::root().next(), None);
        assert!(path.is_sibling(&Path::from([0, 5])));
        assert!(!path.is_sibling(&path));
        assert!(!path.is_sibling(&Path::from([1, 2])));
    }

    #[test]
    fn test_ancestors_and_common() {
        let path = Path::from([1, 0, 4]);
        assert_eq!(
            path.ancestors(),
            vec![Path::root(), Path::from([1]), Path::from([1, 0])]
        );
        assert_eq!(path.common(&Path::from([1, 0, 2])), Path::from([1, 0]));
        assert_eq!(path.common(&Path::from([2])), Path::root());
    }

    #[test]
    fn test_ends_before() {
        assert!(Path::from([0, 1]).ends_before(&Path::from([0, 2, 0])));
        assert!(!Path::from([0, 1]).ends_before(&Path::from([0, 1, 0])));
        assert!(!Path::from([0, 1]).ends_before(&Path::from([1, 2])));
    }

    #[test]
    fn test_display() {
        assert_eq!(Path::from([0, 12, 3]).to_string(), "[0, 12, 3]");
        assert_eq!(Path::root().to_string(), "[]");
    }
}
