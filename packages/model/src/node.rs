//! # Nodes
//!
//! The document tree is a closed sum type: three container variants
//! (`Document`, `Block`, `Inline`) that own their children, and the `Text`
//! leaf that carries the actual characters and their formatting marks.
//!
//! Raw structural edits live here. None of them re-establish document
//! invariants; callers hand the affected path to the normalizer afterwards.

use crate::error::{ModelError, ModelResult};
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Formatting tag attached to a text run (e.g. `bold`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mark(String);

impl Mark {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mark {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Mark {
    fn from(name: String) -> Self {
        Self(name)
    }
}

pub type MarkSet = BTreeSet<Mark>;

/// Keyed properties on container nodes (`type`, `url`, ...)
pub type Properties = BTreeMap<String, String>;

/// Discriminant of [`Node`], handy for matching without borrowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Block,
    Inline,
    Text,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Document => "document",
            NodeKind::Block => "block",
            NodeKind::Inline => "inline",
            NodeKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Children and properties shared by every container variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

impl Element {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Leaf holding a string payload and its marks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub marks: MarkSet,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: MarkSet::new(),
        }
    }

    pub fn with_marks<M, I>(text: impl Into<String>, marks: I) -> Self
    where
        M: Into<Mark>,
        I: IntoIterator<Item = M>,
    {
        Self {
            text: text.into(),
            marks: marks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn has_mark(&self, mark: &str) -> bool {
        self.marks.iter().any(|m| m.as_str() == mark)
    }
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "object", rename_all = "lowercase")]
pub enum Node {
    /// Tree root; holds blocks only once normalized
    Document(Element),
    /// Block-flow container (paragraph, list item, quote, ...)
    Block(Element),
    /// Inline-flow container (link, mention, ...)
    Inline(Element),
    /// Leaf text run
    Text(Text),
}

impl Node {
    pub fn document(children: Vec<Node>) -> Self {
        Node::Document(Element::new(children))
    }

    pub fn block(children: Vec<Node>) -> Self {
        Node::Block(Element::new(children))
    }

    pub fn inline(children: Vec<Node>) -> Self {
        Node::Inline(Element::new(children))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text::new(text))
    }

    pub fn marked<M, I>(text: impl Into<String>, marks: I) -> Self
    where
        M: Into<Mark>,
        I: IntoIterator<Item = M>,
    {
        Node::Text(Text::with_marks(text, marks))
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Document(_) => NodeKind::Document,
            Node::Block(_) => NodeKind::Block,
            Node::Inline(_) => NodeKind::Inline,
            Node::Text(_) => NodeKind::Text,
        }
    }

    pub fn is_container(&self) -> bool {
        !self.is_text()
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Block(_))
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Node::Inline(_))
    }

    /// Text and Inline nodes flow inside a line; Blocks (and the Document) do not
    pub fn is_inline_flow(&self) -> bool {
        matches!(self, Node::Text(_) | Node::Inline(_))
    }

    pub fn element(&self) -> Option<&Element> {
        match self {
            Node::Document(element) | Node::Block(element) | Node::Inline(element) => {
                Some(element)
            }
            Node::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Document(element) | Node::Block(element) | Node::Inline(element) => {
                Some(element)
            }
            Node::Text(_) => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        self.element().map(|element| element.children.as_slice())
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        self.element_mut().map(|element| &mut element.children)
    }

    pub fn properties(&self) -> Option<&Properties> {
        self.element().map(|element| &element.properties)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties()?.get(key).map(String::as_str)
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Concatenated payload of every text leaf below this node
    pub fn string(&self) -> String {
        match self {
            Node::Text(text) => text.text.clone(),
            _ => self.texts().map(|(text, _)| text.text.as_str()).collect(),
        }
    }

    /// Text leaves in document order with their paths
    pub fn texts(&self) -> impl Iterator<Item = (&Text, Path)> {
        self.entries()
            .filter_map(|(node, path)| node.as_text().map(|text| (text, path)))
    }

    pub fn first_text(&self) -> Option<(&Text, Path)> {
        self.texts().next()
    }

    pub fn last_text(&self) -> Option<(&Text, Path)> {
        self.texts().last()
    }

    // Query interface

    /// Descends child by child from this node
    pub fn get(&self, path: &Path) -> ModelResult<&Node> {
        let mut node = self;
        for (depth, &index) in path.iter().enumerate() {
            let children = node
                .children()
                .ok_or_else(|| ModelError::not_a_container(path.prefix(depth)))?;
            node = children
                .get(index)
                .ok_or_else(|| ModelError::out_of_range(path, index, children.len()))?;
        }
        Ok(node)
    }

    pub fn get_mut(&mut self, path: &Path) -> ModelResult<&mut Node> {
        let mut node = self;
        for (depth, &index) in path.iter().enumerate() {
            let children = node
                .children_mut()
                .ok_or_else(|| ModelError::not_a_container(path.prefix(depth)))?;
            let len = children.len();
            node = children
                .get_mut(index)
                .ok_or_else(|| ModelError::out_of_range(path, index, len))?;
        }
        Ok(node)
    }

    pub fn has(&self, path: &Path) -> bool {
        self.get(path).is_ok()
    }

    pub fn parent(&self, path: &Path) -> ModelResult<&Node> {
        self.get(&path.parent()?)
    }

    /// Strict ancestors of `path`, root first
    pub fn ancestors(&self, path: &Path) -> ModelResult<Vec<(&Node, Path)>> {
        self.get(path)?;
        path.ancestors()
            .into_iter()
            .map(|ancestor| self.get(&ancestor).map(|node| (node, ancestor)))
            .collect()
    }

    pub fn previous_sibling(&self, path: &Path) -> ModelResult<Option<(&Node, Path)>> {
        self.get(path)?;
        match path.previous() {
            Some(previous) => Ok(Some((self.get(&previous)?, previous))),
            None if path.is_root() => Err(ModelError::NoParent),
            None => Ok(None),
        }
    }

    pub fn next_sibling(&self, path: &Path) -> ModelResult<Option<(&Node, Path)>> {
        self.get(path)?;
        let next = path.next().ok_or(ModelError::NoParent)?;
        Ok(self.get(&next).ok().map(|node| (node, next)))
    }

    // Raw edits on this container

    pub fn push_child(&mut self, node: Node) -> ModelResult<()> {
        self.own_children_mut()?.push(node);
        Ok(())
    }

    /// Inserts at `index`; `index == len` appends
    pub fn insert_child(&mut self, index: usize, node: Node) -> ModelResult<()> {
        let children = self.own_children_mut()?;
        if index > children.len() {
            return Err(ModelError::out_of_range(&Path::from([index]), index, children.len()));
        }
        children.insert(index, node);
        Ok(())
    }

    pub fn remove_child(&mut self, index: usize) -> ModelResult<Node> {
        let children = self.own_children_mut()?;
        if index >= children.len() {
            return Err(ModelError::out_of_range(&Path::from([index]), index, children.len()));
        }
        Ok(children.remove(index))
    }

    pub fn replace_child(&mut self, index: usize, node: Node) -> ModelResult<Node> {
        let children = self.own_children_mut()?;
        let len = children.len();
        let slot = children
            .get_mut(index)
            .ok_or_else(|| ModelError::out_of_range(&Path::from([index]), index, len))?;
        Ok(std::mem::replace(slot, node))
    }

    fn own_children_mut(&mut self) -> ModelResult<&mut Vec<Node>> {
        self.children_mut()
            .ok_or_else(|| ModelError::not_a_container(Path::root()))
    }

    // Raw edits addressed from this node

    /// Inserts `node` so that it ends up at `path`
    pub fn insert_node(&mut self, path: &Path, node: Node) -> ModelResult<()> {
        let (index, children) = self.children_at(path)?;
        if index > children.len() {
            return Err(ModelError::out_of_range(path, index, children.len()));
        }
        children.insert(index, node);
        Ok(())
    }

    pub fn remove_node(&mut self, path: &Path) -> ModelResult<Node> {
        let (index, children) = self.children_at(path)?;
        if index >= children.len() {
            return Err(ModelError::out_of_range(path, index, children.len()));
        }
        Ok(children.remove(index))
    }

    pub fn replace_node(&mut self, path: &Path, node: Node) -> ModelResult<Node> {
        let (index, children) = self.children_at(path)?;
        let len = children.len();
        let slot = children
            .get_mut(index)
            .ok_or_else(|| ModelError::out_of_range(path, index, len))?;
        Ok(std::mem::replace(slot, node))
    }

    /// Replaces the payload of the text at `path`, returning the old one
    pub fn set_text(&mut self, path: &Path, text: impl Into<String>) -> ModelResult<String> {
        let leaf = self
            .get_mut(path)?
            .as_text_mut()
            .ok_or_else(|| ModelError::not_text(path))?;
        Ok(std::mem::replace(&mut leaf.text, text.into()))
    }

    pub fn set_marks(&mut self, path: &Path, marks: MarkSet) -> ModelResult<MarkSet> {
        let leaf = self
            .get_mut(path)?
            .as_text_mut()
            .ok_or_else(|| ModelError::not_text(path))?;
        Ok(std::mem::replace(&mut leaf.marks, marks))
    }

    /// Sets (`Some`) or clears (`None`) a property on the container at `path`
    pub fn set_property(
        &mut self,
        path: &Path,
        key: &str,
        value: Option<String>,
    ) -> ModelResult<Option<String>> {
        let element = self
            .get_mut(path)?
            .element_mut()
            .ok_or_else(|| ModelError::not_a_container(path))?;
        Ok(match value {
            Some(value) => element.properties.insert(key.to_string(), value),
            None => element.properties.remove(key),
        })
    }

    fn children_at(&mut self, path: &Path) -> ModelResult<(usize, &mut Vec<Node>)> {
        let index = path.last().ok_or(ModelError::NoParent)?;
        let parent = path.parent()?;
        let children = self
            .get_mut(&parent)?
            .children_mut()
            .ok_or_else(|| ModelError::not_a_container(&parent))?;
        Ok((index, children))
    }
}
