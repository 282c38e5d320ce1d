//! # Normalization Rules
//!
//! Raw edits can leave the tree in shapes the rest of the editor cannot
//! handle: text next to blocks, inlines without a caret position around
//! them, empty paragraphs. Each rule looks at one container and its direct
//! children and proposes at most one [`Fix`] for them.
//!
//! Rules are:
//! - **Local**: a fix only touches the children list of the inspected container
//! - **Single-step**: one fix per firing, the engine re-inspects afterwards
//! - **Decreasing**: every fix removes a node or removes a violation, so
//!   repeated application always terminates
//!
//! Built-in rules, in evaluation order:
//!
//! | Rule                     | Fires on                                        |
//! |--------------------------|-------------------------------------------------|
//! | `sibling_kind_uniformity`| Block mixing Blocks with Text/Inline children   |
//! | `banned_containment`     | Text/Inline under Document, Block under Inline  |
//! | `adjacent_text_merge`    | two Text siblings with the same marks           |
//! | `redundant_empty_text`   | empty Text next to another Text                 |
//! | `inline_padding`         | Inline without a Text on either side            |
//! | `empty_container`        | container child without children                |

use folio_model::{ModelError, ModelResult, Node, Path};
use serde::{Deserialize, Serialize};

/// One corrective mutation on the children of the inspected container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fix {
    /// Drop the child at `index`
    RemoveChild { index: usize },
    /// Insert `node` so it ends up at `index`
    InsertChild { index: usize, node: Node },
    /// Append the text at `index + 1` to the text at `index`, then drop it
    MergeText { index: usize },
}

impl Fix {
    /// Applies the fix to `container`, which lives at `path`
    pub fn apply(&self, container: &mut Node, path: &Path) -> ModelResult<()> {
        match self {
            Fix::RemoveChild { index } => {
                container.remove_child(*index)?;
            }
            Fix::InsertChild { index, node } => {
                container.insert_child(*index, node.clone())?;
            }
            Fix::MergeText { index } => {
                let next = container.remove_child(index + 1)?;
                let Node::Text(next) = next else {
                    return Err(ModelError::not_text(path.child(index + 1)));
                };
                let children = container
                    .children_mut()
                    .ok_or_else(|| ModelError::not_a_container(path))?;
                let len = children.len();
                let target = children
                    .get_mut(*index)
                    .ok_or_else(|| ModelError::out_of_range(&path.child(*index), *index, len))?
                    .as_text_mut()
                    .ok_or_else(|| ModelError::not_text(path.child(*index)))?;
                target.text.push_str(&next.text);
            }
        }
        Ok(())
    }
}

/// A structural invariant the normalizer enforces
pub trait NormalizeRule: std::fmt::Debug {
    /// Stable name used in reports and logs
    fn name(&self) -> &'static str;

    /// Inspect the container at `path` and propose at most one fix
    fn inspect(&self, container: &Node, path: &Path) -> Option<Fix>;
}

/// A Block holds either Blocks or inline content, never both.
///
/// The minority kind is dropped one node at a time; on a tie the Blocks win.
#[derive(Debug)]
pub struct SiblingKindUniformity;

impl NormalizeRule for SiblingKindUniformity {
    fn name(&self) -> &'static str {
        "sibling_kind_uniformity"
    }

    fn inspect(&self, container: &Node, _path: &Path) -> Option<Fix> {
        let Node::Block(element) = container else {
            return None;
        };
        let blocks = element.children.iter().filter(|c| c.is_block()).count();
        let inline_flow = element.children.iter().filter(|c| c.is_inline_flow()).count();
        if blocks == 0 || inline_flow == 0 {
            return None;
        }

        let keep_blocks = blocks >= inline_flow;
        element
            .children
            .iter()
            .position(|child| {
                if keep_blocks {
                    child.is_inline_flow()
                } else {
                    child.is_block()
                }
            })
            .map(|index| Fix::RemoveChild { index })
    }
}

/// Children a container may never hold, regardless of its siblings
#[derive(Debug)]
pub struct BannedContainment;

impl NormalizeRule for BannedContainment {
    fn name(&self) -> &'static str {
        "banned_containment"
    }

    fn inspect(&self, container: &Node, _path: &Path) -> Option<Fix> {
        let children = container.children()?;
        children
            .iter()
            .position(|child| match (container, child) {
                (_, Node::Document(_)) => true,
                (Node::Document(_), Node::Text(_) | Node::Inline(_)) => true,
                (Node::Inline(_), Node::Block(_)) => true,
                _ => false,
            })
            .map(|index| Fix::RemoveChild { index })
    }
}

/// Adjacent text runs with identical marks become one run
#[derive(Debug)]
pub struct AdjacentTextMerge;

impl NormalizeRule for AdjacentTextMerge {
    fn name(&self) -> &'static str {
        "adjacent_text_merge"
    }

    fn inspect(&self, container: &Node, _path: &Path) -> Option<Fix> {
        container
            .children()?
            .windows(2)
            .position(|pair| match (&pair[0], &pair[1]) {
                (Node::Text(a), Node::Text(b)) => a.marks == b.marks,
                _ => false,
            })
            .map(|index| Fix::MergeText { index })
    }
}

/// An empty text run carries no caret position of its own when another run
/// sits right next to it.
#[derive(Debug)]
pub struct RedundantEmptyText;

impl NormalizeRule for RedundantEmptyText {
    fn name(&self) -> &'static str {
        "redundant_empty_text"
    }

    fn inspect(&self, container: &Node, _path: &Path) -> Option<Fix> {
        let children = container.children()?;
        (0..children.len())
            .find(|&index| {
                let empty = children[index].as_text().is_some_and(|text| text.is_empty());
                let previous_is_text = index > 0 && children[index - 1].is_text();
                let next_is_text = children.get(index + 1).is_some_and(Node::is_text);
                empty && (previous_is_text || next_is_text)
            })
            .map(|index| Fix::RemoveChild { index })
    }
}

/// Every Inline gets a Text sibling on both sides
#[derive(Debug)]
pub struct InlinePadding;

impl NormalizeRule for InlinePadding {
    fn name(&self) -> &'static str {
        "inline_padding"
    }

    fn inspect(&self, container: &Node, _path: &Path) -> Option<Fix> {
        let children = container.children()?;
        children.iter().enumerate().find_map(|(index, child)| {
            if !child.is_inline() {
                return None;
            }
            let previous_is_text = index > 0 && children[index - 1].is_text();
            let next_is_text = children.get(index + 1).is_some_and(Node::is_text);
            if !previous_is_text {
                Some(Fix::InsertChild {
                    index,
                    node: Node::text(""),
                })
            } else if !next_is_text {
                Some(Fix::InsertChild {
                    index: index + 1,
                    node: Node::text(""),
                })
            } else {
                None
            }
        })
    }
}

/// Containers without children are dropped by their parent
#[derive(Debug)]
pub struct EmptyContainerElimination;

impl NormalizeRule for EmptyContainerElimination {
    fn name(&self) -> &'static str {
        "empty_container"
    }

    fn inspect(&self, container: &Node, _path: &Path) -> Option<Fix> {
        container
            .children()?
            .iter()
            .position(|child| child.children().is_some_and(<[Node]>::is_empty))
            .map(|index| Fix::RemoveChild { index })
    }
}

/// Built-in rules in evaluation order
pub fn builtin_rules(strip_empty_text: bool) -> Vec<Box<dyn NormalizeRule>> {
    let mut rules: Vec<Box<dyn NormalizeRule>> = vec![
        Box::new(SiblingKindUniformity),
        Box::new(BannedContainment),
        Box::new(AdjacentTextMerge),
    ];
    if strip_empty_text {
        rules.push(Box::new(RedundantEmptyText));
    }
    rules.push(Box::new(InlinePadding));
    rules.push(Box::new(EmptyContainerElimination));
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Path {
        Path::root()
    }

    #[test]
    fn test_uniformity_prefers_blocks_on_tie() {
        let block = Node::block(vec![Node::text("one"), Node::block(vec![Node::text("two")])]);
        assert_eq!(
            SiblingKindUniformity.inspect(&block, &root()),
            Some(Fix::RemoveChild { index: 0 })
        );
    }

    #[test]
    fn test_uniformity_removes_lone_block_among_text() {
        let block = Node::block(vec![
            Node::text("a"),
            Node::block(vec![Node::text("b")]),
            Node::text("c"),
        ]);
        assert_eq!(
            SiblingKindUniformity.inspect(&block, &root()),
            Some(Fix::RemoveChild { index: 1 })
        );
    }

    #[test]
    fn test_uniformity_ignores_uniform_children() {
        let block = Node::block(vec![
            Node::text("a"),
            Node::inline(vec![Node::text("b")]),
            Node::text("c"),
        ]);
        assert_eq!(SiblingKindUniformity.inspect(&block, &root()), None);
    }

    #[test]
    fn test_banned_containment() {
        let doc = Node::document(vec![
            Node::block(vec![Node::text("a")]),
            Node::inline(vec![Node::text("b")]),
        ]);
        assert_eq!(
            BannedContainment.inspect(&doc, &root()),
            Some(Fix::RemoveChild { index: 1 })
        );

        let inline = Node::inline(vec![Node::text("a"), Node::block(vec![])]);
        assert_eq!(
            BannedContainment.inspect(&inline, &root()),
            Some(Fix::RemoveChild { index: 1 })
        );

        let block = Node::block(vec![Node::text("a"), Node::document(vec![])]);
        assert_eq!(
            BannedContainment.inspect(&block, &root()),
            Some(Fix::RemoveChild { index: 1 })
        );
    }

    #[test]
    fn test_merge_only_identical_marks() {
        let block = Node::block(vec![
            Node::marked("a", ["bold"]),
            Node::marked("b", ["italic"]),
            Node::marked("c", ["italic"]),
        ]);
        let fix = AdjacentTextMerge.inspect(&block, &root());
        assert_eq!(fix, Some(Fix::MergeText { index: 1 }));

        let mut block = block;
        fix.unwrap().apply(&mut block, &root()).unwrap();
        assert_eq!(
            block,
            Node::block(vec![Node::marked("a", ["bold"]), Node::marked("bc", ["italic"])])
        );
    }

    #[test]
    fn test_merge_rejects_non_text() {
        let mut block = Node::block(vec![Node::text("a"), Node::inline(vec![])]);
        let result = Fix::MergeText { index: 0 }.apply(&mut block, &Path::from([3]));
        assert_eq!(result, Err(ModelError::not_text(Path::from([3, 1]))));
    }

    #[test]
    fn test_redundant_empty_text() {
        let block = Node::block(vec![Node::marked("", ["bold"]), Node::text("a")]);
        assert_eq!(
            RedundantEmptyText.inspect(&block, &root()),
            Some(Fix::RemoveChild { index: 0 })
        );

        let lone = Node::block(vec![Node::text("")]);
        assert_eq!(RedundantEmptyText.inspect(&lone, &root()), None);

        let padded = Node::block(vec![
            Node::text(""),
            Node::inline(vec![Node::text("x")]),
            Node::text(""),
        ]);
        assert_eq!(RedundantEmptyText.inspect(&padded, &root()), None);
    }

    #[test]
    fn test_inline_padding() {
        let block = Node::block(vec![Node::inline(vec![Node::text("x")])]);
        assert_eq!(
            InlinePadding.inspect(&block, &root()),
            Some(Fix::InsertChild { index: 0, node: Node::text("") })
        );

        let block = Node::block(vec![Node::text("a"), Node::inline(vec![Node::text("x")])]);
        assert_eq!(
            InlinePadding.inspect(&block, &root()),
            Some(Fix::InsertChild { index: 2, node: Node::text("") })
        );
    }

    #[test]
    fn test_empty_container() {
        let doc = Node::document(vec![Node::block(vec![Node::text("a")]), Node::block(vec![])]);
        assert_eq!(
            EmptyContainerElimination.inspect(&doc, &root()),
            Some(Fix::RemoveChild { index: 1 })
        );
        assert_eq!(EmptyContainerElimination.inspect(&Node::document(vec![]), &root()), None);
    }

    #[test]
    fn test_builtin_rule_order() {
        let names: Vec<_> = builtin_rules(true).iter().map(|rule| rule.name()).collect();
        assert_eq!(
            names,
            vec![
                "sibling_kind_uniformity",
                "banned_containment",
                "adjacent_text_merge",
                "redundant_empty_text",
                "inline_padding",
                "empty_container",
            ]
        );
        assert_eq!(builtin_rules(false).len(), 5);
    }
}
