//! Shared helpers for editor integration tests

#![allow(dead_code)]

use folio_model::{Node, Path};
use rand::rngs::StdRng;
use rand::Rng;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn paragraph(text: &str) -> Node {
    Node::block(vec![Node::text(text)])
}

pub fn link(text: &str) -> Node {
    Node::inline(vec![Node::text(text)])
}

/// Checks the document invariants directly, without going through the rules
pub fn check_invariants(root: &Node) -> Result<(), String> {
    for (node, path) in root.entries() {
        let Some(children) = node.children() else {
            continue;
        };

        if children.is_empty() && !path.is_root() {
            return Err(format!("empty container at {}", path));
        }

        let blocks = children.iter().filter(|c| c.is_block()).count();
        let inline_flow = children.iter().filter(|c| c.is_inline_flow()).count();
        if blocks > 0 && inline_flow > 0 {
            return Err(format!("mixed children at {}", path));
        }

        for (index, child) in children.iter().enumerate() {
            let child_path = path.child(index);
            match (node, child) {
                (_, Node::Document(_)) => {
                    return Err(format!("nested document at {}", child_path));
                }
                (Node::Document(_), Node::Text(_) | Node::Inline(_)) => {
                    return Err(format!("inline content under document at {}", child_path));
                }
                (Node::Inline(_), Node::Block(_)) => {
                    return Err(format!("block inside inline at {}", child_path));
                }
                _ => {}
            }

            if child.is_inline() {
                let before = index > 0 && children[index - 1].is_text();
                let after = children.get(index + 1).is_some_and(Node::is_text);
                if !before || !after {
                    return Err(format!("unpadded inline at {}", child_path));
                }
            }
        }

        for (index, pair) in children.windows(2).enumerate() {
            if let (Node::Text(a), Node::Text(b)) = (&pair[0], &pair[1]) {
                if a.marks == b.marks {
                    return Err(format!("unmerged text at {}", path.child(index)));
                }
            }
        }
    }
    Ok(())
}

fn random_text(rng: &mut StdRng) -> Node {
    let text = match rng.gen_range(0..4) {
        0 => String::new(),
        n => format!("t{}", n),
    };
    match rng.gen_range(0..4) {
        0 => Node::marked(text, ["bold"]),
        1 => Node::marked(text, ["italic"]),
        2 => Node::marked(text, ["bold", "italic"]),
        _ => Node::text(text),
    }
}

/// Arbitrary, usually malformed, subtree
pub fn random_node(rng: &mut StdRng, depth: usize) -> Node {
    if depth == 0 || rng.gen_bool(0.35) {
        return random_text(rng);
    }
    let children = (0..rng.gen_range(0..4))
        .map(|_| random_node(rng, depth - 1))
        .collect();
    match rng.gen_range(0..10) {
        0 => Node::document(children),
        1..=5 => Node::block(children),
        _ => Node::inline(children),
    }
}

pub fn random_document(rng: &mut StdRng) -> Node {
    let children = (0..rng.gen_range(0..5))
        .map(|_| random_node(rng, 4))
        .collect();
    Node::document(children)
}

/// Some path currently in the tree
pub fn random_path(rng: &mut StdRng, root: &Node) -> Path {
    let paths: Vec<Path> = root.entries().map(|(_, path)| path).collect();
    paths[rng.gen_range(0..paths.len())].clone()
}
