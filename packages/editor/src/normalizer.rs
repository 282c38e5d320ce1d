//! # Normalizer
//!
//! Drives the rules in [`crate::rules`] to a fixed point.
//!
//! ## State machine
//!
//! ```text
//! Dirty(path) → Inspect(path) ─┬─ rule fired → Fix(path) → Dirty(path)
//!                              └─ no rule    → Clean
//! ```
//!
//! Containers are settled bottom-up: every container of the dirtied subtree
//! (descendants before ancestors), then each ancestor of the dirtied path up
//! to the root. A fix only rewrites the children list of the container it
//! was proposed for, so the remaining worklist paths stay valid while a pass
//! runs. Passes repeat until one applies no fix. That last clean pass only
//! confirms the fixed point and is not charged against `max_passes`.

use crate::config::EditorConfig;
use crate::errors::{EditorError, EditorResult};
use crate::rules::{builtin_rules, Fix, NormalizeRule};
use folio_model::{Node, Path};
use serde::Serialize;
use tracing::{debug, instrument, trace};

/// A fix the normalizer applied, for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFix {
    pub rule: &'static str,
    /// Container whose children were rewritten
    pub path: Path,
    pub fix: Fix,
}

/// Outcome of one `normalize` call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    /// Full bottom-up passes run, including the final clean one
    pub passes: usize,
    pub fixes: Vec<AppliedFix>,
}

impl NormalizeReport {
    /// True when the tree was already normalized
    pub fn is_clean(&self) -> bool {
        self.fixes.is_empty()
    }
}

#[derive(Debug)]
enum State {
    Dirty(Path),
    Inspect(Path),
    Fix(Path, &'static str, Fix),
    Clean,
}

/// Fixed-point rule engine
#[derive(Debug)]
pub struct Normalizer {
    rules: Vec<Box<dyn NormalizeRule>>,
    max_passes: usize,
    max_fixes: usize,
}

impl Normalizer {
    /// Engine with the built-in rules and default limits
    pub fn new() -> Self {
        Self::from_config(&EditorConfig::default())
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            rules: builtin_rules(config.strip_empty_text),
            max_passes: config.max_passes,
            max_fixes: config.max_fixes,
        }
    }

    /// Appends a rule, evaluated after every rule already registered
    pub fn with_rule(mut self, rule: Box<dyn NormalizeRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// First fix any rule proposes for the container at `path`
    pub fn inspect(&self, root: &Node, path: &Path) -> EditorResult<Option<(&'static str, Fix)>> {
        let container = root.get(path)?;
        Ok(self
            .rules
            .iter()
            .find_map(|rule| rule.inspect(container, path).map(|fix| (rule.name(), fix))))
    }

    /// True when no rule fires anywhere in the tree
    pub fn is_normalized(&self, root: &Node) -> bool {
        root.entries()
            .filter(|(node, _)| node.is_container())
            .all(|(node, path)| self.rules.iter().all(|rule| rule.inspect(node, &path).is_none()))
    }

    /// Normalizes the whole tree
    pub fn normalize_all(&self, root: &mut Node) -> EditorResult<NormalizeReport> {
        self.normalize(root, &Path::root())
    }

    /// Restores every invariant within the subtree at `dirty` and along its
    /// ancestors.
    ///
    /// If `dirty` no longer addresses a container (the edit removed it, or it
    /// names a text leaf), its deepest live container ancestor is used.
    #[instrument(level = "debug", skip(self, root, dirty), fields(dirty = %dirty))]
    pub fn normalize(&self, root: &mut Node, dirty: &Path) -> EditorResult<NormalizeReport> {
        let mut report = NormalizeReport::default();

        // `max_passes` passes may apply fixes, plus one to confirm
        for _ in 0..=self.max_passes {
            report.passes += 1;
            let scope = live_scope(root, dirty);
            let before = report.fixes.len();
            for path in worklist(root, &scope) {
                self.settle(root, path, &mut report)?;
            }
            if report.fixes.len() == before {
                debug!(
                    passes = report.passes,
                    fixes = report.fixes.len(),
                    "Normalization reached fixed point"
                );
                return Ok(report);
            }
        }

        Err(EditorError::NormalizationDiverged {
            passes: report.passes,
            fixes: report.fixes.len(),
        })
    }

    /// Runs the state machine for one container until it is clean
    fn settle(&self, root: &mut Node, path: Path, report: &mut NormalizeReport) -> EditorResult<()> {
        let mut state = State::Dirty(path);
        loop {
            state = match state {
                State::Dirty(path) => State::Inspect(path),
                State::Inspect(path) => match self.inspect(root, &path)? {
                    Some((rule, fix)) => State::Fix(path, rule, fix),
                    None => State::Clean,
                },
                State::Fix(path, rule, fix) => {
                    if report.fixes.len() >= self.max_fixes {
                        return Err(EditorError::NormalizationDiverged {
                            passes: report.passes,
                            fixes: report.fixes.len(),
                        });
                    }
                    fix.apply(root.get_mut(&path)?, &path)?;
                    debug!(rule, path = %path, ?fix, "Applied normalization fix");
                    report.fixes.push(AppliedFix {
                        rule,
                        path: path.clone(),
                        fix,
                    });
                    State::Dirty(path)
                }
                State::Clean => return Ok(()),
            };
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Deepest container along `dirty` that still exists
fn live_scope(root: &Node, dirty: &Path) -> Path {
    let mut scope = Path::root();
    let mut node = root;
    for &index in dirty {
        match node.children().and_then(|children| children.get(index)) {
            Some(child) if child.is_container() => {
                node = child;
                scope.push(index);
            }
            _ => break,
        }
    }
    if scope != *dirty {
        trace!(dirty = %dirty, scope = %scope, "Dirty path narrowed to live container");
    }
    scope
}

/// Containers to settle, children before parents
fn worklist(root: &Node, scope: &Path) -> Vec<Path> {
    let Ok(subtree) = root.get(scope) else {
        return Vec::new();
    };
    let mut paths: Vec<Path> = subtree
        .entries()
        .filter(|(node, _)| node.is_container())
        .map(|(_, relative)| scope.join(&relative))
        .collect();
    // Reversed pre-order visits every node after all of its descendants.
    paths.reverse();
    paths.extend(scope.ancestors().into_iter().rev());
    paths
}

/// Normalizes `root` from `dirty` with the built-in rules
pub fn normalize(root: &mut Node, dirty: &Path) -> EditorResult<NormalizeReport> {
    Normalizer::new().normalize(root, dirty)
}
