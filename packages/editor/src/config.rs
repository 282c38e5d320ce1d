use crate::errors::EditorResult;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Upper bound on normalization passes that apply fixes. One more clean
    /// pass always runs to confirm the fixed point.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Upper bound on fixes per normalization call
    #[serde(default = "default_max_fixes")]
    pub max_fixes: usize,

    /// Drop empty text runs that sit next to another text run
    #[serde(default = "default_strip_empty_text")]
    pub strip_empty_text: bool,
}

fn default_max_passes() -> usize {
    16
}

fn default_max_fixes() -> usize {
    1_000_000
}

fn default_strip_empty_text() -> bool {
    true
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<std::path::Path>) -> EditorResult<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_passes: default_max_passes(),
            max_fixes: default_max_fixes(),
            strip_empty_text: default_strip_empty_text(),
        }
    }
}
