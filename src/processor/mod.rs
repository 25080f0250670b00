//! Snippet processors
//!
//! A processor applies a resolved snippet to a document. The set of
//! processors is closed: library files name one by type string, which is
//! resolved once to a [`ProcessorType`] when the scenario tree is built.

mod patch;
pub mod path;
mod script;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

pub use patch::PatchProcessor;
pub use script::ScriptProcessor;

/// Applies a snippet's transformation to a document
pub trait Processor {
    fn process(&self, document: Value, snippet: &Value) -> Result<Value>;

    /// Whether `snippet` has the shape this processor expects
    fn validate_snippet(&self, snippet: &Value) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorType {
    /// Slash-pointer `replace` / `remove` operations
    Patch,
    /// Dotted-path `update` / `delete` / `merge` commands
    Script,
}

impl ProcessorType {
    pub fn processor(self) -> &'static dyn Processor {
        match self {
            ProcessorType::Patch => &PatchProcessor,
            ProcessorType::Script => &ScriptProcessor,
        }
    }
}

impl std::fmt::Display for ProcessorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessorType::Patch => write!(f, "patch"),
            ProcessorType::Script => write!(f, "script"),
        }
    }
}

impl std::str::FromStr for ProcessorType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patch" => Ok(ProcessorType::Patch),
            "script" => Ok(ProcessorType::Script),
            _ => anyhow::bail!("Invalid processor type: {s}. Use: patch, script"),
        }
    }
}
