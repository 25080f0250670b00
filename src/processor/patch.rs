//! Patch processor: ordered `replace` / `remove` operations on slash pointers

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

use super::path::{parse_pointer, remove, set};
use super::Processor;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum PatchOp {
    Replace { path: String, value: Value },
    Remove { path: String },
}

impl PatchOp {
    fn path(&self) -> &str {
        match self {
            PatchOp::Replace { path, .. } | PatchOp::Remove { path } => path,
        }
    }

    fn apply(self, document: &mut Value) -> Result<()> {
        match self {
            PatchOp::Replace { path, value } => set(document, &parse_pointer(&path)?, value, false),
            PatchOp::Remove { path } => remove(document, &parse_pointer(&path)?),
        }
    }
}

fn parse_ops(snippet: &Value) -> Result<Vec<PatchOp>> {
    serde_yaml::from_value(snippet.clone()).context("Snippet is not a list of patch operations")
}

#[derive(Debug, Default)]
pub struct PatchProcessor;

impl Processor for PatchProcessor {
    fn process(&self, mut document: Value, snippet: &Value) -> Result<Value> {
        for (idx, op) in parse_ops(snippet)?.into_iter().enumerate() {
            let path = op.path().to_string();
            op.apply(&mut document)
                .with_context(|| format!("Patch operation #{} at '{path}' failed", idx + 1))?;
        }
        Ok(document)
    }

    fn validate_snippet(&self, snippet: &Value) -> bool {
        parse_ops(snippet).is_ok_and(|ops| ops.iter().all(|op| parse_pointer(op.path()).is_ok()))
    }
}
