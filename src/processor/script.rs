//! Script processor: `update` / `delete` / `merge` commands on dotted paths

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

use super::path::{all_optional, deep_merge, parse_dotted, remove, resolve_mut, set};
use super::Processor;

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
enum Command {
    /// Set the value at `path`, creating missing maps on the way
    Update { path: String, value: Value },
    /// Remove the node at `path`; missing nodes are ignored
    Delete { path: String },
    /// Deep-merge `value` into the node at `path` (the root when empty)
    Merge {
        #[serde(default)]
        path: String,
        value: Value,
    },
}

impl Command {
    fn path(&self) -> &str {
        match self {
            Command::Update { path, .. }
            | Command::Delete { path }
            | Command::Merge { path, .. } => path,
        }
    }

    fn run(self, document: &mut Value) -> Result<()> {
        match self {
            Command::Update { path, value } => set(document, &parse_dotted(&path)?, value, true),
            Command::Delete { path } => remove(document, &all_optional(parse_dotted(&path)?)),
            Command::Merge { path, value } => {
                let target = resolve_mut(document, &parse_dotted(&path)?, true)?;
                deep_merge(target, value);
                Ok(())
            }
        }
    }
}

fn parse_commands(snippet: &Value) -> Result<Vec<Command>> {
    serde_yaml::from_value(snippet.clone()).context("Snippet is not a list of script commands")
}

#[derive(Debug, Default)]
pub struct ScriptProcessor;

impl Processor for ScriptProcessor {
    fn process(&self, mut document: Value, snippet: &Value) -> Result<Value> {
        for (idx, command) in parse_commands(snippet)?.into_iter().enumerate() {
            let path = command.path().to_string();
            command
                .run(&mut document)
                .with_context(|| format!("Script command #{} at '{path}' failed", idx + 1))?;
        }
        Ok(document)
    }

    fn validate_snippet(&self, snippet: &Value) -> bool {
        parse_commands(snippet)
            .is_ok_and(|commands| commands.iter().all(|c| parse_dotted(c.path()).is_ok()))
    }
}
