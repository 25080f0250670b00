//! Variable collection from the sources named in a parameter bag

use anyhow::{bail, Context, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::fs;
use crate::params::{parse_passthrough, InterpolationParams};

/// Resolved variables, keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Look up `name`, descending into maps and sequences for dotted names
    /// (`db.users.0.name`) when no variable has the full name.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(name) {
            return Some(value);
        }
        let (head, rest) = name.split_once('.')?;
        let mut current = self.0.get(head)?;
        for part in rest.split('.') {
            current = match current {
                Value::Sequence(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Gather variables from every source in `params`.
///
/// Precedence, lowest first: vars store, environment prefixes, vars files in
/// order, var files, inline vars, then whatever the raw `args` declare.
pub fn collect_variables(params: &InterpolationParams) -> Result<Variables> {
    let mut variables = Variables::default();

    if let Some(store) = &params.vars_store {
        if store.exists() {
            load_vars_file(store, &mut variables)
                .with_context(|| format!("Failed to load vars store {}", store.display()))?;
        } else {
            debug!(path = %store.display(), "vars store does not exist yet");
        }
    }

    for prefix in &params.vars_env {
        let prefix = format!("{prefix}_");
        // Entries outside the prefix are never decoded
        for (key, raw) in std::env::vars_os() {
            let Some(name) = key.to_str().and_then(|key| key.strip_prefix(&prefix)) else {
                continue;
            };
            let Some(raw) = raw.to_str() else {
                bail!("Environment variable {prefix}{name} is not valid UTF-8");
            };
            let value =
                serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            variables.insert(name, value);
        }
    }

    for path in &params.vars_files {
        load_vars_file(path, &mut variables)?;
    }

    for (name, path) in &params.var_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to load var file for '{name}'"))?;
        variables.insert(name.clone(), Value::String(content));
    }

    for (name, value) in &params.vars {
        variables.insert(name.clone(), value.clone());
    }

    if !params.args.is_empty() {
        let passthrough = parse_passthrough(&params.args)?;
        if !passthrough.ops_files.is_empty() {
            bail!("Ops files cannot be passed through interpolation args");
        }
        for (name, value) in collect_variables(&passthrough.params)?.0 {
            variables.insert(name, value);
        }
    }

    Ok(variables)
}

fn load_vars_file(path: &Path, variables: &mut Variables) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let parsed: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse vars file {}", path.display()))?;

    match parsed {
        Value::Null => Ok(()),
        Value::Mapping(map) => {
            for (key, value) in map {
                let Value::String(name) = key else {
                    bail!("Vars file {} has a non-string key", path.display());
                };
                variables.insert(name, value);
            }
            Ok(())
        }
        _ => bail!("Vars file {} must contain a map", path.display()),
    }
}
