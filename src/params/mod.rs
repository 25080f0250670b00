//! Interpolation parameter bags and their merge rules
//!
//! A parameter bag is declared at several scopes (snippet, scenario, scenario
//! reference, global, command line). Merging is always `base.merge(&other)`
//! with `other` authoritative: keyed fields are overridden per key, the
//! optional vars store is replaced, and list fields are concatenated.

mod args;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::fs::resolve_relative_to;

pub use args::{parse_passthrough, Passthrough};

/// Variables and variable sources handed to the interpolator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpolationParams {
    /// Inline variables
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, Value>,
    /// Variables whose value is the content of a file
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub var_files: BTreeMap<String, PathBuf>,
    /// YAML files whose top-level keys are variables, applied in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vars_files: Vec<PathBuf>,
    /// Environment variable prefixes (`PREFIX_name=value`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vars_env: Vec<String>,
    /// YAML file with stored variables, lowest precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vars_store: Option<PathBuf>,
    /// Raw passthrough tokens parsed by the interpolator (`-v k=v`, `-l file`, ...).
    /// File arguments are resolved like the structured path fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl InterpolationParams {
    /// The zero value; interpolation with empty params is skipped entirely
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
            && self.var_files.is_empty()
            && self.vars_files.is_empty()
            && self.vars_env.is_empty()
            && self.vars_store.is_none()
            && self.args.is_empty()
    }

    /// Convenience constructor for a bag holding only inline variables
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Merge `other` on top of `self`; `other` wins for keyed and optional
    /// fields, list fields are concatenated `self` first.
    pub fn merge(&self, other: &InterpolationParams) -> InterpolationParams {
        let mut merged = self.clone();

        merged
            .vars
            .extend(other.vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
            .var_files
            .extend(other.var_files.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged.vars_files.extend(other.vars_files.iter().cloned());
        merged.vars_env.extend(other.vars_env.iter().cloned());
        if other.vars_store.is_some() {
            merged.vars_store = other.vars_store.clone();
        }
        merged.args.extend(other.args.iter().cloned());

        merged
    }

    /// Rewrite relative file references to absolute paths next to `source_file`
    pub fn resolve_paths(&mut self, source_file: &Path) {
        for path in self.var_files.values_mut() {
            *path = resolve_relative_to(path, source_file);
        }
        for path in &mut self.vars_files {
            *path = resolve_relative_to(path, source_file);
        }
        if let Some(store) = &mut self.vars_store {
            *store = resolve_relative_to(store, source_file);
        }
        args::resolve_arg_paths(&mut self.args, source_file);
    }
}
