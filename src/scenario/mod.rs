//! Scenario dependency trees
//!
//! A [`ScenarioNode`] is a scenario materialized at one reference site: its
//! snippets with processor types resolved, the scope it declares, the scope
//! handed to it by the referencing scenario, and its already-resolved
//! dependencies. Nodes own their data; the library store is only read while
//! the tree is built.

mod cycle;
mod resolve;


use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::fs::resolve_in_dir;
use crate::params::{InterpolationParams, Passthrough};
use crate::processor::ProcessorType;

/// Name given to the node synthesized from command-line passthrough arguments
pub const COMMAND_LINE: &str = "<command-line>";

/// Where a node's scenario was declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeSource {
    Library(PathBuf),
    CommandLine,
}

impl std::fmt::Display for NodeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeSource::Library(path) => write!(f, "{}", path.display()),
            NodeSource::CommandLine => write!(f, "{COMMAND_LINE}"),
        }
    }
}

/// A snippet with its processor type resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSnippet {
    pub path: PathBuf,
    pub processor: Option<ProcessorType>,
    pub params: InterpolationParams,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioNode {
    pub name: String,
    pub description: Option<String>,
    pub source: NodeSource,
    pub snippets: Vec<ResolvedSnippet>,
    /// Scope declared by the scenario itself
    pub local: InterpolationParams,
    /// Scope supplied by the referencing scenario (empty at the root)
    pub ref_params: InterpolationParams,
    /// Whole-document scope
    pub global: InterpolationParams,
    /// Dependencies, in declaration order
    pub children: Vec<ScenarioNode>,
}

impl ScenarioNode {
    /// Synthesize a node from passthrough arguments: ops files become patch
    /// snippets (relative to `base_dir`), everything else the global scope.
    pub fn from_passthrough(passthrough: Passthrough, base_dir: &Path) -> Self {
        let snippets = passthrough
            .ops_files
            .iter()
            .map(|path| ResolvedSnippet {
                path: resolve_in_dir(path, base_dir),
                processor: Some(ProcessorType::Patch),
                params: InterpolationParams::default(),
            })
            .collect();

        let mut global = passthrough.params;
        for path in &mut global.vars_files {
            *path = resolve_in_dir(path, base_dir);
        }
        for path in global.var_files.values_mut() {
            *path = resolve_in_dir(path, base_dir);
        }
        if let Some(store) = &mut global.vars_store {
            *store = resolve_in_dir(store, base_dir);
        }

        Self {
            name: COMMAND_LINE.to_string(),
            description: None,
            source: NodeSource::CommandLine,
            snippets,
            local: InterpolationParams::default(),
            ref_params: InterpolationParams::default(),
            global,
            children: Vec::new(),
        }
    }

    /// Local scope with the reference scope merged on top
    pub fn merged_params(&self) -> InterpolationParams {
        self.local.merge(&self.ref_params)
    }

    /// Number of nodes in this tree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ScenarioNode::node_count).sum::<usize>()
    }
}
