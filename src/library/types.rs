//! Library file schema

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::params::InterpolationParams;

/// A parsed library file.
///
/// `path` is not part of the file; the loader fills it in with the resolved
/// absolute path, which is also the library's identity in the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Library {
    #[serde(skip)]
    pub path: PathBuf,
    /// Default processor type for snippets that omit one
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(default)]
    pub libraries: Vec<LibraryRef>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Library {
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn library_ref(&self, alias: &str) -> Option<&LibraryRef> {
        self.libraries.iter().find(|l| l.alias == alias)
    }
}

/// Reference to another library under a local alias
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryRef {
    pub alias: String,
    pub path: PathBuf,
}

/// A named, reusable sequence of snippets plus its dependencies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
    /// Dependencies, resolved and applied before this scenario's snippets
    #[serde(default)]
    pub scenarios: Vec<ScenarioRef>,
    /// Scenario-local scope, visible to this scenario's snippets and its dependencies
    #[serde(default)]
    pub params: InterpolationParams,
    /// Whole-document scope applied after every step
    #[serde(default)]
    pub global: InterpolationParams,
}

/// Reference to an external transformation file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snippet {
    pub path: PathBuf,
    #[serde(default, rename = "type")]
    pub processor: Option<String>,
    #[serde(default)]
    pub params: InterpolationParams,
}

/// Dependency edge to another scenario, possibly alias-qualified (`alias.name`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioRef {
    pub name: String,
    /// Overrides merged over the referenced scenario's own scope
    #[serde(default)]
    pub params: InterpolationParams,
}
