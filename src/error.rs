//! Error taxonomy for library resolution and passthrough argument parsing
//!
//! Transformation failures (snippet reads, interpolation, processors) are
//! reported through `anyhow` context chains; the variants here are the
//! resolution errors callers may want to match on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("scenario '{scenario}' not found in library {}", library.display())]
    ScenarioNotFound { scenario: String, library: PathBuf },

    #[error(
        "library alias '{alias}' not found in {} while resolving scenario '{scenario}'",
        library.display()
    )]
    AliasNotFound {
        alias: String,
        scenario: String,
        library: PathBuf,
    },

    #[error("library {} was referenced but never loaded", path.display())]
    LibraryNotLoaded { path: PathBuf },

    #[error("unknown processor type '{kind}' for snippet {}", snippet.display())]
    UnknownProcessor { kind: String, snippet: PathBuf },

    #[error("Circular scenario dependency: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    #[error("invalid library {}:\n  - {}", path.display(), problems.join("\n  - "))]
    InvalidLibrary {
        path: PathBuf,
        problems: Vec<String>,
    },

    #[error("unknown passthrough flag '{0}'")]
    UnknownFlag(String),

    #[error("passthrough flag '{0}' requires a value")]
    MissingFlagValue(String),

    #[error("passthrough flag '{flag}' expects name=value, got '{value}'")]
    MalformedAssignment { flag: String, value: String },
}

impl ComposeError {
    /// True for lookup misses, which let the resolver try the next top-level library
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ComposeError::ScenarioNotFound { .. } | ComposeError::AliasNotFound { .. }
        )
    }
}
