//! Scenario name resolution and tree construction

use anyhow::{bail, Context, Result};
use tracing::debug;

use super::cycle::{self, ResolutionPath};
use super::{NodeSource, ResolvedSnippet, ScenarioNode};
use crate::error::ComposeError;
use crate::library::{Library, LibraryStore, Scenario, Snippet};
use crate::params::InterpolationParams;

impl LibraryStore {
    /// Resolve `name` against the top-level libraries, in request order, and
    /// build its dependency tree.
    pub fn get_scenario_tree(&self, name: &str) -> Result<ScenarioNode> {
        let mut first_miss = None;

        for library in self.top_level() {
            match self.locate(library, name, name) {
                Ok((owner, scenario)) => {
                    debug!(
                        scenario = name,
                        library = %owner.path.display(),
                        "resolving scenario tree"
                    );
                    let mut path = ResolutionPath::new();
                    return self.build_node(
                        owner,
                        scenario,
                        InterpolationParams::default(),
                        &mut path,
                    );
                }
                Err(err) if err.is_not_found() => {
                    first_miss.get_or_insert(err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        match first_miss {
            Some(err) => Err(err.into()),
            None => bail!("No libraries loaded; cannot resolve scenario '{name}'"),
        }
    }

    /// Find the library owning `name` and the scenario itself.
    ///
    /// `alias.rest` follows the alias declared in `library` and resolves
    /// `rest` there; `original` is the name reported on failure.
    pub fn locate<'a>(
        &'a self,
        library: &'a Library,
        name: &str,
        original: &str,
    ) -> Result<(&'a Library, &'a Scenario), ComposeError> {
        match name.split_once('.') {
            None => library
                .scenario(name)
                .map(|scenario| (library, scenario))
                .ok_or_else(|| ComposeError::ScenarioNotFound {
                    scenario: original.to_string(),
                    library: library.path.clone(),
                }),
            Some((alias, rest)) => {
                let reference =
                    library
                        .library_ref(alias)
                        .ok_or_else(|| ComposeError::AliasNotFound {
                            alias: alias.to_string(),
                            scenario: original.to_string(),
                            library: library.path.clone(),
                        })?;
                let target = self.get(&reference.path)?;
                self.locate(target, rest, original)
            }
        }
    }

    fn build_node(
        &self,
        library: &Library,
        scenario: &Scenario,
        ref_params: InterpolationParams,
        path: &mut ResolutionPath,
    ) -> Result<ScenarioNode> {
        cycle::check(path, &library.path, &scenario.name)?;
        path.push((library.path.clone(), scenario.name.clone()));

        let snippets = scenario
            .snippets
            .iter()
            .map(|snippet| resolve_snippet(library, snippet))
            .collect::<Result<Vec<_>, _>>()?;

        let mut children = Vec::with_capacity(scenario.scenarios.len());
        for dependency in &scenario.scenarios {
            let (owner, target) = self
                .locate(library, &dependency.name, &dependency.name)
                .with_context(|| {
                    format!("Failed to resolve dependency of scenario '{}'", scenario.name)
                })?;
            let child = self
                .build_node(owner, target, dependency.params.clone(), path)
                .with_context(|| format!("In dependency '{}'", dependency.name))?;
            children.push(child);
        }

        path.pop();

        debug!(
            scenario = %scenario.name,
            snippets = snippets.len(),
            dependencies = children.len(),
            "resolved scenario node"
        );

        Ok(ScenarioNode {
            name: scenario.name.clone(),
            description: scenario.description.clone(),
            source: NodeSource::Library(library.path.clone()),
            snippets,
            local: scenario.params.clone(),
            ref_params,
            global: scenario.global.clone(),
            children,
        })
    }
}

/// Default the processor type from the library and parse it
fn resolve_snippet(library: &Library, snippet: &Snippet) -> Result<ResolvedSnippet, ComposeError> {
    let processor = snippet
        .processor
        .as_ref()
        .or(library.processor.as_ref())
        .map(|kind| {
            kind.parse().map_err(|_| ComposeError::UnknownProcessor {
                kind: kind.clone(),
                snippet: snippet.path.clone(),
            })
        })
        .transpose()?;

    Ok(ResolvedSnippet {
        path: snippet.path.clone(),
        processor,
        params: snippet.params.clone(),
    })
}
