//! Composition entry point: scenario names to final document

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::fs;
use crate::interpolate::Interpolator;
use crate::library::LibraryStore;
use crate::pipeline::{ExecuteOptions, Executor};
use crate::plan::Plan;
use crate::scenario::ScenarioNode;

pub struct Composer<I> {
    store: LibraryStore,
    executor: Executor<I>,
    /// Anchor for relative paths in passthrough arguments
    working_dir: PathBuf,
}

impl<I: Interpolator> Composer<I> {
    /// Passthrough paths resolve against `options.base_dir` until
    /// [`Composer::with_working_dir`] sets a separate anchor.
    pub fn new(store: LibraryStore, interpolator: I, options: ExecuteOptions) -> Self {
        let working_dir = options.base_dir.clone();
        Self {
            store,
            executor: Executor::new(interpolator, options),
            working_dir,
        }
    }

    /// Resolve passthrough paths (`-o`, `-l`, `--var-file`, `--vars-store`)
    /// against `dir` instead of the preview base directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// Build the plan for `scenarios` followed by the passthrough arguments.
    ///
    /// Passthrough ops files and variables form their own node whose plan is
    /// appended last, so its globals override every library global.
    pub fn plan(&self, scenarios: &[String], passthrough: &[String]) -> Result<Plan> {
        let trees = scenarios
            .iter()
            .map(|name| {
                self.store
                    .get_scenario_tree(name)
                    .with_context(|| format!("Failed to resolve scenario '{name}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut plan = Plan::from_scenario_trees(&trees);

        let passthrough = self
            .executor
            .interpolator()
            .parse_passthrough(passthrough)
            .context("Failed to parse passthrough arguments")?;
        if !passthrough.is_empty() {
            let node = ScenarioNode::from_passthrough(passthrough, &self.working_dir);
            plan = plan.append(Plan::from_scenario_tree(&node));
        }

        debug!(
            scenarios = scenarios.len(),
            steps = plan.steps.len(),
            "built execution plan"
        );
        Ok(plan)
    }

    /// Compose `document` and return the rendered result
    pub fn compose_document(
        &self,
        document: &str,
        scenarios: &[String],
        passthrough: &[String],
        out: &mut dyn Write,
    ) -> Result<String> {
        let plan = self.plan(scenarios, passthrough)?;
        self.executor.execute(document, &plan, out)
    }

    /// Read the template at `template` and compose it
    pub fn compose(
        &self,
        template: &Path,
        scenarios: &[String],
        passthrough: &[String],
        out: &mut dyn Write,
    ) -> Result<String> {
        let document = fs::read_to_string(template).context("Failed to read template")?;
        self.compose_document(&document, scenarios, passthrough, out)
            .with_context(|| format!("Failed to compose {}", template.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::VarsInterpolator;
    use std::fs as std_fs;
    use tempfile::TempDir;

    const LIBRARY: &str = r#"
type: patch
scenarios:
  - name: named
    snippets:
      - path: set-name.yml
    params:
      vars:
        name: from-library
    global:
      vars:
        owner: library
"#;

    fn composer(root: &Path) -> Composer<VarsInterpolator> {
        std_fs::write(root.join("library.yml"), LIBRARY).unwrap();
        std_fs::write(
            root.join("set-name.yml"),
            "- type: replace\n  path: /name?\n  value: ((name))\n",
        )
        .unwrap();
        let store = LibraryStore::load(&[root.join("library.yml")]).unwrap();
        Composer::new(
            store,
            VarsInterpolator,
            ExecuteOptions {
                base_dir: root.to_path_buf(),
                ..Default::default()
            },
        )
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_scenarios_no_passthrough_is_identity() {
        let temp_dir = TempDir::new().unwrap();
        let composer = composer(temp_dir.path());
        let document = "z: 1\n# trailing comment\n";
        let result = composer
            .compose_document(document, &[], &[], &mut Vec::new())
            .unwrap();
        assert_eq!(result, document);
    }

    #[test]
    fn test_compose_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let composer = composer(temp_dir.path());
        let result = composer
            .compose_document("owner: ((owner))\n", &names(&["named"]), &[], &mut Vec::new())
            .unwrap();
        assert_eq!(result, "owner: library\nname: from-library\n");
    }

    #[test]
    fn test_passthrough_vars_override_library_globals() {
        let temp_dir = TempDir::new().unwrap();
        let composer = composer(temp_dir.path());
        let result = composer
            .compose_document(
                "owner: ((owner))\n",
                &names(&["named"]),
                &names(&["-v", "owner=cli"]),
                &mut Vec::new(),
            )
            .unwrap();
        assert_eq!(result, "owner: cli\nname: from-library\n");
    }

    #[test]
    fn test_passthrough_ops_file_runs_last() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let composer = composer(root);
        std_fs::write(
            root.join("ops.yml"),
            "- type: replace\n  path: /name\n  value: from-ops-file\n",
        )
        .unwrap();

        let result = composer
            .compose_document(
                "a: 1\n",
                &names(&["named"]),
                &names(&["-o", "ops.yml"]),
                &mut Vec::new(),
            )
            .unwrap();
        assert_eq!(result, "a: 1\nname: from-ops-file\n");
    }

    #[test]
    fn test_passthrough_paths_use_working_dir_not_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let display_dir = root.join("display");
        std_fs::create_dir(&display_dir).unwrap();
        std_fs::write(
            root.join("ops.yml"),
            "- type: replace\n  path: /name?\n  value: from-cwd\n",
        )
        .unwrap();

        let store = LibraryStore::default();
        let composer = Composer::new(
            store,
            VarsInterpolator,
            ExecuteOptions {
                base_dir: display_dir,
                ..Default::default()
            },
        )
        .with_working_dir(root);

        let result = composer
            .compose_document("a: 1\n", &[], &names(&["-o", "ops.yml"]), &mut Vec::new())
            .unwrap();
        assert_eq!(result, "a: 1\nname: from-cwd\n");
    }

    #[test]
    fn test_unknown_scenario_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let composer = composer(temp_dir.path());
        let err = composer
            .compose_document("a: 1\n", &names(&["missing"]), &[], &mut Vec::new())
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Failed to resolve scenario 'missing'"));
        assert!(message.contains("scenario 'missing' not found"));
    }

    #[test]
    fn test_bad_passthrough_flag() {
        let temp_dir = TempDir::new().unwrap();
        let composer = composer(temp_dir.path());
        let err = composer
            .compose_document("a: 1\n", &[], &names(&["--bogus"]), &mut Vec::new())
            .unwrap_err();
        assert!(format!("{err:#}").contains("unknown passthrough flag '--bogus'"));
    }

    #[test]
    fn test_compose_reads_template() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let composer = composer(root);
        std_fs::write(root.join("template.yml"), "owner: ((owner))\n").unwrap();

        let result = composer
            .compose(&root.join("template.yml"), &names(&["named"]), &[], &mut Vec::new())
            .unwrap();
        assert_eq!(result, "owner: library\nname: from-library\n");

        let err = composer
            .compose(&root.join("absent.yml"), &[], &[], &mut Vec::new())
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read template"));
    }
}
