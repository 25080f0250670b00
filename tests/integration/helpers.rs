//! Shared fixtures for composition integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use ycompose::composer::Composer;
use ycompose::interpolate::VarsInterpolator;
use ycompose::library::LibraryStore;
use ycompose::pipeline::ExecuteOptions;

/// Write `content` to `relative` under `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture file");
    path
}

/// Two-level library: `placeholder` depends on `basic` and overrides its value
pub fn create_placeholder_library(root: &Path) -> PathBuf {
    write_file(
        root,
        "snippets/basic.yml",
        "- type: replace\n  path: /basic?\n  value: ((value2))\n",
    );
    write_file(
        root,
        "snippets/placeholder.yml",
        "- type: replace\n  path: ((path1))\n  value: placed\n",
    );
    write_file(
        root,
        "library.yml",
        r#"type: patch
scenarios:
  - name: basic
    description: Sets the basic key
    snippets:
      - path: snippets/basic.yml
    params:
      vars:
        value2: basic_default

  - name: placeholder
    description: Places a fixed key and pulls in basic
    snippets:
      - path: snippets/placeholder.yml
    scenarios:
      - name: basic
        params:
          vars:
            value2: basic_from_placeholder
    params:
      vars:
        path1: /fixed?
    global:
      vars:
        owner: composer
"#,
    )
}

/// A top-level patch library referencing a script library under `shared/`
pub fn create_aliased_libraries(root: &Path) -> PathBuf {
    write_file(
        root,
        "shared/labels.yml",
        "- command: update\n  path: metadata.labels.team\n  value: ((team))\n",
    );
    write_file(
        root,
        "shared/library.yml",
        r#"type: script
scenarios:
  - name: labels
    snippets:
      - path: labels.yml
    params:
      vars:
        team: core
"#,
    );
    write_file(
        root,
        "kind.yml",
        "- type: replace\n  path: /kind?\n  value: Deployment\n",
    );
    write_file(
        root,
        "library.yml",
        r#"type: patch
libraries:
  - alias: shared
    path: shared/library.yml
scenarios:
  - name: app
    snippets:
      - path: kind.yml
    scenarios:
      - name: shared.labels
        params:
          vars:
            team: platform
"#,
    )
}

pub fn composer(libraries: &[PathBuf], base_dir: &Path, show: bool) -> Composer<VarsInterpolator> {
    let store = LibraryStore::load(libraries).expect("Failed to load libraries");
    Composer::new(
        store,
        VarsInterpolator,
        ExecuteOptions {
            show_plan: show,
            show_diff: show,
            base_dir: base_dir.to_path_buf(),
        },
    )
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn temp_root() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}
