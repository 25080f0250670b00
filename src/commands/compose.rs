//! `ycompose compose`

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::composer::Composer;
use crate::config::ComposeConfig;
use crate::fs;
use crate::interpolate::VarsInterpolator;
use crate::library::LibraryStore;
use crate::pipeline::ExecuteOptions;

/// Arguments of the compose command, after CLI parsing
#[derive(Debug, Clone, Default)]
pub struct ComposeArgs {
    pub config: Option<PathBuf>,
    pub libraries: Vec<PathBuf>,
    pub show_plan: bool,
    pub show_diff: bool,
    pub output: Option<PathBuf>,
    pub template: PathBuf,
    pub scenarios: Vec<String>,
    pub passthrough: Vec<String>,
}

/// Compose the template and write it to stdout or `--output`
pub fn execute(args: ComposeArgs) -> Result<()> {
    let cwd = fs::working_dir()?;
    let config = ComposeConfig::load(args.config.as_deref(), &cwd)?.with_overrides(
        &args.libraries,
        args.show_plan,
        args.show_diff,
        &cwd,
    );

    if config.libraries.is_empty() && !args.scenarios.is_empty() {
        bail!("No libraries given; pass --library or list them in ycompose.toml");
    }

    let store = LibraryStore::load_from(&cwd, &config.libraries)?;
    debug!(libraries = store.len(), "library store loaded");

    let options = ExecuteOptions {
        show_plan: config.show_plan,
        show_diff: config.show_diff,
        base_dir: config.base_dir.clone().unwrap_or_else(|| cwd.clone()),
    };
    let composer = Composer::new(store, VarsInterpolator, options).with_working_dir(&cwd);

    let template = fs::resolve_in_dir(&args.template, &cwd);
    let mut side_channel = io::stderr().lock();
    let document = composer.compose(
        &template,
        &args.scenarios,
        &args.passthrough,
        &mut side_channel,
    )?;

    match &args.output {
        Some(path) => {
            let path = fs::resolve_in_dir(path, &cwd);
            std::fs::write(&path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {}",
                "Composed".green().bold(),
                fs::display_path(&path, &cwd)
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .context("Failed to write document to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}
