//! Pipeline executor: applies plan steps to a document one at a time
//!
//! Each step reads its snippet, interpolates it with the step's flattened
//! scopes, hands it to the step's processor, then interpolates the resulting
//! document with the plan's global scope. Steps run strictly in order since
//! every step consumes the previous step's output.

mod preview;


use anyhow::{bail, Context, Result};
use serde_yaml::Value;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::fs::{self, display_path};
use crate::interpolate::Interpolator;
use crate::params::InterpolationParams;
use crate::plan::{ExecutionStep, Plan};

pub use preview::{render_diff, write_diff, write_preview, StepPreview};

#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Print a preview record before each step
    pub show_plan: bool,
    /// Print a diff of the document after each step
    pub show_diff: bool,
    /// Base directory for paths shown in previews
    pub base_dir: PathBuf,
}

pub struct Executor<I> {
    interpolator: I,
    options: ExecuteOptions,
}

impl<I: Interpolator> Executor<I> {
    pub fn new(interpolator: I, options: ExecuteOptions) -> Self {
        Self {
            interpolator,
            options,
        }
    }

    pub fn interpolator(&self) -> &I {
        &self.interpolator
    }

    /// Run `plan` against `document`, writing previews and diffs to `out`.
    ///
    /// An empty plan returns the document untouched, byte for byte.
    pub fn execute(&self, document: &str, plan: &Plan, out: &mut dyn Write) -> Result<String> {
        if plan.is_empty() {
            debug!("empty plan, returning document unchanged");
            return Ok(document.to_string());
        }

        let mut current: Value =
            serde_yaml::from_str(document).context("Failed to parse template document")?;

        let total = plan.steps.len();
        for (index, step) in plan.steps.iter().enumerate() {
            let label = self.step_label(step);
            current = self
                .run_step(index, total, step, current, &plan.global, out)
                .with_context(|| format!("Step {}/{total} ({label}) failed", index + 1))?;
        }

        if plan.steps.is_empty() {
            let before = self.render_if_diffing(&current)?;
            current = self
                .interpolator
                .interpolate(&current, &plan.global)
                .context("Failed to interpolate global parameters")?;
            if let Some(before) = before {
                write_diff(out, "globals", &before, &render(&current)?)?;
            }
        }

        render(&current)
    }

    fn run_step(
        &self,
        index: usize,
        total: usize,
        step: &ExecutionStep,
        current: Value,
        global: &InterpolationParams,
        out: &mut dyn Write,
    ) -> Result<Value> {
        let params = step.flatten();
        if self.options.show_plan {
            let preview = StepPreview::new(index, total, step, &params, &self.options.base_dir);
            write_preview(out, &preview)?;
        }

        let before = self.render_if_diffing(&current)?;
        let mut document = current;

        if let Some(path) = &step.snippet {
            debug!(step = index + 1, snippet = %path.display(), "applying snippet");
            let raw = fs::read_to_string(path).context("Failed to read snippet")?;
            let snippet: Value = serde_yaml::from_str(&raw)
                .with_context(|| format!("Failed to parse snippet {}", path.display()))?;
            let snippet = self
                .interpolator
                .interpolate(&snippet, &params)
                .context("Failed to interpolate snippet")?;

            match step.processor {
                Some(kind) => {
                    let processor = kind.processor();
                    if !processor.validate_snippet(&snippet) {
                        bail!("{} is not a valid {kind} snippet", path.display());
                    }
                    document = processor
                        .process(document, &snippet)
                        .with_context(|| format!("The {kind} processor failed"))?;
                }
                None => warn!(
                    snippet = %path.display(),
                    "snippet has no processor type, document left unchanged"
                ),
            }
        }

        document = self
            .interpolator
            .interpolate(&document, global)
            .context("Failed to interpolate global parameters")?;

        if let Some(before) = before {
            let label = self.step_label(step);
            write_diff(out, &label, &before, &render(&document)?)?;
        }

        Ok(document)
    }

    fn render_if_diffing(&self, document: &Value) -> Result<Option<String>> {
        if self.options.show_diff {
            render(document).map(Some)
        } else {
            Ok(None)
        }
    }

    fn step_label(&self, step: &ExecutionStep) -> String {
        match &step.snippet {
            Some(path) => display_path(path, &self.options.base_dir),
            None => step.tags().first().copied().unwrap_or("globals").to_string(),
        }
    }
}

fn render(document: &Value) -> Result<String> {
    serde_yaml::to_string(document).context("Failed to render document")
}
