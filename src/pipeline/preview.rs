//! Side-channel output: step previews and document diffs

use anyhow::{Context, Result};
use serde::Serialize;
use similar::TextDiff;
use std::io::Write;
use std::path::Path;

use crate::fs::display_path;
use crate::params::InterpolationParams;
use crate::plan::ExecutionStep;
use crate::processor::ProcessorType;

/// What a step is about to do, as printed with `--show-plan`
#[derive(Debug, Serialize)]
pub struct StepPreview<'a> {
    pub step: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<ProcessorType>,
    pub scopes: Vec<&'a str>,
    pub params: &'a InterpolationParams,
}

impl<'a> StepPreview<'a> {
    pub fn new(
        index: usize,
        total: usize,
        step: &'a ExecutionStep,
        params: &'a InterpolationParams,
        base_dir: &Path,
    ) -> Self {
        Self {
            step: index + 1,
            total,
            snippet: step.snippet.as_ref().map(|p| display_path(p, base_dir)),
            processor: step.processor,
            scopes: step.tags(),
            params,
        }
    }
}

pub fn write_preview(out: &mut dyn Write, preview: &StepPreview<'_>) -> Result<()> {
    let body = serde_yaml::to_string(preview).context("Failed to render step preview")?;
    writeln!(out, "# step {}/{}", preview.step, preview.total)?;
    out.write_all(body.as_bytes())?;
    Ok(())
}

/// Unified line diff between two renderings of the document
pub fn render_diff(before: &str, after: &str) -> String {
    if before == after {
        return "(no changes)\n".to_string();
    }
    TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header("before", "after")
        .to_string()
}

pub fn write_diff(out: &mut dyn Write, label: &str, before: &str, after: &str) -> Result<()> {
    writeln!(out, "# diff {label}")?;
    out.write_all(render_diff(before, after).as_bytes())?;
    Ok(())
}
