//! Passthrough argument parsing
//!
//! Trailing command-line tokens and the `args` list of a parameter bag use
//! the same flag vocabulary: `-v/--var name=value`, `-l/--vars-file path`,
//! `--var-file name=path`, `--vars-env PREFIX`, `--vars-store path` and
//! `-o/--ops-file path`. Flags accept `--flag value` and `--flag=value`.

use serde_yaml::Value;
use std::path::{Path, PathBuf};

use super::InterpolationParams;
use crate::fs::resolve_relative_to;
use crate::error::ComposeError;

/// Parsed passthrough tokens
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Passthrough {
    pub params: InterpolationParams,
    /// Patch files requested with `-o`, in order
    pub ops_files: Vec<PathBuf>,
}

impl Passthrough {
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.ops_files.is_empty()
    }
}

/// Parse passthrough tokens into parameters and ops files
pub fn parse_passthrough<S: AsRef<str>>(args: &[S]) -> Result<Passthrough, ComposeError> {
    let mut parsed = Passthrough::default();
    let mut tokens = args.iter().map(AsRef::as_ref);

    while let Some(token) = tokens.next() {
        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (token, None),
        };

        let mut value = || -> Result<String, ComposeError> {
            match inline {
                Some(v) => Ok(v.to_string()),
                None => tokens
                    .next()
                    .map(str::to_string)
                    .ok_or_else(|| ComposeError::MissingFlagValue(flag.to_string())),
            }
        };

        match flag {
            "-v" | "--var" => {
                let (name, val) = split_assignment(flag, &value()?)?;
                parsed.params.vars.insert(name, Value::String(val));
            }
            "--var-file" => {
                let (name, path) = split_assignment(flag, &value()?)?;
                parsed.params.var_files.insert(name, PathBuf::from(path));
            }
            "-l" | "--vars-file" => parsed.params.vars_files.push(PathBuf::from(value()?)),
            "--vars-env" => parsed.params.vars_env.push(value()?),
            "--vars-store" => parsed.params.vars_store = Some(PathBuf::from(value()?)),
            "-o" | "--ops-file" => parsed.ops_files.push(PathBuf::from(value()?)),
            other => return Err(ComposeError::UnknownFlag(other.to_string())),
        }
    }

    Ok(parsed)
}

/// Rewrite the path-valued tokens of `args` (`-l`, `--var-file`, `--vars-store`,
/// `-o`) relative to the directory of `source_file`. Other tokens are untouched.
pub(super) fn resolve_arg_paths(args: &mut [String], source_file: &Path) {
    let resolve = |raw: &str| -> String {
        resolve_relative_to(Path::new(raw), source_file)
            .display()
            .to_string()
    };

    let mut pending: Option<bool> = None;
    for token in args.iter_mut() {
        if let Some(assignment) = pending.take() {
            *token = resolve_value(token, assignment, &resolve);
            continue;
        }

        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
            _ => (token.as_str(), None),
        };
        let assignment = match flag {
            "--var-file" => true,
            "-l" | "--vars-file" | "--vars-store" | "-o" | "--ops-file" => false,
            _ => continue,
        };
        match inline {
            Some(value) => {
                let value = resolve_value(value, assignment, &resolve);
                *token = format!("{flag}={value}");
            }
            None => pending = Some(assignment),
        }
    }
}

fn resolve_value(raw: &str, assignment: bool, resolve: &impl Fn(&str) -> String) -> String {
    if !assignment {
        return resolve(raw);
    }
    match raw.split_once('=') {
        Some((name, path)) => format!("{name}={}", resolve(path)),
        None => raw.to_string(),
    }
}

fn split_assignment(flag: &str, raw: &str) -> Result<(String, String), ComposeError> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(ComposeError::MalformedAssignment {
            flag: flag.to_string(),
            value: raw.to_string(),
        }),
    }
}
