//! Variable interpolation into `((name))` placeholders
//!
//! A scalar that is exactly one placeholder takes the variable's YAML value;
//! placeholders embedded in longer strings are replaced by the value's text.
//! Unknown variables are left in place so a later pass (the global scope)
//! can still fill them.

mod vars;

use anyhow::{bail, Result};
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;

use crate::error::ComposeError;
use crate::params::{parse_passthrough, InterpolationParams, Passthrough};
use crate::processor::path::scalar_text;

pub use vars::{collect_variables, Variables};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\(\s*([^()\s]+)\s*\)\)").expect("placeholder pattern is valid")
});

static WHOLE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\(\s*([^()\s]+)\s*\)\)$").expect("placeholder pattern is valid")
});

/// Substitutes variables into documents
pub trait Interpolator {
    fn interpolate(&self, document: &Value, params: &InterpolationParams) -> Result<Value>;

    /// Parse trailing command-line tokens into parameters and ops files
    fn parse_passthrough(&self, args: &[String]) -> Result<Passthrough, ComposeError> {
        parse_passthrough(args)
    }
}

/// Interpolator backed by inline variables, variable files and the environment
#[derive(Debug, Default, Clone, Copy)]
pub struct VarsInterpolator;

impl Interpolator for VarsInterpolator {
    fn interpolate(&self, document: &Value, params: &InterpolationParams) -> Result<Value> {
        if params.is_empty() {
            return Ok(document.clone());
        }
        let variables = collect_variables(params)?;
        substitute(document, &variables)
    }
}

/// Replace placeholders throughout `value` using `variables`
pub fn substitute(value: &Value, variables: &Variables) -> Result<Value> {
    Ok(match value {
        Value::String(text) => substitute_str(text, variables)?,
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| substitute(item, variables))
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, item) in map {
                out.insert(substitute(key, variables)?, substitute(item, variables)?);
            }
            Value::Mapping(out)
        }
        Value::Tagged(tagged) => {
            let mut tagged = tagged.clone();
            tagged.value = substitute(&tagged.value, variables)?;
            Value::Tagged(tagged)
        }
        other => other.clone(),
    })
}

fn substitute_str(text: &str, variables: &Variables) -> Result<Value> {
    if let Some(caps) = WHOLE_PLACEHOLDER.captures(text) {
        return Ok(match variables.lookup(&caps[1]) {
            Some(value) => value.clone(),
            None => Value::String(text.to_string()),
        });
    }

    if !PLACEHOLDER.is_match(text) {
        return Ok(Value::String(text.to_string()));
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(text) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&text[last..whole.start]);
        out.push_str(&embedded_text(&caps, variables)?);
        last = whole.end;
    }
    out.push_str(&text[last..]);
    Ok(Value::String(out))
}

fn embedded_text(caps: &Captures<'_>, variables: &Variables) -> Result<String> {
    let name = &caps[1];
    match variables.lookup(name) {
        None => Ok(caps[0].to_string()),
        Some(value) => match scalar_text(value) {
            Some(text) => Ok(text),
            None => bail!("Variable '{name}' is not a scalar and cannot be embedded in a string"),
        },
    }
}
