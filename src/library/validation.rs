//! Structural checks for a parsed library

use std::collections::HashSet;

use super::types::Library;

/// Collect every structural problem in a library.
///
/// Scenario and alias lookups are by name, so duplicates would make a name
/// ambiguous; aliases may not contain `.` because dotted names are split on it.
pub fn validate(library: &Library) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let mut aliases = HashSet::new();
    for reference in &library.libraries {
        if reference.alias.is_empty() {
            errors.push("Library alias cannot be empty".to_string());
            continue;
        }
        if reference.alias.contains('.') {
            errors.push(format!(
                "Library alias '{}' cannot contain '.'",
                reference.alias
            ));
        }
        if !aliases.insert(reference.alias.as_str()) {
            errors.push(format!("Duplicate library alias '{}'", reference.alias));
        }
        if reference.path.as_os_str().is_empty() {
            errors.push(format!(
                "Library alias '{}' has an empty path",
                reference.alias
            ));
        }
    }

    let mut names = HashSet::new();
    for scenario in &library.scenarios {
        if scenario.name.is_empty() {
            errors.push("Scenario name cannot be empty".to_string());
            continue;
        }
        if scenario.name.contains('.') {
            errors.push(format!(
                "Scenario name '{}' cannot contain '.'",
                scenario.name
            ));
        }
        if !names.insert(scenario.name.as_str()) {
            errors.push(format!("Duplicate scenario name '{}'", scenario.name));
        }

        for (idx, snippet) in scenario.snippets.iter().enumerate() {
            if snippet.path.as_os_str().is_empty() {
                errors.push(format!(
                    "Scenario '{}': snippet #{} has an empty path",
                    scenario.name,
                    idx + 1
                ));
            }
        }

        for dependency in &scenario.scenarios {
            if dependency.name.is_empty() {
                errors.push(format!(
                    "Scenario '{}': dependency name cannot be empty",
                    scenario.name
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
