//! Execution plans
//!
//! A [`Plan`] is a scenario tree flattened into ordered steps. Each step
//! keeps the stack of parameter scopes that apply to it, most specific
//! first: the snippet's own scope, the owning scenario (local merged with
//! the reference scope), then each ancestor out to the root. Global scopes
//! are collected separately for the whole document.


use serde::Serialize;
use std::path::PathBuf;

use crate::params::InterpolationParams;
use crate::processor::ProcessorType;
use crate::scenario::ScenarioNode;

/// A parameter scope labelled with where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedParams {
    pub tag: String,
    pub params: InterpolationParams,
}

impl TaggedParams {
    pub fn new(tag: impl Into<String>, params: InterpolationParams) -> Self {
        Self {
            tag: tag.into(),
            params,
        }
    }
}

/// One unit of work for the executor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionStep {
    /// Snippet to apply; `None` for a step that only applies globals
    pub snippet: Option<PathBuf>,
    pub processor: Option<ProcessorType>,
    /// Scope stack: snippet scope, owning scenario, then ancestors outward
    pub params: Vec<TaggedParams>,
}

impl ExecutionStep {
    /// Fold the scope stack into the parameters the snippet is interpolated with.
    ///
    /// The snippet's own scope is the base. Scenario scopes are applied from
    /// the outermost ancestor inward, so the nearest scenario wins for keyed
    /// values and list values accumulate root first.
    pub fn flatten(&self) -> InterpolationParams {
        let Some((snippet, scenarios)) = self.params.split_first() else {
            return InterpolationParams::default();
        };
        scenarios
            .iter()
            .rev()
            .fold(snippet.params.clone(), |acc, scope| acc.merge(&scope.params))
    }

    /// Tags of the scope stack, in stored order
    pub fn tags(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.tag.as_str()).collect()
    }
}

/// Free-function form of [`ExecutionStep::flatten`]
pub fn flatten_step(step: &ExecutionStep) -> InterpolationParams {
    step.flatten()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    pub global: InterpolationParams,
    pub steps: Vec<ExecutionStep>,
}

impl Plan {
    pub fn from_scenario_tree(node: &ScenarioNode) -> Self {
        let mut plan = Plan::default();
        plan.visit(node, &[]);
        plan
    }

    /// Plans for several trees, concatenated in order
    pub fn from_scenario_trees<'a, I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a ScenarioNode>,
    {
        nodes
            .into_iter()
            .map(Plan::from_scenario_tree)
            .fold(Plan::default(), Plan::append)
    }

    /// Steps of `other` run after ours; its globals win on conflicting keys
    pub fn append(mut self, other: Plan) -> Plan {
        self.global = self.global.merge(&other.global);
        self.steps.extend(other.steps);
        self
    }

    /// True when executing the plan cannot change a document
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.global.is_empty()
    }

    fn visit(&mut self, node: &ScenarioNode, inherited: &[TaggedParams]) {
        let mut stack = Vec::with_capacity(inherited.len() + 1);
        stack.push(TaggedParams::new(node.name.clone(), node.merged_params()));
        stack.extend_from_slice(inherited);

        for child in &node.children {
            self.visit(child, &stack);
        }

        self.global = self.global.merge(&node.global);

        for snippet in &node.snippets {
            let file = snippet
                .path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();
            let mut params = Vec::with_capacity(stack.len() + 1);
            params.push(TaggedParams::new(
                format!("{}/{file}", node.name),
                snippet.params.clone(),
            ));
            params.extend(stack.iter().cloned());

            self.steps.push(ExecutionStep {
                snippet: Some(snippet.path.clone()),
                processor: snippet.processor,
                params,
            });
        }

        if node.snippets.is_empty() && !node.global.is_empty() {
            let mut params = Vec::with_capacity(stack.len() + 1);
            params.push(TaggedParams::new(
                format!("{}/globals", node.name),
                InterpolationParams::default(),
            ));
            params.extend(stack);

            self.steps.push(ExecutionStep {
                snippet: None,
                processor: None,
                params,
            });
        }
    }
}
