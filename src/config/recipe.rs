//! Recipes: ordered lists of tool invocations.

use serde::{Deserialize, Serialize};

/// One program invocation of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// Program name, resolved through `PATH`
    #[serde(default)]
    pub command: String,
    /// Arguments, may contain placeholders such as `{{DOC}}`
    #[serde(default)]
    pub args: Vec<String>,
}

impl Tool {
    /// Creates a tool from a program and its arguments.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

/// Ordered sequence of tools, executed left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(Vec<Tool>);

impl Recipe {
    /// Tools in execution order.
    pub fn tools(&self) -> &[Tool] {
        &self.0
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the recipe has no tools and must be replaced by a default.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `self`, or `fallback` when `self` is absent or has no tools.
    pub fn or_default_to(recipe: Option<&Recipe>, fallback: Recipe) -> Recipe {
        match recipe {
            Some(r) if !r.is_empty() => r.clone(),
            _ => fallback,
        }
    }
}

impl From<Vec<Tool>> for Recipe {
    fn from(tools: Vec<Tool>) -> Self {
        Self(tools)
    }
}
