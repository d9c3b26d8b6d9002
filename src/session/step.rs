use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One scripted user action. Targets are element `id`s; fields are identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Step {
    Click {
        target: String,
    },
    /// Moves focus, dispatching focus-out on the previous element first.
    Focus {
        target: String,
    },
    Blur,
    Input {
        target: String,
        value: String,
    },
    Check {
        target: String,
        #[serde(default = "checked_by_default")]
        checked: bool,
    },
    Select {
        target: String,
        values: Vec<String>,
    },
    Files {
        target: String,
        files: Vec<String>,
    },
    Open {
        field: String,
    },
    Close {
        field: String,
    },
    Toggle {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        open: Option<bool>,
    },
}

fn checked_by_default() -> bool {
    true
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Click { .. } => "click",
            Step::Focus { .. } => "focus",
            Step::Blur => "blur",
            Step::Input { .. } => "input",
            Step::Check { .. } => "check",
            Step::Select { .. } => "select",
            Step::Files { .. } => "files",
            Step::Open { .. } => "open",
            Step::Close { .. } => "close",
            Step::Toggle { .. } => "toggle",
        }
    }
}

/// A script file: a bare list of steps or `{ "steps": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Script {
    Steps(Vec<Step>),
    Wrapped { steps: Vec<Step> },
}

impl Script {
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).context("script is not a list of steps")
    }

    pub fn steps(&self) -> &[Step] {
        match self {
            Script::Steps(steps) | Script::Wrapped { steps } => steps,
        }
    }
}
