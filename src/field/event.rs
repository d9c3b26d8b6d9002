use std::fmt;

use serde::Serialize;

use crate::dom::ElementId;

/// The two transitions a field announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEventKind {
    Open,
    Close,
}

impl FieldEventKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldEventKind::Open => "open",
            FieldEventKind::Close => "close",
        }
    }
}

impl fmt::Display for FieldEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Emitted after a transition has fully completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEvent {
    pub kind: FieldEventKind,
    /// Identifier of the field that transitioned.
    pub field: String,
    /// The field element the event is dispatched on.
    pub target: ElementId,
    pub bubbles: bool,
}

impl FieldEvent {
    pub fn new(kind: FieldEventKind, field: impl Into<String>, target: ElementId) -> Self {
        Self {
            kind,
            field: field.into(),
            target,
            bubbles: true,
        }
    }
}
