use serde::Serialize;

use crate::{
    dom::Document,
    field::{FieldController, FieldState, ValueMap},
};

/// Serializable view of one field after a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub identifier: String,
    pub state: FieldState,
    pub opened: bool,
    pub changed: bool,
    pub empty: bool,
    pub values: ValueMap,
    pub original_values: ValueMap,
    pub changed_names: Vec<String>,
    pub label: Option<String>,
    pub tab_index: Option<i32>,
}

impl FieldReport {
    pub fn capture(field: &FieldController, doc: &Document) -> Self {
        Self {
            identifier: field.identifier().to_string(),
            state: field.state(),
            opened: field.is_opened(),
            changed: field.is_changed(),
            empty: field.is_empty(),
            values: field.values().clone(),
            original_values: field.original_values().clone(),
            changed_names: field.changed_names(),
            label: field.label().map(|label| label.content().to_string()),
            tab_index: doc.get(field.element()).and_then(|element| element.tab_index()),
        }
    }
}

/// Output document: `{ "fields": [...] }`, a table so every format can hold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub fields: Vec<FieldReport>,
}
