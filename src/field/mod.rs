//! The collapsible field core: state machine, value extraction, change
//! tracking and label rendering.

mod controller;
mod event;
mod extract;
mod host;
mod options;
mod template;
mod value;

pub use controller::{
    CHANGED_CLASS, EMPTY_CLASS, FieldController, FieldSetup, FieldState, Label, OPEN_CLASS,
};
pub use event::{FieldEvent, FieldEventKind};
pub use extract::{InputKind, InputSnapshot, extract_values};
pub use host::FieldHost;
pub use options::{
    AttributeOverrides, FieldCallback, FieldOptions, GlobalOptions, ResolvedOptions,
    TabIndexStart,
};
pub use template::{ComputeLabel, LabelTemplate, substitute};
pub use value::{FieldValue, ValueMap, changed_names, has_filled_value};
