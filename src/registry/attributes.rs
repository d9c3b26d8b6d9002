//! Attribute names recognised during discovery.

/// Marks a field element; the value is the field identifier.
pub const FIELD: &str = "data-vanishing-field";
/// Excludes a field element or one of its inputs from discovery.
pub const IGNORE: &str = "data-vanishing-field-ignore";
/// Marks the label of the field named by the value.
pub const LABEL_FOR: &str = "data-vanishing-field-for";
pub const APPLY_STYLES: &str = "data-vanishing-field-apply-styles";
pub const CLOSE_ON_FOCUS_OUT: &str = "data-vanishing-field-close-on-focus-out";
/// Display template set on the label.
pub const DISPLAY: &str = "data-vanishing-field-display";
/// Placeholder text set on the label.
pub const PLACEHOLDER: &str = "data-vanishing-field-placeholder";
pub const OPEN_TRIGGER: &str = "data-vanishing-field-open";
pub const CLOSE_TRIGGER: &str = "data-vanishing-field-close";
pub const TOGGLE_TRIGGER: &str = "data-vanishing-field-toggle";

/// Tags whose elements count as field inputs.
pub const INPUT_TAGS: [&str; 3] = ["input", "textarea", "select"];
