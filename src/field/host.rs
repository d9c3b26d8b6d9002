use crate::dom::ElementId;

use super::{FieldEvent, InputSnapshot};

/// What a field controller needs from the UI layer that owns its elements.
///
/// Controllers never hold on to the host; every operation borrows it for the
/// duration of the call.
pub trait FieldHost {
    /// Current reading of an input element, or `None` when it is not an input.
    fn input_snapshot(&self, input: ElementId) -> Option<InputSnapshot>;

    /// Shows or hides an element.
    fn set_presented(&mut self, element: ElementId, visible: bool);

    fn toggle_class(&mut self, element: ElementId, class: &str, on: bool);

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Explicit tab index carried by the element, if any.
    fn tab_index(&self, element: ElementId) -> Option<i32>;

    fn set_tab_index(&mut self, element: ElementId, index: i32);

    /// Replaces the rendered content of a label.
    fn set_content(&mut self, element: ElementId, content: &str);

    fn focus(&mut self, element: ElementId);

    /// Delivers a field event, bubbling from `event.target` when it bubbles.
    fn dispatch(&mut self, event: &FieldEvent);
}
