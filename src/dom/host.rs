use crate::field::{FieldEvent, FieldHost, InputKind, InputSnapshot};

use super::{Document, ElementId};

impl FieldHost for Document {
    fn input_snapshot(&self, input: ElementId) -> Option<InputSnapshot> {
        let element = self.get(input)?;
        let kind = InputKind::classify(
            element.tag(),
            element.attribute("type"),
            element.has_attribute("multiple"),
        )?;

        let mut snapshot = InputSnapshot::new(kind).with_checked(element.is_checked());
        snapshot.name = element.attribute("name").map(str::to_string);
        snapshot.id = element.html_id().map(str::to_string);
        match kind {
            InputKind::Select { .. } => {
                let selected = self.selected_values(input);
                snapshot.value = selected.first().cloned().unwrap_or_default();
                snapshot.selected = selected;
            }
            InputKind::File => {
                snapshot.files = element.files().to_vec();
                snapshot.value = snapshot.files.first().cloned().unwrap_or_default();
            }
            _ => snapshot.value = element.value().to_string(),
        }
        Some(snapshot)
    }

    fn set_presented(&mut self, element: ElementId, visible: bool) {
        self.set_hidden(element, !visible);
    }

    fn toggle_class(&mut self, element: ElementId, class: &str, on: bool) {
        Document::toggle_class(self, element, class, on);
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.get(element)
            .is_some_and(|element| element.has_class(class))
    }

    fn tab_index(&self, element: ElementId) -> Option<i32> {
        self.get(element).and_then(|element| element.tab_index())
    }

    fn set_tab_index(&mut self, element: ElementId, index: i32) {
        self.set_attribute(element, "tabindex", index.to_string());
    }

    fn set_content(&mut self, element: ElementId, content: &str) {
        self.set_text(element, content);
    }

    fn focus(&mut self, element: ElementId) {
        self.shift_focus(element);
    }

    fn dispatch(&mut self, event: &FieldEvent) {
        self.record_event(event);
    }
}
