use crate::{
    dom::{Document, ElementId},
    field::{FieldController, InputKind},
    session::Session,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopKind {
    Label,
    /// A field element standing in for a missing label or an input-less field.
    Field,
    Input(InputKind),
}

/// One place the keyboard cursor can rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FocusStop {
    pub element: ElementId,
    pub field: String,
    pub kind: StopKind,
}

/// Fields sorted by the tab index of their element, untabbed ones last.
pub(crate) fn ordered_fields(session: &Session) -> Vec<&FieldController> {
    let doc = session.document();
    let mut fields: Vec<&FieldController> = session.registry().fields().collect();
    fields.sort_by_key(|field| {
        doc.get(field.element())
            .and_then(|element| element.tab_index())
            .unwrap_or(i32::MAX)
    });
    fields
}

/// Closed fields contribute their label; open fields contribute their inputs.
pub(crate) fn focus_stops(session: &Session) -> Vec<FocusStop> {
    let doc = session.document();
    let mut stops = Vec::new();
    for field in ordered_fields(session) {
        let field_stop = |element, kind| FocusStop {
            element,
            field: field.identifier().to_string(),
            kind,
        };
        if field.is_opened() {
            let inputs: Vec<FocusStop> = field
                .inputs()
                .iter()
                .filter_map(|input| {
                    input_kind(doc, *input).map(|kind| field_stop(*input, StopKind::Input(kind)))
                })
                .collect();
            if inputs.is_empty() {
                stops.push(field_stop(field.element(), StopKind::Field));
            } else {
                stops.extend(inputs);
            }
        } else if let Some(label) = field.label_element() {
            stops.push(field_stop(label, StopKind::Label));
        } else {
            stops.push(field_stop(field.element(), StopKind::Field));
        }
    }
    stops
}

pub(crate) fn input_kind(doc: &Document, element: ElementId) -> Option<InputKind> {
    let node = doc.get(element)?;
    InputKind::classify(
        node.tag(),
        node.attribute("type"),
        node.has_attribute("multiple"),
    )
}

/// Where focus should park once `field` closes: its label, else its element.
pub(crate) fn resting_element(field: &FieldController) -> ElementId {
    field.label_element().unwrap_or(field.element())
}
