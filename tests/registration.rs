use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use vanishing_fields::{
    Document, ElementSpec, FieldEventKind, FieldOptions, FieldValue, GlobalOptions, Interaction,
    Propagation, Registry, Script, Session, SkipReason,
};

fn document(elements: Value) -> Document {
    Document::from_value(elements).expect("fixture document")
}

fn two_fields() -> Value {
    json!([
        {"tag": "form", "attrs": {"id": "form"}, "children": [
            {"tag": "span", "attrs": {"id": "name-label", "data-vanishing-field-for": "name"}},
            {"tag": "div", "attrs": {"id": "name", "data-vanishing-field": "name"}, "children": [
                {"tag": "input", "attrs": {"id": "name-input", "name": "name", "value": "Ada"}}
            ]},
            {"tag": "span", "attrs": {"id": "city-label", "data-vanishing-field-for": "city"}},
            {"tag": "div", "attrs": {"id": "city", "data-vanishing-field": "city"}, "children": [
                {"tag": "input", "attrs": {"id": "city-input", "name": "city"}},
                {"tag": "button", "attrs": {"id": "city-done", "data-vanishing-field-close": "city"}}
            ]},
            {"tag": "button", "attrs": {"id": "city-edit", "data-vanishing-field-open": "city"}, "children": [
                {"tag": "span", "attrs": {"id": "city-edit-icon"}}
            ]}
        ]}
    ])
}

fn id(doc: &Document, html_id: &str) -> vanishing_fields::ElementId {
    doc.by_id(html_id).expect("element present")
}

#[test]
fn batches_continue_tab_indices() {
    let mut doc = document(two_fields());
    let mut registry = Registry::new();
    let report = registry.register(&mut doc, &GlobalOptions::new());
    assert_eq!(report.registered, vec!["name", "city"]);

    let name = doc.get(id(&doc, "name")).unwrap().tab_index();
    let name_label = doc.get(id(&doc, "name-label")).unwrap().tab_index();
    let city = doc.get(id(&doc, "city")).unwrap().tab_index();
    assert_eq!((name, name_label, city), (Some(0), Some(0), Some(1)));
    assert_eq!(registry.context().last_tab_index(), 1);

    let extra = doc.build(
        None,
        &serde_json::from_value::<ElementSpec>(json!({
            "tag": "div",
            "attrs": {"id": "zip", "data-vanishing-field": "zip"}
        }))
        .unwrap(),
    );
    registry.register_elements(&mut doc, &GlobalOptions::new(), &[extra]);
    assert_eq!(doc.get(extra).unwrap().tab_index(), Some(2));
    assert_eq!(registry.len(), 3);
}

#[test]
fn explicit_start_and_disabled_tab_indices() {
    let mut doc = document(two_fields());
    let options =
        GlobalOptions::new().with_defaults(FieldOptions::new().with_starting_tab_index(10));
    Registry::new().register(&mut doc, &options);
    assert_eq!(doc.get(id(&doc, "city")).unwrap().tab_index(), Some(11));

    let mut doc = document(two_fields());
    let options = GlobalOptions::new().with_defaults(FieldOptions::new().without_tab_index());
    Registry::new().register(&mut doc, &options);
    assert_eq!(doc.get(id(&doc, "name")).unwrap().tab_index(), None);
}

#[test]
fn skips_blank_and_duplicate_identifiers() {
    let mut doc = document(json!([
        {"tag": "div", "attrs": {"data-vanishing-field": ""}},
        {"tag": "div", "attrs": {"data-vanishing-field": "a"}},
        {"tag": "div", "attrs": {"data-vanishing-field": "a"}},
        {"tag": "div", "attrs": {"data-vanishing-field": "b", "data-vanishing-field-ignore": true}}
    ]));
    let mut registry = Registry::new();
    let report = registry.register(&mut doc, &GlobalOptions::new());

    assert_eq!(report.registered, vec!["a"]);
    let reasons: Vec<_> = report.skipped.iter().map(|skipped| skipped.reason).collect();
    assert_eq!(
        reasons,
        vec![SkipReason::MissingIdentifier, SkipReason::DuplicateIdentifier]
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn label_click_opens_and_stops_propagation() {
    let mut session = Session::new(document(two_fields()), &GlobalOptions::new());
    let label = id(session.document(), "name-label");
    assert_eq!(session.click(label), Propagation::Stopped);
    assert!(session.registry().field("name").unwrap().is_opened());

    let input = id(session.document(), "name-input");
    assert_eq!(session.document().active_element(), Some(id(session.document(), "name")));
    assert_eq!(session.click(input), Propagation::Continued);
}

#[test]
fn focus_leaving_the_field_closes_it() {
    let mut session = Session::new(document(two_fields()), &GlobalOptions::new());
    session.open("name").unwrap();

    let input = id(session.document(), "name-input");
    session.focus(input);
    assert!(session.registry().field("name").unwrap().is_opened());

    let other = id(session.document(), "city-input");
    session.focus(other);
    assert!(!session.registry().field("name").unwrap().is_opened());
}

#[test]
fn close_on_focus_out_can_be_disabled_per_element() {
    let mut doc = document(json!([
        {"tag": "div", "attrs": {"id": "sticky", "data-vanishing-field": "sticky", "data-vanishing-field-close-on-focus-out": "false"}, "children": [
            {"tag": "input", "attrs": {"name": "sticky"}}
        ]}
    ]));
    let mut registry = Registry::new();
    registry.register(&mut doc, &GlobalOptions::new());
    let field = id(&doc, "sticky");
    registry.open(&mut doc, "sticky").unwrap();
    doc.blur();

    let propagation = registry.dispatch(
        &mut doc,
        Interaction::FocusOut {
            target: field,
            related: None,
        },
    );
    assert_eq!(propagation, Propagation::Stopped);
    assert!(registry.field("sticky").unwrap().is_opened());
}

#[test]
fn external_triggers_need_the_exact_target() {
    let mut session = Session::new(document(two_fields()), &GlobalOptions::new());

    let icon = id(session.document(), "city-edit-icon");
    session.click(icon);
    assert!(!session.registry().field("city").unwrap().is_opened());

    let edit = id(session.document(), "city-edit");
    assert_eq!(session.click(edit), Propagation::Stopped);
    assert!(session.registry().field("city").unwrap().is_opened());

    let done = id(session.document(), "city-done");
    session.click(done);
    assert!(!session.registry().field("city").unwrap().is_opened());
}

#[test]
fn unknown_fields_are_reported() {
    let mut session = Session::new(document(two_fields()), &GlobalOptions::new());
    let error = session.open("phone").unwrap_err();
    assert!(error.to_string().contains("phone"));
}

fn side_by_side() -> Value {
    json!([
        {"tag": "span", "attrs": {"id": "a-label", "data-vanishing-field-for": "a"}},
        {"tag": "div", "attrs": {"id": "a", "data-vanishing-field": "a"}, "children": [
            {"tag": "input", "attrs": {"id": "x", "name": "x", "value": "1"}}
        ]},
        {"tag": "span", "attrs": {"id": "b-label", "data-vanishing-field-for": "b"}},
        {"tag": "div", "attrs": {"id": "b", "data-vanishing-field": "b"}, "children": [
            {"tag": "input", "attrs": {"id": "y", "name": "y", "value": "2"}}
        ]}
    ])
}

#[test]
fn clicking_another_label_closes_the_open_field() {
    let mut session = Session::new(document(side_by_side()), &GlobalOptions::new());
    let script = Script::from_value(json!([
        {"action": "click", "target": "a-label"},
        {"action": "input", "target": "x", "value": "9"},
        {"action": "click", "target": "b-label"}
    ]))
    .unwrap();
    session.run_script(&script).unwrap();

    let a = session.registry().field("a").unwrap();
    assert!(!a.is_opened());
    assert!(a.is_changed());
    assert_eq!(a.values()["x"], FieldValue::text("9"));
    assert!(session.registry().field("b").unwrap().is_opened());

    session.open("a").unwrap();
    assert!(session.registry().field("a").unwrap().is_opened());
    assert!(!session.registry().field("b").unwrap().is_opened());
}

#[test]
fn opening_by_identifier_moves_focus_away_from_the_other_field() {
    let mut doc = document(side_by_side());
    let mut registry = Registry::new();
    registry.register(&mut doc, &GlobalOptions::new());

    registry.open(&mut doc, "a").unwrap();
    registry.open(&mut doc, "b").unwrap();
    assert!(!registry.field("a").unwrap().is_opened());
    assert!(registry.field("b").unwrap().is_opened());
    assert_eq!(doc.active_element(), doc.by_id("b"));

    let kinds: Vec<_> = doc
        .events()
        .iter()
        .map(|dispatched| (dispatched.event.field.as_str(), dispatched.event.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("a", FieldEventKind::Open),
            ("b", FieldEventKind::Open),
            ("a", FieldEventKind::Close)
        ]
    );
}

#[test]
fn label_focus_opens_the_field() {
    let mut doc = document(two_fields());
    let mut registry = Registry::new();
    registry.register(&mut doc, &GlobalOptions::new());
    let label = id(&doc, "name-label");

    let propagation = registry.dispatch(&mut doc, Interaction::FocusIn { target: label });
    assert_eq!(propagation, Propagation::Stopped);
    assert!(registry.field("name").unwrap().is_opened());
    assert_eq!(doc.active_element(), Some(id(&doc, "name")));
}

#[test]
fn open_callback_sees_the_opened_field() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = GlobalOptions::new().with_field(
        "city",
        FieldOptions::new().on_open(move |event, field| {
            sink.lock().unwrap().push((
                event.kind,
                event.field.clone(),
                event.target,
                field.identifier().to_string(),
                field.is_opened(),
            ));
        }),
    );
    let mut session = Session::new(document(two_fields()), &options);
    session.open("city").unwrap();
    session.close("city").unwrap();
    session.open("name").unwrap();

    let city = id(session.document(), "city");
    let seen = seen.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        &[(FieldEventKind::Open, "city".to_string(), city, "city".to_string(), true)]
    );
    assert_eq!(session.document().events()[0].event.kind, FieldEventKind::Open);
}
