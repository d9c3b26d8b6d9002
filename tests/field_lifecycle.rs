use serde_json::{Value, json};
use vanishing_fields::{
    Document, FieldEventKind, FieldOptions, FieldValue, GlobalOptions, Script, Session,
};

fn session(elements: Value, options: &GlobalOptions) -> Session {
    let doc = Document::from_value(elements).expect("fixture document");
    Session::new(doc, options)
}

fn email_form(value: &str) -> Value {
    json!([
        {"tag": "span", "attrs": {"data-vanishing-field-for": "email", "data-vanishing-field-placeholder": "Add email"}},
        {"tag": "div", "attrs": {"data-vanishing-field": "email"}, "children": [
            {"tag": "input", "attrs": {"type": "email", "name": "email", "id": "email-input", "value": value}}
        ]}
    ])
}

fn label_text(session: &Session, identifier: &str) -> String {
    let field = session.registry().field(identifier).expect("registered");
    let label = field.label_element().expect("label");
    session.document().get(label).expect("label element").text().to_string()
}

fn run(session: &mut Session, steps: Value) {
    let script = Script::from_value(steps).expect("script");
    session.run_script(&script).expect("script runs");
}

#[test]
fn email_scenario_tracks_changes_and_renders_the_label() {
    let mut session = session(email_form(""), &GlobalOptions::new());
    assert_eq!(label_text(&session, "email"), "Add email");
    assert!(session.registry().field("email").unwrap().is_empty());

    run(
        &mut session,
        json!([
            {"action": "open", "field": "email"},
            {"action": "input", "target": "email-input", "value": "me@example.com"},
            {"action": "close", "field": "email"}
        ]),
    );

    let field = session.registry().field("email").unwrap();
    assert!(field.is_changed());
    assert!(!field.is_empty());
    assert_eq!(field.changed_names(), vec!["email".to_string()]);
    assert_eq!(label_text(&session, "email"), "me@example.com");

    let kinds: Vec<_> = session
        .document()
        .events()
        .iter()
        .map(|dispatched| dispatched.event.kind)
        .collect();
    assert_eq!(kinds, vec![FieldEventKind::Open, FieldEventKind::Close]);
}

#[test]
fn closing_twice_emits_once() {
    let mut session = session(email_form("a@b.com"), &GlobalOptions::new());
    session.open("email").unwrap();
    session.close("email").unwrap();
    session.close("email").unwrap();

    let closes = session
        .document()
        .events()
        .iter()
        .filter(|dispatched| dispatched.event.kind == FieldEventKind::Close)
        .count();
    assert_eq!(closes, 1);
    assert!(!session.registry().field("email").unwrap().is_changed());
}

#[test]
fn reopening_without_edits_stays_unchanged() {
    let mut session = session(email_form("a@b.com"), &GlobalOptions::new());
    session.open("email").unwrap();
    session.close("email").unwrap();
    let field = session.registry().field("email").unwrap();
    assert!(!field.is_changed());
    assert_eq!(field.values(), field.original_values());
}

#[test]
fn clearing_the_input_falls_back_to_placeholder_or_blank() {
    let mut with_placeholder = session(email_form("a@b.com"), &GlobalOptions::new());
    run(
        &mut with_placeholder,
        json!([
            {"action": "open", "field": "email"},
            {"action": "input", "target": "email-input", "value": ""},
            {"action": "close", "field": "email"}
        ]),
    );
    assert!(with_placeholder.registry().field("email").unwrap().is_empty());
    assert_eq!(label_text(&with_placeholder, "email"), "Add email");

    let bare = json!([
        {"tag": "span", "attrs": {"data-vanishing-field-for": "email"}},
        {"tag": "div", "attrs": {"data-vanishing-field": "email"}, "children": [
            {"tag": "input", "attrs": {"name": "email", "id": "email-input", "value": "x"}}
        ]}
    ]);
    let mut without = session(bare, &GlobalOptions::new());
    run(
        &mut without,
        json!([
            {"action": "open", "field": "email"},
            {"action": "input", "target": "email-input", "value": ""},
            {"action": "close", "field": "email"}
        ]),
    );
    assert!(without.registry().field("email").unwrap().is_empty());
    assert_eq!(label_text(&without, "email"), "");
}

#[test]
fn bracketed_names_collect_sequences() {
    let form = json!([
        {"tag": "div", "attrs": {"data-vanishing-field": "tags"}, "children": [
            {"tag": "input", "attrs": {"name": "tags[]", "value": "red"}},
            {"tag": "input", "attrs": {"name": "tags[]", "value": "blue"}}
        ]}
    ]);
    let session = session(form, &GlobalOptions::new());
    let field = session.registry().field("tags").unwrap();
    assert_eq!(
        field.values().get("tags"),
        Some(&FieldValue::list(["red", "blue"]))
    );
}

#[test]
fn unchecked_checkbox_keeps_its_key() {
    let form = json!([
        {"tag": "div", "attrs": {"data-vanishing-field": "opts"}, "children": [
            {"tag": "input", "attrs": {"type": "checkbox", "name": "agree", "value": "yes"}},
            {"tag": "input", "attrs": {"type": "checkbox", "name": "extras[]", "value": "a"}}
        ]}
    ]);
    let session = session(form, &GlobalOptions::new());
    let values = session.registry().field("opts").unwrap().values();
    assert_eq!(values.get("agree"), Some(&FieldValue::Null));
    assert_eq!(values.get("extras"), Some(&FieldValue::List(Vec::new())));
    assert!(session.registry().field("opts").unwrap().is_empty());
}

#[test]
fn multi_select_renders_through_joiner() {
    let form = json!([
        {"tag": "label", "attrs": {
            "data-vanishing-field-for": "palette",
            "data-vanishing-field-display": "{colors|none|/}"
        }},
        {"tag": "div", "attrs": {"data-vanishing-field": "palette"}, "children": [
            {"tag": "select", "attrs": {"name": "colors", "id": "colors", "multiple": true}, "children": [
                {"tag": "option", "text": "red"},
                {"tag": "option", "text": "green"},
                {"tag": "option", "text": "blue"}
            ]}
        ]}
    ]);
    let mut session = session(form, &GlobalOptions::new());
    run(
        &mut session,
        json!([
            {"action": "open", "field": "palette"},
            {"action": "select", "target": "colors", "values": ["red", "blue"]},
            {"action": "close", "field": "palette"}
        ]),
    );
    assert_eq!(label_text(&session, "palette"), "red/blue");
}

#[test]
fn configured_display_applies_to_named_field() {
    let options = GlobalOptions::new()
        .with_field("email", FieldOptions::new().with_display("Mail: {email}"));
    let session = session(email_form("me@example.com"), &options);
    assert_eq!(label_text(&session, "email"), "Mail: me@example.com");
}
