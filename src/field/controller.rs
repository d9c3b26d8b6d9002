use serde::Serialize;
use tracing::debug;

use crate::{dom::ElementId, registry::RegistrationContext};

use super::{
    event::{FieldEvent, FieldEventKind},
    extract::extract_values,
    host::FieldHost,
    options::ResolvedOptions,
    template::LabelTemplate,
    value::{FieldValue, ValueMap, changed_names, has_filled_value},
};

pub const OPEN_CLASS: &str = "open";
pub const CHANGED_CLASS: &str = "changed";
pub const EMPTY_CLASS: &str = "empty";

/// Presentation mode of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    Closed,
    Open,
}

/// The summary surface shown while a field is closed.
#[derive(Debug, Clone)]
pub struct Label {
    pub element: ElementId,
    pub display: Option<LabelTemplate>,
    pub placeholder: Option<LabelTemplate>,
    content: String,
}

impl Label {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            display: None,
            placeholder: None,
            content: String::new(),
        }
    }

    pub fn with_display(mut self, display: Option<LabelTemplate>) -> Self {
        self.display = display;
        self
    }

    pub fn with_placeholder(mut self, placeholder: Option<LabelTemplate>) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Content rendered on the last close.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Everything the registration pass discovered about one field.
#[derive(Debug, Clone)]
pub struct FieldSetup {
    pub identifier: String,
    pub element: ElementId,
    pub label: Option<Label>,
    pub inputs: Vec<ElementId>,
    pub options: ResolvedOptions,
    /// Index of the element within its registration batch.
    pub position: usize,
}

impl FieldSetup {
    pub fn new(identifier: impl Into<String>, element: ElementId) -> Self {
        Self {
            identifier: identifier.into(),
            element,
            label: None,
            inputs: Vec::new(),
            options: ResolvedOptions::default(),
            position: 0,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_inputs(mut self, inputs: Vec<ElementId>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_options(mut self, options: ResolvedOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }
}

/// Open/closed state machine for one collapsible field.
#[derive(Debug, Clone)]
pub struct FieldController {
    identifier: String,
    element: ElementId,
    label: Option<Label>,
    inputs: Vec<ElementId>,
    options: ResolvedOptions,
    state: FieldState,
    values: ValueMap,
    original_values: ValueMap,
    changed: bool,
    empty: bool,
}

impl FieldController {
    /// Builds the controller and applies its initial presentation without emitting events.
    ///
    /// A field whose element already carries the `open` class starts open.
    pub fn new<H>(setup: FieldSetup, host: &mut H, ctx: &mut RegistrationContext) -> Self
    where
        H: FieldHost + ?Sized,
    {
        let FieldSetup {
            identifier,
            element,
            label,
            inputs,
            options,
            position,
        } = setup;

        ctx.count_field();
        if let Some(index) = ctx.tab_index_for(options.starting_tab_index, position) {
            if let Some(label) = &label
                && host.tab_index(label.element).is_none()
            {
                host.set_tab_index(label.element, index);
                ctx.record_tab_index(index);
            }
            if host.tab_index(element).is_none() {
                host.set_tab_index(element, index);
                ctx.record_tab_index(index);
            }
        }

        let mut field = Self {
            identifier,
            element,
            label,
            inputs,
            options,
            state: FieldState::Closed,
            values: ValueMap::new(),
            original_values: ValueMap::new(),
            changed: false,
            empty: true,
        };

        field.values = field.read_values(host);
        field.original_values = field.values.clone();
        field.empty = !has_filled_value(&field.values);
        field.apply_class(host, EMPTY_CLASS, field.empty);

        if host.has_class(element, OPEN_CLASS) {
            field.enter_open(host, false);
        } else {
            field.enter_close(host, false);
        }
        field
    }

    pub fn open<H>(&mut self, host: &mut H, notify: bool) -> &mut Self
    where
        H: FieldHost + ?Sized,
    {
        self.trace("open");
        if self.state == FieldState::Open {
            return self;
        }
        self.enter_open(host, notify);
        self
    }

    pub fn close<H>(&mut self, host: &mut H, notify: bool) -> &mut Self
    where
        H: FieldHost + ?Sized,
    {
        self.trace("close");
        if self.state == FieldState::Closed {
            return self;
        }
        self.enter_close(host, notify);
        self
    }

    /// `Some(true)` opens, `Some(false)` closes, `None` flips the current state.
    pub fn toggle<H>(&mut self, host: &mut H, open: Option<bool>, notify: bool) -> &mut Self
    where
        H: FieldHost + ?Sized,
    {
        self.trace("toggle");
        match (open, self.state) {
            (Some(true), _) | (None, FieldState::Closed) => self.open(host, notify),
            (Some(false), _) | (None, FieldState::Open) => self.close(host, notify),
        }
    }

    fn enter_open<H>(&mut self, host: &mut H, notify: bool)
    where
        H: FieldHost + ?Sized,
    {
        self.state = FieldState::Open;
        if self.options.apply_styles {
            host.set_presented(self.element, true);
            if let Some(label) = &self.label {
                host.set_presented(label.element, false);
            }
        }
        self.apply_class(host, OPEN_CLASS, true);
        host.focus(self.element);

        if notify {
            self.emit(host, FieldEventKind::Open);
        }
    }

    fn enter_close<H>(&mut self, host: &mut H, notify: bool)
    where
        H: FieldHost + ?Sized,
    {
        self.state = FieldState::Closed;
        self.values = self.read_values(host);

        if self.options.apply_styles {
            host.set_presented(self.element, false);
            if let Some(label) = &self.label {
                host.set_presented(label.element, true);
            }
        }

        self.empty = !has_filled_value(&self.values);
        self.changed = !changed_names(&self.values, &self.original_values).is_empty();

        self.apply_class(host, OPEN_CLASS, false);
        self.apply_class(host, CHANGED_CLASS, self.changed);
        self.apply_class(host, EMPTY_CLASS, self.empty);
        self.render_label(host);

        if notify {
            self.emit(host, FieldEventKind::Close);
        }
    }

    fn read_values<H>(&self, host: &H) -> ValueMap
    where
        H: FieldHost + ?Sized,
    {
        let snapshots: Vec<_> = self
            .inputs
            .iter()
            .filter_map(|input| host.input_snapshot(*input))
            .collect();
        let values = extract_values(&snapshots);
        if self.options.dev_mode {
            debug!(field = %self.identifier, ?values, "input values");
        }
        values
    }

    fn render_label<H>(&mut self, host: &mut H)
    where
        H: FieldHost + ?Sized,
    {
        let Some(content) = self.compose_label() else {
            return;
        };
        if let Some(label) = &mut self.label {
            host.set_content(label.element, &content);
            label.content = content;
        }
    }

    fn compose_label(&self) -> Option<String> {
        let label = self.label.as_ref()?;
        let content = if self.empty {
            label
                .placeholder
                .as_ref()
                .map(|placeholder| placeholder.render(self))
                .unwrap_or_default()
        } else if let Some(display) = &label.display {
            display.render(self)
        } else {
            self.values
                .values()
                .filter(|value| value.is_filled())
                .map(FieldValue::summary)
                .collect::<Vec<_>>()
                .join(" ")
        };
        Some(content)
    }

    fn apply_class<H>(&self, host: &mut H, class: &str, on: bool)
    where
        H: FieldHost + ?Sized,
    {
        host.toggle_class(self.element, class, on);
        if let Some(label) = &self.label {
            host.toggle_class(label.element, class, on);
        }
    }

    fn emit<H>(&self, host: &mut H, kind: FieldEventKind)
    where
        H: FieldHost + ?Sized,
    {
        let event = FieldEvent::new(kind, &self.identifier, self.element);
        let callback = match kind {
            FieldEventKind::Open => self.options.on_open.as_ref(),
            FieldEventKind::Close => self.options.on_close.as_ref(),
        };
        if let Some(callback) = callback {
            self.trace(match kind {
                FieldEventKind::Open => "onOpen",
                FieldEventKind::Close => "onClose",
            });
            callback(&event, self);
        }
        host.dispatch(&event);
    }

    /// Logs `action` when dev mode is on for this field.
    pub(crate) fn trace(&self, action: &str) {
        if self.options.dev_mode {
            debug!(field = %self.identifier, "{action}");
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn label_element(&self) -> Option<ElementId> {
        self.label.as_ref().map(|label| label.element)
    }

    pub fn inputs(&self) -> &[ElementId] {
        &self.inputs
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn is_opened(&self) -> bool {
        self.state == FieldState::Open
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Values as of the last close (or construction).
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    pub fn original_values(&self) -> &ValueMap {
        &self.original_values
    }

    /// Names whose value differs from the baseline captured at construction.
    pub fn changed_names(&self) -> Vec<String> {
        changed_names(&self.values, &self.original_values)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, HashSet},
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::field::{FieldOptions, GlobalOptions, InputKind, InputSnapshot, TabIndexStart};

    /// Records every call the controller makes against its host.
    #[derive(Default)]
    struct RecordingHost {
        inputs: HashMap<ElementId, InputSnapshot>,
        hidden: HashSet<ElementId>,
        classes: HashSet<(ElementId, String)>,
        tab_indices: HashMap<ElementId, i32>,
        content: HashMap<ElementId, String>,
        focused: Option<ElementId>,
        events: Vec<FieldEvent>,
    }

    impl FieldHost for RecordingHost {
        fn input_snapshot(&self, input: ElementId) -> Option<InputSnapshot> {
            self.inputs.get(&input).cloned()
        }

        fn set_presented(&mut self, element: ElementId, visible: bool) {
            if visible {
                self.hidden.remove(&element);
            } else {
                self.hidden.insert(element);
            }
        }

        fn toggle_class(&mut self, element: ElementId, class: &str, on: bool) {
            if on {
                self.classes.insert((element, class.to_string()));
            } else {
                self.classes.remove(&(element, class.to_string()));
            }
        }

        fn has_class(&self, element: ElementId, class: &str) -> bool {
            self.classes.contains(&(element, class.to_string()))
        }

        fn tab_index(&self, element: ElementId) -> Option<i32> {
            self.tab_indices.get(&element).copied()
        }

        fn set_tab_index(&mut self, element: ElementId, index: i32) {
            self.tab_indices.insert(element, index);
        }

        fn set_content(&mut self, element: ElementId, content: &str) {
            self.content.insert(element, content.to_string());
        }

        fn focus(&mut self, element: ElementId) {
            self.focused = Some(element);
        }

        fn dispatch(&mut self, event: &FieldEvent) {
            self.events.push(event.clone());
        }
    }

    const FIELD: ElementId = ElementId::from_index(0);
    const LABEL: ElementId = ElementId::from_index(1);
    const INPUT: ElementId = ElementId::from_index(2);

    fn email_host(value: &str) -> RecordingHost {
        let mut host = RecordingHost::default();
        host.inputs.insert(
            INPUT,
            InputSnapshot::new(InputKind::Text)
                .with_name("email")
                .with_value(value),
        );
        host
    }

    fn email_field(host: &mut RecordingHost, options: FieldOptions) -> FieldController {
        let global = GlobalOptions::new().with_defaults(options);
        let setup = FieldSetup::new("email", FIELD)
            .with_label(
                Label::new(LABEL)
                    .with_display(global.defaults.display.clone())
                    .with_placeholder(global.defaults.placeholder.clone()),
            )
            .with_inputs(vec![INPUT])
            .with_options(ResolvedOptions::resolve(&global, "email", &Default::default()));
        FieldController::new(setup, host, &mut RegistrationContext::new())
    }

    fn set_email(host: &mut RecordingHost, value: &str) {
        if let Some(input) = host.inputs.get_mut(&INPUT) {
            input.value = value.to_string();
        }
    }

    #[test]
    fn initial_close_renders_label_without_events() {
        let mut host = email_host("a@b.com");
        let field = email_field(&mut host, FieldOptions::new());

        assert_eq!(field.state(), FieldState::Closed);
        assert_eq!(field.values()["email"], FieldValue::text("a@b.com"));
        assert!(!field.is_changed());
        assert!(!field.is_empty());
        assert_eq!(host.content[&LABEL], "a@b.com");
        assert!(host.hidden.contains(&FIELD));
        assert!(!host.hidden.contains(&LABEL));
        assert!(host.events.is_empty());
    }

    #[test]
    fn clearing_input_marks_empty_and_changed() {
        let mut host = email_host("a@b.com");
        let mut field = email_field(&mut host, FieldOptions::new().with_placeholder("Add email"));

        field.open(&mut host, true);
        set_email(&mut host, "");
        field.close(&mut host, true);

        assert!(field.is_empty());
        assert!(field.is_changed());
        assert_eq!(field.label().map(Label::content), Some("Add email"));
        assert!(host.has_class(FIELD, EMPTY_CLASS));
        assert!(host.has_class(LABEL, CHANGED_CLASS));
        let kinds: Vec<_> = host.events.iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![FieldEventKind::Open, FieldEventKind::Close]);
    }

    #[test]
    fn repeated_close_is_silent() {
        let mut host = email_host("a@b.com");
        let mut field = email_field(&mut host, FieldOptions::new());
        field.open(&mut host, true).close(&mut host, true);
        set_email(&mut host, "late edit");
        field.close(&mut host, true);

        assert_eq!(host.events.len(), 2);
        assert_eq!(field.values()["email"], FieldValue::text("a@b.com"));
        assert!(!field.is_changed());
    }

    #[test]
    fn reopening_keeps_changed_until_next_close() {
        let mut host = email_host("a@b.com");
        let mut field = email_field(&mut host, FieldOptions::new());
        field.open(&mut host, true);
        set_email(&mut host, "new@b.com");
        field.close(&mut host, true);
        field.open(&mut host, true);
        assert!(field.is_changed());

        set_email(&mut host, "a@b.com");
        field.close(&mut host, true);
        assert!(!field.is_changed());
    }

    #[test]
    fn open_focuses_and_swaps_presentation() {
        let mut host = email_host("");
        let mut field = email_field(&mut host, FieldOptions::new());
        field.open(&mut host, false);

        assert!(field.is_opened());
        assert_eq!(host.focused, Some(FIELD));
        assert!(host.hidden.contains(&LABEL));
        assert!(!host.hidden.contains(&FIELD));
        assert!(host.has_class(LABEL, OPEN_CLASS));
        assert!(host.events.is_empty(), "notify=false suppresses the event");
    }

    #[test]
    fn styles_untouched_when_disabled() {
        let mut host = email_host("x");
        let mut field = email_field(&mut host, FieldOptions::new().with_apply_styles(false));
        field.open(&mut host, true);
        assert!(host.hidden.is_empty());
        assert!(host.has_class(FIELD, OPEN_CLASS));
    }

    #[test]
    fn toggle_dispatches_on_state() {
        let mut host = email_host("x");
        let mut field = email_field(&mut host, FieldOptions::new());
        field.toggle(&mut host, None, true);
        assert!(field.is_opened());
        field.toggle(&mut host, Some(true), true);
        assert!(field.is_opened());
        field.toggle(&mut host, None, true);
        assert!(!field.is_opened());
        field.toggle(&mut host, Some(false), true);
        assert_eq!(host.events.len(), 2);
    }

    #[test]
    fn pre_marked_open_field_starts_open() {
        let mut host = email_host("x");
        host.toggle_class(FIELD, OPEN_CLASS, true);
        let field = email_field(&mut host, FieldOptions::new());
        assert!(field.is_opened());
        assert!(host.events.is_empty());
        assert_eq!(host.focused, Some(FIELD));
    }

    #[test]
    fn callbacks_observe_post_transition_state() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = FieldOptions::new().on_close(move |event, field| {
            if let Ok(mut seen) = sink.lock() {
                seen.push((event.kind, field.is_opened(), field.is_empty()));
            }
        });
        let mut host = email_host("x");
        let mut field = email_field(&mut host, options);
        field.open(&mut host, true);
        set_email(&mut host, "");
        field.close(&mut host, true);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(FieldEventKind::Close, false, true)]);
    }

    #[test]
    fn computed_templates_receive_the_field() {
        let options = FieldOptions::new()
            .with_display_fn(|field| format!("{} <{}>", field.identifier(), field.values().len()));
        let mut host = email_host("x");
        let field = email_field(&mut host, options);
        assert_eq!(field.label().map(Label::content), Some("email <1>"));
    }

    #[test]
    fn assigns_shared_tab_index_to_field_and_label() {
        let mut host = email_host("x");
        host.set_tab_index(LABEL, 99);
        let mut ctx = RegistrationContext::new();
        let mut options = ResolvedOptions::default();
        options.starting_tab_index = TabIndexStart::At(5);
        let setup = FieldSetup::new("email", FIELD)
            .with_label(Label::new(LABEL))
            .with_inputs(vec![INPUT])
            .with_options(options)
            .with_position(2);
        FieldController::new(setup, &mut host, &mut ctx);

        assert_eq!(host.tab_index(FIELD), Some(7));
        assert_eq!(host.tab_index(LABEL), Some(99), "explicit index is kept");
        assert_eq!(ctx.last_tab_index(), 7);
        assert_eq!(ctx.field_count(), 1);
    }
}
