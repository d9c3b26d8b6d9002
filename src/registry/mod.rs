//! Discovers field elements in a document, builds their controllers and routes
//! user interactions to them.

pub mod attributes;
mod binding;
mod context;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    dom::{Document, ElementId, Selector},
    error::FieldError,
    field::{
        AttributeOverrides, FieldController, FieldSetup, GlobalOptions, Label, LabelTemplate,
        ResolvedOptions,
    },
};

use binding::{Binding, Trigger};

pub use binding::{Interaction, Propagation};
pub use context::RegistrationContext;

/// Why a discovered element did not become a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingIdentifier,
    DuplicateIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    pub element: ElementId,
    pub position: usize,
    pub identifier: Option<String>,
    pub reason: SkipReason,
}

/// Outcome of one registration batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationReport {
    pub registered: Vec<String>,
    pub skipped: Vec<SkippedField>,
}

/// Owns every field controller registered against one document.
#[derive(Debug, Default)]
pub struct Registry {
    context: RegistrationContext,
    fields: IndexMap<String, FieldController>,
    bindings: Vec<Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continues numbering from an existing context.
    pub fn with_context(context: RegistrationContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    pub fn context(&self) -> &RegistrationContext {
        &self.context
    }

    /// Elements that would be registered: `[data-vanishing-field]` without the ignore marker.
    pub fn discover(doc: &Document) -> Vec<ElementId> {
        doc.select_all(&Selector::attr(attributes::FIELD).without(attributes::IGNORE))
    }

    /// Registers every discoverable field in `doc` as one batch.
    pub fn register(&mut self, doc: &mut Document, options: &GlobalOptions) -> RegistrationReport {
        let elements = Self::discover(doc);
        self.register_elements(doc, options, &elements)
    }

    /// Registers the given elements as one batch, in order.
    pub fn register_elements(
        &mut self,
        doc: &mut Document,
        options: &GlobalOptions,
        elements: &[ElementId],
    ) -> RegistrationReport {
        let mut report = RegistrationReport::default();
        self.context.begin_batch(options.starting_tab_index());

        for (position, element) in elements.iter().copied().enumerate() {
            let identifier = doc
                .attribute(element, attributes::FIELD)
                .unwrap_or_default()
                .to_string();
            if identifier.is_empty() {
                warn!(
                    element = element.index(),
                    "{} attribute needs to be set to a string",
                    attributes::FIELD
                );
                report.skipped.push(SkippedField {
                    element,
                    position,
                    identifier: None,
                    reason: SkipReason::MissingIdentifier,
                });
                continue;
            }
            if self.fields.contains_key(&identifier) {
                warn!(field = %identifier, "field already registered, skipping duplicate");
                report.skipped.push(SkippedField {
                    element,
                    position,
                    identifier: Some(identifier),
                    reason: SkipReason::DuplicateIdentifier,
                });
                continue;
            }

            let setup = Self::setup_for(doc, options, &identifier, element, position);
            let controller = FieldController::new(setup, doc, &mut self.context);
            let (index, _) = self.fields.insert_full(identifier.clone(), controller);
            self.bind(doc, index, &identifier);
            report.registered.push(identifier);
        }
        self.settle_focus(doc);
        report
    }

    fn setup_for(
        doc: &Document,
        options: &GlobalOptions,
        identifier: &str,
        element: ElementId,
        position: usize,
    ) -> FieldSetup {
        let overrides = AttributeOverrides {
            apply_styles: doc
                .attribute(element, attributes::APPLY_STYLES)
                .map(str::to_string),
            close_on_focus_out: doc
                .attribute(element, attributes::CLOSE_ON_FOCUS_OUT)
                .map(str::to_string),
        };
        let resolved = ResolvedOptions::resolve(options, identifier, &overrides);

        let label = doc
            .select_first(&Selector::attr_eq(attributes::LABEL_FOR, identifier))
            .map(|label| {
                let display = non_empty_attribute(doc, label, attributes::DISPLAY)
                    .map(LabelTemplate::templated)
                    .or_else(|| resolved.display.clone());
                let placeholder = non_empty_attribute(doc, label, attributes::PLACEHOLDER)
                    .map(LabelTemplate::literal)
                    .or_else(|| resolved.placeholder.clone());
                Label::new(label)
                    .with_display(display)
                    .with_placeholder(placeholder)
            });

        let inputs = doc.select_within(
            element,
            &Selector::tags(&attributes::INPUT_TAGS).without(attributes::IGNORE),
        );

        let mut setup = FieldSetup::new(identifier, element)
            .with_inputs(inputs)
            .with_options(resolved)
            .with_position(position);
        if let Some(label) = label {
            setup = setup.with_label(label);
        }
        setup
    }

    /// Attaches handlers in the order they fire for a shared interaction.
    fn bind(&mut self, doc: &Document, field: usize, identifier: &str) {
        let Some((_, controller)) = self.fields.get_index(field) else {
            return;
        };
        let mut bindings = Vec::new();
        if let Some(label) = controller.label_element() {
            bindings.push((label, Trigger::LabelClick));
            bindings.push((label, Trigger::LabelFocus));
        }
        bindings.push((controller.element(), Trigger::FocusOut));
        for (attribute, trigger) in [
            (attributes::OPEN_TRIGGER, Trigger::Open),
            (attributes::CLOSE_TRIGGER, Trigger::Close),
            (attributes::TOGGLE_TRIGGER, Trigger::Toggle),
        ] {
            for element in doc.select_all(&Selector::attr_eq(attribute, identifier)) {
                bindings.push((element, trigger));
            }
        }
        self.bindings.extend(
            bindings
                .into_iter()
                .map(|(element, trigger)| Binding {
                    element,
                    trigger,
                    field,
                }),
        );
    }

    /// Delivers an interaction, bubbling from its target through the target's ancestors.
    ///
    /// Focus moved by a field while handling it is settled before returning.
    pub fn dispatch(&mut self, doc: &mut Document, interaction: Interaction) -> Propagation {
        let propagation = self.deliver(doc, interaction);
        self.settle_focus(doc);
        propagation
    }

    /// Sends the focus-outs owed for focus that fields moved themselves.
    /// Closing never moves focus, so the queue drains.
    fn settle_focus(&mut self, doc: &mut Document) {
        loop {
            let changes = doc.take_focus_changes();
            if changes.is_empty() {
                return;
            }
            for change in changes {
                self.deliver(
                    doc,
                    Interaction::FocusOut {
                        target: change.previous,
                        related: Some(change.next),
                    },
                );
            }
        }
    }

    fn deliver(&mut self, doc: &mut Document, interaction: Interaction) -> Propagation {
        let target = interaction.target();
        for node in doc.ancestors(target) {
            let handlers: Vec<Binding> = self
                .bindings
                .iter()
                .filter(|binding| binding.handles(node, &interaction))
                .copied()
                .collect();
            for binding in handlers {
                if self.run(doc, binding, &interaction) == Propagation::Stopped {
                    return Propagation::Stopped;
                }
            }
        }
        Propagation::Continued
    }

    fn run(&mut self, doc: &mut Document, binding: Binding, interaction: &Interaction) -> Propagation {
        let Some((_, field)) = self.fields.get_index_mut(binding.field) else {
            return Propagation::Continued;
        };
        if binding.trigger.requires_exact_target() && interaction.target() != binding.element {
            return Propagation::Continued;
        }

        match binding.trigger {
            Trigger::LabelClick | Trigger::LabelFocus | Trigger::Open => {
                field.trace(binding.trigger.describe());
                field.open(doc, true);
            }
            Trigger::Close => {
                field.trace(binding.trigger.describe());
                field.close(doc, true);
            }
            Trigger::Toggle => {
                field.trace(binding.trigger.describe());
                field.toggle(doc, None, true);
            }
            Trigger::FocusOut => {
                let related = match interaction {
                    Interaction::FocusOut { related, .. } => *related,
                    _ => None,
                };
                let inside = |node: Option<ElementId>| {
                    node.is_some_and(|node| doc.contains(field.element(), node))
                };
                if inside(related) || inside(doc.active_element()) {
                    return Propagation::Continued;
                }
                field.trace(binding.trigger.describe());
                if field.options().close_on_focus_out {
                    field.close(doc, true);
                }
            }
        }
        Propagation::Stopped
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, identifier: &str) -> Option<&FieldController> {
        self.fields.get(identifier)
    }

    pub fn field_mut(&mut self, identifier: &str) -> Option<&mut FieldController> {
        self.fields.get_mut(identifier)
    }

    /// Fields in registration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldController> {
        self.fields.values()
    }

    /// The field whose element or label contains `node`.
    pub fn field_containing(&self, doc: &Document, node: ElementId) -> Option<&FieldController> {
        self.fields.values().find(|field| {
            doc.contains(field.element(), node)
                || field
                    .label_element()
                    .is_some_and(|label| doc.contains(label, node))
        })
    }

    pub fn open(&mut self, doc: &mut Document, identifier: &str) -> Result<&FieldController, FieldError> {
        self.require(identifier)?.open(doc, true);
        self.settle_focus(doc);
        self.lookup(identifier)
    }

    pub fn close(&mut self, doc: &mut Document, identifier: &str) -> Result<&FieldController, FieldError> {
        self.require(identifier)?.close(doc, true);
        self.settle_focus(doc);
        self.lookup(identifier)
    }

    pub fn toggle(
        &mut self,
        doc: &mut Document,
        identifier: &str,
        open: Option<bool>,
    ) -> Result<&FieldController, FieldError> {
        self.require(identifier)?.toggle(doc, open, true);
        self.settle_focus(doc);
        self.lookup(identifier)
    }

    fn lookup(&self, identifier: &str) -> Result<&FieldController, FieldError> {
        self.fields
            .get(identifier)
            .ok_or_else(|| FieldError::UnknownField(identifier.to_string()))
    }

    fn require(&mut self, identifier: &str) -> Result<&mut FieldController, FieldError> {
        self.fields
            .get_mut(identifier)
            .ok_or_else(|| FieldError::UnknownField(identifier.to_string()))
    }
}

fn non_empty_attribute(doc: &Document, element: ElementId, name: &str) -> Option<String> {
    let value = doc.attribute(element, name).filter(|value| !value.is_empty());
    if value.is_some() {
        debug!(attribute = name, element = element.index(), "label attribute override");
    }
    value.map(str::to_string)
}
