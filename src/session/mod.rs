//! A document plus its registered fields, driven by scripted or interactive input.

mod report;
mod step;

use tracing::debug;

use crate::{
    dom::{Document, ElementId},
    error::FieldError,
    field::{GlobalOptions, InputKind},
    registry::{Interaction, Propagation, RegistrationReport, Registry},
};

pub use report::{FieldReport, SessionReport};
pub use step::{Script, Step};

#[derive(Debug)]
pub struct Session {
    document: Document,
    registry: Registry,
    registration: RegistrationReport,
}

impl Session {
    /// Registers every field in `document` as one batch.
    pub fn new(mut document: Document, options: &GlobalOptions) -> Self {
        let mut registry = Registry::new();
        let registration = registry.register(&mut document, options);
        debug!(
            registered = registration.registered.len(),
            skipped = registration.skipped.len(),
            "registered vanishing fields"
        );
        Self {
            document,
            registry,
            registration,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Outcome of the registration run when the session was created.
    pub fn registration(&self) -> &RegistrationReport {
        &self.registration
    }

    pub fn dispatch(&mut self, interaction: Interaction) -> Propagation {
        self.registry.dispatch(&mut self.document, interaction)
    }

    /// Clicks `target`. Like a pointer press, focus first moves to the nearest
    /// focusable element, or leaves the document when there is none.
    pub fn click(&mut self, target: ElementId) -> Propagation {
        match self.document.focus_target(target) {
            Some(focusable) if self.document.active_element() != Some(focusable) => {
                self.focus(focusable);
            }
            Some(_) => {}
            None => self.blur(),
        }
        self.dispatch(Interaction::Click { target })
    }

    /// Moves focus to `target`: focus-out on the previously focused element, then focus-in.
    pub fn focus(&mut self, target: ElementId) {
        let previous = self.document.active_element();
        self.document.focus(target);
        if let Some(previous) = previous
            && previous != target
        {
            self.dispatch(Interaction::FocusOut {
                target: previous,
                related: Some(target),
            });
        }
        self.dispatch(Interaction::FocusIn { target });
    }

    pub fn blur(&mut self) {
        let Some(previous) = self.document.active_element() else {
            return;
        };
        self.document.blur();
        self.dispatch(Interaction::FocusOut {
            target: previous,
            related: None,
        });
    }

    pub fn open(&mut self, field: &str) -> Result<(), FieldError> {
        self.registry.open(&mut self.document, field).map(|_| ())
    }

    pub fn close(&mut self, field: &str) -> Result<(), FieldError> {
        self.registry.close(&mut self.document, field).map(|_| ())
    }

    pub fn toggle(&mut self, field: &str, open: Option<bool>) -> Result<(), FieldError> {
        self.registry
            .toggle(&mut self.document, field, open)
            .map(|_| ())
    }

    /// Mutable access to live input state. Field values are re-read on close.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn apply(&mut self, step: &Step) -> Result<(), FieldError> {
        debug!(step = step.name(), "applying step");
        match step {
            Step::Click { target } => {
                let target = self.element(target)?;
                self.click(target);
            }
            Step::Focus { target } => {
                let target = self.element(target)?;
                self.focus(target);
            }
            Step::Blur => self.blur(),
            Step::Input { target, value } => {
                let input = self.input(target, |kind| {
                    matches!(kind, InputKind::Text | InputKind::TextArea)
                })?;
                self.document.set_value(input, value.as_str());
            }
            Step::Check { target, checked } => {
                let input = self.input(target, InputKind::is_checkable)?;
                self.document.set_checked(input, *checked);
            }
            Step::Select { target, values } => {
                let input = self.input(target, |kind| matches!(kind, InputKind::Select { .. }))?;
                self.document.set_selected(input, values.as_slice());
            }
            Step::Files { target, files } => {
                let input = self.input(target, |kind| kind == InputKind::File)?;
                self.document.set_files(input, files.as_slice());
            }
            Step::Open { field } => self.open(field)?,
            Step::Close { field } => self.close(field)?,
            Step::Toggle { field, open } => self.toggle(field, *open)?,
        }
        Ok(())
    }

    /// Applies steps in order, stopping at the first failure.
    pub fn run_script(&mut self, script: &Script) -> Result<(), FieldError> {
        for step in script.steps() {
            self.apply(step)?;
        }
        Ok(())
    }

    /// Reports for every field in registration order.
    pub fn snapshot(&self) -> Vec<FieldReport> {
        self.registry
            .fields()
            .map(|field| FieldReport::capture(field, &self.document))
            .collect()
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            fields: self.snapshot(),
        }
    }

    fn element(&self, id: &str) -> Result<ElementId, FieldError> {
        self.document
            .by_id(id)
            .ok_or_else(|| FieldError::UnknownElement(id.to_string()))
    }

    fn input(&self, id: &str, accepts: impl Fn(InputKind) -> bool) -> Result<ElementId, FieldError> {
        let element = self.element(id)?;
        let kind = self.document.get(element).and_then(|node| {
            InputKind::classify(
                node.tag(),
                node.attribute("type"),
                node.has_attribute("multiple"),
            )
        });
        match kind {
            Some(kind) if accepts(kind) => Ok(element),
            _ => Err(FieldError::NotAnInput(id.to_string())),
        }
    }
}
