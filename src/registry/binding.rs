use crate::dom::ElementId;

/// A user interaction delivered by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Click {
        target: ElementId,
    },
    FocusIn {
        target: ElementId,
    },
    /// `target` lost focus; `related` is the element receiving it, if any.
    FocusOut {
        target: ElementId,
        related: Option<ElementId>,
    },
}

impl Interaction {
    pub fn target(&self) -> ElementId {
        match *self {
            Interaction::Click { target }
            | Interaction::FocusIn { target }
            | Interaction::FocusOut { target, .. } => target,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Click { .. } => "click",
            Interaction::FocusIn { .. } => "focusin",
            Interaction::FocusOut { .. } => "focusout",
        }
    }
}

/// Whether an interaction kept bubbling after the handlers ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continued,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    LabelClick,
    LabelFocus,
    FocusOut,
    Open,
    Close,
    Toggle,
}

impl Trigger {
    fn listens_to(self, interaction: &Interaction) -> bool {
        match interaction {
            Interaction::Click { .. } => matches!(
                self,
                Trigger::LabelClick | Trigger::Open | Trigger::Close | Trigger::Toggle
            ),
            Interaction::FocusIn { .. } => self == Trigger::LabelFocus,
            Interaction::FocusOut { .. } => self == Trigger::FocusOut,
        }
    }

    /// External triggers react only when they are the interaction target themselves.
    pub(crate) fn requires_exact_target(self) -> bool {
        matches!(self, Trigger::Open | Trigger::Close | Trigger::Toggle)
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            Trigger::LabelClick => "label click",
            Trigger::LabelFocus => "label focusin",
            Trigger::FocusOut => "focusout",
            Trigger::Open => "openElement click",
            Trigger::Close => "closeElement click",
            Trigger::Toggle => "toggleElement click",
        }
    }
}

/// A handler attached to one element on behalf of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Binding {
    pub element: ElementId,
    pub trigger: Trigger,
    /// Position of the field in the registry.
    pub field: usize,
}

impl Binding {
    pub(crate) fn handles(&self, node: ElementId, interaction: &Interaction) -> bool {
        self.element == node && self.trigger.listens_to(interaction)
    }
}
