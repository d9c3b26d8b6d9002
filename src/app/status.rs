use crate::field::FieldEvent;

#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Tab moves between fields, Enter opens or closes one.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn field_event(&mut self, event: &FieldEvent) {
        self.message = format!("{} {}", event.field, past_tense(event.kind.name()));
    }

    pub fn value_updated(&mut self, name: &str) {
        self.message = format!("Editing {name}");
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn past_tense(action: &str) -> String {
    match action {
        "open" => "opened".to_string(),
        "close" => "closed".to_string(),
        other => other.to_string(),
    }
}
