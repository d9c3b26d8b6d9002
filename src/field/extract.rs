use super::value::{FieldValue, ValueMap};

/// How an input contributes to the extracted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Checkbox,
    Radio,
    File,
    Select { multiple: bool },
}

impl InputKind {
    /// Classifies an element from its tag and `type` attribute. Unknown input types read as text.
    pub fn classify(tag: &str, input_type: Option<&str>, multiple: bool) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "textarea" => Some(InputKind::TextArea),
            "select" => Some(InputKind::Select { multiple }),
            "input" => Some(
                match input_type
                    .map(str::to_ascii_lowercase)
                    .as_deref()
                    .unwrap_or("text")
                {
                    "checkbox" => InputKind::Checkbox,
                    "radio" => InputKind::Radio,
                    "file" => InputKind::File,
                    _ => InputKind::Text,
                },
            ),
            _ => None,
        }
    }

    pub fn is_checkable(self) -> bool {
        matches!(self, InputKind::Checkbox | InputKind::Radio)
    }
}

/// Point-in-time reading of one input element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    pub name: Option<String>,
    pub id: Option<String>,
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
    pub selected: Vec<String>,
    pub files: Vec<String>,
}

impl InputSnapshot {
    pub fn new(kind: InputKind) -> Self {
        Self {
            name: None,
            id: None,
            kind,
            value: String::new(),
            checked: false,
            selected: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_selected<I, S>(mut self, selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = selected.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    /// `name`, falling back to `id`; blank strings count as absent.
    pub fn logical_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.id.as_deref().filter(|id| !id.is_empty()))
    }

    fn contribution(&self, array_slot: bool) -> FieldValue {
        match self.kind {
            InputKind::Select { multiple: true } => FieldValue::List(self.selected.clone()),
            InputKind::File => FieldValue::List(self.files.clone()),
            _ if array_slot => FieldValue::List(vec![self.value.clone()]),
            _ => FieldValue::Text(self.value.clone()),
        }
    }
}

/// Builds the name to value map for a field's inputs.
///
/// Inputs without a usable name are ignored. Later inputs sharing a name merge
/// into the slot recorded by the first one.
pub fn extract_values(inputs: &[InputSnapshot]) -> ValueMap {
    let mut values = ValueMap::new();
    for input in inputs {
        let Some(raw_name) = input.logical_name() else {
            continue;
        };
        let (name, array_slot) = match raw_name.strip_suffix("[]") {
            Some(stripped) => (stripped, true),
            None => (raw_name, false),
        };
        let recorded = values.get(name).is_some_and(FieldValue::is_recorded);

        let mut value = input.contribution(array_slot);
        if input.kind.is_checkable() && !input.checked {
            if recorded {
                continue;
            }
            value = if value.is_list() {
                FieldValue::List(Vec::new())
            } else {
                FieldValue::Null
            };
        }

        if recorded && let Some(existing) = values.get(name).cloned() {
            value = existing.merge(value);
        }
        values.insert(name.to_string(), value);
    }
    values
}
