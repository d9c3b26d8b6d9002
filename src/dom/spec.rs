use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Document, ElementId};

/// Attribute value as written in a document file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    /// `true` sets an empty attribute, `false` leaves it out.
    Flag(bool),
    Number(serde_json::Number),
}

impl AttrValue {
    fn into_attribute(self) -> Option<String> {
        match self {
            AttrValue::Text(text) => Some(text),
            AttrValue::Flag(true) => Some(String::new()),
            AttrValue::Flag(false) => None,
            AttrValue::Number(number) => Some(number.to_string()),
        }
    }
}

/// Serializable description of one element and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    pub tag: String,
    pub attrs: IndexMap<String, AttrValue>,
    pub text: Option<String>,
    /// Names of the files chosen in a file input.
    pub files: Vec<String>,
    pub children: Vec<ElementSpec>,
}

impl Default for ElementSpec {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            attrs: IndexMap::new(),
            text: None,
            files: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// A document file: either a bare list of root elements or `{ "elements": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentSpec {
    Roots(Vec<ElementSpec>),
    Wrapped { elements: Vec<ElementSpec> },
}

impl DocumentSpec {
    pub fn elements(&self) -> &[ElementSpec] {
        match self {
            DocumentSpec::Roots(elements) | DocumentSpec::Wrapped { elements } => elements,
        }
    }
}

impl Document {
    pub fn from_spec(spec: &DocumentSpec) -> Self {
        let mut doc = Document::new();
        for element in spec.elements() {
            doc.build(None, element);
        }
        doc
    }

    /// Builds a document from already-parsed structured data.
    pub fn from_value(value: Value) -> Result<Self> {
        let spec: DocumentSpec =
            serde_json::from_value(value).context("document does not describe an element tree")?;
        Ok(Self::from_spec(&spec))
    }

    /// Appends `spec` under `parent`. Seeds live state from the `value`,
    /// `checked` and `selected` attributes the way a browser does on load.
    pub fn build(&mut self, parent: Option<ElementId>, spec: &ElementSpec) -> ElementId {
        let id = self.append(parent, &spec.tag);
        for (name, value) in &spec.attrs {
            if let Some(value) = value.clone().into_attribute() {
                self.set_attribute(id, name, value);
            }
        }
        if let Some(text) = &spec.text {
            self.set_text(id, text.clone());
        }
        self.set_files(id, &spec.files);

        let seeded = self.get(id).map(|element| {
            let value = element
                .attribute("value")
                .map(str::to_string)
                .or_else(|| (element.tag() == "textarea").then(|| element.text().to_string()));
            (
                value,
                element.has_attribute("checked"),
                element.has_attribute("selected"),
            )
        });
        if let Some((value, checked, selected)) = seeded {
            if let Some(value) = value {
                self.set_value(id, value);
            }
            if checked {
                self.set_checked(id, true);
            }
            if selected && let Some(element) = self.elements.get_mut(id.index()) {
                element.selected = true;
            }
        }

        for child in &spec.children {
            self.build(Some(id), child);
        }
        id
    }
}
