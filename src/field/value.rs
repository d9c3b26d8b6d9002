use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Extracted values keyed by logical input name, in input discovery order.
pub type ValueMap = IndexMap<String, FieldValue>;

/// Value contributed by one logical input name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }

    /// Whether the slot already holds something a later unchecked input must not overwrite.
    /// Sequences count even when empty.
    pub fn is_recorded(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::List(_) => true,
        }
    }

    /// Whether the value carries any non-empty content.
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::List(items) => items.iter().any(|item| !item.is_empty()),
        }
    }

    pub fn entries(&self) -> Vec<&str> {
        match self {
            FieldValue::Null => Vec::new(),
            FieldValue::Text(text) => vec![text.as_str()],
            FieldValue::List(items) => items.iter().map(String::as_str).collect(),
        }
    }

    /// Folds a second contribution for the same name into this slot.
    pub fn merge(self, incoming: FieldValue) -> FieldValue {
        let mut combined = match self {
            FieldValue::Null => Vec::new(),
            FieldValue::Text(text) => vec![text],
            FieldValue::List(items) => items,
        };
        match incoming {
            FieldValue::Null => {}
            FieldValue::Text(text) => combined.push(text),
            FieldValue::List(items) => combined.extend(items),
        }
        combined.retain(|item| !item.is_empty());
        FieldValue::List(combined)
    }

    pub fn joined(&self, joiner: &str) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(text) => text.clone(),
            FieldValue::List(items) => items.join(joiner),
        }
    }

    /// Text shown for this value when no display template is configured.
    pub fn summary(&self) -> String {
        match self {
            FieldValue::List(items) => items
                .iter()
                .filter(|item| !item.is_empty())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(","),
            other => other.joined(","),
        }
    }

    /// Sequences compare order-insensitively; a sequence never equals a scalar.
    pub fn differs_from(&self, original: &FieldValue) -> bool {
        match (self, original) {
            (FieldValue::List(current), FieldValue::List(previous)) => {
                sorted_join(current) != sorted_join(previous)
            }
            (FieldValue::List(_), _) | (_, FieldValue::List(_)) => true,
            (current, previous) => current != previous,
        }
    }
}

fn sorted_join(items: &[String]) -> String {
    let mut sorted = items.to_vec();
    sorted.sort();
    sorted.join(",")
}

pub fn has_filled_value(values: &ValueMap) -> bool {
    values.values().any(FieldValue::is_filled)
}

/// Names whose value differs from the baseline. Every key on both sides is visited.
pub fn changed_names(values: &ValueMap, original: &ValueMap) -> Vec<String> {
    let missing = FieldValue::Null;
    let mut names: Vec<String> = values
        .iter()
        .filter(|(name, value)| value.differs_from(original.get(*name).unwrap_or(&missing)))
        .map(|(name, _)| name.clone())
        .collect();
    names.extend(
        original
            .iter()
            .filter(|(name, value)| !values.contains_key(*name) && value.is_recorded())
            .map(|(name, _)| name.clone()),
    );
    names
}
