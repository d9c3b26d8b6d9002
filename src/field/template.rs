use std::{fmt, sync::Arc, sync::LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Deserializer};

use super::{
    controller::FieldController,
    value::{FieldValue, ValueMap},
};

const DEFAULT_JOINER: &str = ",";

static TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{(.+?)\}").ok());

/// Computes label content from the whole field.
pub type ComputeLabel = Arc<dyn Fn(&FieldController) -> String + Send + Sync>;

/// Source of a label's content.
#[derive(Clone)]
pub enum LabelTemplate {
    /// Shown verbatim.
    Literal(String),
    /// `{name}` and `{name|default|joiner}` tokens are replaced from the field values.
    Templated(String),
    Computed(ComputeLabel),
}

impl LabelTemplate {
    pub fn literal(text: impl Into<String>) -> Self {
        LabelTemplate::Literal(text.into())
    }

    pub fn templated(template: impl Into<String>) -> Self {
        LabelTemplate::Templated(template.into())
    }

    pub fn computed<F>(compute: F) -> Self
    where
        F: Fn(&FieldController) -> String + Send + Sync + 'static,
    {
        LabelTemplate::Computed(Arc::new(compute))
    }

    pub fn render(&self, field: &FieldController) -> String {
        match self {
            LabelTemplate::Literal(text) => text.clone(),
            LabelTemplate::Templated(template) => substitute(template, field.values()),
            LabelTemplate::Computed(compute) => compute(field),
        }
    }
}

impl fmt::Debug for LabelTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelTemplate::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            LabelTemplate::Templated(template) => {
                f.debug_tuple("Templated").field(template).finish()
            }
            LabelTemplate::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Replaces every `{name|default|joiner}` token in `template`.
///
/// A value resolves when it is a non-empty string or any sequence; otherwise the
/// default is used when non-empty, and the token is left as written when neither
/// resolves.
pub fn substitute(template: &str, values: &ValueMap) -> String {
    let Some(token) = TOKEN.as_ref() else {
        return template.to_string();
    };
    token
        .replace_all(template, |caps: &Captures<'_>| {
            let mut parts = caps[1].split('|');
            let name = parts.next().unwrap_or_default();
            let default = parts.next().filter(|text| !text.is_empty());
            let joiner = parts
                .next()
                .filter(|text| !text.is_empty())
                .unwrap_or(DEFAULT_JOINER);
            match values.get(name) {
                Some(value @ FieldValue::List(_)) => value.joined(joiner),
                Some(FieldValue::Text(text)) if !text.is_empty() => text.clone(),
                _ => default.map_or_else(|| caps[0].to_string(), str::to_string),
            }
        })
        .into_owned()
}

/// Deserializes a plain string as a [`LabelTemplate::Templated`].
pub(crate) fn templated_from_str<'de, D>(deserializer: D) -> Result<Option<LabelTemplate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(LabelTemplate::Templated))
}

/// Deserializes a plain string as a [`LabelTemplate::Literal`].
pub(crate) fn literal_from_str<'de, D>(deserializer: D) -> Result<Option<LabelTemplate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(LabelTemplate::Literal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> ValueMap {
        let mut values = ValueMap::new();
        values.insert("first".into(), FieldValue::text("Ada"));
        values.insert("last".into(), FieldValue::text(""));
        values.insert("colors".into(), FieldValue::list(["red", "blue"]));
        values.insert("none".into(), FieldValue::List(Vec::new()));
        values.insert("unset".into(), FieldValue::Null);
        values
    }

    #[test]
    fn substitutes_plain_tokens() {
        assert_eq!(substitute("Hi {first}!", &values()), "Hi Ada!");
    }

    #[test]
    fn joins_sequences_with_custom_joiner() {
        assert_eq!(substitute("{colors|none|/}", &values()), "red/blue");
        assert_eq!(substitute("{colors}", &values()), "red,blue");
        assert_eq!(substitute("{colors||}", &values()), "red,blue");
    }

    #[test]
    fn falls_back_to_default_then_token() {
        assert_eq!(substitute("{last|Unknown}", &values()), "Unknown");
        assert_eq!(substitute("{unset}", &values()), "{unset}");
        assert_eq!(substitute("{missing|}", &values()), "{missing|}");
    }

    #[test]
    fn empty_sequence_resolves_to_empty_text() {
        assert_eq!(substitute("[{none|fallback}]", &values()), "[]");
    }

    #[test]
    fn leaves_text_without_tokens_alone() {
        assert_eq!(substitute("no tokens {}", &values()), "no tokens {}");
    }
}
