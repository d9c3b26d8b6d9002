use super::Element;

/// Attribute-based element filter, the subset of CSS selectors field discovery needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tags: Vec<String>,
    required: Vec<(String, Option<String>)>,
    excluded: Vec<String>,
}

impl Selector {
    /// Matches every element.
    pub fn any() -> Self {
        Self::default()
    }

    /// `[name]`
    pub fn attr(name: impl Into<String>) -> Self {
        Self::any().and_attr(name)
    }

    /// `[name="value"]`
    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::any().and_attr_eq(name, value)
    }

    /// Matches any of the given tags, case-insensitively.
    pub fn tags(tags: &[&str]) -> Self {
        Self {
            tags: tags.iter().map(|tag| tag.to_ascii_lowercase()).collect(),
            ..Self::default()
        }
    }

    pub fn and_attr(mut self, name: impl Into<String>) -> Self {
        self.required.push((name.into(), None));
        self
    }

    pub fn and_attr_eq(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.required.push((name.into(), Some(value.into())));
        self
    }

    /// `:not([name])`
    pub fn without(mut self, name: impl Into<String>) -> Self {
        self.excluded.push(name.into());
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        if !self.tags.is_empty() && !self.tags.iter().any(|tag| element.tag() == tag) {
            return false;
        }
        let required = self
            .required
            .iter()
            .all(|(name, expected)| match (element.attribute(name), expected) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            });
        required && !self.excluded.iter().any(|name| element.has_attribute(name))
    }
}
