use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use super::{
    controller::FieldController,
    event::FieldEvent,
    template::{LabelTemplate, literal_from_str, templated_from_str},
};

/// Listener for a field's `open` or `close` event.
pub type FieldCallback = Arc<dyn Fn(&FieldEvent, &FieldController) + Send + Sync>;

/// Where tab index assignment starts for a registration batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabIndexStart {
    /// Continue after the highest index issued by earlier batches.
    #[default]
    Continue,
    At(i32),
    /// Leave tab indices untouched.
    Disabled,
}

impl<'de> Deserialize<'de> for TabIndexStart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(i32),
            Flag(bool),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Index(index) => TabIndexStart::At(index),
            Raw::Flag(false) => TabIndexStart::Disabled,
            Raw::Flag(true) => TabIndexStart::Continue,
        })
    }
}

/// One layer of field configuration. Unset entries fall through to the layer below.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldOptions {
    pub apply_styles: Option<bool>,
    pub close_on_focus_out: Option<bool>,
    pub dev_mode: Option<bool>,
    #[serde(deserialize_with = "templated_from_str")]
    pub display: Option<LabelTemplate>,
    #[serde(deserialize_with = "literal_from_str")]
    pub placeholder: Option<LabelTemplate>,
    pub starting_tab_index: Option<TabIndexStart>,
    #[serde(skip)]
    pub on_open: Option<FieldCallback>,
    #[serde(skip)]
    pub on_close: Option<FieldCallback>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_apply_styles(mut self, enabled: bool) -> Self {
        self.apply_styles = Some(enabled);
        self
    }

    pub fn with_close_on_focus_out(mut self, enabled: bool) -> Self {
        self.close_on_focus_out = Some(enabled);
        self
    }

    pub fn with_dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = Some(enabled);
        self
    }

    pub fn with_display(mut self, template: impl Into<String>) -> Self {
        self.display = Some(LabelTemplate::templated(template));
        self
    }

    pub fn with_display_fn<F>(mut self, compute: F) -> Self
    where
        F: Fn(&FieldController) -> String + Send + Sync + 'static,
    {
        self.display = Some(LabelTemplate::computed(compute));
        self
    }

    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(LabelTemplate::literal(text));
        self
    }

    pub fn with_placeholder_fn<F>(mut self, compute: F) -> Self
    where
        F: Fn(&FieldController) -> String + Send + Sync + 'static,
    {
        self.placeholder = Some(LabelTemplate::computed(compute));
        self
    }

    pub fn with_starting_tab_index(mut self, index: i32) -> Self {
        self.starting_tab_index = Some(TabIndexStart::At(index));
        self
    }

    pub fn without_tab_index(mut self) -> Self {
        self.starting_tab_index = Some(TabIndexStart::Disabled);
        self
    }

    pub fn on_open<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FieldEvent, &FieldController) + Send + Sync + 'static,
    {
        self.on_open = Some(Arc::new(callback));
        self
    }

    pub fn on_close<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FieldEvent, &FieldController) + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(callback));
        self
    }

    /// Lays `upper` over `self`; entries set in `upper` win.
    fn overlay(&mut self, upper: &FieldOptions) {
        fn take<T: Clone>(slot: &mut Option<T>, upper: &Option<T>) {
            if upper.is_some() {
                slot.clone_from(upper);
            }
        }
        take(&mut self.apply_styles, &upper.apply_styles);
        take(&mut self.close_on_focus_out, &upper.close_on_focus_out);
        take(&mut self.dev_mode, &upper.dev_mode);
        take(&mut self.display, &upper.display);
        take(&mut self.placeholder, &upper.placeholder);
        take(&mut self.starting_tab_index, &upper.starting_tab_index);
        take(&mut self.on_open, &upper.on_open);
        take(&mut self.on_close, &upper.on_close);
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("apply_styles", &self.apply_styles)
            .field("close_on_focus_out", &self.close_on_focus_out)
            .field("dev_mode", &self.dev_mode)
            .field("display", &self.display)
            .field("placeholder", &self.placeholder)
            .field("starting_tab_index", &self.starting_tab_index)
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Options handed to a registration pass: shared defaults plus per-identifier overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalOptions {
    #[serde(flatten)]
    pub defaults: FieldOptions,
    pub options: IndexMap<String, FieldOptions>,
}

impl GlobalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(mut self, defaults: FieldOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_field(mut self, identifier: impl Into<String>, options: FieldOptions) -> Self {
        self.options.insert(identifier.into(), options);
        self
    }

    pub fn starting_tab_index(&self) -> TabIndexStart {
        self.defaults.starting_tab_index.unwrap_or_default()
    }
}

/// Raw attribute values found on a field element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeOverrides {
    pub apply_styles: Option<String>,
    pub close_on_focus_out: Option<String>,
}

/// `"false"` disables; any other present value enables.
fn attribute_flag(raw: Option<&str>) -> Option<bool> {
    raw.map(|value| value != "false")
}

/// Fully merged configuration for one field.
#[derive(Clone)]
pub struct ResolvedOptions {
    pub apply_styles: bool,
    pub close_on_focus_out: bool,
    pub dev_mode: bool,
    pub display: Option<LabelTemplate>,
    pub placeholder: Option<LabelTemplate>,
    pub starting_tab_index: TabIndexStart,
    pub on_open: Option<FieldCallback>,
    pub on_close: Option<FieldCallback>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            apply_styles: true,
            close_on_focus_out: true,
            dev_mode: false,
            display: None,
            placeholder: None,
            starting_tab_index: TabIndexStart::Continue,
            on_open: None,
            on_close: None,
        }
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("apply_styles", &self.apply_styles)
            .field("close_on_focus_out", &self.close_on_focus_out)
            .field("dev_mode", &self.dev_mode)
            .field("display", &self.display)
            .field("placeholder", &self.placeholder)
            .field("starting_tab_index", &self.starting_tab_index)
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

impl ResolvedOptions {
    /// Merges built-in defaults, global options, the identifier's overrides and
    /// element attributes, in increasing precedence.
    pub fn resolve(
        global: &GlobalOptions,
        identifier: &str,
        attributes: &AttributeOverrides,
    ) -> Self {
        let mut merged = global.defaults.clone();
        if let Some(specific) = global.options.get(identifier) {
            merged.overlay(specific);
        }
        merged.overlay(&FieldOptions {
            apply_styles: attribute_flag(attributes.apply_styles.as_deref()),
            close_on_focus_out: attribute_flag(attributes.close_on_focus_out.as_deref()),
            ..FieldOptions::default()
        });

        let builtin = Self::default();
        Self {
            apply_styles: merged.apply_styles.unwrap_or(builtin.apply_styles),
            close_on_focus_out: merged
                .close_on_focus_out
                .unwrap_or(builtin.close_on_focus_out),
            dev_mode: merged.dev_mode.unwrap_or(builtin.dev_mode),
            display: merged.display,
            placeholder: merged.placeholder,
            starting_tab_index: merged
                .starting_tab_index
                .unwrap_or(builtin.starting_tab_index),
            on_open: merged.on_open,
            on_close: merged.on_close,
        }
    }
}
