//! In-memory element tree that stands in for the host UI.

mod host;
mod selector;
mod spec;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::field::FieldEvent;

pub use selector::Selector;
pub use spec::{AttrValue, DocumentSpec, ElementSpec};

/// Handle to an element owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl ElementId {
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: IndexSet<String>,
    hidden: bool,
    text: String,
    value: String,
    checked: bool,
    selected: bool,
    files: Vec<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            classes: IndexSet::new(),
            hidden: false,
            text: String::new(),
            value: String::new(),
            checked: false,
            selected: false,
            files: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// The `id` attribute.
    pub fn html_id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Explicit `tabindex`; unparsable values count as absent.
    pub fn tab_index(&self) -> Option<i32> {
        self.attribute("tabindex")
            .and_then(|raw| raw.trim().parse().ok())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// `display: none` plus `visibility: hidden`.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Text content; label content is rendered here.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Value an `option` element submits.
    pub fn option_value(&self) -> &str {
        self.attribute("value").unwrap_or(&self.text)
    }
}

/// Focus moved by a field rather than by the user; the focus-out on
/// `previous` is still owed to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: ElementId,
    pub next: ElementId,
}

/// A field event together with the elements it bubbled through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub event: FieldEvent,
    /// Target first, then its ancestors up to the root.
    pub path: Vec<ElementId>,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
    active: Option<ElementId>,
    events: Vec<DispatchedEvent>,
    focus_changes: Vec<FocusChange>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an element as the last child of `parent`, or as a new root.
    pub fn append(&mut self, parent: Option<ElementId>, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        let parent = parent.filter(|parent| parent.0 < self.elements.len());
        self.elements.push(Element::new(tag, parent));
        match parent {
            Some(parent) => self.elements[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id).and_then(|element| element.attribute(name))
    }

    /// Sets an attribute; `class` replaces the class set.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        let value = value.into();
        if name == "class" {
            element.classes = value.split_whitespace().map(str::to_string).collect();
        }
        element.attributes.insert(name.to_string(), value);
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(element) = self.get_mut(id) {
            element.attributes.shift_remove(name);
            if name == "class" {
                element.classes.clear();
            }
        }
    }

    pub fn toggle_class(&mut self, id: ElementId, class: &str, on: bool) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        let changed = if on {
            element.classes.insert(class.to_string())
        } else {
            element.classes.shift_remove(class)
        };
        if changed {
            let joined = element
                .classes
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            element.attributes.insert("class".to_string(), joined);
        }
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(element) = self.get_mut(id) {
            element.hidden = hidden;
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.text = text.into();
        }
    }

    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.value = value.into();
        }
    }

    /// Checks or unchecks an input. Checking a radio unchecks the radios sharing
    /// its name within the same `form` (or the whole document).
    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        let Some(element) = self.get(id) else {
            return;
        };
        if checked && element.attribute("type") == Some("radio") {
            let name = element.attribute("name").map(str::to_string);
            let scope = self.form_scope(id);
            for other in scope {
                if other == id {
                    continue;
                }
                let same_group = self.get(other).is_some_and(|candidate| {
                    candidate.tag == "input"
                        && candidate.attribute("type") == Some("radio")
                        && candidate.attribute("name").map(str::to_string) == name
                });
                if same_group && let Some(candidate) = self.get_mut(other) {
                    candidate.checked = false;
                }
            }
        }
        if let Some(element) = self.get_mut(id) {
            element.checked = checked;
        }
    }

    /// Selects the `option` children of a `select` whose values are listed.
    /// Single selects keep only the first match.
    pub fn set_selected<S: AsRef<str>>(&mut self, select: ElementId, values: &[S]) {
        let multiple = self
            .get(select)
            .is_some_and(|element| element.has_attribute("multiple"));
        let mut taken = false;
        for option in self.options_of(select) {
            let wanted = self.get(option).is_some_and(|element| {
                values
                    .iter()
                    .any(|value| value.as_ref() == element.option_value())
            });
            let selected = wanted && (multiple || !taken);
            taken |= selected;
            if let Some(element) = self.get_mut(option) {
                element.selected = selected;
            }
        }
    }

    pub fn set_files<S: AsRef<str>>(&mut self, id: ElementId, files: &[S]) {
        if let Some(element) = self.get_mut(id) {
            element.files = files.iter().map(|file| file.as_ref().to_string()).collect();
        }
    }

    /// `option` descendants of a `select`, in document order.
    pub fn options_of(&self, select: ElementId) -> Vec<ElementId> {
        self.descendants(select)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|element| element.tag == "option"))
            .collect()
    }

    /// Values of the selected options. A single select with nothing selected
    /// reports its first option.
    pub fn selected_values(&self, select: ElementId) -> Vec<String> {
        let options = self.options_of(select);
        let selected: Vec<String> = options
            .iter()
            .filter_map(|id| self.get(*id))
            .filter(|element| element.selected)
            .map(|element| element.option_value().to_string())
            .collect();
        let multiple = self
            .get(select)
            .is_some_and(|element| element.has_attribute("multiple"));
        if selected.is_empty() && !multiple {
            return options
                .first()
                .and_then(|id| self.get(*id))
                .map(|element| vec![element.option_value().to_string()])
                .unwrap_or_default();
        }
        selected
    }

    pub fn focus(&mut self, id: ElementId) {
        if self.get(id).is_some() {
            self.active = Some(id);
        }
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Moves focus like [`Document::focus`] and queues the focus-out the
    /// previously focused element is owed.
    pub(crate) fn shift_focus(&mut self, id: ElementId) {
        let previous = self.active;
        self.focus(id);
        if let Some(previous) = previous
            && self.active == Some(id)
            && previous != id
        {
            self.focus_changes.push(FocusChange { previous, next: id });
        }
    }

    pub fn take_focus_changes(&mut self) -> Vec<FocusChange> {
        std::mem::take(&mut self.focus_changes)
    }

    /// Whether a click on the element would give it focus.
    pub fn is_focusable(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|element| {
            element.tab_index().is_some()
                || matches!(element.tag(), "input" | "select" | "textarea" | "button")
                || (element.tag() == "a" && element.has_attribute("href"))
        })
    }

    /// The element a click on `id` focuses: `id` or its nearest focusable ancestor.
    pub fn focus_target(&self, id: ElementId) -> Option<ElementId> {
        self.ancestors(id)
            .into_iter()
            .find(|node| self.is_focusable(*node))
    }

    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// `id` itself followed by its ancestors.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = self.get(id).map(|_| id);
        while let Some(node) = current {
            path.push(node);
            current = self.get(node).and_then(Element::parent);
        }
        path
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    /// Descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        if let Some(element) = self.get(id) {
            for child in &element.children {
                self.collect_preorder(*child, &mut out);
            }
        }
        out
    }

    fn collect_preorder(&self, start: ElementId, out: &mut Vec<ElementId>) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(element) = self.get(id) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
    }

    /// Every element in document order.
    pub fn all(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect_preorder(*root, &mut out);
        }
        out
    }

    pub fn select_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.all()
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|element| selector.matches(element)))
            .collect()
    }

    pub fn select_first(&self, selector: &Selector) -> Option<ElementId> {
        self.select_all(selector).into_iter().next()
    }

    pub fn select_within(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(|element| selector.matches(element)))
            .collect()
    }

    /// Looks an element up by its `id` attribute.
    pub fn by_id(&self, html_id: &str) -> Option<ElementId> {
        self.all()
            .into_iter()
            .find(|id| self.get(*id).and_then(Element::html_id) == Some(html_id))
    }

    fn form_scope(&self, id: ElementId) -> Vec<ElementId> {
        let form = self
            .ancestors(id)
            .into_iter()
            .find(|node| self.get(*node).is_some_and(|element| element.tag == "form"));
        match form {
            Some(form) => self.descendants(form),
            None => self.all(),
        }
    }

    /// Field events dispatched so far, oldest first.
    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<DispatchedEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn record_event(&mut self, event: &FieldEvent) {
        let path = if event.bubbles {
            self.ancestors(event.target)
        } else {
            vec![event.target]
        };
        self.events.push(DispatchedEvent {
            event: event.clone(),
            path,
        });
    }
}
