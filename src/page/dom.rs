//! Headless element tree
//!
//! Just enough of a document to hold what the page handlers mutate:
//! class lists, inline styles, data attributes, text, form values and
//! the document-space geometry used by scroll and viewport checks.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::error::{PageError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(u32);

/// Box in document coordinates (not affected by scrolling)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub key: Option<String>,     // Document-unique id, like an HTML id attribute
    pub classes: BTreeSet<String>,
    pub style: BTreeMap<String, String>,
    pub data: BTreeMap<String, String>,
    pub text: String,
    pub value: String,           // Form field value
    pub disabled: bool,
    pub rect: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    /// Add one or more space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        for c in classes.split_whitespace() {
            self.classes.insert(c.to_string());
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn data(mut self, name: &str, value: impl Into<String>) -> Self {
        self.data.insert(name.to_string(), value.into());
        self
    }

    pub fn styled(mut self, name: &str, value: impl Into<String>) -> Self {
        self.style.insert(name.to_string(), value.into());
        self
    }

    pub fn at(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, class: &str) -> bool {
        if self.classes.remove(class) {
            false
        } else {
            self.classes.insert(class.to_string());
            true
        }
    }

    /// Set an inline style property; an empty value clears it
    pub fn set_style(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.style.remove(name);
        } else {
            self.style.insert(name.to_string(), value);
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        self.style.get(name).map(String::as_str)
    }

    /// Hidden with `display: none`
    pub fn is_hidden(&self) -> bool {
        self.style("display") == Some("none")
    }
}

/// Serializable view of a subtree
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

#[derive(Debug)]
pub struct Dom {
    elements: HashMap<ElementId, Element>,
    keys: HashMap<String, ElementId>,
    body: ElementId,
    next_id: u32,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let body = ElementId(0);
        let mut elements = HashMap::new();
        elements.insert(body, Element::new("body").key("body"));
        let mut keys = HashMap::new();
        keys.insert("body".to_string(), body);

        Self {
            elements,
            keys,
            body,
            next_id: 1,
        }
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Append `element` as the last child of `parent`.
    /// A key already in use is moved to the new element.
    pub fn append(&mut self, parent: ElementId, mut element: Element) -> Result<ElementId> {
        if !self.elements.contains_key(&parent) {
            return Err(PageError::Detached(parent));
        }

        let id = ElementId(self.next_id);
        self.next_id += 1;

        element.parent = Some(parent);
        element.children.clear();
        if let Some(key) = &element.key {
            self.keys.insert(key.clone(), id);
        }
        self.elements.insert(id, element);

        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Remove an element and its subtree. Returns false if it was not attached.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.body {
            return false;
        }
        let Some(element) = self.elements.remove(&id) else {
            return false;
        };

        if let Some(parent) = element.parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        if let Some(key) = &element.key {
            if self.keys.get(key) == Some(&id) {
                self.keys.remove(key);
            }
        }
        for child in element.children {
            self.remove_detached(child);
        }
        true
    }

    fn remove_detached(&mut self, id: ElementId) {
        if let Some(element) = self.elements.remove(&id) {
            if let Some(key) = &element.key {
                if self.keys.get(key) == Some(&id) {
                    self.keys.remove(key);
                }
            }
            for child in element.children {
                self.remove_detached(child);
            }
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn element(&self, id: ElementId) -> Result<&Element> {
        self.elements.get(&id).ok_or(PageError::Detached(id))
    }

    pub fn element_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        self.elements.get_mut(&id).ok_or(PageError::Detached(id))
    }

    /// Look up an element by key (getElementById)
    pub fn by_key(&self, key: &str) -> Option<ElementId> {
        self.keys.get(key).copied()
    }

    pub fn require(&self, key: &str) -> Result<ElementId> {
        self.by_key(key)
            .ok_or_else(|| PageError::UnknownKey(key.to_string()))
    }

    /// All elements carrying `class`, in document order
    pub fn query_class(&self, class: &str) -> Vec<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.elements[id].has_class(class))
            .collect()
    }

    /// All elements with the given tag, in document order
    pub fn query_tag(&self, tag: &str) -> Vec<ElementId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|id| self.elements[id].tag == tag)
            .collect()
    }

    /// First descendant of `root` carrying `class`
    pub fn find_in(&self, root: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.elements[id].has_class(class))
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Walk up from `id` to the nearest ancestor (or self) with `tag`
    pub fn closest(&self, id: ElementId, tag: &str) -> Option<ElementId> {
        self.closest_where(id, |e| e.tag == tag)
    }

    /// `id` or its nearest ancestor matching `pred`
    pub fn closest_where(&self, id: ElementId, pred: impl Fn(&Element) -> bool) -> Option<ElementId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let element = self.elements.get(&current)?;
            if pred(element) {
                return Some(current);
            }
            cursor = element.parent;
        }
        None
    }

    /// Number of attached elements, body included
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        self.snapshot_of(self.body)
    }

    fn snapshot_of(&self, id: ElementId) -> NodeSnapshot {
        let e = &self.elements[&id];
        NodeSnapshot {
            tag: e.tag.clone(),
            key: e.key.clone(),
            classes: e.classes.clone(),
            style: e.style.clone(),
            data: e.data.clone(),
            text: e.text.clone(),
            value: e.value.clone(),
            disabled: e.disabled,
            children: e.children.iter().map(|c| self.snapshot_of(*c)).collect(),
        }
    }

    /// Pre-order descendants of `root`, excluding `root` itself
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self
            .children(root)
            .iter()
            .rev()
            .copied()
            .collect();

        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }
}
