//! In-memory [`Document`] implementation.
//!
//! Elements form a tree of stable [`ElementId`]s. Markup written into an
//! element is parsed with `scraper` and becomes real child elements, so a
//! later update can target anything an earlier one injected. Selectors are
//! matched by `scraper` against a serialized snapshot of the tree.
//!
//! Structure the HTML parser rewrites (a `tr` outside a table, a `div`
//! inside a `p`) is matched the way a browser would see it.

use scraper::{ElementRef, Html, Selector};
use splice_core::{Document, ElementEvent, ElementId, FieldValue, FileData};
use std::sync::{Mutex, PoisonError, RwLock};

/// Marks elements in a snapshot so matches map back to ids.
const NODE_ATTR: &str = "data-splice-node";

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title"];

/// Description of an element to insert.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    html: Option<String>,
    value: Option<FieldValue>,
    valid: bool,
}

impl Element {
    /// Start describing an element with the given tag.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            valid: true,
            ..Self::default()
        }
    }

    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        set_attr(&mut self.attributes, name, value);
        self
    }

    /// Shorthand for the `id` attribute.
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Shorthand for the `class` attribute.
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// Initial inner HTML, parsed into child elements on insert.
    pub fn html(mut self, html: &str) -> Self {
        self.html = Some(html.to_owned());
        self
    }

    /// The current value of a form control.
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(FieldValue::Text(value.to_owned()));
        self
    }

    /// A selected file for a file input.
    pub fn file(mut self, file: FileData) -> Self {
        self.value = Some(FieldValue::File(file));
        self
    }

    /// Mark the control as failing a custom validity check.
    pub fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }
}

fn set_attr(attributes: &mut Vec<(String, String)>, name: &str, value: &str) {
    let name = name.to_ascii_lowercase();
    attributes.retain(|(key, _)| *key != name);
    attributes.push((name, value.to_owned()));
}

#[derive(Debug, Clone)]
enum Child {
    Element(ElementId),
    Text(String),
}

#[derive(Debug)]
struct Node {
    tag: String,
    attributes: Vec<(String, String)>,
    value: Option<FieldValue>,
    valid: bool,
    parent: Option<ElementId>,
    children: Vec<Child>,
    attached: bool,
}

impl Node {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn is_field(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea" | "button")
    }

    fn field_value(&self) -> FieldValue {
        self.value
            .clone()
            .or_else(|| self.attr("value").map(FieldValue::from))
            .unwrap_or_else(|| FieldValue::Text(String::new()))
    }

    fn is_successful(&self) -> bool {
        if !self.is_field() || self.tag == "button" {
            return false;
        }
        if self.attr("name").is_none() || self.attr("disabled").is_some() {
            return false;
        }
        match self.attr("type") {
            Some("checkbox" | "radio") => self.attr("checked").is_some(),
            Some("submit" | "button" | "reset") => false,
            _ => true,
        }
    }

    fn is_valid(&self) -> bool {
        if !self.valid {
            return false;
        }
        if self.attr("required").is_none() {
            return true;
        }
        match self.field_value() {
            FieldValue::Text(text) => !text.is_empty(),
            FieldValue::File(_) => true,
        }
    }
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).filter(|node| node.attached)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).filter(|node| node.attached)
    }

    fn push(
        &mut self,
        parent: Option<ElementId>,
        tag: &str,
        attributes: Vec<(String, String)>,
    ) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        let parent = parent.filter(|p| self.node(*p).is_some());
        self.nodes.push(Node {
            tag: tag.to_owned(),
            attributes,
            value: None,
            valid: true,
            parent,
            children: Vec::new(),
            attached: true,
        });
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.push(Child::Element(id));
        }
        id
    }

    fn push_text(&mut self, parent: ElementId, text: &str) {
        let Some(node) = self.node_mut(parent) else {
            return;
        };
        match node.children.last_mut() {
            Some(Child::Text(last)) => last.push_str(text),
            _ => node.children.push(Child::Text(text.to_owned())),
        }
    }

    fn append_html(&mut self, parent: ElementId, html: &str) {
        let fragment = Html::parse_fragment(html);
        self.import(parent, fragment.root_element());
    }

    fn import(&mut self, parent: ElementId, source: ElementRef<'_>) {
        for child in source.children() {
            match child.value() {
                scraper::Node::Text(text) => self.push_text(parent, text),
                scraper::Node::Element(element) => {
                    let attributes = element
                        .attrs()
                        .map(|(name, value)| (name.to_owned(), value.to_owned()))
                        .collect();
                    let id = self.push(Some(parent), element.name(), attributes);
                    if let Some(element) = ElementRef::wrap(child) {
                        self.import(id, element);
                    }
                }
                _ => {}
            }
        }
    }

    fn child_elements(&self, id: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .filter_map(|child| match child {
                Child::Element(id) => Some(*id),
                Child::Text(_) => None,
            })
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.child_elements(root).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            if self.node(id).is_some() {
                out.push(id);
                let first = stack.len();
                stack.extend(self.child_elements(id));
                stack[first..].reverse();
            }
        }
        out
    }

    fn detach_children(&mut self, id: ElementId) {
        let children = self
            .nodes
            .get_mut(id.0 as usize)
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            if let Child::Element(child) = child {
                self.detach_children(child);
                if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                    node.attached = false;
                }
            }
        }
    }

    fn roots(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.attached && node.parent.is_none())
            .map(|(index, _)| ElementId(index as u32))
    }

    /// Serialize the children of `id`. With `tagged`, every element carries
    /// its id in [`NODE_ATTR`].
    fn write_children(&self, id: ElementId, tagged: bool, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        let raw = RAW_TEXT_TAGS.contains(&node.tag.as_str());
        for child in &node.children {
            match child {
                Child::Text(text) if raw => out.push_str(text),
                Child::Text(text) => escape_into(text, false, out),
                Child::Element(child) => self.write_element(*child, tagged, out),
            }
        }
    }

    fn write_element(&self, id: ElementId, tagged: bool, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        out.push('<');
        out.push_str(&node.tag);
        for (name, value) in &node.attributes {
            if tagged && name == NODE_ATTR {
                continue;
            }
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        if tagged {
            out.push_str(&format!(" {NODE_ATTR}=\"{}\"", id.0));
        }
        out.push('>');
        if VOID_TAGS.contains(&node.tag.as_str()) {
            return;
        }
        self.write_children(id, tagged, out);
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// A thread-safe in-memory document.
///
/// Every dispatched [`ElementEvent`] is recorded and can be inspected with
/// [`MemoryDocument::events`].
#[derive(Debug, Default)]
pub struct MemoryDocument {
    tree: RwLock<Tree>,
    events: Mutex<Vec<(ElementId, ElementEvent)>>,
    validity_reports: Mutex<Vec<ElementId>>,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element, as a root or as the last child of `parent`.
    pub fn insert(&self, parent: Option<ElementId>, element: Element) -> ElementId {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        let id = tree.push(parent, &element.tag, element.attributes);
        if let Some(node) = tree.node_mut(id) {
            node.value = element.value;
            node.valid = element.valid;
        }
        if let Some(html) = &element.html {
            tree.append_html(id, html);
        }
        id
    }

    /// Set or replace an attribute on an existing element.
    pub fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(node) = tree.node_mut(element) {
            set_attr(&mut node.attributes, name, value);
        }
    }

    /// Set the value of a form control.
    pub fn set_value(&self, element: ElementId, value: FieldValue) {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(node) = tree.node_mut(element) {
            node.value = Some(value);
        }
    }

    /// Inner HTML of the first element matching `selector`.
    pub fn html_of(&self, selector: &str) -> Option<String> {
        self.select(selector)
            .first()
            .and_then(|id| self.inner_html(*id))
    }

    /// Events dispatched so far, in order.
    pub fn events(&self) -> Vec<(ElementId, ElementEvent)> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events dispatched on one element, in order.
    pub fn events_on(&self, element: ElementId) -> Vec<ElementEvent> {
        self.events()
            .into_iter()
            .filter(|(target, _)| *target == element)
            .map(|(_, event)| event)
            .collect()
    }

    /// Forms whose validity UI was shown.
    pub fn validity_reports(&self) -> Vec<ElementId> {
        self.validity_reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn snapshot(&self) -> String {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        let mut markup = String::new();
        for root in tree.roots() {
            tree.write_element(root, true, &mut markup);
        }
        markup
    }
}

impl Document for MemoryDocument {
    fn contains(&self, element: ElementId) -> bool {
        self.tree
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .node(element)
            .is_some()
    }

    fn select(&self, selector: &str) -> Vec<ElementId> {
        let Ok(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        let html = Html::parse_document(&self.snapshot());
        html.select(&selector)
            .filter_map(|element| element.value().attr(NODE_ATTR))
            .filter_map(|id| id.parse().ok())
            .map(ElementId)
            .collect()
    }

    fn inner_html(&self, element: ElementId) -> Option<String> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        tree.node(element)?;
        let mut out = String::new();
        tree.write_children(element, false, &mut out);
        Some(out)
    }

    fn set_inner_html(&self, element: ElementId, html: &str) {
        let mut tree = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        if tree.node(element).is_none() {
            return;
        }
        tree.detach_children(element);
        tree.append_html(element, html);
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        tree.node(element)
            .and_then(|node| node.attr(&name.to_ascii_lowercase()))
            .map(str::to_owned)
    }

    fn closest_form(&self, element: ElementId) -> Option<ElementId> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        let mut current = Some(element);
        while let Some(id) = current {
            let node = tree.node(id)?;
            if node.tag == "form" {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    fn form_fields(&self, form: ElementId) -> Vec<(String, FieldValue)> {
        let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
        tree.descendants(form)
            .into_iter()
            .filter_map(|id| tree.node(id))
            .filter(|node| node.is_successful())
            .filter_map(|node| Some((node.attr("name")?.to_owned(), node.field_value())))
            .collect()
    }

    fn check_validity(&self, form: ElementId) -> bool {
        let valid = {
            let tree = self.tree.read().unwrap_or_else(PoisonError::into_inner);
            tree.descendants(form)
                .into_iter()
                .filter_map(|id| tree.node(id))
                .filter(|node| node.is_field())
                .all(Node::is_valid)
        };
        if !valid {
            self.validity_reports
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(form);
        }
        valid
    }

    fn dispatch_event(&self, element: ElementId, event: ElementEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((element, event));
    }
}
