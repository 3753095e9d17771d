//! Arena-backed element tree that stands in for the host render surface.
//!
//! Every behavior in strap reads and writes page state through a
//! [`Document`]: attributes, the class list, inline style declarations, and the
//! two geometry values a host reports (the bounding rectangle and the natural
//! content height). Elements are addressed by copyable [`ElementId`] handles.
//!
//! Removing an element detaches it from the tree but keeps it in the arena,
//! the same way a live page keeps a removed node alive for as long as a
//! scheduled callback still refers to it. Use [`Document::is_connected`] to
//! tell the two apart before mutating from a deferred callback.

use crate::selector::Selector;
use std::fmt::Write as _;

/// Handle to an element stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    /// Stable numeric form of the handle, usable as a subscription discriminant.
    pub fn to_bits(self) -> u64 {
        // usize is at most 64 bits on every supported target.
        self.0 as u64
    }

    fn index(self) -> usize {
        self.0
    }
}

/// An axis-aligned rectangle in page coordinates, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Distance from the left edge of the page.
    pub x: f64,
    /// Distance from the top edge of the page.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The top edge.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// The left edge.
    pub fn left(&self) -> f64 {
        self.x
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    text: String,
    rect: Rect,
    scroll_height: f64,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            classes: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            rect: Rect::default(),
            scroll_height: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// The element tree for one page.
///
/// The root element is the page body: page-level markers such as the
/// "overlay open" class are written to it, and page-wide queries only see
/// elements connected to it.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document whose root is a `body` element.
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            root: ElementId(0),
        }
    }

    /// The root (`body`) element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of elements ever created, attached or not.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.elements.len() == 1
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.index())
    }

    // --- Tree structure ---

    /// Create a detached element with the given tag name.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element::new(tag));
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// current parent first.
    ///
    /// Returns `false` without touching the tree when either handle is
    /// unknown, when `child` is the root, or when the move would create a
    /// cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() || child == self.root {
            return false;
        }
        if self.is_inclusive_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(el) = self.get_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
        true
    }

    /// Remove an element (and its subtree) from the tree.
    ///
    /// Returns `true` if the element was attached to a parent. Removing an
    /// already-detached element, the root, or an unknown handle is a no-op.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root {
            return false;
        }
        self.detach(id)
    }

    fn detach(&mut self, id: ElementId) -> bool {
        let Some(parent) = self.get(id).and_then(|el| el.parent) else {
            return false;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(el) = self.get_mut(id) {
            el.parent = None;
        }
        true
    }

    fn is_inclusive_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether the element is reachable from the root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.is_inclusive_ancestor(self.root, id)
    }

    /// The element's parent, if attached.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|el| el.parent)
    }

    /// The element's children in document order.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// The sibling immediately after this element.
    pub fn next_element_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|c| *c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// The sibling immediately before this element.
    pub fn previous_element_sibling(&self, id: ElementId) -> Option<ElementId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|c| *c == id)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    // --- Element data ---

    /// Lowercased tag name.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|el| el.tag.as_str())
    }

    /// Value of an attribute. The class list is not an attribute here; see
    /// [`Document::classes`].
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present (with any value).
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set or replace an attribute. Setting `class` replaces the class list.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        if name == "class" {
            el.classes = value.split_whitespace().map(str::to_string).collect();
            return;
        }
        match el.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: ElementId, name: &str) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        let before = el.attributes.len();
        el.attributes.retain(|(k, _)| k != name);
        el.attributes.len() != before
    }

    /// The class list in insertion order.
    pub fn classes(&self, id: ElementId) -> &[String] {
        self.get(id).map(|el| el.classes.as_slice()).unwrap_or(&[])
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    /// Add a class. Returns `true` if the class list changed.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            return false;
        }
        match self.get_mut(id) {
            Some(el) => {
                el.classes.push(class.to_string());
                true
            }
            None => false,
        }
    }

    /// Remove a class. Returns `true` if the class list changed.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        let Some(el) = self.get_mut(id) else {
            return false;
        };
        let before = el.classes.len();
        el.classes.retain(|c| c != class);
        el.classes.len() != before
    }

    /// Flip a class. Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.remove_class(id, class) {
            false
        } else {
            self.add_class(id, class)
        }
    }

    /// Inline style value for `property`.
    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.get(id)?
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style declaration.
    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        match el.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_string(),
            None => el.style.push((property.to_string(), value.to_string())),
        }
    }

    /// Remove an inline style declaration.
    pub fn remove_style(&mut self, id: ElementId, property: &str) {
        if let Some(el) = self.get_mut(id) {
            el.style.retain(|(k, _)| k != property);
        }
    }

    /// Text content owned directly by the element.
    pub fn text(&self, id: ElementId) -> &str {
        self.get(id).map(|el| el.text.as_str()).unwrap_or("")
    }

    /// Replace the element's own text.
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(el) = self.get_mut(id) {
            el.text = text.to_string();
        }
    }

    /// Bounding rectangle last reported by the host.
    pub fn rect(&self, id: ElementId) -> Rect {
        self.get(id).map(|el| el.rect).unwrap_or_default()
    }

    /// Record the element's bounding rectangle.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(el) = self.get_mut(id) {
            el.rect = rect;
        }
    }

    /// Natural height of the element's content, independent of any inline
    /// height currently applied.
    pub fn scroll_height(&self, id: ElementId) -> f64 {
        self.get(id).map(|el| el.scroll_height).unwrap_or(0.0)
    }

    /// Record the natural content height.
    pub fn set_scroll_height(&mut self, id: ElementId, height: f64) {
        if let Some(el) = self.get_mut(id) {
            el.scroll_height = height;
        }
    }

    // --- Queries ---

    /// Whether the element matches the selector.
    pub fn matches(&self, id: ElementId, selector: &Selector) -> bool {
        self.get(id).is_some() && selector.matches(self, id)
    }

    /// Nearest inclusive ancestor matching the selector.
    pub fn closest(&self, id: ElementId, selector: &Selector) -> Option<ElementId> {
        self.closest_by(id, |doc, el| selector.matches(doc, el))
    }

    /// Nearest inclusive ancestor satisfying `pred`.
    pub fn closest_by(
        &self,
        id: ElementId,
        pred: impl Fn(&Document, ElementId) -> bool,
    ) -> Option<ElementId> {
        self.get(id)?;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if pred(self, current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Nearest inclusive ancestor carrying `class`.
    pub fn closest_with_class(&self, id: ElementId, class: &str) -> Option<ElementId> {
        self.closest_by(id, |doc, el| doc.has_class(el, class))
    }

    /// First connected element matching the selector, in document order.
    pub fn query_selector(&self, selector: &Selector) -> Option<ElementId> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// Every connected element matching the selector, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.query_within(self.root, selector)
    }

    /// Descendants of `scope` matching the selector, in document order.
    pub fn query_within(&self, scope: ElementId, selector: &Selector) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|el| selector.matches(self, *el))
            .collect()
    }

    /// Descendants of `scope` carrying every class in `classes`.
    pub fn query_classes_within(&self, scope: ElementId, classes: &[&str]) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|el| classes.iter().all(|c| self.has_class(*el, c)))
            .collect()
    }

    /// Connected elements carrying every class in `classes`.
    pub fn query_classes(&self, classes: &[&str]) -> Vec<ElementId> {
        self.query_classes_within(self.root, classes)
    }

    // --- Serialization ---

    /// Serialize the element and its subtree as markup, for diagnostics.
    pub fn outer_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: ElementId, out: &mut String) {
        let Some(el) = self.get(id) else {
            return;
        };
        let _ = write!(out, "<{}", el.tag);
        for (name, value) in &el.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
        }
        if !el.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape_attr(&el.classes.join(" ")));
        }
        if !el.style.is_empty() {
            let decls: Vec<String> = el.style.iter().map(|(k, v)| format!("{k}: {v};")).collect();
            let _ = write!(out, " style=\"{}\"", escape_attr(&decls.join(" ")));
        }
        out.push('>');
        out.push_str(&escape_text(&el.text));
        for child in &el.children {
            self.write_html(*child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let list = doc.create_element("ul");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        doc.append_child(doc.root(), list);
        doc.append_child(list, a);
        doc.append_child(list, b);
        (doc, list, a, b)
    }

    #[test]
    fn new_document_has_body_root() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("body"));
        assert!(doc.is_connected(doc.root()));
        assert!(doc.is_empty());
    }

    #[test]
    fn created_elements_start_detached() {
        let mut doc = Document::new();
        let div = doc.create_element("DIV");
        assert_eq!(doc.tag(div), Some("div"));
        assert!(!doc.is_connected(div));
    }

    #[test]
    fn handles_number_the_arena_in_creation_order() {
        let mut doc = Document::new();
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        assert_eq!(doc.root().to_bits(), 0);
        assert_eq!(a.to_bits(), 1);
        assert_eq!(b.to_bits(), 2);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn siblings_follow_document_order() {
        let (doc, _, a, b) = tree();
        assert_eq!(doc.next_element_sibling(a), Some(b));
        assert_eq!(doc.next_element_sibling(b), None);
        assert_eq!(doc.previous_element_sibling(b), Some(a));
        assert_eq!(doc.previous_element_sibling(a), None);
    }

    #[test]
    fn remove_detaches_subtree() {
        let (mut doc, list, a, _) = tree();
        assert!(doc.remove(list));
        assert!(!doc.is_connected(list));
        assert!(!doc.is_connected(a));
        // The subtree itself stays intact.
        assert_eq!(doc.parent(a), Some(list));
    }

    #[test]
    fn remove_twice_is_noop() {
        let (mut doc, _, a, _) = tree();
        assert!(doc.remove(a));
        assert!(!doc.remove(a));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut doc = Document::new();
        let root = doc.root();
        assert!(!doc.remove(root));
        assert!(doc.is_connected(root));
    }

    #[test]
    fn append_rejects_cycles() {
        let (mut doc, list, a, _) = tree();
        assert!(!doc.append_child(a, list));
        assert_eq!(doc.parent(list), Some(doc.root()));
    }

    #[test]
    fn append_moves_between_parents() {
        let (mut doc, list, a, b) = tree();
        assert!(doc.append_child(b, a));
        assert_eq!(doc.children(list), &[b]);
        assert_eq!(doc.parent(a), Some(b));
    }

    #[test]
    fn class_operations_are_idempotent() {
        let (mut doc, _, a, _) = tree();
        assert!(doc.add_class(a, "active"));
        assert!(!doc.add_class(a, "active"));
        assert_eq!(doc.classes(a).len(), 1);
        assert!(doc.remove_class(a, "active"));
        assert!(!doc.remove_class(a, "active"));
    }

    #[test]
    fn toggle_class_reports_new_state() {
        let (mut doc, _, a, _) = tree();
        assert!(doc.toggle_class(a, "show"));
        assert!(doc.has_class(a, "show"));
        assert!(!doc.toggle_class(a, "show"));
        assert!(!doc.has_class(a, "show"));
    }

    #[test]
    fn setting_class_attribute_replaces_list() {
        let (mut doc, _, a, _) = tree();
        doc.add_class(a, "old");
        doc.set_attribute(a, "class", "nav-link  active");
        assert_eq!(doc.classes(a), &["nav-link".to_string(), "active".to_string()]);
        assert_eq!(doc.attribute(a, "class"), None);
    }

    #[test]
    fn attributes_and_styles_replace_in_place() {
        let (mut doc, _, a, _) = tree();
        doc.set_attribute(a, "data-target", "#x");
        doc.set_attribute(a, "data-target", "#y");
        assert_eq!(doc.attribute(a, "data-target"), Some("#y"));
        assert!(doc.remove_attribute(a, "data-target"));
        assert!(!doc.has_attribute(a, "data-target"));

        doc.set_style(a, "height", "0px");
        doc.set_style(a, "height", "40px");
        assert_eq!(doc.style(a, "height"), Some("40px"));
        doc.remove_style(a, "height");
        assert_eq!(doc.style(a, "height"), None);
    }

    #[test]
    fn descendants_are_preorder() {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        let leaf = doc.create_element("span");
        let tail = doc.create_element("p");
        doc.append_child(doc.root(), outer);
        doc.append_child(outer, inner);
        doc.append_child(inner, leaf);
        doc.append_child(outer, tail);
        assert_eq!(doc.descendants(doc.root()), vec![outer, inner, leaf, tail]);
    }

    #[test]
    fn closest_with_class_is_inclusive() {
        let (mut doc, list, a, _) = tree();
        doc.add_class(list, "nav");
        doc.add_class(a, "nav");
        assert_eq!(doc.closest_with_class(a, "nav"), Some(a));
        doc.remove_class(a, "nav");
        assert_eq!(doc.closest_with_class(a, "nav"), Some(list));
    }

    #[test]
    fn page_queries_skip_detached_elements() {
        let (mut doc, _, a, b) = tree();
        doc.add_class(a, "item");
        doc.add_class(b, "item");
        doc.remove(b);
        assert_eq!(doc.query_classes(&["item"]), vec![a]);
    }

    #[test]
    fn outer_html_serializes_subtree() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "id", "box");
        doc.add_class(div, "alert");
        doc.set_style(div, "opacity", "0");
        doc.set_text(div, "a < b");
        doc.append_child(doc.root(), div);
        assert_eq!(
            doc.outer_html(div),
            "<div id=\"box\" class=\"alert\" style=\"opacity: 0;\">a &lt; b</div>"
        );
    }
}
