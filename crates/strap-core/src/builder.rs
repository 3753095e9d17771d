//! Fluent construction of element subtrees.
//!
//! Hosts that mirror existing markup into a [`Document`] and tests that need
//! a page fixture both describe subtrees with [`ElementBuilder`] and attach
//! them with [`Document::mount`].
//!
//! # Example
//!
//! ```
//! use strap_core::builder::ElementBuilder as El;
//! use strap_core::dom::Document;
//!
//! let doc = Document::from_body([
//!     El::new("div").class("alert").child(El::new("button").class("btn-close")),
//! ]);
//! assert_eq!(doc.query_classes(&["btn-close"]).len(), 1);
//! ```

use crate::dom::{Document, ElementId, Rect};

/// Description of an element and its children, materialized by
/// [`Document::mount`].
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    text: String,
    rect: Option<Rect>,
    scroll_height: Option<f64>,
    children: Vec<ElementBuilder>,
}

impl ElementBuilder {
    /// Start describing an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            classes: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            rect: None,
            scroll_height: None,
            children: Vec::new(),
        }
    }

    /// Set the `id` attribute.
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Add one or more whitespace-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add an inline style declaration.
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.push((property.into(), value.into()));
        self
    }

    /// Set the element's own text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the host-reported bounding rectangle.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Set the host-reported natural content height.
    pub fn scroll_height(mut self, height: f64) -> Self {
        self.scroll_height = Some(height);
        self
    }

    /// Append a child.
    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn children(mut self, children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Document {
    /// Create a document whose body holds the given subtrees.
    pub fn from_body(children: impl IntoIterator<Item = ElementBuilder>) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        for child in children {
            doc.mount(root, child);
        }
        doc
    }

    /// Materialize `builder` and append it to `parent`. Returns the new
    /// subtree's top element.
    pub fn mount(&mut self, parent: ElementId, builder: ElementBuilder) -> ElementId {
        let id = self.build(builder);
        self.append_child(parent, id);
        id
    }

    /// Materialize `builder` as a detached subtree.
    pub fn build(&mut self, builder: ElementBuilder) -> ElementId {
        let id = self.create_element(&builder.tag);
        for (name, value) in &builder.attributes {
            self.set_attribute(id, name, value);
        }
        for class in &builder.classes {
            self.add_class(id, class);
        }
        for (property, value) in &builder.style {
            self.set_style(id, property, value);
        }
        if !builder.text.is_empty() {
            self.set_text(id, &builder.text);
        }
        if let Some(rect) = builder.rect {
            self.set_rect(id, rect);
        }
        if let Some(height) = builder.scroll_height {
            self.set_scroll_height(id, height);
        }
        for child in builder.children {
            let child_id = self.build(child);
            self.append_child(id, child_id);
        }
        id
    }
}
