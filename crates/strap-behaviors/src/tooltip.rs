//! Hover tooltips.
//!
//! A tooltip is an element appended to the page root while the pointer is
//! over its activator. Each activator owns at most one tooltip element: leaving
//! detaches it and the next hover re-attaches the same element, so hover
//! traffic does not grow the document.

use std::collections::HashMap;
use strap_core::builder::ElementBuilder;
use strap_core::dom::{Document, ElementId};
use strap_core::Vocabulary;

/// Gap between the tooltip's bottom edge and the activator's top edge.
const OFFSET: f64 = 5.0;
const Z_INDEX: &str = "1070";

#[derive(Debug, Clone, Copy)]
struct Tip {
    root: ElementId,
    inner: ElementId,
}

/// Tooltips keyed by activator.
#[derive(Debug, Clone, Default)]
pub struct TooltipTable {
    live: HashMap<ElementId, Tip>,
    // Detached tooltips kept for the activator's next hover.
    parked: HashMap<ElementId, Tip>,
}

impl TooltipTable {
    /// Show a tooltip for `activator`. Returns the tooltip element.
    ///
    /// Without a title nothing is created. A second call while the tooltip is
    /// live returns the existing one.
    pub fn show(
        &mut self,
        doc: &mut Document,
        vocab: &Vocabulary,
        activator: ElementId,
    ) -> Option<ElementId> {
        if let Some(tip) = self.live.get(&activator) {
            if doc.is_connected(tip.root) {
                return Some(tip.root);
            }
        }
        let Some(title) = vocab.title_of(doc, activator).map(str::to_owned) else {
            tracing::trace!(activator = activator.to_bits(), "tooltip without title");
            return None;
        };

        let root = doc.root();
        let tip = match self.parked.remove(&activator).or_else(|| self.live.remove(&activator)) {
            Some(tip) => {
                doc.append_child(root, tip.root);
                doc.set_text(tip.inner, &title);
                tip
            }
            None => {
                let tip = doc.mount(
                    root,
                    ElementBuilder::new("div")
                        .class("tooltip fade show bs-tooltip-top")
                        .attr("role", "tooltip")
                        .child(ElementBuilder::new("div").class("tooltip-arrow")),
                );
                let inner = doc.build(ElementBuilder::new("div").class("tooltip-inner").text(title));
                doc.append_child(tip, inner);
                Tip { root: tip, inner }
            }
        };
        position(doc, activator, tip.root);
        self.live.insert(activator, tip);
        tracing::debug!(
            activator = activator.to_bits(),
            tip = tip.root.to_bits(),
            "tooltip shown"
        );
        Some(tip.root)
    }

    /// Take down the tooltip of `activator`, if any.
    pub fn hide(&mut self, doc: &mut Document, activator: ElementId) -> bool {
        match self.live.remove(&activator) {
            Some(tip) => {
                doc.remove(tip.root);
                self.parked.insert(activator, tip);
                tracing::debug!(activator = activator.to_bits(), "tooltip hidden");
                true
            }
            None => false,
        }
    }

    /// Drop tooltips whose activator has left the tree. Returns how many
    /// were showing.
    pub fn prune(&mut self, doc: &mut Document) -> usize {
        let stale: Vec<_> = self
            .live
            .keys()
            .copied()
            .filter(|&activator| !doc.is_connected(activator))
            .collect();
        for activator in &stale {
            self.hide(doc, *activator);
        }
        self.parked.retain(|&activator, _| doc.is_connected(activator));
        stale.len()
    }

    /// The live tooltip of `activator`.
    pub fn get(&self, activator: ElementId) -> Option<ElementId> {
        self.live.get(&activator).map(|tip| tip.root)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

fn position(doc: &mut Document, activator: ElementId, tip: ElementId) {
    let anchor = doc.rect(activator);
    let size = doc.rect(tip);
    let top = anchor.top() - size.height - OFFSET;
    let left = anchor.left() + (anchor.width - size.width) / 2.0;
    doc.set_style(tip, "position", "absolute");
    doc.set_style(tip, "top", &format!("{top}px"));
    doc.set_style(tip, "left", &format!("{left}px"));
    doc.set_style(tip, "z-index", Z_INDEX);
}
