//! Rotating slide groups.
//!
//! Groups come from an explicit discovery pass ([`CarouselRegistry::scan`])
//! over every `.carousel` on the page. Each descriptor records the group's
//! slides, indicator buttons and current index; the registry turns
//! auto-playing groups into repeating timer subscriptions.
//!
//! A group whose root leaves the tree keeps its descriptor and its timer
//! until the next scan or [`CarouselRegistry::release_detached`]; its ticks
//! find the root detached and do nothing.

use std::time::Duration;
use strap_core::directive::{indicator_buttons, SlideControl};
use strap_core::dom::{Document, ElementId};
use strap_core::toggle::{set_state, ACTIVE};
use strap_core::{Subscription, SubscriptionId, Vocabulary};

/// Descriptor of one slide group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideGroup {
    root: ElementId,
    items: Vec<ElementId>,
    indicators: Vec<ElementId>,
    current: usize,
    autoplay: bool,
    pause_on_hover: bool,
    paused: bool,
}

impl SlideGroup {
    fn discover(doc: &Document, vocab: &Vocabulary, root: ElementId) -> Self {
        let items = doc.query_classes_within(root, &["carousel-item"]);
        let indicators = doc
            .query_classes_within(root, &["carousel-indicators"])
            .into_iter()
            .flat_map(|strip| indicator_buttons(doc, strip))
            .collect();
        let current = items
            .iter()
            .position(|&item| doc.has_class(item, ACTIVE))
            .unwrap_or(0);
        Self {
            root,
            items,
            indicators,
            current,
            autoplay: vocab.rides(doc, root),
            pause_on_hover: vocab.pauses_on_hover(doc, root),
            paused: false,
        }
    }

    /// The `.carousel` element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Slides in document order.
    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    /// Index of the shown slide.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the group has no slides.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the group declares auto-play.
    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Whether the group declares pause-on-hover.
    pub fn pauses_on_hover(&self) -> bool {
        self.pause_on_hover
    }

    /// Whether auto-play is suspended.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether an auto-play timer should be running.
    pub fn is_ticking(&self) -> bool {
        self.autoplay && !self.paused && !self.items.is_empty()
    }

    fn show(&mut self, doc: &mut Document, index: usize) -> bool {
        if index >= self.items.len() {
            tracing::trace!(root = self.root.to_bits(), index, len = self.items.len(), "slide index out of range");
            return false;
        }
        for (i, &item) in self.items.iter().enumerate() {
            set_state(doc, item, &[ACTIVE], i == index);
        }
        for (i, &indicator) in self.indicators.iter().enumerate() {
            set_state(doc, indicator, &[ACTIVE], i == index);
        }
        self.current = index;
        tracing::debug!(root = self.root.to_bits(), index, "slide shown");
        true
    }

    fn step(&mut self, doc: &mut Document, control: SlideControl) -> bool {
        let len = self.items.len();
        if len == 0 {
            return false;
        }
        let index = match control {
            SlideControl::Next => (self.current + 1) % len,
            SlideControl::Prev => {
                if self.current == 0 {
                    len - 1
                } else {
                    self.current - 1
                }
            }
            SlideControl::To(index) => index,
        };
        self.show(doc, index)
    }
}

/// All discovered slide groups.
#[derive(Debug, Clone, Default)]
pub struct CarouselRegistry {
    groups: Vec<SlideGroup>,
}

impl CarouselRegistry {
    /// Discover every `.carousel` on the page.
    ///
    /// Every attached group is re-derived from the markup (its current index
    /// is the slide carrying `active`, else 0) and normalized so exactly one
    /// slide is active. Groups seen before keep their paused flag. Groups
    /// whose root has left the tree are dropped. Returns the number of groups.
    pub fn scan(&mut self, doc: &mut Document, vocab: &Vocabulary) -> usize {
        let roots = doc.query_classes(&["carousel"]);
        let previous = std::mem::take(&mut self.groups);
        for root in roots {
            let mut group = SlideGroup::discover(doc, vocab, root);
            if let Some(old) = previous.iter().find(|g| g.root == root) {
                group.paused = old.paused;
            }
            if !group.is_empty() {
                let current = group.current;
                group.show(doc, current);
            }
            self.groups.push(group);
        }
        let dropped = previous
            .iter()
            .filter(|old| !self.groups.iter().any(|g| g.root == old.root))
            .count();
        tracing::debug!(groups = self.groups.len(), dropped, "carousels scanned");
        self.groups.len()
    }

    /// The group rooted at `root`.
    pub fn get(&self, root: ElementId) -> Option<&SlideGroup> {
        self.groups.iter().find(|g| g.root == root)
    }

    fn get_mut(&mut self, root: ElementId) -> Option<&mut SlideGroup> {
        let found = self.groups.iter_mut().find(|g| g.root == root);
        if found.is_none() {
            tracing::trace!(root = root.to_bits(), "no slide group registered");
        }
        found
    }

    /// Number of registered groups, attached or not.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Registered groups in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &SlideGroup> {
        self.groups.iter()
    }

    /// Show slide `index` of the group at `root`. Out-of-range indices and
    /// unknown groups are no-ops.
    pub fn show_slide(&mut self, doc: &mut Document, root: ElementId, index: usize) -> bool {
        self.control(doc, root, SlideControl::To(index))
    }

    /// Advance the group at `root`, wrapping to the first slide.
    pub fn next_slide(&mut self, doc: &mut Document, root: ElementId) -> bool {
        self.control(doc, root, SlideControl::Next)
    }

    /// Step the group at `root` back, wrapping to the last slide.
    pub fn prev_slide(&mut self, doc: &mut Document, root: ElementId) -> bool {
        self.control(doc, root, SlideControl::Prev)
    }

    /// Apply an explicit control to the group at `root`.
    pub fn control(&mut self, doc: &mut Document, root: ElementId, control: SlideControl) -> bool {
        self.get_mut(root)
            .is_some_and(|group| group.step(doc, control))
    }

    /// One auto-play tick. Does nothing when the group's root has left the
    /// tree or the group is paused.
    pub fn auto_advance(&mut self, doc: &mut Document, root: ElementId) -> bool {
        if !doc.is_connected(root) {
            tracing::trace!(root = root.to_bits(), "tick for detached slide group");
            return false;
        }
        match self.get_mut(root) {
            Some(group) if !group.paused => group.step(doc, SlideControl::Next),
            _ => false,
        }
    }

    /// Suspend auto-play for the group at `root`.
    pub fn pause(&mut self, root: ElementId) -> bool {
        self.set_paused(root, true)
    }

    /// Restart auto-play for the group at `root`; the next tick comes one
    /// full interval later.
    pub fn resume(&mut self, root: ElementId) -> bool {
        self.set_paused(root, false)
    }

    fn set_paused(&mut self, root: ElementId, paused: bool) -> bool {
        match self.get_mut(root) {
            Some(group) if group.paused != paused => {
                group.paused = paused;
                tracing::debug!(root = root.to_bits(), paused, "slide group auto-play");
                true
            }
            _ => false,
        }
    }

    /// Drop groups whose root has left the tree, stopping their timers.
    /// Returns how many were dropped.
    pub fn release_detached(&mut self, doc: &Document) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| doc.is_connected(g.root));
        let released = before - self.groups.len();
        if released > 0 {
            tracing::debug!(released, "released detached slide groups");
        }
        released
    }

    /// One auto-play timer per ticking group, producing the group's root.
    pub fn subscriptions(&self, interval: Duration) -> Vec<Subscription<ElementId>> {
        self.groups
            .iter()
            .filter(|g| g.is_ticking())
            .map(|g| {
                let root = g.root;
                Subscription::every(
                    SubscriptionId::new::<SlideGroup>(root.to_bits()),
                    interval,
                    move || root,
                )
            })
            .collect()
    }
}
