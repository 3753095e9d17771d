//! Attribute directive reader.
//!
//! A directive is an attribute-encoded declaration of which behavior an
//! element triggers and on which target. [`read`] walks from an interaction's
//! origin towards the root, stops at the nearest element carrying a directive
//! recognized for the interaction's category, and resolves its target:
//!
//! 1. the explicit target reference, if present and resolvable;
//! 2. otherwise a structurally related element (closest container, next
//!    sibling, `href` fragment) depending on the directive;
//! 3. otherwise nothing, and the interaction is a no-op.
//!
//! Reading never mutates the document and never fails loudly.

use crate::dom::{Document, ElementId};
use crate::event::{EventKind, Interaction};
use crate::selector::Selector;

/// Names of the attributes the reader consults.
///
/// The page author surface is attributes only; the host picks which family
/// of names its markup uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Declares the behavior kind (`dismiss`, `modal`, `dropdown`, ...).
    pub toggle: String,
    /// Explicit target selector.
    pub target: String,
    /// `carousel` turns on auto-play for a slide group.
    pub ride: String,
    /// `alert` or `modal` on a close button.
    pub dismiss: String,
    /// Tooltip text when `title` is absent.
    pub title: String,
    /// `prev` or `next` on a slide control.
    pub slide: String,
    /// Zero-based slide index on an indicator.
    pub slide_to: String,
    /// `hover` pauses auto-play while the pointer is over the group.
    pub pause: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            toggle: "data-toggle-kind".into(),
            target: "data-target".into(),
            ride: "data-ride".into(),
            dismiss: "data-dismiss".into(),
            title: "data-title".into(),
            slide: "data-slide".into(),
            slide_to: "data-slide-to".into(),
            pause: "data-pause".into(),
        }
    }
}

impl Vocabulary {
    /// The `data-bs-*` attribute family used by legacy markup.
    pub fn bootstrap() -> Self {
        Self {
            toggle: "data-bs-toggle".into(),
            target: "data-bs-target".into(),
            ride: "data-bs-ride".into(),
            dismiss: "data-bs-dismiss".into(),
            title: "data-bs-title".into(),
            slide: "data-bs-slide".into(),
            slide_to: "data-bs-slide-to".into(),
            pause: "data-bs-pause".into(),
        }
    }

    /// Whether `id` declares the toggle kind `value`.
    pub fn toggles(&self, doc: &Document, id: ElementId, value: &str) -> bool {
        doc.attribute(id, &self.toggle) == Some(value)
    }

    /// Whether the slide group `id` auto-plays.
    pub fn rides(&self, doc: &Document, id: ElementId) -> bool {
        doc.attribute(id, &self.ride) == Some("carousel")
    }

    /// Whether the slide group `id` pauses on hover.
    pub fn pauses_on_hover(&self, doc: &Document, id: ElementId) -> bool {
        doc.attribute(id, &self.pause) == Some("hover")
    }

    /// Tooltip text for `id`: `title`, else the vocabulary's title attribute.
    /// Empty values count as absent.
    pub fn title_of<'a>(&self, doc: &'a Document, id: ElementId) -> Option<&'a str> {
        doc.attribute(id, "title")
            .filter(|t| !t.is_empty())
            .or_else(|| doc.attribute(id, &self.title).filter(|t| !t.is_empty()))
    }
}

/// Explicit slide movement requested by a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideControl {
    /// One step back, wrapping to the last slide.
    Prev,
    /// One step forward, wrapping to the first slide.
    Next,
    /// Jump to a zero-based index.
    To(usize),
}

/// The behavior a directive triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Fade out and remove a panel.
    Dismiss,
    /// Show an overlay dialog.
    OpenOverlay,
    /// Hide an overlay dialog.
    CloseOverlay,
    /// Flip a popup menu.
    ToggleMenu,
    /// Expand or collapse a region.
    ToggleCollapse,
    /// Activate a tab and its pane.
    SwitchTab,
    /// Move a slide group.
    ControlSlide(SlideControl),
    /// Show a tooltip for the activator.
    ShowTooltip,
    /// Hide the activator's tooltip.
    HideTooltip,
    /// Suspend a slide group's auto-play.
    PauseSlides,
    /// Restart a slide group's auto-play.
    ResumeSlides,
    /// Run constraint validation on a form.
    ValidateForm,
}

/// A recognized directive with its resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// The element carrying (or inheriting) the directive.
    pub activator: ElementId,
    /// The element the effect applies to.
    pub target: ElementId,
}

/// Read the directive for `interaction`, if any.
///
/// Only the nearest recognized element counts: when its target does not
/// resolve the result is `None`, even if an ancestor declares something else.
pub fn read(doc: &Document, vocab: &Vocabulary, interaction: Interaction) -> Option<Directive> {
    let origin = interaction.origin;
    if !doc.is_connected(origin) {
        tracing::trace!(origin = origin.to_bits(), "interaction on detached element");
        return None;
    }

    let (activator, kind) = nearest(doc, origin, |el| match interaction.kind {
        EventKind::Click => click_kind(doc, vocab, el, el == origin),
        EventKind::MouseEnter => hover_kind(doc, vocab, el, true),
        EventKind::MouseLeave => hover_kind(doc, vocab, el, false),
        EventKind::Submit => submit_kind(doc, el),
    })?;

    match resolve(doc, vocab, activator, kind) {
        Some(target) => Some(Directive {
            kind,
            activator,
            target,
        }),
        None => {
            tracing::trace!(?kind, activator = activator.to_bits(), "directive target did not resolve");
            None
        }
    }
}

/// Resolve a target reference as a page-wide selector query.
///
/// Unparseable references resolve to nothing.
pub fn resolve_reference(doc: &Document, reference: &str) -> Option<ElementId> {
    match Selector::parse(reference) {
        Ok(selector) => doc.query_selector(&selector),
        Err(err) => {
            tracing::trace!(reference, error = %err, "ignoring unparseable target reference");
            None
        }
    }
}

fn nearest<T>(
    doc: &Document,
    origin: ElementId,
    mut recognize: impl FnMut(ElementId) -> Option<T>,
) -> Option<(ElementId, T)> {
    let mut current = Some(origin);
    while let Some(el) = current {
        if let Some(found) = recognize(el) {
            return Some((el, found));
        }
        current = doc.parent(el);
    }
    None
}

fn click_kind(
    doc: &Document,
    vocab: &Vocabulary,
    el: ElementId,
    is_origin: bool,
) -> Option<DirectiveKind> {
    match doc.attribute(el, &vocab.dismiss) {
        Some("alert") => return Some(DirectiveKind::Dismiss),
        Some("modal") => return Some(DirectiveKind::CloseOverlay),
        _ => {}
    }
    match doc.attribute(el, &vocab.toggle) {
        Some("dismiss") => return Some(DirectiveKind::Dismiss),
        Some("modal") => return Some(DirectiveKind::OpenOverlay),
        Some("dropdown") => return Some(DirectiveKind::ToggleMenu),
        Some("collapse") => return Some(DirectiveKind::ToggleCollapse),
        Some("tab") | Some("pill") => return Some(DirectiveKind::SwitchTab),
        _ => {}
    }
    if let Some(control) = slide_control(doc, vocab, el) {
        return Some(DirectiveKind::ControlSlide(control));
    }
    if doc.has_class(el, "btn-close") {
        return Some(DirectiveKind::Dismiss);
    }
    if is_origin && doc.has_class(el, "modal-backdrop") {
        return Some(DirectiveKind::CloseOverlay);
    }
    None
}

fn slide_control(doc: &Document, vocab: &Vocabulary, el: ElementId) -> Option<SlideControl> {
    if let Some(index) = doc
        .attribute(el, &vocab.slide_to)
        .and_then(|v| v.trim().parse::<usize>().ok())
    {
        return Some(SlideControl::To(index));
    }
    match doc.attribute(el, &vocab.slide) {
        Some("prev") => return Some(SlideControl::Prev),
        Some("next") => return Some(SlideControl::Next),
        _ => {}
    }
    if doc.has_class(el, "carousel-control-prev") {
        return Some(SlideControl::Prev);
    }
    if doc.has_class(el, "carousel-control-next") {
        return Some(SlideControl::Next);
    }
    if doc.tag(el) == Some("button") {
        let indicators = doc
            .parent(el)
            .and_then(|p| doc.closest_with_class(p, "carousel-indicators"))?;
        let index = indicator_buttons(doc, indicators)
            .iter()
            .position(|&b| b == el)?;
        return Some(SlideControl::To(index));
    }
    None
}

/// The indicator buttons inside an indicator strip, in document order.
pub fn indicator_buttons(doc: &Document, strip: ElementId) -> Vec<ElementId> {
    doc.descendants(strip)
        .into_iter()
        .filter(|&d| doc.tag(d) == Some("button"))
        .collect()
}

fn hover_kind(
    doc: &Document,
    vocab: &Vocabulary,
    el: ElementId,
    entering: bool,
) -> Option<DirectiveKind> {
    if vocab.toggles(doc, el, "tooltip") {
        return Some(if entering {
            DirectiveKind::ShowTooltip
        } else {
            DirectiveKind::HideTooltip
        });
    }
    if doc.has_class(el, "carousel") && vocab.pauses_on_hover(doc, el) {
        return Some(if entering {
            DirectiveKind::PauseSlides
        } else {
            DirectiveKind::ResumeSlides
        });
    }
    None
}

fn submit_kind(doc: &Document, el: ElementId) -> Option<DirectiveKind> {
    (doc.tag(el) == Some("form") && doc.has_class(el, "needs-validation"))
        .then_some(DirectiveKind::ValidateForm)
}

fn resolve(
    doc: &Document,
    vocab: &Vocabulary,
    activator: ElementId,
    kind: DirectiveKind,
) -> Option<ElementId> {
    let explicit = || {
        doc.attribute(activator, &vocab.target)
            .and_then(|r| resolve_reference(doc, r))
    };
    let href = || {
        doc.attribute(activator, "href")
            .filter(|h| h.starts_with('#') && h.len() > 1)
            .and_then(|h| resolve_reference(doc, h))
    };

    match kind {
        DirectiveKind::Dismiss => explicit().or_else(|| doc.closest_with_class(activator, "alert")),
        DirectiveKind::OpenOverlay => explicit(),
        DirectiveKind::CloseOverlay => {
            explicit().or_else(|| doc.closest_with_class(activator, "modal"))
        }
        DirectiveKind::ToggleMenu => explicit()
            .or_else(|| doc.next_element_sibling(activator))
            .filter(|&menu| doc.has_class(menu, "dropdown-menu")),
        DirectiveKind::ToggleCollapse => explicit().or_else(href),
        DirectiveKind::SwitchTab => explicit().or_else(href).or(Some(activator)),
        DirectiveKind::ControlSlide(_) => {
            explicit().or_else(|| doc.closest_with_class(activator, "carousel"))
        }
        DirectiveKind::ShowTooltip
        | DirectiveKind::HideTooltip
        | DirectiveKind::PauseSlides
        | DirectiveKind::ResumeSlides
        | DirectiveKind::ValidateForm => Some(activator),
    }
}
