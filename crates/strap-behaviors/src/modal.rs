//! Overlay dialogs.
//!
//! An open dialog is displayed, carries `show`, and the page root carries the
//! `modal-open` marker. There is no stacking: opening a second dialog shows
//! both, and closing either one clears the marker.

use strap_core::dom::{Document, ElementId};
use strap_core::toggle::{set_state, SHOW};

/// Page-level marker present while a dialog is open.
pub const OVERLAY_OPEN: &str = "modal-open";

/// Show `dialog`. Idempotent.
pub fn open(doc: &mut Document, dialog: ElementId) {
    tracing::debug!(dialog = dialog.to_bits(), "opening dialog");
    doc.set_style(dialog, "display", "block");
    set_state(doc, dialog, &[SHOW], true);
    let root = doc.root();
    set_state(doc, root, &[OVERLAY_OPEN], true);
}

/// Hide `dialog`. Idempotent.
pub fn close(doc: &mut Document, dialog: ElementId) {
    tracing::debug!(dialog = dialog.to_bits(), "closing dialog");
    doc.set_style(dialog, "display", "none");
    set_state(doc, dialog, &[SHOW], false);
    let root = doc.root();
    set_state(doc, root, &[OVERLAY_OPEN], false);
}

/// Whether `dialog` is currently shown.
pub fn is_open(doc: &Document, dialog: ElementId) -> bool {
    doc.has_class(dialog, SHOW) && doc.style(dialog, "display") == Some("block")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strap_core::builder::ElementBuilder as El;

    fn page() -> (Document, ElementId, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.mount(root, El::new("div").class("modal"));
        let b = doc.mount(root, El::new("div").class("modal"));
        (doc, a, b)
    }

    #[test]
    fn open_then_close_restores_page() {
        let (mut doc, dialog, _) = page();
        let root = doc.root();

        open(&mut doc, dialog);
        assert!(is_open(&doc, dialog));
        assert!(doc.has_class(root, OVERLAY_OPEN));

        close(&mut doc, dialog);
        assert!(!is_open(&doc, dialog));
        assert_eq!(doc.style(dialog, "display"), Some("none"));
        assert!(!doc.has_class(root, OVERLAY_OPEN));
    }

    #[test]
    fn open_is_idempotent() {
        let (mut doc, dialog, _) = page();
        open(&mut doc, dialog);
        let before = doc.outer_html(doc.root());
        open(&mut doc, dialog);
        assert_eq!(doc.outer_html(doc.root()), before);
    }

    #[test]
    fn second_dialog_shows_both_and_one_close_clears_marker() {
        let (mut doc, a, b) = page();
        let root = doc.root();
        open(&mut doc, a);
        open(&mut doc, b);
        assert!(is_open(&doc, a) && is_open(&doc, b));

        close(&mut doc, b);
        assert!(is_open(&doc, a));
        assert!(!doc.has_class(root, OVERLAY_OPEN));
    }
}
