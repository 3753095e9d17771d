//! The state toggle primitive shared by every behavior.
//!
//! Widget state lives in presentation classes on the elements themselves, so
//! "set element X to state S" is a class write that is a no-op when X is
//! already in S.

use crate::dom::{Document, ElementId};

/// The selected item in a group (tab, slide, indicator).
pub const ACTIVE: &str = "active";
/// A visible popup, region or dialog.
pub const SHOW: &str = "show";

/// Set every class in `classes` on `id` to `on`. Returns whether anything
/// changed.
pub fn set_state(doc: &mut Document, id: ElementId, classes: &[&str], on: bool) -> bool {
    let mut changed = false;
    for class in classes {
        changed |= if on {
            doc.add_class(id, class)
        } else {
            doc.remove_class(id, class)
        };
    }
    changed
}

/// Flip `class` on `id`. Returns the new state.
pub fn flip_state(doc: &mut Document, id: ElementId, class: &str) -> bool {
    doc.toggle_class(id, class)
}

/// Turn `classes` off on every member of a group, then on for `chosen`.
///
/// After this returns exactly one member carries the state, provided
/// `chosen` is one of `members`.
pub fn set_exclusive(
    doc: &mut Document,
    members: &[ElementId],
    chosen: ElementId,
    classes: &[&str],
) {
    for &member in members {
        if member != chosen {
            set_state(doc, member, classes, false);
        }
    }
    set_state(doc, chosen, classes, true);
}
