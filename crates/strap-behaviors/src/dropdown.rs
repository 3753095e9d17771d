//! Toggle menus.
//!
//! Open menus are never tracked: every sweep re-scans the page for
//! `.dropdown-menu.show`, so menus added or removed between interactions are
//! handled without bookkeeping.

use strap_core::dom::{Document, ElementId};
use strap_core::toggle::{flip_state, set_state, SHOW};

/// Class every toggle menu carries.
pub const MENU: &str = "dropdown-menu";

/// Close every open menu except `except`. Returns how many were closed.
pub fn close_all(doc: &mut Document, except: Option<ElementId>) -> usize {
    let open = open_menus(doc);
    let mut closed = 0;
    for menu in open {
        if Some(menu) != except && set_state(doc, menu, &[SHOW], false) {
            closed += 1;
        }
    }
    if closed > 0 {
        tracing::debug!(closed, "closed open menus");
    }
    closed
}

/// Activate `menu`: close the others, then flip it. Returns whether it is
/// open afterwards.
pub fn toggle(doc: &mut Document, menu: ElementId) -> bool {
    close_all(doc, Some(menu));
    let open = flip_state(doc, menu, SHOW);
    tracing::debug!(menu = menu.to_bits(), open, "menu toggled");
    open
}

/// Menus currently open, in document order.
pub fn open_menus(doc: &Document) -> Vec<ElementId> {
    doc.query_classes(&[MENU, SHOW])
}
