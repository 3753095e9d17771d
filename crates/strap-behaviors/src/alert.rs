//! Dismissible panels.
//!
//! Dismissing fades the panel out (`opacity: 0`) and removes it from the tree
//! once the fade delay has elapsed.

use crate::deferred::Deferred;
use std::time::Duration;
use strap_core::dom::{Document, ElementId};
use strap_core::Command;

/// Start dismissing `panel`. The returned command performs the removal after
/// `delay`. A panel that is already gone is a silent no-op.
pub fn dismiss(doc: &mut Document, panel: ElementId, delay: Duration) -> Command<Deferred> {
    if !doc.is_connected(panel) {
        tracing::trace!(panel = panel.to_bits(), "dismiss on detached panel");
        return Command::none();
    }
    tracing::debug!(panel = panel.to_bits(), "dismissing panel");
    doc.set_style(panel, "opacity", "0");
    Command::delay(delay, Deferred::RemovePanel(panel))
}
