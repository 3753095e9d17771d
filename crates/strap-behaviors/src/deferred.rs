//! Writes scheduled past the current turn.
//!
//! The element a deferred write targets may have left the tree (or changed
//! state) by the time it runs, so every write re-checks before mutating.

use strap_core::dom::{Document, ElementId};
use strap_core::toggle::SHOW;

/// A document write waiting on a timer or the next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// Remove a faded-out panel.
    RemovePanel(ElementId),
    /// Set a collapsible region's extent, if its open flag still matches.
    ApplyExtent {
        region: ElementId,
        extent: f64,
        open: bool,
    },
    /// Put a progress bar's width back to its target.
    RestoreProgress { bar: ElementId, width: String },
}

impl Deferred {
    /// Perform the write. Returns whether the document changed.
    pub fn apply(self, doc: &mut Document) -> bool {
        match self {
            Deferred::RemovePanel(panel) => {
                let removed = doc.remove(panel);
                if removed {
                    tracing::debug!(panel = panel.to_bits(), "panel removed");
                } else {
                    tracing::trace!(panel = panel.to_bits(), "panel already gone");
                }
                removed
            }
            Deferred::ApplyExtent {
                region,
                extent,
                open,
            } => {
                if !doc.is_connected(region) || doc.has_class(region, SHOW) != open {
                    tracing::trace!(region = region.to_bits(), "stale extent write skipped");
                    return false;
                }
                doc.set_style(region, "height", &px(extent));
                true
            }
            Deferred::RestoreProgress { bar, width } => {
                if !doc.is_connected(bar) {
                    tracing::trace!(bar = bar.to_bits(), "progress bar gone");
                    return false;
                }
                doc.set_style(bar, "width", &width);
                true
            }
        }
    }
}

/// Format a length in CSS pixels.
pub(crate) fn px(value: f64) -> String {
    format!("{value}px")
}

/// Parse a CSS pixel length (`"12px"`, `"12"`).
pub(crate) fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
