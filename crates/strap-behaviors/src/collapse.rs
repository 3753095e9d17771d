//! Expand/collapse regions.
//!
//! A region is open when it carries `show`. Its extent (inline `height`) is
//! written in two steps so a host can animate it: the current value right
//! away, the target value on the next frame.

use crate::deferred::{parse_px, px, Deferred};
use strap_core::dom::{Document, ElementId};
use strap_core::toggle::{set_state, SHOW};
use strap_core::Command;

/// Flip `region` between open and closed.
///
/// Opening targets the natural content height measured now; closing targets
/// zero. The open flag flips immediately; the returned command applies the
/// target extent on the next frame.
pub fn toggle(doc: &mut Document, region: ElementId) -> Command<Deferred> {
    let was_open = is_open(doc, region);
    let natural = doc.scroll_height(region);
    let current = doc
        .style(region, "height")
        .and_then(parse_px)
        .unwrap_or(if was_open { natural } else { 0.0 });

    let open = !was_open;
    let extent = if open { natural } else { 0.0 };
    set_state(doc, region, &[SHOW], open);
    doc.set_style(region, "height", &px(current));
    tracing::debug!(region = region.to_bits(), open, extent, "collapse toggled");

    Command::next_frame(Deferred::ApplyExtent {
        region,
        extent,
        open,
    })
}

/// Whether `region` is open.
pub fn is_open(doc: &Document, region: ElementId) -> bool {
    doc.has_class(region, SHOW)
}

/// The region's current inline extent in pixels, if any.
pub fn extent(doc: &Document, region: ElementId) -> Option<f64> {
    doc.style(region, "height").and_then(parse_px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strap_core::builder::ElementBuilder as El;

    fn region(open: bool) -> (Document, ElementId) {
        let mut doc = Document::new();
        let root = doc.root();
        let class = if open { "collapse show" } else { "collapse" };
        let id = doc.mount(root, El::new("div").class(class).scroll_height(120.0));
        (doc, id)
    }

    #[test]
    fn opening_writes_zero_now_and_natural_height_next_frame() {
        let (mut doc, id) = region(false);
        let frame = toggle(&mut doc, id).into_frame().unwrap();
        assert!(is_open(&doc, id));
        assert_eq!(extent(&doc, id), Some(0.0));

        assert!(frame.apply(&mut doc));
        assert_eq!(extent(&doc, id), Some(120.0));
    }

    #[test]
    fn closing_an_open_region_starts_from_natural_height() {
        let (mut doc, id) = region(true);
        let frame = toggle(&mut doc, id).into_frame().unwrap();
        assert!(!is_open(&doc, id));
        assert_eq!(extent(&doc, id), Some(120.0));

        frame.apply(&mut doc);
        assert_eq!(extent(&doc, id), Some(0.0));
    }

    #[test]
    fn double_toggle_in_one_frame_settles_closed() {
        let (mut doc, id) = region(false);
        let first = toggle(&mut doc, id).into_frame().unwrap();
        let second = toggle(&mut doc, id).into_frame().unwrap();
        assert!(!first.apply(&mut doc));
        assert!(second.apply(&mut doc));
        assert!(!is_open(&doc, id));
        assert_eq!(extent(&doc, id), Some(0.0));
    }

    #[test]
    fn explicit_height_is_the_starting_point() {
        let (mut doc, id) = region(true);
        doc.set_style(id, "height", "64px");
        toggle(&mut doc, id);
        assert_eq!(extent(&doc, id), Some(64.0));
    }

    #[test]
    fn reopening_measures_the_content_again() {
        let (mut doc, id) = region(false);
        toggle(&mut doc, id).into_frame().unwrap().apply(&mut doc);
        toggle(&mut doc, id).into_frame().unwrap().apply(&mut doc);
        assert_eq!(extent(&doc, id), Some(0.0));

        doc.set_scroll_height(id, 300.0);
        let frame = toggle(&mut doc, id).into_frame().unwrap();
        assert_eq!(extent(&doc, id), Some(0.0));
        frame.apply(&mut doc);
        assert_eq!(extent(&doc, id), Some(300.0));
    }
}
