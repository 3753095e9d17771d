//! Progress bar fill animation.

use crate::deferred::Deferred;
use std::time::Duration;
use strap_core::dom::{Document, ElementId};
use strap_core::Command;

const BAR: &str = "progress-bar";

/// Reset every `.progress-bar` to `0%` and schedule its target width.
///
/// The target is the bar's inline width, else `aria-valuenow` as a
/// percentage. Bars with neither are left alone.
pub fn animate(doc: &mut Document, delay: Duration) -> Command<Deferred> {
    let bars = doc.query_classes(&[BAR]);
    let mut cmds = Vec::new();
    for bar in bars {
        let Some(width) = target_width(doc, bar) else {
            tracing::trace!(bar = bar.to_bits(), "progress bar without target width");
            continue;
        };
        doc.set_style(bar, "width", "0%");
        cmds.push(Command::delay(delay, Deferred::RestoreProgress { bar, width }));
    }
    tracing::debug!(bars = cmds.len(), "animating progress bars");
    Command::batch(cmds)
}

fn target_width(doc: &Document, bar: ElementId) -> Option<String> {
    doc.style(bar, "width")
        .filter(|w| !w.trim().is_empty())
        .map(str::to_owned)
        .or_else(|| {
            doc.attribute(bar, "aria-valuenow")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{v}%"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strap_core::builder::ElementBuilder as El;

    #[test]
    fn bar_starts_at_zero_and_gets_its_width_back() {
        let mut doc = Document::from_body([El::new("div")
            .class("progress-bar")
            .style("width", "40%")]);
        let bar = doc.query_classes(&[BAR])[0];

        let (after, restore) = animate(&mut doc, Duration::from_millis(100))
            .into_delay()
            .unwrap();
        assert_eq!(after, Duration::from_millis(100));
        assert_eq!(doc.style(bar, "width"), Some("0%"));
        assert!(restore.apply(&mut doc));
        assert_eq!(doc.style(bar, "width"), Some("40%"));
    }

    #[test]
    fn aria_value_is_the_fallback_and_bare_bars_are_skipped() {
        let mut doc = Document::from_body([
            El::new("div").class("progress-bar").attr("aria-valuenow", "75"),
            El::new("div").class("progress-bar"),
        ]);
        let bars = doc.query_classes(&[BAR]);

        let cmd = animate(&mut doc, Duration::from_millis(100));
        assert_eq!(doc.style(bars[1], "width"), None);
        let (_, restore) = cmd.into_delay().unwrap();
        assert_eq!(
            restore,
            Deferred::RestoreProgress {
                bar: bars[0],
                width: "75%".into()
            }
        );
    }

    #[test]
    fn page_without_bars_needs_no_timer() {
        let mut doc = Document::new();
        assert!(animate(&mut doc, Duration::from_millis(100)).is_none());
    }
}
