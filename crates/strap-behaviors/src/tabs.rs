//! Tabbed views.
//!
//! A tab group is the closest `.nav` around the activated link; its panes are
//! the `.tab-pane` elements in the closest `.tab-content` around the target
//! pane. After a switch exactly one link and one pane of the group are active.

use strap_core::dom::{Document, ElementId};
use strap_core::toggle::{set_exclusive, set_state, ACTIVE, SHOW};

/// Activate `link` within its nav, then `pane` within its container.
///
/// When `pane` is `link` itself there is no pane to show and only the nav
/// changes.
pub fn switch(doc: &mut Document, link: ElementId, pane: ElementId) {
    match doc.closest_with_class(link, "nav") {
        Some(nav) => {
            let links = doc.query_classes_within(nav, &["nav-link"]);
            set_exclusive(doc, &links, link, &[ACTIVE]);
        }
        None => {
            set_state(doc, link, &[ACTIVE], true);
        }
    }

    if pane == link {
        tracing::debug!(link = link.to_bits(), "tab switched without pane");
        return;
    }

    match doc.closest_with_class(pane, "tab-content") {
        Some(container) => {
            let panes = doc.query_classes_within(container, &["tab-pane"]);
            set_exclusive(doc, &panes, pane, &[SHOW, ACTIVE]);
        }
        None => {
            set_state(doc, pane, &[SHOW, ACTIVE], true);
        }
    }
    tracing::debug!(link = link.to_bits(), pane = pane.to_bits(), "tab switched");
}

#[cfg(test)]
mod tests {
    use super::*;
    use strap_core::builder::ElementBuilder as El;
    use strap_core::directive::resolve_reference;

    fn group() -> Document {
        Document::from_body([
            El::new("ul").class("nav nav-tabs").children([
                El::new("a").id("l1").class("nav-link active"),
                El::new("a").id("l2").class("nav-link"),
            ]),
            El::new("div").class("tab-content").children([
                El::new("div").id("p1").class("tab-pane show active"),
                El::new("div").id("p2").class("tab-pane"),
            ]),
        ])
    }

    fn id(doc: &Document, name: &str) -> ElementId {
        resolve_reference(doc, &format!("#{name}")).unwrap()
    }

    fn active(doc: &Document, class: &str) -> Vec<ElementId> {
        doc.query_classes(&[class, ACTIVE])
    }

    #[test]
    fn switch_moves_link_and_pane() {
        let mut doc = group();
        let (l2, p2) = (id(&doc, "l2"), id(&doc, "p2"));
        switch(&mut doc, l2, p2);
        assert_eq!(active(&doc, "nav-link"), vec![l2]);
        assert_eq!(active(&doc, "tab-pane"), vec![p2]);
        assert!(doc.has_class(p2, SHOW));
        assert!(!doc.has_class(id(&doc, "p1"), SHOW));
    }

    #[test]
    fn switch_to_current_tab_keeps_invariant() {
        let mut doc = group();
        let (l1, p1) = (id(&doc, "l1"), id(&doc, "p1"));
        switch(&mut doc, l1, p1);
        assert_eq!(active(&doc, "nav-link"), vec![l1]);
        assert_eq!(active(&doc, "tab-pane"), vec![p1]);
    }

    #[test]
    fn nav_only_switch_leaves_panes_alone() {
        let mut doc = group();
        let l2 = id(&doc, "l2");
        switch(&mut doc, l2, l2);
        assert_eq!(active(&doc, "nav-link"), vec![l2]);
        assert_eq!(active(&doc, "tab-pane"), vec![id(&doc, "p1")]);
    }
}
