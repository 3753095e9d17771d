//! Page-level invariants, exercised through the same message loop a host
//! drives.

use proptest::prelude::*;
use std::time::Duration;
use strap::behaviors::testing::TestPage;
use strap::behaviors::{dropdown, EntryPoint};
use strap::ElementBuilder as El;

fn menu_page(menus: usize) -> TestPage {
    let mut body: Vec<El> = (0..menus)
        .map(|i| {
            El::new("div").class("dropdown").children([
                El::new("button")
                    .id(format!("t{i}"))
                    .attr("data-toggle-kind", "dropdown"),
                El::new("ul").id(format!("m{i}")).class("dropdown-menu"),
            ])
        })
        .collect();
    body.push(El::new("p").id("outside"));
    TestPage::new(body)
}

fn tab_page(tabs: usize) -> TestPage {
    let links = (0..tabs).map(|i| {
        let link = El::new("a")
            .id(format!("l{i}"))
            .class("nav-link")
            .attr("data-toggle-kind", "tab")
            .attr("href", format!("#p{i}"));
        if i == 0 {
            link.class("active")
        } else {
            link
        }
    });
    let panes = (0..tabs).map(|i| {
        let pane = El::new("div").id(format!("p{i}")).class("tab-pane");
        if i == 0 {
            pane.class("show active")
        } else {
            pane
        }
    });
    TestPage::new([
        El::new("ul").class("nav nav-tabs").children(links),
        El::new("div").class("tab-content").children(panes),
    ])
}

fn carousel_page(items: usize, ride: bool) -> TestPage {
    let mut carousel = El::new("div").id("c").class("carousel").children([
        El::new("div")
            .class("carousel-inner")
            .children((0..items).map(|i| El::new("div").id(format!("s{i}")).class("carousel-item"))),
        El::new("button").id("prev").class("carousel-control-prev"),
        El::new("button").id("next").class("carousel-control-next"),
    ]);
    if ride {
        carousel = carousel.attr("data-ride", "carousel");
    }
    TestPage::new([carousel])
}

fn current_slide(page: &TestPage) -> usize {
    let root = page.find("#c").unwrap();
    page.page().carousels().get(root).unwrap().current()
}

proptest! {
    #[test]
    fn at_most_one_menu_open_after_any_click(
        menus in 1usize..4,
        clicks in proptest::collection::vec(0usize..5, 1..20),
    ) {
        let mut page = menu_page(menus);
        for click in clicks {
            let selector = if click < menus {
                format!("#t{click}")
            } else {
                "#outside".to_string()
            };
            page.click(&selector);
            prop_assert!(dropdown::open_menus(page.doc()).len() <= 1);
        }
    }

    #[test]
    fn collapse_twice_returns_to_closed_and_zero(
        height in 0u32..2000,
        settle_between in any::<bool>(),
    ) {
        let mut page = TestPage::new([
            El::new("button")
                .id("b")
                .attr("data-toggle-kind", "collapse")
                .attr("data-target", "#r"),
            El::new("div")
                .id("r")
                .class("collapse")
                .scroll_height(f64::from(height)),
        ]);
        page.click("#b");
        if settle_between {
            page.frame();
        }
        page.click("#b");
        page.frame();

        let region = page.find("#r").unwrap();
        prop_assert!(!page.doc().has_class(region, "show"));
        prop_assert_eq!(page.doc().style(region, "height"), Some("0px"));
    }

    #[test]
    fn exactly_one_tab_and_pane_active(
        tabs in 1usize..6,
        clicks in proptest::collection::vec(0usize..6, 1..15),
    ) {
        let mut page = tab_page(tabs);
        for click in clicks.into_iter().filter(|&c| c < tabs) {
            page.click(&format!("#l{click}"));
            prop_assert_eq!(page.find_all(".nav-link.active").len(), 1);
            prop_assert_eq!(page.find_all(".tab-pane.active").len(), 1);
            prop_assert_eq!(page.find(".nav-link.active"), page.find(&format!("#l{click}")));
            prop_assert_eq!(page.find(".tab-pane.active"), page.find(&format!("#p{click}")));
        }
    }

    #[test]
    fn len_nexts_return_to_start(items in 1usize..8, start in 0usize..8) {
        let start = start % items;
        let mut page = carousel_page(items, false);
        let carousel = page.find("#c").unwrap();
        page.invoke(EntryPoint::ShowSlide { carousel, index: start });
        for _ in 0..items {
            page.click("#next");
        }
        prop_assert_eq!(current_slide(&page), start);
    }

    #[test]
    fn prev_then_next_is_identity(items in 1usize..8, start in 0usize..8) {
        let start = start % items;
        let mut page = carousel_page(items, false);
        let carousel = page.find("#c").unwrap();
        page.invoke(EntryPoint::ShowSlide { carousel, index: start });
        page.click("#prev");
        page.click("#next");
        prop_assert_eq!(current_slide(&page), start);
        prop_assert_eq!(page.find_all(".carousel-item.active").len(), 1);
    }

    #[test]
    fn dangling_reference_changes_nothing(
        reference in prop_oneof!["#zz[a-z]{1,6}", "[\\[#.>~+]{1,3}"],
        kind in prop_oneof![Just("modal"), Just("collapse"), Just("dropdown"), Just("dismiss")],
    ) {
        let mut page = TestPage::new([
            El::new("button")
                .id("b")
                .attr("data-toggle-kind", kind)
                .attr("data-target", reference),
            El::new("div").class("modal"),
            El::new("div").class("collapse"),
        ]);
        let before = page.doc().outer_html(page.doc().root());
        page.click("#b");
        page.advance(Duration::from_millis(200));
        prop_assert_eq!(page.doc().outer_html(page.doc().root()), before);
        prop_assert_eq!(page.program().pending_timers(), 0);
    }
}

#[test]
fn double_dismiss_is_harmless() {
    let mut page = TestPage::new([El::new("div")
        .id("a")
        .class("alert")
        .child(El::new("button").id("x").attr("data-toggle-kind", "dismiss"))]);
    let button = page.find("#x").unwrap();
    page.click("#x");
    page.click("#x");
    page.advance(Duration::from_millis(150));
    assert!(page.find("#a").is_none());

    let after_removal = page.doc().outer_html(page.doc().root());
    page.advance(Duration::from_millis(500));
    let outcome = page.click_el(button);
    assert_eq!(outcome, strap::EventOutcome::default());
    assert_eq!(page.doc().outer_html(page.doc().root()), after_removal);
    assert_eq!(page.program().pending_timers(), 0);
}

#[test]
fn dismissed_panel_fades_before_it_goes() {
    let mut page = TestPage::new([El::new("div")
        .id("a")
        .class("alert")
        .child(El::new("button").class("btn-close"))]);
    page.click(".btn-close");
    let panel = page.find("#a").unwrap();
    assert_eq!(page.doc().style(panel, "opacity"), Some("0"));
    page.advance(Duration::from_millis(149));
    assert!(page.doc().is_connected(panel));
    page.advance(Duration::from_millis(1));
    assert!(!page.doc().is_connected(panel));
}

#[test]
fn three_slides_auto_advance_once_per_interval() {
    let mut page = carousel_page(3, true);
    assert_eq!(current_slide(&page), 0);

    page.advance(Duration::from_millis(5000));
    assert_eq!(current_slide(&page), 1);
    let first = page.find("#s0").unwrap();
    assert!(!page.doc().has_class(first, "active"));
    assert_eq!(page.find_all(".carousel-item.active"), vec![page.find("#s1").unwrap()]);

    page.advance(Duration::from_millis(4999));
    assert_eq!(current_slide(&page), 1);
    page.advance(Duration::from_millis(1));
    assert_eq!(current_slide(&page), 2);
}

#[test]
fn prev_from_first_slide_wraps_to_last() {
    let mut page = carousel_page(3, true);
    page.click("#prev");
    assert_eq!(current_slide(&page), 2);
}

#[test]
fn dialog_open_then_close() {
    let mut page = TestPage::new([
        El::new("button")
            .id("open")
            .attr("data-toggle-kind", "modal")
            .attr("data-target", "#dlg"),
        El::new("div")
            .id("dlg")
            .class("modal")
            .child(El::new("button").id("close").attr("data-dismiss", "modal")),
    ]);
    let dialog = page.find("#dlg").unwrap();
    let root = page.doc().root();

    page.click("#open");
    assert!(page.doc().has_class(root, "modal-open"));
    assert!(page.doc().has_class(dialog, "show"));
    assert_eq!(page.doc().style(dialog, "display"), Some("block"));

    page.click("#close");
    assert!(!page.doc().has_class(root, "modal-open"));
    assert!(!page.doc().has_class(dialog, "show"));
    assert_eq!(page.doc().style(dialog, "display"), Some("none"));
}

#[test]
fn activating_an_open_menu_closes_it() {
    let mut page = menu_page(2);
    page.click("#t0");
    page.click("#t1");
    assert_eq!(dropdown::open_menus(page.doc()), vec![page.find("#m1").unwrap()]);
    page.click("#t1");
    assert!(dropdown::open_menus(page.doc()).is_empty());
}
