//! A page driven by the real tokio runtime.

use std::time::Duration;
use strap::behaviors::{EntryPoint, Page, PageFlags, PageMsg};
use strap::{Document, ElementBuilder as El, Interaction, Program, ProgramOptions};

fn quiet() -> ProgramOptions {
    ProgramOptions {
        handle_signals: false,
        ..ProgramOptions::default()
    }
}

fn body() -> Document {
    Document::from_body([
        El::new("div")
            .id("a")
            .class("alert")
            .child(El::new("button").id("x").class("btn-close")),
        El::new("div")
            .id("c")
            .class("carousel")
            .attr("data-ride", "carousel")
            .children([
                El::new("div").class("carousel-item"),
                El::new("div").class("carousel-item"),
                El::new("div").class("carousel-item"),
            ]),
    ])
}

fn by_id(doc: &Document, id: &str) -> strap::ElementId {
    strap::directive::resolve_reference(doc, &format!("#{id}")).unwrap()
}

#[tokio::test(start_paused = true)]
async fn timers_and_interactions_run_on_tokio() {
    let document = body();
    let close = by_id(&document, "x");
    let alert = by_id(&document, "a");
    let carousel = by_id(&document, "c");

    let program = Program::<Page>::with_options(PageFlags::new(document), quiet());
    let handle = program.handle();
    let task = tokio::spawn(program.run());
    // Let the page initialize before the first interaction.
    tokio::time::sleep(Duration::from_millis(1)).await;

    handle.send(PageMsg::Interact(Interaction::click(close)));
    tokio::time::sleep(Duration::from_millis(5100)).await;
    handle.kill();

    let page = task.await.unwrap().unwrap();
    assert!(page.is_loaded());
    assert!(!page.document().is_connected(alert));
    assert_eq!(page.carousels().get(carousel).map(|g| g.current()), Some(1));
}

#[tokio::test(start_paused = true)]
async fn loading_page_waits_for_the_host() {
    let document = body();
    let carousel = by_id(&document, "c");

    let program =
        Program::<Page>::with_options(PageFlags::new(document).loading(), quiet());
    let handle = program.handle();
    let task = tokio::spawn(program.run());

    tokio::time::sleep(Duration::from_millis(6000)).await;
    handle.send(PageMsg::ContentLoaded);
    handle.send(PageMsg::Invoke(EntryPoint::PauseCarousel(carousel)));
    tokio::time::sleep(Duration::from_millis(6000)).await;
    handle.kill();

    let page = task.await.unwrap().unwrap();
    assert!(page.is_loaded());
    let group = page.carousels().get(carousel).unwrap();
    assert!(group.is_paused());
    assert_eq!(group.current(), 0);
}
