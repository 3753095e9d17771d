//! A scripted host: builds a small page, plays a few interactions against a
//! running program and prints the resulting markup.
//!
//! Run with `cargo run --example page`; set `RUST_LOG=strap=debug` or pass
//! `-v` to watch the dispatcher.

use std::time::Duration;
use strap::behaviors::{Page, PageFlags, PageMsg};
use strap::logging::{init_logging, LogConfig};
use strap::{Document, ElementBuilder as El, Interaction, Program, ProgramOptions};

fn markup() -> Document {
    Document::from_body([
        El::new("div")
            .id("notice")
            .class("alert alert-info")
            .text("Saved.")
            .child(El::new("button").id("close").class("btn-close")),
        El::new("div").class("dropdown").children([
            El::new("button")
                .id("menu-toggle")
                .attr("data-toggle-kind", "dropdown"),
            El::new("ul").class("dropdown-menu").children([
                El::new("li").text("Profile"),
                El::new("li").text("Sign out"),
            ]),
        ]),
        El::new("div")
            .id("slides")
            .class("carousel")
            .attr("data-ride", "carousel")
            .children([
                El::new("div").class("carousel-item").text("One"),
                El::new("div").class("carousel-item").text("Two"),
                El::new("div").class("carousel-item").text("Three"),
            ]),
    ])
}

fn find(doc: &Document, id: &str) -> Option<strap::ElementId> {
    strap::directive::resolve_reference(doc, &format!("#{id}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let verbosity = std::env::args().filter(|a| a == "-v").count() as u8;
    init_logging(&LogConfig::from_verbosity(verbosity))?;

    let document = markup();
    let (Some(close), Some(toggle)) = (find(&document, "close"), find(&document, "menu-toggle"))
    else {
        return Err("demo markup is missing its controls".into());
    };

    let options = ProgramOptions {
        handle_signals: false,
        ..ProgramOptions::default()
    };
    let program = Program::<Page>::with_options(PageFlags::new(document), options);
    let handle = program.handle();
    let running = tokio::spawn(program.run());

    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.send(PageMsg::Interact(Interaction::click(toggle)));
    handle.send(PageMsg::Interact(Interaction::click(close)));
    tokio::time::sleep(Duration::from_millis(5200)).await;
    handle.kill();

    let page = running.await??;
    let doc = page.document();
    println!("{}", doc.outer_html(doc.root()));
    Ok(())
}
