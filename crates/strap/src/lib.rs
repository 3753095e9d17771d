//! **strap** -- a declarative behavior layer that makes static markup
//! interactive.
//!
//! This is the umbrella crate that re-exports everything you need from a
//! single dependency:
//!
//! ```toml
//! [dependencies]
//! strap = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`strap_core`] are available at the crate root
//!   ([`Document`], [`ElementBuilder`], [`Command`], [`Program`], [`run`],
//!   [`run_with`], etc.).
//! * The [`behaviors`] module re-exports everything from [`strap_behaviors`]
//!   ([`Page`](behaviors::Page), [`PageMsg`](behaviors::PageMsg), the
//!   individual behavior modules, and the `TestPage` harness).
//! * [`tokio`] is re-exported so hosts do not need to depend on it directly.
//!
//! # Quick start
//!
//! ```no_run
//! use strap::behaviors::{Page, PageFlags, PageMsg};
//! use strap::{Document, ElementBuilder as El, Interaction, Program};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), strap::ProgramError> {
//!     let document = Document::from_body([El::new("div")
//!         .class("alert")
//!         .child(El::new("button").class("btn-close"))]);
//!     let close = document.query_classes(&["btn-close"])[0];
//!
//!     let program = Program::<Page>::new(PageFlags::new(document));
//!     let handle = program.handle();
//!     handle.send(PageMsg::Interact(Interaction::click(close)));
//!     let page = program.run().await?;
//!     println!("{}", page.document().outer_html(page.document().root()));
//!     Ok(())
//! }
//! ```
//!
//! A scripted host lives in `demos/page.rs` at the workspace root; run it with
//! `cargo run --example page`.

pub use strap_core::*;
pub mod behaviors {
    pub use strap_behaviors::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use tokio;
