//! Headless harness for behavior-level tests.
//!
//! [`TestPage`] runs a [`Page`] inside a [`TestProgram`] so interactions,
//! fades, frames and auto-play ticks all go through the same message loop a
//! real host drives, on a virtual clock.
//!
//! ```rust
//! use std::time::Duration;
//! use strap_behaviors::testing::TestPage;
//! use strap_core::ElementBuilder as El;
//!
//! let mut page = TestPage::new([El::new("div")
//!     .class("alert")
//!     .child(El::new("button").class("btn-close"))]);
//! page.click(".btn-close");
//! page.advance(Duration::from_millis(150));
//! assert!(page.find(".alert").is_none());
//! ```

use crate::options::PageOptions;
use crate::page::{EntryPoint, Page, PageFlags, PageMsg};
use std::time::Duration;
use strap_core::builder::ElementBuilder;
use strap_core::dom::{Document, ElementId};
use strap_core::testing::TestProgram;
use strap_core::{EventOutcome, Interaction, Selector};

/// A [`Page`] on a virtual clock.
pub struct TestPage {
    program: TestProgram<Page>,
}

impl TestPage {
    /// A loaded page whose body holds `body`, initialized with defaults.
    pub fn new(body: impl IntoIterator<Item = ElementBuilder>) -> Self {
        Self::with_options(body, PageOptions::default())
    }

    pub fn with_options(body: impl IntoIterator<Item = ElementBuilder>, options: PageOptions) -> Self {
        Self::from_flags(PageFlags::new(Document::from_body(body)).with_options(options))
    }

    /// A page still loading: nothing is registered until
    /// [`content_loaded`](TestPage::content_loaded).
    pub fn loading(body: impl IntoIterator<Item = ElementBuilder>) -> Self {
        Self::from_flags(PageFlags::new(Document::from_body(body)).loading())
    }

    pub fn from_flags(flags: PageFlags) -> Self {
        let mut program = TestProgram::new(flags);
        program.drain_messages();
        Self { program }
    }

    /// Deliver the host's "content loaded" signal.
    pub fn content_loaded(&mut self) {
        self.send(PageMsg::ContentLoaded);
    }

    /// Send a message and process everything it queues immediately.
    pub fn send(&mut self, msg: PageMsg) {
        self.program.send(msg);
        self.program.drain_messages();
    }

    /// Click the first element matching `selector`.
    ///
    /// # Panics
    ///
    /// Panics if nothing matches.
    pub fn click(&mut self, selector: &str) -> EventOutcome {
        let origin = self.require(selector);
        self.interact(Interaction::click(origin))
    }

    /// Click a specific element.
    pub fn click_el(&mut self, origin: ElementId) -> EventOutcome {
        self.interact(Interaction::click(origin))
    }

    /// Move the pointer onto the first element matching `selector`.
    pub fn hover(&mut self, selector: &str) -> EventOutcome {
        let origin = self.require(selector);
        self.interact(Interaction::mouse_enter(origin))
    }

    /// Move the pointer off the first element matching `selector`.
    pub fn leave(&mut self, selector: &str) -> EventOutcome {
        let origin = self.require(selector);
        self.interact(Interaction::mouse_leave(origin))
    }

    /// Submit the first form matching `selector`.
    pub fn submit(&mut self, selector: &str) -> EventOutcome {
        let origin = self.require(selector);
        self.interact(Interaction::submit(origin))
    }

    /// Deliver `interaction` and return its outcome.
    pub fn interact(&mut self, interaction: Interaction) -> EventOutcome {
        self.send(PageMsg::Interact(interaction));
        self.page().last_outcome()
    }

    /// Run an entry point.
    pub fn invoke(&mut self, entry: EntryPoint) {
        self.send(PageMsg::Invoke(entry));
    }

    /// Move the virtual clock forward.
    pub fn advance(&mut self, duration: Duration) {
        self.program.advance(duration);
    }

    /// Move the virtual clock forward by one frame.
    pub fn frame(&mut self) {
        self.program.advance_frame();
    }

    /// First attached element matching `selector`.
    ///
    /// # Panics
    ///
    /// Panics if `selector` does not parse.
    pub fn find(&self, selector: &str) -> Option<ElementId> {
        self.doc().query_selector(&parse(selector))
    }

    /// All attached elements matching `selector`, in document order.
    pub fn find_all(&self, selector: &str) -> Vec<ElementId> {
        self.doc().query_selector_all(&parse(selector))
    }

    pub fn doc(&self) -> &Document {
        self.page().document()
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        self.program.model_mut().document_mut()
    }

    pub fn page(&self) -> &Page {
        self.program.model()
    }

    /// The underlying program, for timer and subscription assertions.
    pub fn program(&self) -> &TestProgram<Page> {
        &self.program
    }

    fn require(&self, selector: &str) -> ElementId {
        match self.find(selector) {
            Some(id) => id,
            None => panic!("no element matches {selector:?}"),
        }
    }
}

fn parse(selector: &str) -> Selector {
    match Selector::parse(selector) {
        Ok(selector) => selector,
        Err(err) => panic!("bad selector {selector:?}: {err}"),
    }
}
