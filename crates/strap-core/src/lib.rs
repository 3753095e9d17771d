//! Core of **strap**, a declarative behavior layer for markup.
//!
//! `strap-core` provides the document model the behaviors act on, the
//! attribute directive reader, and the Elm-style runtime that schedules
//! everything that happens after the current synchronous turn.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Document`] | Arena-backed element tree mirroring the host's markup |
//! | [`Selector`] | Parsed CSS selector used for target references |
//! | [`ElementBuilder`] | Fluent subtree construction |
//! | [`Directive`] | A recognized attribute directive with its resolved target |
//! | [`Model`] | State machine trait (init / update / subscriptions) |
//! | [`Command`] | Describes a side effect (message, delay, next frame, ...) |
//! | [`Subscription`] | Repeating timer, diffed after every update |
//! | [`Program`] | Drives a [`Model`] on tokio |
//! | [`TestProgram`](testing::TestProgram) | Headless harness on a virtual clock |
//!
//! # Architecture
//!
//! 1. **init** -- [`Model::init`] creates the initial state and may return a
//!    [`Command`].
//! 2. **event** -- The host injects interactions through a
//!    [`ProgramHandle`]; timers come back as messages.
//! 3. **update** -- [`Model::update`] mutates state and returns a
//!    [`Command`] for deferred work.
//! 4. **subscriptions** -- [`Model::subscriptions`] is diffed after each
//!    update; new timers start, removed ones stop.

pub mod builder;
pub mod command;
pub mod directive;
pub mod dom;
pub mod event;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod selector;
pub mod subscription;
pub mod testing;
pub mod toggle;

pub use builder::ElementBuilder;
pub use command::Command;
pub use directive::{Directive, DirectiveKind, SlideControl, Vocabulary};
pub use dom::{Document, ElementId, Rect};
pub use event::{EventKind, EventOutcome, Interaction};
pub use logging::{init_logging, LogConfig, LoggingError};
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramHandle, ProgramOptions};
pub use selector::{Selector, SelectorError};
pub use subscription::{Subscription, SubscriptionId};

/// Run a model with default options until it quits.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags).run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options).run().await
}
