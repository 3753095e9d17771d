//! Attribute-driven behaviors for strap.
//!
//! Every behavior is a set of plain functions over a
//! [`Document`](strap_core::Document); the [`Page`] model wires them to the
//! page-root listeners and the runtime's timers.
//!
//! | Module | Behavior |
//! |--------|----------|
//! | [`alert`] | Dismissible panels |
//! | [`modal`] | Overlay dialogs |
//! | [`dropdown`] | Toggle menus with page-wide mutual exclusion |
//! | [`collapse`] | Expand/collapse regions |
//! | [`tabs`] | Tabbed views |
//! | [`carousel`] | Rotating slide groups |
//! | [`tooltip`] | Hover tooltips |
//! | [`progress`] | Progress bar fill |
//! | [`validation`] | Form constraint checks on submit |

pub mod alert;
pub mod carousel;
pub mod collapse;
pub mod deferred;
pub mod dispatch;
pub mod dropdown;
pub mod modal;
pub mod options;
pub mod page;
pub mod progress;
pub mod tabs;
pub mod testing;
pub mod tooltip;
pub mod validation;

pub use carousel::{CarouselRegistry, SlideGroup};
pub use deferred::Deferred;
pub use dispatch::{Dispatcher, Listener};
pub use options::{PageOptions, Timings};
pub use page::{EntryPoint, Page, PageFlags, PageMsg, ReadyState};
pub use tooltip::TooltipTable;
pub use validation::{ConstraintValidator, RequiredFields};
