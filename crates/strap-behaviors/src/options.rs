//! Page configuration.

use crate::validation::{ConstraintValidator, RequiredFields};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use strap_core::Vocabulary;

/// Delays used by the behaviors.
///
/// Override individual fields with struct update syntax:
///
/// ```rust
/// use std::time::Duration;
/// use strap_behaviors::Timings;
///
/// let fast = Timings {
///     slide_interval: Duration::from_secs(2),
///     ..Timings::default()
/// };
/// assert_eq!(fast.dismiss_delay, Duration::from_millis(150));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Fade time before a dismissed panel leaves the tree (default: 150ms).
    pub dismiss_delay: Duration,
    /// Auto-play period of a slide group (default: 5000ms).
    pub slide_interval: Duration,
    /// Time a progress bar spends at 0% before filling (default: 100ms).
    pub progress_delay: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            dismiss_delay: Duration::from_millis(150),
            slide_interval: Duration::from_millis(5000),
            progress_delay: Duration::from_millis(100),
        }
    }
}

/// Everything a [`Page`](crate::Page) is configured with besides its
/// document.
#[derive(Clone)]
pub struct PageOptions {
    /// Attribute names the directive reader consults.
    pub vocabulary: Vocabulary,
    pub timings: Timings,
    /// Form constraint check used on submit.
    pub validator: Arc<dyn ConstraintValidator>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            timings: Timings::default(),
            validator: Arc::new(RequiredFields),
        }
    }
}

impl fmt::Debug for PageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageOptions")
            .field("vocabulary", &self.vocabulary)
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}
