use crate::dom::ElementId;

/// Interaction categories the page root listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A pointer or keyboard activation.
    Click,
    /// The pointer entered an element.
    MouseEnter,
    /// The pointer left an element.
    MouseLeave,
    /// A form was submitted.
    Submit,
}

/// A user interaction delivered to the page root, attributed to the element
/// it originated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    /// Category of the interaction.
    pub kind: EventKind,
    /// The element the interaction originated on.
    pub origin: ElementId,
}

impl Interaction {
    /// Create an interaction of the given kind.
    pub fn new(kind: EventKind, origin: ElementId) -> Self {
        Self { kind, origin }
    }

    /// A click on `origin`.
    pub fn click(origin: ElementId) -> Self {
        Self::new(EventKind::Click, origin)
    }

    /// The pointer entering `origin`.
    pub fn mouse_enter(origin: ElementId) -> Self {
        Self::new(EventKind::MouseEnter, origin)
    }

    /// The pointer leaving `origin`.
    pub fn mouse_leave(origin: ElementId) -> Self {
        Self::new(EventKind::MouseLeave, origin)
    }

    /// A submit of the form `origin`.
    pub fn submit(origin: ElementId) -> Self {
        Self::new(EventKind::Submit, origin)
    }
}

/// What a host should do with the native event after dispatch.
///
/// Outcomes from several listeners merge with [`EventOutcome::merge`]; a flag
/// set by any listener stays set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The host's default action (navigation, form submission) is suppressed.
    pub default_prevented: bool,
    /// The event should not bubble further in the host.
    pub propagation_stopped: bool,
}

impl EventOutcome {
    /// Mark the default action as suppressed.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Mark propagation as stopped.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Combine two outcomes.
    pub fn merge(self, other: EventOutcome) -> Self {
        Self {
            default_prevented: self.default_prevented || other.default_prevented,
            propagation_stopped: self.propagation_stopped || other.propagation_stopped,
        }
    }
}
