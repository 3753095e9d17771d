//! Page-root listener registry.
//!
//! Each behavior subscribes once per interaction category it cares about,
//! never per element. Routing is a pure lookup from directive kind to the
//! registered listener.

use strap_core::{DirectiveKind, EventKind};

/// A behavior's page-root listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    Alerts,
    Modals,
    Dropdowns,
    Collapse,
    Tooltips,
    FormValidation,
    Carousels,
    Tabs,
}

impl Listener {
    /// Every listener, in registration order of a full init.
    pub const ALL: [Listener; 8] = [
        Listener::Alerts,
        Listener::Modals,
        Listener::Dropdowns,
        Listener::Collapse,
        Listener::Tooltips,
        Listener::FormValidation,
        Listener::Carousels,
        Listener::Tabs,
    ];

    /// Interaction categories this listener subscribes to.
    pub fn categories(self) -> &'static [EventKind] {
        match self {
            Listener::Alerts
            | Listener::Modals
            | Listener::Dropdowns
            | Listener::Collapse
            | Listener::Tabs => &[EventKind::Click],
            Listener::Tooltips => &[EventKind::MouseEnter, EventKind::MouseLeave],
            Listener::FormValidation => &[EventKind::Submit],
            Listener::Carousels => &[EventKind::Click, EventKind::MouseEnter, EventKind::MouseLeave],
        }
    }

    /// Whether this listener acts on directives of `kind`.
    pub fn handles(self, kind: DirectiveKind) -> bool {
        use DirectiveKind as K;
        match self {
            Listener::Alerts => kind == K::Dismiss,
            Listener::Modals => matches!(kind, K::OpenOverlay | K::CloseOverlay),
            Listener::Dropdowns => kind == K::ToggleMenu,
            Listener::Collapse => kind == K::ToggleCollapse,
            Listener::Tooltips => matches!(kind, K::ShowTooltip | K::HideTooltip),
            Listener::FormValidation => kind == K::ValidateForm,
            Listener::Carousels => {
                matches!(kind, K::ControlSlide(_) | K::PauseSlides | K::ResumeSlides)
            }
            Listener::Tabs => kind == K::SwitchTab,
        }
    }
}

/// The set of registered listeners.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    registered: Vec<Listener>,
}

impl Dispatcher {
    /// Register `listener`. Returns `false` when it was already registered.
    pub fn register(&mut self, listener: Listener) -> bool {
        if self.registered.contains(&listener) {
            tracing::trace!(?listener, "listener already registered");
            return false;
        }
        tracing::debug!(?listener, categories = ?listener.categories(), "listener registered");
        self.registered.push(listener);
        true
    }

    pub fn is_registered(&self, listener: Listener) -> bool {
        self.registered.contains(&listener)
    }

    /// Whether any registered listener subscribes to `kind`.
    pub fn listens_for(&self, kind: EventKind) -> bool {
        self.registered
            .iter()
            .any(|l| l.categories().contains(&kind))
    }

    /// The registered listener for directives of `kind`.
    pub fn route(&self, kind: DirectiveKind) -> Option<Listener> {
        self.registered.iter().copied().find(|l| l.handles(kind))
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.registered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strap_core::SlideControl;

    #[test]
    fn registration_is_idempotent() {
        let mut dispatcher = Dispatcher::default();
        assert!(dispatcher.register(Listener::Alerts));
        assert!(!dispatcher.register(Listener::Alerts));
        assert_eq!(dispatcher.listeners(), &[Listener::Alerts]);
    }

    #[test]
    fn routes_only_to_registered_listeners() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.register(Listener::Carousels);
        assert_eq!(
            dispatcher.route(DirectiveKind::ControlSlide(SlideControl::Next)),
            Some(Listener::Carousels)
        );
        assert_eq!(dispatcher.route(DirectiveKind::Dismiss), None);
        assert!(dispatcher.listens_for(EventKind::MouseEnter));
        assert!(!dispatcher.listens_for(EventKind::Submit));
    }

    #[test]
    fn every_directive_kind_has_exactly_one_listener() {
        use DirectiveKind as K;
        let kinds = [
            K::Dismiss,
            K::OpenOverlay,
            K::CloseOverlay,
            K::ToggleMenu,
            K::ToggleCollapse,
            K::SwitchTab,
            K::ControlSlide(SlideControl::Prev),
            K::ShowTooltip,
            K::HideTooltip,
            K::PauseSlides,
            K::ResumeSlides,
            K::ValidateForm,
        ];
        for kind in kinds {
            let owners = Listener::ALL.iter().filter(|l| l.handles(kind)).count();
            assert_eq!(owners, 1, "{kind:?}");
        }
    }
}
