//! The page model: the document plus every behavior's bookkeeping.
//!
//! [`Page`] implements [`Model`], so a host can run it under a
//! [`Program`](strap_core::Program) and feed it interactions through the
//! program handle, or drive it directly through [`Page::dispatch`] and the
//! entry points.

use crate::carousel::CarouselRegistry;
use crate::deferred::Deferred;
use crate::dispatch::{Dispatcher, Listener};
use crate::options::PageOptions;
use crate::tooltip::TooltipTable;
use crate::{alert, collapse, dropdown, modal, progress, tabs, validation};
use strap_core::directive::{self, Directive, DirectiveKind};
use strap_core::dom::{Document, ElementId};
use strap_core::{Command, EventKind, EventOutcome, Interaction, Model, Subscription};

/// Whether the host document has finished loading when the page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// The host sends [`PageMsg::ContentLoaded`] once it is ready.
    Loading,
    /// Initialization is queued immediately.
    #[default]
    Complete,
}

/// Startup data for a [`Page`].
#[derive(Debug)]
pub struct PageFlags {
    pub document: Document,
    pub options: PageOptions,
    pub ready_state: ReadyState,
}

impl PageFlags {
    /// A loaded document with default options.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            options: PageOptions::default(),
            ready_state: ReadyState::Complete,
        }
    }

    pub fn with_options(mut self, options: PageOptions) -> Self {
        self.options = options;
        self
    }

    /// Wait for [`PageMsg::ContentLoaded`] instead of initializing at once.
    pub fn loading(mut self) -> Self {
        self.ready_state = ReadyState::Loading;
        self
    }
}

/// Programmatic entry points, invocable through [`PageMsg::Invoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Init,
    InitAlerts,
    InitModals,
    InitDropdowns,
    InitCollapse,
    InitTooltips,
    InitFormValidation,
    /// Register the slide listener and re-scan the page for slide groups.
    InitCarousels,
    InitTabs,
    AnimateProgressBars,
    ShowSlide { carousel: ElementId, index: usize },
    NextSlide(ElementId),
    PrevSlide(ElementId),
    PauseCarousel(ElementId),
    ResumeCarousel(ElementId),
    ReleaseDetachedCarousels,
}

/// Messages a [`Page`] handles.
#[derive(Debug, Clone, PartialEq)]
pub enum PageMsg {
    /// The host document finished loading.
    ContentLoaded,
    /// A user interaction reached the page root.
    Interact(Interaction),
    /// A delayed or next-frame write came due.
    Deferred(Deferred),
    /// Auto-play tick for the slide group rooted at the element.
    AutoAdvance(ElementId),
    Invoke(EntryPoint),
}

/// A document with the behavior layer attached.
#[derive(Debug)]
pub struct Page {
    document: Document,
    options: PageOptions,
    dispatcher: Dispatcher,
    carousels: CarouselRegistry,
    tooltips: TooltipTable,
    loaded: bool,
    last_outcome: EventOutcome,
}

impl Page {
    /// Attach to `document` without registering anything yet.
    pub fn new(document: Document, options: PageOptions) -> Self {
        Self {
            document,
            options,
            dispatcher: Dispatcher::default(),
            carousels: CarouselRegistry::default(),
            tooltips: TooltipTable::default(),
            loaded: false,
            last_outcome: EventOutcome::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for hosts that change the markup between interactions.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn options(&self) -> &PageOptions {
        &self.options
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn carousels(&self) -> &CarouselRegistry {
        &self.carousels
    }

    pub fn tooltips(&self) -> &TooltipTable {
        &self.tooltips
    }

    /// Whether initialization has run.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Outcome of the most recent interaction delivered as a message.
    pub fn last_outcome(&self) -> EventOutcome {
        self.last_outcome
    }

    // --- Entry points ---

    /// Register every listener, discover slide groups and animate progress
    /// bars.
    pub fn init(&mut self) -> Command<PageMsg> {
        self.loaded = true;
        self.init_alerts();
        self.init_modals();
        self.init_dropdowns();
        self.init_collapse();
        self.init_tooltips();
        self.init_form_validation();
        self.init_carousels();
        self.init_tabs();
        let cmd = self.animate_progress_bars();
        tracing::debug!(listeners = self.dispatcher.listeners().len(), "page initialized");
        cmd
    }

    pub fn init_alerts(&mut self) -> bool {
        self.dispatcher.register(Listener::Alerts)
    }

    pub fn init_modals(&mut self) -> bool {
        self.dispatcher.register(Listener::Modals)
    }

    pub fn init_dropdowns(&mut self) -> bool {
        self.dispatcher.register(Listener::Dropdowns)
    }

    pub fn init_collapse(&mut self) -> bool {
        self.dispatcher.register(Listener::Collapse)
    }

    pub fn init_tooltips(&mut self) -> bool {
        self.dispatcher.register(Listener::Tooltips)
    }

    pub fn init_form_validation(&mut self) -> bool {
        self.dispatcher.register(Listener::FormValidation)
    }

    /// Register the slide listener and (re-)discover slide groups. Returns
    /// the number of groups found.
    pub fn init_carousels(&mut self) -> usize {
        self.dispatcher.register(Listener::Carousels);
        self.carousels
            .scan(&mut self.document, &self.options.vocabulary)
    }

    pub fn init_tabs(&mut self) -> bool {
        self.dispatcher.register(Listener::Tabs)
    }

    pub fn animate_progress_bars(&mut self) -> Command<PageMsg> {
        progress::animate(&mut self.document, self.options.timings.progress_delay)
            .map(PageMsg::Deferred)
    }

    pub fn show_slide(&mut self, carousel: ElementId, index: usize) -> bool {
        self.carousels.show_slide(&mut self.document, carousel, index)
    }

    pub fn next_slide(&mut self, carousel: ElementId) -> bool {
        self.carousels.next_slide(&mut self.document, carousel)
    }

    pub fn prev_slide(&mut self, carousel: ElementId) -> bool {
        self.carousels.prev_slide(&mut self.document, carousel)
    }

    pub fn pause_carousel(&mut self, carousel: ElementId) -> bool {
        self.carousels.pause(carousel)
    }

    pub fn resume_carousel(&mut self, carousel: ElementId) -> bool {
        self.carousels.resume(carousel)
    }

    /// Forget slide groups that have left the tree, stopping their timers.
    pub fn release_detached_carousels(&mut self) -> usize {
        self.carousels.release_detached(&self.document)
    }

    /// Run an entry point by name.
    pub fn invoke(&mut self, entry: EntryPoint) -> Command<PageMsg> {
        tracing::debug!(?entry, "entry point invoked");
        match entry {
            EntryPoint::Init => return self.init(),
            EntryPoint::AnimateProgressBars => return self.animate_progress_bars(),
            EntryPoint::InitAlerts => {
                self.init_alerts();
            }
            EntryPoint::InitModals => {
                self.init_modals();
            }
            EntryPoint::InitDropdowns => {
                self.init_dropdowns();
            }
            EntryPoint::InitCollapse => {
                self.init_collapse();
            }
            EntryPoint::InitTooltips => {
                self.init_tooltips();
            }
            EntryPoint::InitFormValidation => {
                self.init_form_validation();
            }
            EntryPoint::InitCarousels => {
                self.init_carousels();
            }
            EntryPoint::InitTabs => {
                self.init_tabs();
            }
            EntryPoint::ShowSlide { carousel, index } => {
                self.show_slide(carousel, index);
            }
            EntryPoint::NextSlide(carousel) => {
                self.next_slide(carousel);
            }
            EntryPoint::PrevSlide(carousel) => {
                self.prev_slide(carousel);
            }
            EntryPoint::PauseCarousel(carousel) => {
                self.pause_carousel(carousel);
            }
            EntryPoint::ResumeCarousel(carousel) => {
                self.resume_carousel(carousel);
            }
            EntryPoint::ReleaseDetachedCarousels => {
                self.release_detached_carousels();
            }
        }
        Command::none()
    }

    // --- Dispatch ---

    /// Route one interaction to the behavior its directive names.
    ///
    /// Returns what the host should do with the native event and the
    /// deferred work the behavior scheduled.
    pub fn dispatch(&mut self, interaction: Interaction) -> (EventOutcome, Command<PageMsg>) {
        let mut outcome = EventOutcome::default();
        let origin = interaction.origin;
        if !self.document.is_connected(origin) {
            tracing::trace!(origin = origin.to_bits(), "interaction on detached element ignored");
            return (outcome, Command::none());
        }
        if !self.dispatcher.listens_for(interaction.kind) {
            tracing::trace!(kind = ?interaction.kind, "no listener for category");
            return (outcome, Command::none());
        }

        let routed = directive::read(&self.document, &self.options.vocabulary, interaction)
            .and_then(|d| self.dispatcher.route(d.kind).map(|listener| (listener, d)));

        if interaction.kind == EventKind::Click
            && self.dispatcher.is_registered(Listener::Dropdowns)
            && !matches!(routed, Some((Listener::Dropdowns, _)))
        {
            dropdown::close_all(&mut self.document, None);
        }

        let Some((listener, directive)) = routed else {
            return (outcome, Command::none());
        };
        tracing::debug!(
            ?listener,
            kind = ?directive.kind,
            activator = directive.activator.to_bits(),
            target = directive.target.to_bits(),
            "dispatching directive"
        );
        let cmd = self.apply(directive, &mut outcome);
        (outcome, cmd)
    }

    fn apply(&mut self, directive: Directive, outcome: &mut EventOutcome) -> Command<PageMsg> {
        let Directive {
            kind,
            activator,
            target,
        } = directive;
        let doc = &mut self.document;
        match kind {
            DirectiveKind::Dismiss => {
                return alert::dismiss(doc, target, self.options.timings.dismiss_delay)
                    .map(PageMsg::Deferred);
            }
            DirectiveKind::OpenOverlay => modal::open(doc, target),
            DirectiveKind::CloseOverlay => modal::close(doc, target),
            DirectiveKind::ToggleMenu => {
                outcome.prevent_default();
                dropdown::toggle(doc, target);
            }
            DirectiveKind::ToggleCollapse => {
                outcome.prevent_default();
                return collapse::toggle(doc, target).map(PageMsg::Deferred);
            }
            DirectiveKind::SwitchTab => {
                outcome.prevent_default();
                tabs::switch(doc, activator, target);
            }
            DirectiveKind::ControlSlide(control) => {
                self.carousels.control(doc, target, control);
            }
            DirectiveKind::ShowTooltip => {
                self.tooltips.prune(doc);
                self.tooltips.show(doc, &self.options.vocabulary, activator);
            }
            DirectiveKind::HideTooltip => {
                self.tooltips.hide(doc, activator);
                self.tooltips.prune(doc);
            }
            DirectiveKind::PauseSlides => {
                self.carousels.pause(target);
            }
            DirectiveKind::ResumeSlides => {
                self.carousels.resume(target);
            }
            DirectiveKind::ValidateForm => {
                *outcome = outcome.merge(validation::validate(
                    doc,
                    target,
                    self.options.validator.as_ref(),
                ));
            }
        }
        Command::none()
    }
}

impl Model for Page {
    type Message = PageMsg;
    type Flags = PageFlags;

    fn init(flags: PageFlags) -> (Self, Command<PageMsg>) {
        let page = Page::new(flags.document, flags.options);
        let cmd = match flags.ready_state {
            ReadyState::Complete => Command::message(PageMsg::ContentLoaded),
            ReadyState::Loading => Command::none(),
        };
        (page, cmd)
    }

    fn update(&mut self, msg: PageMsg) -> Command<PageMsg> {
        match msg {
            PageMsg::ContentLoaded => {
                if self.loaded {
                    tracing::trace!("content loaded again, ignoring");
                    return Command::none();
                }
                self.init()
            }
            PageMsg::Interact(interaction) => {
                let (outcome, cmd) = self.dispatch(interaction);
                self.last_outcome = outcome;
                cmd
            }
            PageMsg::Deferred(deferred) => {
                deferred.apply(&mut self.document);
                Command::none()
            }
            PageMsg::AutoAdvance(root) => {
                self.carousels.auto_advance(&mut self.document, root);
                Command::none()
            }
            PageMsg::Invoke(entry) => self.invoke(entry),
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<PageMsg>> {
        self.carousels
            .subscriptions(self.options.timings.slide_interval)
            .into_iter()
            .map(|sub| sub.map(PageMsg::AutoAdvance))
            .collect()
    }
}
