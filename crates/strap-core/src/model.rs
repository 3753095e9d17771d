use crate::command::Command;
use crate::subscription::Subscription;

/// The top-level state machine trait, following the [Elm Architecture].
///
/// The runtime drives a continuous **init -> update** cycle:
///
/// 1. [`init`](Model::init) creates the initial state and may return a
///    [`Command`] for early side effects.
/// 2. External events arrive as messages, either injected by the host
///    through a [`ProgramHandle`](crate::ProgramHandle) or produced by
///    [`Subscription`]s and commands.
/// 3. [`update`](Model::update) processes each message, mutates state, and
///    optionally returns a [`Command`] for further work.
/// 4. [`subscriptions`](Model::subscriptions) is re-evaluated after every
///    update and diffed against the running set.
///
/// There is no view step: the model's state *is* the host-visible surface
/// (for a page, the document the host renders from).
///
/// # Example
///
/// ```rust
/// use strap_core::{Command, Model};
///
/// struct Counter {
///     count: i32,
/// }
///
/// enum Msg {
///     Increment,
///     Decrement,
/// }
///
/// impl Model for Counter {
///     type Message = Msg;
///     type Flags = ();
///
///     fn init(_flags: ()) -> (Self, Command<Msg>) {
///         (Counter { count: 0 }, Command::none())
///     }
///
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Increment => self.count += 1,
///             Msg::Decrement => self.count -= 1,
///         }
///         Command::none()
///     }
/// }
/// ```
///
/// [Elm Architecture]: https://guide.elm-lang.org/architecture/
pub trait Model: Sized + Send + 'static {
    /// The model's message type.
    ///
    /// Every event that can affect the state is represented as a variant of
    /// this type.
    type Message: Send + 'static;

    /// Initialization data passed to [`Model::init`].
    ///
    /// Use `()` when no startup data is needed.
    type Flags: Send + 'static;

    /// Create the initial model state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Declare active subscriptions.  Called after every update.
    ///
    /// The runtime diffs the returned list against the previously active set:
    /// new subscriptions are started and removed ones are cancelled.
    ///
    /// The default implementation returns an empty list (no subscriptions).
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
