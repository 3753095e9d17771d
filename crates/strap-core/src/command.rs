use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;

/// A side effect returned from [`Model::update`](crate::Model::update) or [`Model::init`](crate::Model::init).
///
/// Commands represent immediate messages, timers, async work and program
/// lifecycle actions. Behaviors use them for everything that happens later
/// than the current synchronous turn: the dismiss fade, the next-frame extent
/// write, the progress fill.
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Deliver a message after a delay:
/// let cmd = Command::delay(Duration::from_millis(150), Msg::RemovePanel(id));
///
/// // Write on the next frame:
/// let cmd = Command::next_frame(Msg::ApplyExtent(id));
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Action(Action<Msg>),
    Future(BoxFuture<'static, Msg>),
    /// One-shot timer delivering `msg` after `after`.
    Delay {
        after: Duration,
        msg: Msg,
    },
    /// Deliver `msg` at the next frame boundary.
    Frame(Msg),
    Batch(Vec<Command<Msg>>),
}

/// Internal action variants handled synchronously by the runtime.
pub enum Action<Msg> {
    /// Send a message immediately (no async).
    Message(Msg),
    /// Quit the program.
    Quit,
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Run an async future, map the result to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// Send a message immediately.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Action(Action::Message(msg)),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Action(Action::Quit),
        }
    }

    /// One-shot timer: deliver `msg` once after `after`.
    pub fn delay(after: Duration, msg: Msg) -> Self {
        Command {
            inner: CommandInner::Delay { after, msg },
        }
    }

    /// Deliver `msg` at the next frame boundary.
    pub fn next_frame(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Frame(msg),
        }
    }

    /// Run multiple commands concurrently.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(std::sync::Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: std::sync::Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Action(Action::Message(msg)) => Command::message(f(msg)),
            CommandInner::Action(Action::Quit) => Command::quit(),
            CommandInner::Future(fut) => {
                let f = f.clone();
                Command {
                    inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
                }
            }
            CommandInner::Delay { after, msg } => Command::delay(after, f(msg)),
            CommandInner::Frame(msg) => Command::next_frame(f(msg)),
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(f.clone()))
                        .collect(),
                ),
            },
        }
    }

    // --- Inspection methods (useful for testing) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message action, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Action(Action::Message(msg)) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a one-shot timer, return its delay and message.
    pub fn into_delay(self) -> Option<(Duration, Msg)> {
        match self.inner {
            CommandInner::Delay { after, msg } => Some((after, msg)),
            _ => None,
        }
    }

    /// If this command is a next-frame write, return its message.
    pub fn into_frame(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Frame(msg) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }
}

impl<Msg: Send + 'static> Default for Command<Msg> {
    fn default() -> Self {
        Command::none()
    }
}

impl<Msg: Send + 'static> std::fmt::Debug for Command<Msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            CommandInner::None => f.write_str("Command::None"),
            CommandInner::Action(Action::Message(_)) => f.write_str("Command::Message"),
            CommandInner::Action(Action::Quit) => f.write_str("Command::Quit"),
            CommandInner::Future(_) => f.write_str("Command::Future"),
            CommandInner::Delay { after, .. } => write!(f, "Command::Delay({after:?})"),
            CommandInner::Frame(_) => f.write_str("Command::Frame"),
            CommandInner::Batch(cmds) => f.debug_tuple("Command::Batch").field(cmds).finish(),
        }
    }
}
