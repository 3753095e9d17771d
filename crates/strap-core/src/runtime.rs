use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Notify};

/// Errors that can occur while running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error, e.g. from installing the signal handler.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration options for a [`Program`].
///
/// All fields have sensible defaults (see [`Default`] impl).  Use struct
/// update syntax to override only the options you need:
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use strap_core::ProgramOptions;
///
/// let opts = ProgramOptions {
///     frame_interval: Duration::from_millis(8),
///     ..ProgramOptions::default()
/// };
/// assert!(opts.handle_signals);
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Length of one frame; [`Command::next_frame`] fires after this long
    /// (default: 16ms).
    pub frame_interval: Duration,
    /// Whether ctrl-c ends the program gracefully (default: true).
    pub handle_signals: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            handle_signals: true,
        }
    }
}

/// A cloneable handle to a running [`Program`] for external control.
///
/// `ProgramHandle` is [`Clone`] and can safely be sent across threads or into
/// async tasks.  It provides two capabilities:
///
/// * [`send`](ProgramHandle::send) -- inject a message into the program's
///   event loop from outside (this is how a host delivers interactions).
/// * [`kill`](ProgramHandle::kill) -- force the program to exit.
///
/// Obtain a handle by calling [`Program::handle`] before entering the run
/// loop.
#[derive(Clone)]
pub struct ProgramHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    killed: Arc<Notify>,
}

impl<Msg: Send + 'static> ProgramHandle<Msg> {
    /// Send a message to the running program.
    ///
    /// Returns silently if the program has already exited.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Force-kill the program.
    ///
    /// The program exits at the next opportunity without processing
    /// remaining messages.
    pub fn kill(&self) {
        self.killed.notify_one();
    }
}

/// The program runtime.  Owns a [`Model`] and drives its init/update cycle
/// until the model returns [`Command::quit()`], a handle kills it, or the
/// process receives ctrl-c.
///
/// # Example
///
/// ```rust,ignore
/// use strap_core::{Program, ProgramError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let program = Program::<MyModel>::new(flags);
///     let handle = program.handle();
///     // hand `handle` to whatever delivers host events
///     let model = program.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscription_manager: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    should_quit: bool,
    killed: Arc<Notify>,
    pending_init: Option<Command<M::Message>>,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Self {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// [`Model::init`] runs here; its command is executed once the program
    /// starts running.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let subscription_manager = SubscriptionManager::new(msg_tx.clone());

        Self {
            model,
            msg_tx,
            msg_rx,
            subscription_manager,
            options,
            should_quit: false,
            killed: Arc::new(Notify::new()),
            pending_init: Some(init_cmd),
        }
    }

    /// Get a handle for external control (send messages, force-kill).
    pub fn handle(&self) -> ProgramHandle<M::Message> {
        ProgramHandle {
            msg_tx: self.msg_tx.clone(),
            killed: self.killed.clone(),
        }
    }

    /// The model in its current state.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run the program. Resolves with the final model after quit.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        tracing::debug!("program started");
        if let Some(cmd) = self.pending_init.take() {
            self.execute_command(cmd);
        }
        let subs = self.model.subscriptions();
        self.subscription_manager.reconcile(subs);

        let result = self.event_loop().await;

        tracing::debug!("shutting down");
        self.subscription_manager.shutdown();
        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        let handle_signals = self.options.handle_signals;
        let killed = self.killed.clone();

        loop {
            if self.should_quit {
                return Ok(());
            }

            tokio::select! {
                biased;

                () = killed.notified() => {
                    tracing::debug!("program killed");
                    return Ok(());
                }

                result = tokio::signal::ctrl_c(), if handle_signals => {
                    result?;
                    tracing::debug!("received ctrl+c signal");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);

                    // Micro-batch: drain additional messages within 100μs, up to 100 messages
                    let deadline = Instant::now() + Duration::from_micros(100);
                    let mut batch_count = 0u32;
                    while !self.should_quit && Instant::now() < deadline && batch_count < 100 {
                        match self.msg_rx.try_recv() {
                            Ok(msg) => {
                                self.process_message(msg);
                                batch_count += 1;
                            }
                            Err(_) => break,
                        }
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);

        let subs = self.model.subscriptions();
        self.subscription_manager.reconcile(subs);
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Action(Action::Quit) => {
                self.should_quit = true;
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = fut.await;
                    let _ = tx.send(msg);
                });
            }
            CommandInner::Delay { after, msg } => self.send_after(after, msg),
            CommandInner::Frame(msg) => self.send_after(self.options.frame_interval, msg),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    fn send_after(&self, after: Duration, msg: M::Message) {
        let tx = self.msg_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(msg);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::{Subscription, SubscriptionId};

    struct Counter {
        count: i64,
        ticks: u32,
        ticking: bool,
    }

    #[derive(Debug)]
    enum Msg {
        Increment,
        IncrementLater(u64),
        Tick,
        Stop,
    }

    impl Model for Counter {
        type Message = Msg;
        type Flags = bool;

        fn init(ticking: bool) -> (Self, Command<Msg>) {
            (
                Counter {
                    count: 0,
                    ticks: 0,
                    ticking,
                },
                Command::none(),
            )
        }

        fn update(&mut self, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Increment => self.count += 1,
                Msg::IncrementLater(ms) => {
                    return Command::delay(Duration::from_millis(ms), Msg::Increment)
                }
                Msg::Tick => {
                    self.ticks += 1;
                    if self.ticks == 3 {
                        return Command::quit();
                    }
                }
                Msg::Stop => return Command::quit(),
            }
            Command::none()
        }

        fn subscriptions(&self) -> Vec<Subscription<Msg>> {
            if self.ticking {
                vec![Subscription::every(
                    SubscriptionId::of::<Counter>(),
                    Duration::from_millis(100),
                    || Msg::Tick,
                )]
            } else {
                vec![]
            }
        }
    }

    fn quiet() -> ProgramOptions {
        ProgramOptions {
            handle_signals: false,
            ..ProgramOptions::default()
        }
    }

    #[tokio::test]
    async fn handle_messages_reach_update() {
        let program = Program::<Counter>::with_options(false, quiet());
        let handle = program.handle();
        handle.send(Msg::Increment);
        handle.send(Msg::Increment);
        handle.send(Msg::Stop);
        let model = program.run().await.unwrap();
        assert_eq!(model.count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_message_arrives_after_duration() {
        let program = Program::<Counter>::with_options(false, quiet());
        let handle = program.handle();
        let task = tokio::spawn(program.run());

        handle.send(Msg::IncrementLater(150));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.send(Msg::Stop);

        let model = task.await.unwrap().unwrap();
        assert_eq!(model.count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn subscription_ticks_until_quit() {
        let start = tokio::time::Instant::now();
        let model = Program::<Counter>::with_options(true, quiet())
            .run()
            .await
            .unwrap();
        assert_eq!(model.ticks, 3);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn kill_stops_the_loop() {
        let program = Program::<Counter>::with_options(false, quiet());
        let handle = program.handle();
        handle.kill();
        let model = program.run().await.unwrap();
        assert_eq!(model.count, 0);
    }

    #[test]
    fn default_frame_is_sixteen_millis() {
        let options = ProgramOptions::default();
        assert_eq!(options.frame_interval, Duration::from_millis(16));
        assert!(options.handle_signals);
    }
}
