use crate::command::{Action, Command, CommandInner};
use crate::model::Model;
use crate::runtime::ProgramOptions;
use crate::subscription::{Subscription, SubscriptionId};
use std::collections::VecDeque;
use std::time::Duration;

/// A headless test harness that drives a [`Model`] on a virtual clock.
///
/// `TestProgram` lets you exercise the init/update cycle in a plain `#[test]`
/// function -- no tokio runtime required.  Immediate commands (e.g.
/// [`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages).  Timers
/// ([`Command::delay`], [`Command::next_frame`] and subscriptions) wait on a
/// virtual clock that only moves when you call
/// [`advance`](TestProgram::advance).  Async futures are ignored.
///
/// Due timers fire in (due time, scheduling order) order, and the immediate
/// messages produced by one firing are drained before the next one fires.
///
/// # Example
///
/// ```rust,ignore
/// use strap_core::testing::TestProgram;
///
/// let mut prog = TestProgram::<Counter>::new(0);
/// prog.send(CounterMsg::IncrementLater);
/// prog.advance(Duration::from_millis(150));
/// assert_eq!(prog.model().count, 1);
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: VecDeque<M::Message>,
    timers: Vec<Timer<M::Message>>,
    subscriptions: Vec<Scheduled<M::Message>>,
    now: Duration,
    next_order: u64,
    frame_interval: Duration,
    quit: bool,
}

struct Timer<Msg> {
    due: Duration,
    order: u64,
    msg: Msg,
}

struct Scheduled<Msg: Send + 'static> {
    sub: Subscription<Msg>,
    due: Duration,
    order: u64,
}

enum Due {
    Timer(usize),
    Subscription(usize),
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    ///
    /// Immediate messages produced by `init` are queued; call
    /// [`drain_messages`](TestProgram::drain_messages) to process them.
    pub fn new(flags: M::Flags) -> Self {
        Self::with_options(flags, &ProgramOptions::default())
    }

    /// Like [`new`](TestProgram::new), taking the frame length from `options`.
    pub fn with_options(flags: M::Flags, options: &ProgramOptions) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: VecDeque::new(),
            timers: Vec::new(),
            subscriptions: Vec::new(),
            now: Duration::ZERO,
            next_order: 0,
            frame_interval: options.frame_interval,
            quit: false,
        };
        program.collect(init_cmd);
        program.reconcile();
        program
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// Immediate commands returned by `update` are queued; call
    /// [`drain_messages`](TestProgram::drain_messages) to flush them.
    pub fn send(&mut self, msg: M::Message) {
        self.update(msg);
    }

    /// Process all queued immediate messages, including the ones they
    /// produce, until the queue is empty.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.pending_messages.pop_front() {
            self.update(msg);
        }
    }

    /// Move the virtual clock forward by `duration`, firing every timer and
    /// subscription tick that falls due on the way.
    pub fn advance(&mut self, duration: Duration) {
        let target = self.now + duration;
        self.drain_messages();
        while let Some(due) = self.next_due(target) {
            match due {
                Due::Timer(index) => {
                    let timer = self.timers.remove(index);
                    self.now = timer.due;
                    self.update(timer.msg);
                }
                Due::Subscription(index) => {
                    let scheduled = &mut self.subscriptions[index];
                    self.now = scheduled.due;
                    let msg = scheduled.sub.fire();
                    scheduled.due += period(&scheduled.sub);
                    scheduled.order = self.next_order;
                    self.next_order += 1;
                    self.update(msg);
                }
            }
            self.drain_messages();
        }
        self.now = target;
    }

    /// Advance by one frame.
    pub fn advance_frame(&mut self) {
        self.advance(self.frame_interval);
    }

    /// Virtual time elapsed since init.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of one-shot timers (delays and frame callbacks) not yet fired.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of running subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether a subscription with `id` is running.
    pub fn is_subscribed(&self, id: &SubscriptionId) -> bool {
        self.subscriptions.iter().any(|s| &s.sub.id == id)
    }

    /// Whether the model returned [`Command::quit`].
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    ///
    /// This bypasses the normal message-driven update cycle, and the
    /// subscription set is not re-evaluated until the next update.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    fn update(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
        self.reconcile();
    }

    fn next_due(&self, target: Duration) -> Option<Due> {
        let timers = self
            .timers
            .iter()
            .enumerate()
            .map(|(i, t)| ((t.due, t.order), Due::Timer(i)));
        let subs = self
            .subscriptions
            .iter()
            .enumerate()
            .map(|(i, s)| ((s.due, s.order), Due::Subscription(i)));
        timers
            .chain(subs)
            .filter(|((due, _), _)| *due <= target)
            .min_by_key(|(key, _)| *key)
            .map(|(_, due)| due)
    }

    fn schedule(&mut self, after: Duration, msg: M::Message) {
        let order = self.next_order;
        self.next_order += 1;
        self.timers.push(Timer {
            due: self.now + after,
            order,
            msg,
        });
    }

    fn reconcile(&mut self) {
        let declared = self.model.subscriptions();
        self.subscriptions
            .retain(|running| declared.iter().any(|d| d.id == running.sub.id));
        for sub in declared {
            if self.is_subscribed(&sub.id) {
                continue;
            }
            let order = self.next_order;
            self.next_order += 1;
            self.subscriptions.push(Scheduled {
                due: self.now + period(&sub),
                order,
                sub,
            });
        }
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Action(Action::Message(msg)) => {
                self.pending_messages.push_back(msg);
            }
            CommandInner::Action(Action::Quit) => self.quit = true,
            CommandInner::Delay { after, msg } => self.schedule(after, msg),
            CommandInner::Frame(msg) => self.schedule(self.frame_interval, msg),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
            // Async commands can't be executed synchronously in tests
            CommandInner::Future(_) => {}
        }
    }
}

fn period<Msg: Send + 'static>(sub: &Subscription<Msg>) -> Duration {
    sub.interval.max(Duration::from_millis(1))
}
