use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A repeating timer managed by the runtime.
///
/// Subscriptions are declared in [`Model::subscriptions`](crate::Model::subscriptions) and automatically
/// started or stopped through diffing: the runtime compares the set of
/// subscriptions returned on each update cycle and starts any new ones while
/// stopping any that are no longer present. A subscription that stays in the
/// set keeps its phase.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) interval: Duration,
    pub(crate) make: Arc<dyn Fn() -> Msg + Send + Sync>,
}

/// Identity for diffing subscriptions between update cycles.
///
/// Each subscription carries a `SubscriptionId` composed of a Rust [`TypeId`]
/// and a numeric discriminant. The runtime uses this to determine which
/// subscriptions are new, unchanged, or removed when reconciling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// Create an ID from a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// Create an ID from a type alone (for singletons).
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// Create an ID from a type and a string discriminant.
    pub fn with_str<T: 'static>(s: &str) -> Self {
        let mut hasher = std::hash::DefaultHasher::new();
        s.hash(&mut hasher);
        Self::new::<T>(hasher.finish())
    }
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// A timer that produces a message every `interval`. The first message
    /// arrives one full interval after the subscription starts.
    pub fn every(
        id: SubscriptionId,
        interval: Duration,
        make: impl Fn() -> Msg + Send + Sync + 'static,
    ) -> Self {
        Subscription {
            id,
            interval,
            make: Arc::new(make),
        }
    }

    /// The identity used for diffing.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Period between messages.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Produce the message for one tick.
    pub fn fire(&self) -> Msg {
        (self.make)()
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let make = self.make;
        Subscription {
            id: self.id,
            interval: self.interval,
            make: Arc::new(move || f(make())),
        }
    }

    fn spawn(self, tx: mpsc::UnboundedSender<Msg>) -> AbortHandle {
        let period = self.interval.max(Duration::from_millis(1));
        let make = self.make;
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticks =
                tokio_stream::wrappers::IntervalStream::new(tokio::time::interval_at(start, period));
            while ticks.next().await.is_some() {
                if tx.send(make()).is_err() {
                    break;
                }
            }
        });
        handle.abort_handle()
    }
}

/// Manages active subscriptions, performing diffing between cycles.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Diff new subscriptions against active ones.
    /// Start new ones, stop removed ones, keep unchanged ones.
    pub fn reconcile(&mut self, new_subs: Vec<Subscription<Msg>>) {
        let mut new_ids: HashMap<SubscriptionId, Subscription<Msg>> = HashMap::new();
        for sub in new_subs {
            new_ids.insert(sub.id.clone(), sub);
        }

        // Stop subscriptions that are no longer present
        let to_remove: Vec<SubscriptionId> = self
            .active
            .keys()
            .filter(|id| !new_ids.contains_key(id))
            .cloned()
            .collect();

        for id in to_remove {
            if let Some(handle) = self.active.remove(&id) {
                tracing::trace!(?id, "stopping subscription");
                handle.abort();
            }
        }

        // Start subscriptions that are new
        for (id, sub) in new_ids {
            if !self.active.contains_key(&id) {
                tracing::trace!(?id, interval = ?sub.interval, "starting subscription");
                let handle = sub.spawn(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort all active subscriptions.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    /// Number of active subscriptions (for testing).
    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hourly(id: SubscriptionId) -> Subscription<i32> {
        Subscription::every(id, Duration::from_secs(3600), || 1)
    }

    #[test]
    fn subscription_id_equality() {
        let id1 = SubscriptionId::of::<String>();
        let id2 = SubscriptionId::of::<String>();
        assert_eq!(id1, id2);
    }

    #[test]
    fn subscription_id_different_types() {
        let id1 = SubscriptionId::of::<String>();
        let id2 = SubscriptionId::of::<i32>();
        assert_ne!(id1, id2);
    }

    #[test]
    fn subscription_id_with_discriminant() {
        let id1 = SubscriptionId::new::<String>(1);
        let id2 = SubscriptionId::new::<String>(2);
        assert_ne!(id1, id2);
    }

    #[test]
    fn subscription_id_with_str() {
        let id1 = SubscriptionId::with_str::<String>("a");
        let id2 = SubscriptionId::with_str::<String>("b");
        assert_ne!(id1, id2);

        let id3 = SubscriptionId::with_str::<String>("a");
        assert_eq!(id1, id3);
    }

    #[test]
    fn map_composes_message_factory() {
        let sub = Subscription::every(SubscriptionId::of::<u8>(), Duration::from_secs(1), || 20)
            .map(|n: i32| n + 1);
        assert_eq!(sub.fire(), 21);
        assert_eq!(sub.interval(), Duration::from_secs(1));
        assert_eq!(sub.id(), &SubscriptionId::of::<u8>());
    }

    #[tokio::test]
    async fn subscription_manager_starts_new() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![hourly(SubscriptionId::of::<String>())]);
        assert_eq!(manager.active_count(), 1);
    }

    #[tokio::test]
    async fn subscription_manager_stops_removed() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![hourly(SubscriptionId::of::<String>())]);
        assert_eq!(manager.active_count(), 1);

        // Reconcile with empty should stop the subscription
        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn subscription_manager_keeps_existing() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        let id = SubscriptionId::of::<String>();
        manager.reconcile(vec![hourly(id.clone())]);

        // Reconcile with same ID should keep it
        manager.reconcile(vec![hourly(id)]);
        assert_eq!(manager.active_count(), 1);
    }

    #[tokio::test]
    async fn subscription_manager_shutdown() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![
            hourly(SubscriptionId::new::<String>(1)),
            hourly(SubscriptionId::new::<String>(2)),
        ]);
        assert_eq!(manager.active_count(), 2);

        manager.shutdown();
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_arrives_after_one_period() {
        let (tx, mut rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        manager.reconcile(vec![Subscription::every(
            SubscriptionId::of::<u8>(),
            Duration::from_millis(50),
            || 7,
        )]);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(45)).await;
        assert_eq!(rx.recv().await, Some(7));
        manager.shutdown();
    }
}
