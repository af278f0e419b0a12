//! In-memory bus implementation for tests and local runs.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{BusError, Result};
use crate::traits::{EventHandler, EventPublisher, EventSubscriber};

/// One message sitting on a channel queue.
#[derive(Debug, Clone)]
struct Delivery {
    id: Uuid,
    payload: String,
    attempts: u32,
}

type HandlerMap = BTreeMap<String, (String, Arc<dyn EventHandler>)>;

/// Counts from one delivery round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Messages acknowledged by their handler.
    pub delivered: usize,
    /// Messages whose handler failed; they stay queued for redelivery.
    pub failed: usize,
}

/// In-memory, ordered-per-channel, at-least-once bus.
///
/// Each channel is a FIFO queue. [`InMemoryBus::deliver_pending`] drives one
/// delivery round: messages are handed to the channel's registered handler in
/// publish order, and a handler failure halts that channel's round so the
/// failed message is redelivered first next time. This mirrors the ordering
/// contract of a partitioned broker with a single consumer per partition.
#[derive(Clone, Default)]
pub struct InMemoryBus {
    queues: Arc<Mutex<BTreeMap<String, VecDeque<Delivery>>>>,
    handlers: Arc<std::sync::Mutex<HandlerMap>>,
    fail_publishes: Arc<AtomicBool>,
}

impl InMemoryBus {
    /// Creates a new empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent publish fail, for testing producer error paths.
    pub fn set_publish_failure(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of messages waiting on a channel.
    pub async fn pending(&self, channel: &str) -> usize {
        self.queues
            .lock()
            .await
            .get(channel)
            .map_or(0, VecDeque::len)
    }

    /// Returns the delivery attempts already made for the message at the
    /// front of a channel queue, if any.
    pub async fn front_attempts(&self, channel: &str) -> Option<u32> {
        self.queues
            .lock()
            .await
            .get(channel)
            .and_then(|q| q.front())
            .map(|d| d.attempts)
    }

    /// Runs one delivery round over every channel that has both pending
    /// messages and a registered handler.
    pub async fn deliver_pending(&self) -> DeliveryStats {
        let mut stats = DeliveryStats::default();
        let channels: Vec<String> = self.queues.lock().await.keys().cloned().collect();

        for channel in channels {
            stats = self.deliver_channel(&channel, stats).await;
        }

        stats
    }

    /// Keeps running delivery rounds until no round makes progress.
    ///
    /// Returns the accumulated stats. A permanently failing message leaves
    /// its channel blocked, so this terminates even with poison messages.
    pub async fn deliver_until_settled(&self) -> DeliveryStats {
        let mut total = DeliveryStats::default();
        loop {
            let round = self.deliver_pending().await;
            total.delivered += round.delivered;
            total.failed += round.failed;
            if round.delivered == 0 {
                return total;
            }
        }
    }

    fn handler_for(&self, channel: &str) -> Option<Arc<dyn EventHandler>> {
        self.handlers
            .lock()
            .expect("handler registry poisoned")
            .get(channel)
            .map(|(_, handler)| Arc::clone(handler))
    }

    async fn deliver_channel(&self, channel: &str, mut stats: DeliveryStats) -> DeliveryStats {
        // Snapshot how many messages this round may process so redelivered
        // messages do not spin the loop forever.
        let budget = self.pending(channel).await;

        for _ in 0..budget {
            let Some(handler) = self.handler_for(channel) else {
                return stats;
            };
            let Some(delivery) = self
                .queues
                .lock()
                .await
                .get_mut(channel)
                .and_then(VecDeque::pop_front)
            else {
                return stats;
            };

            // Handler runs without the queue lock held.
            match handler.handle(&delivery.payload).await {
                Ok(()) => {
                    stats.delivered += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        channel,
                        message_id = %delivery.id,
                        attempts = delivery.attempts + 1,
                        error = %err,
                        "handler failed; message queued for redelivery"
                    );
                    stats.failed += 1;
                    let mut queues = self.queues.lock().await;
                    queues
                        .entry(channel.to_string())
                        .or_default()
                        .push_front(Delivery {
                            attempts: delivery.attempts + 1,
                            ..delivery
                        });
                    // Ordering: nothing behind the failed message may run.
                    return stats;
                }
            }
        }

        stats
    }
}

#[async_trait::async_trait]
impl EventPublisher for InMemoryBus {
    async fn send(&self, channel: &str, payload: String) -> Result<()> {
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(BusError::Publish {
                channel: channel.to_string(),
                reason: "publish failure injected".to_string(),
            });
        }
        self.queues
            .lock()
            .await
            .entry(channel.to_string())
            .or_default()
            .push_back(Delivery {
                id: Uuid::new_v4(),
                payload,
                attempts: 0,
            });
        Ok(())
    }
}

impl EventSubscriber for InMemoryBus {
    fn subscribe(&self, channel: &str, group: &str, handler: Arc<dyn EventHandler>) {
        self.handlers
            .lock()
            .expect("handler registry poisoned")
            .insert(channel.to_string(), (group.to_string(), handler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::HandlerResult;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Mutex as AsyncMutex;

    struct Recorder {
        seen: AsyncMutex<Vec<String>>,
        fail_payload: Option<String>,
        failures: AtomicUsize,
    }

    impl Recorder {
        fn new(fail_payload: Option<&str>) -> Self {
            Self {
                seen: AsyncMutex::new(Vec::new()),
                fail_payload: fail_payload.map(str::to_string),
                failures: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, payload: &str) -> HandlerResult {
            if self.fail_payload.as_deref() == Some(payload) {
                self.failures.fetch_add(1, Ordering::SeqCst);
                return Err("boom".into());
            }
            self.seen.lock().await.push(payload.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn delivers_in_publish_order() {
        let bus = InMemoryBus::new();
        let recorder = Arc::new(Recorder::new(None));
        bus.subscribe("ch", "test-group", recorder.clone());

        for n in 0..5 {
            bus.send("ch", format!("m{n}")).await.unwrap();
        }
        let stats = bus.deliver_pending().await;

        assert_eq!(stats.delivered, 5);
        assert_eq!(stats.failed, 0);
        let seen = recorder.seen.lock().await;
        assert_eq!(*seen, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn failed_message_blocks_channel_and_is_redelivered_first() {
        let bus = InMemoryBus::new();
        let recorder = Arc::new(Recorder::new(Some("bad")));
        bus.subscribe("ch", "test-group", recorder.clone());

        bus.send("ch", "ok1".to_string()).await.unwrap();
        bus.send("ch", "bad".to_string()).await.unwrap();
        bus.send("ch", "ok2".to_string()).await.unwrap();

        let stats = bus.deliver_pending().await;
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(bus.pending("ch").await, 2);
        assert_eq!(bus.front_attempts("ch").await, Some(1));

        // Next round retries the same message first.
        let stats = bus.deliver_pending().await;
        assert_eq!(stats.failed, 1);
        assert_eq!(recorder.failures.load(Ordering::SeqCst), 2);
        let seen = recorder.seen.lock().await;
        assert_eq!(*seen, vec!["ok1"]);
    }

    #[tokio::test]
    async fn publish_failure_injection_returns_error() {
        let bus = InMemoryBus::new();
        bus.set_publish_failure(true);
        let err = bus.send("ch", "x".to_string()).await.unwrap_err();
        assert!(matches!(err, BusError::Publish { .. }));
        assert_eq!(bus.pending("ch").await, 0);
    }

    #[tokio::test]
    async fn channel_without_handler_keeps_messages() {
        let bus = InMemoryBus::new();
        bus.send("orphan", "x".to_string()).await.unwrap();
        let stats = bus.deliver_pending().await;
        assert_eq!(stats, DeliveryStats::default());
        assert_eq!(bus.pending("orphan").await, 1);
    }
}
