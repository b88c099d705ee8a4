//! In-process change feed with explicit subscribe/unsubscribe lifecycles.
//!
//! Subscribers own a [`Subscription`] bound to one topic. Publishing fans an event out to every
//! live subscriber of that topic; subscriptions whose receiver was dropped are pruned on the next
//! publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Envelope delivered to topic subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEvent {
    pub topic: String,
    pub kind: String,
    pub payload: serde_json::Value,
    pub published_at: DateTime<Utc>,
}

type Subscribers = HashMap<String, Vec<(SubscriptionId, UnboundedSender<FeedEvent>)>>;

#[derive(Debug, Clone, Default)]
pub struct ChangeFeed {
    topics: Arc<Mutex<Subscribers>>,
    sequence: Arc<AtomicU64>,
}

impl ChangeFeed {
    pub fn subscribe(&self, topic: impl Into<String>) -> Subscription {
        let topic = topic.into();
        let id = SubscriptionId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        let (sender, receiver) = mpsc::unbounded_channel();

        self.lock()
            .entry(topic.clone())
            .or_default()
            .push((id, sender));

        Subscription {
            id,
            topic,
            receiver,
        }
    }

    /// Returns false when the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut topics = self.lock();
        let mut removed = false;
        topics.retain(|_, subscribers| {
            let before = subscribers.len();
            subscribers.retain(|(existing, _)| *existing != id);
            removed |= subscribers.len() != before;
            !subscribers.is_empty()
        });
        removed
    }

    /// Delivers the event to every live subscriber and returns how many received it.
    pub fn publish(
        &self,
        topic: &str,
        kind: impl Into<String>,
        payload: serde_json::Value,
    ) -> usize {
        let event = FeedEvent {
            topic: topic.to_string(),
            kind: kind.into(),
            payload,
            published_at: Utc::now(),
        };

        let mut topics = self.lock();
        let Some(subscribers) = topics.get_mut(topic) else {
            return 0;
        };

        subscribers.retain(|(_, sender)| sender.send(event.clone()).is_ok());
        let delivered = subscribers.len();
        if delivered == 0 {
            topics.remove(topic);
        }
        delivered
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock()
            .get(topic)
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.topics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Receiving end of one topic subscription.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    topic: String,
    receiver: UnboundedReceiver<FeedEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub async fn recv(&mut self) -> Option<FeedEvent> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<FeedEvent> {
        self.receiver.try_recv().ok()
    }
}
