//! Event bus implementation
//!
//! This module provides the event bus abstraction and an in-memory
//! implementation for publishing and subscribing to profile events.

use crate::types::{Event, EventCategory};
use async_trait::async_trait;
use profile_core::ProfileHandle;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

/// Event bus error types.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// Failed to publish event
    #[error("Failed to publish event: {0}")]
    PublishError(String),

    /// Unknown subscription
    #[error("Unknown subscription: {0}")]
    UnknownSubscription(String),

    /// Channel closed
    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;

/// Selects which profile events a subscription receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Every event
    All,
    /// Events of one category, e.g. all access changes
    Category(EventCategory),
    /// One event type, e.g. `"sealed"`
    EventType(String),
    /// Every event concerning one profile
    Profile(ProfileHandle),
}

impl EventFilter {
    /// Filter for a single event type.
    pub fn event_type(event_type: impl Into<String>) -> Self {
        EventFilter::EventType(event_type.into())
    }

    /// Check if an event passes this filter.
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Category(category) => {
                EventCategory::from_event_type(&event.event_type) == Some(*category)
            }
            EventFilter::EventType(event_type) => event.event_type == *event_type,
            EventFilter::Profile(handle) => event.handle == *handle,
        }
    }
}

/// Subscription handle for receiving events.
///
/// The receiver closes once the subscription is removed from the bus.
pub struct Subscription {
    /// Subscription ID
    pub id: String,
    /// Filter the subscription was created with
    pub filter: EventFilter,
    /// Event receiver
    pub receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Receive the next event.
    pub async fn recv(&mut self) -> EventBusResult<Event> {
        self.receiver
            .recv()
            .await
            .map_err(|_| EventBusError::ChannelClosed)
    }

    /// Receive an event if one is already queued.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

/// Publish/subscribe seam between the profile manager and its observers.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event.
    async fn publish(&self, event: Event) -> EventBusResult<()>;

    /// Subscribe to the events selected by `filter`.
    async fn subscribe(&self, filter: EventFilter) -> EventBusResult<Subscription>;

    /// Remove a subscription.
    async fn unsubscribe(&self, subscription_id: &str) -> EventBusResult<()>;

    /// Get event bus stats.
    async fn stats(&self) -> EventBusStats;
}

/// Event bus statistics.
#[derive(Debug, Clone, Default)]
pub struct EventBusStats {
    /// Total events published
    pub events_published: u64,
    /// Total events delivered
    pub events_delivered: u64,
    /// Active subscriptions
    pub active_subscriptions: usize,
}

/// In-memory event bus implementation.
///
/// Suitable for single-process deployments and testing.
pub struct MemoryEventBus {
    /// Live subscriptions by ID
    subscribers: Arc<RwLock<HashMap<String, (EventFilter, broadcast::Sender<Event>)>>>,
    /// Statistics
    stats: Arc<RwLock<EventBusStats>>,
    /// Per-subscription channel capacity
    channel_capacity: usize,
}

impl std::fmt::Debug for MemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventBus")
            .field("channel_capacity", &self.channel_capacity)
            .finish()
    }
}

impl MemoryEventBus {
    /// Create a new in-memory event bus.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create with custom channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(EventBusStats::default())),
            channel_capacity: capacity,
        }
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: Event) -> EventBusResult<()> {
        let mut delivered = 0u64;

        {
            let subscribers = self.subscribers.read().await;
            for (filter, sender) in subscribers.values() {
                if filter.matches(&event) && sender.send(event.clone()).is_ok() {
                    delivered += 1;
                }
            }
        }

        let mut stats = self.stats.write().await;
        stats.events_published += 1;
        stats.events_delivered += delivered;

        tracing::trace!(
            handle = %event.handle,
            event_type = %event.event_type,
            delivered,
            "Event published"
        );
        Ok(())
    }

    async fn subscribe(&self, filter: EventFilter) -> EventBusResult<Subscription> {
        let id = uuid::Uuid::now_v7().to_string();
        let (sender, receiver) = broadcast::channel(self.channel_capacity);

        self.subscribers
            .write()
            .await
            .insert(id.clone(), (filter.clone(), sender));
        self.stats.write().await.active_subscriptions += 1;

        tracing::debug!(subscription = %id, filter = ?filter, "Subscribed to profile events");
        Ok(Subscription {
            id,
            filter,
            receiver,
        })
    }

    async fn unsubscribe(&self, subscription_id: &str) -> EventBusResult<()> {
        if self
            .subscribers
            .write()
            .await
            .remove(subscription_id)
            .is_none()
        {
            return Err(EventBusError::UnknownSubscription(
                subscription_id.to_string(),
            ));
        }

        let mut stats = self.stats.write().await;
        stats.active_subscriptions = stats.active_subscriptions.saturating_sub(1);
        Ok(())
    }

    async fn stats(&self) -> EventBusStats {
        self.stats.read().await.clone()
    }
}
