//! # Profile Events
//!
//! This crate provides the change-notification bus for configuration
//! profiles. Every successful state change in the profile manager is
//! published here so audit trails and caches can follow along.
//!
//! ## Overview
//!
//! The profile-events crate handles:
//! - **Event Types**: The `Event` envelope and the typed `ProfileEvent` payloads
//! - **Event Bus**: Publish/subscribe messaging with per-subscription filters
//!
//! ## Usage
//!
//! ### Publishing Events
//!
//! ```rust,no_run
//! use profile_core::ProfileHandle;
//! use profile_events::{EventBus, MemoryEventBus, ProfileEvent};
//!
//! async fn publish_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     let event = ProfileEvent::PublicAccessChanged { enabled: true }
//!         .to_event(ProfileHandle::new("/profiles/office"));
//!
//!     bus.publish(event).await.unwrap();
//! }
//! ```
//!
//! ### Subscribing to Events
//!
//! ```rust,no_run
//! use profile_events::{EventBus, EventCategory, EventFilter, MemoryEventBus};
//!
//! async fn subscribe_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // Seal notifications only
//!     let mut sub = bus.subscribe(EventFilter::event_type("sealed")).await.unwrap();
//!
//!     // Every ACL and protection change
//!     let _access = bus
//!         .subscribe(EventFilter::Category(EventCategory::Access))
//!         .await
//!         .unwrap();
//!
//!     while let Ok(event) = sub.recv().await {
//!         println!("{} on {}", event.event_type, event.handle);
//!     }
//! }
//! ```
//!
//! ## Filters
//!
//! A subscription selects events by [`EventFilter`]: everything, one
//! [`EventCategory`], one event type (`imported`, `access_granted`,
//! `sealed`, ...) or one profile handle. Removing a subscription closes
//! its channel.

pub mod bus;
pub mod types;

pub use bus::{
    EventBus, EventBusError, EventBusResult, EventBusStats, EventFilter, MemoryEventBus,
    Subscription,
};
pub use types::{Event, EventCategory, ProfileEvent, TOPIC_PREFIX};
