//! Event types for profile change notifications
//!
//! This module defines the events the profile manager publishes whenever a
//! profile is created, changed, used or removed.

use chrono::{DateTime, Utc};
use profile_acl::Identity;
use profile_core::ProfileHandle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Topic prefix shared by all profile events.
pub const TOPIC_PREFIX: &str = "profile";

/// Profile event envelope.
///
/// All events are wrapped in this envelope which provides metadata
/// for routing, tracing, and processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: Uuid,

    /// Event type (e.g., "access_granted", "sealed")
    pub event_type: String,

    /// Profile the event concerns
    pub handle: ProfileHandle,

    /// Identity that triggered the event
    pub actor: Option<Identity>,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for tracing
    pub correlation_id: Option<String>,

    /// Event version for schema evolution
    pub version: u32,

    /// Event payload
    pub payload: serde_json::Value,

    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The event type string
    /// * `handle` - The profile the event concerns
    /// * `payload` - The event payload
    pub fn new(
        event_type: impl Into<String>,
        handle: ProfileHandle,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event_type.into(),
            handle,
            actor: None,
            timestamp: Utc::now(),
            correlation_id: None,
            version: 1,
            payload,
            metadata: HashMap::new(),
        }
    }

    /// Set the acting identity.
    pub fn with_actor(mut self, actor: Identity) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Set correlation ID.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Add metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Get the topic for this event.
    ///
    /// Topics are structured as: `profile.{event_type}`
    pub fn topic(&self) -> String {
        format!("{}.{}", TOPIC_PREFIX, self.event_type)
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Event categories for filtering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Import and removal
    Lifecycle,
    /// ACL and protection changes
    Access,
    /// Name, alias and flag changes
    Metadata,
    /// Successful retrievals
    Usage,
}

impl EventCategory {
    /// Parse from event type string.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "imported" | "removed" => Some(EventCategory::Lifecycle),
            "access_granted" | "access_revoked" | "public_access_changed"
            | "lock_down_changed" | "sealed" => Some(EventCategory::Access),
            "renamed" | "alias_changed" | "persist_tun_changed" => Some(EventCategory::Metadata),
            "used" => Some(EventCategory::Usage),
            _ => None,
        }
    }
}

/// Changes to a configuration profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProfileEvent {
    /// Profile was imported
    Imported {
        name: String,
        owner: Identity,
        persistent: bool,
        single_use: bool,
        persist_tun: bool,
    },
    /// Identities were added to the access list
    AccessGranted { identities: Vec<Identity> },
    /// Identities were removed from the access list
    AccessRevoked { identities: Vec<Identity> },
    /// Public access flag changed
    PublicAccessChanged { enabled: bool },
    /// Lock-down overlay changed
    LockDownChanged { enabled: bool },
    /// Profile was sealed
    Sealed,
    /// Profile was renamed
    Renamed { name: String },
    /// Alias was set or deleted
    AliasChanged { alias: Option<String> },
    /// Persistent tunnel flag changed
    PersistTunChanged { enabled: bool },
    /// Profile was removed
    Removed,
    /// Profile content was retrieved
    Used { used_count: u32 },
}

impl ProfileEvent {
    /// Get the event type string.
    pub fn event_type(&self) -> &'static str {
        match self {
            ProfileEvent::Imported { .. } => "imported",
            ProfileEvent::AccessGranted { .. } => "access_granted",
            ProfileEvent::AccessRevoked { .. } => "access_revoked",
            ProfileEvent::PublicAccessChanged { .. } => "public_access_changed",
            ProfileEvent::LockDownChanged { .. } => "lock_down_changed",
            ProfileEvent::Sealed => "sealed",
            ProfileEvent::Renamed { .. } => "renamed",
            ProfileEvent::AliasChanged { .. } => "alias_changed",
            ProfileEvent::PersistTunChanged { .. } => "persist_tun_changed",
            ProfileEvent::Removed => "removed",
            ProfileEvent::Used { .. } => "used",
        }
    }

    /// Convert to generic event.
    pub fn to_event(&self, handle: ProfileHandle) -> Event {
        let payload = serde_json::to_value(self).unwrap_or_default();
        Event::new(self.event_type(), handle, payload)
    }
}
