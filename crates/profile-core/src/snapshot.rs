//! Read-only projections of a profile
//!
//! `ProfileSnapshot` carries everything a `show` request displays;
//! `ProfileSummary` is the lightweight form used for listings.

use chrono::{DateTime, Utc};
use profile_acl::{Identity, Protection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::{Profile, ProfileHandle};

/// Display projection of a single profile.
///
/// The access list is included only when the profile is not public, since
/// public access makes it irrelevant for authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Profile handle
    pub handle: ProfileHandle,

    /// Profile name
    pub name: String,

    /// Alias, if set
    pub alias: Option<String>,

    /// Owner identity
    pub owner: Identity,

    /// Owner display name, when the resolver knows it
    pub owner_name: Option<String>,

    /// Dominant protection state
    pub protection: Protection,

    /// Sealed profiles are read-only
    pub read_only: bool,

    /// Lock-down overlay
    pub locked_down: bool,

    /// Public access flag
    pub public_access: bool,

    /// Persistent tunnel flag
    pub persist_tun: bool,

    /// Survives service restarts
    pub persistent: bool,

    /// Granted identities, omitted for public profiles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted: Option<Vec<Identity>>,

    /// Display names of granted identities the resolver knows
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub granted_names: BTreeMap<Identity, String>,

    /// Import timestamp
    pub created_at: DateTime<Utc>,

    /// Last successful retrieval
    pub last_used_at: Option<DateTime<Utc>>,

    /// Number of successful retrievals
    pub used_count: u32,
}

impl ProfileSnapshot {
    /// Build a snapshot of a profile.
    pub fn from_profile(profile: &Profile) -> Self {
        let flags = profile.flags();
        Self {
            handle: profile.handle().clone(),
            name: profile.name().to_string(),
            alias: profile.alias().map(str::to_string),
            owner: profile.owner(),
            owner_name: None,
            protection: profile.protection(),
            read_only: flags.sealed,
            locked_down: flags.locked_down,
            public_access: flags.public_access,
            persist_tun: profile.persist_tun(),
            persistent: profile.persistent,
            granted: (!flags.public_access).then(|| profile.acl().to_vec()),
            granted_names: BTreeMap::new(),
            created_at: profile.created_at,
            last_used_at: profile.last_used_at(),
            used_count: profile.used_count(),
        }
    }

    /// Attach the owner's display name.
    pub fn with_owner_name(mut self, name: impl Into<String>) -> Self {
        self.owner_name = Some(name.into());
        self
    }

    /// Attach the display name of a granted identity.
    ///
    /// Names for identities outside the listed access list are ignored.
    pub fn with_granted_name(mut self, identity: Identity, name: impl Into<String>) -> Self {
        if self.granted.as_ref().is_some_and(|granted| granted.contains(&identity)) {
            self.granted_names.insert(identity, name.into());
        }
        self
    }

    /// Display name of a granted identity, if known.
    pub fn granted_name(&self, identity: Identity) -> Option<&str> {
        self.granted_names.get(&identity).map(String::as_str)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl std::fmt::Display for ProfileSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "    Configuration name: {}", self.name)?;
        if let Some(ref alias) = self.alias {
            writeln!(f, "                 Alias: {}", alias)?;
        }
        writeln!(
            f,
            "                 Owner: ({})  {}",
            self.owner,
            self.owner_name.as_deref().unwrap_or("(unknown)")
        )?;
        writeln!(f, "             Read-only: {}", yes_no(self.read_only))?;
        writeln!(f, "           Locked down: {}", yes_no(self.locked_down))?;
        write!(f, "         Public access: {}", yes_no(self.public_access))?;
        if let Some(ref granted) = self.granted {
            writeln!(f)?;
            write!(
                f,
                "  Users granted access: {} {}",
                granted.len(),
                if granted.len() == 1 { "user" } else { "users" }
            )?;
            for identity in granted {
                writeln!(f)?;
                write!(
                    f,
                    "                        - ({})  {}",
                    identity,
                    self.granted_name(*identity).unwrap_or("(unknown)")
                )?;
            }
        }
        Ok(())
    }
}

/// Summary of a profile for list displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    /// Profile handle
    pub handle: ProfileHandle,

    /// Profile name
    pub name: String,

    /// Alias, if set
    pub alias: Option<String>,

    /// Owner identity
    pub owner: Identity,

    /// Import timestamp
    pub created_at: DateTime<Utc>,

    /// Last successful retrieval
    pub last_used_at: Option<DateTime<Utc>>,

    /// Number of successful retrievals
    pub used_count: u32,
}

impl ProfileSummary {
    /// Build a summary of a profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            handle: profile.handle().clone(),
            name: profile.name().to_string(),
            alias: profile.alias().map(str::to_string),
            owner: profile.owner(),
            created_at: profile.created_at,
            last_used_at: profile.last_used_at(),
            used_count: profile.used_count(),
        }
    }
}
