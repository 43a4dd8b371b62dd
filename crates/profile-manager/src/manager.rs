//! The profile lifecycle manager
//!
//! [`ProfileManager`] is the request/response front of the access-control
//! state machine. Every call carries an explicit [`CallerContext`]; there is
//! no ambient session. Mutations of one handle are serialized by that
//! handle's lock and run load, validate and save as one step.
//!
//! Checks run in a fixed order: the handle must exist (`NotFound`), the
//! caller must hold the needed rights (`NotAuthorized`), and the protection
//! state must allow the operation (`InvalidState`).

use chrono::{DateTime, Utc};
use profile_acl::{Identity, Operation};
use profile_core::{
    declares_persist_tun, CallerContext, Confirmation, Outcome, Profile, ProfileHandle,
    ProfileSnapshot, ProfileSummary, RemovalMode,
};
use profile_events::{EventBus, ProfileEvent};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::batch::{BatchReport, ItemOutcome};
use crate::config::ManagerConfig;
use crate::error::{ProfileError, ProfileResult};
use crate::locks::HandleLocks;
use crate::resolver::IdentityResolver;
use crate::retry::with_retry_if;
use crate::store::{ProfileStore, StoreError, StoreResult};

/// Request to import a new profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Profile name
    pub name: String,

    /// Configuration document
    pub content: String,

    /// Survives service restarts
    #[serde(default)]
    pub persistent: bool,

    /// Removed after the first successful fetch
    #[serde(default)]
    pub single_use: bool,
}

impl ImportRequest {
    /// Create an import request.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            persistent: false,
            single_use: false,
        }
    }

    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn with_single_use(mut self, single_use: bool) -> Self {
        self.single_use = single_use;
        self
    }
}

/// Configuration content handed out by [`ProfileManager::fetch`].
#[derive(Debug, Clone, Serialize)]
pub struct FetchedProfile {
    pub handle: ProfileHandle,
    pub name: String,
    pub content: String,
    pub persist_tun: bool,
    pub used_count: u32,
    pub last_used_at: Option<DateTime<Utc>>,
    /// The profile was single-use and has been removed
    pub consumed: bool,
}

/// Access-controlled profile lifecycle service.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use profile_acl::Identity;
/// use profile_core::CallerContext;
/// use profile_manager::{
///     ImportRequest, ManagerConfig, MemoryProfileStore, ProfileManager, StaticIdentityResolver,
/// };
///
/// async fn example() -> profile_manager::ProfileResult<()> {
///     let manager = ProfileManager::new(
///         ManagerConfig::default(),
///         Arc::new(MemoryProfileStore::new()),
///         Arc::new(StaticIdentityResolver::new()),
///     )?;
///
///     let owner = CallerContext::new(Identity::new(1000));
///     let handle = manager
///         .import(&owner, ImportRequest::new("office", "client\nremote vpn.example.com\n"))
///         .await?;
///
///     let report = manager.grant(&owner, &handle, &["1001", "1002"]).await?;
///     assert!(report.is_success());
///     Ok(())
/// }
/// ```
pub struct ProfileManager {
    config: ManagerConfig,
    store: Arc<dyn ProfileStore>,
    resolver: Arc<dyn IdentityResolver>,
    events: Option<Arc<dyn EventBus>>,
    locks: HandleLocks,
    naming: Mutex<()>,
    running: AtomicBool,
}

impl std::fmt::Debug for ProfileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileManager")
            .field("config", &self.config)
            .field("events", &self.events.is_some())
            .field("running", &self.is_running())
            .finish()
    }
}

impl ProfileManager {
    /// Create a manager.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated before use
    /// * `store` - Backing profile store
    /// * `resolver` - Identity resolver for grant and revoke tokens
    pub fn new(
        config: ManagerConfig,
        store: Arc<dyn ProfileStore>,
        resolver: Arc<dyn IdentityResolver>,
    ) -> ProfileResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            resolver,
            events: None,
            locks: HandleLocks::new(),
            naming: Mutex::new(()),
            running: AtomicBool::new(true),
        })
    }

    /// Publish change notifications to an event bus.
    pub fn with_event_bus(mut self, events: Arc<dyn EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop accepting requests. Later calls fail with a transient error.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Profile manager shut down");
        }
    }

    /// Import a new profile owned by the caller.
    ///
    /// The profile starts `Open` with an empty access list. If the content
    /// declares `persist-tun`, the profile's persistent tunnel flag starts
    /// set; the content is not consulted again afterwards.
    pub async fn import(
        &self,
        caller: &CallerContext,
        request: ImportRequest,
    ) -> ProfileResult<ProfileHandle> {
        self.ensure_running()?;

        let _naming = self.naming_guard().await;
        if self.config.unique_names {
            self.ensure_unique_name(&request.name, None).await?;
        }

        let handle = ProfileHandle::generate(&self.config.handle_prefix);
        let persist_tun = declares_persist_tun(&request.content);
        let profile = Profile::new(
            handle.clone(),
            caller.identity,
            request.name.clone(),
            request.content,
        )
        .with_persistent(request.persistent)
        .with_single_use(request.single_use)
        .with_persist_tun(persist_tun);

        timed(self.config.store_timeout(), self.store.insert(profile)).await?;

        info!(
            handle = %handle,
            actor = %caller.identity,
            name = %request.name,
            persist_tun,
            "Profile imported"
        );
        self.publish(
            caller,
            &handle,
            ProfileEvent::Imported {
                name: request.name,
                owner: caller.identity,
                persistent: request.persistent,
                single_use: request.single_use,
                persist_tun,
            },
        )
        .await;

        Ok(handle)
    }

    /// Grant access to every identity token.
    ///
    /// Tokens are resolved and applied independently. Unresolvable tokens
    /// are reported per item and do not stop the others; the resolved
    /// identities are applied together in one step.
    pub async fn grant<S: AsRef<str>>(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        tokens: &[S],
    ) -> ProfileResult<BatchReport> {
        self.apply_batch(caller, handle, tokens, Operation::Grant).await
    }

    /// Revoke access from every identity token.
    ///
    /// Revoking an identity that was never granted succeeds as a no-op.
    pub async fn revoke<S: AsRef<str>>(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        tokens: &[S],
    ) -> ProfileResult<BatchReport> {
        self.apply_batch(caller, handle, tokens, Operation::Revoke).await
    }

    /// List granted identities in insertion order.
    pub async fn list_granted(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
    ) -> ProfileResult<Vec<Identity>> {
        self.ensure_running()?;
        let profile = self.load(handle).await?;
        self.authorize_view(caller, &profile, Operation::Show)?;
        Ok(profile.acl().to_vec())
    }

    pub async fn set_public_access(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        enabled: bool,
    ) -> ProfileResult<()> {
        self.modify(caller, handle, Operation::SetPublicAccess, |profile| {
            Ok(profile
                .set_public_access(enabled)?
                .then_some(ProfileEvent::PublicAccessChanged { enabled }))
        })
        .await
    }

    /// Set or clear the lock-down overlay.
    ///
    /// Lock-down blocks retrieval for everyone but the owner. Management
    /// rights are unaffected.
    pub async fn set_locked_down(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        enabled: bool,
    ) -> ProfileResult<()> {
        self.modify(caller, handle, Operation::SetLockedDown, |profile| {
            Ok(profile
                .set_locked_down(enabled)?
                .then_some(ProfileEvent::LockDownChanged { enabled }))
        })
        .await
    }

    /// Seal a profile. Irreversible.
    ///
    /// Without an acknowledged confirmation nothing is looked up or changed
    /// and the call returns [`Outcome::Cancelled`].
    pub async fn seal(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        confirmation: &Confirmation,
    ) -> ProfileResult<Outcome> {
        self.ensure_running()?;
        if !confirmation.is_acknowledged() {
            info!(handle = %handle, actor = %caller.identity, "Seal cancelled");
            return Ok(Outcome::Cancelled);
        }

        self.modify(caller, handle, Operation::Seal, |profile| {
            profile.seal()?;
            Ok(Some(ProfileEvent::Sealed))
        })
        .await?;
        Ok(Outcome::Applied)
    }

    /// Rename a profile.
    pub async fn rename(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        name: impl Into<String>,
    ) -> ProfileResult<()> {
        self.ensure_running()?;
        let name = name.into();

        let _naming = self.naming_guard().await;
        let _guard = self.locks.acquire(handle).await;
        let mut profile = self.load(handle).await?;
        self.authorize_management(caller, &profile, Operation::Rename)?;

        if profile.name() == name {
            debug!(handle = %handle, "Rename to current name, nothing to do");
            return Ok(());
        }
        if self.config.unique_names {
            self.ensure_unique_name(&name, Some(handle)).await?;
        }

        profile.rename(name.as_str())?;
        self.save(profile).await?;

        info!(handle = %handle, actor = %caller.identity, name = %name, "Profile renamed");
        self.publish(caller, handle, ProfileEvent::Renamed { name }).await;
        Ok(())
    }

    pub async fn set_alias(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        alias: impl Into<String>,
    ) -> ProfileResult<()> {
        let alias = alias.into();
        self.modify(caller, handle, Operation::SetAlias, |profile| {
            profile.set_alias(alias.as_str())?;
            Ok(Some(ProfileEvent::AliasChanged { alias: Some(alias) }))
        })
        .await
    }

    /// Delete the alias. A profile without alias is left unchanged.
    pub async fn clear_alias(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
    ) -> ProfileResult<()> {
        self.modify(caller, handle, Operation::ClearAlias, |profile| {
            Ok(profile
                .clear_alias()?
                .then_some(ProfileEvent::AliasChanged { alias: None }))
        })
        .await
    }

    pub async fn set_persist_tun(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        enabled: bool,
    ) -> ProfileResult<()> {
        self.modify(caller, handle, Operation::SetPersistTun, |profile| {
            Ok(profile
                .set_persist_tun(enabled)?
                .then_some(ProfileEvent::PersistTunChanged { enabled }))
        })
        .await
    }

    /// Remove a profile. Irreversible.
    ///
    /// Sealed profiles can be removed. An unacknowledged confirmation
    /// returns [`Outcome::Cancelled`] without touching anything.
    pub async fn remove(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        mode: RemovalMode,
    ) -> ProfileResult<Outcome> {
        self.ensure_running()?;
        if !mode.may_proceed() {
            info!(handle = %handle, actor = %caller.identity, "Removal cancelled");
            return Ok(Outcome::Cancelled);
        }

        let _guard = self.locks.acquire(handle).await;
        let profile = self.load(handle).await?;
        self.authorize_management(caller, &profile, Operation::Remove)?;
        self.delete(handle).await?;

        info!(
            handle = %handle,
            actor = %caller.identity,
            forced = matches!(mode, RemovalMode::Force),
            "Profile removed"
        );
        self.publish(caller, handle, ProfileEvent::Removed).await;
        Ok(Outcome::Applied)
    }

    /// Read-only projection of a profile.
    ///
    /// Owners and administrators may always look; anybody else only while
    /// they are authorized to retrieve the profile. Sealing does not hide
    /// metadata.
    pub async fn show(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
    ) -> ProfileResult<ProfileSnapshot> {
        self.ensure_running()?;
        let profile = self.load(handle).await?;
        self.authorize_view(caller, &profile, Operation::Show)?;

        let mut snapshot = profile.snapshot();
        if let Some(name) = self.display_name(profile.owner()).await {
            snapshot = snapshot.with_owner_name(name);
        }
        for identity in snapshot.granted.clone().unwrap_or_default() {
            if let Some(name) = self.display_name(identity).await {
                snapshot = snapshot.with_granted_name(identity, name);
            }
        }
        Ok(snapshot)
    }

    /// Retrieve the configuration content.
    ///
    /// Only this call moves the usage counters. Single-use profiles are
    /// removed once handed out.
    pub async fn fetch(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
    ) -> ProfileResult<FetchedProfile> {
        self.ensure_running()?;

        let _guard = self.locks.acquire(handle).await;
        let mut profile = self.load(handle).await?;

        let decision = profile.access(caller.identity);
        if !decision.is_allowed() {
            warn!(
                handle = %handle,
                actor = %caller.identity,
                decision = decision.as_str(),
                "Retrieval denied"
            );
            return Err(ProfileError::NotAuthorized(format!(
                "{} may not retrieve {}",
                caller.identity, handle
            )));
        }

        profile.record_use();
        let consumed = profile.single_use;
        let fetched = FetchedProfile {
            handle: handle.clone(),
            name: profile.name().to_string(),
            content: profile.content().to_string(),
            persist_tun: profile.persist_tun(),
            used_count: profile.used_count(),
            last_used_at: profile.last_used_at(),
            consumed,
        };

        if consumed {
            self.delete(handle).await?;
        } else {
            self.save(profile).await?;
        }

        debug!(
            handle = %handle,
            actor = %caller.identity,
            used_count = fetched.used_count,
            "Profile retrieved"
        );
        self.publish(
            caller,
            handle,
            ProfileEvent::Used {
                used_count: fetched.used_count,
            },
        )
        .await;
        if consumed {
            info!(handle = %handle, "Single-use profile removed after retrieval");
            self.publish(caller, handle, ProfileEvent::Removed).await;
        }

        Ok(fetched)
    }

    /// List the profiles the caller may retrieve, oldest first.
    ///
    /// Administrators see every profile.
    pub async fn list_available(&self, caller: &CallerContext) -> ProfileResult<Vec<ProfileSummary>> {
        self.ensure_running()?;

        let limit = self.config.store_timeout();
        let profiles = with_retry_if(
            &self.config.retry,
            || timed(limit, self.store.list()),
            StoreError::is_transient,
        )
        .await?;

        let is_admin = self.config.is_admin(caller.identity);
        let mut summaries: Vec<ProfileSummary> = profiles
            .iter()
            .filter(|profile| is_admin || profile.is_authorized(caller.identity))
            .map(Profile::summary)
            .collect();
        summaries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.handle.cmp(&b.handle))
        });

        debug!(actor = %caller.identity, count = summaries.len(), "Listed profiles");
        Ok(summaries)
    }

    /// Check if an identity may retrieve a profile.
    pub async fn is_authorized(
        &self,
        identity: Identity,
        handle: &ProfileHandle,
    ) -> ProfileResult<bool> {
        self.ensure_running()?;
        Ok(self.load(handle).await?.is_authorized(identity))
    }

    async fn apply_batch<S: AsRef<str>>(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        tokens: &[S],
        operation: Operation,
    ) -> ProfileResult<BatchReport> {
        self.ensure_running()?;

        // Whole-call failures abort before any token is resolved
        let profile = self.load(handle).await?;
        self.authorize_management(caller, &profile, operation)?;

        let mut resolved = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref();
            resolved.push((token, self.resolve_token(token).await));
        }

        let _guard = self.locks.acquire(handle).await;
        let mut profile = self.load(handle).await?;
        self.authorize_management(caller, &profile, operation)?;

        let mut report = BatchReport::new(operation);
        for (token, result) in resolved {
            let outcome = match result {
                Ok(identity) => {
                    let changed = if operation == Operation::Grant {
                        profile.grant(identity)?
                    } else {
                        profile.revoke(identity)?
                    };
                    if changed {
                        ItemOutcome::Applied(identity)
                    } else {
                        ItemOutcome::Unchanged(identity)
                    }
                }
                Err(err) => {
                    warn!(
                        handle = %handle,
                        operation = %operation,
                        token,
                        error = %err,
                        "Identity token not applied"
                    );
                    ItemOutcome::Failed(err)
                }
            };
            report.push(token, outcome);
        }

        let changed = report.applied();
        if !changed.is_empty() {
            self.save(profile).await?;
            info!(
                handle = %handle,
                actor = %caller.identity,
                operation = %operation,
                count = changed.len(),
                "Access list updated"
            );
            let event = if operation == Operation::Grant {
                ProfileEvent::AccessGranted { identities: changed }
            } else {
                ProfileEvent::AccessRevoked { identities: changed }
            };
            self.publish(caller, handle, event).await;
        }

        Ok(report)
    }

    async fn modify<F>(
        &self,
        caller: &CallerContext,
        handle: &ProfileHandle,
        operation: Operation,
        apply: F,
    ) -> ProfileResult<()>
    where
        F: FnOnce(&mut Profile) -> ProfileResult<Option<ProfileEvent>>,
    {
        self.ensure_running()?;

        let _guard = self.locks.acquire(handle).await;
        let mut profile = self.load(handle).await?;
        self.authorize_management(caller, &profile, operation)?;

        match apply(&mut profile)? {
            Some(event) => {
                self.save(profile).await?;
                info!(
                    handle = %handle,
                    actor = %caller.identity,
                    operation = %operation,
                    "Profile updated"
                );
                self.publish(caller, handle, event).await;
            }
            None => {
                debug!(handle = %handle, operation = %operation, "No change");
            }
        }
        Ok(())
    }

    fn ensure_running(&self) -> ProfileResult<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(ProfileError::Transient(
                "profile manager is shut down".to_string(),
            ))
        }
    }

    fn authorize_management(
        &self,
        caller: &CallerContext,
        profile: &Profile,
        operation: Operation,
    ) -> ProfileResult<()> {
        if !profile.can_manage(caller.identity, self.config.is_admin(caller.identity)) {
            warn!(
                handle = %profile.handle(),
                actor = %caller.identity,
                operation = %operation,
                "Management denied"
            );
            return Err(ProfileError::NotAuthorized(format!(
                "{} may not {} {}",
                caller.identity,
                operation,
                profile.handle()
            )));
        }
        profile.permits(operation)?;
        Ok(())
    }

    fn authorize_view(
        &self,
        caller: &CallerContext,
        profile: &Profile,
        operation: Operation,
    ) -> ProfileResult<()> {
        let identity = caller.identity;
        if profile.can_manage(identity, self.config.is_admin(identity))
            || profile.is_authorized(identity)
        {
            return Ok(());
        }
        Err(ProfileError::NotAuthorized(format!(
            "{} may not {} {}",
            identity,
            operation,
            profile.handle()
        )))
    }

    async fn naming_guard(&self) -> Option<MutexGuard<'_, ()>> {
        if self.config.unique_names {
            Some(self.naming.lock().await)
        } else {
            None
        }
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        except: Option<&ProfileHandle>,
    ) -> ProfileResult<()> {
        let limit = self.config.store_timeout();
        let profiles = with_retry_if(
            &self.config.retry,
            || timed(limit, self.store.list()),
            StoreError::is_transient,
        )
        .await?;

        let taken = profiles
            .iter()
            .any(|profile| profile.name() == name && Some(profile.handle()) != except);
        if taken {
            return Err(ProfileError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    async fn resolve_token(&self, token: &str) -> ProfileResult<Identity> {
        let limit = self.config.resolver_timeout();
        match tokio::time::timeout(limit, self.resolver.resolve(token)).await {
            Ok(result) => result.map_err(ProfileError::from),
            Err(_) => Err(ProfileError::Transient(format!(
                "identity resolver timed out after {}ms resolving {:?}",
                limit.as_millis(),
                token
            ))),
        }
    }

    async fn display_name(&self, identity: Identity) -> Option<String> {
        tokio::time::timeout(
            self.config.resolver_timeout(),
            self.resolver.display_name(identity),
        )
        .await
        .ok()
        .flatten()
    }

    async fn load(&self, handle: &ProfileHandle) -> ProfileResult<Profile> {
        let limit = self.config.store_timeout();
        let loaded = with_retry_if(
            &self.config.retry,
            || timed(limit, self.store.load(handle)),
            StoreError::is_transient,
        )
        .await?;
        loaded.ok_or_else(|| ProfileError::NotFound(handle.clone()))
    }

    async fn save(&self, profile: Profile) -> ProfileResult<()> {
        timed(self.config.store_timeout(), self.store.save(profile)).await?;
        Ok(())
    }

    async fn delete(&self, handle: &ProfileHandle) -> ProfileResult<()> {
        timed(self.config.store_timeout(), self.store.delete(handle)).await?;
        self.locks.forget(handle).await;
        Ok(())
    }

    async fn publish(&self, caller: &CallerContext, handle: &ProfileHandle, change: ProfileEvent) {
        let Some(events) = &self.events else {
            return;
        };

        let mut event = change.to_event(handle.clone()).with_actor(caller.identity);
        if let Some(correlation_id) = &caller.correlation_id {
            event = event.with_correlation_id(correlation_id.clone());
        }

        if let Err(e) = events.publish(event).await {
            warn!(handle = %handle, error = %e, "Failed to publish profile event");
        }
    }
}

/// Bound a store call by `limit`.
async fn timed<T, F>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or_else(|_| Err(StoreError::Timeout(limit)))
}
