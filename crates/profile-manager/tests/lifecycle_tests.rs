//! End-to-end tests of the profile lifecycle through `ProfileManager`.

use async_trait::async_trait;
use profile_acl::{Identity, Protection};
use profile_core::{CallerContext, Confirmation, Outcome, Profile, ProfileHandle, RemovalMode};
use profile_events::{EventBus, EventFilter, MemoryEventBus};
use profile_manager::{
    IdentityResolver, ImportRequest, ItemOutcome, ManagerConfig, MemoryProfileStore,
    ProfileError, ProfileManager, ProfileStore, ResolveError, RetryConfig,
    StaticIdentityResolver, StoreError, StoreResult, PARTIAL_FAILURE_STATUS,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ADMIN: Identity = Identity::ROOT;
const OWNER: Identity = Identity::new(1000);
const U1: Identity = Identity::new(1001);
const U2: Identity = Identity::new(1002);
const U3: Identity = Identity::new(1003);

fn resolver() -> StaticIdentityResolver {
    StaticIdentityResolver::new()
        .with_account("owner", OWNER)
        .with_account("alice", U1)
        .with_account("bob", U2)
        .with_account("carol", U3)
}

fn manager_with(config: ManagerConfig) -> ProfileManager {
    ProfileManager::new(
        config,
        Arc::new(MemoryProfileStore::new()),
        Arc::new(resolver()),
    )
    .unwrap()
}

fn manager() -> ProfileManager {
    manager_with(ManagerConfig::default())
}

fn as_caller(identity: Identity) -> CallerContext {
    CallerContext::new(identity)
}

async fn import(manager: &ProfileManager) -> ProfileHandle {
    manager
        .import(
            &as_caller(OWNER),
            ImportRequest::new("office", "client\nremote vpn.example.com 1194\n"),
        )
        .await
        .unwrap()
}

async fn protection(manager: &ProfileManager, handle: &ProfileHandle) -> Protection {
    manager.show(&as_caller(OWNER), handle).await.unwrap().protection
}

#[tokio::test]
async fn test_lifecycle_scenario() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    assert_eq!(protection(&manager, &handle).await, Protection::Open);
    assert!(manager.list_granted(&owner, &handle).await.unwrap().is_empty());

    let report = manager.grant(&owner, &handle, &["1001"]).await.unwrap();
    assert!(report.is_success());
    assert_eq!(protection(&manager, &handle).await, Protection::Restricted);
    assert_eq!(manager.list_granted(&owner, &handle).await.unwrap(), vec![U1]);

    manager.grant(&owner, &handle, &["1001"]).await.unwrap();
    assert_eq!(manager.list_granted(&owner, &handle).await.unwrap().len(), 1);

    manager.set_public_access(&owner, &handle, true).await.unwrap();
    assert!(manager.is_authorized(U2, &handle).await.unwrap());
    assert!(manager.is_authorized(Identity::new(4242), &handle).await.unwrap());

    manager.set_public_access(&owner, &handle, false).await.unwrap();
    assert!(!manager.is_authorized(U2, &handle).await.unwrap());
    assert!(manager.is_authorized(U1, &handle).await.unwrap());

    let outcome = manager
        .seal(&owner, &handle, &Confirmation::acknowledged())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(protection(&manager, &handle).await, Protection::Sealed);

    assert!(matches!(
        manager.grant(&owner, &handle, &["1002"]).await,
        Err(ProfileError::InvalidState(_))
    ));
    assert!(matches!(
        manager.revoke(&owner, &handle, &["1001"]).await,
        Err(ProfileError::InvalidState(_))
    ));
    assert!(matches!(
        manager.rename(&owner, &handle, "home").await,
        Err(ProfileError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_grant_authorizes_unless_locked_down() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    manager.grant(&owner, &handle, &["alice"]).await.unwrap();
    assert!(manager.is_authorized(U1, &handle).await.unwrap());

    manager.set_locked_down(&owner, &handle, true).await.unwrap();
    assert_eq!(protection(&manager, &handle).await, Protection::LockedDown);
    assert!(!manager.is_authorized(U1, &handle).await.unwrap());
    assert!(manager.is_authorized(OWNER, &handle).await.unwrap());

    // The ACL is untouched by lock-down
    assert_eq!(manager.list_granted(&owner, &handle).await.unwrap(), vec![U1]);

    manager.set_locked_down(&owner, &handle, false).await.unwrap();
    assert!(manager.is_authorized(U1, &handle).await.unwrap());
}

#[tokio::test]
async fn test_lock_down_wins_over_public() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    manager.set_public_access(&owner, &handle, true).await.unwrap();
    manager.set_locked_down(&owner, &handle, true).await.unwrap();

    assert!(!manager.is_authorized(U2, &handle).await.unwrap());
    assert!(manager.is_authorized(OWNER, &handle).await.unwrap());
}

#[tokio::test]
async fn test_revoke_absent_identity_is_a_no_op() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;
    manager.grant(&owner, &handle, &["alice"]).await.unwrap();

    let report = manager.revoke(&owner, &handle, &["bob"]).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.exit_status(), 0);
    assert!(matches!(report.items[0].outcome, ItemOutcome::Unchanged(id) if id == U2));
    assert_eq!(manager.list_granted(&owner, &handle).await.unwrap(), vec![U1]);
}

#[tokio::test]
async fn test_revoke_keeps_restricted_state() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    manager.grant(&owner, &handle, &["alice"]).await.unwrap();
    manager.revoke(&owner, &handle, &["alice"]).await.unwrap();

    assert!(manager.list_granted(&owner, &handle).await.unwrap().is_empty());
    assert_eq!(protection(&manager, &handle).await, Protection::Restricted);
    assert!(!manager.is_authorized(U1, &handle).await.unwrap());
}

#[tokio::test]
async fn test_sealing_is_terminal() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;
    manager.grant(&owner, &handle, &["alice"]).await.unwrap();
    manager
        .seal(&owner, &handle, &Confirmation::acknowledged())
        .await
        .unwrap();

    let results = vec![
        manager.grant(&owner, &handle, &["bob"]).await.map(|_| ()),
        manager.revoke(&owner, &handle, &["alice"]).await.map(|_| ()),
        manager.rename(&owner, &handle, "home").await,
        manager.set_alias(&owner, &handle, "work").await,
        manager.clear_alias(&owner, &handle).await,
        manager.set_public_access(&owner, &handle, true).await,
        manager.set_locked_down(&owner, &handle, true).await,
        manager.set_persist_tun(&owner, &handle, true).await,
        manager
            .seal(&owner, &handle, &Confirmation::acknowledged())
            .await
            .map(|_| ()),
    ];
    for result in results {
        assert!(matches!(result, Err(ProfileError::InvalidState(_))), "{result:?}");
    }

    // Retrieval is still governed by the flags in effect at seal time
    assert!(manager.is_authorized(U1, &handle).await.unwrap());
    assert!(!manager.is_authorized(U2, &handle).await.unwrap());
    let snapshot = manager.show(&owner, &handle).await.unwrap();
    assert!(snapshot.read_only);
    assert_eq!(snapshot.granted, Some(vec![U1]));
}

#[tokio::test]
async fn test_sealed_profile_can_be_removed() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;
    manager
        .seal(&owner, &handle, &Confirmation::acknowledged())
        .await
        .unwrap();

    let outcome = manager
        .remove(&owner, &handle, RemovalMode::Force)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert!(matches!(
        manager.show(&owner, &handle).await,
        Err(ProfileError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_public_toggle_restores_acl_authorization() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;
    manager.grant(&owner, &handle, &["alice", "bob"]).await.unwrap();

    let candidates = [OWNER, U1, U2, U3, Identity::new(4242)];
    let mut before = Vec::new();
    for identity in candidates {
        before.push(manager.is_authorized(identity, &handle).await.unwrap());
    }

    manager.set_public_access(&owner, &handle, true).await.unwrap();
    let snapshot = manager.show(&owner, &handle).await.unwrap();
    assert!(snapshot.public_access);
    assert!(snapshot.granted.is_none());

    manager.set_public_access(&owner, &handle, false).await.unwrap();
    let mut after = Vec::new();
    for identity in candidates {
        after.push(manager.is_authorized(identity, &handle).await.unwrap());
    }

    assert_eq!(before, after);
    assert_eq!(before, vec![true, true, true, false, false]);
    assert_eq!(
        manager.list_granted(&owner, &handle).await.unwrap(),
        vec![U1, U2]
    );
}

#[tokio::test]
async fn test_batch_grant_with_one_invalid_token() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    let report = manager
        .grant(&owner, &handle, &["alice", "mallory", "1002", "carol"])
        .await
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.exit_status(), PARTIAL_FAILURE_STATUS);
    assert_eq!(report.applied(), vec![U1, U2, U3]);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].token, "mallory");
    assert!(matches!(
        failures[0].outcome,
        ItemOutcome::Failed(ProfileError::InvalidIdentity(_))
    ));

    assert_eq!(
        manager.list_granted(&owner, &handle).await.unwrap(),
        vec![U1, U2, U3]
    );
}

#[tokio::test]
async fn test_management_requires_owner_or_admin() {
    let manager = manager();
    let handle = import(&manager).await;
    manager
        .grant(&as_caller(OWNER), &handle, &["alice"])
        .await
        .unwrap();

    // Being on the access list does not confer management rights
    let granted = as_caller(U1);
    assert!(matches!(
        manager.grant(&granted, &handle, &["bob"]).await,
        Err(ProfileError::NotAuthorized(_))
    ));
    assert!(matches!(
        manager.rename(&granted, &handle, "mine").await,
        Err(ProfileError::NotAuthorized(_))
    ));
    assert!(matches!(
        manager.remove(&granted, &handle, RemovalMode::Force).await,
        Err(ProfileError::NotAuthorized(_))
    ));

    let admin = as_caller(ADMIN);
    manager.grant(&admin, &handle, &["bob"]).await.unwrap();
    manager.set_alias(&admin, &handle, "hq").await.unwrap();
    assert_eq!(
        manager.show(&as_caller(OWNER), &handle).await.unwrap().alias.as_deref(),
        Some("hq")
    );
}

#[tokio::test]
async fn test_error_precedence() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let stranger = as_caller(U3);
    let missing = ProfileHandle::new("/profiles/missing");

    assert!(matches!(
        manager.grant(&stranger, &missing, &["alice"]).await,
        Err(ProfileError::NotFound(_))
    ));

    let handle = import(&manager).await;
    manager
        .seal(&owner, &handle, &Confirmation::acknowledged())
        .await
        .unwrap();

    // Authorization is checked before state
    assert!(matches!(
        manager.grant(&stranger, &handle, &["alice"]).await,
        Err(ProfileError::NotAuthorized(_))
    ));
    assert!(matches!(
        manager.grant(&owner, &handle, &["mallory"]).await,
        Err(ProfileError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_unique_names() {
    let manager = manager_with(ManagerConfig::default().with_unique_names(true));
    let owner = as_caller(OWNER);

    let office = import(&manager).await;
    let err = manager
        .import(&owner, ImportRequest::new("office", "client\n"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::DuplicateName(ref name) if name == "office"));

    let home = manager
        .import(&owner, ImportRequest::new("home", "client\n"))
        .await
        .unwrap();
    assert!(matches!(
        manager.rename(&owner, &home, "office").await,
        Err(ProfileError::DuplicateName(_))
    ));

    // Renaming to its own name is not a conflict
    manager.rename(&owner, &office, "office").await.unwrap();
    manager.rename(&owner, &office, "hq").await.unwrap();
    manager.rename(&owner, &home, "office").await.unwrap();
}

#[tokio::test]
async fn test_duplicate_names_allowed_by_default() {
    let manager = manager();
    import(&manager).await;
    import(&manager).await;
    assert_eq!(
        manager.list_available(&as_caller(OWNER)).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_import_detects_persist_tun() {
    let manager = manager();
    let owner = as_caller(OWNER);

    let with = manager
        .import(
            &owner,
            ImportRequest::new("tun", "client\ndev tun\npersist-tun\n").with_persistent(true),
        )
        .await
        .unwrap();
    let without = import(&manager).await;

    let snapshot = manager.show(&owner, &with).await.unwrap();
    assert!(snapshot.persist_tun);
    assert!(snapshot.persistent);
    assert!(!manager.show(&owner, &without).await.unwrap().persist_tun);

    manager.set_persist_tun(&owner, &with, false).await.unwrap();
    assert!(!manager.show(&owner, &with).await.unwrap().persist_tun);
}

#[tokio::test]
async fn test_unacknowledged_confirmation_cancels() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    for response in ["yes", "", "YES please"] {
        let outcome = manager
            .seal(&owner, &handle, &Confirmation::new(response))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
    }
    assert_eq!(protection(&manager, &handle).await, Protection::Open);

    let outcome = manager
        .remove(&owner, &handle, RemovalMode::Confirmed(Confirmation::new("no")))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Cancelled);
    assert!(manager.show(&owner, &handle).await.is_ok());

    let outcome = manager
        .remove(&owner, &handle, RemovalMode::Confirmed(Confirmation::acknowledged()))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);
    assert!(matches!(
        manager.remove(&owner, &handle, RemovalMode::Force).await,
        Err(ProfileError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_alias_set_and_clear() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    manager.set_alias(&owner, &handle, "work").await.unwrap();
    assert_eq!(
        manager.show(&owner, &handle).await.unwrap().alias.as_deref(),
        Some("work")
    );

    manager.clear_alias(&owner, &handle).await.unwrap();
    assert!(manager.show(&owner, &handle).await.unwrap().alias.is_none());
    manager.clear_alias(&owner, &handle).await.unwrap();
}

#[tokio::test]
async fn test_show_visibility() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;
    manager.grant(&owner, &handle, &["alice"]).await.unwrap();

    let snapshot = manager.show(&as_caller(U1), &handle).await.unwrap();
    assert_eq!(snapshot.owner, OWNER);
    assert_eq!(snapshot.owner_name.as_deref(), Some("owner"));
    assert_eq!(snapshot.granted_name(U1), Some("alice"));
    let text = snapshot.to_string();
    assert!(text.contains("Configuration name: office"));
    assert!(text.contains(&format!("- ({})  alice", U1)));

    assert!(matches!(
        manager.show(&as_caller(U2), &handle).await,
        Err(ProfileError::NotAuthorized(_))
    ));
    assert!(manager.show(&as_caller(ADMIN), &handle).await.is_ok());
}

#[tokio::test]
async fn test_fetch_updates_usage_and_honours_lock_down() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;
    manager.grant(&owner, &handle, &["alice"]).await.unwrap();

    let fetched = manager.fetch(&as_caller(U1), &handle).await.unwrap();
    assert!(fetched.content.contains("remote vpn.example.com"));
    assert_eq!(fetched.used_count, 1);
    assert!(!fetched.consumed);

    assert!(matches!(
        manager.fetch(&as_caller(U2), &handle).await,
        Err(ProfileError::NotAuthorized(_))
    ));

    manager.set_locked_down(&owner, &handle, true).await.unwrap();
    assert!(matches!(
        manager.fetch(&as_caller(U1), &handle).await,
        Err(ProfileError::NotAuthorized(_))
    ));
    let fetched = manager.fetch(&owner, &handle).await.unwrap();
    assert_eq!(fetched.used_count, 2);

    // Management operations leave the usage counters alone
    manager.rename(&owner, &handle, "renamed").await.unwrap();
    let snapshot = manager.show(&owner, &handle).await.unwrap();
    assert_eq!(snapshot.used_count, 2);
    assert!(snapshot.last_used_at.is_some());
}

#[tokio::test]
async fn test_single_use_profile_is_removed_after_fetch() {
    let manager = manager();
    let owner = as_caller(OWNER);
    let handle = manager
        .import(
            &owner,
            ImportRequest::new("once", "client\n").with_single_use(true),
        )
        .await
        .unwrap();

    let fetched = manager.fetch(&owner, &handle).await.unwrap();
    assert!(fetched.consumed);
    assert!(matches!(
        manager.fetch(&owner, &handle).await,
        Err(ProfileError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_list_available() {
    let manager = manager();
    let owner = as_caller(OWNER);

    let private = import(&manager).await;
    let shared = import(&manager).await;
    let public = manager
        .import(&as_caller(U3), ImportRequest::new("public", "client\n"))
        .await
        .unwrap();

    manager.grant(&owner, &shared, &["alice"]).await.unwrap();
    manager
        .set_public_access(&as_caller(U3), &public, true)
        .await
        .unwrap();

    let handles = |summaries: Vec<profile_core::ProfileSummary>| {
        let mut handles: Vec<_> = summaries.into_iter().map(|s| s.handle).collect();
        handles.sort();
        handles
    };
    let sorted = |mut expected: Vec<ProfileHandle>| {
        expected.sort();
        expected
    };

    let visible = handles(manager.list_available(&as_caller(U1)).await.unwrap());
    assert_eq!(visible, sorted(vec![shared.clone(), public.clone()]));

    let visible = handles(manager.list_available(&owner).await.unwrap());
    assert_eq!(
        visible,
        sorted(vec![private.clone(), shared.clone(), public.clone()])
    );

    let visible = handles(manager.list_available(&as_caller(U2)).await.unwrap());
    assert_eq!(visible, vec![public.clone()]);

    manager.set_locked_down(&owner, &shared, true).await.unwrap();
    let visible = handles(manager.list_available(&as_caller(U1)).await.unwrap());
    assert_eq!(visible, vec![public]);

    assert_eq!(
        manager.list_available(&as_caller(ADMIN)).await.unwrap().len(),
        3
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_grants_all_survive() {
    let manager = Arc::new(manager());
    let handle = import(&manager).await;

    let mut tasks = Vec::new();
    for id in 2000..2050u32 {
        let manager = Arc::clone(&manager);
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            manager
                .grant(&as_caller(OWNER), &handle, &[id.to_string()])
                .await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().unwrap().is_success());
    }

    let granted = manager.list_granted(&as_caller(OWNER), &handle).await.unwrap();
    assert_eq!(granted.len(), 50);
    for id in 2000..2050u32 {
        assert!(granted.contains(&Identity::new(id)));
    }
}

struct SlowResolver {
    inner: StaticIdentityResolver,
}

#[async_trait]
impl IdentityResolver for SlowResolver {
    async fn resolve(&self, token: &str) -> Result<Identity, ResolveError> {
        if token == "slow" {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.resolve(token).await
    }

    async fn display_name(&self, identity: Identity) -> Option<String> {
        self.inner.display_name(identity).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_resolver_timeout_is_a_per_item_transient_error() {
    let manager = ProfileManager::new(
        ManagerConfig::default().with_resolver_timeout(Duration::from_millis(100)),
        Arc::new(MemoryProfileStore::new()),
        Arc::new(SlowResolver { inner: resolver() }),
    )
    .unwrap();
    let owner = as_caller(OWNER);
    let handle = import(&manager).await;

    let report = manager
        .grant(&owner, &handle, &["alice", "slow", "bob"])
        .await
        .unwrap();

    assert_eq!(report.exit_status(), PARTIAL_FAILURE_STATUS);
    assert_eq!(report.applied(), vec![U1, U2]);
    assert!(matches!(
        report.items[1].outcome,
        ItemOutcome::Failed(ProfileError::Transient(_))
    ));
}

/// Store whose first `failures` loads report the backend as unavailable.
struct FlakyStore {
    inner: MemoryProfileStore,
    failures: AtomicU32,
}

#[async_trait]
impl ProfileStore for FlakyStore {
    async fn insert(&self, profile: Profile) -> StoreResult<()> {
        self.inner.insert(profile).await
    }

    async fn load(&self, handle: &ProfileHandle) -> StoreResult<Option<Profile>> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("backend restarting".into()));
        }
        self.inner.load(handle).await
    }

    async fn save(&self, profile: Profile) -> StoreResult<()> {
        self.inner.save(profile).await
    }

    async fn delete(&self, handle: &ProfileHandle) -> StoreResult<bool> {
        self.inner.delete(handle).await
    }

    async fn list(&self) -> StoreResult<Vec<Profile>> {
        self.inner.list().await
    }
}

#[tokio::test(start_paused = true)]
async fn test_store_reads_are_retried() {
    let store = Arc::new(FlakyStore {
        inner: MemoryProfileStore::new(),
        failures: AtomicU32::new(0),
    });
    let manager = ProfileManager::new(
        ManagerConfig::default().with_retry(RetryConfig::with_max_attempts(3)),
        store.clone(),
        Arc::new(resolver()),
    )
    .unwrap();
    let handle = import(&manager).await;

    store.failures.store(2, Ordering::SeqCst);
    assert!(manager.is_authorized(OWNER, &handle).await.unwrap());

    store.failures.store(5, Ordering::SeqCst);
    let err = manager.is_authorized(OWNER, &handle).await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_store_rejection_is_a_storage_error() {
    let manager = ProfileManager::new(
        ManagerConfig::default(),
        Arc::new(MemoryProfileStore::with_capacity(1)),
        Arc::new(resolver()),
    )
    .unwrap();
    import(&manager).await;

    let err = manager
        .import(&as_caller(OWNER), ImportRequest::new("second", "client\n"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::Storage(_)));
}

#[tokio::test]
async fn test_changes_are_published() {
    let bus = Arc::new(MemoryEventBus::new());
    let manager = manager().with_event_bus(bus.clone());
    let mut sub = bus.subscribe(EventFilter::All).await.unwrap();

    let owner = as_caller(OWNER).with_correlation_id("req-7");
    let handle = manager
        .import(&owner, ImportRequest::new("office", "client\n"))
        .await
        .unwrap();
    manager.grant(&owner, &handle, &["alice", "alice"]).await.unwrap();
    manager.grant(&owner, &handle, &["alice"]).await.unwrap();
    manager
        .seal(&owner, &handle, &Confirmation::acknowledged())
        .await
        .unwrap();

    let mut seen = Vec::new();
    while let Some(event) = sub.try_recv() {
        assert_eq!(event.handle, handle);
        assert_eq!(event.actor, Some(OWNER));
        assert_eq!(event.correlation_id.as_deref(), Some("req-7"));
        seen.push(event.event_type);
    }

    // The no-op re-grant publishes nothing
    assert_eq!(seen, vec!["imported", "access_granted", "sealed"]);
}
