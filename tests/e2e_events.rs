//! End-to-end tests for event dispatch from the invitation actions.
//!
//! The listener registry is process-wide, so this file holds a single test.
//! Run with: `cargo test --test e2e_events`

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rosterly::InvitationRepository;
use rosterly::events::{InvitationEvent, Listener, has_listeners};
use rosterly::invitations::{
    InviteToTeamAction, PruneExpiredInvitationsAction, ResolveInvitationAction,
};
use rosterly::{
    Clock, CreateInvitation, InvitationConfig, ManualClock, MemoryInvitationStore,
    MemoryTeamDirectory, UserId, register_event_listeners,
};

#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<(&'static str, DateTime<Utc>)>>>,
}

impl Recorder {
    fn names(&self) -> Vec<&'static str> {
        self.seen.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    fn last(&self) -> (&'static str, DateTime<Utc>) {
        *self.seen.lock().unwrap().last().unwrap()
    }
}

#[async_trait]
impl Listener for Recorder {
    async fn handle(&self, event: &InvitationEvent) {
        self.seen
            .lock()
            .unwrap()
            .push((event.name(), event.timestamp()));
    }
}

#[tokio::test]
async fn test_actions_dispatch_lifecycle_events() {
    assert!(!has_listeners());

    let recorder = Recorder::default();
    let listener = recorder.clone();
    register_event_listeners(move |registry| {
        registry.listen(listener);
    });
    assert!(has_listeners());

    let t0 = Utc.with_ymd_and_hms(2024, 11, 2, 18, 30, 0).unwrap();
    let clock = ManualClock::new(t0);
    let store = MemoryInvitationStore::with_clock(clock.clone(), &InvitationConfig::default());
    let directory = MemoryTeamDirectory::new();
    directory.insert_team("raiders", ["captain"]).unwrap();

    let invite = InviteToTeamAction::new(directory.clone(), store.clone());
    let cleanup = InvitationConfig {
        cleanup_on_resolve: true,
        ..Default::default()
    };
    let resolve_and_remove =
        ResolveInvitationAction::with_config(directory.clone(), store.clone(), cleanup);
    let resolve = ResolveInvitationAction::new(directory.clone(), store.clone());
    let prune = PruneExpiredInvitationsAction::with_clock(store.clone(), clock.clone());

    let to_alice = invite
        .execute(CreateInvitation::new("raiders", "alice", "captain"))
        .await
        .unwrap();
    let to_bob = invite
        .execute(CreateInvitation::new("raiders", "bob", "captain"))
        .await
        .unwrap();
    assert_eq!(recorder.last(), ("invitation.created", t0));

    clock.advance(Duration::hours(1));
    resolve_and_remove
        .accept(to_alice.id, &UserId::new("alice"))
        .await
        .unwrap();
    assert!(store.find_by_id(to_alice.id).await.unwrap().is_none());

    resolve
        .reject(to_bob.id, &UserId::new("bob"))
        .await
        .unwrap();
    assert_eq!(recorder.last(), ("invitation.rejected", t0 + Duration::hours(1)));

    clock.advance(Duration::days(8));
    assert_eq!(prune.execute().await.unwrap(), 1);
    assert_eq!(recorder.last(), ("invitation.purged", clock.now()));

    // failed actions dispatch nothing
    let err = resolve.accept(to_bob.id, &UserId::new("bob")).await;
    assert!(err.is_err());

    assert_eq!(
        recorder.names(),
        vec![
            "invitation.created",
            "invitation.created",
            "invitation.accepted",
            "invitation.removed",
            "invitation.rejected",
            "invitation.purged",
        ]
    );
}
