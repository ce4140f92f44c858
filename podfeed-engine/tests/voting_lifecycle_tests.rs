//! Voting lifecycle tests: idempotence, virtualization survival, lazy
//! choice recovery, verdict rendering, session teardown.

mod common;

use chrono::Duration;
use common::{engine, fixed_now, pod_row, MemoryRepo};
use podfeed_common::{Audience, Vote, VoteChoice};
use podfeed_engine::{SignalBand, Verdict, VoteToken};
use std::sync::atomic::Ordering;
use uuid::Uuid;

#[tokio::test]
async fn test_interaction_state_survives_remount() {
    let now = fixed_now();
    let viewer = Uuid::new_v4();
    let repo = MemoryRepo::default();
    let pod = Uuid::new_v4();
    repo.add_pod(pod_row(pod, now - Duration::hours(1), now + Duration::hours(2), true));

    let (engine, _repo) = engine(repo);
    let feed = engine.load_feed(Audience::Friends, viewer, now).await;

    engine
        .record_vote(&feed[0], VoteToken::Maybe, viewer)
        .expect("vote should dispatch")
        .await
        .unwrap();

    // A virtualized list unmounting and remounting the item is, to the
    // engine, two successive mount-time reads of the same store key.
    let at_unmount = engine.store().get(pod).expect("state present");
    let at_remount = engine.store().get(pod).expect("state present");
    assert_eq!(at_unmount, at_remount);
    assert!(at_remount.has_voted);
    assert_eq!(at_remount.choice, Some(VoteChoice::Maybe));
    assert_eq!(engine.store().len(), 1);
}

#[tokio::test]
async fn test_feed_reload_does_not_clear_store() {
    let now = fixed_now();
    let viewer = Uuid::new_v4();
    let repo = MemoryRepo::default();
    let pod = Uuid::new_v4();
    repo.add_pod(pod_row(pod, now - Duration::hours(1), now + Duration::hours(2), true));

    let (engine, _repo) = engine(repo);
    let feed = engine.load_feed(Audience::Friends, viewer, now).await;
    engine
        .record_vote(&feed[0], VoteToken::Fire, viewer)
        .unwrap()
        .await
        .unwrap();

    // Pull-to-refresh cycles must leave interaction state intact
    for _ in 0..3 {
        engine.load_feed(Audience::Friends, viewer, now).await;
    }
    assert!(engine.store().has_voted(pod));

    // Only explicit teardown clears it
    engine.end_session();
    assert!(engine.store().is_empty());
}

#[tokio::test]
async fn test_vote_choice_recovery_is_lazy_and_single_shot() {
    let now = fixed_now();
    let viewer = Uuid::new_v4();
    let repo = MemoryRepo::default();
    let pod = Uuid::new_v4();

    // Server knows the viewer voted "no"; local store does not (restart)
    repo.add_vote(Vote {
        pod_id: pod,
        voter_id: viewer,
        choice: VoteChoice::No,
        metadata: None,
        created_at: now,
    });

    let (engine, repo) = engine(repo);

    let recovered = engine.recover_vote_choice(pod, viewer).await;
    assert_eq!(recovered, Some(VoteChoice::No));
    assert_eq!(repo.vote_fetches.load(Ordering::SeqCst), 1);

    // Second ask short-circuits on the now-seeded store
    let recovered = engine.recover_vote_choice(pod, viewer).await;
    assert_eq!(recovered, Some(VoteChoice::No));
    assert_eq!(repo.vote_fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_recovery_without_server_vote_yields_none() {
    let (engine, _repo) = engine(MemoryRepo::default());
    assert_eq!(
        engine.recover_vote_choice(Uuid::new_v4(), Uuid::new_v4()).await,
        None
    );
}

#[tokio::test]
async fn test_verdict_through_engine_single_image() {
    let now = fixed_now();
    let repo = MemoryRepo::default();
    let pod = Uuid::new_v4();

    for _ in 0..9 {
        repo.add_vote(Vote {
            pod_id: pod,
            voter_id: Uuid::new_v4(),
            choice: VoteChoice::Yes,
            metadata: None,
            created_at: now,
        });
    }
    repo.add_vote(Vote {
        pod_id: pod,
        voter_id: Uuid::new_v4(),
        choice: VoteChoice::Maybe,
        metadata: None,
        created_at: now,
    });

    let (engine, _repo) = engine(repo);
    let verdict = engine.pod_verdict(pod, 1).await.unwrap();
    assert_eq!(
        verdict,
        Verdict::SentimentWinner {
            choice: VoteChoice::Yes,
            pct: 90,
            band: SignalBand::Decisive,
        }
    );
}

#[tokio::test]
async fn test_verdict_on_unvoted_pod_is_no_signal() {
    let (engine, _repo) = engine(MemoryRepo::default());
    let verdict = engine.pod_verdict(Uuid::new_v4(), 3).await.unwrap();
    assert_eq!(verdict, Verdict::NoSignal);
}

#[tokio::test]
async fn test_multi_image_vote_end_to_end() {
    let now = fixed_now();
    let viewer = Uuid::new_v4();
    let repo = MemoryRepo::default();
    let pod = Uuid::new_v4();

    let mut row = pod_row(pod, now - Duration::hours(1), now + Duration::hours(2), true);
    row.image_url = Some(r#"["img://a","img://b","img://c"]"#.to_string());
    repo.add_pod(row);

    let (engine, repo) = engine(repo);
    let feed = engine.load_feed(Audience::Friends, viewer, now).await;
    assert_eq!(feed[0].images.len(), 3);

    engine
        .record_vote(&feed[0], VoteToken::Image(2), viewer)
        .expect("vote should dispatch")
        .await
        .unwrap();

    // The persisted record rides the yes channel with index metadata
    let votes = repo.votes.lock().unwrap().get(&pod).cloned().unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].choice, VoteChoice::Yes);
    assert_eq!(votes[0].metadata.unwrap().selected_index, Some(2));

    let verdict = engine.pod_verdict(pod, 3).await.unwrap();
    assert_eq!(
        verdict,
        Verdict::ImageWinner {
            index: 2,
            pct: 100,
            band: SignalBand::Decisive,
        }
    );
}
