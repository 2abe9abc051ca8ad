//! Confinement actor behaviour observed from outside the core.

use std::collections::HashSet;
use std::time::Duration;

use futures_util::future::join_all;

use corral_core::{ActorError, ConfinementActor};

#[tokio::test]
async fn test_confined_scenario() {
    let actor = ConfinementActor::start();
    assert_eq!(
        actor.submit("test-msg").await.unwrap(),
        "confined processed: test-msg"
    );
    actor.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_fifty_concurrent_submits_race_check() {
    let actor = ConfinementActor::start();
    let handle = actor.handle();

    let replies = join_all((0..50).map(|i| {
        let handle = handle.clone();
        async move { handle.submit(format!("payload-{i}")).await }
    }))
    .await;

    for (i, reply) in replies.into_iter().enumerate() {
        assert_eq!(reply.unwrap(), format!("confined processed: payload-{i}"));
    }

    let log = actor.shutdown().await.unwrap();
    assert_eq!(log.len(), 50);
    let expected: HashSet<String> = (0..50).map(|i| format!("payload-{i}")).collect();
    let logged: HashSet<String> = log.into_iter().collect();
    assert_eq!(logged, expected);
}

#[tokio::test]
async fn test_shutdown_turns_hang_into_error() {
    let actor = ConfinementActor::start();
    let handle = actor.handle();
    actor.shutdown().await.unwrap();

    // Without an explicit shutdown contract this would wait forever.
    let outcome = tokio::time::timeout(Duration::from_secs(1), handle.submit("late"))
        .await
        .expect("submit after shutdown must not hang");
    assert!(matches!(outcome, Err(ActorError::Unavailable)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_log_survives_many_interleaved_submitters() {
    let actor = ConfinementActor::start();
    let mut tasks = Vec::new();
    for s in 0..10 {
        let handle = actor.handle();
        tasks.push(tokio::spawn(async move {
            for i in 0..20 {
                handle.submit(format!("{s}/{i}")).await.unwrap();
            }
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let log = actor.shutdown().await.unwrap();
    assert_eq!(log.len(), 200);
}
