//! Integration tests for online/offline presence.

mod helpers;

use helpers::{RecordingStore, TestEngine, online_users, user_offline, user_online};
use wchat_core::types::{ConnectionId, UserId};

#[tokio::test]
async fn test_two_connections_produce_one_online_and_one_offline() {
    let app = TestEngine::new();
    let mut observer = app.connect_as("observer").await;
    app.settle().await;
    observer.drain();

    let mut c1 = app.connect_as("alice").await;
    let mut c2 = app.connect_as("alice").await;
    app.settle().await;

    assert_eq!(observer.drain(), vec![user_online("alice")]);
    assert_eq!(c1.drain(), vec![online_users(&["alice", "observer"])]);
    assert_eq!(c2.drain(), vec![online_users(&["alice", "observer"])]);

    c1.close().await;
    assert!(observer.drain().is_empty());
    assert_eq!(
        app.engine.router.online_users().await.expect("online"),
        vec![UserId::new("alice"), UserId::new("observer")]
    );

    c2.close().await;
    assert_eq!(observer.drain(), vec![user_offline("alice")]);

    let writes = app.store.wait_for_writes(3).await;
    assert_eq!(
        writes,
        vec![
            (UserId::new("observer"), true),
            (UserId::new("alice"), true),
            (UserId::new("alice"), false),
        ]
    );
}

#[tokio::test]
async fn test_disconnect_order_does_not_matter() {
    let app = TestEngine::new();
    let mut observer = app.connect().await;

    let c1 = app.connect_as("alice").await;
    let c2 = app.connect_as("alice").await;
    c2.close().await;
    c1.close().await;

    assert_eq!(
        observer.drain(),
        vec![user_online("alice"), user_offline("alice")]
    );
}

#[tokio::test]
async fn test_anonymous_connections_receive_presence_broadcasts() {
    let app = TestEngine::new();
    let mut anonymous = app.connect().await;

    let bob = app.connect_as("bob").await;
    bob.close().await;

    assert_eq!(
        anonymous.drain(),
        vec![user_online("bob"), user_offline("bob")]
    );
}

#[tokio::test]
async fn test_each_online_span_is_announced() {
    let app = TestEngine::new();
    let mut observer = app.connect().await;

    let first = app.connect_as("alice").await;
    first.close().await;
    let second = app.connect_as("alice").await;
    second.close().await;

    assert_eq!(
        observer.drain(),
        vec![
            user_online("alice"),
            user_offline("alice"),
            user_online("alice"),
            user_offline("alice"),
        ]
    );
    assert_eq!(app.store.wait_for_writes(4).await.len(), 4);
}

#[tokio::test]
async fn test_unknown_and_repeated_disconnects_are_noops() {
    let app = TestEngine::new();
    let mut observer = app.connect().await;

    app.engine
        .router
        .close(ConnectionId::new())
        .await
        .expect("unknown close");

    let alice = app.connect_as("alice").await;
    alice.close().await;
    alice.close().await;

    assert_eq!(
        observer.drain(),
        vec![user_online("alice"), user_offline("alice")]
    );
    let stats = app.engine.router.stats().await.expect("stats");
    assert_eq!(stats.open_connections, 1);
    assert_eq!(stats.online_users, 0);
}

#[tokio::test]
async fn test_anonymous_disconnect_announces_nothing() {
    let app = TestEngine::new();
    let mut observer = app.connect_as("observer").await;
    app.settle().await;
    observer.drain();

    let anonymous = app.connect().await;
    anonymous.close().await;

    assert!(observer.drain().is_empty());
}

#[tokio::test]
async fn test_second_identify_does_not_move_connection() {
    let app = TestEngine::new();
    let mut observer = app.connect().await;

    let conn = app.connect_as("alice").await;
    conn.identify("mallory").await;
    conn.close().await;

    assert_eq!(
        observer.drain(),
        vec![user_online("alice"), user_offline("alice")]
    );
}

#[tokio::test]
async fn test_failed_persistence_does_not_block_broadcasts() {
    let app = TestEngine::with_store(RecordingStore::failing());
    let mut observer = app.connect().await;

    let alice = app.connect_as("alice").await;
    alice.close().await;

    assert_eq!(
        observer.drain(),
        vec![user_online("alice"), user_offline("alice")]
    );
    assert_eq!(
        app.store.wait_for_writes(2).await,
        vec![(UserId::new("alice"), true), (UserId::new("alice"), false)]
    );
}
