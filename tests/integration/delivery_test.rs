//! Integration tests for delivering persisted chat events to rooms.

mod helpers;

use helpers::{TestEngine, record};
use wchat_core::events::ChatEvent;
use wchat_core::types::{MessageId, RoomId, SeenReceipt, UserId};
use wchat_realtime::message::types::{OutboundMessage, ReceivedMessage};

#[tokio::test]
async fn test_created_message_reaches_room_members_only() {
    let app = TestEngine::new();
    let mut bob = app.connect_as("bob").await;
    bob.join("chat-42").await;
    let mut carol = app.connect_as("carol").await;
    carol.join("chat-7").await;
    let mut lurker = app.connect_as("dave").await;
    app.settle().await;
    for client in [&mut bob, &mut carol, &mut lurker] {
        client.drain();
    }

    let message = record("m1", "chat-42", "alice", "hello");
    let delivered = app.engine.bridge.on_message_created(message.clone()).await;

    assert_eq!(delivered, 1);
    assert_eq!(
        bob.drain(),
        vec![OutboundMessage::MessageReceived {
            message: ReceivedMessage::Stored(message)
        }]
    );
    assert!(carol.drain().is_empty());
    assert!(lurker.drain().is_empty());
}

#[tokio::test]
async fn test_author_devices_in_room_also_receive_message() {
    let app = TestEngine::new();
    let mut phone = app.connect_as("alice").await;
    phone.join("chat-42").await;
    let mut laptop = app.connect_as("alice").await;
    let mut bob = app.connect_as("bob").await;
    bob.join("chat-42").await;
    app.settle().await;
    for client in [&mut phone, &mut laptop, &mut bob] {
        client.drain();
    }

    let message = record("m2", "chat-42", "alice", "from my phone");
    let delivered = app.engine.bridge.on_message_created(message.clone()).await;

    assert_eq!(delivered, 2);
    let expected = vec![OutboundMessage::from(message)];
    assert_eq!(phone.drain(), expected);
    assert_eq!(bob.drain(), expected);
    assert!(laptop.drain().is_empty());
}

#[tokio::test]
async fn test_seen_receipt_is_room_scoped() {
    let app = TestEngine::new();
    let mut alice = app.connect_as("alice").await;
    alice.join("chat-42").await;
    let mut carol = app.connect_as("carol").await;
    carol.join("chat-7").await;
    app.settle().await;
    alice.drain();
    carol.drain();

    let receipt = SeenReceipt {
        message_id: MessageId::new("m1"),
        chat_id: RoomId::new("chat-42"),
        user_id: UserId::new("bob"),
    };
    let delivered = app
        .engine
        .bridge
        .dispatch(ChatEvent::MessageSeen { receipt })
        .await;

    assert_eq!(delivered, 1);
    assert_eq!(
        alice.drain(),
        vec![OutboundMessage::MessageSeen {
            message_id: MessageId::new("m1"),
            chat_id: RoomId::new("chat-42"),
            user_id: UserId::new("bob"),
        }]
    );
    assert!(carol.drain().is_empty());
}

#[tokio::test]
async fn test_dispatch_routes_created_events_by_chat() {
    let app = TestEngine::new();
    let mut bob = app.connect_as("bob").await;
    bob.join("chat-42").await;
    app.settle().await;
    bob.drain();

    let event = ChatEvent::MessageCreated {
        message: record("m3", "chat-42", "alice", "via event"),
    };
    assert_eq!(event.room(), &RoomId::new("chat-42"));
    assert_eq!(app.engine.bridge.dispatch(event).await, 1);
    assert_eq!(bob.drain().len(), 1);
}

#[tokio::test]
async fn test_empty_room_delivers_to_nobody() {
    let app = TestEngine::new();
    let delivered = app
        .engine
        .bridge
        .on_message_created(record("m4", "chat-empty", "alice", "anyone?"))
        .await;
    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn test_delivery_after_shutdown_is_dropped() {
    let app = TestEngine::new();
    let bob = app.connect_as("bob").await;
    bob.join("chat-42").await;

    app.engine.shutdown().await.expect("shutdown");

    let delivered = app
        .engine
        .bridge
        .on_message_created(record("m5", "chat-42", "alice", "too late"))
        .await;
    assert_eq!(delivered, 0);
}
