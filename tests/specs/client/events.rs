//! Event connection against a live socket.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::time::Duration;
use wmctl_client::SubscriberState;
use wmctl_core::WindowChange;

fn ticks(count: usize) -> impl Fn(&Frame) -> Response + Send + Sync + 'static {
    move |request: &Frame| match request.message_type {
        MessageType::Command(CommandType::Subscribe) => {
            let mut frames = vec![Frame::new(CommandType::Subscribe, r#"{"success":true}"#)];
            frames.extend((0..count).map(|i| {
                Frame::new(EventType::Tick, json!({"first": false, "payload": i.to_string()}).to_string())
            }));
            Response::reply(frames).then_hang_up()
        }
        _ => sway_like(request),
    }
}

fn tick_payload(event: Option<Event>) -> String {
    match event {
        Some(Event::Tick(TickEvent { payload, .. })) => payload,
        other => panic!("expected a tick, got {other:?}"),
    }
}

#[tokio::test]
async fn events_arrive_in_order_then_stream_ends() {
    let manager = FakeManager::with_handler(ticks(50));
    let mut subscriber = EventSubscriber::connect(&manager.config()).await.unwrap();
    subscriber.subscribe(&[EventType::Tick]).await.unwrap();

    for i in 0..50 {
        assert_eq!(tick_payload(subscriber.next_event().await.unwrap()), i.to_string());
    }
    assert!(subscriber.next_event().await.unwrap().is_none());
    assert_eq!(subscriber.state(), SubscriberState::Closed);
    assert_eq!(
        manager.requests(),
        vec![Frame::new(CommandType::Subscribe, r#"["tick"]"#)]
    );
}

#[tokio::test]
async fn spawned_stream_hands_out_events_in_order() {
    let manager = FakeManager::with_handler(ticks(20));
    let mut subscriber = EventSubscriber::connect(&manager.config()).await.unwrap();
    subscriber.subscribe(&[EventType::Tick]).await.unwrap();
    let mut stream = subscriber.spawn(2);

    for i in 0..20 {
        assert_eq!(tick_payload(stream.recv().await), i.to_string());
    }
    assert!(stream.recv().await.is_none());
    stream.join().await.unwrap();
}

#[tokio::test]
async fn unsubscribed_categories_are_skipped() {
    let manager = FakeManager::start();
    let mut subscriber = EventSubscriber::connect(&manager.config()).await.unwrap();
    subscriber.subscribe(&[EventType::Window]).await.unwrap();

    match subscriber.next_event().await.unwrap() {
        Some(Event::Window(event)) => {
            assert_eq!(event.change, WindowChange::Focus);
            assert_eq!(event.container_tree().unwrap().root().name.as_deref(), Some("foot"));
        }
        other => panic!("expected a window event, got {other:?}"),
    }
    assert!(subscriber.next_event().await.unwrap().is_none());
}

#[tokio::test]
async fn commands_and_events_use_separate_connections() {
    let manager = FakeManager::with_handler(|request| match request.message_type {
        // keep the event connection open so both are live at once
        MessageType::Command(CommandType::Subscribe) => Response::reply(vec![Frame::new(
            CommandType::Subscribe,
            r#"{"success":true}"#,
        )]),
        _ => sway_like(request),
    });
    let mut subscriber = EventSubscriber::connect(&manager.config()).await.unwrap();
    subscriber.subscribe(&[EventType::Workspace]).await.unwrap();
    let stream = subscriber.spawn(8);

    let mut channel = CommandChannel::connect(&manager.config()).await.unwrap();
    channel.run_command("workspace 2").await.unwrap();
    assert_eq!(channel.get_tree().await.unwrap().views().len(), 1);

    stream.cancel();
    tokio::time::timeout(Duration::from_secs(5), stream.join())
        .await
        .expect("event loop did not stop")
        .unwrap();
}
