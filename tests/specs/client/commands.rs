//! Command connection against a live socket.

use crate::prelude::*;
use similar_asserts::assert_eq;
use std::time::Duration;
use wmctl_client::ConnectionState;

#[tokio::test]
async fn run_command_switches_workspace() {
    let manager = FakeManager::start();
    let mut channel = CommandChannel::connect(&manager.config()).await.unwrap();

    let outcomes = channel.run_command("workspace 2").await.unwrap();

    assert_eq!(outcomes, vec![CommandOutcome { success: true, error: None, parse_error: false }]);
    assert_eq!(manager.requests(), vec![Frame::new(CommandType::RunCommand, "workspace 2")]);
}

#[tokio::test]
async fn tree_has_a_single_output_and_view() {
    let manager = FakeManager::start();
    let mut channel = CommandChannel::connect(&manager.config()).await.unwrap();

    let tree = channel.get_tree().await.unwrap();

    assert_eq!(tree.root().children().len(), 1);
    let views = tree.views();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].app_id.as_deref(), Some("foot"));
    assert_eq!(tree.workspace_of(views[0]).and_then(|ws| ws.name.as_deref()), Some("2"));
}

#[tokio::test]
async fn requests_on_one_connection_are_answered_in_order() {
    let manager = FakeManager::start();
    let mut channel = CommandChannel::connect(&manager.config()).await.unwrap();

    assert_eq!(channel.get_workspaces().await.unwrap()[0].name, "2");
    assert_eq!(channel.get_version().await.unwrap().human_readable, "1.10.1");
    channel.send_tick("ping").await.unwrap();

    let sent: Vec<_> = manager.requests().into_iter().map(|frame| frame.message_type).collect();
    assert_eq!(
        sent,
        vec![
            MessageType::Command(CommandType::GetWorkspaces),
            MessageType::Command(CommandType::GetVersion),
            MessageType::Command(CommandType::SendTick),
        ]
    );
}

#[tokio::test]
async fn rejected_command_leaves_connection_usable() {
    let manager = FakeManager::start();
    let mut channel = CommandChannel::connect(&manager.config()).await.unwrap();

    match channel.run_command("workspace 1; bogus thing").await {
        Err(Error::Command { message, parse_error }) => {
            assert_eq!(message, "Unknown/invalid command 'bogus thing'");
            assert!(parse_error);
        }
        other => panic!("expected a rejected command, got {other:?}"),
    }
    assert_eq!(channel.state(), ConnectionState::Connected);
    assert!(channel.get_version().await.is_ok());
}

#[tokio::test]
async fn events_on_command_connection_are_dropped() {
    let manager = FakeManager::with_handler(|_| {
        Response::reply(vec![
            Frame::new(EventType::Workspace, WORKSPACE_FOCUS),
            Frame::new(EventType::Window, WINDOW_FOCUS),
            Frame::new(CommandType::GetWorkspaces, WORKSPACES),
        ])
    });
    let mut channel = CommandChannel::connect(&manager.config()).await.unwrap();

    let workspaces = channel.get_workspaces().await.unwrap();
    assert_eq!(workspaces.len(), 1);
    assert_eq!(channel.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn silent_manager_times_out_and_is_not_retried() {
    let manager = FakeManager::with_handler(|_| Response::silence());
    let config = manager.config().with_reply_timeout(Some(Duration::from_millis(100)));
    let mut channel = CommandChannel::connect(&config).await.unwrap();

    assert!(matches!(channel.run_command("exec foot").await, Err(Error::Timeout)));
    assert_eq!(channel.state(), ConnectionState::Closed);
    assert!(matches!(channel.run_command("exec foot").await, Err(Error::ConnectionClosed)));
    assert_eq!(manager.requests().len(), 1);
}

#[tokio::test]
async fn hangup_mid_request_is_connection_closed() {
    let manager = FakeManager::with_handler(|_| Response::silence().then_hang_up());
    let mut channel = CommandChannel::connect(&manager.config()).await.unwrap();

    assert!(matches!(channel.get_tree().await, Err(Error::ConnectionClosed)));
}

#[tokio::test]
async fn missing_socket_fails_to_connect() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::new(dir.path().join("absent.sock"));

    match CommandChannel::connect(&config).await {
        Err(Error::Connect { path, .. }) => assert_eq!(path, dir.path().join("absent.sock")),
        other => panic!("expected a connect error, got {other:?}"),
    }
}
