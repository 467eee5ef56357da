//! `run`, `raw`, `tree`, `views` and `focused` against a live socket.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn run_prints_one_line_per_command() {
    let manager = FakeManager::start();
    let out = manager.wmctl().args(&["run", "workspace", "2;", "exec", "foot"]).passes();

    assert_eq!(out.stdout_lines(), vec!["ok", "ok"]);
    assert_eq!(manager.requests(), vec![Frame::new(CommandType::RunCommand, "workspace 2; exec foot")]);
}

#[test]
fn run_json_prints_outcomes() {
    let manager = FakeManager::start();
    let out = manager.wmctl().args(&["--format", "json", "run", "workspace 2"]).passes();

    assert_eq!(out.stdout_json(), json!([{"success": true, "parse_error": false}]));
}

#[test]
fn rejected_command_exits_2() {
    let manager = FakeManager::start();
    manager
        .wmctl()
        .args(&["run", "bogus"])
        .exits_with(2)
        .stderr_has("Unknown/invalid command 'bogus'");
}

#[test]
fn raw_prints_reply_json() {
    let manager = FakeManager::start();
    let out = manager.wmctl().args(&["raw", "GET_VERSION"]).passes();

    assert_eq!(out.stdout_json()["human_readable"], "1.10.1");
    assert_eq!(manager.requests(), vec![Frame::new(CommandType::GetVersion, "")]);
}

#[test]
fn raw_sends_payload_verbatim() {
    let manager = FakeManager::start();
    manager.wmctl().args(&["raw", "send_tick", "hello"]).passes();

    assert_eq!(manager.requests(), vec![Frame::new(CommandType::SendTick, "hello")]);
}

#[test]
fn tree_text_is_indented() {
    let manager = FakeManager::start();
    let out = manager.wmctl().args(&["tree"]).passes();

    assert_eq!(
        out.stdout_lines(),
        vec![
            "#1 root \"root\"",
            "  #3 output \"DP-1\"",
            "    #5 workspace \"2\"",
            "      #6 con \"foot\" [foot] *",
        ]
    );
}

#[test]
fn tree_json_keeps_fields() {
    let manager = FakeManager::start();
    let out = manager.wmctl().args(&["tree", "-o", "json"]).passes();

    let tree = out.stdout_json();
    assert_eq!(tree["rect"]["width"], 1920);
    assert_eq!(tree["nodes"][0]["current_workspace"], "2");
    assert_eq!(tree["nodes"][0]["nodes"][0]["nodes"][0]["pid"], 1234);
}

#[test]
fn views_lists_the_view() {
    let manager = FakeManager::start();
    manager.wmctl().args(&["views"]).passes().stdout_has("6\tfoot\t1234\tfoot");
}

#[test]
fn focused_view_as_json() {
    let manager = FakeManager::start();
    let out = manager.wmctl().args(&["focused", "--format", "json"]).passes();

    assert_eq!(out.stdout_json()["app_id"], "foot");
}

#[test]
fn explicit_socket_wins_over_environment() {
    let manager = FakeManager::start();
    let socket = manager.socket().to_str().unwrap().to_string();
    wmctl()
        .env("SWAYSOCK", "/nonexistent/sway.sock")
        .args(&["--socket", &socket, "focused"])
        .passes()
        .stdout_has("#6 con");
}

#[test]
fn i3sock_is_used_without_swaysock() {
    let manager = FakeManager::start();
    wmctl().env("I3SOCK", manager.socket()).args(&["views"]).passes().stdout_has("foot");
}
