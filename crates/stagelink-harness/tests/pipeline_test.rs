//! End-to-end pipeline tests: raw socket frames through the link's parse
//! boundary into the panel reducer.
//!
//! This is the same path a production supervisor drives, minus the socket:
//! frames go in as text, state comes out observable.

use chrono::{DateTime, Local, TimeZone};
use stagelink_client::{Panel, PanelAction, RunState};
use stagelink_core::{Link, LinkState};
use stagelink_harness::{SimInstant, reply_push};

fn t0() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 7, 25, 10, 0, 0).unwrap()
}

fn opened_link() -> Link<SimInstant> {
    let mut link: Link<SimInstant> = Link::new("ws://127.0.0.1:10003");
    let _ = link.connect();
    link.on_open(link.generation());
    link
}

#[test]
fn frames_flow_from_wire_to_state() {
    let link = opened_link();
    let mut panel = Panel::new();
    let _ = panel.select_user("User");

    let frames = [
        serde_json::to_string(&reply_push("7", "User", "fay", "<think>hm")).unwrap(),
        serde_json::to_string(&reply_push("7", "User", "fay", "</think>hello")).unwrap(),
        r#"{"liveState": 1, "panelMsg": "speaking"}"#.to_string(),
    ];

    for frame in &frames {
        if let Some(push) = link.on_message(link.generation(), frame) {
            let _ = panel.apply(push, t0());
        }
    }

    let state = panel.state();
    assert_eq!(state.transcript.len(), 1);
    assert_eq!(state.transcript[0].content, "<think>hm</think>hello");
    assert!(!state.transcript[0].reasoning_loading);
    assert_eq!(state.live_state, RunState::Running);
    assert_eq!(state.panel_msg, "speaking");
    assert!(!state.config_editable);
}

#[test]
fn malformed_frames_are_dropped_without_state_damage() {
    let link = opened_link();
    let mut panel = Panel::new();
    let _ = panel.select_user("User");

    let good = serde_json::to_string(&reply_push("1", "User", "fay", "intact")).unwrap();
    let frames = [
        good.as_str(),
        "truncated {",
        r#"{"liveState": 7}"#,
        r#"{"panelReply": {"content": "missing keys"}}"#,
    ];

    for frame in frames {
        if let Some(push) = link.on_message(link.generation(), frame) {
            let _ = panel.apply(push, t0());
        }
    }

    // Only the well-formed frame took effect.
    let state = panel.state();
    assert_eq!(state.transcript.len(), 1);
    assert_eq!(state.transcript[0].content, "intact");
    assert_eq!(state.live_state, RunState::Stopped);
}

#[test]
fn stale_generation_frames_never_reach_the_panel() {
    let mut link = opened_link();
    let mut panel = Panel::new();
    let _ = panel.select_user("User");
    let old_generation = link.generation();

    // Reconnect supersedes the old socket.
    let _ = link.connect();
    link.on_open(link.generation());
    assert_eq!(link.state(), LinkState::Connected);

    let residual = serde_json::to_string(&reply_push("9", "User", "fay", "ghost")).unwrap();
    if let Some(push) = link.on_message(old_generation, &residual) {
        let _ = panel.apply(push, t0());
    }

    assert!(panel.state().transcript.is_empty());
}

#[test]
fn select_command_round_trips_through_the_wire_encoding() {
    let mut panel = Panel::new();
    let actions = panel.select_user("Guest");

    let command = actions.iter().find_map(|a| match a {
        PanelAction::SendCommand(command) => Some(command.clone()),
        _ => None,
    });

    let encoded = command.unwrap().encode().unwrap();
    assert_eq!(encoded, r#"{"Username":"Guest"}"#);
}
