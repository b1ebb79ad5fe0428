//! Integration tests for the panel reducer against realistic backend
//! push sequences.

use chrono::{DateTime, Local, TimeZone};
use stagelink_client::{Panel, PanelAction, ReplyFragment, RunState, ServerPush};
use stagelink_proto::rest::HistoryItem;

fn t0() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 7, 25, 10, 0, 0).unwrap()
}

fn reply_push(id: &str, username: &str, kind: &str, content: &str) -> ServerPush {
    ServerPush {
        panel_reply: Some(ReplyFragment {
            id: id.into(),
            uid: 0,
            username: username.into(),
            content: content.into(),
            kind: kind.into(),
            is_adopted: false,
        }),
        ..ServerPush::default()
    }
}

fn history_item(id: &str, username: &str, kind: &str, content: &str) -> HistoryItem {
    serde_json::from_value(serde_json::json!({
        "type": kind,
        "way": "",
        "content": content,
        "createtime": 1_721_900_000.0,
        "timetext": "2024-07-25 09:59:00.000",
        "username": username,
        "id": id,
        "is_adopted": 0,
    }))
    .unwrap()
}

#[test]
fn disjoint_fields_update_independently() {
    let mut panel = Panel::new();
    let _ = panel.select_user("U");
    let _ = panel.apply(reply_push("1", "U", "fay", "hello"), t0());
    let _ = panel.apply(
        ServerPush { live_state: Some(RunState::Running), ..ServerPush::default() },
        t0(),
    );
    let before = panel.state().clone();

    // A push carrying only the avatar changes only the avatar.
    let _ = panel.apply(ServerPush { robot: Some("b.gif".into()), ..ServerPush::default() }, t0());

    let after = panel.state();
    assert_eq!(after.avatar, "b.gif");
    assert_eq!(after.live_state, before.live_state);
    assert_eq!(after.config_editable, before.config_editable);
    assert_eq!(after.transcript, before.transcript);
    assert_eq!(after.roster, before.roster);
    assert_eq!(after.panel_msg, before.panel_msg);
}

#[test]
fn streaming_reply_assembles_across_fragments() {
    let mut panel = Panel::new();
    let _ = panel.select_user("U");

    let actions = panel.apply(reply_push("7", "U", "fay", "<think>ab"), t0());
    assert!(actions.contains(&PanelAction::ScrollTranscript));
    let entry = panel.state().transcript_entry("7", "fay").unwrap();
    assert!(entry.reasoning_loading);

    let _ = panel.apply(reply_push("7", "U", "fay", "c</think>done"), t0());
    let entry = panel.state().transcript_entry("7", "fay").unwrap();
    assert_eq!(entry.content, "<think>abc</think>done");
    assert!(!entry.reasoning_loading);
    assert_eq!(panel.state().transcript.len(), 1);
}

#[test]
fn reasoning_and_answer_streams_share_an_id() {
    let mut panel = Panel::new();
    let _ = panel.select_user("U");

    let _ = panel.apply(reply_push("7", "U", "reasoning", "step one"), t0());
    let _ = panel.apply(reply_push("7", "U", "fay", "the answer"), t0());
    let _ = panel.apply(reply_push("7", "U", "reasoning", ", step two"), t0());

    assert_eq!(panel.state().transcript.len(), 2);
    assert_eq!(
        panel.state().transcript_entry("7", "reasoning").unwrap().content,
        "step one, step two"
    );
    assert_eq!(panel.state().transcript_entry("7", "fay").unwrap().content, "the answer");
}

#[test]
fn replies_for_background_users_stay_out_of_the_pane() {
    let mut panel = Panel::new();
    let _ = panel.load_roster(vec![(1, "U".into())]);

    let _ = panel.apply(reply_push("3", "V", "fay", "for someone else"), t0());

    assert!(panel.state().transcript.is_empty());
    let v = panel.state().roster.iter().find(|e| e.username == "V");
    assert!(v.is_some());

    // Selecting the background user brings their stream into the pane.
    let _ = panel.select_user("V");
    let _ = panel.apply(reply_push("4", "V", "fay", "now visible"), t0());
    assert_eq!(panel.state().transcript.len(), 1);
}

#[test]
fn history_page_replaces_and_fragments_extend_it() {
    let mut panel = Panel::new();
    let _ = panel.select_user("User");

    let _ = panel.load_history(vec![
        history_item("11", "User", "member", "hi"),
        history_item("12", "User", "fay", "hello"),
    ]);
    assert_eq!(panel.state().transcript.len(), 2);

    // A live fragment for a history-loaded reply appends to it.
    let _ = panel.apply(reply_push("12", "User", "fay", ", operator"), t0());
    assert_eq!(panel.state().transcript_entry("12", "fay").unwrap().content, "hello, operator");

    // Pagination prepends the older page without scrolling.
    let actions = panel.extend_history(vec![history_item("9", "User", "fay", "earlier")]);
    assert_eq!(panel.state().transcript[0].id, "9");
    assert_eq!(actions, vec![PanelAction::Render]);
}

#[test]
fn adoption_round_trip() {
    let mut panel = Panel::new();
    let _ = panel.select_user("User");
    let _ = panel.load_history(vec![history_item("12", "User", "fay", "hello")]);

    let _ = panel.set_adopted("12", true);
    assert!(panel.state().transcript_entry("12", "fay").unwrap().is_adopted);

    let _ = panel.set_adopted("12", false);
    assert!(!panel.state().transcript_entry("12", "fay").unwrap().is_adopted);
}

#[test]
fn reconnect_era_pushes_apply_like_any_other() {
    // The reducer has no connection awareness: state accumulated before a
    // drop keeps accumulating after the link comes back.
    let mut panel = Panel::new();
    let _ = panel.select_user("U");
    let _ = panel.apply(reply_push("7", "U", "fay", "before"), t0());

    let _ = panel.apply(
        ServerPush { is_connect: Some(false), ..ServerPush::default() },
        t0(),
    );
    let _ = panel.apply(
        ServerPush { is_connect: Some(true), ..ServerPush::default() },
        t0(),
    );
    let _ = panel.apply(reply_push("7", "U", "fay", " and after"), t0());

    assert_eq!(panel.state().transcript_entry("7", "fay").unwrap().content, "before and after");
    assert!(panel.state().connected);
}
