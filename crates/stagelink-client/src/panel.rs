//! Panel state machine.
//!
//! This module defines the [`Panel`] reducer, which folds the backend's
//! stream of partial push records into consistent client-visible state.
//!
//! This is a pure state machine: it consumes parsed [`ServerPush`] records
//! and user intents, and produces [`PanelAction`] instructions for the
//! embedding UI to execute.
//!
//! # Responsibilities
//!
//! - Applies exactly the fields present in a push; absent fields leave
//!   state untouched (partial-update semantics).
//! - Merges streamed reply fragments into transcript entries keyed by
//!   `(id, kind)`, accumulating content in arrival order.
//! - Maintains roster uniqueness by username, including counterparties
//!   first observed through an inbound reply.
//! - Suppresses transcript updates for counterparties other than the
//!   selected one, so a single-pane view never shows cross-talk.

use chrono::{DateTime, Local};
use stagelink_proto::{ClientCommand, ReplyFragment, RunState, ServerPush, rest::HistoryItem};

use crate::{PanelAction, PanelState, RosterEntry, SelectOption, TranscriptEntry};

/// Panel state machine.
///
/// Pure reducer over [`PanelState`]: no I/O dependencies, fully testable
/// without a live connection. Time is passed in by the caller so fragment
/// timestamps are deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    state: PanelState,
}

impl Panel {
    /// Create a panel with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observable state, read by rendering collaborators.
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Apply one inbound push record.
    ///
    /// Each present field is applied independently; the rules are disjoint,
    /// so application order does not matter. Returns the side effects the
    /// update calls for.
    pub fn apply(&mut self, push: ServerPush, now: DateTime<Local>) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        let mut changed = false;
        let mut scroll = false;

        if let Some(run) = push.live_state {
            self.state.live_state = run;
            self.state.config_editable = run != RunState::Running;
            match run {
                RunState::Running => {
                    actions.push(PanelAction::Notify { message: "service started".into() });
                },
                RunState::Stopped => {
                    actions.push(PanelAction::Notify { message: "service stopped".into() });
                },
                RunState::Starting | RunState::Stopping => {},
            }
            changed = true;
        }

        if let Some(voices) = push.voice_list {
            self.state.voice_options = voices
                .into_iter()
                .map(|v| SelectOption { value: v.id, label: v.name })
                .collect();
            changed = true;
        }

        if let Some(devices) = push.device_list {
            self.state.device_options = devices
                .into_iter()
                .map(|d| SelectOption { value: d.clone(), label: d })
                .collect();
            changed = true;
        }

        if let Some(msg) = push.panel_msg {
            self.state.panel_msg = msg;
            changed = true;
        }

        // An empty avatar path means "no update", not "clear".
        if let Some(avatar) = push.robot
            && !avatar.is_empty()
        {
            self.state.avatar = avatar;
            changed = true;
        }

        if let Some(reply) = push.panel_reply {
            let (reply_changed, reply_scroll) = self.apply_reply(reply, now);
            changed |= reply_changed;
            scroll |= reply_scroll;
        }

        if let Some(flag) = push.is_connect {
            self.state.connected = flag;
            changed = true;
        }

        if let Some(flag) = push.remote_audio_connect {
            self.state.remote_audio_connected = flag;
            changed = true;
        }

        if changed {
            actions.push(PanelAction::Render);
        }
        if scroll {
            actions.push(PanelAction::ScrollTranscript);
        }
        actions
    }

    /// Select the active counterparty.
    ///
    /// Clears the visible transcript (the fetched history replaces it) and
    /// tells the backend which counterparty's replies to route here.
    pub fn select_user(&mut self, username: &str) -> Vec<PanelAction> {
        self.state.selected = Some(username.to_string());
        self.state.transcript.clear();

        vec![
            PanelAction::SendCommand(ClientCommand::SelectUser { username: username.to_string() }),
            PanelAction::FetchHistory { username: username.to_string() },
            PanelAction::Render,
        ]
    }

    /// Replace the roster with a fetched member list.
    ///
    /// An empty backend roster is seeded with the default counterparty, so
    /// the operator always has someone to talk to. If the previous selection
    /// disappeared (or nothing was selected yet), the first entry becomes
    /// active.
    pub fn load_roster(&mut self, members: Vec<(i64, String)>) -> Vec<PanelAction> {
        self.state.roster.clear();
        for (uid, username) in members {
            if !self.state.roster.iter().any(|e| e.username == username) {
                self.state.roster.push(RosterEntry { uid, username });
            }
        }
        if self.state.roster.is_empty() {
            self.state.roster.push(RosterEntry { uid: 1, username: "User".into() });
        }

        let selection_alive = self
            .state
            .selected
            .as_deref()
            .is_some_and(|name| self.state.roster.iter().any(|e| e.username == name));
        if !selection_alive {
            let first = self.state.roster[0].username.clone();
            return self.select_user(&first);
        }

        vec![PanelAction::Render]
    }

    /// Replace the visible transcript with a fetched history page
    /// (oldest first).
    pub fn load_history(&mut self, items: Vec<HistoryItem>) -> Vec<PanelAction> {
        self.state.transcript = items.into_iter().map(TranscriptEntry::from_history).collect();
        vec![PanelAction::Render, PanelAction::ScrollTranscript]
    }

    /// Prepend an older history page to the visible transcript.
    ///
    /// No scroll: the operator is reading backwards when pagination fires.
    pub fn extend_history(&mut self, items: Vec<HistoryItem>) -> Vec<PanelAction> {
        let older: Vec<_> = items.into_iter().map(TranscriptEntry::from_history).collect();
        self.state.transcript.splice(0..0, older);
        vec![PanelAction::Render]
    }

    /// Flip the adoption flag on every transcript entry with the given id.
    ///
    /// The backend adopts/unadopts all rows sharing content, so all kinds
    /// under one id move together.
    pub fn set_adopted(&mut self, id: &str, adopted: bool) -> Vec<PanelAction> {
        let mut changed = false;
        for entry in self.state.transcript.iter_mut().filter(|e| e.id == id) {
            if entry.is_adopted != adopted {
                entry.is_adopted = adopted;
                changed = true;
            }
        }

        if changed { vec![PanelAction::Render] } else { vec![] }
    }

    /// Merge one streamed reply fragment.
    ///
    /// Returns `(state_changed, scroll_needed)`.
    fn apply_reply(&mut self, reply: ReplyFragment, now: DateTime<Local>) -> (bool, bool) {
        let mut changed = false;

        // A reply is also an observation of its sender.
        if !self.state.roster.iter().any(|e| e.username == reply.username) {
            self.state
                .roster
                .push(RosterEntry { uid: reply.uid, username: reply.username.clone() });
            changed = true;
        }

        // Replies for non-active counterparties update the roster only;
        // the visible transcript belongs to the selected counterparty.
        if self.state.selected.as_deref() != Some(reply.username.as_str()) {
            return (changed, false);
        }

        let time = clock_label(now);
        match self
            .state
            .transcript
            .iter_mut()
            .find(|e| e.id == reply.id && e.kind == reply.kind)
        {
            Some(entry) => entry.append(&reply.content, time),
            None => self.state.transcript.push(TranscriptEntry::from_fragment(reply, time)),
        }

        (true, true)
    }
}

/// Display timestamp for a freshly arrived fragment.
fn clock_label(now: DateTime<Local>) -> String {
    now.format("%H:%M:%S").to_string()
}
