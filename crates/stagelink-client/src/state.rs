//! Observable panel state types.
//!
//! These structures are the "View Model" of the panel: the subset of client
//! state collaborators need for rendering, with none of the lifecycle
//! machinery attached. They are mutated only by the [`crate::Panel`] reducer
//! and by explicit user actions routed through it.

use stagelink_proto::{ReplyFragment, RunState, markers, rest::HistoryItem};

/// One `(value, label)` pair for a select control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Option value submitted back to the backend.
    pub value: String,
    /// Human-readable option label.
    pub label: String,
}

/// One known counterparty.
///
/// Created when first observed, via a roster fetch or inferred from an
/// inbound reply, and unique by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Backend user id.
    pub uid: i64,
    /// Username, the roster key.
    pub username: String,
}

/// One row in the chat transcript, possibly built from multiple streamed
/// fragments sharing an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    /// Server-assigned id, stable across fragments of one reply.
    pub id: String,
    /// Counterparty username.
    pub username: String,
    /// Reply kind; `(id, kind)` is the merge key.
    pub kind: String,
    /// Accumulated content.
    pub content: String,
    /// Display timestamp, refreshed on every fragment.
    pub time: String,
    /// Whether the reply has been adopted into the Q&A store.
    pub is_adopted: bool,
    /// A reasoning sub-section has been opened in the content.
    pub reasoning_open: bool,
    /// The reasoning sub-section is still streaming (opened, not closed).
    pub reasoning_loading: bool,
}

impl TranscriptEntry {
    /// Build a new entry from the first fragment of a reply.
    pub(crate) fn from_fragment(fragment: ReplyFragment, time: String) -> Self {
        let mut entry = Self {
            id: fragment.id,
            username: fragment.username,
            kind: fragment.kind,
            content: fragment.content,
            time,
            is_adopted: fragment.is_adopted,
            reasoning_open: false,
            reasoning_loading: false,
        };
        entry.refresh_markers();
        entry
    }

    /// Build an entry from a persisted history row.
    pub(crate) fn from_history(item: HistoryItem) -> Self {
        let mut entry = Self {
            id: item.id,
            username: item.username,
            kind: item.kind,
            content: item.content,
            time: item.timetext,
            is_adopted: item.is_adopted,
            reasoning_open: false,
            reasoning_loading: false,
        };
        entry.refresh_markers();
        entry
    }

    /// Append a streamed fragment and refresh the timestamp.
    pub(crate) fn append(&mut self, chunk: &str, time: String) {
        self.content.push_str(chunk);
        self.time = time;
        self.refresh_markers();
    }

    /// Recompute the reasoning flags from the accumulated content.
    ///
    /// The marker scan runs over the whole accumulated text, so a marker
    /// split across two fragments is recognized once the second arrives.
    fn refresh_markers(&mut self) {
        match markers::reasoning_in_progress(&self.content) {
            None => {
                self.reasoning_open = false;
                self.reasoning_loading = false;
            },
            Some(loading) => {
                self.reasoning_open = true;
                self.reasoning_loading = loading;
            },
        }
    }
}

/// The aggregate externally-observed panel store.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    /// Backend run state.
    pub live_state: RunState,
    /// Whether configuration may be edited (iff not running).
    pub config_editable: bool,
    /// Synthesizer voice options.
    pub voice_options: Vec<SelectOption>,
    /// Audio device options.
    pub device_options: Vec<SelectOption>,
    /// Transient status line.
    pub panel_msg: String,
    /// Avatar image path.
    pub avatar: String,
    /// Backend connection indicator.
    pub connected: bool,
    /// Remote audio channel indicator.
    pub remote_audio_connected: bool,
    /// Known counterparties, unique by username, in arrival order.
    pub roster: Vec<RosterEntry>,
    /// Username of the active counterparty. `None` before first selection.
    pub selected: Option<String>,
    /// Visible transcript for the active counterparty, in display order.
    pub transcript: Vec<TranscriptEntry>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            live_state: RunState::Stopped,
            config_editable: true,
            voice_options: Vec::new(),
            device_options: Vec::new(),
            panel_msg: String::new(),
            avatar: String::new(),
            connected: false,
            remote_audio_connected: false,
            roster: Vec::new(),
            selected: None,
            transcript: Vec::new(),
        }
    }
}

impl PanelState {
    /// Roster entry for the active counterparty. `None` if nothing selected.
    pub fn selected_entry(&self) -> Option<&RosterEntry> {
        let selected = self.selected.as_deref()?;
        self.roster.iter().find(|e| e.username == selected)
    }

    /// Transcript entry with the given merge key. `None` if absent.
    pub fn transcript_entry(&self, id: &str, kind: &str) -> Option<&TranscriptEntry> {
        self.transcript.iter().find(|e| e.id == id && e.kind == kind)
    }
}
