//! Inbound push record.
//!
//! The backend pushes one JSON object per socket text frame. Every field is
//! optional: the client applies exactly the fields that are present and
//! leaves everything else untouched (partial-update semantics, not
//! full-replace). Unknown fields are ignored for forward compatibility.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{de, error::ProtocolError};

/// Run state of the backend service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Service is stopped; configuration may be edited.
    #[default]
    Stopped = 0,
    /// Service is live.
    Running = 1,
    /// Start requested, not yet live.
    Starting = 2,
    /// Stop requested, not yet stopped.
    Stopping = 3,
}

impl TryFrom<u8> for RunState {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0 => Ok(Self::Stopped),
            1 => Ok(Self::Running),
            2 => Ok(Self::Starting),
            3 => Ok(Self::Stopping),
            other => Err(ProtocolError::UnknownRunState(other)),
        }
    }
}

impl Serialize for RunState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

impl<'de> Deserialize<'de> for RunState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u8::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// One synthesizer voice the backend offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Stable voice identifier (option value).
    pub id: String,
    /// Human-readable voice name (option label).
    pub name: String,
}

/// One streamed chunk of a reply.
///
/// Chunks sharing `(id, kind)` belong to the same logical reply and are
/// accumulated in arrival order. `kind` is open-ended on the wire (`"fay"`,
/// `"member"`, `"reasoning"`, ...) and is part of the merge key: the same id
/// with a different kind is a distinct transcript row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyFragment {
    /// Server-assigned reply id, stable across chunks of one reply.
    #[serde(deserialize_with = "de::message_id")]
    pub id: String,

    /// Counterparty user id.
    #[serde(default)]
    pub uid: i64,

    /// Counterparty username.
    pub username: String,

    /// Content chunk to append to the accumulated reply text.
    pub content: String,

    /// Reply kind; part of the merge key.
    #[serde(rename = "type")]
    pub kind: String,

    /// Whether the reply has been adopted into the Q&A store.
    ///
    /// Backend variants send this as bool or integer; normalized to `bool`,
    /// absent means not adopted.
    #[serde(default, deserialize_with = "de::adopted_flag")]
    pub is_adopted: bool,
}

/// One push record from the backend.
///
/// Field presence is meaningful: `None` means "no change", never "reset".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerPush {
    /// Backend run state transition.
    #[serde(rename = "liveState", skip_serializing_if = "Option::is_none")]
    pub live_state: Option<RunState>,

    /// Wholesale replacement of the synthesizer voice options.
    #[serde(rename = "voiceList", skip_serializing_if = "Option::is_none")]
    pub voice_list: Option<Vec<VoiceInfo>>,

    /// Wholesale replacement of the audio device options.
    #[serde(rename = "deviceList", skip_serializing_if = "Option::is_none")]
    pub device_list: Option<Vec<String>>,

    /// Transient status line shown on the panel.
    #[serde(rename = "panelMsg", skip_serializing_if = "Option::is_none")]
    pub panel_msg: Option<String>,

    /// Avatar image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot: Option<String>,

    /// Streamed reply chunk.
    #[serde(rename = "panelReply", skip_serializing_if = "Option::is_none")]
    pub panel_reply: Option<ReplyFragment>,

    /// Backend connection indicator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_connect: Option<bool>,

    /// Remote audio channel indicator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_audio_connect: Option<bool>,
}

impl ServerPush {
    /// Parse one socket text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedPush`] if the frame is not a JSON
    /// object matching the push schema. Callers log the error and drop the
    /// frame; a malformed push never mutates state.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw)
            .map_err(|e| ProtocolError::MalformedPush { detail: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_a_valid_no_op_push() {
        let push = ServerPush::parse("{}").unwrap();
        assert_eq!(push, ServerPush::default());
    }

    #[test]
    fn fields_are_independent() {
        let push = ServerPush::parse(r#"{"robot": "avatar/wave.gif"}"#).unwrap();
        assert_eq!(push.robot.as_deref(), Some("avatar/wave.gif"));
        assert!(push.live_state.is_none());
        assert!(push.panel_reply.is_none());
    }

    #[test]
    fn reply_fragment_normalizes_id_and_adoption() {
        let push = ServerPush::parse(
            r#"{"panelReply": {"id": 42, "uid": 3, "username": "U",
                "content": "hi", "type": "fay", "is_adopted": 1}}"#,
        )
        .unwrap();

        let reply = push.panel_reply.unwrap();
        assert_eq!(reply.id, "42");
        assert_eq!(reply.kind, "fay");
        assert!(reply.is_adopted);
    }

    #[test]
    fn reply_fragment_defaults_adoption_and_uid() {
        let push = ServerPush::parse(
            r#"{"panelReply": {"id": "7", "username": "U", "content": "x", "type": "fay"}}"#,
        )
        .unwrap();

        let reply = push.panel_reply.unwrap();
        assert_eq!(reply.uid, 0);
        assert!(!reply.is_adopted);
    }

    #[test]
    fn live_state_maps_known_values() {
        for (raw, state) in [
            (0, RunState::Stopped),
            (1, RunState::Running),
            (2, RunState::Starting),
            (3, RunState::Stopping),
        ] {
            let push = ServerPush::parse(&format!(r#"{{"liveState": {raw}}}"#)).unwrap();
            assert_eq!(push.live_state, Some(state));
        }
    }

    #[test]
    fn live_state_out_of_range_is_malformed() {
        let err = ServerPush::parse(r#"{"liveState": 9}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedPush { .. }));
    }

    #[test]
    fn non_object_payload_is_malformed() {
        assert!(ServerPush::parse("[1, 2, 3]").is_err());
        assert!(ServerPush::parse("not json").is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let push = ServerPush::parse(r#"{"panelMsg": "ok", "futureField": {"x": 1}}"#).unwrap();
        assert_eq!(push.panel_msg.as_deref(), Some("ok"));
    }

    #[test]
    fn serialized_push_round_trips() {
        let push = ServerPush {
            live_state: Some(RunState::Running),
            voice_list: Some(vec![VoiceInfo { id: "v1".into(), name: "Voice 1".into() }]),
            is_connect: Some(true),
            ..ServerPush::default()
        };

        let raw = serde_json::to_string(&push).unwrap();
        assert_eq!(ServerPush::parse(&raw).unwrap(), push);
    }
}
