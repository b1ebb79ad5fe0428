//! REST payload types.
//!
//! The backend's HTTP surface wraps everything in small JSON envelopes.
//! Endpoints predating the JSON body convention take a form-encoded `data`
//! field holding a JSON document; the request types here serialize into
//! that inner document, and the API client picks the outer encoding.

use serde::{Deserialize, Serialize};

use crate::{VoiceInfo, de};

/// One persisted transcript row returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryItem {
    /// Reply kind; same key space as the push path.
    #[serde(rename = "type")]
    pub kind: String,

    /// Input modality the message arrived through.
    #[serde(default)]
    pub way: String,

    /// Full accumulated message content.
    pub content: String,

    /// Creation time as a unix timestamp.
    #[serde(default)]
    pub createtime: f64,

    /// Preformatted display timestamp.
    #[serde(default)]
    pub timetext: String,

    /// Counterparty username.
    pub username: String,

    /// Message id; numbers normalized to strings as on the push path.
    #[serde(deserialize_with = "de::message_id")]
    pub id: String,

    /// Adoption flag, normalized to `bool`.
    #[serde(default, deserialize_with = "de::adopted_flag")]
    pub is_adopted: bool,
}

/// One page of message history, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HistoryPage {
    /// Rows in this page.
    #[serde(default)]
    pub list: Vec<HistoryItem>,

    /// Total rows available for the counterparty.
    #[serde(default)]
    pub total: u64,

    /// Whether another page exists past this one.
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
}

/// Pagination request for the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryQuery {
    /// Counterparty to fetch history for.
    pub username: String,

    /// Maximum rows per page.
    pub limit: u32,

    /// Rows to skip from the newest end.
    pub offset: u32,
}

/// Known counterparties as `[uid, username]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MemberList {
    /// Roster entries in server order.
    #[serde(default)]
    pub list: Vec<(i64, String)>,
}

/// Configuration document plus the voice options valid for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConfigBundle {
    /// Backend configuration tree, passed through opaquely.
    pub config: serde_json::Value,

    /// Voice options for the configured synthesizer.
    #[serde(default)]
    pub voice_list: Vec<VoiceInfo>,
}

/// Generic mutation outcome envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ApiOutcome {
    /// `"successful"` on success, `"error"` otherwise.
    #[serde(default)]
    pub result: String,

    /// Backend-provided failure detail.
    #[serde(default)]
    pub message: String,
}

impl ApiOutcome {
    /// Whether the backend reported success.
    pub fn is_successful(&self) -> bool {
        self.result == "successful"
    }
}

/// Outcome envelope for the adopt/unadopt endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AdoptOutcome {
    /// `"success"` or `"error"`.
    #[serde(default)]
    pub status: String,

    /// Backend-provided detail.
    #[serde(default)]
    pub msg: String,

    /// On unadopt: every message id whose adoption was cleared (the backend
    /// unadopts all rows sharing the same content).
    #[serde(default, deserialize_with = "de::message_id_list")]
    pub unadopted_ids: Vec<String>,
}

impl AdoptOutcome {
    /// Whether the backend reported success.
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }
}
