//! REST client for the panel backend.
//!
//! Collaborators (config forms, buttons, pagination) issue these requests
//! directly; results flow back into the panel through user intents. Older
//! backend endpoints take a form-encoded `data` field holding a JSON
//! document; newer ones take a JSON body. Both shapes are kept here so the
//! rest of the client never sees them.
//!
//! Request failures are reported to the operator and never retried
//! automatically; only the live socket has a recovery loop.

use serde_json::json;
use stagelink_proto::rest::{
    AdoptOutcome, ApiOutcome, ConfigBundle, HistoryPage, HistoryQuery, MemberList,
};
use thiserror::Error;

/// REST request errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure, non-2xx status, or undecodable response body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 200 but reported failure in the envelope.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// Request body could not be encoded.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Client for the backend's REST surface.
#[derive(Debug, Clone)]
pub struct PanelApi {
    base_url: String,
    http: reqwest::Client,
}

impl PanelApi {
    /// Create a client for the given base URL (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, http: reqwest::Client::new() }
    }

    /// Fetch the configuration document and its voice options.
    pub async fn get_data(&self) -> Result<ConfigBundle, ApiError> {
        let bundle = self
            .http
            .post(self.url("/api/get-data"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(bundle)
    }

    /// Submit an updated configuration document.
    pub async fn submit_config(&self, config: &serde_json::Value) -> Result<(), ApiError> {
        let outcome = self
            .post_form("/api/submit", &json!({ "config": config }))
            .await?;
        Self::require_successful(outcome)
    }

    /// Ask the backend to start the live run.
    pub async fn start_live(&self) -> Result<(), ApiError> {
        let outcome: ApiOutcome = self
            .http
            .post(self.url("/api/start-live"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Self::require_successful(outcome)
    }

    /// Ask the backend to stop the live run.
    pub async fn stop_live(&self) -> Result<(), ApiError> {
        let outcome: ApiOutcome = self
            .http
            .post(self.url("/api/stop-live"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Self::require_successful(outcome)
    }

    /// Send a chat message to the given counterparty.
    ///
    /// The backend echoes the message back over the socket as a reply
    /// fragment, so nothing is appended locally on success.
    pub async fn send_message(&self, username: &str, msg: &str) -> Result<(), ApiError> {
        let outcome = self
            .post_form("/api/send", &json!({ "msg": msg, "username": username }))
            .await?;
        Self::require_successful(outcome)
    }

    /// Fetch one page of message history.
    pub async fn message_history(&self, query: &HistoryQuery) -> Result<HistoryPage, ApiError> {
        let payload = Self::encode_data(query)?;
        let page = self
            .http
            .post(self.url("/api/get-msg"))
            .form(&[("data", payload)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(page)
    }

    /// Fetch the known counterparties.
    pub async fn member_list(&self) -> Result<Vec<(i64, String)>, ApiError> {
        let members: MemberList = self
            .http
            .post(self.url("/api/get-member-list"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(members.list)
    }

    /// Adopt a reply into the backend's Q&A store.
    pub async fn adopt_message(&self, id: &str) -> Result<AdoptOutcome, ApiError> {
        self.post_adoption("/api/adopt-msg", id).await
    }

    /// Remove a reply from the backend's Q&A store.
    ///
    /// The returned outcome lists every message id whose adoption was
    /// cleared; the backend unadopts all rows sharing the same content.
    pub async fn unadopt_message(&self, id: &str) -> Result<AdoptOutcome, ApiError> {
        self.post_adoption("/api/unadopt-msg", id).await
    }

    async fn post_adoption(&self, path: &str, id: &str) -> Result<AdoptOutcome, ApiError> {
        // Ids are normalized to strings client-side; the backend stores
        // numeric keys, so send numbers back as numbers.
        let wire_id = id
            .parse::<i64>()
            .map_or_else(|_| serde_json::Value::from(id), serde_json::Value::from);

        let outcome: AdoptOutcome = self
            .http
            .post(self.url(path))
            .json(&json!({ "id": wire_id }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if outcome.is_successful() {
            Ok(outcome)
        } else {
            Err(ApiError::Rejected(outcome.msg))
        }
    }

    async fn post_form<T: serde::Serialize>(
        &self,
        path: &str,
        inner: &T,
    ) -> Result<ApiOutcome, ApiError> {
        let payload = Self::encode_data(inner)?;
        let outcome = self
            .http
            .post(self.url(path))
            .form(&[("data", payload)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(outcome)
    }

    fn encode_data<T: serde::Serialize>(inner: &T) -> Result<String, ApiError> {
        serde_json::to_string(inner).map_err(|e| ApiError::Encode(e.to_string()))
    }

    fn require_successful(outcome: ApiOutcome) -> Result<(), ApiError> {
        if outcome.is_successful() {
            Ok(())
        } else {
            Err(ApiError::Rejected(outcome.message))
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
