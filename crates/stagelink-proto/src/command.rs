//! Outbound socket commands.

use serde::Serialize;

use crate::error::ProtocolError;

/// Commands the panel writes on the live socket.
///
/// The REST surface carries everything else; the socket only carries the
/// active-counterparty selection, which the backend uses to route
/// per-counterparty pushes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Select the active counterparty by username.
    SelectUser {
        /// Username of the counterparty to make active.
        username: String,
    },
}

impl ClientCommand {
    /// Encode the command as one socket text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        match self {
            Self::SelectUser { username } => {
                #[derive(Serialize)]
                struct Wire<'a> {
                    #[serde(rename = "Username")]
                    username: &'a str,
                }

                serde_json::to_string(&Wire { username })
                    .map_err(|e| ProtocolError::Encode { detail: e.to_string() })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_user_uses_capitalized_wire_key() {
        let cmd = ClientCommand::SelectUser { username: "User".into() };
        assert_eq!(cmd.encode().unwrap(), r#"{"Username":"User"}"#);
    }
}
