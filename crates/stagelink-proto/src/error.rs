//! Error types for wire-boundary validation.

use thiserror::Error;

/// Errors produced while decoding or encoding protocol payloads.
///
/// Decode failures are not fatal anywhere in the client: the offending
/// payload is logged and dropped, and state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Inbound push payload was not a valid push record.
    #[error("malformed push payload: {detail}")]
    MalformedPush {
        /// Parser-reported reason.
        detail: String,
    },

    /// Run state value outside the known enumeration.
    #[error("unknown run state: {0}")]
    UnknownRunState(u8),

    /// Outbound command could not be encoded.
    #[error("encode failed: {detail}")]
    Encode {
        /// Serializer-reported reason.
        detail: String,
    },
}
