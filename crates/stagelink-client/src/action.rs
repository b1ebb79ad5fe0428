//! Rendering side-effects and intents produced by the reducer.

use stagelink_proto::ClientCommand;

/// Actions produced by the [`crate::Panel`] reducer.
///
/// The reducer never performs I/O; the embedding UI (or the supervisor, for
/// socket commands) executes these after each update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Observable state changed; re-render.
    Render,

    /// The visible transcript grew; scroll to the latest entry once the
    /// update settles.
    ScrollTranscript,

    /// Show a transient operator notification.
    Notify {
        /// Notification text.
        message: String,
    },

    /// Write a command on the live socket.
    SendCommand(ClientCommand),

    /// Fetch the first history page for a newly selected counterparty.
    FetchHistory {
        /// Counterparty to load history for.
        username: String,
    },
}
