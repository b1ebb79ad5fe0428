//! WebSocket transport for the panel link.
//!
//! Provides [`Socket`], a channel-backed handle to one live socket. This is
//! a thin layer that moves text frames between the network and the
//! supervisor; lifecycle policy stays in the Sans-IO
//! [`Link`](stagelink_core::Link).

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{WebSocketStream, connect_async, tungstenite::protocol::Message};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The socket could not be dialed.
    #[error("connection failed: {0}")]
    Connect(String),
}

/// Events one socket delivers, in transport order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// The socket finished opening.
    Opened,
    /// A text frame arrived.
    Message(String),
    /// The socket closed. Clean close, read error, and write error alike.
    Closed,
}

/// Handle to one live socket.
///
/// Dropping the handle (or calling [`Socket::stop`]) aborts the I/O task,
/// which is how a superseded socket's callbacks are detached: an aborted
/// task delivers nothing more.
#[derive(Debug)]
pub struct Socket {
    /// Events from the socket, FIFO per connection.
    pub events: mpsc::Receiver<SocketEvent>,
    /// Encoded command frames to write on the socket.
    pub commands: mpsc::Sender<String>,
    generation: u64,
    abort_handle: tokio::task::AbortHandle,
}

impl Socket {
    /// Generation this socket was opened under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Abort the I/O task. No further events are delivered.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        self.abort_handle.abort();
    }
}

/// Dial the endpoint and spawn the socket I/O task.
///
/// # Errors
///
/// Returns [`TransportError::Connect`] if the dial fails; the caller treats
/// that like any other closure and lets the reconnect policy handle it.
pub async fn connect(endpoint: &str, generation: u64) -> Result<Socket, TransportError> {
    let (ws, _) = connect_async(endpoint)
        .await
        .map_err(|e| TransportError::Connect(e.to_string()))?;

    let (events_tx, events_rx) = mpsc::channel(32);
    let (commands_tx, commands_rx) = mpsc::channel(32);

    let handle = tokio::spawn(run_socket(ws, events_tx, commands_rx));

    Ok(Socket {
        events: events_rx,
        commands: commands_tx,
        generation,
        abort_handle: handle.abort_handle(),
    })
}

/// Run one socket, bridging between channels and the wire.
async fn run_socket<S>(
    ws: WebSocketStream<S>,
    events: mpsc::Sender<SocketEvent>,
    mut commands: mpsc::Receiver<String>,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut sink, mut stream) = ws.split();

    if events.send(SocketEvent::Opened).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if events.send(SocketEvent::Message(text)).await.is_err() {
                        break;
                    }
                },
                Some(Ok(Message::Close(_))) => {
                    let _ = events.send(SocketEvent::Closed).await;
                    break;
                },
                // Ping/pong are answered by the protocol layer; binary
                // frames are not part of this protocol.
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "socket read failed");
                    let _ = events.send(SocketEvent::Closed).await;
                    break;
                },
                None => {
                    let _ = events.send(SocketEvent::Closed).await;
                    break;
                },
            },
            outgoing = commands.recv() => match outgoing {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        tracing::warn!(error = %e, "socket write failed");
                        let _ = events.send(SocketEvent::Closed).await;
                        break;
                    }
                },
                // Supervisor dropped the handle; the task ends with it.
                None => break,
            },
        }
    }
}
