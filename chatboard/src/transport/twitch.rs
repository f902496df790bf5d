//! IRC-over-WebSocket chat client.
//!
//! Connects to the chat endpoint, performs the login handshake
//! (capabilities, `PASS`, `NICK`, `JOIN`), then spawns a background
//! reader task that splits frames into IRC lines and forwards chat
//! messages over an `mpsc` channel. Keepalive `PING`s are answered
//! transport-side so the application layer never sees them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use chatboard_irc::{Privmsg, ServerMessage, client, parse_line};

use super::TransportError;

/// Type alias for the write half of a WebSocket connection.
type WsSender = futures_util::stream::SplitSink<
    WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;

/// Type alias for the read half of a WebSocket connection.
type WsReader =
    futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>;

/// Timeout for the login handshake after the socket is up.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Buffer for chat messages between the reader task and the consumer.
const INCOMING_BUFFER: usize = 256;

/// Connection parameters for [`TwitchChat::connect`].
#[derive(Debug, Clone)]
pub struct ConnectParams {
    /// WebSocket endpoint (`wss://irc-ws.chat.twitch.tv:443`).
    pub ws_url: String,
    /// Bot account login name.
    pub login: String,
    /// OAuth access token (without the `oauth:` sigil).
    pub token: String,
    /// Channel to join, with or without the `#` sigil.
    pub channel: String,
    /// Timeout for establishing the WebSocket connection.
    pub connect_timeout: Duration,
}

/// A live chat connection.
///
/// Created via [`TwitchChat::connect`]; dropped connections are not
/// reused — the supervisor in [`crate::net`] builds a fresh one per
/// attempt.
pub struct TwitchChat {
    /// Channel of parsed chat messages from the background reader task.
    incoming: mpsc::Receiver<Privmsg>,
    /// Whether the WebSocket connection is still up.
    connected: Arc<AtomicBool>,
    /// Handle to the background reader task (kept alive for the
    /// connection's lifetime).
    _reader_handle: tokio::task::JoinHandle<()>,
}

impl TwitchChat {
    /// Connect, authenticate, and join the configured channel.
    ///
    /// Performs the following steps:
    /// 1. Establishes the WebSocket connection (configured timeout)
    /// 2. Sends `CAP REQ`, `PASS`, `NICK`, `JOIN` in protocol order
    /// 3. Waits for the `001` welcome (5s timeout); a `NOTICE` about
    ///    failed authentication aborts instead
    /// 4. Spawns the background reader task
    ///
    /// # Errors
    ///
    /// - [`TransportError::Timeout`] if connection or login times out.
    /// - [`TransportError::LoginRejected`] if the server refuses the token.
    /// - [`TransportError::Connect`] / [`TransportError::Io`] for
    ///   WebSocket-level failures.
    pub async fn connect(params: &ConnectParams) -> Result<Self, TransportError> {
        let (ws_stream, _response) =
            tokio::time::timeout(params.connect_timeout, connect_async(params.ws_url.as_str()))
                .await
                .map_err(|_| {
                    tracing::warn!(url = %params.ws_url, "chat WebSocket connect timed out");
                    TransportError::Timeout
                })?
                .map_err(|e| {
                    tracing::warn!(url = %params.ws_url, err = %e, "chat WebSocket connect failed");
                    map_ws_error(e)
                })?;

        let (mut ws_sender, mut ws_reader) = ws_stream.split();

        // Login handshake. Order matters: PASS must precede NICK.
        for line in [
            client::cap_req().to_string(),
            client::pass(&params.token),
            client::nick(&params.login),
            client::join(&params.channel),
        ] {
            ws_sender
                .send(Message::text(line))
                .await
                .map_err(|e| {
                    tracing::warn!(err = %e, "failed to send login line");
                    map_ws_error(e)
                })?;
        }

        wait_for_welcome(&mut ws_reader).await?;
        tracing::info!(channel = %params.channel, login = %params.login, "joined chat");

        let (tx, rx) = mpsc::channel(INCOMING_BUFFER);
        let connected = Arc::new(AtomicBool::new(true));
        let reader_connected = Arc::clone(&connected);
        let sender = Arc::new(Mutex::new(ws_sender));

        let reader_handle = tokio::spawn(reader_loop(ws_reader, sender, tx, reader_connected));

        Ok(Self {
            incoming: rx,
            connected,
            _reader_handle: reader_handle,
        })
    }

    /// Receive the next chat message.
    ///
    /// Returns `None` when the connection has closed and every buffered
    /// message has been drained.
    pub async fn next_message(&mut self) -> Option<Privmsg> {
        self.incoming.recv().await
    }

    /// Whether the WebSocket connection is still up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Read frames until the server accepts the login (`001`).
///
/// Twitch reports bad credentials as a `NOTICE` before closing, so a
/// notice mentioning authentication is treated as a rejection.
async fn wait_for_welcome(ws_reader: &mut WsReader) -> Result<(), TransportError> {
    loop {
        let frame = tokio::time::timeout(LOGIN_TIMEOUT, ws_reader.next())
            .await
            .map_err(|_| {
                tracing::warn!("timed out waiting for login acknowledgment");
                TransportError::Timeout
            })?;
        match frame {
            Some(Ok(Message::Text(text))) => {
                for line in text.lines() {
                    match parse_line(line) {
                        Some(ServerMessage::Welcome) => return Ok(()),
                        Some(ServerMessage::Notice { text }) => {
                            tracing::warn!(notice = %text, "server notice during login");
                            if text.to_lowercase().contains("authentication failed")
                                || text.to_lowercase().contains("improperly formatted auth")
                            {
                                return Err(TransportError::LoginRejected(text));
                            }
                        }
                        _ => {}
                    }
                }
            }
            Some(Ok(Message::Close(_))) => {
                tracing::warn!("chat server closed connection during login");
                return Err(TransportError::ConnectionClosed);
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::warn!(err = %e, "WebSocket error during login");
                return Err(map_ws_error(e));
            }
            None => {
                tracing::warn!("chat WebSocket stream ended during login");
                return Err(TransportError::ConnectionClosed);
            }
        }
    }
}

/// Background task that reads WebSocket frames and dispatches chat lines.
///
/// One frame may carry several CRLF-separated IRC lines. Chat messages
/// go to the `tx` channel; `PING`s are answered inline; everything else
/// is logged at debug and skipped — malformed lines never take the
/// connection down.
///
/// Sets `connected` to `false` when the WebSocket closes or errors out.
async fn reader_loop(
    mut ws_reader: WsReader,
    ws_sender: Arc<Mutex<WsSender>>,
    tx: mpsc::Sender<Privmsg>,
    connected: Arc<AtomicBool>,
) {
    'read: while let Some(frame) = ws_reader.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                for line in text.lines() {
                    match parse_line(line) {
                        Some(ServerMessage::Privmsg(msg)) => {
                            if tx.send(msg).await.is_err() {
                                // Receiver dropped — connection owner is gone.
                                break 'read;
                            }
                        }
                        Some(ServerMessage::Ping { payload }) => {
                            let mut sender = ws_sender.lock().await;
                            if let Err(e) = sender.send(Message::text(client::pong(&payload))).await
                            {
                                tracing::warn!(err = %e, "failed to answer PING");
                                break 'read;
                            }
                        }
                        Some(ServerMessage::Notice { text }) => {
                            tracing::debug!(notice = %text, "server notice");
                        }
                        Some(ServerMessage::Join { channel }) => {
                            tracing::debug!(channel = %channel, "join confirmed");
                        }
                        Some(ServerMessage::Welcome | ServerMessage::Other { .. }) | None => {}
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let mut sender = ws_sender.lock().await;
                if let Err(e) = sender.send(Message::Pong(payload)).await {
                    tracing::warn!(err = %e, "failed to answer WebSocket ping");
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("chat WebSocket closed by server");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(err = %e, "chat WebSocket read error");
                break;
            }
        }
    }
    connected.store(false, Ordering::Relaxed);
    tracing::info!("chat reader task exiting");
}

/// Map a `tokio_tungstenite` error to a [`TransportError`].
fn map_ws_error(err: tokio_tungstenite::tungstenite::Error) -> TransportError {
    use tokio_tungstenite::tungstenite::Error as WsError;
    match err {
        WsError::Io(e) => TransportError::Io(e),
        WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::ConnectionClosed,
        other => TransportError::Connect(other.to_string()),
    }
}
