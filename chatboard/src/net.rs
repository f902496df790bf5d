//! Networking coordinator for wiring the TUI to the async chat stack.
//!
//! This module bridges the synchronous TUI event loop (crossterm
//! poll-based) with the async token-fetch / WebSocket transport stack.
//! It spawns a supervisor task and communicates with the main thread via
//! [`NetCommand`] / [`NetEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── NetEvent ───  tokio supervisor task
//!                     ─── NetCommand →
//! ```
//!
//! The supervisor owns the connection lifecycle: fetch a fresh token,
//! connect, pump chat messages, and on disconnect retry with
//! exponential backoff until the attempt cap is reached. The main
//! thread only ever drains [`NetEvent`]s and, on shutdown, sends
//! [`NetCommand::Shutdown`].

use std::time::Duration;

use tokio::sync::mpsc;

use chatboard_irc::Privmsg;

use crate::auth;
use crate::config::ReconnectConfig;
use crate::transport::twitch::{ConnectParams, TwitchChat};

/// Commands sent from the TUI main loop to the networking supervisor.
#[derive(Debug)]
pub enum NetCommand {
    /// Gracefully shut down the networking tasks.
    Shutdown,
}

/// Events sent from the networking supervisor to the TUI main loop.
#[derive(Debug)]
pub enum NetEvent {
    /// A chat message arrived in the joined channel.
    Chat(Privmsg),
    /// The chat connection is up.
    Connected,
    /// The chat connection dropped.
    Disconnected,
    /// A reconnect attempt is pending.
    Reconnecting {
        /// 1-based attempt number within the current outage.
        attempt: u32,
        /// Configured attempt cap.
        max_attempts: u32,
    },
    /// The attempt cap was exhausted; the supervisor has stopped.
    ReconnectFailed,
    /// A non-fatal error worth surfacing in the status line.
    Error(String),
}

/// Configuration for the networking layer.
#[derive(Debug, Clone)]
pub struct NetConfig {
    /// Chat WebSocket endpoint.
    pub ws_url: String,
    /// Bot account login name.
    pub login: String,
    /// Channel to join.
    pub channel: String,
    /// Token-exchange endpoint URL.
    pub token_url: String,
    /// Timeout for establishing the chat connection.
    pub connect_timeout: Duration,
    /// Backoff policy for reconnect attempts.
    pub reconnect: ReconnectConfig,
}

/// Channel capacity for command/event mpsc channels.
const CHANNEL_CAPACITY: usize = 256;

/// Spawn the networking supervisor and return channel handles.
///
/// Returns immediately; connection progress arrives as [`NetEvent`]s
/// (the first is either [`NetEvent::Connected`] or an error followed by
/// reconnect attempts).
#[must_use]
pub fn spawn_net(config: NetConfig) -> (mpsc::Sender<NetCommand>, mpsc::Receiver<NetEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<NetCommand>(CHANNEL_CAPACITY);
    let (evt_tx, evt_rx) = mpsc::channel::<NetEvent>(CHANNEL_CAPACITY);

    tokio::spawn(supervisor(config, cmd_rx, evt_tx));

    (cmd_tx, evt_rx)
}

/// Connection lifecycle: token fetch → connect → pump → backoff → retry.
async fn supervisor(
    config: NetConfig,
    mut cmd_rx: mpsc::Receiver<NetCommand>,
    evt_tx: mpsc::Sender<NetEvent>,
) {
    let http = reqwest::Client::new();
    // Attempts since the last healthy connection.
    let mut attempt: u32 = 0;

    loop {
        match connect_once(&config, &http).await {
            Ok(mut chat) => {
                attempt = 0;
                if evt_tx.send(NetEvent::Connected).await.is_err() {
                    return;
                }
                if !pump(&mut chat, &mut cmd_rx, &evt_tx).await {
                    return;
                }
                if evt_tx.send(NetEvent::Disconnected).await.is_err() {
                    return;
                }
            }
            Err(reason) => {
                tracing::warn!(reason = %reason, "chat connection attempt failed");
                if evt_tx.send(NetEvent::Error(reason)).await.is_err() {
                    return;
                }
            }
        }

        attempt += 1;
        if attempt > config.reconnect.max_attempts {
            tracing::warn!(
                attempts = config.reconnect.max_attempts,
                "reconnect attempts exhausted"
            );
            let _ = evt_tx.send(NetEvent::ReconnectFailed).await;
            return;
        }

        let delay = config.reconnect.delay_for(attempt);
        tracing::info!(attempt, delay_ms = delay.as_millis() as u64, "reconnecting");
        if evt_tx
            .send(NetEvent::Reconnecting {
                attempt,
                max_attempts: config.reconnect.max_attempts,
            })
            .await
            .is_err()
        {
            return;
        }

        // Honor shutdown while waiting out the backoff.
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            cmd = cmd_rx.recv() => match cmd {
                Some(NetCommand::Shutdown) | None => {
                    tracing::info!("net supervisor shutting down during backoff");
                    return;
                }
            },
        }
    }
}

/// One connection attempt: fresh token, then the login handshake.
async fn connect_once(config: &NetConfig, http: &reqwest::Client) -> Result<TwitchChat, String> {
    let token = auth::fetch_access_token(http, &config.token_url)
        .await
        .map_err(|e| format!("token fetch failed: {e}"))?;

    let params = ConnectParams {
        ws_url: config.ws_url.clone(),
        login: config.login.clone(),
        token,
        channel: config.channel.clone(),
        connect_timeout: config.connect_timeout,
    };
    TwitchChat::connect(&params)
        .await
        .map_err(|e| format!("chat connect failed: {e}"))
}

/// Forward chat messages until the connection drops or a shutdown
/// command arrives. Returns `false` when the supervisor should exit.
async fn pump(
    chat: &mut TwitchChat,
    cmd_rx: &mut mpsc::Receiver<NetCommand>,
    evt_tx: &mpsc::Sender<NetEvent>,
) -> bool {
    loop {
        tokio::select! {
            msg = chat.next_message() => match msg {
                Some(msg) => {
                    if evt_tx.send(NetEvent::Chat(msg)).await.is_err() {
                        return false;
                    }
                }
                // Reader task ended: the connection is gone.
                None => return true,
            },
            cmd = cmd_rx.recv() => match cmd {
                Some(NetCommand::Shutdown) | None => {
                    tracing::info!("net supervisor shutting down");
                    return false;
                }
            },
        }
    }
}
