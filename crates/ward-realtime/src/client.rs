//! Channel client handle and driver task.
//!
//! [`WsClient`] is a cheap cloneable handle; all transport, timer, and
//! state ownership lives in a single driver task, so no locking is needed
//! anywhere. The driver reacts to caller commands, outbound sends, timer
//! ticks, and transport events, feeding each through the pure state machine
//! in [`crate::state`] and executing the returned commands.
//!
//! Dropping every handle shuts the driver down after an orderly close.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval};
use tracing::{debug, warn};

use ward_core::{Envelope, now_ms};
use ward_settings::RealtimeSettings;

use crate::backoff::backoff_delay_ms;
use crate::state::{ChannelEvent, ChannelState, Command, ConnectionState, apply};
use crate::transport::{Connector, Transport, TransportEvent, WsConnector, build_channel_url};

/// Caller commands delivered to the driver task.
enum Cmd {
    Connect,
    Disconnect,
    UpdateCredential(String),
}

/// Handle to one logical realtime channel.
///
/// Must be created inside a tokio runtime. All methods are non-blocking;
/// lifecycle effects happen asynchronously in the driver task and are
/// observable through [`WsClient::status`] / [`WsClient::watch_status`].
#[derive(Clone)]
pub struct WsClient {
    cmd_tx: mpsc::UnboundedSender<Cmd>,
    outbound_tx: mpsc::UnboundedSender<String>,
    status_rx: watch::Receiver<ConnectionState>,
}

impl WsClient {
    /// Spawn a channel against `url` using the real WebSocket connector.
    ///
    /// Returns the handle plus the stream of parsed inbound messages.
    /// The channel starts disconnected; call [`WsClient::connect`].
    pub fn spawn(
        url: impl Into<String>,
        credential: impl Into<String>,
        settings: RealtimeSettings,
    ) -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        Self::spawn_with_connector(url, credential, settings, Arc::new(WsConnector))
    }

    /// Spawn a channel with a custom [`Connector`].
    pub fn spawn_with_connector(
        url: impl Into<String>,
        credential: impl Into<String>,
        settings: RealtimeSettings,
        connector: Arc<dyn Connector>,
    ) -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionState::Disconnected);

        let driver = Driver {
            url: url.into(),
            credential: credential.into(),
            settings,
            connector,
            state: ChannelState::new(),
            transport: None,
            heartbeat: None,
            retry_at: None,
            cmd_rx,
            outbound_rx,
            message_tx,
            status_tx,
        };
        drop(tokio::spawn(driver.run()));

        (
            Self {
                cmd_tx,
                outbound_tx,
                status_rx,
            },
            message_rx,
        )
    }

    /// Connect, or no-op if already connected.
    ///
    /// Clears the intentional-close flag and cancels any pending retry, so
    /// a fresh reconnect chain replaces whatever was in flight.
    pub fn connect(&self) {
        let _ = self.cmd_tx.send(Cmd::Connect);
    }

    /// Disconnect and suppress all automatic reconnection until the next
    /// [`WsClient::connect`]. Safe to call when already disconnected.
    pub fn disconnect(&self) {
        let _ = self.cmd_tx.send(Cmd::Disconnect);
    }

    /// Replace the bearer credential. If currently connected, the channel
    /// proactively reconnects so no in-flight connection carries a stale
    /// credential.
    pub fn update_credential(&self, credential: impl Into<String>) {
        let _ = self.cmd_tx.send(Cmd::UpdateCredential(credential.into()));
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionState {
        *self.status_rx.borrow()
    }

    /// A watch on status transitions, for callers that need to react to
    /// connection changes (the "status callback").
    pub fn watch_status(&self) -> watch::Receiver<ConnectionState> {
        self.status_rx.clone()
    }

    /// Hand a message to the connected channel.
    ///
    /// Returns `false`, without throwing, when the channel is not connected
    /// or the message cannot be serialized. At-most-once: nothing is queued
    /// for later delivery, and a transport failure after hand-off is logged
    /// and swallowed. Callers needing delivery guarantees must run their
    /// own acknowledgement protocol above this layer.
    pub fn send(&self, message: &Envelope) -> bool {
        if self.status() != ConnectionState::Connected {
            return false;
        }
        match serde_json::to_string(message) {
            Ok(json) => self.outbound_tx.send(json).is_ok(),
            Err(e) => {
                warn!(error = %e, "failed to serialize outbound message");
                false
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver task
// ─────────────────────────────────────────────────────────────────────────────

/// What woke the driver loop.
enum Wake {
    Cmd(Option<Cmd>),
    Outbound(Option<String>),
    HeartbeatTick,
    RetryElapsed,
    Transport(TransportEvent),
}

struct Driver {
    url: String,
    credential: String,
    settings: RealtimeSettings,
    connector: Arc<dyn Connector>,
    state: ChannelState,
    transport: Option<Box<dyn Transport>>,
    heartbeat: Option<Interval>,
    retry_at: Option<Instant>,
    cmd_rx: mpsc::UnboundedReceiver<Cmd>,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    message_tx: mpsc::UnboundedSender<Envelope>,
    status_tx: watch::Sender<ConnectionState>,
}

impl Driver {
    async fn run(mut self) {
        loop {
            let wake = tokio::select! {
                cmd = self.cmd_rx.recv() => Wake::Cmd(cmd),
                outbound = self.outbound_rx.recv() => Wake::Outbound(outbound),
                () = heartbeat_tick(&mut self.heartbeat) => Wake::HeartbeatTick,
                () = retry_sleep(self.retry_at) => Wake::RetryElapsed,
                event = transport_event(&mut self.transport) => Wake::Transport(event),
            };

            match wake {
                Wake::Cmd(Some(Cmd::Connect)) => {
                    self.dispatch(ChannelEvent::ConnectRequested).await;
                }
                Wake::Cmd(Some(Cmd::Disconnect)) => {
                    self.dispatch(ChannelEvent::DisconnectRequested).await;
                }
                Wake::Cmd(Some(Cmd::UpdateCredential(credential))) => {
                    self.credential = credential;
                    self.dispatch(ChannelEvent::CredentialRotated).await;
                }
                // All handles dropped: close out and stop.
                Wake::Cmd(None) | Wake::Outbound(None) => {
                    self.dispatch(ChannelEvent::DisconnectRequested).await;
                    break;
                }
                Wake::Outbound(Some(json)) => self.forward_outbound(json).await,
                Wake::HeartbeatTick => self.send_ping().await,
                Wake::RetryElapsed => {
                    self.retry_at = None;
                    self.dispatch(ChannelEvent::RetryElapsed).await;
                }
                Wake::Transport(TransportEvent::Text(text)) => self.deliver(&text),
                Wake::Transport(TransportEvent::Closed { code }) => {
                    self.transport = None;
                    self.dispatch(ChannelEvent::TransportClosed { code }).await;
                }
            }
        }
        debug!("channel driver stopped");
    }

    /// Feed an event through the state machine and execute the commands.
    ///
    /// Commands that resolve asynchronously (the transport open) produce a
    /// follow-up event, processed in the same dispatch cycle.
    async fn dispatch(&mut self, event: ChannelEvent) {
        let mut pending = vec![event];
        while let Some(event) = pending.pop() {
            let (next, commands) = apply(self.state, event, self.settings.max_reconnect_attempts);
            self.state = next;
            self.publish_status();
            for command in commands {
                if let Some(follow_up) = self.run_command(command).await {
                    pending.push(follow_up);
                }
            }
        }
        self.publish_status();
    }

    async fn run_command(&mut self, command: Command) -> Option<ChannelEvent> {
        match command {
            Command::OpenTransport => {
                let url = match build_channel_url(&self.url, &self.credential) {
                    Ok(url) => url,
                    Err(e) => {
                        warn!(error = %e, "invalid channel url");
                        return Some(ChannelEvent::OpenFailed);
                    }
                };
                match self.connector.open(&url).await {
                    Ok(transport) => {
                        debug!("channel transport open");
                        self.transport = Some(transport);
                        Some(ChannelEvent::OpenSucceeded)
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to open channel transport");
                        Some(ChannelEvent::OpenFailed)
                    }
                }
            }
            Command::CloseTransport { code } => {
                if let Some(mut transport) = self.transport.take() {
                    transport.close(code).await;
                }
                None
            }
            Command::StartHeartbeat => {
                let period = Duration::from_millis(self.settings.heartbeat_interval_ms);
                self.heartbeat = Some(tokio::time::interval_at(Instant::now() + period, period));
                None
            }
            Command::StopHeartbeat => {
                self.heartbeat = None;
                None
            }
            Command::ScheduleRetry { attempt } => {
                let delay =
                    Duration::from_millis(backoff_delay_ms(attempt, self.settings.reconnect_base_ms));
                debug!(?delay, attempt, "scheduling reconnect");
                self.retry_at = Some(Instant::now() + delay);
                None
            }
            Command::CancelRetry => {
                self.retry_at = None;
                None
            }
            Command::GiveUp => {
                warn!(
                    attempts = self.state.attempts,
                    "reconnect attempts exhausted; channel stays down until connect() is called"
                );
                None
            }
        }
    }

    fn publish_status(&self) {
        let connection = self.state.connection;
        let _ = self.status_tx.send_if_modified(|status| {
            if *status == connection {
                false
            } else {
                *status = connection;
                true
            }
        });
    }

    async fn forward_outbound(&mut self, json: String) {
        match (&mut self.transport, self.state.connection) {
            (Some(transport), ConnectionState::Connected) => {
                if let Err(e) = transport.send_text(json).await {
                    warn!(error = %e, "outbound send failed");
                }
            }
            // The hand-off raced a disconnect; at-most-once means drop.
            _ => debug!("dropping outbound message, channel not connected"),
        }
    }

    async fn send_ping(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        match serde_json::to_string(&Envelope::ping(now_ms())) {
            Ok(json) => {
                if let Err(e) = transport.send_text(json).await {
                    warn!(error = %e, "heartbeat send failed");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize heartbeat"),
        }
    }

    fn deliver(&self, text: &str) {
        match serde_json::from_str::<Envelope>(text) {
            Ok(envelope) => {
                let _ = self.message_tx.send(envelope);
            }
            Err(e) => warn!(error = %e, "dropping malformed channel message"),
        }
    }
}

// ── Optional-source futures for the select loop ─────────────────────────────

async fn heartbeat_tick(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            let _ = interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn retry_sleep(retry_at: Option<Instant>) {
    match retry_at {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn transport_event(transport: &mut Option<Box<dyn Transport>>) -> TransportEvent {
    match transport {
        Some(transport) => transport.next_event().await,
        None => std::future::pending().await,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
