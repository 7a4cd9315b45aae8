//! Pure channel state machine.
//!
//! All lifecycle logic lives in [`apply`]: given the current
//! [`ChannelState`] and a [`ChannelEvent`], it returns the next state plus
//! the list of side-effecting [`Command`]s for the driver to execute. No
//! sockets, no timers, no randomness — the machine is unit-testable in
//! isolation, and the driver stays a thin executor.
//!
//! Retry budget: `attempts` counts consecutive failed opens. It resets to
//! zero on a successful open and on an explicit `connect()` (an external
//! connect starts a fresh chain — that is how a caller resumes after the
//! budget is exhausted). Once `attempts` reaches the configured maximum,
//! the next failure yields [`Command::GiveUp`] and no further retry is
//! scheduled.

use serde::{Deserialize, Serialize};

use ward_core::is_auth_rejection;
use ward_core::wire::CLOSE_NORMAL;

/// Connection status reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// A transport open is in flight.
    Connecting,
    /// The transport is open and usable.
    Connected,
    /// No transport; either idle, intentionally closed, or awaiting retry.
    Disconnected,
    /// The last open attempt failed.
    Error,
}

/// Full channel state carried between events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelState {
    /// Reported connection status.
    pub connection: ConnectionState,
    /// Consecutive failed open attempts since the last success.
    pub attempts: u32,
    /// Set by `disconnect()`; suppresses every automatic reconnect until
    /// the next `connect()` clears it.
    pub intentionally_closed: bool,
}

impl ChannelState {
    /// Initial state: disconnected, fresh retry budget.
    pub fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            attempts: 0,
            intentionally_closed: false,
        }
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs to the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Caller asked to connect.
    ConnectRequested,
    /// A transport open completed successfully.
    OpenSucceeded,
    /// A transport open failed or threw during setup.
    OpenFailed,
    /// The transport closed; `code` is the close code if one was received.
    TransportClosed {
        /// Close code carried by the close frame, if any.
        code: Option<u16>,
    },
    /// The scheduled reconnect delay elapsed.
    RetryElapsed,
    /// Caller asked to disconnect.
    DisconnectRequested,
    /// Caller replaced the bearer credential.
    CredentialRotated,
}

/// Side effects for the driver to execute, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Open a new transport against the configured URL and credential.
    OpenTransport,
    /// Close and discard the current transport with the given close code.
    CloseTransport {
        /// Close code to send.
        code: u16,
    },
    /// Start the heartbeat timer.
    StartHeartbeat,
    /// Cancel the heartbeat timer.
    StopHeartbeat,
    /// Schedule a reconnect for the given zero-based attempt number.
    ScheduleRetry {
        /// Zero-based attempt index, input to the backoff formula.
        attempt: u32,
    },
    /// Cancel any pending reconnect timer.
    CancelRetry,
    /// The retry budget is exhausted; report and stop.
    GiveUp,
}

/// Apply one event, returning the next state and the commands to run.
pub fn apply(
    state: ChannelState,
    event: ChannelEvent,
    max_attempts: u32,
) -> (ChannelState, Vec<Command>) {
    match event {
        ChannelEvent::ConnectRequested => {
            if state.connection == ConnectionState::Connected {
                return (state, Vec::new());
            }
            (
                ChannelState {
                    connection: ConnectionState::Connecting,
                    attempts: 0,
                    intentionally_closed: false,
                },
                vec![Command::CancelRetry, Command::OpenTransport],
            )
        }

        ChannelEvent::OpenSucceeded => (
            ChannelState {
                connection: ConnectionState::Connected,
                attempts: 0,
                ..state
            },
            vec![Command::StartHeartbeat],
        ),

        ChannelEvent::OpenFailed => {
            if state.intentionally_closed {
                return (
                    ChannelState {
                        connection: ConnectionState::Disconnected,
                        ..state
                    },
                    Vec::new(),
                );
            }
            let next = ChannelState {
                connection: ConnectionState::Error,
                ..state
            };
            retry_or_give_up(next, max_attempts)
        }

        ChannelEvent::TransportClosed { code } => {
            let next = ChannelState {
                connection: ConnectionState::Disconnected,
                ..state
            };
            if state.intentionally_closed {
                return (next, vec![Command::StopHeartbeat]);
            }
            if code.is_some_and(is_auth_rejection) {
                // Credential-based rejection will not self-heal.
                return (next, vec![Command::StopHeartbeat]);
            }
            let (next, mut commands) = retry_or_give_up(next, max_attempts);
            commands.insert(0, Command::StopHeartbeat);
            (next, commands)
        }

        ChannelEvent::RetryElapsed => {
            if state.intentionally_closed {
                return (state, Vec::new());
            }
            (
                ChannelState {
                    connection: ConnectionState::Connecting,
                    ..state
                },
                vec![Command::OpenTransport],
            )
        }

        ChannelEvent::DisconnectRequested => (
            ChannelState {
                connection: ConnectionState::Disconnected,
                intentionally_closed: true,
                ..state
            },
            vec![
                Command::StopHeartbeat,
                Command::CancelRetry,
                Command::CloseTransport { code: CLOSE_NORMAL },
            ],
        ),

        ChannelEvent::CredentialRotated => {
            if state.connection != ConnectionState::Connected {
                // Not connected: the next open picks up the new credential.
                return (state, Vec::new());
            }
            (
                ChannelState {
                    connection: ConnectionState::Connecting,
                    ..state
                },
                vec![
                    Command::StopHeartbeat,
                    Command::CloseTransport { code: CLOSE_NORMAL },
                    Command::OpenTransport,
                ],
            )
        }
    }
}

/// Schedule the next retry, or give up once the budget is spent.
fn retry_or_give_up(state: ChannelState, max_attempts: u32) -> (ChannelState, Vec<Command>) {
    if state.attempts >= max_attempts {
        return (state, vec![Command::GiveUp]);
    }
    (
        ChannelState {
            attempts: state.attempts + 1,
            ..state
        },
        vec![Command::ScheduleRetry {
            attempt: state.attempts,
        }],
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
