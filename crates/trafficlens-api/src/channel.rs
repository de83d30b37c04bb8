//! Persistent Socket.IO channel over a single WebSocket.
//!
//! Connects to the detection server's Socket.IO endpoint, performs the
//! Engine.IO / namespace handshake, answers pings, and forwards every
//! server event as a [`ChannelEvent`] over an mpsc channel so the
//! consumer sees them strictly in arrival order. Outbound events queued
//! through [`ChannelHandle::emit`] are written once the namespace is
//! connected.
//!
//! Reconnection is off unless [`ReconnectConfig::enabled`] is set: a lost
//! connection then reports [`ChannelEvent::Disconnected`] and the task ends.
//!
//! # Example
//!
//! ```rust,ignore
//! use trafficlens_api::channel::{ChannelConfig, ChannelEvent, ChannelHandle};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = ChannelConfig::new(&"http://localhost:5000".parse()?)?;
//! let (handle, mut events) = ChannelHandle::spawn(config, CancellationToken::new());
//!
//! handle.emit("start_monitoring")?;
//! while let Some(event) = events.recv().await {
//!     if let ChannelEvent::Message { name, payload } = event {
//!         println!("{name}: {payload}");
//!     }
//! }
//! ```

use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::{self, ClientRequestBuilder, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::protocol::{DEFAULT_NAMESPACE, ENGINE_IO_VERSION, EnginePacket, Handshake, SocketPacket};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;

// ── ChannelEvent ─────────────────────────────────────────────────────

/// Something that happened on the channel, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The default namespace is connected.
    Connected { sid: Option<String> },
    /// An established session ended.
    Disconnected { reason: String },
    /// A connection attempt failed before the namespace was joined.
    ConnectFailed { reason: String },
    /// A server event. `payload` is the first event argument, or `null`.
    Message { name: String, payload: Value },
}

// ── Configuration ────────────────────────────────────────────────────

/// Exponential backoff configuration for reconnection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Whether a lost or failed connection is retried at all. Default: off.
    pub enabled: bool,

    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

/// Everything the channel task needs to reach the server.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Fully resolved `ws(s)://…/socket.io/?EIO=4&transport=websocket` URL.
    pub endpoint: Url,
    /// Time allowed for the WebSocket upgrade plus the namespace connect.
    pub handshake_timeout: Duration,
    pub reconnect: ReconnectConfig,
}

impl ChannelConfig {
    /// Build a config for a server base URL with default timings.
    pub fn new(server: &Url) -> Result<Self, Error> {
        Ok(Self {
            endpoint: socket_io_endpoint(server)?,
            handshake_timeout: Duration::from_secs(10),
            reconnect: ReconnectConfig::default(),
        })
    }
}

/// Map a server base URL (`http://localhost:5000`) onto its Socket.IO
/// WebSocket endpoint (`ws://localhost:5000/socket.io/?EIO=4&transport=websocket`).
///
/// A non-root path is kept as-is, for servers mounted under a custom path.
pub fn socket_io_endpoint(server: &Url) -> Result<Url, Error> {
    let scheme = match server.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(Error::UnsupportedScheme(other.to_owned())),
    };

    let mut endpoint = server.clone();
    endpoint
        .set_scheme(scheme)
        .map_err(|()| Error::UnsupportedScheme(server.scheme().to_owned()))?;
    if endpoint.path() == "/" || endpoint.path().is_empty() {
        endpoint.set_path("/socket.io/");
    }
    endpoint
        .query_pairs_mut()
        .clear()
        .append_pair("EIO", ENGINE_IO_VERSION)
        .append_pair("transport", "websocket");
    endpoint.set_fragment(None);
    Ok(endpoint)
}

// ── ChannelHandle ────────────────────────────────────────────────────

/// Handle to a running channel task.
///
/// Cheaply cloneable. Dropping the handles does not stop the task; call
/// [`shutdown`](Self::shutdown) or cancel the token passed to
/// [`spawn`](Self::spawn).
#[derive(Clone)]
pub struct ChannelHandle {
    outbound_tx: mpsc::UnboundedSender<SocketPacket>,
    cancel: CancellationToken,
}

impl ChannelHandle {
    /// Spawn the channel task and return the handle plus the ordered
    /// stream of channel events.
    ///
    /// Must be called from within a tokio runtime. The first connection
    /// attempt happens asynchronously.
    pub fn spawn(
        config: ChannelConfig,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            channel_loop(config, event_tx, outbound_rx, task_cancel).await;
        });

        (Self { outbound_tx, cancel }, event_rx)
    }

    /// Queue an event without payload, e.g. `start_monitoring`.
    pub fn emit(&self, name: &str) -> Result<(), Error> {
        self.send(SocketPacket::event(name, Vec::new()))
    }

    fn send(&self, packet: SocketPacket) -> Result<(), Error> {
        self.outbound_tx
            .send(packet)
            .map_err(|_| Error::ChannelClosed)
    }

    /// Signal the background task to close the connection and exit.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background loop ──────────────────────────────────────────────────

/// How a single session ended without a pre-connect error.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Cancelled,
    Closed { reason: String },
}

/// Main loop: connect → read → on loss, optionally backoff → reconnect.
async fn channel_loop(
    config: ChannelConfig,
    event_tx: mpsc::UnboundedSender<ChannelEvent>,
    mut outbound_rx: mpsc::UnboundedReceiver<SocketPacket>,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        let retryable = match run_session(&config, &event_tx, &mut outbound_rx, &cancel).await {
            Ok(SessionEnd::Cancelled) => break,
            Ok(SessionEnd::Closed { reason }) => {
                tracing::info!(%reason, "channel disconnected");
                let _ = event_tx.send(ChannelEvent::Disconnected { reason });
                attempt = 0;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, attempt, "channel connection failed");
                let retryable = e.is_transient();
                let _ = event_tx.send(ChannelEvent::ConnectFailed {
                    reason: e.to_string(),
                });
                retryable
            }
        };

        if !config.reconnect.enabled || !retryable {
            break;
        }

        if let Some(max) = config.reconnect.max_retries {
            if attempt >= max {
                tracing::error!(
                    max_retries = max,
                    "channel reconnection limit reached, giving up"
                );
                break;
            }
        }

        let delay = calculate_backoff(attempt, &config.reconnect);
        tracing::info!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            attempt,
            "waiting before reconnect"
        );

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
    }

    tracing::debug!("channel loop exiting");
}

// ── Single session lifecycle ─────────────────────────────────────────

/// Establish one WebSocket, join the namespace, and pump frames until the
/// session ends.
///
/// Failures before the namespace is joined are returned as errors; once
/// connected every ending is reported as [`SessionEnd::Closed`].
async fn run_session(
    config: &ChannelConfig,
    event_tx: &mpsc::UnboundedSender<ChannelEvent>,
    outbound_rx: &mut mpsc::UnboundedReceiver<SocketPacket>,
    cancel: &CancellationToken,
) -> Result<SessionEnd, Error> {
    tracing::info!(url = %config.endpoint, "connecting to channel");

    let timeout_secs = config.handshake_timeout.as_secs();
    let uri: tungstenite::http::Uri = config
        .endpoint
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::WebSocketConnect(e.to_string()))?;

    let connect = tokio::time::timeout(
        config.handshake_timeout,
        tokio_tungstenite::connect_async(ClientRequestBuilder::new(uri)),
    );
    let ws_stream = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(SessionEnd::Cancelled),
        result = connect => match result {
            Ok(Ok((stream, _response))) => stream,
            Ok(Err(e)) => return Err(Error::WebSocketConnect(e.to_string())),
            Err(_) => return Err(Error::HandshakeTimeout { timeout_secs }),
        },
    };

    tracing::debug!("WebSocket upgraded, awaiting Engine.IO open");

    let (mut write, mut read) = ws_stream.split();
    let mut session = Session::default();
    let deadline = tokio::time::sleep(config.handshake_timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                close_gracefully(&mut write, session.is_connected()).await;
                return Ok(SessionEnd::Cancelled);
            }

            () = &mut deadline => {
                return if session.is_connected() {
                    Ok(SessionEnd::Closed { reason: "ping timeout".into() })
                } else {
                    Err(Error::HandshakeTimeout { timeout_secs })
                };
            }

            Some(packet) = outbound_rx.recv(), if session.is_connected() => {
                tracing::debug!(frame = %packet.to_frame(), "emitting");
                if let Err(e) = write.send(Message::text(packet.to_frame())).await {
                    return Ok(SessionEnd::Closed { reason: e.to_string() });
                }
            }

            frame = read.next() => {
                let step = match frame {
                    Some(Ok(Message::Text(text))) => match session.on_frame(&text) {
                        Ok(step) => step,
                        Err(e) if session.is_connected() => {
                            tracing::warn!(error = %e, "dropping malformed frame");
                            continue;
                        }
                        Err(e) => return Err(e),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame.map_or_else(
                            || "server closed the connection".to_owned(),
                            |cf| format!("close frame {}: {}", cf.code, cf.reason),
                        );
                        return end_session(&session, reason);
                    }
                    Some(Err(e)) => return end_session(&session, e.to_string()),
                    None => return end_session(&session, "stream ended".to_owned()),
                    Some(Ok(_)) => continue,
                };

                if let Err(e) = apply_step(step, &mut write, event_tx, deadline.as_mut()).await {
                    return end_session(&session, e.to_string());
                }
                if let Some(reason) = session.closed.take() {
                    let _ = write.close().await;
                    return end_session(&session, reason);
                }
            }
        }
    }
}

/// Report a session ending: a clean close once connected, an error before.
fn end_session(session: &Session, reason: String) -> Result<SessionEnd, Error> {
    if session.is_connected() {
        Ok(SessionEnd::Closed { reason })
    } else {
        Err(Error::WebSocketConnect(reason))
    }
}

/// Write replies, forward the event, and push the liveness deadline.
async fn apply_step(
    step: Step,
    write: &mut WsWrite,
    event_tx: &mpsc::UnboundedSender<ChannelEvent>,
    deadline: std::pin::Pin<&mut tokio::time::Sleep>,
) -> Result<(), tungstenite::Error> {
    for reply in step.replies {
        write.send(Message::text(reply)).await?;
    }
    if let Some(window) = step.liveness {
        deadline.reset(Instant::now() + window);
    }
    if let Some(event) = step.event {
        if let ChannelEvent::Connected { sid } = &event {
            tracing::info!(sid = sid.as_deref().unwrap_or("-"), "channel connected");
        }
        // Ignore send errors -- the consumer went away and will cancel us
        let _ = event_tx.send(event);
    }
    Ok(())
}

/// Best-effort namespace disconnect and close frame on shutdown.
async fn close_gracefully(write: &mut WsWrite, connected: bool) {
    if connected {
        let _ = write
            .send(Message::text(SocketPacket::disconnect().to_frame()))
            .await;
    }
    let _ = write.close().await;
}

// ── Session state machine ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    AwaitingOpen,
    AwaitingConnect,
    Connected,
}

/// Outcome of a single inbound frame.
#[derive(Debug, Default, PartialEq)]
struct Step {
    replies: Vec<String>,
    event: Option<ChannelEvent>,
    liveness: Option<Duration>,
}

/// Pure protocol state for one connection, independent of the socket.
#[derive(Debug, Default)]
struct Session {
    phase: Phase,
    handshake: Option<Handshake>,
    closed: Option<String>,
}

impl Session {
    fn is_connected(&self) -> bool {
        self.phase == Phase::Connected
    }

    /// The handshake timeout governs until the namespace is joined.
    fn liveness_window(&self) -> Option<Duration> {
        if self.is_connected() {
            self.handshake.as_ref().map(Handshake::liveness_window)
        } else {
            None
        }
    }

    fn on_frame(&mut self, frame: &str) -> Result<Step, Error> {
        let mut step = Step::default();

        match EnginePacket::decode(frame)? {
            EnginePacket::Open(handshake) => {
                if self.phase != Phase::AwaitingOpen {
                    return Err(Error::protocol("unexpected Engine.IO open"));
                }
                tracing::debug!(sid = %handshake.sid, "Engine.IO open");
                step.replies.push(SocketPacket::connect().to_frame());
                self.handshake = Some(handshake);
                self.phase = Phase::AwaitingConnect;
            }
            EnginePacket::Ping(data) => {
                tracing::trace!("Engine.IO ping");
                step.replies.push(EnginePacket::Pong(data).encode());
                step.liveness = self.liveness_window();
            }
            EnginePacket::Close => {
                self.closed = Some("server closed the transport".into());
            }
            EnginePacket::Message(body) => self.on_socket_packet(&body, &mut step)?,
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
        }

        Ok(step)
    }

    fn on_socket_packet(&mut self, body: &str, step: &mut Step) -> Result<(), Error> {
        let packet = match SocketPacket::decode(body) {
            Ok(packet) => packet,
            Err(e) if self.is_connected() => {
                tracing::debug!(error = %e, "ignoring undecodable Socket.IO packet");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if packet.namespace() != DEFAULT_NAMESPACE {
            tracing::debug!(namespace = packet.namespace(), "ignoring foreign namespace");
            return Ok(());
        }

        match packet {
            SocketPacket::Connect { payload, .. } => {
                if self.phase != Phase::AwaitingConnect {
                    return Err(Error::protocol("unexpected namespace connect"));
                }
                self.phase = Phase::Connected;
                step.liveness = self.liveness_window();
                let sid = payload
                    .as_ref()
                    .and_then(|p| p.get("sid"))
                    .and_then(Value::as_str)
                    .map(String::from);
                step.event = Some(ChannelEvent::Connected { sid });
            }
            SocketPacket::ConnectError { message, .. } => {
                if self.is_connected() {
                    self.closed = Some(message);
                } else {
                    return Err(Error::ConnectRefused { message });
                }
            }
            SocketPacket::Disconnect { .. } => {
                self.closed = Some("server disconnected the namespace".into());
            }
            SocketPacket::Event { name, args, .. } => {
                if self.is_connected() {
                    let payload = args.into_iter().next().unwrap_or(Value::Null);
                    step.event = Some(ChannelEvent::Message { name, payload });
                } else {
                    tracing::debug!(%name, "event before namespace connect, dropped");
                }
            }
            SocketPacket::Ack { ack_id, .. } => {
                tracing::trace!(ack_id, "ignoring ack");
            }
        }

        Ok(())
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) * (1 ± 0.25)`
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Deterministic "jitter" seeded from the attempt number.
    let jitter_factor = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
    let with_jitter = (capped * jitter_factor).max(0.0);

    Duration::from_secs_f64(with_jitter)
}

// ── Tests ────────────────────────────────────────────────────────────
