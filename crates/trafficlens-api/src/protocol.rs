//! Engine.IO v4 / Socket.IO v5 text packet codec.
//!
//! Only the plain-text framing used over a raw WebSocket transport is
//! handled. Each WebSocket text frame carries exactly one Engine.IO packet;
//! Engine.IO `message` packets carry one Socket.IO packet.
//!
//! ```text
//! 0{"sid":"…","pingInterval":25000,"pingTimeout":20000}   engine open
//! 2 / 3                                                     ping / pong
//! 40                                                        socket connect "/"
//! 42["packet",{"src_ip":"10.0.0.5",…}]                      socket event
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Engine.IO protocol revision requested in the handshake query.
pub const ENGINE_IO_VERSION: &str = "4";

/// The only namespace this client joins.
pub const DEFAULT_NAMESPACE: &str = "/";

// ── Engine.IO ────────────────────────────────────────────────────────

/// Handshake payload carried by the Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

impl Handshake {
    /// How long the client waits for the next ping before declaring the
    /// connection dead: `pingInterval + pingTimeout`.
    pub fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

/// One Engine.IO packet.
#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    /// Decode a single WebSocket text frame.
    pub fn decode(frame: &str) -> Result<Self, Error> {
        let mut chars = frame.chars();
        let Some(kind) = chars.next() else {
            return Err(Error::protocol("empty Engine.IO packet"));
        };
        let body = chars.as_str();

        match kind {
            '0' => serde_json::from_str(body)
                .map(Self::Open)
                .map_err(|e| Error::protocol(format!("bad open handshake: {e}"))),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(body.to_owned())),
            '3' => Ok(Self::Pong(body.to_owned())),
            '4' => Ok(Self::Message(body.to_owned())),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(Error::protocol(format!(
                "unknown Engine.IO packet type '{other}'"
            ))),
        }
    }

    /// Encode into a WebSocket text frame.
    pub fn encode(&self) -> String {
        match self {
            Self::Open(handshake) => format!(
                "0{}",
                serde_json::to_string(handshake).unwrap_or_default()
            ),
            Self::Close => "1".into(),
            Self::Ping(data) => format!("2{data}"),
            Self::Pong(data) => format!("3{data}"),
            Self::Message(body) => format!("4{body}"),
            Self::Upgrade => "5".into(),
            Self::Noop => "6".into(),
        }
    }
}

// ── Socket.IO ────────────────────────────────────────────────────────

/// One Socket.IO packet (the body of an Engine.IO `message`).
#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        payload: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        ack_id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        message: String,
    },
}

impl SocketPacket {
    /// Namespace connect request for the default namespace.
    pub fn connect() -> Self {
        Self::Connect {
            namespace: DEFAULT_NAMESPACE.into(),
            payload: None,
        }
    }

    /// Namespace disconnect for the default namespace.
    pub fn disconnect() -> Self {
        Self::Disconnect {
            namespace: DEFAULT_NAMESPACE.into(),
        }
    }

    /// Event on the default namespace without an ack.
    pub fn event(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Event {
            namespace: DEFAULT_NAMESPACE.into(),
            ack_id: None,
            name: name.into(),
            args,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::Connect { namespace, .. }
            | Self::Disconnect { namespace }
            | Self::Event { namespace, .. }
            | Self::Ack { namespace, .. }
            | Self::ConnectError { namespace, .. } => namespace,
        }
    }

    /// Decode the body of an Engine.IO `message` packet.
    pub fn decode(body: &str) -> Result<Self, Error> {
        let mut chars = body.chars();
        let Some(kind) = chars.next() else {
            return Err(Error::protocol("empty Socket.IO packet"));
        };
        let mut rest = chars.as_str();

        if matches!(kind, '5' | '6') {
            return Err(Error::protocol("binary Socket.IO packets are not supported"));
        }

        let namespace = if rest.starts_with('/') {
            match rest.split_once(',') {
                Some((ns, tail)) => {
                    rest = tail;
                    ns.to_owned()
                }
                None => {
                    let ns = rest.to_owned();
                    rest = "";
                    ns
                }
            }
        } else {
            DEFAULT_NAMESPACE.to_owned()
        };

        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let ack_id = if digits > 0 {
            let (id, tail) = rest.split_at(digits);
            rest = tail;
            Some(
                id.parse::<u64>()
                    .map_err(|e| Error::protocol(format!("bad ack id '{id}': {e}")))?,
            )
        } else {
            None
        };

        let data: Option<Value> = if rest.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(rest)
                    .map_err(|e| Error::protocol(format!("bad packet payload: {e}")))?,
            )
        };

        match kind {
            '0' => Ok(Self::Connect {
                namespace,
                payload: data,
            }),
            '1' => Ok(Self::Disconnect { namespace }),
            '2' => {
                let mut args = match data {
                    Some(Value::Array(items)) => items.into_iter(),
                    _ => return Err(Error::protocol("event payload must be a JSON array")),
                };
                let Some(Value::String(name)) = args.next() else {
                    return Err(Error::protocol("event array must start with the event name"));
                };
                Ok(Self::Event {
                    namespace,
                    ack_id,
                    name,
                    args: args.collect(),
                })
            }
            '3' => {
                let ack_id =
                    ack_id.ok_or_else(|| Error::protocol("ack packet without an ack id"))?;
                let args = match data {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                Ok(Self::Ack {
                    namespace,
                    ack_id,
                    args,
                })
            }
            '4' => {
                let message = match data {
                    Some(Value::String(message)) => message,
                    Some(Value::Object(map)) => map
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("connect error")
                        .to_owned(),
                    _ => "connect error".to_owned(),
                };
                Ok(Self::ConnectError { namespace, message })
            }
            other => Err(Error::protocol(format!(
                "unknown Socket.IO packet type '{other}'"
            ))),
        }
    }

    /// Encode into an Engine.IO `message` body (without the leading `4`).
    pub fn encode(&self) -> String {
        let (kind, ack_id, data) = match self {
            Self::Connect { payload, .. } => ('0', None, payload.clone()),
            Self::Disconnect { .. } => ('1', None, None),
            Self::Event {
                ack_id, name, args, ..
            } => {
                let mut items = Vec::with_capacity(args.len() + 1);
                items.push(Value::String(name.clone()));
                items.extend(args.iter().cloned());
                ('2', *ack_id, Some(Value::Array(items)))
            }
            Self::Ack { ack_id, args, .. } => ('3', Some(*ack_id), Some(Value::Array(args.clone()))),
            Self::ConnectError { message, .. } => (
                '4',
                None,
                Some(serde_json::json!({ "message": message })),
            ),
        };

        let mut out = String::new();
        out.push(kind);
        let namespace = self.namespace();
        if namespace != DEFAULT_NAMESPACE {
            out.push_str(namespace);
            out.push(',');
        }
        if let Some(id) = ack_id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = data {
            out.push_str(&data.to_string());
        }
        out
    }

    /// Wrap into a complete WebSocket text frame (`4` + packet).
    pub fn to_frame(&self) -> String {
        EnginePacket::Message(self.encode()).encode()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
