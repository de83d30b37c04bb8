// ── Telemetry payload types ──
//
// Shapes of the events the detection server pushes. Every field decodes
// leniently (see `lenient`): a missing or oddly typed field falls back to
// a default instead of rejecting the whole event.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;

// ── MonitorStatus ───────────────────────────────────────────────────

/// Overall status reported by the server.
///
/// `NORMAL` and `ATTACK` are the documented values; anything else (the
/// server also reports `MONITORING`) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum MonitorStatus {
    #[default]
    Normal,
    Attack,
    Other(String),
}

impl MonitorStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim() {
            "" | "NORMAL" => Self::Normal,
            "ATTACK" => Self::Attack,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Normal => "NORMAL",
            Self::Attack => "ATTACK",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the status display carries the alert style.
    pub fn is_attack(&self) -> bool {
        matches!(self, Self::Attack)
    }
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MonitorStatus> for String {
    fn from(status: MonitorStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl<'de> Deserialize<'de> for MonitorStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

// ── StatsSnapshot ───────────────────────────────────────────────────

/// Aggregate counters. Each update replaces the previous snapshot whole.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default, deserialize_with = "lenient::count")]
    pub total_packets: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub attack_packets: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub suspicious_sources: u64,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub last_alert: Option<String>,
    #[serde(default)]
    pub status: MonitorStatus,
}

impl StatsSnapshot {
    /// Text for the "last alert" counter; `NONE` when absent.
    pub fn last_alert_display(&self) -> &str {
        self.last_alert.as_deref().unwrap_or("NONE")
    }
}

// ── PacketEvent ─────────────────────────────────────────────────────

/// One observed packet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PacketEvent {
    #[serde(default, deserialize_with = "lenient::text")]
    pub src_ip: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub protocol: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub length: u64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_attack: bool,
}

impl PacketEvent {
    /// `"TCP/64"`.
    pub fn protocol_summary(&self) -> String {
        format!("{}/{}", self.protocol, self.length)
    }
}

// ── AlertEvent ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub top_attacker: String,
}

impl AlertEvent {
    /// Log line for the alert: `"<message> - Top attacker: <ip>"`.
    pub fn log_line(&self) -> String {
        format!("{} - Top attacker: {}", self.message, self.top_attacker)
    }
}

// ── LogEvent ────────────────────────────────────────────────────────

/// Severity/style class of a log entry (`type` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum LogKind {
    #[default]
    Message,
    Success,
    Alert,
    Info,
    Other(String),
}

impl LogKind {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim() {
            "" | "message" => Self::Message,
            "success" => Self::Success,
            "alert" => Self::Alert,
            "info" => Self::Info,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Message => "message",
            Self::Success => "success",
            Self::Alert => "alert",
            Self::Info => "info",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogKind> for String {
    fn from(kind: LogKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl<'de> Deserialize<'de> for LogKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

/// Server-originated log line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: LogKind,
}

// ── ChartSample ─────────────────────────────────────────────────────

/// One tick of chart data: a value for each series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSample {
    #[serde(default, deserialize_with = "lenient::number")]
    pub normal: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub attack: f64,
}

// ── Tests ────────────────────────────────────────────────────────────
