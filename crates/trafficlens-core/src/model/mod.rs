// ── Domain model ──
//
// Inbound telemetry payloads and outbound commands.

pub mod command;
mod lenient;
pub mod telemetry;

pub use command::{Command, Control};
pub use telemetry::{
    AlertEvent, ChartSample, LogEvent, LogKind, MonitorStatus, PacketEvent, StatsSnapshot,
};
