//! Reactive telemetry renderer for trafficlens.
//!
//! Sits between `trafficlens-api` (the Socket.IO channel) and a concrete
//! UI:
//!
//! - **[`Dashboard`]** owns the [`DashboardState`] and a [`ViewPort`].
//!   Server events go through [`Dashboard::apply`], user controls through
//!   [`Dashboard::control`]; both return an optional [`Effect`] for the
//!   runtime (emit a command, schedule the banner hide).
//!
//! - **[`InboundEvent`]** is the typed form of what the server pushes,
//!   decoded leniently from JSON payloads.
//!
//! - **[`session`]** adapts the raw channel into [`InboundEvent`]s and
//!   sends [`Command`]s back.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod event;
pub mod model;
pub mod session;
pub mod state;
pub mod viewport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Effect};
pub use error::CoreError;
pub use event::InboundEvent;
pub use model::{
    AlertEvent, ChartSample, Command, Control, LogEvent, LogKind, MonitorStatus, PacketEvent,
    StatsSnapshot,
};
pub use session::{TelemetrySession, TelemetryStream};
pub use state::{AlertBanner, DashboardState, LogEntry, LogStamp, TrafficChart};
pub use viewport::{ListId, ListRow, ViewPort};
