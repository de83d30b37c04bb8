//! All possible UI actions. Actions are the sole mechanism for state mutation.

use trafficlens_core::{Control, InboundEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──
    ToggleHelp,
    CloseHelp,

    // ── Dashboard ──
    /// A user control (start, stop, block, clear logs).
    Control(Control),
    /// A typed event from the detection server.
    Inbound(InboundEvent),
    /// The banner hide timer for `generation` fired.
    BannerExpired(u64),
    /// The telemetry stream ended; no further events will arrive.
    SessionEnded,
}
