// ── View port ──
//
// Everything the dashboard needs from a concrete UI. The reducers call
// these after updating state; an implementation only has to mirror what
// it is told.

use crate::model::{PacketEvent, StatsSnapshot};
use crate::state::{LogEntry, TrafficChart};

/// The two scrolling lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListId {
    Traffic,
    Sources,
}

impl ListId {
    /// Text shown while the list holds no real rows.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Traffic => "Waiting for traffic... ready",
            Self::Sources => "No threats detected",
        }
    }
}

/// Marker shown next to attack-classified packets.
pub const ATTACK_MARKER: &str = "⚠";

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    /// Left column, usually an address.
    pub primary: String,
    /// Right column.
    pub detail: String,
    /// Drawn in the alert style.
    pub flagged: bool,
}

impl ListRow {
    /// `10.0.0.5   TCP/64 ⚠`
    pub fn packet(packet: &PacketEvent) -> Self {
        let primary = if packet.src_ip.is_empty() {
            "-".to_owned()
        } else {
            packet.src_ip.clone()
        };
        let detail = if packet.is_attack {
            format!("{} {ATTACK_MARKER}", packet.protocol_summary())
        } else {
            packet.protocol_summary()
        };
        Self {
            primary,
            detail,
            flagged: packet.is_attack,
        }
    }

    /// `10.0.0.5   THREAT`
    pub fn threat(addr: &str) -> Self {
        Self {
            primary: addr.to_owned(),
            detail: "THREAT".to_owned(),
            flagged: true,
        }
    }
}

/// Rendering surface driven by [`Dashboard`](crate::Dashboard).
///
/// Lists start out showing their placeholder. The first `prepend_item` or
/// `append_item` replaces it, and `clear_list` restores it.
pub trait ViewPort {
    /// Overwrite all counters and the status indicator.
    fn update_counters(&mut self, stats: &StatsSnapshot);

    fn prepend_item(&mut self, list: ListId, row: ListRow);

    fn append_item(&mut self, list: ListId, row: ListRow);

    /// Drop rows beyond `len` from the tail.
    fn truncate_list(&mut self, list: ListId, len: usize);

    /// Remove every row and show the placeholder again.
    fn clear_list(&mut self, list: ListId);

    /// Append a log line and scroll to it.
    fn append_log(&mut self, entry: &LogEntry);

    /// Replace the whole log panel with a single entry.
    fn reset_logs(&mut self, entry: &LogEntry);

    fn show_banner(&mut self, message: &str);

    fn hide_banner(&mut self);

    fn update_chart(&mut self, chart: &TrafficChart);

    /// Connection indicator. Optional for surfaces without one.
    fn set_connected(&mut self, _connected: bool) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn packet_rows() {
        let packet = PacketEvent {
            src_ip: "10.0.0.5".into(),
            protocol: "TCP".into(),
            length: 64,
            is_attack: true,
        };
        assert_eq!(
            ListRow::packet(&packet),
            ListRow {
                primary: "10.0.0.5".into(),
                detail: "TCP/64 ⚠".into(),
                flagged: true,
            }
        );

        let quiet = PacketEvent {
            src_ip: String::new(),
            is_attack: false,
            ..packet
        };
        let row = ListRow::packet(&quiet);
        assert_eq!(row.primary, "-");
        assert_eq!(row.detail, "TCP/64");
    }

    #[test]
    fn placeholders() {
        assert_eq!(ListId::Traffic.placeholder(), "Waiting for traffic... ready");
        assert_eq!(ListId::Sources.placeholder(), "No threats detected");
        assert_eq!(ListRow::threat("10.0.0.5").detail, "THREAT");
    }
}
