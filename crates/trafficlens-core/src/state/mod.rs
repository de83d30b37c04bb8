// ── Dashboard state ──
//
// The single state object the reducers in `dashboard` update. Every
// collection enforces its own bound, so the invariants hold no matter
// which reaction touched it.

mod banner;
mod chart;
mod logs;
mod sources;
mod traffic;

pub use banner::{AlertBanner, BannerSlot};
pub use chart::TrafficChart;
pub use logs::{LogEntry, LogPanel, LogStamp};
pub use sources::SourcesList;
pub use traffic::TrafficList;

use crate::config::DashboardConfig;
use crate::model::StatsSnapshot;

/// Everything the dashboard displays.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub stats: StatsSnapshot,
    pub traffic: TrafficList,
    pub sources: SourcesList,
    pub logs: LogPanel,
    pub chart: TrafficChart,
    pub banner: BannerSlot,
    /// Whether the channel currently reports a live connection.
    pub connected: bool,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            stats: StatsSnapshot::default(),
            traffic: TrafficList::new(config.traffic_capacity),
            sources: SourcesList::default(),
            logs: LogPanel::default(),
            chart: TrafficChart::new(config.chart_points),
            banner: BannerSlot::default(),
            connected: false,
        }
    }
}
