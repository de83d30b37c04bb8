// ── Dashboard configuration ──
//
// Display limits and timings for the telemetry renderer.
// Built by trafficlens-config from file/env, or defaulted directly.

use std::time::Duration;

/// Rows kept in the packet list before the oldest is evicted.
pub const DEFAULT_TRAFFIC_CAPACITY: usize = 50;

/// Points per chart series.
pub const DEFAULT_CHART_POINTS: usize = 20;

/// How long an alert banner stays up after the most recent alert.
pub const DEFAULT_ALERT_DURATION: Duration = Duration::from_secs(10);

/// Configuration for a [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub traffic_capacity: usize,
    pub chart_points: usize,
    pub alert_duration: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            traffic_capacity: DEFAULT_TRAFFIC_CAPACITY,
            chart_points: DEFAULT_CHART_POINTS,
            alert_duration: DEFAULT_ALERT_DURATION,
        }
    }
}
