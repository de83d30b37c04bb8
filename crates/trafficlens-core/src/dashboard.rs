// ── Dashboard reducer ──
//
// Owns the display state and a view port. Each reaction updates the state,
// mirrors the change onto the view, and hands back at most one effect for
// the runtime to carry out. Arrival time is passed in, never read here.

use std::time::Duration;

use chrono::NaiveTime;

use crate::config::DashboardConfig;
use crate::event::InboundEvent;
use crate::model::{AlertEvent, ChartSample, Command, Control, LogEvent, LogKind, PacketEvent};
use crate::state::{DashboardState, LogEntry};
use crate::viewport::{ListId, ListRow, ViewPort};

/// Log line written when the dashboard starts.
pub const INITIAL_LOG: &str = "Dashboard initialized";

/// Log line left behind by [`Control::ClearLogs`].
pub const CLEARED_LOG: &str = "Log cleared";

/// Work a reaction asks the runtime to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a command to the server.
    Emit(Command),
    /// Call [`Dashboard::expire_banner`] with `generation` once `after`
    /// has elapsed. Replaces any previously scheduled hide.
    ScheduleBannerHide { generation: u64, after: Duration },
}

/// Telemetry renderer bound to a view port.
pub struct Dashboard<V: ViewPort> {
    config: DashboardConfig,
    state: DashboardState,
    view: V,
}

impl<V: ViewPort> Dashboard<V> {
    /// Build the initial state and project it onto `view`.
    pub fn new(config: DashboardConfig, mut view: V) -> Self {
        let mut state = DashboardState::new(&config);
        let initial = LogEntry::system(INITIAL_LOG);
        state.logs.reset(initial.clone());

        view.update_counters(&state.stats);
        view.clear_list(ListId::Traffic);
        view.clear_list(ListId::Sources);
        view.reset_logs(&initial);
        view.hide_banner();
        view.update_chart(&state.chart);

        Self {
            config,
            state,
            view,
        }
    }

    /// React to one server event.
    pub fn apply(&mut self, event: InboundEvent, now: NaiveTime) -> Option<Effect> {
        match event {
            InboundEvent::StatsUpdate(stats) => {
                self.view.update_counters(&stats);
                self.state.stats = stats;
                None
            }
            InboundEvent::Packet(packet) => {
                self.on_packet(packet);
                None
            }
            InboundEvent::Alert(alert) => Some(self.on_alert(&alert, now)),
            InboundEvent::Log(log) => {
                self.on_log(log, now);
                None
            }
            InboundEvent::ChartUpdate(sample) => {
                self.on_chart(sample);
                None
            }
            InboundEvent::Connected => {
                self.set_connected(true);
                self.log(LogEntry::at(
                    now,
                    "Connected to detection server",
                    LogKind::Success,
                ));
                None
            }
            InboundEvent::Disconnected => {
                self.set_connected(false);
                self.log(LogEntry::at(now, "Disconnected from server", LogKind::Alert));
                None
            }
            InboundEvent::ConnectError { reason } => {
                self.set_connected(false);
                self.log(LogEntry::at(
                    now,
                    format!("Connection failed: {reason}"),
                    LogKind::Alert,
                ));
                None
            }
        }
    }

    /// React to a user control.
    pub fn control(&mut self, control: Control, now: NaiveTime) -> Option<Effect> {
        match control {
            Control::Start => Some(Effect::Emit(Command::StartMonitoring)),
            Control::Stop => Some(Effect::Emit(Command::StopMonitoring)),
            Control::Block => {
                if self.state.sources.is_empty() {
                    return None;
                }
                let count = self.state.sources.clear();
                self.view.clear_list(ListId::Sources);
                self.log(LogEntry::at(
                    now,
                    format!("Blocked {count} threat sources"),
                    LogKind::Alert,
                ));
                tracing::info!(count, "blocking flagged sources");
                Some(Effect::Emit(Command::BlockSources))
            }
            Control::ClearLogs => {
                let entry = LogEntry::system(CLEARED_LOG);
                self.view.reset_logs(&entry);
                self.state.logs.reset(entry);
                None
            }
        }
    }

    /// Hide the banner if `generation` still owns it. Returns whether the
    /// banner was hidden.
    pub fn expire_banner(&mut self, generation: u64) -> bool {
        let hidden = self.state.banner.expire(generation);
        if hidden {
            self.view.hide_banner();
        } else {
            tracing::trace!(generation, "stale banner timer ignored");
        }
        hidden
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    // ── Reactions ────────────────────────────────────────────────────

    fn on_packet(&mut self, packet: PacketEvent) {
        self.view.prepend_item(ListId::Traffic, ListRow::packet(&packet));

        if packet.is_attack && !packet.src_ip.is_empty() && self.state.sources.insert(&packet.src_ip)
        {
            self.view
                .append_item(ListId::Sources, ListRow::threat(&packet.src_ip));
        }

        if self.state.traffic.push(packet).is_some() {
            self.view
                .truncate_list(ListId::Traffic, self.state.traffic.capacity());
        }
    }

    fn on_alert(&mut self, alert: &AlertEvent, now: NaiveTime) -> Effect {
        let generation = self.state.banner.show(alert.message.clone());
        self.view.show_banner(&alert.message);
        self.log(LogEntry::at(now, alert.log_line(), LogKind::Alert));
        tracing::warn!(message = %alert.message, top_attacker = %alert.top_attacker, "alert");

        Effect::ScheduleBannerHide {
            generation,
            after: self.config.alert_duration,
        }
    }

    fn on_log(&mut self, log: LogEvent, now: NaiveTime) {
        self.log(LogEntry::at(now, log.message, log.kind));
    }

    fn on_chart(&mut self, sample: ChartSample) {
        self.state.chart.push(sample);
        self.view.update_chart(&self.state.chart);
    }

    fn log(&mut self, entry: LogEntry) {
        self.view.append_log(&entry);
        self.state.logs.push(entry);
    }

    fn set_connected(&mut self, connected: bool) {
        self.state.connected = connected;
        self.view.set_connected(connected);
    }
}
