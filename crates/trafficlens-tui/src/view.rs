//! Terminal view port: mirrors dashboard state into ratatui widgets.
//!
//! Layout:
//! ┌─ ⚠ DDoS Alert! ... ──────────────────────────────────────────────┐ (banner, only while visible)
//! ┌ TOTAL ┐┌ ATTACK ┐┌ SOURCES ┐┌ LAST ALERT ┐┌ STATUS ┐
//! ┌─ Traffic ───────────────────────────┐┌─ Threat Sources ─────────┐
//! │  Braille NORMAL / ATTACK lines       ││ 10.0.0.5          THREAT │
//! └──────────────────────────────────────┘└──────────────────────────┘
//! ┌─ Live Packets ──────────────────────┐┌─ System Logs ────────────┐
//! │ 10.0.0.5              TCP/64 ⚠      ││ [12:00:01] Connected ... │
//! └──────────────────────────────────────┘└──────────────────────────┘

use std::collections::VecDeque;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};

use trafficlens_core::{
    ListId, ListRow, LogEntry, StatsSnapshot, TrafficChart, ViewPort,
};

use crate::theme;
use crate::widgets::status_indicator::{self, ConnectionStatus};

/// Rows of one scrolling list; `None` while the placeholder is shown.
#[derive(Debug, Default)]
struct ListPane {
    rows: Option<VecDeque<ListRow>>,
}

impl ListPane {
    fn rows_mut(&mut self) -> &mut VecDeque<ListRow> {
        self.rows.get_or_insert_with(VecDeque::new)
    }
}

/// [`ViewPort`] implementation backed by ratatui.
#[derive(Debug, Default)]
pub struct TerminalView {
    stats: StatsSnapshot,
    traffic: ListPane,
    sources: ListPane,
    logs: Vec<LogEntry>,
    banner: Option<String>,
    normal: Vec<(f64, f64)>,
    attack: Vec<(f64, f64)>,
    chart_peak: f64,
    connection: ConnectionStatus,
}

impl TerminalView {
    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    fn pane(&self, list: ListId) -> &ListPane {
        match list {
            ListId::Traffic => &self.traffic,
            ListId::Sources => &self.sources,
        }
    }

    fn pane_mut(&mut self, list: ListId) -> &mut ListPane {
        match list {
            ListId::Traffic => &mut self.traffic,
            ListId::Sources => &mut self.sources,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let banner_height = if self.banner.is_some() { 3 } else { 0 };
        let [banner_area, counters_area, upper_area, lower_area] = Layout::vertical([
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Min(5),
        ])
        .areas(area);

        if let Some(message) = &self.banner {
            render_banner(frame, banner_area, message);
        }
        self.render_counters(frame, counters_area);

        let [chart_area, sources_area] =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                .areas(upper_area);
        self.render_chart(frame, chart_area);
        self.render_list(frame, sources_area, ListId::Sources, " Threat Sources ");

        let [traffic_area, logs_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(lower_area);
        self.render_list(frame, traffic_area, ListId::Traffic, " Live Packets ");
        self.render_logs(frame, logs_area);
    }

    fn render_counters(&self, frame: &mut Frame, area: Rect) {
        let cells = Layout::horizontal([Constraint::Ratio(1, 5); 5]).split(area);

        let total = self.stats.total_packets.to_string();
        let attack = self.stats.attack_packets.to_string();
        let sources = self.stats.suspicious_sources.to_string();
        let values = [
            (" Total Packets ", Span::styled(total, theme::counter_value())),
            (" Attack Packets ", Span::styled(attack, theme::counter_value())),
            (" Suspicious Sources ", Span::styled(sources, theme::counter_value())),
            (
                " Last Alert ",
                Span::styled(
                    self.stats.last_alert_display().to_owned(),
                    theme::counter_value(),
                ),
            ),
            (" Status ", status_indicator::status_span(&self.stats.status)),
        ];

        for (cell, (title, value)) in cells.iter().zip(values) {
            let paragraph = Paragraph::new(Line::from(value)).block(panel(title));
            frame.render_widget(paragraph, *cell);
        }
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let x_max = self.normal.len().saturating_sub(1).max(1);
        let x_max = f64::from(u32::try_from(x_max).unwrap_or(u32::MAX));
        let y_max = if self.chart_peak < 1.0 {
            10.0
        } else {
            self.chart_peak * 1.2
        };

        let datasets = vec![
            Dataset::default()
                .name(TrafficChart::NORMAL_LABEL)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::NEON_GREEN))
                .data(&self.normal),
            Dataset::default()
                .name(TrafficChart::ATTACK_LABEL)
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::ALERT_RED))
                .data(&self.attack),
        ];

        let y_labels = vec![
            Span::styled("0", theme::key_hint()),
            Span::styled(format!("{:.0}", y_max / 2.0), theme::key_hint()),
            Span::styled(format!("{y_max:.0}"), theme::key_hint()),
        ];

        let chart = Chart::new(datasets)
            .block(panel(" Traffic "))
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(y_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            );

        frame.render_widget(chart, area);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, list: ListId, title: &str) {
        let block = panel(title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(rows) = &self.pane(list).rows else {
            frame.render_widget(
                Paragraph::new(Span::styled(list.placeholder(), theme::placeholder())),
                inner,
            );
            return;
        };

        let width = usize::from(inner.width);
        let lines: Vec<Line> = rows
            .iter()
            .take(usize::from(inner.height))
            .map(|row| list_line(row, width))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_logs(&self, frame: &mut Frame, area: Rect) {
        let block = panel(" System Logs ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Newest entry pinned to the bottom
        let visible = usize::from(inner.height);
        let skip = self.logs.len().saturating_sub(visible);
        let lines: Vec<Line> = self
            .logs
            .iter()
            .skip(skip)
            .map(|entry| {
                Line::from(vec![
                    Span::styled(entry.stamp.to_string(), theme::log_time()),
                    Span::raw(" "),
                    Span::styled(entry.message.clone(), theme::log_kind(&entry.kind)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default())
}

fn render_banner(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(theme::threat());
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(" ⚠ ", theme::banner()),
        Span::styled(message.to_owned(), theme::banner()),
    ]))
    .style(theme::banner())
    .block(block);
    frame.render_widget(paragraph, area);
}

/// Address on the left, detail right-aligned.
fn list_line(row: &ListRow, width: usize) -> Line<'static> {
    let detail_style = if row.flagged {
        theme::threat()
    } else {
        theme::protocol()
    };
    let used = row.primary.chars().count() + row.detail.chars().count();
    let gap = width.saturating_sub(used).max(1);
    Line::from(vec![
        Span::styled(row.primary.clone(), theme::address()),
        Span::raw(" ".repeat(gap)),
        Span::styled(row.detail.clone(), detail_style),
    ])
}

fn series(values: impl Iterator<Item = f64>) -> Vec<(f64, f64)> {
    (0u32..).zip(values).map(|(i, v)| (f64::from(i), v)).collect()
}

// ── ViewPort ────────────────────────────────────────────────────────

impl ViewPort for TerminalView {
    fn update_counters(&mut self, stats: &StatsSnapshot) {
        self.stats = stats.clone();
    }

    fn prepend_item(&mut self, list: ListId, row: ListRow) {
        self.pane_mut(list).rows_mut().push_front(row);
    }

    fn append_item(&mut self, list: ListId, row: ListRow) {
        self.pane_mut(list).rows_mut().push_back(row);
    }

    fn truncate_list(&mut self, list: ListId, len: usize) {
        if let Some(rows) = &mut self.pane_mut(list).rows {
            rows.truncate(len);
        }
    }

    fn clear_list(&mut self, list: ListId) {
        self.pane_mut(list).rows = None;
    }

    fn append_log(&mut self, entry: &LogEntry) {
        self.logs.push(entry.clone());
    }

    fn reset_logs(&mut self, entry: &LogEntry) {
        self.logs.clear();
        self.logs.push(entry.clone());
    }

    fn show_banner(&mut self, message: &str) {
        self.banner = Some(message.to_owned());
    }

    fn hide_banner(&mut self) {
        self.banner = None;
    }

    fn update_chart(&mut self, chart: &TrafficChart) {
        self.normal = series(chart.normal());
        self.attack = series(chart.attack());
        self.chart_peak = chart.peak();
    }

    fn set_connected(&mut self, connected: bool) {
        self.connection = if connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };
    }
}

// ── Tests ────────────────────────────────────────────────────────────
