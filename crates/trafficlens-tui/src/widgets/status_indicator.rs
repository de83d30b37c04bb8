//! Status indicators: monitor status and channel connection state.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use trafficlens_core::MonitorStatus;

use crate::theme;

/// Connection state of the telemetry channel as shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

/// The server-reported status, alert-styled while under attack.
pub fn status_span(status: &MonitorStatus) -> Span<'static> {
    let style = match status {
        MonitorStatus::Attack => theme::alert_value().add_modifier(Modifier::SLOW_BLINK),
        MonitorStatus::Normal => Style::default()
            .fg(theme::NEON_GREEN)
            .add_modifier(Modifier::BOLD),
        MonitorStatus::Other(_) => Style::default()
            .fg(theme::ELECTRIC_YELLOW)
            .add_modifier(Modifier::BOLD),
    };
    Span::styled(status.to_string(), style)
}

/// `● connected` / `○ disconnected` / `◐ connecting`.
pub fn connection_span(status: ConnectionStatus) -> Span<'static> {
    match status {
        ConnectionStatus::Connected => {
            Span::styled("● connected", Style::default().fg(theme::NEON_GREEN))
        }
        ConnectionStatus::Disconnected => {
            Span::styled("○ disconnected", Style::default().fg(theme::ALERT_RED))
        }
        ConnectionStatus::Connecting => {
            Span::styled("◐ connecting", Style::default().fg(theme::ELECTRIC_YELLOW))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_status_uses_alert_color() {
        let span = status_span(&MonitorStatus::Attack);
        assert_eq!(span.content, "ATTACK");
        assert_eq!(span.style.fg, Some(theme::ALERT_RED));

        let span = status_span(&MonitorStatus::Other("MONITORING".into()));
        assert_eq!(span.content, "MONITORING");
        assert_ne!(span.style.fg, Some(theme::ALERT_RED));
    }

    #[test]
    fn connection_labels() {
        assert_eq!(
            connection_span(ConnectionStatus::Connected).content,
            "● connected"
        );
        assert_eq!(
            connection_span(ConnectionStatus::default()).content,
            "◐ connecting"
        );
    }
}
