//! Application core: event loop, key bindings, effect execution.

use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use trafficlens_config::Config;
use trafficlens_core::{
    Control, Dashboard, Effect, TelemetrySession, TelemetryStream, session,
};

use crate::action::Action;
use crate::bridge;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::timer::BannerTimer;
use crate::tui::Tui;
use crate::view::TerminalView;
use crate::widgets::status_indicator;

/// Top-level application state and event loop.
pub struct App {
    dashboard: Dashboard<TerminalView>,
    session: TelemetrySession,
    /// Taken by the bridge task when the loop starts.
    stream: Option<TelemetryStream>,
    cancel: CancellationToken,
    banner_timer: BannerTimer,
    running: bool,
    help_visible: bool,
    tick_rate: Duration,
    frame_rate: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    /// Build the dashboard and start the telemetry session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: &Config) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let (session, stream) = session::connect(config.to_channel_config()?, cancel.clone());
        let dashboard = Dashboard::new(config.to_dashboard_config(), TerminalView::default());

        Ok(Self {
            dashboard,
            session,
            stream: Some(stream),
            cancel,
            banner_timer: BannerTimer::new(action_tx.clone()),
            running: true,
            help_visible: false,
            tick_rate: config.tick_rate(),
            frame_rate: config.frame_rate(),
            action_tx,
            action_rx,
        })
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;

        let mut events = EventReader::new(self.tick_rate, self.frame_rate);
        if let Some(stream) = self.stream.take() {
            tokio::spawn(bridge::run_session_bridge(
                stream,
                self.action_tx.clone(),
                self.cancel.clone(),
            ));
        }

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = map_key(key, self.help_visible) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize { cols, rows } => self.action_tx.send(Action::Resize(cols, rows))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions, in arrival order
            while let Ok(action) = self.action_rx.try_recv() {
                let render = action == Action::Render;
                self.process_action(action);
                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.shutdown();
        info!("TUI event loop ended");
        Ok(())
    }

    fn shutdown(&mut self) {
        self.banner_timer.cancel();
        self.session.shutdown();
        self.cancel.cancel();
    }

    /// Apply one action to the app and dashboard state.
    fn process_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::CloseHelp => self.help_visible = false,
            Action::Control(control) => {
                debug!(%control, "control");
                let effect = self.dashboard.control(control, Local::now().time());
                self.run_effect(effect);
            }
            Action::Inbound(event) => {
                let effect = self.dashboard.apply(event, Local::now().time());
                self.run_effect(effect);
            }
            Action::BannerExpired(generation) => {
                self.dashboard.expire_banner(generation);
            }
            Action::SessionEnded => {
                info!("no further telemetry will arrive");
            }
            Action::Tick | Action::Render | Action::Resize(..) => {}
        }
    }

    fn run_effect(&mut self, effect: Option<Effect>) {
        match effect {
            Some(Effect::Emit(command)) => {
                if let Err(e) = self.session.send(command) {
                    warn!(error = %e, %command, "failed to send command");
                }
            }
            Some(Effect::ScheduleBannerHide { generation, after }) => {
                self.banner_timer.schedule(generation, after);
            }
            None => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.dashboard.view().render(frame, content_area);
        self.render_status_bar(frame, status_area);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    /// Connection state plus key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection = status_indicator::connection_span(self.dashboard.view().connection());
        let mut spans = vec![Span::raw(" "), connection, Span::styled(" │", theme::key_hint())];
        for (key, label) in [
            ("s", "start"),
            ("x", "stop"),
            ("b", "block"),
            ("c", "clear"),
            ("?", "help"),
            ("q", "quit"),
        ] {
            spans.push(Span::styled(format!(" {key}"), theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label} "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Map a key press to an action. While help is open only the close keys
/// and quit are live.
pub fn map_key(key: KeyEvent, help_visible: bool) -> Option<Action> {
    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        };
    }

    if !(key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) {
        return None;
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('s') => Some(Action::Control(Control::Start)),
        KeyCode::Char('x') => Some(Action::Control(Control::Stop)),
        KeyCode::Char('b') => Some(Action::Control(Control::Block)),
        KeyCode::Char('c') => Some(Action::Control(Control::ClearLogs)),
        _ => None,
    }
}

/// Render the help overlay centered on screen.
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 14u16.min(area.height.saturating_sub(2));

    let x = area.width.saturating_sub(help_width) / 2;
    let y = area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let binding = |key: &'static str, label: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(label, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        binding("s", "Start monitoring"),
        binding("x", "Stop monitoring"),
        binding("b", "Block threat sources"),
        binding("c", "Clear logs"),
        binding("?", "This help"),
        binding("q Ctrl+c", "Quit"),
        Line::from(""),
        Line::from(Span::styled("         Esc or ? to close", theme::key_hint())),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use trafficlens_core::{InboundEvent, PacketEvent};

    use super::*;
    use crate::view::tests::buffer_text;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn offline_app() -> App {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::default();
        config.server.url = format!("http://{addr}");
        App::new(&config).unwrap()
    }

    #[test]
    fn key_bindings() {
        assert_eq!(
            map_key(press(KeyCode::Char('s')), false),
            Some(Action::Control(Control::Start))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('x')), false),
            Some(Action::Control(Control::Stop))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('b')), false),
            Some(Action::Control(Control::Block))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('c')), false),
            Some(Action::Control(Control::ClearLogs))
        );
        assert_eq!(map_key(press(KeyCode::Char('q')), false), Some(Action::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), false),
            Some(Action::Quit)
        );
        assert_eq!(map_key(press(KeyCode::Char('z')), false), None);
    }

    #[test]
    fn help_overlay_swallows_controls() {
        assert_eq!(
            map_key(press(KeyCode::Char('?')), false),
            Some(Action::ToggleHelp)
        );
        assert_eq!(map_key(press(KeyCode::Esc), true), Some(Action::CloseHelp));
        assert_eq!(map_key(press(KeyCode::Char('s')), true), None);
        assert_eq!(map_key(press(KeyCode::Char('q')), true), Some(Action::Quit));
    }

    #[tokio::test]
    async fn actions_drive_the_dashboard() {
        let mut app = offline_app();

        app.process_action(Action::Inbound(InboundEvent::Packet(PacketEvent {
            src_ip: "10.0.0.5".into(),
            protocol: "UDP".into(),
            length: 512,
            is_attack: true,
        })));
        assert_eq!(app.dashboard.state().sources.len(), 1);

        app.process_action(Action::Control(Control::Block));
        assert!(app.dashboard.state().sources.is_empty());
        assert_eq!(
            app.dashboard.state().logs.last().map(|e| e.message.as_str()),
            Some("Blocked 1 threat sources")
        );

        app.process_action(Action::ToggleHelp);
        assert!(app.help_visible);
        app.process_action(Action::CloseHelp);
        assert!(!app.help_visible);

        app.process_action(Action::Quit);
        assert!(!app.running);
        app.shutdown();
    }

    #[tokio::test]
    async fn status_bar_and_help_render() {
        let mut app = offline_app();
        app.help_visible = true;

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("◐ connecting"));
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Block threat sources"));
        app.shutdown();
    }
}
