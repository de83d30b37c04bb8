//! Palette and semantic styling for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use trafficlens_core::LogKind;

// ── Core Palette ──────────────────────────────────────────────────────

pub const NEON_GREEN: Color = Color::Rgb(0, 255, 136); // #00ff88
pub const ALERT_RED: Color = Color::Rgb(255, 85, 85); // #ff5555
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(224, 224, 224); // #e0e0e0
pub const MUTED_GRAY: Color = Color::Rgb(160, 160, 160); // #a0a0a0
pub const BORDER_GRAY: Color = Color::Rgb(51, 51, 51); // #333333
pub const BG_DARK: Color = Color::Rgb(18, 18, 18); // #121212
pub const BANNER_BG: Color = Color::Rgb(64, 16, 16); // #401010

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_GREEN).add_modifier(Modifier::BOLD)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Border of the help overlay.
pub fn border_focused() -> Style {
    Style::default().fg(NEON_GREEN)
}

/// Large counter value.
pub fn counter_value() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

/// Counter value while the server reports an attack.
pub fn alert_value() -> Style {
    Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD)
}

pub fn address() -> Style {
    Style::default().fg(NEON_CYAN)
}

pub fn protocol() -> Style {
    Style::default().fg(MUTED_GRAY)
}

pub fn threat() -> Style {
    Style::default().fg(ALERT_RED)
}

pub fn placeholder() -> Style {
    Style::default()
        .fg(MUTED_GRAY)
        .add_modifier(Modifier::ITALIC)
}

pub fn banner() -> Style {
    Style::default()
        .fg(ALERT_RED)
        .bg(BANNER_BG)
        .add_modifier(Modifier::BOLD)
}

pub fn log_time() -> Style {
    Style::default().fg(MUTED_GRAY)
}

/// Log message text, by entry kind.
pub fn log_kind(kind: &LogKind) -> Style {
    match kind {
        LogKind::Success => Style::default().fg(NEON_GREEN),
        LogKind::Alert => Style::default().fg(ALERT_RED),
        LogKind::Info => Style::default().fg(LIGHT_BLUE),
        LogKind::Message | LogKind::Other(_) => Style::default().fg(DIM_WHITE),
    }
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(MUTED_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_GREEN).add_modifier(Modifier::BOLD)
}
