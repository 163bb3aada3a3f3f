//! SynthBrute theme and color utilities.

use crate::notifications::NotificationLevel;
use crate::state::ServerHealth;
use atlas_core::{Phase, RoleId, Sender};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct SynthBruteTheme {
    pub bg: Color,
    pub bg_secondary: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl SynthBruteTheme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_secondary: Color::Rgb(26, 26, 26),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 255, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 255, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }
}

impl Default for SynthBruteTheme {
    fn default() -> Self {
        Self::synthbrute()
    }
}

pub fn phase_color(phase: Phase, theme: &SynthBruteTheme) -> Color {
    match phase {
        Phase::Idle => theme.text_dim,
        Phase::Pending => theme.tertiary,
        Phase::Succeeded => theme.success,
        Phase::Failed => theme.error,
    }
}

pub fn sender_color(sender: Sender, theme: &SynthBruteTheme) -> Color {
    match sender {
        Sender::User => theme.primary,
        Sender::Bot => theme.secondary,
    }
}

/// Stable per-persona color so a role keeps its color across reports.
pub fn role_color(role: &RoleId, theme: &SynthBruteTheme) -> Color {
    if role.is_error() {
        return theme.error;
    }
    let palette = [theme.secondary, theme.primary, theme.tertiary, theme.success];
    let hash = role
        .as_str()
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    palette[hash % palette.len()]
}

pub fn health_color(health: &ServerHealth, theme: &SynthBruteTheme) -> Color {
    match health {
        ServerHealth::Unknown => theme.text_dim,
        ServerHealth::Online(_) => theme.success,
        ServerHealth::Offline(_) => theme.error,
    }
}

pub fn notification_color(level: NotificationLevel, theme: &SynthBruteTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
