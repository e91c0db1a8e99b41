//! Theme and styling for TUI - typography first, colour only for timer state

use ratatui::style::{Color, Modifier, Style};

use crate::timer::TimerState;

/// Style definitions
pub struct Styles;

impl Styles {
    /// Main title style - bold
    pub fn title() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Panel header style - bold
    pub fn header() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Primary text style - normal
    pub fn primary() -> Style {
        Style::default()
    }

    /// Secondary/muted text style - dimmed
    pub fn secondary() -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }

    /// Emphasized text - bold
    pub fn emphasis() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Selected/highlighted row style - reverse video
    pub fn selected() -> Style {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    /// Border style - normal
    pub fn border() -> Style {
        Style::default()
    }

    /// Border of a panel whose inputs are disabled
    pub fn border_disabled() -> Style {
        Style::default().add_modifier(Modifier::DIM)
    }

    /// The large HH:MM:SS clock
    pub fn clock() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    /// Money amounts - bold green
    pub fn amount() -> Style {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    }

    /// Text being typed into an input
    pub fn input() -> Style {
        Style::default().add_modifier(Modifier::UNDERLINED)
    }

    /// Warning style - bold + underlined
    pub fn warning() -> Style {
        Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    /// Keyboard shortcut keys - bold
    pub fn key() -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// Style for the timer state badge
pub fn state_style(state: TimerState) -> Style {
    match state {
        TimerState::Running => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        TimerState::Paused => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        TimerState::Idle => Styles::secondary(),
    }
}
