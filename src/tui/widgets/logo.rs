//! Header line shown above every screen

use crate::tui::theme::Styles;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Rows taken by the header, including the blank line under it
pub const HEADER_HEIGHT: u16 = 2;

pub fn render_logo(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("◷ billtime", Styles::title()),
        Span::styled("  ·  freelance time tracker", Styles::secondary()),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Left), area);
}
