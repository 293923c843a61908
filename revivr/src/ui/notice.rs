//! Blocking notice modal.
//!
//! Used for input errors that must be acknowledged before anything else, such
//! as asking for a review with no code.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

pub fn render_notice(frame: &mut Frame, theme: &Theme, message: &str) {
    let width = (message.chars().count() as u16 + 6)
        .max(30)
        .min(frame.area().width);
    let area = frame
        .area()
        .centered(Constraint::Length(width), Constraint::Length(6));

    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Notice ")
        .border_style(Style::default().fg(theme.notice_border));

    let text = Text::from(vec![
        Line::from(""),
        Line::from(message.to_owned()).centered(),
        Line::from(""),
        Line::styled("Enter to dismiss", Style::default().add_modifier(Modifier::DIM)).centered(),
    ]);

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
