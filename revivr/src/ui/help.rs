//! Help overlay renderer for revivr.
//!
//! Draws a centred modal over the panels, erasing the background with `Clear`
//! inside the same `terminal.draw()` closure.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use revivr_core::Language;

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help (j/k scroll, ? or Esc to dismiss) ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Review"),
        Line::from("  r             Review Code (disabled while analyzing)"),
        Line::from("  Ctrl-r        Review Code from insert mode"),
        Line::from("  ] / [         Next / previous language"),
        Line::from("  C             Clear code and review (language is kept)"),
        Line::from(""),
        Line::from("Editor"),
        Line::from("  i / Enter     Start editing"),
        Line::from("  Esc           Stop editing"),
        Line::from("  arrows        Move cursor (h/j/k/l in normal mode)"),
        Line::from("  Home / End    Start / end of line"),
        Line::from("  g / G         Top / bottom"),
        Line::from("  Tab           Insert four spaces (while editing)"),
        Line::from(""),
        Line::from("Panels"),
        Line::from("  Tab / H / L   Switch focus between editor and review"),
        Line::from("  j / k         Scroll review (when focused)"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  < / >         Shrink / grow editor panel by 5%"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit"),
        Line::from(""),
        Line::from(format!("Languages: {}", language_list())),
    ])
}

fn language_list() -> String {
    Language::ALL
        .iter()
        .map(|lang| lang.label())
        .collect::<Vec<_>>()
        .join(", ")
}
