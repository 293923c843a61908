//! Responsive two-panel layout for revivr.
//!
//! Pure layout arithmetic, recomputed inside every `terminal.draw()`.
//!
//! At `>= 100` columns the editor and review panels sit side by side, split by
//! `AppState.editor_pct`. Narrower terminals stack them vertically with the
//! same split. `Spacing::Overlap(1)` with `MergeStrategy::Fuzzy` lets adjacent
//! borders share one cell.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Terminal width at which the panels switch from stacked to side by side.
pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

/// Braille spinner frames advanced by `AppEvent::Tick`.
pub const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Returns `[editor, review, status_bar]` rects for the current frame.
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 3] {
    let area = frame.area();

    let [main_area, status_bar] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let split = [
        Constraint::Percentage(state.editor_pct),
        Constraint::Percentage(100 - state.editor_pct),
    ];
    let panels = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Layout::horizontal(split)
    } else {
        Layout::vertical(split)
    };
    let panels = panels.spacing(Spacing::Overlap(1));

    let [editor, review] = main_area.layout(&panels);
    [editor, review, status_bar]
}

/// The inner `Rect` of a panel after removing the 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered panel `Block`; thick and highlighted when focused.
pub fn panel_block<'a>(title: Line<'a>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Renders the 1-row status bar: mode, language, request state, message, hints.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay | Mode::Notice => (" NORMAL ", theme.status_mode_normal),
    };

    let request = if state.status().is_in_flight() {
        format!(" {} analyzing ", SPINNER[state.spinner_frame % SPINNER.len()])
    } else {
        format!(" {} ", state.status().label())
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(format!("│ {} │", state.language().label())),
        Span::raw(request),
    ];
    if let Some(message) = state.status_message.as_deref() {
        spans.push(Span::raw(format!("│ {message} ")));
    }
    spans.push(Span::styled(
        "│ i edit  r review  [/] language  C clear  ? help",
        Style::default().add_modifier(Modifier::DIM),
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
