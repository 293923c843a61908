//! Editor panel renderer.
//!
//! Only the visible rows are materialised per frame. The line-number gutter and
//! the code are separate widgets so the code can scroll horizontally while the
//! gutter stays put.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the editor panel and places the terminal cursor while typing.
///
/// Adjusts `state.editor_scroll` so the cursor row and column stay visible.
pub fn render_editor(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Editor;
    let language = state.language();
    let title = Line::from(vec![
        Span::raw(" Editor · "),
        Span::styled(language.label(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
    ]);
    let action = if state.status().is_in_flight() {
        " Analyzing... "
    } else {
        " r  Review Code "
    };
    let block = panel_block(title, is_focused, theme).title_bottom(Line::from(action).centered());
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let text = &state.session.state().source_text;
    let (row, col) = state.cursor.line_col(text);
    let lines = state.highlight.lines(state.source_revision, text, language);

    let digits = lines.len().to_string().len().max(3) as u16;
    let gutter_width = (digits + 1).min(inner.width);
    let code_area = Rect {
        x: inner.x + gutter_width,
        width: inner.width - gutter_width,
        ..inner
    };

    let (mut vscroll, mut hscroll) = state.editor_scroll;
    let height = inner.height as usize;
    let width = code_area.width as usize;
    if row < vscroll as usize {
        vscroll = row as u16;
    } else if row >= vscroll as usize + height {
        vscroll = (row + 1 - height) as u16;
    }
    if col < hscroll as usize {
        hscroll = col as u16;
    } else if width > 0 && col >= hscroll as usize + width {
        hscroll = (col + 1 - width) as u16;
    }
    state.editor_scroll = (vscroll, hscroll);

    let start = (vscroll as usize).min(lines.len());
    let end = (start + height).min(lines.len());
    let visible = &lines[start..end];

    let gutter: Vec<Line> = (start..end)
        .map(|i| {
            Line::styled(
                format!("{:>width$} ", i + 1, width = digits as usize),
                Style::default().fg(theme.gutter),
            )
        })
        .collect();
    frame.render_widget(
        Paragraph::new(gutter),
        Rect { width: gutter_width, ..inner },
    );
    frame.render_widget(
        Paragraph::new(visible.to_vec()).scroll((0, hscroll)),
        code_area,
    );

    if state.mode == Mode::Insert && is_focused {
        let x = code_area.x + (col as u16).saturating_sub(hscroll);
        let y = code_area.y + (row as u16).saturating_sub(vscroll);
        frame.set_cursor_position(Position { x, y });
    }
}
