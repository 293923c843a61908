//! Review panel renderer.
//!
//! Successful reviews are rendered as markdown (see `markdown.rs`); failures
//! are shown verbatim in the error colour. Scrolling is clamped against the
//! wrapped row count, so the last row of a long review can always be reached.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Paragraph, Wrap},
};
use revivr_core::RequestStatus;

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, SPINNER};

pub const PLACEHOLDER: &str = "Write some code and press r to see the AI's feedback.";

pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Review;
    let block = panel_block(Line::from(" AI Review "), is_focused, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let status = state.status().clone();
    let review_text = state.session.state().review_text.as_str();
    let text = match status {
        RequestStatus::InFlight => Text::from(Line::styled(
            format!("{} Analyzing...", SPINNER[state.spinner_frame % SPINNER.len()]),
            Style::default().fg(theme.loading),
        )),
        _ if review_text.is_empty() => Text::from(Line::styled(
            PLACEHOLDER,
            Style::default().fg(theme.placeholder).add_modifier(Modifier::ITALIC),
        )),
        RequestStatus::Failed(_) => Text::from(
            review_text
                .lines()
                .map(|l| Line::styled(l.to_owned(), Style::default().fg(theme.error_text)))
                .collect::<Vec<_>>(),
        ),
        RequestStatus::Idle | RequestStatus::Succeeded(_) => {
            Text::from(state.review_markdown.lines(review_text, theme).to_vec())
        }
    };

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    let rows = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
    state.review_scroll = state.review_scroll.min(rows.saturating_sub(inner.height));

    frame.render_widget(paragraph.scroll((state.review_scroll, 0)), inner);
}
