//! UI rendering module for revivr.
//!
//! Re-exports `render()` as the single entry point called from the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each panel
//! and overlay has its own file.

mod layout;
pub mod editor_view;
pub mod help;
pub mod keybindings;
pub mod markdown;
pub mod notice;
pub mod review_view;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: editor, review panel, status bar, overlays.
///
/// Called exactly once per `AppEvent::Render`. Viewport heights and panel
/// rects are written back into `state` so the next key or mouse event can
/// page and hit-test against what is on screen.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [editor, review, status_bar] = compute_layout(frame, state);

    state.editor_viewport_height = inner_rect(editor).height;
    state.review_viewport_height = inner_rect(review).height;
    state.panel_rects = [editor, review];

    editor_view::render_editor(frame, editor, state, theme);
    review_view::render_review(frame, review, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    // Overlays last so they sit on top.
    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::Notice => {
            if let Some(text) = state.notice.as_deref() {
                notice::render_notice(frame, theme, text);
            }
        }
        Mode::Normal | Mode::Insert => {}
    }
}
