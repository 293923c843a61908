//! Keybinding dispatcher for revivr.
//!
//! Translates crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop what to do next. The dispatcher branches
//! first on `state.mode` so each mode has an isolated handler.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use revivr_core::PendingReview;

use crate::app::{AppState, Mode, PanelFocus};

/// Control-flow signal returned from the dispatchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// A review cycle has started; the loop must send this request.
    SendReview(PendingReview),
}

impl KeyAction {
    fn from_review(pending: Option<PendingReview>) -> Self {
        pending.map_or(KeyAction::Continue, KeyAction::SendReview)
    }
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Notice => handle_notice(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    state.status_message = None;

    let focus_action = match state.focus {
        PanelFocus::Editor => handle_editor_motion(key, state),
        PanelFocus::Review => handle_review_scroll(key, state),
    };
    if let Some(action) = focus_action {
        return action;
    }

    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => {
            state.focus = PanelFocus::Editor;
            state.mode = Mode::Insert;
            KeyAction::Continue
        }

        KeyCode::Tab | KeyCode::Char('H') | KeyCode::Char('L') => {
            state.focus = state.focus.toggle();
            KeyAction::Continue
        }

        KeyCode::Char('r') => KeyAction::from_review(state.start_review()),

        KeyCode::Char(']') => { state.next_language(); KeyAction::Continue }
        KeyCode::Char('[') => { state.prev_language(); KeyAction::Continue }

        KeyCode::Char('C') => { state.clear_session(); KeyAction::Continue }

        KeyCode::Char('<') => { state.shrink_editor_panel(); KeyAction::Continue }
        KeyCode::Char('>') => { state.grow_editor_panel(); KeyAction::Continue }

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// Cursor motions while the editor has focus in Normal mode.
///
/// Returns `None` when the key is not a motion and should fall through.
fn handle_editor_motion(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('h') | KeyCode::Left => state.move_cursor(|c, t| c.left(t)),
        KeyCode::Char('l') | KeyCode::Right => state.move_cursor(|c, t| c.right(t)),
        KeyCode::Char('k') | KeyCode::Up => state.move_cursor(|c, t| c.up(t)),
        KeyCode::Char('j') | KeyCode::Down => state.move_cursor(|c, t| c.down(t)),
        KeyCode::Char('0') | KeyCode::Home => state.move_cursor(|c, t| c.home(t)),
        KeyCode::Char('$') | KeyCode::End => state.move_cursor(|c, t| c.end(t)),
        KeyCode::Char('g') => state.move_cursor(|c, _| c.top()),
        KeyCode::Char('G') => state.move_cursor(|c, t| c.bottom(t)),
        KeyCode::Char('d') if ctrl => {
            let rows = state.editor_half_page();
            state.move_cursor(|c, t| (0..rows).for_each(|_| c.down(t)));
        }
        KeyCode::Char('u') if ctrl => {
            let rows = state.editor_half_page();
            state.move_cursor(|c, t| (0..rows).for_each(|_| c.up(t)));
        }
        _ => return None,
    }
    Some(KeyAction::Continue)
}

/// Scroll keys while the review panel has focus.
fn handle_review_scroll(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_review_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_review_up(1),
        KeyCode::Char('g') => state.review_scroll = 0,
        KeyCode::Char('G') => state.review_scroll = u16::MAX,
        KeyCode::Char('d') if ctrl => state.scroll_review_down(state.review_half_page()),
        KeyCode::Char('u') if ctrl => state.scroll_review_up(state.review_half_page()),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Typing into the editor. `Esc` returns to Normal mode.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Char('r') if ctrl => return KeyAction::from_review(state.start_review()),
        KeyCode::Char(_) if ctrl => {}
        KeyCode::Char(c) => state.edit_source(|cur, text| cur.insert_char(text, c)),
        KeyCode::Enter => state.edit_source(|cur, text| cur.insert_char(text, '\n')),
        KeyCode::Tab => state.edit_source(|cur, text| cur.insert_tab(text)),
        KeyCode::Backspace => state.edit_source(|cur, text| cur.backspace(text)),
        KeyCode::Delete => state.edit_source(|cur, text| cur.delete(text)),
        KeyCode::Left => state.move_cursor(|c, t| c.left(t)),
        KeyCode::Right => state.move_cursor(|c, t| c.right(t)),
        KeyCode::Up => state.move_cursor(|c, t| c.up(t)),
        KeyCode::Down => state.move_cursor(|c, t| c.down(t)),
        KeyCode::Home => state.move_cursor(|c, t| c.home(t)),
        KeyCode::End => state.move_cursor(|c, t| c.end(t)),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Notice mode
// ---------------------------------------------------------------------------

/// The notice blocks every other key until it is dismissed.
fn handle_notice(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if matches!(
        key.code,
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q')
    ) {
        state.dismiss_notice();
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Left click focuses a panel; the wheel scrolls the review panel or help overlay.
///
/// The blocking notice swallows all mouse input.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    if state.mode == Mode::Notice {
        return KeyAction::Continue;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [editor, review] = state.panel_rects;
            if editor.contains(pos) {
                state.focus = PanelFocus::Editor;
            } else if review.contains(pos) {
                state.focus = PanelFocus::Review;
            }
        }
        MouseEventKind::ScrollUp => match state.mode {
            Mode::HelpOverlay => state.help_scroll = state.help_scroll.saturating_sub(3),
            _ if state.focus == PanelFocus::Review => state.scroll_review_up(3),
            _ => state.move_cursor(|c, t| (0..3).for_each(|_| c.up(t))),
        },
        MouseEventKind::ScrollDown => match state.mode {
            Mode::HelpOverlay => state.help_scroll = state.help_scroll.saturating_add(3),
            _ if state.focus == PanelFocus::Review => state.scroll_review_down(3),
            _ => state.move_cursor(|c, t| (0..3).for_each(|_| c.down(t))),
        },
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::state_with;
    use ratatui::layout::Rect;
    use revivr_core::{Language, RequestStatus, SlotStore};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_str(state: &mut AppState, s: &str) {
        for c in s.chars() {
            let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            assert_eq!(handle_key(key(code), state), KeyAction::Continue);
        }
    }

    #[test]
    fn insert_mode_typing_persists_source() {
        let mut state = state_with("");
        handle_key(key(KeyCode::Char('i')), &mut state);
        assert_eq!(state.mode, Mode::Insert);

        type_str(&mut state, "x = 1\nprint(x)");
        handle_key(key(KeyCode::Backspace), &mut state);
        handle_key(key(KeyCode::Esc), &mut state);

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.session.state().source_text, "x = 1\nprint(x");
        assert_eq!(
            state.session.store().get(revivr_core::session::SOURCE_KEY).unwrap().as_deref(),
            Some("x = 1\nprint(x")
        );
    }

    #[test]
    fn review_key_returns_request_payload() {
        let mut state = state_with("let a = 1;");
        handle_key(key(KeyCode::Char(']')), &mut state);

        let action = handle_key(key(KeyCode::Char('r')), &mut state);
        let KeyAction::SendReview(pending) = action else {
            panic!("expected SendReview, got {action:?}");
        };
        assert_eq!(pending.payload.code, "let a = 1;");
        assert_eq!(pending.payload.language, Language::Jsx);
        assert_eq!(state.status(), &RequestStatus::InFlight);

        // Disabled while in flight.
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut state), KeyAction::Continue);
    }

    #[test]
    fn ctrl_r_reviews_from_insert_mode() {
        let mut state = state_with("int x;");
        state.mode = Mode::Insert;
        assert!(matches!(handle_key(ctrl('r'), &mut state), KeyAction::SendReview(_)));
        assert_eq!(state.session.state().source_text, "int x;", "no 'r' typed");
    }

    #[test]
    fn empty_review_blocks_until_dismissed() {
        let mut state = state_with("");
        assert_eq!(handle_key(key(KeyCode::Char('r')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Notice);

        // Other keys are swallowed, including quit-by-letter on other modes.
        handle_key(key(KeyCode::Char('C')), &mut state);
        assert_eq!(state.mode, Mode::Notice);

        handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.status(), &RequestStatus::Idle);
    }

    #[test]
    fn clear_key_empties_session() {
        let mut state = state_with("code");
        handle_key(key(KeyCode::Char('C')), &mut state);
        assert_eq!(state.session.state().source_text, "");
    }

    #[test]
    fn focus_switch_routes_scroll_keys() {
        let mut state = state_with("a\nb\nc");
        handle_key(key(KeyCode::Char('g')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.cursor.line_col(&state.session.state().source_text), (1, 0));

        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.focus, PanelFocus::Review);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.review_scroll, 1);
        assert_eq!(state.cursor.line_col(&state.session.state().source_text), (1, 0));
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn notice_swallows_mouse_input() {
        let mut state = state_with("a\nb\nc\nd\ne");
        state.panel_rects = [Rect::new(0, 0, 40, 10), Rect::new(40, 0, 40, 10)];
        handle_key(key(KeyCode::Char('g')), &mut state);
        state.show_notice("Please add some code first.".into());

        handle_mouse(mouse(MouseEventKind::ScrollDown, 5, 5), &mut state);
        handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 5), &mut state);

        assert_eq!(state.cursor.line_col(&state.session.state().source_text), (0, 0));
        assert_eq!(state.focus, PanelFocus::Editor);
        assert_eq!(state.mode, Mode::Notice);

        state.dismiss_notice();
        handle_mouse(mouse(MouseEventKind::ScrollDown, 5, 5), &mut state);
        assert_eq!(state.cursor.line_col(&state.session.state().source_text), (3, 0));
    }

    #[test]
    fn help_overlay_opens_and_closes() {
        let mut state = state_with("");
        handle_key(key(KeyCode::Char('?')), &mut state);
        assert_eq!(state.mode, Mode::HelpOverlay);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.help_scroll, 1);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Continue);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(handle_key(key(KeyCode::Char('q')), &mut state), KeyAction::Quit);
    }
}
