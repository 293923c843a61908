//! Central application state for revivr.
//!
//! Owns the persisted [`Session`], the [`ReviewController`], the editor cursor,
//! and all transient UI state (mode, focus, scroll offsets, panel geometry).
//! No ratatui rendering logic lives here; `ui/` reads this state and
//! `ui/keybindings.rs` mutates it.

use ratatui::layout::Rect;
use revivr_core::{
    Language, PendingReview, RequestStatus, RequestToken, ReviewController, ReviewError,
    ReviewRejected, ReviewReply, Session, SlotStore, StoreError,
};

use crate::editor::Cursor;
use crate::highlight::HighlightCache;
use crate::ui::markdown::MarkdownCache;

/// The session type the app runs on: any store, boxed.
pub type AppSession = Session<Box<dyn SlotStore>>;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and commands (default).
    #[default]
    Normal,
    /// Typing into the editor.
    Insert,
    /// Full-screen help overlay above both panels.
    HelpOverlay,
    /// Blocking notice; any dismiss key returns to Normal.
    Notice,
}

/// Which panel currently has keyboard focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    #[default]
    Editor,
    Review,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Editor => PanelFocus::Review,
            PanelFocus::Review => PanelFocus::Editor,
        }
    }
}

pub struct AppState {
    pub mode: Mode,
    pub focus: PanelFocus,

    pub session: AppSession,
    pub review: ReviewController,
    pub cursor: Cursor,
    /// Bumped whenever source text or language changes; keys the highlight cache.
    pub source_revision: u64,
    pub highlight: HighlightCache,
    pub review_markdown: MarkdownCache,

    /// First visible editor row / column.
    pub editor_scroll: (u16, u16),
    pub review_scroll: u16,
    pub help_scroll: u16,
    /// Inner heights after borders, cached after each render for paging.
    pub editor_viewport_height: u16,
    pub review_viewport_height: u16,

    /// Width percentage of the editor panel in side-by-side layout. Default: 55.
    pub editor_pct: u16,
    /// Outer rects of `[editor, review]` from the last render, for mouse hit tests.
    pub panel_rects: [Rect; 2],

    /// Text of the blocking notice shown in `Mode::Notice`.
    pub notice: Option<String>,
    /// Transient one-line message for the status bar (e.g. storage failures).
    pub status_message: Option<String>,
    /// Advances on every tick while a review is in flight.
    pub spinner_frame: usize,
}

impl AppState {
    /// Wraps a restored session; the cursor starts at the end of the source.
    pub fn new(session: AppSession) -> Self {
        let cursor = Cursor::at_end(&session.state().source_text);
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            session,
            review: ReviewController::new(),
            cursor,
            source_revision: 0,
            highlight: HighlightCache::default(),
            review_markdown: MarkdownCache::default(),
            editor_scroll: (0, 0),
            review_scroll: 0,
            help_scroll: 0,
            editor_viewport_height: 0,
            review_viewport_height: 0,
            editor_pct: 55,
            panel_rects: [Rect::default(); 2],
            notice: None,
            status_message: None,
            spinner_frame: 0,
        }
    }

    pub fn language(&self) -> Language {
        self.session.state().language
    }

    /// Records a storage failure in the log and the status bar.
    ///
    /// The in-memory state is already updated; only the mirror is behind.
    fn note_store(&mut self, result: Result<(), StoreError>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist session");
            self.status_message = Some(format!("Could not save session: {e}"));
        }
    }

    /// Runs an editor edit against the source text and persists if it changed.
    pub fn edit_source(&mut self, edit: impl FnOnce(&mut Cursor, &mut String) -> bool) {
        let cursor = &mut self.cursor;
        match self.session.edit_source(|text| edit(cursor, text)) {
            Ok(true) => self.source_revision += 1,
            Ok(false) => {}
            Err(e) => {
                self.source_revision += 1;
                self.note_store(Err(e));
            }
        }
    }

    /// Moves the cursor without touching the text.
    pub fn move_cursor(&mut self, motion: impl FnOnce(&mut Cursor, &str)) {
        motion(&mut self.cursor, &self.session.state().source_text);
    }

    pub fn set_language(&mut self, language: Language) {
        if language == self.language() {
            return;
        }
        let result = self.session.set_language(language);
        self.source_revision += 1;
        tracing::debug!(%language, "language selected");
        self.note_store(result);
    }

    pub fn next_language(&mut self) {
        self.set_language(self.language().next());
    }

    pub fn prev_language(&mut self) {
        self.set_language(self.language().prev());
    }

    /// Starts a review of the current source, if allowed.
    ///
    /// Returns the request to send. While a request is in flight the action is
    /// disabled and this returns `None`. Empty source opens the blocking notice.
    pub fn start_review(&mut self) -> Option<PendingReview> {
        if self.review.is_in_flight() {
            return None;
        }
        let state = self.session.state();
        match self.review.begin(&state.source_text, state.language) {
            Ok(pending) => {
                let result = self.session.set_review_text(String::new());
                self.note_store(result);
                self.review_scroll = 0;
                self.spinner_frame = 0;
                Some(pending)
            }
            Err(rejected @ ReviewRejected::EmptySource) => {
                self.show_notice(rejected.to_string());
                None
            }
        }
    }

    /// Applies a finished review call. Stale responses are dropped.
    pub fn finish_review(
        &mut self,
        token: RequestToken,
        outcome: Result<ReviewReply, ReviewError>,
    ) {
        if let Some(text) = self.review.complete(token, outcome) {
            let result = self.session.set_review_text(text);
            self.note_store(result);
            self.review_scroll = 0;
        }
    }

    /// Empties source and review (the language selection stays).
    pub fn clear_session(&mut self) {
        match self.session.clear() {
            Ok(()) => self.status_message = Some("Session cleared".to_owned()),
            Err(e) => self.note_store(Err(e)),
        }
        self.cursor.clamp(&self.session.state().source_text);
        self.source_revision += 1;
        self.editor_scroll = (0, 0);
        self.review_scroll = 0;
    }

    pub fn show_notice(&mut self, text: String) {
        self.notice = Some(text);
        self.mode = Mode::Notice;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.mode = Mode::Normal;
    }

    /// Advances the loading spinner while a request is in flight.
    pub fn on_tick(&mut self) {
        if self.review.is_in_flight() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn status(&self) -> &RequestStatus {
        self.review.status()
    }

    pub fn scroll_review_down(&mut self, lines: u16) {
        self.review_scroll = self.review_scroll.saturating_add(lines);
    }

    pub fn scroll_review_up(&mut self, lines: u16) {
        self.review_scroll = self.review_scroll.saturating_sub(lines);
    }

    /// Half the cached review viewport, at least one row.
    pub fn review_half_page(&self) -> u16 {
        (self.review_viewport_height / 2).max(1)
    }

    /// Half the cached editor viewport, at least one row.
    pub fn editor_half_page(&self) -> u16 {
        (self.editor_viewport_height / 2).max(1)
    }

    /// Shrinks the editor panel by 5%, not below 25%.
    pub fn shrink_editor_panel(&mut self) {
        const MIN_EDITOR: u16 = 25;
        const STEP: u16 = 5;
        self.editor_pct = self.editor_pct.saturating_sub(STEP).max(MIN_EDITOR);
    }

    /// Grows the editor panel by 5%, not above 75%.
    pub fn grow_editor_panel(&mut self) {
        const MAX_EDITOR: u16 = 75;
        const STEP: u16 = 5;
        self.editor_pct = (self.editor_pct + STEP).min(MAX_EDITOR);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use revivr_core::MemoryStore;

    pub(crate) fn state_with(source: &str) -> AppState {
        let mut session: AppSession = Session::restore(Box::new(MemoryStore::new()));
        session.set_source_text(source).unwrap();
        AppState::new(session)
    }

    #[test]
    fn empty_source_opens_notice_without_request() {
        let mut state = state_with(" \n ");
        assert!(state.start_review().is_none());
        assert_eq!(state.mode, Mode::Notice);
        assert_eq!(state.notice.as_deref(), Some("Please add some code first."));
        assert_eq!(state.status(), &RequestStatus::Idle);

        state.dismiss_notice();
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.notice.is_none());
    }

    #[test]
    fn review_is_disabled_while_in_flight() {
        let mut state = state_with("x = 1");
        state.session.set_review_text("old").unwrap();

        let pending = state.start_review().expect("request should start");
        assert!(state.status().is_in_flight());
        assert_eq!(state.session.state().review_text, "", "previous review cleared");
        assert!(state.start_review().is_none(), "second trigger ignored");

        state.finish_review(
            pending.token,
            Ok(ReviewReply {
                review: Some("Nice".into()),
            }),
        );
        assert_eq!(state.status(), &RequestStatus::Succeeded("Nice".into()));
        assert_eq!(state.session.state().review_text, "Nice");
        assert!(state.start_review().is_some(), "re-enabled after settling");
    }

    #[test]
    fn failed_review_shows_error_text() {
        let mut state = state_with("x = 1");
        let pending = state.start_review().unwrap();
        state.finish_review(pending.token, Err(ReviewError::Network("timed out".into())));
        assert_eq!(state.session.state().review_text, "Network error: timed out");
        assert!(!state.status().is_in_flight());
    }

    #[test]
    fn edits_bump_revision_only_when_text_changes() {
        let mut state = state_with("");
        state.edit_source(|cur, text| cur.insert_char(text, 'a'));
        assert_eq!(state.session.state().source_text, "a");
        assert_eq!(state.source_revision, 1);

        state.edit_source(|cur, text| cur.delete(text));
        assert_eq!(state.source_revision, 1, "delete at end changes nothing");
    }

    #[test]
    fn clear_resets_text_and_cursor_but_not_language() {
        let mut state = state_with("print(1)");
        state.set_language(Language::Python);
        state.session.set_review_text("ok").unwrap();

        state.clear_session();

        assert_eq!(state.session.state().source_text, "");
        assert_eq!(state.session.state().review_text, "");
        assert_eq!(state.language(), Language::Python);
        assert_eq!(state.cursor.pos(), 0);
        assert_eq!(state.status_message.as_deref(), Some("Session cleared"));
    }

    #[test]
    fn language_cycles_and_persists() {
        let mut state = state_with("");
        state.next_language();
        assert_eq!(state.language(), Language::Jsx);
        state.prev_language();
        state.prev_language();
        assert_eq!(state.language(), Language::Java);
        assert_eq!(
            state.session.store().get(revivr_core::session::LANGUAGE_KEY).unwrap().as_deref(),
            Some("java")
        );
    }

    /// Reads like an empty store; every write fails as a full disk would.
    struct FullDisk;

    impl SlotStore for FullDisk {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(disk_full())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(disk_full())
        }
    }

    fn disk_full() -> StoreError {
        StoreError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL),
            Some("database or disk is full".into()),
        ))
    }

    fn assert_save_failed(state: &mut AppState, after: &str) {
        let message = state.status_message.take().unwrap_or_default();
        assert!(
            message.starts_with("Could not save session"),
            "after {after}: status was {message:?}"
        );
    }

    #[test]
    fn storage_failures_keep_memory_state_and_report_in_status_bar() {
        let store: Box<dyn SlotStore> = Box::new(FullDisk);
        let mut state = AppState::new(Session::restore(store));

        state.edit_source(|cur, text| cur.insert_str(text, "x = 1"));
        assert_eq!(state.session.state().source_text, "x = 1");
        assert_eq!(state.source_revision, 1);
        assert_save_failed(&mut state, "edit_source");

        state.set_language(Language::Python);
        assert_eq!(state.language(), Language::Python);
        assert_save_failed(&mut state, "set_language");

        let pending = state.start_review().expect("request should start");
        assert_save_failed(&mut state, "start_review");
        state.finish_review(
            pending.token,
            Ok(ReviewReply {
                review: Some("Looks fine".into()),
            }),
        );
        assert_eq!(state.session.state().review_text, "Looks fine");
        assert_eq!(state.status(), &RequestStatus::Succeeded("Looks fine".into()));
        assert_save_failed(&mut state, "finish_review");

        state.clear_session();
        assert_eq!(state.session.state().source_text, "");
        assert_eq!(state.session.state().review_text, "");
        assert_eq!(state.language(), Language::Python);
        assert_save_failed(&mut state, "clear_session");
    }

    #[test]
    fn editor_panel_resize_is_bounded() {
        let mut state = state_with("");
        for _ in 0..20 {
            state.grow_editor_panel();
        }
        assert_eq!(state.editor_pct, 75);
        for _ in 0..20 {
            state.shrink_editor_panel();
        }
        assert_eq!(state.editor_pct, 25);
    }
}
