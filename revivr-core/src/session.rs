//! Session persistence: mirrors [`SessionState`] into a [`SlotStore`].
//!
//! Every mutator on [`Session`] writes through to the store before returning.
//! There is no debounce and no dirty tracking; the store always holds the last
//! state the user saw.

use crate::error::StoreError;
use crate::store::SlotStore;
use crate::types::{Language, SessionState};

/// Slot holding the editor's source text.
pub const SOURCE_KEY: &str = "revivr_code";
/// Slot holding the selected language identifier.
pub const LANGUAGE_KEY: &str = "revivr_lang";
/// Slot holding the last review (or error) text.
pub const REVIEW_KEY: &str = "revivr_review";

/// Reads the three slots into a fresh [`SessionState`].
///
/// Missing or empty slots leave the field at its default. An unreadable slot
/// or an unrecognised language is logged and treated the same as a missing one,
/// so this never fails.
pub fn restore<S: SlotStore + ?Sized>(store: &S) -> SessionState {
    let mut state = SessionState::default();

    if let Some(text) = read_slot(store, SOURCE_KEY) {
        state.source_text = text;
    }
    if let Some(raw) = read_slot(store, LANGUAGE_KEY) {
        match raw.parse::<Language>() {
            Ok(lang) => state.language = lang,
            Err(e) => tracing::warn!(error = %e, "ignoring persisted language"),
        }
    }
    if let Some(text) = read_slot(store, REVIEW_KEY) {
        state.review_text = text;
    }

    state
}

fn read_slot<S: SlotStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(Some(value)) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read slot; using default");
            None
        }
    }
}

/// Writes all three fields, unconditionally. Last write wins.
///
/// # Errors
///
/// Returns the first `StoreError`; slots written before it keep their new value.
pub fn persist<S: SlotStore + ?Sized>(
    store: &mut S,
    state: &SessionState,
) -> Result<(), StoreError> {
    store.set(SOURCE_KEY, &state.source_text)?;
    store.set(LANGUAGE_KEY, state.language.as_str())?;
    store.set(REVIEW_KEY, &state.review_text)?;
    Ok(())
}

/// The editor session: in-memory state plus the store it is mirrored to.
pub struct Session<S: SlotStore> {
    state: SessionState,
    store: S,
}

impl<S: SlotStore> Session<S> {
    /// Rehydrates a session from `store`.
    pub fn restore(store: S) -> Self {
        let state = restore(&store);
        tracing::debug!(
            source_len = state.source_text.len(),
            language = %state.language,
            review_len = state.review_text.len(),
            "session restored"
        );
        Self { state, store }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn set_source_text(&mut self, text: impl Into<String>) -> Result<(), StoreError> {
        self.state.source_text = text.into();
        self.persist()
    }

    /// Applies an in-place edit to the source text.
    ///
    /// `edit` returns whether it changed anything; the session persists only
    /// when it did. Returns that same flag.
    pub fn edit_source(
        &mut self,
        edit: impl FnOnce(&mut String) -> bool,
    ) -> Result<bool, StoreError> {
        let changed = edit(&mut self.state.source_text);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), StoreError> {
        self.state.language = language;
        self.persist()
    }

    pub fn set_review_text(&mut self, text: impl Into<String>) -> Result<(), StoreError> {
        self.state.review_text = text.into();
        self.persist()
    }

    /// Empties source and review, in memory and in storage.
    ///
    /// The language slot is left as it is, so the selection survives a clear.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.state.source_text.clear();
        self.state.review_text.clear();
        self.store.remove(SOURCE_KEY)?;
        self.store.remove(REVIEW_KEY)?;
        tracing::info!("session cleared");
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        persist(&mut self.store, &self.state)
    }
}
