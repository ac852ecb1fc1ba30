pub mod events;

use std::sync::Mutex;

use log::warn;

use crate::models::listing::ListingDraft;

use events::{apply, classify, FormEvent, InputEvent};

/// Everything the page holds while the user edits: the draft itself plus
/// transient UI state.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub draft: ListingDraft,
    pub loading: bool,
    pub geolocation_enabled: bool,
}

/// Single owner of the form state for a page session. All mutation goes
/// through the reducer in `events`; validation happens at submission, not
/// here. Interleaved async callbacks share this through `Arc`, so the
/// state sits behind a mutex even though nothing mutates it in parallel.
pub struct FormStore {
    state: Mutex<FormState>,
}

impl FormStore {
    pub fn new() -> FormStore {
        FormStore {
            state: Mutex::new(FormState::default()),
        }
    }

    /// Feeds one raw view notification through classification and the
    /// reducer. Unknown fields are dropped with a warning.
    pub fn apply_input(&self, event: InputEvent) {
        if let Some(classified) = classify(event) {
            self.apply(classified);
        }
    }

    pub fn apply(&self, event: FormEvent) {
        apply(&mut self.lock(), event);
    }

    /// Attaches the session owner. Write-once: a second call for the same
    /// page session is ignored.
    pub fn set_owner(&self, owner_id: &str) {
        let mut state = self.lock();
        match &state.draft.owner_id {
            Some(existing) if existing != owner_id => {
                warn!("owner already set for this session, ignoring '{}'", owner_id)
            }
            Some(_) => {}
            None => state.draft.owner_id = Some(owner_id.to_string()),
        }
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().loading = loading;
    }

    pub fn set_geolocation_enabled(&self, enabled: bool) {
        self.lock().geolocation_enabled = enabled;
    }

    pub fn snapshot(&self) -> FormState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FormState> {
        self.state.lock().expect("form state lock poisoned")
    }
}

impl Default for FormStore {
    fn default() -> Self {
        FormStore::new()
    }
}
