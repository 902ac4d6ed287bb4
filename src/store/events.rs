//! Change notifications for store subscribers (UI layers).
//!
//! Listeners run on their own threads (the `event-emitter-rs` model), so a
//! listener should only schedule a re-render, never block on the store.

use std::sync::{Arc, Mutex, PoisonError};

use event_emitter_rs::EventEmitter;

/// Emitted after the collection changed. Payload: the resource kind.
pub const ITEMS_CHANGED: &str = "items";
/// Emitted after a status, error or notice changed. Payload: the operation key.
pub const STATUS_CHANGED: &str = "status";
/// Emitted after the selected detail slot changed. Payload: the resource kind.
pub const SELECTED_CHANGED: &str = "selected";
/// Emitted after the store was cleared on teardown. Payload: the resource kind.
pub const CLEARED: &str = "cleared";

/// Shared emitter handle, cloned along with the store.
#[derive(Clone)]
pub(crate) struct StoreEvents {
    emitter: Arc<Mutex<EventEmitter>>,
}

impl StoreEvents {
    pub(crate) fn new() -> Self {
        Self {
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    pub(crate) fn on<F>(&self, event: &str, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on(event, listener)
    }

    pub(crate) fn emit(&self, event: &str, payload: impl Into<String>) {
        let payload: String = payload.into();
        let _ = self
            .emitter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .emit(event, payload);
    }
}
