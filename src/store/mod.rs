//! ResourceStore - canonical client-side copy of one resource collection.
//!
//! The store holds the ordered collection (server order, unique by id), an
//! optional "selected" detail record, and per-operation-key request status
//! and error messages. It performs no I/O. Collection writes are only made by
//! the [`RequestCoordinator`](crate::RequestCoordinator); UI code reads and
//! clears errors or notices.
//!
//! ## Example
//!
//! ```ignore
//! let tasks = hub.task_store();
//! if tasks.status(&OperationKey::update::<Task>("k1")) == RequestStatus::Failed {
//!     show(tasks.error(&OperationKey::update::<Task>("k1")));
//! }
//! let mine = tasks.view(|all| selectors::tasks_for_member(all, "m1"));
//! ```

#[cfg(feature = "emitter")]
pub mod events;
mod key;
mod status;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::Resource;

pub use key::{OperationKey, OperationKind, WriteScope};
pub use status::RequestStatus;

/// Reported when a store mutation was a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert of an id that is already present.
    Conflict { kind: &'static str, id: String },
    /// Replace or remove of an id that is not present.
    NotFound { kind: &'static str, id: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict { kind, id } => {
                write!(f, "{} {} is already present", kind, id)
            }
            StoreError::NotFound { kind, id } => write!(f, "{} not found: {}", kind, id),
        }
    }
}

impl std::error::Error for StoreError {}

struct StoreState<R> {
    items: Vec<R>,
    scope: Option<String>,
    selected: Option<R>,
    statuses: HashMap<OperationKey, RequestStatus>,
    errors: HashMap<OperationKey, String>,
    notice: Option<String>,
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            scope: None,
            selected: None,
            statuses: HashMap::new(),
            errors: HashMap::new(),
            notice: None,
        }
    }
}

/// In-memory store for one resource kind. Clone-friendly via `Arc`.
pub struct ResourceStore<R> {
    state: Arc<RwLock<StoreState<R>>>,
    #[cfg(feature = "emitter")]
    events: events::StoreEvents,
}

impl<R> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            #[cfg(feature = "emitter")]
            events: self.events.clone(),
        }
    }
}

impl<R: Resource> Default for ResourceStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ResourceStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            #[cfg(feature = "emitter")]
            events: events::StoreEvents::new(),
        }
    }

    // The state is plain data that is never left half-written, so a poisoned
    // lock is still safe to read and write.
    fn read(&self) -> RwLockReadGuard<'_, StoreState<R>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState<R>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Snapshot of the collection in server order.
    pub fn items(&self) -> Vec<R> {
        self.read().items.clone()
    }

    /// Run a projection over the collection without cloning it.
    pub fn view<T>(&self, f: impl FnOnce(&[R]) -> T) -> T {
        f(&self.read().items)
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.read().items.iter().find(|item| item.id() == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().items.iter().any(|item| item.id() == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.read()
            .items
            .iter()
            .map(|item| item.id().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().items.is_empty()
    }

    /// The filter the current collection reflects, if the last fetch was filtered.
    pub fn scope(&self) -> Option<String> {
        self.read().scope.clone()
    }

    /// The selected detail record (e.g. the team opened on a members screen).
    pub fn selected(&self) -> Option<R> {
        self.read().selected.clone()
    }

    /// Status of the latest request for `key`; `Idle` if none was issued.
    pub fn status(&self, key: &OperationKey) -> RequestStatus {
        self.read().statuses.get(key).copied().unwrap_or_default()
    }

    /// Last failure message for `key`.
    pub fn error(&self, key: &OperationKey) -> Option<String> {
        self.read().errors.get(key).cloned()
    }

    /// Every key that currently carries an error.
    pub fn errors(&self) -> Vec<(OperationKey, String)> {
        self.read()
            .errors
            .iter()
            .map(|(key, msg)| (key.clone(), msg.clone()))
            .collect()
    }

    /// Last success message.
    pub fn notice(&self) -> Option<String> {
        self.read().notice.clone()
    }

    /// True while any request against this store is pending.
    pub fn is_loading(&self) -> bool {
        self.read().statuses.values().any(RequestStatus::is_pending)
    }

    // ---------------------------------------------------------------------
    // UI-facing writes
    // ---------------------------------------------------------------------

    pub fn clear_error(&self, key: &OperationKey) {
        let removed = self.write().errors.remove(key).is_some();
        if removed {
            self.notify_status(key);
        }
    }

    pub fn clear_notice(&self) {
        self.write().notice = None;
    }

    pub fn clear_selected(&self) {
        self.write().selected = None;
        self.notify_selected();
    }

    // ---------------------------------------------------------------------
    // Coordinator writes
    // ---------------------------------------------------------------------

    /// Set the collection to exactly `items` (first occurrence wins on duplicate ids).
    pub(crate) fn replace_all(&self, items: Vec<R>, scope: Option<String>) {
        let mut unique: Vec<R> = Vec::with_capacity(items.len());
        for item in items {
            if unique.iter().any(|kept| kept.id() == item.id()) {
                warn!(kind = R::KIND, id = item.id(), "dropping duplicate id from server response");
                continue;
            }
            unique.push(item);
        }

        {
            let mut state = self.write();
            state.items = unique;
            state.scope = scope;
        }
        self.notify_items();
    }

    /// Append `item`; no-op reporting a conflict if its id is present.
    pub(crate) fn insert(&self, item: R) -> Result<(), StoreError> {
        {
            let mut state = self.write();
            if state.items.iter().any(|existing| existing.id() == item.id()) {
                return Err(StoreError::Conflict {
                    kind: R::KIND,
                    id: item.id().to_string(),
                });
            }
            state.items.push(item);
        }
        self.notify_items();
        Ok(())
    }

    /// Replace the entry with `item`'s id in place; no-op reporting not-found if absent.
    pub(crate) fn replace_one(&self, item: R) -> Result<(), StoreError> {
        {
            let mut state = self.write();
            let slot = state
                .items
                .iter_mut()
                .find(|existing| existing.id() == item.id())
                .ok_or_else(|| StoreError::NotFound {
                    kind: R::KIND,
                    id: item.id().to_string(),
                })?;
            *slot = item;
        }
        self.notify_items();
        Ok(())
    }

    /// Remove the entry with `id`; no-op reporting not-found if absent.
    pub(crate) fn remove_one(&self, id: &str) -> Result<R, StoreError> {
        let removed = {
            let mut state = self.write();
            let index = state
                .items
                .iter()
                .position(|existing| existing.id() == id)
                .ok_or_else(|| StoreError::NotFound {
                    kind: R::KIND,
                    id: id.to_string(),
                })?;
            state.items.remove(index)
        };
        self.notify_items();
        Ok(removed)
    }

    pub(crate) fn set_status(&self, key: &OperationKey, status: RequestStatus) {
        self.write().statuses.insert(key.clone(), status);
        self.notify_status(key);
    }

    pub(crate) fn set_error(&self, key: &OperationKey, message: impl Into<String>) {
        self.write().errors.insert(key.clone(), message.into());
        self.notify_status(key);
    }

    pub(crate) fn set_notice(&self, message: impl Into<String>) {
        self.write().notice = Some(message.into());
    }

    pub(crate) fn set_selected(&self, item: R) {
        self.write().selected = Some(item);
        self.notify_selected();
    }

    /// Apply `f` to the selected record if it has `id`. Returns whether it matched.
    pub(crate) fn update_selected(&self, id: &str, f: impl FnOnce(&mut Option<R>)) -> bool {
        let matched = {
            let mut state = self.write();
            let matches = state.selected.as_ref().is_some_and(|s| s.id() == id);
            if matches {
                f(&mut state.selected);
            }
            matches
        };
        if matched {
            self.notify_selected();
        }
        matched
    }

    /// Drop everything: items, detail, statuses, errors, notice.
    pub(crate) fn clear(&self) {
        *self.write() = StoreState::default();
        #[cfg(feature = "emitter")]
        self.events.emit(events::CLEARED, R::KIND);
    }

    // ---------------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------------

    /// Subscribe to change events (see [`events`] for names and payloads).
    /// Returns the listener id.
    #[cfg(feature = "emitter")]
    pub fn on_change<F>(&self, event: &str, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.events.on(event, listener)
    }

    fn notify_items(&self) {
        #[cfg(feature = "emitter")]
        self.events.emit(events::ITEMS_CHANGED, R::KIND);
    }

    fn notify_selected(&self) {
        #[cfg(feature = "emitter")]
        self.events.emit(events::SELECTED_CHANGED, R::KIND);
    }

    fn notify_status(&self, _key: &OperationKey) {
        #[cfg(feature = "emitter")]
        self.events.emit(events::STATUS_CHANGED, _key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, Team};

    fn team(id: &str, name: &str) -> Team {
        Team::new(id, name)
    }

    fn names(store: &ResourceStore<Team>) -> Vec<String> {
        store.view(|teams| teams.iter().map(|t| t.name.clone()).collect())
    }

    #[test]
    fn replace_all_keeps_server_order() {
        let store = ResourceStore::new();
        store.replace_all(vec![team("2", "B"), team("1", "A")], None);

        assert_eq!(store.ids(), vec!["2", "1"]);
        assert_eq!(store.scope(), None);
    }

    #[test]
    fn replace_all_drops_duplicate_ids() {
        let store = ResourceStore::new();
        store.replace_all(vec![team("1", "A"), team("1", "A again"), team("2", "B")], None);

        assert_eq!(store.ids(), vec!["1", "2"]);
        assert_eq!(names(&store), vec!["A", "B"]);
    }

    #[test]
    fn insert_appends_and_rejects_existing_id() {
        let store = ResourceStore::new();
        store.replace_all(vec![team("1", "A"), team("2", "B")], None);

        store.insert(team("3", "C")).unwrap();
        assert_eq!(store.ids(), vec!["1", "2", "3"]);

        let err = store.insert(team("2", "B dup")).unwrap_err();
        assert_eq!(
            err,
            StoreError::Conflict {
                kind: "team",
                id: "2".into()
            }
        );
        assert_eq!(names(&store), vec!["A", "B", "C"]);
    }

    #[test]
    fn replace_one_swaps_in_place() {
        let store = ResourceStore::new();
        store.replace_all(vec![team("1", "A"), team("2", "B"), team("3", "C")], None);

        store.replace_one(team("2", "B2")).unwrap();
        assert_eq!(names(&store), vec!["A", "B2", "C"]);
    }

    #[test]
    fn replace_one_missing_is_reported_no_op() {
        let store = ResourceStore::new();
        store.replace_all(vec![team("1", "A")], None);

        let before = store.items();
        let err = store.replace_one(team("9", "Z")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.items(), before);
    }

    #[test]
    fn remove_one_missing_is_reported_no_op() {
        let store = ResourceStore::new();
        store.replace_all(vec![team("1", "A"), team("2", "B")], None);

        let removed = store.remove_one("1").unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(store.ids(), vec!["2"]);

        let err = store.remove_one("1").unwrap_err();
        assert_eq!(err.to_string(), "team not found: 1");
        assert_eq!(store.ids(), vec!["2"]);
    }

    #[test]
    fn ids_stay_unique_across_mixed_writes() {
        let store = ResourceStore::new();
        store.replace_all(vec![team("1", "A")], None);

        let _ = store.insert(team("2", "B"));
        let _ = store.insert(team("1", "A dup"));
        let _ = store.replace_one(team("2", "B2"));
        let _ = store.remove_one("3");
        let _ = store.insert(team("3", "C"));
        let _ = store.insert(team("3", "C dup"));

        let mut ids = store.ids();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
        assert_eq!(total, 3);
    }

    #[test]
    fn status_and_error_are_scoped_per_key() {
        let store: ResourceStore<Team> = ResourceStore::new();
        let delete = OperationKey::delete::<Team>("1");
        let fetch = OperationKey::fetch_all::<Team>();

        store.set_status(&delete, RequestStatus::Failed);
        store.set_error(&delete, "Failed to delete team");
        store.set_status(&fetch, RequestStatus::Pending);

        assert!(store.is_loading());
        assert_eq!(store.status(&delete), RequestStatus::Failed);
        assert_eq!(store.error(&delete).as_deref(), Some("Failed to delete team"));

        store.set_status(&fetch, RequestStatus::Succeeded);
        assert!(!store.is_loading());
        assert_eq!(store.error(&delete).as_deref(), Some("Failed to delete team"));
        assert_eq!(store.error(&fetch), None);

        store.clear_error(&delete);
        assert_eq!(store.error(&delete), None);
    }

    #[test]
    fn unknown_key_is_idle() {
        let store: ResourceStore<Team> = ResourceStore::new();
        assert_eq!(
            store.status(&OperationKey::fetch_one::<Team>("x")),
            RequestStatus::Idle
        );
    }

    #[test]
    fn update_selected_only_touches_matching_id() {
        let store = ResourceStore::new();
        store.set_selected(team("1", "A").with_members(vec![Member::new("m1")]));

        assert!(!store.update_selected("2", |s| *s = None));
        assert!(store.selected().is_some());

        assert!(store.update_selected("1", |s| {
            if let Some(team) = s {
                team.members.clear();
            }
        }));
        assert!(store.selected().unwrap().members.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let store = ResourceStore::new();
        let key = OperationKey::fetch_all::<Team>();
        store.replace_all(vec![team("1", "A")], Some("mine".into()));
        store.set_selected(team("1", "A"));
        store.set_status(&key, RequestStatus::Failed);
        store.set_error(&key, "boom");
        store.set_notice("ok");

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.scope(), None);
        assert_eq!(store.selected(), None);
        assert_eq!(store.status(&key), RequestStatus::Idle);
        assert_eq!(store.error(&key), None);
        assert_eq!(store.notice(), None);
    }

    #[test]
    fn clone_shares_state() {
        let store = ResourceStore::new();
        let clone = store.clone();
        store.insert(team("1", "A")).unwrap();
        assert!(clone.contains("1"));
    }

    #[cfg(feature = "emitter")]
    #[test]
    fn emits_item_changes() {
        use std::sync::mpsc;
        use std::time::Duration;

        let store: ResourceStore<Team> = ResourceStore::new();
        let (tx, rx) = mpsc::channel();
        store.on_change(events::ITEMS_CHANGED, move |kind: String| {
            let _ = tx.send(kind);
        });

        store.insert(team("1", "A")).unwrap();

        let kind = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(kind, "team");
    }
}
