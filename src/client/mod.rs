//! TaskHub - the explicitly constructed client instance.
//!
//! Owns the session, one store per resource kind and the coordinator. UIs
//! hold a `TaskHub` (it is cheap to clone) instead of reaching for a global
//! store, issue operations through the typed accessors and read state from
//! the stores.
//!
//! ## Example
//!
//! ```ignore
//! let hub = TaskHub::from_config(&ClientConfig::from_env()?)?;
//! hub.auth().login("alice@example.com", "secret").await?;
//! hub.teams().fetch_all().await?;
//! hub.tasks().fetch_for_member("team-1", "member-7").await?;
//!
//! let open = hub.task_store().view(|tasks| selectors::tasks_with_status(tasks, TaskStatus::Pending));
//! hub.logout();
//! ```

mod auth;
mod tasks;
mod teams;

use std::sync::Arc;

use tracing::info;

use crate::coordinator::RequestCoordinator;
use crate::gateway::Gateway;
use crate::model::{Task, Team};
use crate::session::SessionHandle;
use crate::store::{ResourceStore, StoreError};
use crate::Resource;

pub use auth::AuthOps;
pub use tasks::TaskOps;
pub use teams::TeamOps;

#[cfg(feature = "http")]
use crate::config::{ClientConfig, ConfigError};
#[cfg(feature = "http")]
use crate::gateway::HttpGateway;

/// Client facade over one API session.
pub struct TaskHub<G> {
    coordinator: Arc<RequestCoordinator<G>>,
    teams: ResourceStore<Team>,
    tasks: ResourceStore<Task>,
}

impl<G> Clone for TaskHub<G> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
            teams: self.teams.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

impl<G: Gateway> TaskHub<G> {
    /// Create a logged-out client over `gateway`.
    pub fn new(gateway: G) -> Self {
        Self::with_session(gateway, SessionHandle::new())
    }

    /// Create a client sharing an existing session handle.
    pub fn with_session(gateway: G, session: SessionHandle) -> Self {
        Self {
            coordinator: Arc::new(RequestCoordinator::new(gateway, session)),
            teams: ResourceStore::new(),
            tasks: ResourceStore::new(),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        self.coordinator.session()
    }

    pub fn coordinator(&self) -> &RequestCoordinator<G> {
        &self.coordinator
    }

    pub fn team_store(&self) -> &ResourceStore<Team> {
        &self.teams
    }

    pub fn task_store(&self) -> &ResourceStore<Task> {
        &self.tasks
    }

    /// Team operations.
    pub fn teams(&self) -> TeamOps<'_, G> {
        TeamOps::new(self)
    }

    /// Task operations.
    pub fn tasks(&self) -> TaskOps<'_, G> {
        TaskOps::new(self)
    }

    /// Signup and login.
    pub fn auth(&self) -> AuthOps<'_, G> {
        AuthOps::new(self)
    }

    /// Tear the session down: drop credentials, invalidate in-flight
    /// requests and clear both stores.
    pub fn logout(&self) {
        self.coordinator.session().clear();
        self.coordinator.reset();
        self.teams.clear();
        self.tasks.clear();
        info!("session torn down");
    }
}

#[cfg(feature = "http")]
impl TaskHub<HttpGateway> {
    /// Create a logged-out client talking HTTP to `config.api_url`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(HttpGateway::new(config)?))
    }
}

/// Store mutation for fetches: replace the whole collection.
fn replace_collection<R: Resource>(
    scope: Option<String>,
) -> impl FnOnce(&ResourceStore<R>, &Vec<R>) -> Result<(), StoreError> + Send {
    move |store, items| {
        store.replace_all(items.clone(), scope);
        Ok(())
    }
}

/// Store mutation for creates: append and announce.
fn insert_created<R: Resource>(
    notice: &'static str,
) -> impl FnOnce(&ResourceStore<R>, &R) -> Result<(), StoreError> + Send {
    move |store, item| {
        store.set_notice(notice);
        store.insert(item.clone())
    }
}

/// Store mutation for updates: write the server echo back, detail slot included.
fn replace_updated<R: Resource>(
    notice: &'static str,
) -> impl FnOnce(&ResourceStore<R>, &R) -> Result<(), StoreError> + Send {
    move |store, item| {
        store.set_notice(notice);
        store.update_selected(item.id(), |selected| *selected = Some(item.clone()));
        store.replace_one(item.clone())
    }
}

/// Store mutation for deletes: only the id is propagated.
fn remove_deleted<R: Resource>(
    id: String,
    notice: &'static str,
) -> impl FnOnce(&ResourceStore<R>, &()) -> Result<(), StoreError> + Send {
    move |store, _| {
        store.set_notice(notice);
        store.update_selected(&id, |selected| *selected = None);
        store.remove_one(&id).map(drop)
    }
}

fn require(value: &str, message: &str) -> Result<(), crate::ClientError> {
    if value.trim().is_empty() {
        Err(crate::ClientError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}
