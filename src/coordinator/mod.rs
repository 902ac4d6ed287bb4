//! RequestCoordinator - one generic pending/succeeded/failed pipeline for every operation.
//!
//! Each call:
//!
//! 1. issues a sequence-numbered [`Ticket`] for its logical key and records
//!    `Pending` for that key;
//! 2. fails fast with an authentication error if the session has no token;
//! 3. sends the request through the [`Gateway`] and decodes the envelope;
//! 4. settles: the store mutation runs only if the ticket is still the
//!    latest for its write scope, and status/error are written only if it
//!    is still the latest for its logical key.
//!
//! A superseded call still returns its own result to its caller. Nothing is
//! retried.
//!
//! ## Example
//!
//! ```ignore
//! let op = Operation::new(
//!     OperationKey::fetch_all::<Team>(),
//!     ApiRequest::get("/team"),
//!     |body| envelope::field::<Vec<Team>>(body, "teams"),
//!     |store, teams| {
//!         store.replace_all(teams.clone(), None);
//!         Ok(())
//!     },
//! );
//! let teams = coordinator.execute(&team_store, op).await?;
//! ```

mod sequence;

use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};

use crate::error::ClientError;
use crate::gateway::{ApiRequest, Gateway};
use crate::session::SessionHandle;
use crate::store::{OperationKey, RequestStatus, ResourceStore, StoreError};
use crate::Resource;

pub use sequence::{Sequencer, Standing, Ticket};

pub(crate) const MISSING_TOKEN: &str = "Authentication token is missing. Please login again.";

/// One logical operation: what to send, how to decode it, how to apply it.
pub struct Operation<D, A> {
    key: OperationKey,
    request: ApiRequest,
    fallback: Option<String>,
    decode: D,
    apply: A,
}

impl<D, A> Operation<D, A> {
    /// `decode` turns the success body into a value; `apply` writes that value
    /// into the store and reports no-ops as [`StoreError`].
    pub fn new(key: OperationKey, request: ApiRequest, decode: D, apply: A) -> Self {
        Self {
            key,
            request,
            fallback: None,
            decode,
            apply,
        }
    }

    /// Message used when the server fails without a `message`/`error` field.
    pub fn fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = Some(message.into());
        self
    }

    pub fn key(&self) -> &OperationKey {
        &self.key
    }
}

/// Sequences operations against a gateway and resolves them into store updates.
pub struct RequestCoordinator<G> {
    gateway: G,
    session: SessionHandle,
    sequencer: Sequencer,
}

impl<G: Gateway> RequestCoordinator<G> {
    pub fn new(gateway: G, session: SessionHandle) -> Self {
        Self {
            gateway,
            session,
            sequencer: Sequencer::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Run one authenticated operation against `store`.
    pub async fn execute<R, T, D, A>(
        &self,
        store: &ResourceStore<R>,
        operation: Operation<D, A>,
    ) -> Result<T, ClientError>
    where
        R: Resource,
        T: Send,
        D: FnOnce(Value) -> Result<T, ClientError> + Send,
        A: FnOnce(&ResourceStore<R>, &T) -> Result<(), StoreError> + Send,
    {
        let span = info_span!("resource_op", key = %operation.key);
        self.run(store, operation).instrument(span).await
    }

    async fn run<R, T, D, A>(
        &self,
        store: &ResourceStore<R>,
        operation: Operation<D, A>,
    ) -> Result<T, ClientError>
    where
        R: Resource,
        T: Send,
        D: FnOnce(Value) -> Result<T, ClientError> + Send,
        A: FnOnce(&ResourceStore<R>, &T) -> Result<(), StoreError> + Send,
    {
        let Operation {
            key,
            request,
            fallback,
            decode,
            apply,
        } = operation;

        let ticket = self.sequencer.issue(&key);
        store.set_status(&key, RequestStatus::Pending);

        let outcome = match self.session.token() {
            None => Err(ClientError::Authentication(MISSING_TOKEN.to_string())),
            Some(token) => {
                debug!(request = %request, seq = ticket.seq(), "issuing request");
                match self.gateway.send(request.bearer(token)).await {
                    Ok(body) => decode(body),
                    Err(err) => Err(match &fallback {
                        Some(message) => ClientError::from_gateway(err, message),
                        None => err.into(),
                    }),
                }
            }
        };

        self.settle(store, &ticket, outcome, apply)
    }

    fn settle<R, T, A>(
        &self,
        store: &ResourceStore<R>,
        ticket: &Ticket,
        outcome: Result<T, ClientError>,
        apply: A,
    ) -> Result<T, ClientError>
    where
        R: Resource,
        A: FnOnce(&ResourceStore<R>, &T) -> Result<(), StoreError>,
    {
        let standing = self.sequencer.standing(ticket);
        let key = ticket.key();

        match &outcome {
            Ok(value) => {
                if standing.owns_scope {
                    if let Err(err) = apply(store, value) {
                        warn!(key = %key, error = %err, "store mutation was a no-op");
                    }
                } else {
                    debug!(key = %key, seq = ticket.seq(), "discarding stale response");
                }
                if standing.owns_key {
                    store.set_status(key, RequestStatus::Succeeded);
                    store.clear_error(key);
                }
            }
            Err(err) => {
                warn!(key = %key, seq = ticket.seq(), error = %err, "operation failed");
                if standing.owns_key {
                    store.set_status(key, RequestStatus::Failed);
                    store.set_error(key, err.message());
                }
            }
        }

        outcome
    }

    /// Send a request that needs no token and touches no store (login, signup).
    pub async fn send_public(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> Result<Value, ClientError> {
        debug!(request = %request, "issuing public request");
        self.gateway
            .send(request)
            .await
            .map_err(|err| ClientError::from_gateway(err, fallback))
    }

    /// Invalidate every in-flight request; their responses will be discarded.
    pub fn reset(&self) {
        self.sequencer.reset();
    }
}
