// Lets `#[derive(Resource)]` expand to `taskhub_sync::Resource` inside this crate too.
extern crate self as taskhub_sync;

pub mod api;
mod client;
pub mod config;
mod coordinator;
mod error;
mod gateway;
pub mod model;
mod resource;
pub mod selectors;
mod session;
mod store;

pub use client::{AuthOps, TaskHub, TaskOps, TeamOps};
pub use config::{ClientConfig, ConfigError};
pub use coordinator::{Operation, RequestCoordinator, Sequencer, Standing, Ticket};
pub use error::ClientError;
pub use gateway::{remote_message, ApiRequest, Gateway, GatewayError, Method};
pub use model::{Member, MemberRef, NewTask, Task, TaskPatch, TaskPriority, TaskStatus, Team, User};
pub use resource::Resource;
pub use session::{Session, SessionHandle};
pub use store::{OperationKey, OperationKind, RequestStatus, ResourceStore, StoreError, WriteScope};

#[cfg(feature = "emitter")]
pub use store::events;

#[cfg(feature = "http")]
pub use gateway::HttpGateway;

// Re-export the derive macro
pub use taskhub_sync_macros::Resource;

// Re-export async_trait so custom gateways don't need the dependency themselves
pub use async_trait::async_trait;
