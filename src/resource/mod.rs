//! Resources - server-owned records mirrored by the client.
//!
//! A resource is anything the API hands back with a stable identifier:
//! teams and tasks in this crate. The client never invents identifiers;
//! they are assigned server-side on create and never change afterwards.
//!
//! ## Example
//!
//! ```ignore
//! use taskhub_sync::Resource;
//!
//! #[derive(Serialize, Deserialize, Clone, Resource)]
//! #[resource(kind = "label")]
//! struct Label {
//!     #[serde(rename = "_id")]
//!     #[resource(id)]
//!     pub id: String,
//!     pub text: String,
//! }
//! ```

use serde::{de::DeserializeOwned, Serialize};

/// Trait for records that can live in a [`ResourceStore`](crate::ResourceStore).
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The resource kind (e.g. "team", "task"). Used in operation keys and logs.
    const KIND: &'static str;

    /// Returns the server-assigned identifier.
    fn id(&self) -> &str;
}
