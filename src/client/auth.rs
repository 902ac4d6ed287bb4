use tracing::info;

use super::{require, TaskHub};
use crate::api::auth as routes;
use crate::error::ClientError;
use crate::gateway::Gateway;
use crate::session::Session;

/// Signup and login. Neither needs a token; both install the returned session.
pub struct AuthOps<'a, G> {
    hub: &'a TaskHub<G>,
}

impl<'a, G: Gateway> AuthOps<'a, G> {
    pub(super) fn new(hub: &'a TaskHub<G>) -> Self {
        Self { hub }
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        for value in [name, email, password] {
            require(value, "Please fill all fields")?;
        }
        let body = self
            .hub
            .coordinator
            .send_public(routes::signup(name.trim(), email.trim(), password), "Signup failed")
            .await?;
        self.install(body)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        require(email, "Please fill all fields")?;
        require(password, "Please fill all fields")?;
        let body = self
            .hub
            .coordinator
            .send_public(routes::login(email.trim(), password), "Login failed")
            .await?;
        self.install(body)
    }

    fn install(&self, body: serde_json::Value) -> Result<Session, ClientError> {
        let session = routes::decode_session(body)?;
        info!(user = %session.user.id, "session established");
        self.hub.coordinator.session().set(session.clone());
        Ok(session)
    }
}
