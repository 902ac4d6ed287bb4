use serde_json::{json, Value};

use super::envelope;
use crate::error::ClientError;
use crate::gateway::ApiRequest;
use crate::session::Session;

pub const SIGNUP_PATH: &str = "/auth/signup";
pub const LOGIN_PATH: &str = "/auth/login";

pub fn signup(name: &str, email: &str, password: &str) -> ApiRequest {
    ApiRequest::post(SIGNUP_PATH).json(json!({
        "name": name,
        "email": email,
        "password": password,
    }))
}

pub fn login(email: &str, password: &str) -> ApiRequest {
    ApiRequest::post(LOGIN_PATH).json(json!({ "email": email, "password": password }))
}

/// Decode `{ user, token }`.
pub fn decode_session(body: Value) -> Result<Session, ClientError> {
    let user = envelope::field(body.clone(), "user")?;
    let token: String = envelope::field(body, "token")?;
    Ok(Session::new(token, user))
}
