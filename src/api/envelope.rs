//! Decoding of `{ "<field>": ... }` response envelopes.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// Decode the required field `name`; a missing field is a malformed response.
pub fn field<T: DeserializeOwned>(body: Value, name: &str) -> Result<T, ClientError> {
    field_or(body, name, &format!("response is missing `{}`", name))
}

/// Like [`field`], but a missing field yields the server's message or `missing`.
pub fn field_or<T: DeserializeOwned>(
    mut body: Value,
    name: &str,
    missing: &str,
) -> Result<T, ClientError> {
    match body.get_mut(name).map(Value::take) {
        Some(Value::Null) | None => Err(ClientError::Transport(
            crate::gateway::remote_message(&body).unwrap_or_else(|| missing.to_string()),
        )),
        Some(value) => serde_json::from_value(value).map_err(|e| {
            ClientError::Transport(format!("malformed `{}` in response: {}", name, e))
        }),
    }
}

/// Decode `name` if present and non-null.
pub fn optional_field<T: DeserializeOwned>(
    body: &Value,
    name: &str,
) -> Result<Option<T>, ClientError> {
    match body.get(name) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ClientError::Transport(format!("malformed `{}` in response: {}", name, e))),
    }
}
