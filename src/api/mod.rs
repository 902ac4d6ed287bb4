//! Routes and response envelopes of the TaskHub API.
//!
//! Builders return [`ApiRequest`](crate::ApiRequest)s without a bearer token;
//! the coordinator attaches it at issue time.

pub mod auth;
pub mod envelope;
pub mod tasks;
pub mod teams;
