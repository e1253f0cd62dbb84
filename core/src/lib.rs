//! Client core for a send-SMS service spoken over a hand-rolled HTTP/1.1
//! subset.
//!
//! # Overview
//! Requests and responses are encoded to and decoded from exact byte
//! sequences without any HTTP library. `SmsClient` drives one
//! request/response exchange at a time over a persistent TCP connection,
//! framing responses by their `Content-Length`.
//!
//! # Design
//! - `http` is pure: `encode`/`decode` over byte slices, no I/O.
//! - `RequestFactory` stamps requests from a fixed `ServiceProfile` (host,
//!   version, default content type, credentials).
//! - `wire` reads and writes whole frames on any tokio stream; the client
//!   and the mock server share it.
//! - `Config` is an immutable value loaded once from TOML and passed by
//!   reference into `SmsClient::new`.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod types;
pub mod wire;

pub use auth::Credentials;
pub use client::{ConnectionState, SmsClient, SEND_SMS_PATH};
pub use config::Config;
pub use error::{ProtocolError, SmsError};
pub use factory::{RequestFactory, ServiceProfile};
pub use http::{HttpMethod, Request, Response};
pub use types::SendSms;
