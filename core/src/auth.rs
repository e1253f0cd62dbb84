//! Basic-authentication credentials.
//!
//! The token is standard base64 (padded, no line wrapping) of
//! `username:password`. Decoding splits once on the first `:`, so passwords
//! may contain colons but usernames may not.

use std::fmt;

use base64ct::{Base64, Encoding};
use serde::Deserialize;

use crate::error::ProtocolError;

/// A username/password pair carried in the `Authorization` header.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Base64 token for an `Authorization: Basic <token>` header.
    pub fn basic_token(&self) -> String {
        Base64::encode_string(format!("{}:{}", self.username, self.password).as_bytes())
    }

    /// Parse the token part of an `Authorization: Basic <token>` header.
    pub fn from_basic_token(token: &str) -> Result<Self, ProtocolError> {
        let decoded = Base64::decode_vec(token).map_err(|e| ProtocolError::InvalidAuthorization {
            reason: format!("invalid base64: {e}"),
        })?;
        let decoded = String::from_utf8(decoded).map_err(|_| ProtocolError::InvalidAuthorization {
            reason: "credentials are not valid UTF-8".to_string(),
        })?;
        let (username, password) =
            decoded
                .split_once(':')
                .ok_or_else(|| ProtocolError::InvalidAuthorization {
                    reason: "missing ':' between username and password".to_string(),
                })?;
        Ok(Self::new(username, password))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
