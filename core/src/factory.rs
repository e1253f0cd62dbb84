//! Per-service request stamping.
//!
//! # Design
//! `ServiceProfile` holds what every request to one service shares: the
//! `Host` value, protocol version, default content type and credentials.
//! `RequestFactory::build` copies those fields into a fresh `Request`, so a
//! request can never pick up a different host or credential pair than the
//! profile it came from. Credentials are always forwarded as the full
//! username/password pair.

use crate::auth::Credentials;
use crate::config::Config;
use crate::http::{HttpMethod, Request, DEFAULT_CONTENT_TYPE, DEFAULT_PROTOCOL_VERSION};

/// Fixed settings for one destination service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceProfile {
    pub host: String,
    pub protocol_version: String,
    pub default_content_type: String,
    pub credentials: Option<Credentials>,
}

impl ServiceProfile {
    /// Profile with protocol version 1.1, a JSON content type and no
    /// credentials.
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server.hostname.clone(),
            protocol_version: config.http.version.clone(),
            default_content_type: config.http.content_type.clone(),
            credentials: config.authorization.clone(),
        }
    }
}

/// Builds `Request` values for a single service.
#[derive(Debug, Clone)]
pub struct RequestFactory {
    profile: ServiceProfile,
}

impl RequestFactory {
    pub fn new(profile: ServiceProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &ServiceProfile {
        &self.profile
    }

    /// Stamp out a request. `content_type` overrides the profile default for
    /// this request only.
    pub fn build(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &str,
        content_type: Option<&str>,
    ) -> Request {
        Request {
            host: Some(self.profile.host.clone()),
            method,
            path: path.to_string(),
            protocol_version: self.profile.protocol_version.clone(),
            body: payload.to_string(),
            content_type: content_type
                .unwrap_or(self.profile.default_content_type.as_str())
                .to_string(),
            credentials: self.profile.credentials.clone(),
        }
    }
}
