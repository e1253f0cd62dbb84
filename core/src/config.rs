//! Client configuration loaded from a TOML file.

use std::path::Path;

use serde::Deserialize;

use crate::auth::Credentials;
use crate::error::SmsError;
use crate::http::{DEFAULT_CONTENT_TYPE, DEFAULT_PROTOCOL_VERSION};

/// Immutable client settings.
///
/// Built once at startup and passed by reference to `SmsClient::new`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Basic-auth credentials sent with every request, if present.
    #[serde(default)]
    pub authorization: Option<Credentials>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where to dial and what to put in the `Host` header.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Value of the `Host` header.
    pub hostname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Protocol version written after `HTTP/`, e.g. "1.1".
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json".
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_version() -> String {
    DEFAULT_PROTOCOL_VERSION.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            content_type: default_content_type(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SmsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SmsError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            SmsError::Config { message } => SmsError::Config {
                message: format!("'{}': {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SmsError> {
        let config: Config = toml::from_str(content).map_err(|e| SmsError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// `address:port` to dial.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.server.address, self.server.port)
    }

    fn validate(&self) -> Result<(), SmsError> {
        let required = [
            ("server.address", &self.server.address),
            ("server.hostname", &self.server.hostname),
            ("http.version", &self.http.version),
            ("http.content_type", &self.http.content_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SmsError::Config {
                    message: format!("'{field}' must not be empty"),
                });
            }
        }

        if self.server.port == 0 {
            return Err(SmsError::Config {
                message: "'server.port' must not be 0".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SmsError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(SmsError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        address = "localhost"
        port = 4010
        hostname = "localhost"
    "#;

    #[test]
    fn test_default_values() {
        let config = Config::from_toml(MINIMAL).unwrap();
        assert_eq!(config.http.version, "1.1");
        assert_eq!(config.http.content_type, "application/json");
        assert!(config.authorization.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.socket_address(), "localhost:4010");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            [server]
            address = "10.0.0.5"
            port = 8080
            hostname = "sms.example.com"

            [http]
            version = "1.0"

            [authorization]
            username = "user"
            password = "XXXX"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.http.version, "1.0");
        assert_eq!(config.authorization, Some(Credentials::new("user", "XXXX")));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_server_section() {
        let err = Config::from_toml("[http]\nversion = \"1.1\"\n").unwrap_err();
        assert!(matches!(err, SmsError::Config { .. }));
    }

    #[test]
    fn test_rejects_zero_port() {
        let text = MINIMAL.replace("4010", "0");
        let err = Config::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_rejects_empty_hostname() {
        let text = MINIMAL.replace("hostname = \"localhost\"", "hostname = \"\"");
        let err = Config::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("server.hostname"));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let text = format!("{MINIMAL}\n[logging]\nformat = \"xml\"\n");
        let err = Config::from_toml(&text).unwrap_err();
        assert!(err.to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/sms-config.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_reports_path_once() {
        let path = std::env::temp_dir().join(format!("sms-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\naddress = ").unwrap();

        let err = Config::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        let text = err.to_string();
        assert_eq!(text.matches("configuration error").count(), 1, "{text}");
        assert!(text.contains("Failed to parse config"), "{text}");
        assert!(text.contains("sms-config-"), "{text}");
    }
}
