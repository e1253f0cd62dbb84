//! Request and response messages and their byte encodings.
//!
//! # Design
//! Both message types are plain owned data, and `encode`/`decode` are pure
//! functions over byte slices. Nothing here touches a socket: `wire` finds
//! message boundaries on the stream, and this module turns the framed bytes
//! into values and back.
//!
//! Only four headers mean anything: `Host`, `Authorization`, `Content-Type`
//! and `Content-Length`. Any other header is skipped on decode and never
//! emitted on encode. Lines are separated by `\r\n` and nothing else.
//!
//! `Content-Length` is never stored. It is derived from the UTF-8 byte length
//! of `body` whenever a message is encoded.

use std::fmt;

use crate::auth::Credentials;
use crate::error::ProtocolError;

pub const LINE_TERMINATOR: &str = "\r\n";
pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

const HOST_PREFIX: &str = "Host: ";
const AUTHORIZATION_PREFIX: &str = "Authorization: ";
const CONTENT_TYPE_PREFIX: &str = "Content-Type: ";

/// HTTP method of a request line.
///
/// Unknown tokens are kept verbatim in `Other` so decoding never fails on the
/// method alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Other(token) => token,
        }
    }
}

impl From<&str> for HttpMethod {
    fn from(token: &str) -> Self {
        match token {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request message.
///
/// `host` is `None` when a decoded message carried no `Host` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub host: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    pub protocol_version: String,
    pub body: String,
    pub content_type: String,
    pub credentials: Option<Credentials>,
}

impl Request {
    /// Request with protocol version 1.1, a JSON content type and no
    /// credentials.
    pub fn new(host: &str, method: HttpMethod, path: &str, body: &str) -> Self {
        Self {
            host: Some(host.to_string()),
            method,
            path: path.to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            body: body.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            credentials: None,
        }
    }

    /// Size of the body in bytes.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Serialize to the exact bytes sent on the wire.
    ///
    /// The `Host` line is left out when `host` is `None`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::with_capacity(128 + self.body.len());
        out.push_str(&format!(
            "{} {} HTTP/{}{LINE_TERMINATOR}",
            self.method, self.path, self.protocol_version
        ));
        if let Some(host) = &self.host {
            out.push_str(&format!("{HOST_PREFIX}{host}{LINE_TERMINATOR}"));
        }
        if let Some(credentials) = &self.credentials {
            out.push_str(&format!(
                "{AUTHORIZATION_PREFIX}Basic {}{LINE_TERMINATOR}",
                credentials.basic_token()
            ));
        }
        out.push_str(&format!("{CONTENT_TYPE_PREFIX}{}{LINE_TERMINATOR}", self.content_type));
        out.push_str(&format!("Content-Length: {}{LINE_TERMINATOR}", self.content_length()));
        out.push_str(LINE_TERMINATOR);
        out.push_str(&self.body);
        out.into_bytes()
    }

    /// Parse a request from raw bytes.
    ///
    /// Recognizes `Host` and `Authorization`; `content_type` is left at
    /// `DEFAULT_CONTENT_TYPE`. The body is everything after the blank line.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
        let (head, body) = split_message(text);
        let mut lines = head.split(LINE_TERMINATOR);
        let start_line = lines.next().unwrap_or_default();

        let tokens: Vec<&str> = start_line.split_whitespace().collect();
        let [method, path, version] = tokens.as_slice() else {
            return Err(malformed(start_line));
        };
        let protocol_version = parse_version(version).ok_or_else(|| malformed(start_line))?;

        let mut host = None;
        let mut credentials = None;
        for line in lines {
            if let Some(value) = line.strip_prefix(HOST_PREFIX) {
                host = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix(AUTHORIZATION_PREFIX) {
                credentials = Some(parse_authorization(value)?);
            }
        }

        Ok(Self {
            host,
            method: HttpMethod::from(*method),
            path: path.to_string(),
            protocol_version,
            body: body.to_string(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            credentials,
        })
    }
}

/// A response message.
///
/// The status code is held as `u16`, so a status token outside `0..=65535`
/// (for example `70000` or `-1`) fails to decode as `MalformedStatusLine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub protocol_version: String,
    pub status_code: u16,
    pub reason_phrase: String,
    pub body: String,
    pub content_type: Option<String>,
}

impl Response {
    /// Response with protocol version 1.1 and no content type.
    pub fn new(status_code: u16, reason_phrase: &str, body: &str) -> Self {
        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            status_code,
            reason_phrase: reason_phrase.to_string(),
            body: body.to_string(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Size of the body in bytes.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// `HTTP/<version> <code> <reason>` without a terminator.
    pub fn status_line(&self) -> String {
        format!(
            "HTTP/{} {} {}",
            self.protocol_version, self.status_code, self.reason_phrase
        )
    }

    /// Serialize to the exact bytes sent on the wire, including the trailing
    /// line terminator after the body.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::with_capacity(96 + self.body.len());
        out.push_str(&self.status_line());
        out.push_str(LINE_TERMINATOR);
        out.push_str(&format!("Content-Length: {}{LINE_TERMINATOR}", self.content_length()));
        if let Some(content_type) = &self.content_type {
            out.push_str(&format!("{CONTENT_TYPE_PREFIX}{content_type}{LINE_TERMINATOR}"));
        }
        out.push_str(LINE_TERMINATOR);
        out.push_str(&self.body);
        out.push_str(LINE_TERMINATOR);
        out.into_bytes()
    }

    /// Parse a response from raw bytes.
    ///
    /// When `Content-Length` is present the body is cut to exactly that many
    /// bytes, which drops the trailing terminator `encode` appends. Without
    /// it the remainder after the blank line is the body.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
        let (head, rest) = split_message(text);
        let mut lines = head.split(LINE_TERMINATOR);
        let start_line = lines.next().unwrap_or_default();

        let tokens: Vec<&str> = start_line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(malformed(start_line));
        }
        let protocol_version = parse_version(tokens[0]).ok_or_else(|| malformed(start_line))?;
        let status_code: u16 = tokens[1].parse().map_err(|_| malformed(start_line))?;
        let reason_phrase = tokens[2..].join(" ");

        let mut content_type = None;
        for line in lines.clone() {
            if let Some(value) = line.strip_prefix(CONTENT_TYPE_PREFIX) {
                content_type = Some(value.to_string());
            }
        }

        let body = match content_length(lines)? {
            Some(declared) if rest.len() < declared => {
                return Err(ProtocolError::TruncatedBody {
                    declared,
                    actual: rest.len(),
                });
            }
            // A length ending inside a multi-byte character leaves no valid
            // UTF-8 body to return.
            Some(declared) => rest.get(..declared).ok_or(ProtocolError::InvalidUtf8)?,
            None => rest,
        };

        Ok(Self {
            protocol_version,
            status_code,
            reason_phrase,
            body: body.to_string(),
            content_type,
        })
    }
}

/// Value of the `Content-Length` header among `header_lines`, matching the
/// header name case-insensitively.
pub fn content_length<'a>(
    header_lines: impl Iterator<Item = &'a str>,
) -> Result<Option<usize>, ProtocolError> {
    for line in header_lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            let value = value.trim();
            return value
                .parse()
                .map(Some)
                .map_err(|_| ProtocolError::InvalidContentLength {
                    value: value.to_string(),
                });
        }
    }
    Ok(None)
}

/// Split at the first blank line into the head (start line plus headers,
/// without the final terminator) and the body.
fn split_message(text: &str) -> (&str, &str) {
    const SEPARATOR: &str = "\r\n\r\n";
    match text.find(SEPARATOR) {
        Some(idx) => (&text[..idx], &text[idx + SEPARATOR.len()..]),
        None => (text, ""),
    }
}

/// `HTTP/1.1` -> `1.1`. `None` if the token has no `/`.
fn parse_version(token: &str) -> Option<String> {
    token.split_once('/').map(|(_, version)| version.to_string())
}

fn parse_authorization(value: &str) -> Result<Credentials, ProtocolError> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("Basic") => {
            Credentials::from_basic_token(token)
        }
        _ => Err(ProtocolError::InvalidAuthorization {
            reason: format!("expected 'Basic <token>', got {value:?}"),
        }),
    }
}

fn malformed(line: &str) -> ProtocolError {
    ProtocolError::MalformedStatusLine {
        line: line.to_string(),
    }
}
