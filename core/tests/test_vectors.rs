//! Verify the codec against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file lists messages with their exact wire bytes for encoding,
//! and raw inputs with the expected decoded fields or error for decoding.
//! Encoded bytes are compared exactly, since the wire format is
//! byte-for-byte.

use serde_json::Value;
use sms_core::{Credentials, HttpMethod, ProtocolError, Request, Response};

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value[key].as_str().unwrap_or_else(|| panic!("missing string field {key}"))
}

fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value[key].as_str().map(str::to_string)
}

fn credentials(value: &Value) -> Option<Credentials> {
    let creds = value.get("credentials").filter(|c| !c.is_null())?;
    Some(Credentials::new(str_field(creds, "username"), str_field(creds, "password")))
}

/// Name of the `ProtocolError` variant, as used in `expected_error`.
fn error_name(err: &ProtocolError) -> &'static str {
    match err {
        ProtocolError::MalformedStatusLine { .. } => "MalformedStatusLine",
        ProtocolError::InvalidAuthorization { .. } => "InvalidAuthorization",
        ProtocolError::InvalidUtf8 => "InvalidUtf8",
        ProtocolError::MissingContentLength => "MissingContentLength",
        ProtocolError::InvalidContentLength { .. } => "InvalidContentLength",
        ProtocolError::TruncatedBody { .. } => "TruncatedBody",
        ProtocolError::HeadTooLarge { .. } => "HeadTooLarge",
        ProtocolError::BodyTooLarge { .. } => "BodyTooLarge",
        ProtocolError::ConnectionClosed => "ConnectionClosed",
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[test]
fn request_encode_vectors() {
    let raw = include_str!("../../test-vectors/request.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["encode"].as_array().unwrap() {
        let name = str_field(case, "name");
        let input = &case["request"];
        let request = Request {
            host: opt_str_field(input, "host"),
            method: HttpMethod::from(str_field(input, "method")),
            path: str_field(input, "path").to_string(),
            protocol_version: str_field(input, "version").to_string(),
            body: str_field(input, "body").to_string(),
            content_type: str_field(input, "content_type").to_string(),
            credentials: credentials(input),
        };

        let encoded = String::from_utf8(request.encode()).unwrap();
        assert_eq!(encoded, str_field(case, "expected"), "{name}: encoded bytes");

        // Decoding the encoded bytes recovers every field except content
        // type, which the request decoder does not read.
        let decoded = Request::decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.host, request.host, "{name}: host");
        assert_eq!(decoded.method, request.method, "{name}: method");
        assert_eq!(decoded.path, request.path, "{name}: path");
        assert_eq!(decoded.protocol_version, request.protocol_version, "{name}: version");
        assert_eq!(decoded.body, request.body, "{name}: body");
        assert_eq!(decoded.credentials, request.credentials, "{name}: credentials");
    }
}

#[test]
fn request_decode_vectors() {
    let raw = include_str!("../../test-vectors/request.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["decode"].as_array().unwrap() {
        let name = str_field(case, "name");
        let result = Request::decode(str_field(case, "bytes").as_bytes());

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(error_name(&err), expected_error.as_str().unwrap(), "{name}: error");
            continue;
        }

        let request = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
        let expected = &case["expected"];
        assert_eq!(request.host, opt_str_field(expected, "host"), "{name}: host");
        assert_eq!(request.method.as_str(), str_field(expected, "method"), "{name}: method");
        assert_eq!(request.path, str_field(expected, "path"), "{name}: path");
        assert_eq!(request.protocol_version, str_field(expected, "version"), "{name}: version");
        assert_eq!(request.body, str_field(expected, "body"), "{name}: body");
        assert_eq!(request.credentials, credentials(expected), "{name}: credentials");
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[test]
fn response_encode_vectors() {
    let raw = include_str!("../../test-vectors/response.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["encode"].as_array().unwrap() {
        let name = str_field(case, "name");
        let input = &case["response"];
        let response = Response {
            protocol_version: str_field(input, "version").to_string(),
            status_code: input["status"].as_u64().unwrap() as u16,
            reason_phrase: str_field(input, "reason").to_string(),
            body: str_field(input, "body").to_string(),
            content_type: opt_str_field(input, "content_type"),
        };

        let encoded = String::from_utf8(response.encode()).unwrap();
        assert_eq!(encoded, str_field(case, "expected"), "{name}: encoded bytes");

        let decoded = Response::decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded, response, "{name}: decoded response");
    }
}

#[test]
fn response_decode_vectors() {
    let raw = include_str!("../../test-vectors/response.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["decode"].as_array().unwrap() {
        let name = str_field(case, "name");
        let result = Response::decode(str_field(case, "bytes").as_bytes());

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(error_name(&err), expected_error.as_str().unwrap(), "{name}: error");
            continue;
        }

        let response = result.unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));
        let expected = &case["expected"];
        assert_eq!(response.protocol_version, str_field(expected, "version"), "{name}: version");
        assert_eq!(u64::from(response.status_code), expected["status"].as_u64().unwrap(), "{name}: status");
        assert_eq!(response.reason_phrase, str_field(expected, "reason"), "{name}: reason");
        assert_eq!(response.body, str_field(expected, "body"), "{name}: body");
        assert_eq!(response.content_type, opt_str_field(expected, "content_type"), "{name}: content type");
    }
}
