use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use sms_core::error::{ProtocolError, SmsError};
use sms_core::wire::{self, DEFAULT_MAX_BODY_SIZE};
use sms_core::{Credentials, HttpMethod, Request, Response, SendSms, SEND_SMS_PATH};
use tokio::{
    io::{AsyncRead, AsyncWrite, BufReader},
    net::TcpListener,
    sync::RwLock,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A message the server accepted.
#[derive(Clone, Debug, Serialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub sms: SendSms,
}

pub type Outbox = Arc<RwLock<Vec<StoredMessage>>>;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// When set, every request must carry exactly these credentials.
    pub credentials: Option<Credentials>,
    pub outbox: Outbox,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    loop {
        let (stream, peer) = listener.accept().await?;
        debug!(%peer, "Accepted connection");
        let state = state.clone();
        tokio::spawn(async move {
            match serve_connection(stream, state).await {
                Ok(()) => debug!(%peer, "Client disconnected"),
                Err(e) => warn!(%peer, error = %e, "Connection ended with error"),
            }
        });
    }
}

/// Serve requests on one connection until the peer closes it.
///
/// A request that cannot be framed or decoded gets a `400` and the
/// connection is closed, since the stream position is no longer trustworthy.
pub async fn serve_connection<S>(stream: S, state: AppState) -> Result<(), SmsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = BufReader::new(stream);
    loop {
        let decoded = match wire::read_frame(&mut stream, DEFAULT_MAX_BODY_SIZE).await {
            Ok(frame) => Request::decode(&frame),
            Err(SmsError::Protocol(ProtocolError::ConnectionClosed)) => return Ok(()),
            Err(SmsError::Protocol(e)) => Err(e),
            Err(e) => return Err(e),
        };

        match decoded {
            Ok(request) => {
                let response = handle(&state, &request).await;
                wire::write_frame(&mut stream, &response.encode()).await?;
            }
            Err(e) => {
                warn!(error = %e, "Rejecting undecodable request");
                let response = json_response(400, "Bad Request", json!({ "error": e.to_string() }));
                wire::write_frame(&mut stream, &response.encode()).await?;
                return Ok(());
            }
        }
    }
}

pub async fn handle(state: &AppState, request: &Request) -> Response {
    if request.path != SEND_SMS_PATH {
        return json_response(404, "Not Found", json!({ "error": "Not found" }));
    }
    if request.method != HttpMethod::Post {
        return json_response(405, "Method Not Allowed", json!({ "error": "Method not allowed" }));
    }
    if let Some(expected) = &state.credentials {
        if request.credentials.as_ref() != Some(expected) {
            return json_response(401, "Unauthorized", json!({ "error": "Unauthorized" }));
        }
    }

    let sms = match serde_json::from_str::<SendSms>(&request.body) {
        Ok(sms) if is_phone_number(&sms.sender) && is_phone_number(&sms.recipient) => sms,
        _ => return json_response(400, "Bad Request", json!({ "error": "Invalid parameters" })),
    };

    let id = Uuid::new_v4();
    info!(%id, recipient = %sms.recipient, "Message accepted");
    state.outbox.write().await.push(StoredMessage { id, sms });

    json_response(
        200,
        "OK",
        json!({ "status": "success", "message_id": id.to_string() }),
    )
}

/// An optional leading `+` followed by one or more ASCII digits.
fn is_phone_number(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn json_response(status: u16, reason: &str, body: Value) -> Response {
    Response::new(status, reason, &body.to_string()).with_content_type("application/json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert!(is_phone_number("+79123456789"));
        assert!(is_phone_number("79123456789"));
        assert!(!is_phone_number("+"));
        assert!(!is_phone_number(""));
        assert!(!is_phone_number("invalid"));
        assert!(!is_phone_number("+7 912"));
    }

    #[test]
    fn json_response_sets_content_type() {
        let response = json_response(200, "OK", json!({ "a": 1 }));
        assert_eq!(response.content_type.as_deref(), Some("application/json"));
        assert_eq!(response.body, r#"{"a":1}"#);
    }
}
