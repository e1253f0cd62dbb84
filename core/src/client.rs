//! Connection-owning client for the send-SMS service.
//!
//! # Design
//! `SmsClient` owns at most one stream. `Disconnected` and `Connected` are
//! represented by whether that stream is present, so there is no separate
//! flag that could drift from reality.
//!
//! - `connect` on a client that is already connected is a no-op. It never
//!   reopens the stream.
//! - `send_sms` and `exchange` fail with `SmsError::NotConnected` when no
//!   stream is present. They never connect implicitly.
//! - One exchange at a time: `exchange` takes `&mut self`, writes the whole
//!   request, then reads exactly one length-delimited response before
//!   returning. Callers that need concurrency serialize access or open one
//!   client per exchange.
//! - A failure while writing the request or framing the response drops the
//!   stream and leaves the client `Disconnected`. The stream may then sit
//!   mid-message, and a later exchange would read stale bytes as its reply.
//!   A complete frame that fails to decode keeps the connection.
//! - There are no timeouts and no retries. A hung peer hangs the caller.
//!
//! The client is generic over the stream so tests can attach an in-memory
//! duplex pipe in place of a socket.

use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SmsError;
use crate::factory::{RequestFactory, ServiceProfile};
use crate::http::{HttpMethod, Request, Response};
use crate::types::SendSms;
use crate::wire::{self, DEFAULT_MAX_BODY_SIZE};

/// Path of the send-SMS endpoint.
pub const SEND_SMS_PATH: &str = "/send_sms";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Client for one send-SMS service over one persistent connection.
pub struct SmsClient<S = TcpStream> {
    address: String,
    factory: RequestFactory,
    max_body_size: usize,
    stream: Option<BufReader<S>>,
}

impl<S> SmsClient<S> {
    /// Create a disconnected client.
    pub fn new(config: &Config) -> Self {
        Self {
            address: config.socket_address(),
            factory: RequestFactory::new(ServiceProfile::from_config(config)),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            stream: None,
        }
    }

    /// Largest response body the client will accept.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn state(&self) -> ConnectionState {
        if self.stream.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn factory(&self) -> &RequestFactory {
        &self.factory
    }
}

impl SmsClient<TcpStream> {
    /// Open the TCP connection. Does nothing if already connected.
    pub async fn connect(&mut self) -> Result<(), SmsError> {
        if self.stream.is_some() {
            debug!(address = %self.address, "Already connected");
            return Ok(());
        }

        info!(address = %self.address, "Opening connection");
        let stream = TcpStream::connect(&self.address).await?;
        info!(address = %self.address, "Connection established");
        self.stream = Some(BufReader::new(stream));
        Ok(())
    }
}

impl<S> SmsClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Use an already-open stream as the connection.
    ///
    /// Replaces the current stream, if any, without shutting it down.
    pub fn attach(&mut self, stream: S) {
        self.stream = Some(BufReader::new(stream));
    }

    /// Send one SMS and wait for the service's answer.
    ///
    /// Returns the decoded response together with its body parsed as JSON,
    /// or `None` when the body is not valid JSON.
    pub async fn send_sms(
        &mut self,
        sender: &str,
        recipient: &str,
        message: &str,
    ) -> Result<(Response, Option<Value>), SmsError> {
        if self.stream.is_none() {
            return Err(SmsError::NotConnected);
        }

        let payload = serde_json::to_string(&SendSms::new(sender, recipient, message))?;
        let request = self
            .factory
            .build(HttpMethod::Post, SEND_SMS_PATH, &payload, None);
        info!("Request formed");

        let response = self.exchange(&request).await?;
        let body = match serde_json::from_str(&response.body) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "Response body is not JSON");
                None
            }
        };
        Ok((response, body))
    }

    /// Write `request` and read back exactly one response.
    pub async fn exchange(&mut self, request: &Request) -> Result<Response, SmsError> {
        let stream = self.stream.as_mut().ok_or(SmsError::NotConnected)?;

        let bytes = request.encode();
        if let Err(e) = wire::write_frame(stream, &bytes).await {
            return Err(self.abandon(e));
        }
        info!(method = %request.method, path = %request.path, "Request sent");
        debug!(bytes = bytes.len(), "Request bytes written");

        let frame = match wire::read_frame(stream, self.max_body_size).await {
            Ok(frame) => frame,
            Err(e) => return Err(self.abandon(e)),
        };
        debug!(bytes = frame.len(), "Response bytes read");
        let response = Response::decode(&frame)?;
        info!(status = response.status_code, "Response received");
        Ok(response)
    }

    /// Drop a stream whose position inside the message flow is unknown.
    fn abandon(&mut self, error: SmsError) -> SmsError {
        warn!(address = %self.address, error = %error, "Dropping connection after failed exchange");
        self.stream = None;
        error
    }

    /// Shut down the write side and drop the connection.
    ///
    /// The client is `Disconnected` afterwards even if the shutdown itself
    /// fails. Does nothing when already disconnected.
    pub async fn disconnect(&mut self) -> Result<(), SmsError> {
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };

        info!(address = %self.address, "Closing connection");
        stream.shutdown().await?;
        info!(address = %self.address, "Connection closed");
        Ok(())
    }
}
