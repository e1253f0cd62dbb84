//! JSON payloads of the send-SMS endpoint.
//!
//! # Design
//! Field order in `SendSms` is the serialization order, so the compact JSON
//! body is always `{"sender":..,"recipient":..,"message":..}` and nothing
//! else. The mock server deserializes the same type.

use serde::{Deserialize, Serialize};

/// Body of a `POST /send_sms` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendSms {
    pub sender: String,
    pub recipient: String,
    pub message: String,
}

impl SendSms {
    pub fn new(sender: &str, recipient: &str, message: &str) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            message: message.to_string(),
        }
    }
}
