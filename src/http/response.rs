//! HTTP response building module
//!
//! Every reply uses the same JSON envelope: a `status` discriminator plus
//! a human-readable message field. Successful command replies carry the
//! echoed text under `message_received` instead of `message`.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

/// Envelope discriminator
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Ok,
    Success,
    Error,
}

/// Fixed JSON reply envelope
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Reply {
    pub status: ReplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_received: Option<String>,
}

impl Reply {
    /// Health-check reply for `GET /`
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Ok,
            message: Some(message.into()),
            message_received: None,
        }
    }

    /// Acknowledgment for a received command message
    pub fn success(message_received: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Success,
            message: None,
            message_received: Some(message_received.into()),
        }
    }

    /// Error reply (400/404/405/500)
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            message: Some(message.into()),
            message_received: None,
        }
    }
}

/// Serialize a reply to its JSON body
pub fn encode(reply: &Reply) -> String {
    serde_json::to_string(reply).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to serialize reply: {e}"));
        r#"{"status":"error","message":"Internal Server Error."}"#.to_string()
    })
}

/// Build a JSON response from an already-serialized body
pub fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build response: {e}"));
            Response::new(Full::new(Bytes::from(
                r#"{"status":"error","message":"Internal Server Error."}"#,
            )))
        })
}
