//! Inbound slash-command payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SSL_CHECK_FIELD: &str = "ssl_check";

/// The form payload the chat platform posts for one slash-command call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashRequest {
    /// Deprecated verification token.
    pub token: String,
    /// Workspace identifier.
    pub team_id: String,
    /// Workspace domain.
    pub team_domain: String,
    /// Enterprise grid identifier.
    #[serde(default)]
    pub enterprise_id: Option<String>,
    /// Enterprise grid name.
    #[serde(default)]
    pub enterprise_name: Option<String>,
    /// Channel the command was typed in.
    pub channel_id: String,
    /// Channel name.
    pub channel_name: String,
    /// Requesting user identifier.
    pub user_id: String,
    /// Requesting user name.
    pub user_name: String,
    /// Trigger word, e.g. `/weather`.
    pub command: String,
    /// Text typed after the trigger word.
    pub text: String,
    /// Callback URL for the deferred reply.
    pub response_url: String,
    /// Trigger identifier for opening modals.
    pub trigger_id: String,
    /// Application identifier.
    pub api_app_id: String,
}

/// A decoded inbound form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundForm {
    /// Platform certificate probe; answered with an empty 200.
    SslCheck,
    /// A slash-command invocation.
    Command(SlashRequest),
}

/// The form body could not be decoded into a [`SlashRequest`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed slash-command payload: {0}")]
pub struct MalformedPayload(pub String);

impl InboundForm {
    /// Decodes a URL-encoded form body.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedPayload`] when the body is not valid form data or a
    /// required field is missing.
    pub fn decode(body: &[u8]) -> Result<Self, MalformedPayload> {
        let fields: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|error| MalformedPayload(error.to_string()))?;
        if fields.iter().any(|(key, _)| key == SSL_CHECK_FIELD) {
            return Ok(Self::SslCheck);
        }

        serde_urlencoded::from_bytes(body)
            .map(Self::Command)
            .map_err(|error| MalformedPayload(error.to_string()))
    }
}
