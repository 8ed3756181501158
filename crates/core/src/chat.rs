//! Support chat wire types.
//!
//! The storefront relays each visitor message to an external webhook and
//! shows the webhook's `output` as the bot reply.

use serde::{Deserialize, Serialize};

use crate::types::ChatSessionId;

/// Reply shown when the webhook cannot be reached or answers garbage.
pub const FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// Longest message accepted from a visitor, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Body posted to the chat webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub message: String,
    pub session_id: ChatSessionId,
}

/// Body expected back from the chat webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub output: String,
}

/// Validate and tidy a visitor message.
///
/// Returns `None` for blank input. Overlong messages are cut at
/// [`MAX_MESSAGE_CHARS`].
#[must_use]
pub fn prepare_message(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_MESSAGE_CHARS).collect())
}
