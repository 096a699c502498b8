//! Message validation rules.

use wchat_core::error::AppError;

use super::types::InboundMessage;

/// Maximum length of a user or room identifier.
const MAX_ID_LEN: usize = 128;

/// Validates the raw frame before parsing.
pub fn validate_frame(raw: &str, max_size: usize) -> Result<(), AppError> {
    if raw.len() > max_size {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {max_size} bytes"
        )));
    }

    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    Ok(())
}

/// Validates a user or room identifier. Ids are opaque, so only the
/// length is checked.
pub fn validate_id(field: &str, id: &str) -> Result<(), AppError> {
    if id.is_empty() || id.len() > MAX_ID_LEN {
        return Err(AppError::validation(format!("Invalid {field} length")));
    }
    Ok(())
}

/// Validates the identifiers carried by a parsed inbound message.
pub fn validate_inbound(msg: &InboundMessage) -> Result<(), AppError> {
    match msg {
        InboundMessage::Identify { user_id } => validate_id("user_id", user_id.as_str()),
        InboundMessage::JoinRoom { room_id }
        | InboundMessage::LeaveRoom { room_id }
        | InboundMessage::Typing { room_id }
        | InboundMessage::StopTyping { room_id } => validate_id("room_id", room_id.as_str()),
        InboundMessage::SendMsg { chat_id, .. } => validate_id("chat_id", chat_id.as_str()),
    }
}
