//! JSON serialization for WebSocket messages.

use wchat_core::error::AppError;

use super::types::{InboundMessage, OutboundMessage};
use super::validator;

/// Serialize an outbound message to a JSON text frame.
pub fn serialize_outbound(msg: &OutboundMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Validate and decode a JSON text frame from a client.
pub fn decode_inbound(text: &str, max_size: usize) -> Result<InboundMessage, AppError> {
    validator::validate_frame(text, max_size)?;
    let msg: InboundMessage = serde_json::from_str(text)?;
    validator::validate_inbound(&msg)?;
    Ok(msg)
}
