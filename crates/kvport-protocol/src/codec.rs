use crate::error::{ProtocolError, ProtocolResult};
use crate::message::Envelope;

/// Largest accepted encoded envelope, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Codec for newline-delimited JSON envelopes.
///
/// Each envelope is one compact JSON object followed by `\n`. Compact JSON
/// never contains a raw newline, so a line is always exactly one message.
pub struct EnvelopeCodec;

impl EnvelopeCodec {
    /// Encode an envelope as a single line, including the trailing `\n`.
    pub fn encode(envelope: &Envelope) -> ProtocolResult<String> {
        let mut line = serde_json::to_string(envelope)
            .map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        if line.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::FramingError(format!(
                "message too large: {} bytes (max {MAX_MESSAGE_SIZE})",
                line.len()
            )));
        }
        line.push('\n');
        Ok(line)
    }

    /// Decode one line. Surrounding whitespace, including the newline, is ignored.
    pub fn decode(line: &str) -> ProtocolResult<Envelope> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ProtocolError::FramingError("empty line".into()));
        }
        if line.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::FramingError(format!(
                "message too large: {} bytes (max {MAX_MESSAGE_SIZE})",
                line.len()
            )));
        }
        serde_json::from_str(line).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }
}
