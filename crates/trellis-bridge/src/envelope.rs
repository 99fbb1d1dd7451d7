//! Wire envelopes. This module is the only place that knows what crossing
//! messages look like; both the host and the injected guest script speak
//! exactly this shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use trellis_interop::TypeTag;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("envelope decode error: {0}")]
    Decode(String),

    #[error("envelope encode error: {0}")]
    Encode(String),
}

/// A message crossing the boundary, tagged by direction and kind:
///
/// - `{"type":"request","name":tag,"payload":json}` -- guest → host
/// - `{"type":"response","result":reply}` -- host → guest, answers the one
///   in-flight request
/// - `{"type":"event","name":tag,"payload":json}` -- host → guest,
///   re-wrapped guest-side as `{"name":tag,"payload":json}` for local
///   subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    Request { name: String, payload: Value },
    Response { result: Value },
    Event { name: String, payload: Value },
}

impl Envelope {
    pub fn request(tag: TypeTag, payload: Value) -> Self {
        Self::Request {
            name: tag.as_str().to_string(),
            payload,
        }
    }

    pub fn response(result: Value) -> Self {
        Self::Response { result }
    }

    pub fn event(tag: TypeTag, payload: Value) -> Self {
        Self::Event {
            name: tag.as_str().to_string(),
            payload,
        }
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        serde_json::to_string(self).map_err(|e| CodecError::Encode(e.to_string()))
    }

    /// Decode one wire message. Malformed text is an error, never a panic.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        serde_json::from_str(raw).map_err(|e| CodecError::Decode(e.to_string()))
    }
}
