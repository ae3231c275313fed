use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProtocolError, ProtocolResult};
use crate::ports::names;

/// A single port message as it crosses the boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub port: String,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn new(port: impl Into<String>, payload: Value) -> Self {
        Self { port: port.into(), payload }
    }
}

/// A request arriving on one of the inbound ports.
#[derive(Clone, Debug, PartialEq)]
pub enum PortRequest {
    GetItem { key: String },
    SetItem { key: String, value: Value },
    RemoveItem { key: String },
    Clear,
    PushToSet { key: String, value: Value },
    RemoveFromSet { key: String, value: Value },
}

/// A response leaving on an outbound port.
#[derive(Clone, Debug, PartialEq)]
pub enum PortResponse {
    /// `value` is `Value::Null` when the key is absent or undecodable.
    GetItem { key: String, value: Value },
}

impl PortRequest {
    /// Decode the payload received on `port`.
    pub fn from_port(port: &str, payload: Value) -> ProtocolResult<Self> {
        match port {
            names::GET_ITEM => Ok(Self::GetItem { key: key_payload(port, payload)? }),
            names::SET_ITEM => {
                let (key, value) = pair_payload(port, payload)?;
                Ok(Self::SetItem { key, value })
            }
            names::REMOVE_ITEM => Ok(Self::RemoveItem { key: key_payload(port, payload)? }),
            // The clear port carries a unit payload; whatever arrives is ignored.
            names::CLEAR => Ok(Self::Clear),
            names::PUSH_TO_SET => {
                let (key, value) = pair_payload(port, payload)?;
                Ok(Self::PushToSet { key, value })
            }
            names::REMOVE_FROM_SET => {
                let (key, value) = pair_payload(port, payload)?;
                Ok(Self::RemoveFromSet { key, value })
            }
            other => Err(ProtocolError::UnknownPort(other.to_string())),
        }
    }

    pub fn from_envelope(envelope: Envelope) -> ProtocolResult<Self> {
        Self::from_port(&envelope.port, envelope.payload)
    }

    pub fn port_name(&self) -> &'static str {
        match self {
            Self::GetItem { .. } => names::GET_ITEM,
            Self::SetItem { .. } => names::SET_ITEM,
            Self::RemoveItem { .. } => names::REMOVE_ITEM,
            Self::Clear => names::CLEAR,
            Self::PushToSet { .. } => names::PUSH_TO_SET,
            Self::RemoveFromSet { .. } => names::REMOVE_FROM_SET,
        }
    }

    /// The payload in the shape the port expects on the wire.
    pub fn payload(&self) -> Value {
        match self {
            Self::GetItem { key } | Self::RemoveItem { key } => Value::String(key.clone()),
            Self::Clear => Value::Null,
            Self::SetItem { key, value }
            | Self::PushToSet { key, value }
            | Self::RemoveFromSet { key, value } => {
                Value::Array(vec![Value::String(key.clone()), value.clone()])
            }
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.port_name(), self.payload())
    }
}

impl PortResponse {
    pub fn port_name(&self) -> &'static str {
        match self {
            Self::GetItem { .. } => names::GET_ITEM_RESPONSE,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::GetItem { key, value } => {
                Value::Array(vec![Value::String(key.clone()), value.clone()])
            }
        }
    }

    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.port_name(), self.payload())
    }

    pub fn from_envelope(envelope: Envelope) -> ProtocolResult<Self> {
        match envelope.port.as_str() {
            names::GET_ITEM_RESPONSE => {
                let (key, value) = pair_payload(&envelope.port, envelope.payload)?;
                Ok(Self::GetItem { key, value })
            }
            other => Err(ProtocolError::UnknownPort(other.to_string())),
        }
    }
}

fn key_payload(port: &str, payload: Value) -> ProtocolResult<String> {
    match payload {
        Value::String(key) => Ok(key),
        other => Err(ProtocolError::InvalidPayload {
            port: port.to_string(),
            reason: format!("expected a string key, got {other}"),
        }),
    }
}

fn pair_payload(port: &str, payload: Value) -> ProtocolResult<(String, Value)> {
    serde_json::from_value::<(String, Value)>(payload).map_err(|e| ProtocolError::InvalidPayload {
        port: port.to_string(),
        reason: format!("expected [key, value]: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_get_item() {
        let req = PortRequest::from_port("storageGetItem", json!("someKey")).unwrap();
        assert_eq!(req, PortRequest::GetItem { key: "someKey".into() });
    }

    #[test]
    fn decode_pair_ports() {
        let req = PortRequest::from_port("storagePushToSet", json!(["aSet", {"num": 3}])).unwrap();
        assert_eq!(
            req,
            PortRequest::PushToSet { key: "aSet".into(), value: json!({"num": 3}) }
        );

        let req = PortRequest::from_port("storageSetItem", json!(["k", null])).unwrap();
        assert_eq!(req, PortRequest::SetItem { key: "k".into(), value: Value::Null });
    }

    #[test]
    fn decode_clear_ignores_payload() {
        assert_eq!(PortRequest::from_port("storageClear", Value::Null).unwrap(), PortRequest::Clear);
        assert_eq!(PortRequest::from_port("storageClear", json!([])).unwrap(), PortRequest::Clear);
    }

    #[test]
    fn unknown_port_rejected() {
        let err = PortRequest::from_port("storageFrobnicate", Value::Null).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownPort(p) if p == "storageFrobnicate"));
    }

    #[test]
    fn response_port_is_not_a_request() {
        let err = PortRequest::from_port("storageGetItemResponse", json!(["k", 1])).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownPort(_)));
    }

    #[test]
    fn key_must_be_string() {
        let err = PortRequest::from_port("storageRemoveItem", json!(42)).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidPayload { port, .. } if port == "storageRemoveItem"));
    }

    #[test]
    fn pair_must_have_two_elements() {
        for bad in [json!("k"), json!(["k"]), json!(["k", 1, 2]), json!([1, 2])] {
            let err = PortRequest::from_port("storageSetItem", bad).unwrap_err();
            assert!(matches!(err, ProtocolError::InvalidPayload { .. }));
        }
    }

    #[test]
    fn request_envelope_shape() {
        let req = PortRequest::RemoveFromSet { key: "aSet".into(), value: json!(true) };
        let env = req.to_envelope();
        assert_eq!(env.port, "storageRemoveFromSet");
        assert_eq!(env.payload, json!(["aSet", true]));
        assert_eq!(PortRequest::from_envelope(env).unwrap(), req);
    }

    #[test]
    fn response_envelope_shape() {
        let resp = PortResponse::GetItem { key: "someKey".into(), value: json!("myValue") };
        let env = resp.to_envelope();
        assert_eq!(env.port, "storageGetItemResponse");
        assert_eq!(env.payload, json!(["someKey", "myValue"]));
        assert_eq!(PortResponse::from_envelope(env).unwrap(), resp);
    }

    #[test]
    fn envelope_payload_defaults_to_null() {
        let env: Envelope = serde_json::from_str(r#"{"port":"storageClear"}"#).unwrap();
        assert_eq!(env.payload, Value::Null);
    }
}
