use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire-level outcome of a request.
///
/// Invariants: `success == true` ⇔ `error` is `None`; a failed reply never
/// carries data. Replies are constructed only by the dispatcher and the
/// boundary adapter via [`Reply::ok`] / [`Reply::fail`], never assembled
/// field by field elsewhere.
///
/// Serialized with PascalCase keys, e.g.
/// `{"Success":true,"Error":null,"Data":"Echo: hi"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reply {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Reply {
    /// Successful reply carrying the handler's result.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    /// Successful reply with no data (e.g. a cancelled request that was
    /// short-circuited before its handler ran).
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    /// Failed reply with a human-readable error message.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }

    /// Encode for the wire. Guaranteed to produce well-formed JSON: if the
    /// reply itself fails to serialize, the fallback is a hand-assembled
    /// failure envelope carrying the serializer's message.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            let msg = Value::String(format!("failed to encode reply: {e}"));
            format!(r#"{{"Success":false,"Error":{msg},"Data":null}}"#)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_reply_has_no_error() {
        let reply = Reply::ok(json!("Echo: hi"));
        assert!(reply.success);
        assert!(reply.error.is_none());
        assert_eq!(reply.data, Some(json!("Echo: hi")));
    }

    #[test]
    fn fail_reply_has_no_data() {
        let reply = Reply::fail("boom");
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("boom"));
        assert!(reply.data.is_none());
    }

    #[test]
    fn wire_shape_is_pascal_case() {
        let json = Reply::ok(json!("Echo: hi")).to_json();
        assert_eq!(json, r#"{"Success":true,"Error":null,"Data":"Echo: hi"}"#);

        let json = Reply::fail("No handler registered for Echo").to_json();
        assert_eq!(
            json,
            r#"{"Success":false,"Error":"No handler registered for Echo","Data":null}"#
        );
    }

    #[test]
    fn empty_ok_serializes_null_data() {
        let json = Reply::ok_empty().to_json();
        assert_eq!(json, r#"{"Success":true,"Error":null,"Data":null}"#);
    }

    #[test]
    fn round_trips_through_json() {
        let reply = Reply::ok(json!({"theme": "Dark", "notifications_enabled": true}));
        let parsed: Reply = serde_json::from_str(&reply.to_json()).unwrap();
        assert_eq!(parsed, reply);
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let parsed: Reply = serde_json::from_str(r#"{"Success":true}"#).unwrap();
        assert!(parsed.success);
        assert!(parsed.error.is_none());
        assert!(parsed.data.is_none());
    }
}
