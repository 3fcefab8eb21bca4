//! Webhook payload and the record derived from it.

use serde_json::{Map, Number, Value};

/// Decoded webhook body.
///
/// Only built from a document whose raw bytes already passed signature
/// verification. Fields the sender did not supply are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookPayload {
    /// Event discriminator. Non-string values are treated as absent.
    pub event: Option<String>,
    /// Project identifier, kept as sent.
    pub project_id: Option<Value>,
    /// Artifact metadata, stored verbatim.
    pub data: Option<Value>,
}

impl WebhookPayload {
    /// Take the known fields out of a decoded JSON document.
    ///
    /// Documents that are not JSON objects yield an empty payload.
    pub fn from_document(document: Value) -> Self {
        let mut fields = match document {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        let event = match fields.remove("event") {
            Some(Value::String(event)) => Some(event),
            _ => None,
        };

        Self {
            event,
            project_id: fields.remove("project_id"),
            data: fields.remove("data"),
        }
    }
}

/// One key-value write: `project_id` → serialized `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub key: String,
    pub value: String,
}

impl StoredRecord {
    /// Derive the record for a payload.
    ///
    /// Returns `Ok(None)` when the key or the value is absent.
    pub fn from_payload(payload: &WebhookPayload) -> Result<Option<Self>, serde_json::Error> {
        let key = match payload.project_id.as_ref().and_then(project_key) {
            Some(key) => key,
            None => return Ok(None),
        };

        let value = match payload.data.as_ref() {
            Some(data) => serde_json::to_string(data)?,
            None => return Ok(None),
        };

        if value.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self { key, value }))
    }
}

/// Render a project id as a store key.
///
/// Null, empty strings, zero and `false` count as absent. Arrays and objects
/// are not identifiers.
fn project_key(project_id: &Value) -> Option<String> {
    match project_id {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Integral values render without a fraction, so `42.0` and `1e3` key as
/// `"42"` and `"1000"`.
fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document_object() {
        let payload = WebhookPayload::from_document(json!({
            "event": "project.web_sdk_artifact_upload",
            "project_id": 42,
            "data": {"url": "https://x/y.js"},
            "timestamp": 1700000000
        }));

        assert_eq!(
            payload.event.as_deref(),
            Some("project.web_sdk_artifact_upload")
        );
        assert_eq!(payload.project_id, Some(json!(42)));
        assert_eq!(payload.data, Some(json!({"url": "https://x/y.js"})));
    }

    #[test]
    fn test_from_document_non_object() {
        assert_eq!(
            WebhookPayload::from_document(json!([1, 2, 3])),
            WebhookPayload::default()
        );
        assert_eq!(
            WebhookPayload::from_document(json!("project.web_sdk_artifact_upload")),
            WebhookPayload::default()
        );
    }

    #[test]
    fn test_non_string_event_is_absent() {
        let payload = WebhookPayload::from_document(json!({"event": 7}));
        assert_eq!(payload.event, None);
    }

    #[test]
    fn test_record_from_string_and_numeric_ids() {
        let payload = WebhookPayload {
            event: None,
            project_id: Some(json!("42")),
            data: Some(json!({"url": "https://x/y.js"})),
        };
        let record = StoredRecord::from_payload(&payload).unwrap().unwrap();
        assert_eq!(record.key, "42");
        assert_eq!(record.value, r#"{"url":"https://x/y.js"}"#);

        let payload = WebhookPayload {
            project_id: Some(json!(42)),
            ..payload
        };
        let record = StoredRecord::from_payload(&payload).unwrap().unwrap();
        assert_eq!(record.key, "42");
    }

    #[test]
    fn test_integral_float_ids_render_as_integers() {
        for (raw, expected) in [("42.0", "42"), ("1e3", "1000"), ("-7.0", "-7"), ("4.5", "4.5")] {
            let document: Value =
                serde_json::from_str(&format!(r#"{{"project_id":{raw},"data":{{}}}}"#)).unwrap();
            let record = StoredRecord::from_payload(&WebhookPayload::from_document(document))
                .unwrap()
                .unwrap();
            assert_eq!(record.key, expected, "project_id {raw}");
        }
    }

    #[test]
    fn test_record_keeps_field_order() {
        let payload = WebhookPayload::from_document(
            serde_json::from_str(
                r#"{"project_id":"9","data":{"z":1,"a":{"y":true,"b":null}}}"#,
            )
            .unwrap(),
        );
        let record = StoredRecord::from_payload(&payload).unwrap().unwrap();
        assert_eq!(record.value, r#"{"z":1,"a":{"y":true,"b":null}}"#);
    }

    #[test]
    fn test_absent_keys() {
        for id in [json!(null), json!(""), json!(0), json!(false), json!([1]), json!({})] {
            let payload = WebhookPayload {
                event: None,
                project_id: Some(id.clone()),
                data: Some(json!({"url": "u"})),
            };
            assert_eq!(
                StoredRecord::from_payload(&payload).unwrap(),
                None,
                "project_id {id} should be absent"
            );
        }

        let payload = WebhookPayload {
            event: None,
            project_id: None,
            data: Some(json!({"url": "u"})),
        };
        assert_eq!(StoredRecord::from_payload(&payload).unwrap(), None);
    }

    #[test]
    fn test_missing_data_is_absent() {
        let payload = WebhookPayload {
            event: None,
            project_id: Some(json!("42")),
            data: None,
        };
        assert_eq!(StoredRecord::from_payload(&payload).unwrap(), None);
    }

    #[test]
    fn test_null_data_is_stored() {
        let payload = WebhookPayload {
            event: None,
            project_id: Some(json!("42")),
            data: Some(Value::Null),
        };
        let record = StoredRecord::from_payload(&payload).unwrap().unwrap();
        assert_eq!(record.value, "null");
    }
}
