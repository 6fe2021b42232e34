use crate::modules::protocol::RawMessage;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSummary {
    pub id: String,
    pub index: Option<String>,
    pub timestamp: Option<String>,
    pub stream_ids: Vec<String>,
    pub source_node_id: Option<String>,
    pub source_input_id: Option<String>,
    /// Every field as received, internal ones included.
    pub fields: Map<String, Value>,
    /// User-visible fields only.
    pub filtered_fields: BTreeMap<String, Value>,
    pub formatted_fields: BTreeMap<String, String>,
    pub highlight_ranges: Map<String, Value>,
    pub decoration_stats: Option<Value>,
}

pub fn format_message_summary(raw: RawMessage) -> MessageSummary {
    let fields = raw.message;

    let filtered_fields: BTreeMap<String, Value> = fields
        .iter()
        .filter(|(k, _)| !is_internal_field(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let formatted_fields = filtered_fields
        .iter()
        .map(|(k, v)| (k.clone(), format_value(v)))
        .collect();

    let stream_ids = match fields.get("streams") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    MessageSummary {
        id: string_field(&fields, "_id").unwrap_or_default(),
        index: raw.index,
        timestamp: string_field(&fields, "timestamp"),
        stream_ids,
        source_node_id: string_field(&fields, "gl2_source_node"),
        source_input_id: string_field(&fields, "gl2_source_input"),
        filtered_fields,
        formatted_fields,
        fields,
        highlight_ranges: raw.highlight_ranges,
        decoration_stats: raw.decoration_stats,
    }
}

fn is_internal_field(name: &str) -> bool {
    name == "_id" || name == "streams" || name.starts_with("gl2_")
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        v => Some(format_value(v)),
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Groups digits in thousands: `1234567` -> `1,234,567`.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_elapsed_micros(micros: u64) -> String {
    format!("{} µs", format_number(micros))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(message: Value) -> RawMessage {
        serde_json::from_value(json!({ "message": message, "index": "graylog_2" })).unwrap()
    }

    #[test]
    fn summary_splits_internal_fields() {
        let summary = format_message_summary(raw(json!({
            "_id": "m-1",
            "timestamp": "2016-08-01T10:00:00.000Z",
            "message": "login failed",
            "source": "web-01",
            "status": 401,
            "streams": ["s1", "s2"],
            "gl2_source_node": "node-a",
            "gl2_source_input": "input-b",
            "gl2_remote_ip": "10.0.0.1"
        })));

        assert_eq!(summary.id, "m-1");
        assert_eq!(summary.index.as_deref(), Some("graylog_2"));
        assert_eq!(summary.timestamp.as_deref(), Some("2016-08-01T10:00:00.000Z"));
        assert_eq!(summary.stream_ids, vec!["s1", "s2"]);
        assert_eq!(summary.source_node_id.as_deref(), Some("node-a"));
        assert_eq!(summary.source_input_id.as_deref(), Some("input-b"));
        assert_eq!(
            summary.filtered_fields.keys().collect::<Vec<_>>(),
            vec!["message", "source", "status", "timestamp"]
        );
        assert_eq!(summary.formatted_fields["status"], "401");
        assert_eq!(summary.fields.len(), 9);
    }

    #[test]
    fn missing_id_and_streams_are_tolerated() {
        let summary = format_message_summary(raw(json!({ "message": "x", "tags": ["a", 1] })));
        assert_eq!(summary.id, "");
        assert!(summary.stream_ids.is_empty());
        assert_eq!(summary.formatted_fields["tags"], r#"["a",1]"#);
    }

    #[test]
    fn numbers_are_grouped() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_elapsed_micros(15234), "15,234 µs");
    }
}
