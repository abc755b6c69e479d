//! Conversion from derived JSON schemas to the model endpoint's schema subset.
//!
//! `generateContent` accepts a restricted OpenAPI-style schema in its
//! `responseSchema` field: no `$ref`s, no numeric bounds, no meta keys.
//! Deriving the schema from the result type with `schemars` and narrowing it
//! here keeps the Rust type as the single source of truth for the declared
//! output shape.

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

/// Keys the endpoint's schema dialect understands.
const ALLOWED_KEYS: [&str; 6] = [
    "type",
    "description",
    "enum",
    "items",
    "properties",
    "required",
];

/// Build the endpoint-ready response schema for `T`.
pub fn response_schema_for<T: JsonSchema>() -> Value {
    let root = serde_json::to_value(schema_for!(T)).expect("schema serialization cannot fail");
    let definitions = root
        .get("definitions")
        .cloned()
        .unwrap_or(Value::Object(Map::new()));
    narrow(&root, &definitions)
}

fn narrow(schema: &Value, definitions: &Value) -> Value {
    // Inline references into the definition they point at.
    if let Some(Value::String(reference)) = schema.get("$ref") {
        if let Some(name) = reference.strip_prefix("#/definitions/") {
            if let Some(target) = definitions.get(name) {
                return narrow(target, definitions);
            }
        }
        return Value::Object(Map::new());
    }

    let Some(object) = schema.as_object() else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in object {
        if !ALLOWED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let value = match key.as_str() {
            "items" => narrow(value, definitions),
            "properties" => {
                let Some(properties) = value.as_object() else {
                    continue;
                };
                Value::Object(
                    properties
                        .iter()
                        .map(|(name, prop)| (name.clone(), narrow(prop, definitions)))
                        .collect(),
                )
            }
            _ => value.clone(),
        };
        out.insert(key.clone(), value);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;

    #[test]
    fn test_analysis_schema_shape() {
        let schema = response_schema_for::<AnalysisResult>();

        assert_eq!(schema["type"], "object");
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "crowdCount",
            "actions",
            "attributes",
            "objects",
            "audioTranscription",
        ] {
            assert!(required.contains(&field), "missing required field {field}");
        }
    }

    #[test]
    fn test_action_items_are_inlined() {
        let schema = response_schema_for::<AnalysisResult>();

        let items = &schema["properties"]["actions"]["items"];
        assert_eq!(items["type"], "object");
        assert!(items.get("$ref").is_none());
        assert_eq!(
            items["properties"]["intensity"]["enum"],
            serde_json::json!(["low", "medium", "high"])
        );
    }

    #[test]
    fn test_meta_keys_are_dropped() {
        let schema = response_schema_for::<AnalysisResult>();
        let text = serde_json::to_string(&schema).unwrap();

        assert!(!text.contains("$schema"));
        assert!(!text.contains("definitions"));
        assert!(!text.contains("format"));
        assert!(!text.contains("minimum"));
    }
}
