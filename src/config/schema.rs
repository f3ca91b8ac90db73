use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                    "cors_origins": { "type": "array", "items": { "type": "string" } }
                },
                "additionalProperties": false
            },
            "database": {
                "type": "object",
                "properties": {
                    "path": { "type": "string", "minLength": 1 }
                },
                "additionalProperties": false
            },
            "classifier": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "enum": ["sightengine", "google_vision"] },
                    "api_url": { "type": "string", "format": "uri" },
                    "api_user": { "type": "string" },
                    "api_secret": { "type": "string" },
                    "api_key": { "type": "string" },
                    "models": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
                    "timeout_secs": { "type": "integer", "minimum": 1, "maximum": 600 }
                },
                "additionalProperties": false
            },
            "thresholds": {
                "type": "object",
                "additionalProperties": {
                    "type": "number",
                    "exclusiveMinimum": 0,
                    "exclusiveMaximum": 1
                }
            }
        },
        "additionalProperties": false
    })
});
