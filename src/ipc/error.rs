use serde_json::json;

use crate::error::StoreError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(id: &str, code: &str, message: impl Into<String>) -> serde_json::Value {
    json!({
        "id": id,
        "ok": false,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}

pub fn store_err(id: &str, e: StoreError) -> serde_json::Value {
    err(id, e.code(), e.to_string())
}
