use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::store::SessionStore;

/// Either the open session store, or the ready-made error response.
pub fn require_store<'a>(
    state: &'a AppState,
    req: &Request,
) -> Result<&'a SessionStore, serde_json::Value> {
    state
        .store
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_workspace", "no workspace selected"))
}

pub fn str_param(req: &Request, name: &str) -> Result<String, serde_json::Value> {
    match req.params.get(name).and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(err(
            &req.id,
            "bad_params",
            format!("missing or empty params.{name}"),
        )),
    }
}

pub fn f64_param(req: &Request, name: &str) -> Result<f64, serde_json::Value> {
    req.params
        .get(name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("missing or non-numeric params.{name}"),
            )
        })
}

pub fn u32_param(req: &Request, name: &str) -> Result<u32, serde_json::Value> {
    req.params
        .get(name)
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| {
            err(
                &req.id,
                "bad_params",
                format!("missing or invalid params.{name}"),
            )
        })
}
