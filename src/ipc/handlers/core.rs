use log::{info, warn};
use serde_json::json;
use std::path::PathBuf;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::require_store;
use crate::ipc::types::{AppState, Request};
use crate::logging;
use crate::store::SessionStore;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path");
    };

    match SessionStore::open(&path) {
        Ok(store) => {
            // Best-effort; the sidecar must stay usable without log files.
            if let Err(e) = logging::init(&path) {
                eprintln!("labstationd: logging disabled: {e}");
            }
            info!("workspace selected: {}", path.display());
            state.workspace = Some(path.clone());
            state.store = Some(store);
            ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
        }
        Err(e) => err(&req.id, "workspace_open_failed", format!("{e:?}")),
    }
}

fn handle_session_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.clear_all() {
        Ok(()) => {
            warn!("session data cleared");
            ok(&req.id, json!({}))
        }
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "session.clear" => Some(handle_session_clear(state, req)),
        _ => None,
    }
}
