use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::require_store;
use crate::ipc::types::{AppState, Request};

fn handle_build(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.build_report() {
        Ok(model) => match serde_json::to_value(&model) {
            Ok(value) => ok(&req.id, value),
            Err(e) => err(&req.id, "storage_error", format!("report encode: {e}")),
        },
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "report.build" => Some(handle_build(state, req)),
        _ => None,
    }
}
