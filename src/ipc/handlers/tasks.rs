use serde_json::json;

use crate::calc;
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{f64_param, require_store, str_param};
use crate::ipc::types::{AppState, Request};
use crate::model::Task;

fn handle_list(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list_tasks() {
        Ok(tasks) => ok(&req.id, json!({ "tasks": tasks })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_create(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let description = match str_param(req, "description") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let grade = match f64_param(req, "grade") {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    if !calc::is_allowed_task_grade(grade) {
        return err(
            &req.id,
            "bad_params",
            format!("grade {grade} is not one of the allowed task grades"),
        );
    }

    match store.add_task(Task { description, grade }) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

fn parse_task(req: &Request, field: &str) -> Result<Task, serde_json::Value> {
    match req.params.get(field).cloned().map(serde_json::from_value) {
        Some(Ok(t)) => Ok(t),
        _ => Err(err(
            &req.id,
            "bad_params",
            format!("missing or invalid params.{field}"),
        )),
    }
}

fn handle_update(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let original = match parse_task(req, "original") {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    let updated = match parse_task(req, "updated") {
        Ok(t) => t,
        Err(resp) => return resp,
    };
    if !calc::is_allowed_task_grade(updated.grade) {
        return err(
            &req.id,
            "bad_params",
            format!("grade {} is not one of the allowed task grades", updated.grade),
        );
    }

    match store.update_task(&original, updated) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_delete(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let description = match str_param(req, "description") {
        Ok(d) => d,
        Err(resp) => return resp,
    };
    let grade = match f64_param(req, "grade") {
        Ok(g) => g,
        Err(resp) => return resp,
    };

    match store.delete_task(&Task { description, grade }) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "tasks.list" => Some(handle_list(state, req)),
        "tasks.create" => Some(handle_create(state, req)),
        "tasks.update" => Some(handle_update(state, req)),
        "tasks.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
