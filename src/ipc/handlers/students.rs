use serde_json::json;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{require_store, str_param};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;

fn handle_list(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list_students() {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_create(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let (album, name, surname) = match (
        str_param(req, "albumNumber"),
        str_param(req, "name"),
        str_param(req, "surname"),
    ) {
        (Ok(a), Ok(n), Ok(s)) => (a, n, s),
        (Err(resp), _, _) | (_, Err(resp), _) | (_, _, Err(resp)) => return resp,
    };

    match store.add_student(Student::new(album, name, surname)) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_update(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let original = match str_param(req, "originalAlbumNumber") {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let updated: Student = match req
        .params
        .get("student")
        .cloned()
        .map(serde_json::from_value)
    {
        Some(Ok(s)) => s,
        _ => return err(&req.id, "bad_params", "missing or invalid params.student"),
    };

    match store.update_student(&original, updated) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_delete(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let album = match str_param(req, "albumNumber") {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    match store.delete_student(&album) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_list(state, req)),
        "students.create" => Some(handle_create(state, req)),
        "students.update" => Some(handle_update(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
