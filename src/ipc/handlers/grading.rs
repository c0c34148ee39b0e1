use serde_json::json;

use crate::calc;
use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{f64_param, require_store, str_param};
use crate::ipc::types::{AppState, Request};

fn handle_mark_passed(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let (album, task) = match (str_param(req, "albumNumber"), str_param(req, "taskDescription")) {
        (Ok(a), Ok(t)) => (a, t),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    match store.mark_task_passed(&album, &task) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_mark_not_passed(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let (album, task) = match (str_param(req, "albumNumber"), str_param(req, "taskDescription")) {
        (Ok(a), Ok(t)) => (a, t),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };
    match store.mark_task_not_passed(&album, &task) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_ledger(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list_passed_tasks() {
        Ok(passed) => ok(&req.id, json!({ "passedTasks": passed })),
        Err(e) => store_err(&req.id, e),
    }
}

/// Manual override from the grading screen. The override sticks until the
/// student's passed set changes again, which recomputes the grade.
fn handle_set_proposed(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let album = match str_param(req, "albumNumber") {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let grade = match f64_param(req, "grade") {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    if !calc::is_valid_proposed_grade(grade) {
        return err(
            &req.id,
            "bad_params",
            format!(
                "grade must be between {} and {}",
                calc::GRADE_FLOOR,
                calc::GRADE_CEILING
            ),
        );
    }

    match store.set_proposed_grade(&album, grade) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grading.mark_passed" => Some(handle_mark_passed(state, req)),
        "grading.mark_not_passed" => Some(handle_mark_not_passed(state, req)),
        "grading.ledger" => Some(handle_ledger(state, req)),
        "grading.set_proposed" => Some(handle_set_proposed(state, req)),
        _ => None,
    }
}
