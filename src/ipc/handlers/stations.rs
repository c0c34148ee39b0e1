use serde_json::json;

use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{require_store, str_param, u32_param};
use crate::ipc::types::{AppState, Request};

const STATION_MIN: u32 = 1;
const STATION_MAX: u32 = 10;

fn handle_assign(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let album = match str_param(req, "albumNumber") {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let station = match u32_param(req, "station") {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    if !(STATION_MIN..=STATION_MAX).contains(&station) {
        return err(
            &req.id,
            "bad_params",
            format!("station must be in {STATION_MIN}..={STATION_MAX}"),
        );
    }

    match store.assign_student_to_station(&album, station) {
        Ok(()) => ok(&req.id, json!({})),
        Err(e) => store_err(&req.id, e),
    }
}

fn handle_list(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.list_station_assignments() {
        Ok(assignments) => ok(&req.id, json!({ "assignments": assignments })),
        Err(e) => store_err(&req.id, e),
    }
}

/// Out-of-range or never-touched stations are not an error here; the join
/// simply yields an empty list.
fn handle_students(state: &AppState, req: &Request) -> serde_json::Value {
    let store = match require_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let station = match u32_param(req, "station") {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    match store.students_for_station(station) {
        Ok(students) => ok(&req.id, json!({ "students": students })),
        Err(e) => store_err(&req.id, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "stations.assign" => Some(handle_assign(state, req)),
        "stations.list" => Some(handle_list(state, req)),
        "stations.students" => Some(handle_students(state, req)),
        _ => None,
    }
}
