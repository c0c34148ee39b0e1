use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_labstationd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn labstationd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn setup(prefix: &str) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let workspace = temp_dir(prefix);
    let (child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(
        &mut stdin,
        &mut reader,
        "setup",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "setup-student",
        "students.create",
        json!({ "albumNumber": "100", "name": "Jan", "surname": "Nowak" }),
    );
    (child, stdin, reader)
}

fn assignments(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
) -> serde_json::Value {
    request_ok(stdin, reader, id, "stations.list", json!({}))
        .get("assignments")
        .cloned()
        .expect("assignments object")
}

fn memberships(assignments: &serde_json::Value, album: &str) -> Vec<String> {
    assignments
        .as_object()
        .expect("assignments map")
        .iter()
        .filter(|(_, albums)| {
            albums
                .as_array()
                .expect("album list")
                .iter()
                .any(|a| a == album)
        })
        .map(|(station, _)| station.clone())
        .collect()
}

#[test]
fn reassignment_moves_the_student_and_leaves_no_orphans() {
    let (_child, mut stdin, mut reader) = setup("labstationd-stations-move");

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "stations.assign",
        json!({ "albumNumber": "100", "station": 2 }),
    );
    let a = assignments(&mut stdin, &mut reader, "2");
    assert_eq!(memberships(&a, "100"), vec!["2"]);

    request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "stations.assign",
        json!({ "albumNumber": "100", "station": 7 }),
    );
    let a = assignments(&mut stdin, &mut reader, "4");
    assert_eq!(memberships(&a, "100"), vec!["7"]);
    // The old station keeps an (empty) entry; lists are never deleted.
    assert!(a.get("2").and_then(|v| v.as_array()).expect("station 2").is_empty());
}

#[test]
fn repeated_assignment_to_same_station_keeps_one_entry() {
    let (_child, mut stdin, mut reader) = setup("labstationd-stations-idem");

    for i in 0..3 {
        request_ok(
            &mut stdin,
            &mut reader,
            &format!("a{i}"),
            "stations.assign",
            json!({ "albumNumber": "100", "station": 4 }),
        );
    }
    let a = assignments(&mut stdin, &mut reader, "check");
    let station4 = a.get("4").and_then(|v| v.as_array()).expect("station 4");
    assert_eq!(station4.len(), 1);
}

#[test]
fn station_out_of_range_is_rejected_on_assign() {
    let (_child, mut stdin, mut reader) = setup("labstationd-stations-range");

    for (i, station) in [0u32, 11].iter().enumerate() {
        let resp = request(
            &mut stdin,
            &mut reader,
            &format!("r{i}"),
            "stations.assign",
            json!({ "albumNumber": "100", "station": station }),
        );
        assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
        assert_eq!(
            resp.get("error")
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str()),
            Some("bad_params")
        );
    }
}

#[test]
fn station_join_returns_assigned_students_only() {
    let (_child, mut stdin, mut reader) = setup("labstationd-stations-join");

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        json!({ "albumNumber": "200", "name": "Anna", "surname": "Adamska" }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "stations.assign",
        json!({ "albumNumber": "100", "station": 5 }),
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "stations.students",
        json!({ "station": 5 }),
    );
    let students = result.get("students").and_then(|v| v.as_array()).expect("students");
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["albumNumber"], "100");

    // Never-touched and out-of-range stations read as empty, not as errors.
    for (i, station) in [3u32, 99].iter().enumerate() {
        let result = request_ok(
            &mut stdin,
            &mut reader,
            &format!("e{i}"),
            "stations.students",
            json!({ "station": station }),
        );
        assert!(result
            .get("students")
            .and_then(|v| v.as_array())
            .expect("students")
            .is_empty());
    }
}
