use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_daemon() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_resultsd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn resultsd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request_ok(
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
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn results_of(result: &serde_json::Value) -> Vec<serde_json::Value> {
    result
        .get("results")
        .and_then(|v| v.as_array())
        .expect("results array")
        .clone()
}

#[test]
fn empty_filter_returns_the_whole_seed_set_in_order() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let all = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "results.list",
        json!({}),
    ));
    assert_eq!(all.len(), 9);

    // Explicit empty filters and ALL sentinels are the identity too.
    let sentinel = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "results.list",
        json!({ "filters": { "academicYear": "ALL", "semester": "", "subjectId": "all" } }),
    ));
    assert_eq!(sentinel, all);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn set_filter_fields_constrain_exactly() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let all = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "results.list",
        json!({}),
    ));
    let sem2 = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "results.list",
        json!({ "filters": { "semester": "Semester 2" } }),
    ));

    assert_eq!(sem2.len(), 4);
    assert!(sem2
        .iter()
        .all(|r| r.get("semester").and_then(|v| v.as_str()) == Some("Semester 2")));
    // Completeness: every matching seed row appears, in the original order.
    let expected: Vec<_> = all
        .iter()
        .filter(|r| r.get("semester").and_then(|v| v.as_str()) == Some("Semester 2"))
        .cloned()
        .collect();
    assert_eq!(sem2, expected);

    let combined = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "results.list",
        json!({ "filters": { "semester": "Semester 2", "subjectId": "subject4" } }),
    ));
    assert_eq!(combined.len(), 2);

    let none = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "results.list",
        json!({ "filters": { "academicYear": "1999-2000" } }),
    ));
    assert!(none.is_empty());

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn by_student_scopes_to_owner_then_filters() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let mine = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "results.byStudent",
        json!({ "studentId": "student1" }),
    ));
    assert_eq!(mine.len(), 3);
    assert!(mine
        .iter()
        .all(|r| r.get("studentId").and_then(|v| v.as_str()) == Some("student1")));

    let narrowed = results_of(&request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "results.byStudent",
        json!({ "studentId": "student1", "filters": { "subjectId": "subject2" } }),
    ));
    assert_eq!(narrowed.len(), 1);
    assert_eq!(
        narrowed[0].get("subjectCode").and_then(|v| v.as_str()),
        Some("CS101")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn distinct_years_and_semesters_feed_the_dropdowns() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let years = request_ok(&mut stdin, &mut reader, "1", "results.years", json!({}));
    assert_eq!(
        years.get("academicYears"),
        Some(&json!(["2023-2024"]))
    );

    let semesters = request_ok(&mut stdin, &mut reader, "2", "results.semesters", json!({}));
    assert_eq!(
        semesters.get("semesters"),
        Some(&json!(["Semester 1", "Semester 2"]))
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn search_matches_name_and_roll_number_case_insensitively() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let by_name = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "results.search",
        json!({ "query": "jaswanth", "searchType": "name" }),
    );
    assert_eq!(by_name.get("count").and_then(|v| v.as_u64()), Some(3));

    let by_roll = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "results.search",
        json!({ "query": "ap22110010376", "searchType": "rollNumber" }),
    );
    assert_eq!(by_roll.get("count").and_then(|v| v.as_u64()), Some(2));

    // Search runs on top of the filter engine.
    let filtered = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "results.search",
        json!({
            "query": "Hasini",
            "searchType": "name",
            "filters": { "subjectId": "subject5" },
        }),
    );
    assert_eq!(filtered.get("count").and_then(|v| v.as_u64()), Some(1));

    // Empty query imposes no constraint.
    let unconstrained = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "results.search",
        json!({ "searchType": "name" }),
    );
    assert_eq!(unconstrained.get("count").and_then(|v| v.as_u64()), Some(9));

    drop(stdin);
    let _ = child.wait();
}
