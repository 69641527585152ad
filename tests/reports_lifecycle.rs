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
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    assert_eq!(value.get("ok").and_then(|v| v.as_bool()), Some(false));
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|c| c.as_str())
        .expect("error code")
}

fn login_admin(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) {
    request_ok(
        stdin,
        reader,
        "login",
        "auth.login",
        json!({ "username": "admin", "password": "pw" }),
    );
}

#[test]
fn generate_and_delete_report_metadata() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();
    login_admin(&mut stdin, &mut reader);

    let seeded = request_ok(&mut stdin, &mut reader, "1", "reports.list", json!({}));
    assert_eq!(
        seeded.get("reports").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(3)
    );

    let generated = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "reports.generate",
        json!({ "reportType": "class", "title": "Semester 1 wrap-up" }),
    );
    let report = generated.get("report").expect("report metadata");
    assert_eq!(
        report.get("reportType").and_then(|v| v.as_str()),
        Some("class")
    );
    assert_eq!(report.get("adminId").and_then(|v| v.as_str()), Some("admin1"));
    assert!(report.get("generatedOn").and_then(|v| v.as_str()).is_some());
    let file_path = report
        .get("filePath")
        .and_then(|v| v.as_str())
        .expect("synthesized path");
    assert!(file_path.starts_with("/reports/class-report-"));
    assert!(file_path.ends_with(".pdf"));
    let report_id = report
        .get("id")
        .and_then(|v| v.as_str())
        .expect("assigned id")
        .to_string();

    let listed = request_ok(&mut stdin, &mut reader, "3", "reports.list", json!({}));
    assert_eq!(
        listed.get("reports").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(4)
    );

    request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "reports.delete",
        json!({ "reportId": report_id }),
    );
    let missing = request(
        &mut stdin,
        &mut reader,
        "5",
        "reports.delete",
        json!({ "reportId": report_id }),
    );
    assert_eq!(error_code(&missing), "not_found");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn generate_is_admin_gated_and_validates_the_title() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let anonymous = request(
        &mut stdin,
        &mut reader,
        "1",
        "reports.generate",
        json!({ "reportType": "class", "title": "Who am I" }),
    );
    assert_eq!(error_code(&anonymous), "not_authorized");

    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "username": "ravi", "password": "pw" }),
    );
    let as_student = request(
        &mut stdin,
        &mut reader,
        "3",
        "reports.generate",
        json!({ "reportType": "student", "title": "My own report" }),
    );
    assert_eq!(error_code(&as_student), "not_authorized");

    login_admin(&mut stdin, &mut reader);
    let blank_title = request(
        &mut stdin,
        &mut reader,
        "4",
        "reports.generate",
        json!({ "reportType": "subject", "title": "  " }),
    );
    assert_eq!(error_code(&blank_title), "bad_params");

    let bad_type = request(
        &mut stdin,
        &mut reader,
        "5",
        "reports.generate",
        json!({ "reportType": "yearly", "title": "nope" }),
    );
    assert_eq!(error_code(&bad_type), "bad_params");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn preview_models_aggregate_the_relevant_slice() {
    let (mut child, mut stdin, mut reader) = spawn_daemon();

    let class = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "reports.classModel",
        json!({ "filters": { "semester": "Semester 1" } }),
    );
    assert_eq!(
        class.get("results").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(5)
    );
    // Semester 1 grades: A, A+, B+, A, A+ -> (9+10+8+9+10)/5 = 9.2.
    assert_eq!(class.get("gpa").and_then(|v| v.as_f64()), Some(9.2));

    let subject = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "reports.subjectModel",
        json!({ "subjectId": "subject4" }),
    );
    assert_eq!(
        subject
            .get("subject")
            .and_then(|s| s.get("subjectCode"))
            .and_then(|v| v.as_str()),
        Some("CS201")
    );
    assert_eq!(
        subject.get("results").and_then(|v| v.as_array()).map(|a| a.len()),
        Some(2)
    );
    // CS201 grades: B+, A -> (8+9)/2 = 8.5.
    assert_eq!(subject.get("gpa").and_then(|v| v.as_f64()), Some(8.5));

    let student = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "reports.studentModel",
        json!({ "studentId": "student1" }),
    );
    assert_eq!(
        student
            .get("student")
            .and_then(|s| s.get("rollNumber"))
            .and_then(|v| v.as_str()),
        Some("AP22110010489")
    );
    // student1 grades: A, A+, B+ -> (9+10+8)/3 = 9.0.
    assert_eq!(student.get("gpa").and_then(|v| v.as_f64()), Some(9.0));
    let distribution = student
        .get("gradeDistribution")
        .and_then(|v| v.as_array())
        .expect("distribution");
    assert_eq!(distribution.len(), 3);
    assert_eq!(
        distribution[0].get("grade").and_then(|v| v.as_str()),
        Some("A+")
    );

    let no_subject = request(
        &mut stdin,
        &mut reader,
        "4",
        "reports.subjectModel",
        json!({ "subjectId": "subject99" }),
    );
    assert_eq!(error_code(&no_subject), "not_found");
    let no_student = request(
        &mut stdin,
        &mut reader,
        "5",
        "reports.studentModel",
        json!({ "studentId": "student99" }),
    );
    assert_eq!(error_code(&no_student), "not_found");

    drop(stdin);
    let _ = child.wait();
}
