use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::calc::{calculate_gpa, grade_distribution};
use crate::identity::User;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{notice, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::store::{ReportType, ResultFilter, StoreError};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.list" => Some(ok(&req.id, json!({ "reports": state.reports.all() }))),
        "reports.generate" => Some(generate(state, req)),
        "reports.delete" => Some(delete(state, req)),
        "reports.classModel" => Some(class_model(state, req)),
        "reports.subjectModel" => Some(subject_model(state, req)),
        "reports.studentModel" => Some(student_model(state, req)),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateParams {
    report_type: ReportType,
    title: String,
}

/// Records report metadata only. The file path is a synthesized placeholder
/// stamped with the current millis; no artifact is ever written.
fn generate(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: GenerateParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if params.title.trim().is_empty() {
        return err(&req.id, "bad_params", "title must not be empty", None);
    }
    let admin_id = match state.session.user() {
        Some(User::Admin(a)) => a.id.clone(),
        _ => {
            return err(
                &req.id,
                "not_authorized",
                "report generation requires an admin session",
                None,
            )
        }
    };

    let now = Utc::now();
    let file_path = format!(
        "/reports/{}-report-{}.pdf",
        params.report_type.as_str(),
        now.timestamp_millis()
    );
    let report = state
        .reports
        .add(admin_id, params.report_type, file_path, params.title, now);

    ok(
        &req.id,
        json!({
            "report": report,
            "notice": notice(
                "Report generated",
                "The report has been generated successfully",
                "success",
            ),
        }),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteParams {
    report_id: String,
}

fn delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: DeleteParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match state.reports.delete(&params.report_id) {
        Ok(()) => ok(
            &req.id,
            json!({
                "notice": notice(
                    "Report deleted",
                    "The report has been deleted successfully",
                    "success",
                ),
            }),
        ),
        Err(StoreError::NotFound) => err(&req.id, "not_found", "report not found", None),
    }
}

#[derive(Deserialize)]
struct ClassModelParams {
    #[serde(default)]
    filters: ResultFilter,
}

/// Preview model for a class-wide report: the filtered slice plus its GPA and
/// grade distribution, ready for the UI's chart sink.
fn class_model(state: &AppState, req: &Request) -> serde_json::Value {
    let params: ClassModelParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let slice = state.results.filter(&params.filters.normalized());
    ok(
        &req.id,
        json!({
            "gpa": calculate_gpa(&slice),
            "gradeDistribution": grade_distribution(&slice),
            "results": slice,
        }),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectModelParams {
    subject_id: String,
    #[serde(default)]
    filters: ResultFilter,
}

fn subject_model(state: &AppState, req: &Request) -> serde_json::Value {
    let params: SubjectModelParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(subject) = state.subject_by_id(&params.subject_id) else {
        return err(&req.id, "not_found", "subject not found", None);
    };

    let mut filter = params.filters.normalized();
    filter.subject_id = Some(params.subject_id.clone());
    let slice = state.results.filter(&filter);

    ok(
        &req.id,
        json!({
            "subject": subject,
            "gpa": calculate_gpa(&slice),
            "gradeDistribution": grade_distribution(&slice),
            "results": slice,
        }),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentModelParams {
    student_id: String,
    #[serde(default)]
    filters: ResultFilter,
}

fn student_model(state: &AppState, req: &Request) -> serde_json::Value {
    let params: StudentModelParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let Some(student) = state.identity.student_by_id(&params.student_id) else {
        return err(&req.id, "not_found", "student not found", None);
    };

    let slice = state
        .results
        .by_student(&params.student_id, &params.filters.normalized());

    ok(
        &req.id,
        json!({
            "student": student,
            "gpa": calculate_gpa(&slice),
            "gradeDistribution": grade_distribution(&slice),
            "results": slice,
        }),
    )
}
