use serde::Deserialize;
use serde_json::json;

use crate::calc::grade_for_percentage;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{notice, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::store::{ResultDraft, ResultFilter, ResultRecord, StoreError};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "results.list" => Some(list(state, req)),
        "results.get" => Some(get(state, req)),
        "results.byStudent" => Some(by_student(state, req)),
        "results.create" => Some(create(state, req)),
        "results.update" => Some(update(state, req)),
        "results.delete" => Some(delete(state, req)),
        "results.years" => Some(ok(
            &req.id,
            json!({ "academicYears": state.results.academic_years() }),
        )),
        "results.semesters" => Some(ok(
            &req.id,
            json!({ "semesters": state.results.semesters() }),
        )),
        "results.search" => Some(search(state, req)),
        _ => None,
    }
}

#[derive(Deserialize)]
struct FilterParams {
    #[serde(default)]
    filters: ResultFilter,
}

fn list(state: &AppState, req: &Request) -> serde_json::Value {
    let params: FilterParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = params.filters.normalized();
    ok(&req.id, json!({ "results": state.results.filter(&filter) }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetParams {
    result_id: String,
}

fn get(state: &AppState, req: &Request) -> serde_json::Value {
    let params: GetParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match state.results.get(&params.result_id) {
        Some(record) => ok(&req.id, json!({ "result": record })),
        None => err(&req.id, "not_found", "result not found", None),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByStudentParams {
    student_id: String,
    #[serde(default)]
    filters: ResultFilter,
}

fn by_student(state: &AppState, req: &Request) -> serde_json::Value {
    let params: ByStudentParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = params.filters.normalized();
    ok(
        &req.id,
        json!({ "results": state.results.by_student(&params.student_id, &filter) }),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultParams {
    student_id: String,
    subject_id: String,
    academic_year: String,
    semester: String,
    marks_obtained: f64,
    total_marks: f64,
}

/// Boundary validation for the marks form. `marksObtained <= totalMarks` is
/// intentionally NOT checked here; the store treats the pair as opaque.
fn validate(params: &ResultParams, req: &Request) -> Option<serde_json::Value> {
    if params.academic_year.trim().is_empty() {
        return Some(err(&req.id, "bad_params", "academicYear is required", None));
    }
    if params.semester.trim().is_empty() {
        return Some(err(&req.id, "bad_params", "semester is required", None));
    }
    if !params.marks_obtained.is_finite() || params.marks_obtained < 0.0 {
        return Some(err(
            &req.id,
            "bad_params",
            "marksObtained must be a number >= 0",
            None,
        ));
    }
    if !params.total_marks.is_finite() || params.total_marks <= 0.0 {
        return Some(err(
            &req.id,
            "bad_params",
            "totalMarks must be a number > 0",
            None,
        ));
    }
    None
}

/// Snapshots the student and subject display fields and derives the letter
/// grade from the percentage. Returns an error response for unknown ids.
fn build_draft(
    state: &AppState,
    req: &Request,
    params: &ResultParams,
) -> Result<ResultDraft, serde_json::Value> {
    let Some(student) = state.identity.student_by_id(&params.student_id) else {
        return Err(err(&req.id, "not_found", "student not found", None));
    };
    let Some(subject) = state.subject_by_id(&params.subject_id) else {
        return Err(err(&req.id, "not_found", "subject not found", None));
    };

    let percentage = 100.0 * params.marks_obtained / params.total_marks;
    Ok(ResultDraft {
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        roll_number: student.roll_number.clone(),
        subject_id: subject.id.clone(),
        subject_name: subject.subject_name.clone(),
        subject_code: subject.subject_code.clone(),
        academic_year: params.academic_year.clone(),
        semester: params.semester.clone(),
        marks_obtained: params.marks_obtained,
        total_marks: params.total_marks,
        grade: grade_for_percentage(percentage).to_string(),
    })
}

fn create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: ResultParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if let Some(resp) = validate(&params, req) {
        return resp;
    }
    let draft = match build_draft(state, req, &params) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let record = state.results.add(draft);
    ok(
        &req.id,
        json!({
            "result": record,
            "notice": notice(
                "Result added",
                "The result has been added successfully",
                "success",
            ),
        }),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParams {
    result_id: String,
    #[serde(flatten)]
    fields: ResultParams,
}

fn update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: UpdateParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if let Some(resp) = validate(&params.fields, req) {
        return resp;
    }
    let draft = match build_draft(state, req, &params.fields) {
        Ok(d) => d,
        Err(resp) => return resp,
    };

    let record = ResultRecord {
        id: params.result_id,
        student_id: draft.student_id,
        student_name: draft.student_name,
        roll_number: draft.roll_number,
        subject_id: draft.subject_id,
        subject_name: draft.subject_name,
        subject_code: draft.subject_code,
        academic_year: draft.academic_year,
        semester: draft.semester,
        marks_obtained: draft.marks_obtained,
        total_marks: draft.total_marks,
        grade: draft.grade,
    };
    match state.results.update(record) {
        Ok(updated) => ok(
            &req.id,
            json!({
                "result": updated,
                "notice": notice(
                    "Result updated",
                    "The result has been updated successfully",
                    "success",
                ),
            }),
        ),
        Err(StoreError::NotFound) => err(&req.id, "not_found", "result not found", None),
    }
}

fn delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: GetParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    match state.results.delete(&params.result_id) {
        Ok(()) => ok(
            &req.id,
            json!({
                "notice": notice(
                    "Result deleted",
                    "The result has been deleted successfully",
                    "success",
                ),
            }),
        ),
        Err(StoreError::NotFound) => err(&req.id, "not_found", "result not found", None),
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
enum SearchType {
    #[default]
    Name,
    RollNumber,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    search_type: SearchType,
    #[serde(default)]
    filters: ResultFilter,
}

/// Case-insensitive substring search over the denormalized display fields,
/// applied on top of the filter engine. An empty query matches everything.
fn search(state: &AppState, req: &Request) -> serde_json::Value {
    let params: SearchParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = params.filters.normalized();
    let needle = params
        .query
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    let results: Vec<_> = state
        .results
        .filter(&filter)
        .into_iter()
        .filter(|r| {
            if needle.is_empty() {
                return true;
            }
            let haystack = match params.search_type {
                SearchType::Name => &r.student_name,
                SearchType::RollNumber => &r.roll_number,
            };
            haystack.to_lowercase().contains(&needle)
        })
        .collect();

    let count = results.len();
    ok(&req.id, json!({ "results": results, "count": count }))
}
