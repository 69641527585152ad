use serde::Deserialize;
use serde_json::json;

use crate::calc::{calculate_gpa, grade_distribution, subject_averages};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::parse_params;
use crate::ipc::types::{AppState, Request};
use crate::store::ResultFilter;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.studentGpa" => Some(student_gpa(state, req)),
        "analytics.gradeDistribution" => Some(distribution(state, req)),
        "analytics.subjectAverages" => Some(ok(
            &req.id,
            json!({ "averages": subject_averages(state.results.all(), &state.subjects) }),
        )),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentGpaParams {
    student_id: String,
    #[serde(default)]
    filters: ResultFilter,
}

fn student_gpa(state: &AppState, req: &Request) -> serde_json::Value {
    let params: StudentGpaParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if state.identity.student_by_id(&params.student_id).is_none() {
        return err(&req.id, "not_found", "student not found", None);
    }

    let slice = state
        .results
        .by_student(&params.student_id, &params.filters.normalized());
    ok(&req.id, json!({ "gpa": calculate_gpa(&slice) }))
}

#[derive(Deserialize)]
struct DistributionParams {
    #[serde(default)]
    filters: ResultFilter,
}

fn distribution(state: &AppState, req: &Request) -> serde_json::Value {
    let params: DistributionParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let slice = state.results.filter(&params.filters.normalized());
    ok(
        &req.id,
        json!({ "distribution": grade_distribution(&slice) }),
    )
}
