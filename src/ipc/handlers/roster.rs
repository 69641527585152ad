use serde_json::json;

use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(ok(
            &req.id,
            json!({ "students": state.identity.students() }),
        )),
        "subjects.list" => Some(ok(&req.id, json!({ "subjects": state.subjects }))),
        _ => None,
    }
}
