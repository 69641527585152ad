use std::path::PathBuf;

use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::session::{self, SessionState};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(health(state, req)),
        "workspace.select" => Some(workspace_select(state, req)),
        _ => None,
    }
}

fn health(state: &AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
        }),
    )
}

/// Selects the directory holding the persisted session record and, on the
/// first select of the process, rehydrates it: LOADING becomes AUTHENTICATED
/// or ANONYMOUS. Later selects move the record location without touching the
/// live session.
fn workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    if let Err(e) = std::fs::create_dir_all(&path) {
        return err(&req.id, "workspace_open_failed", e.to_string(), None);
    }

    if state.session == SessionState::Loading {
        state.session = session::load(&path);
    }
    state.workspace = Some(path.clone());

    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "session": state.session,
        }),
    )
}
