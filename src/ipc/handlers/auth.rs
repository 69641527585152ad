use serde::Deserialize;
use serde_json::json;

use crate::identity::User;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{notice, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::session::{self, SessionState};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(login(state, req)),
        "auth.logout" => Some(logout(state, req)),
        "auth.session" => Some(current_session(state, req)),
        _ => None,
    }
}

#[derive(Deserialize)]
struct LoginParams {
    username: String,
    password: String,
}

/// Identity resolution: exact case-sensitive username match, admins before
/// students. The password must be present but its value is never checked —
/// there is no credential store behind this, deliberately.
fn login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: LoginParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if params.username.trim().is_empty() {
        return err(&req.id, "bad_params", "username must not be empty", None);
    }
    if params.password.is_empty() {
        return err(&req.id, "bad_params", "password must not be empty", None);
    }

    let Some(user) = state.identity.resolve(&params.username) else {
        return err(&req.id, "auth_failed", "invalid username or password", None);
    };

    if let Some(ws) = state.workspace.as_ref() {
        if let Err(e) = session::save(ws, &user) {
            return err(&req.id, "session_io_failed", e.to_string(), None);
        }
    }

    let description = match &user {
        User::Admin(a) => format!("Welcome back, {}!", a.name),
        User::Student(s) => format!("Welcome, {}!", s.name),
    };
    state.session = SessionState::Authenticated(user.clone());

    ok(
        &req.id,
        json!({
            "user": user,
            "notice": notice("Login successful", description, "success"),
        }),
    )
}

fn logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Some(ws) = state.workspace.as_ref() {
        if let Err(e) = session::clear(ws) {
            return err(&req.id, "session_io_failed", e.to_string(), None);
        }
    }
    state.session = SessionState::Anonymous;

    ok(
        &req.id,
        json!({
            "notice": notice(
                "Logged out",
                "You have been logged out successfully",
                "success",
            ),
        }),
    )
}

fn current_session(state: &AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!(state.session))
}
