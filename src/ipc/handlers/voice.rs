use serde::Deserialize;
use serde_json::json;

use crate::identity::User;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{notice, parse_params};
use crate::ipc::types::{AppState, Request};
use crate::session::{self, SessionState};
use crate::speech::EventOutcome;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "voice.status" => Some(status(state, req)),
        "voice.toggle" => Some(toggle(state, req)),
        "voice.speak" => Some(speak(state, req)),
        "voice.stop" => Some(stop(state, req)),
        "voice.event" => Some(event(state, req)),
        _ => None,
    }
}

/// Voice over is on exactly when the current session belongs to a student
/// with the flag set.
fn voice_over_enabled(state: &AppState) -> bool {
    matches!(
        state.session.user(),
        Some(User::Student(s)) if s.is_voice_over_enabled
    )
}

fn status(state: &AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "enabled": voice_over_enabled(state),
            "speaking": state.speech.is_speaking(),
        }),
    )
}

/// Flips the flag by rewriting the whole student record, both in the identity
/// store and in the live (persisted) session.
fn toggle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(User::Student(current)) = state.session.user() else {
        return err(
            &req.id,
            "not_authorized",
            "voice over is only available to student accounts",
            None,
        );
    };

    let mut toggled = current.clone();
    toggled.is_voice_over_enabled = !toggled.is_voice_over_enabled;
    let Some(stored) = state.identity.replace_student(toggled) else {
        return err(&req.id, "not_found", "student not found", None);
    };

    let enabled = stored.is_voice_over_enabled;
    let user = User::Student(stored);
    if let Some(ws) = state.workspace.as_ref() {
        if let Err(e) = session::save(ws, &user) {
            return err(&req.id, "session_io_failed", e.to_string(), None);
        }
    }
    state.session = SessionState::Authenticated(user.clone());

    let (title, description) = if enabled {
        (
            "Voice over enabled",
            "Voice over has been enabled for accessibility",
        )
    } else {
        ("Voice over disabled", "Voice over has been disabled")
    };
    ok(
        &req.id,
        json!({
            "user": user,
            "enabled": enabled,
            "notice": notice(title, description, "success"),
        }),
    )
}

#[derive(Deserialize)]
struct SpeakParams {
    text: String,
}

/// Fire-and-forget: hands the utterance to the UI's synthesis engine and
/// optimistically marks the channel as speaking. A disabled toggle makes this
/// a quiet no-op rather than an error, since views call it unconditionally.
fn speak(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: SpeakParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    if !voice_over_enabled(state) {
        return ok(&req.id, json!({ "started": false }));
    }

    let utterance = state.speech.speak(params.text);
    ok(
        &req.id,
        json!({
            "started": true,
            "utterance": utterance,
            "speaking": true,
        }),
    )
}

fn stop(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.speech.stop();
    ok(&req.id, json!({ "speaking": false }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventParams {
    utterance_id: String,
    event: String,
}

/// Engine callbacks (start/end/error) reported back by the UI shell. Events
/// for a superseded utterance are ignored so a cancelled speech can never
/// clobber the state of its replacement.
fn event(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params: EventParams = match parse_params(req) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let outcome = match params.event.as_str() {
        "start" => state.speech.on_start(&params.utterance_id),
        "end" => state.speech.on_end(&params.utterance_id),
        "error" => state.speech.on_error(&params.utterance_id),
        other => {
            return err(
                &req.id,
                "bad_params",
                format!("unknown voice event: {}", other),
                None,
            )
        }
    };

    match outcome {
        EventOutcome::Applied => ok(
            &req.id,
            json!({ "speaking": state.speech.is_speaking() }),
        ),
        EventOutcome::Errored => ok(
            &req.id,
            json!({
                "speaking": false,
                "notice": notice(
                    "Voice over error",
                    "There was an error with the voice over service",
                    "error",
                ),
            }),
        ),
        EventOutcome::Stale => ok(
            &req.id,
            json!({
                "speaking": state.speech.is_speaking(),
                "stale": true,
            }),
        ),
    }
}
