use serde::de::DeserializeOwned;
use serde_json::json;

use super::error::err;
use super::types::Request;

/// Deserializes `params` into the handler's typed struct; any shape mismatch
/// is a `bad_params` response carrying serde's message. Absent params read as
/// an empty object so all-optional param structs stay callable bare.
pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Value> {
    let raw = if req.params.is_null() {
        json!({})
    } else {
        req.params.clone()
    };
    serde_json::from_value(raw).map_err(|e| err(&req.id, "bad_params", e.to_string(), None))
}

/// Toast payload attached to mutation results; the UI shell forwards it to
/// its notification sink verbatim.
pub fn notice(title: &str, description: impl Into<String>, severity: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": description.into(),
        "severity": severity,
    })
}
