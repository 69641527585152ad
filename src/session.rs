use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::identity::User;

/// File holding the one persisted identity record, the daemon's stand-in for
/// the UI's fixed local-storage key.
const SESSION_FILE: &str = "session.json";

/// Auth lifecycle: the daemon starts in `Loading` until a workspace is
/// selected and the persisted record (if any) has been rehydrated.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::Anonymous => "anonymous",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

impl Serialize for SessionState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            state: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            user: Option<&'a User>,
        }
        Wire {
            state: self.as_str(),
            user: self.user(),
        }
        .serialize(serializer)
    }
}

fn session_path(workspace: &Path) -> PathBuf {
    workspace.join(SESSION_FILE)
}

/// Rehydrates the persisted session record. A missing file means anonymous;
/// an unreadable or unparseable file is treated the same way rather than
/// wedging startup.
pub fn load(workspace: &Path) -> SessionState {
    let path = session_path(workspace);
    match std::fs::read_to_string(&path) {
        Ok(raw) => match serde_json::from_str::<User>(&raw) {
            Ok(user) => SessionState::Authenticated(user),
            Err(_) => SessionState::Anonymous,
        },
        Err(_) => SessionState::Anonymous,
    }
}

pub fn save(workspace: &Path, user: &User) -> anyhow::Result<()> {
    let path = session_path(workspace);
    let raw = serde_json::to_string_pretty(user)?;
    std::fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Removes the persisted record. Already-absent is fine.
pub fn clear(workspace: &Path) -> anyhow::Result<()> {
    let path = session_path(workspace);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
    }
}
