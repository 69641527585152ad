use std::path::PathBuf;

use serde::Deserialize;

use crate::identity::IdentityStore;
use crate::session::SessionState;
use crate::speech::SpeechChannel;
use crate::store::{self, ReportStore, ResultStore, Subject};

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// All daemon state, constructor-built and handed to handlers explicitly.
/// Every collection lives in process memory; the only thing that ever touches
/// disk is the session record under the selected workspace.
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub session: SessionState,
    pub identity: IdentityStore,
    pub results: ResultStore,
    pub reports: ReportStore,
    pub subjects: Vec<Subject>,
    pub speech: SpeechChannel,
}

impl AppState {
    pub fn seeded() -> Self {
        Self {
            workspace: None,
            session: SessionState::Loading,
            identity: IdentityStore::seeded(),
            results: ResultStore::new(store::seeded_results()),
            reports: ReportStore::new(store::seeded_reports()),
            subjects: store::seeded_subjects(),
            speech: SpeechChannel::new(),
        }
    }

    pub fn subject_by_id(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }
}
