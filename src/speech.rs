use serde::Serialize;
use uuid::Uuid;

/// Outcome of feeding an engine callback into the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event belonged to the active utterance and was applied.
    Applied,
    /// The engine reported an error; the speaking flag has been reset and the
    /// caller should surface a failure notice.
    Errored,
    /// The event referenced a superseded or unknown utterance and was ignored.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub utterance_id: String,
    pub text: String,
}

/// Tracks the one logical speech slot: Idle -> Speaking -> Idle, with error
/// collapsing back to Idle. The synthesis engine itself lives on the UI side;
/// the daemon only hands out utterances and consumes the start/end/error
/// callbacks, so at most one utterance is ever considered active.
#[derive(Debug, Default)]
pub struct SpeechChannel {
    speaking: bool,
    current: Option<Utterance>,
}

impl SpeechChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Queues a new utterance, implicitly cancelling any in-flight one
    /// (cancel-then-speak ordering). Speaking starts optimistically; the
    /// engine's `start` callback is a confirmation, not a gate.
    pub fn speak(&mut self, text: String) -> Utterance {
        let utterance = Utterance {
            utterance_id: Uuid::new_v4().to_string(),
            text,
        };
        self.current = Some(utterance.clone());
        self.speaking = true;
        utterance
    }

    /// External cancellation: back to Idle regardless of engine callbacks.
    pub fn stop(&mut self) {
        self.speaking = false;
        self.current = None;
    }

    pub fn on_start(&mut self, utterance_id: &str) -> EventOutcome {
        if !self.is_current(utterance_id) {
            return EventOutcome::Stale;
        }
        self.speaking = true;
        EventOutcome::Applied
    }

    pub fn on_end(&mut self, utterance_id: &str) -> EventOutcome {
        if !self.is_current(utterance_id) {
            return EventOutcome::Stale;
        }
        self.speaking = false;
        self.current = None;
        EventOutcome::Applied
    }

    /// The speaking flag is always reset on error, even though the utterance
    /// never completed.
    pub fn on_error(&mut self, utterance_id: &str) -> EventOutcome {
        if !self.is_current(utterance_id) {
            return EventOutcome::Stale;
        }
        self.speaking = false;
        self.current = None;
        EventOutcome::Errored
    }

    fn is_current(&self, utterance_id: &str) -> bool {
        self.current
            .as_ref()
            .map(|u| u.utterance_id == utterance_id)
            .unwrap_or(false)
    }
}
