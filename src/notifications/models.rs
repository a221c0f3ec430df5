use serde::Serialize;

use super::{NotificationError, require_non_empty};

/// The logical message of one broadcast. Never persisted; the click-through
/// url comes from the owning service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, NotificationError> {
        let title = title.into();
        let body = body.into();
        require_non_empty("title", &title)?;
        require_non_empty("body", &body)?;
        Ok(Self { title, body })
    }
}

/// Result of sending one envelope to one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub token: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn delivered(token: String, receipt: String) -> Self {
        Self {
            token,
            succeeded: true,
            receipt: Some(receipt),
            error: None,
        }
    }

    pub fn failed(token: String, error: String) -> Self {
        Self {
            token,
            succeeded: false,
            receipt: None,
            error: Some(error),
        }
    }
}

/// Aggregate of one broadcast, produced only once every send has settled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResult {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<DispatchOutcome>,
}

impl BroadcastResult {
    /// The service had no endpoints; nothing was sent.
    pub fn no_recipients() -> Self {
        Self::default()
    }

    pub fn from_outcomes(outcomes: Vec<DispatchOutcome>) -> Self {
        let (succeeded, failed) = outcomes.iter().fold((0, 0), |(ok, err), outcome| {
            if outcome.succeeded {
                (ok + 1, err)
            } else {
                (ok, err + 1)
            }
        });
        Self {
            succeeded,
            failed,
            outcomes,
        }
    }

    pub fn recipients(&self) -> usize {
        self.outcomes.len()
    }

    pub fn has_recipients(&self) -> bool {
        !self.outcomes.is_empty()
    }

    pub fn outcome_for(&self, token: &str) -> Option<&DispatchOutcome> {
        self.outcomes.iter().find(|outcome| outcome.token == token)
    }

    pub fn summary(&self) -> String {
        if !self.has_recipients() {
            return "No tokens registered for this service. Nothing was sent.".to_string();
        }
        format!(
            "Notification sent successfully to {} devices. {} failed.",
            self.succeeded, self.failed
        )
    }
}

/// Progress of a single broadcast invocation.
///
/// `Unauthorized` and `NotFound` are reached straight from `Authorizing` or
/// `Resolving`; such runs never enter `Dispatching`. `Failed` covers store
/// errors before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastPhase {
    Idle,
    Authorizing,
    Resolving,
    Dispatching { in_flight: usize },
    Aggregating,
    Done { succeeded: usize, failed: usize },
    Unauthorized,
    NotFound,
    Failed,
}

impl BroadcastPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BroadcastPhase::Done { .. }
                | BroadcastPhase::Unauthorized
                | BroadcastPhase::NotFound
                | BroadcastPhase::Failed
        )
    }
}
