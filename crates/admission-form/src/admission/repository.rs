use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::ApplicantRecord;
use super::state::FormState;
use super::validation::Evaluation;

/// Identifier wrapper for form sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository record holding the answers collected so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub state: FormState,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            state: FormState::new(),
            started_at: now,
            updated_at: now,
        }
    }

    pub fn record(&self) -> &ApplicantRecord {
        self.state.record()
    }

    pub fn snapshot(&self, evaluation: Evaluation) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            updated_at: self.updated_at,
            record: self.record().clone(),
            evaluation,
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionRepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), SessionRepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError>;
    fn remove(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionRepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Record plus its evaluation, as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub record: ApplicantRecord,
    pub evaluation: Evaluation,
}
