use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::domain::{ApplicantRecord, SectionUpdate};
use super::gate::{self, FormStep};
use super::repository::{
    SessionId, SessionRecord, SessionRepository, SessionRepositoryError, SessionSnapshot,
};
use super::validation::{Evaluation, FieldValidator};

/// Hosts form sessions and runs the validator after every change.
pub struct AdmissionService<R> {
    repository: Arc<R>,
    validator: Arc<FieldValidator>,
    // Serializes the fetch-merge-store cycle of `update`.
    writes: Mutex<()>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("ses-{id:06}"))
}

/// Gate answer for one navigation step of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepDecision {
    pub step: FormStep,
    pub can_advance: bool,
    pub next_step: Option<FormStep>,
    pub previous_step: Option<FormStep>,
    pub completion_percent: u8,
    /// Messages for the fields that keep the gate closed.
    pub blocking: BTreeMap<String, String>,
}

impl StepDecision {
    pub fn from_evaluation(step: FormStep, evaluation: &Evaluation) -> Self {
        let gated = step.gated_sections();
        let blocking = evaluation
            .fields
            .iter()
            .filter(|report| gated.contains(&report.key.section))
            .filter(|report| report.status.is_active() && !report.status.is_valid())
            .filter_map(|report| {
                report
                    .status
                    .message()
                    .map(|message| (report.key.to_string(), message.to_string()))
            })
            .collect();

        Self {
            step,
            can_advance: gate::can_advance(step, evaluation),
            next_step: gate::next_step(step, evaluation),
            previous_step: gate::previous_step(step),
            completion_percent: evaluation.completion_percent,
            blocking,
        }
    }
}

impl<R> AdmissionService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, validator: FieldValidator) -> Self {
        Self {
            repository,
            validator: Arc::new(validator),
            writes: Mutex::new(()),
        }
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    /// Open an empty session.
    pub fn start(&self) -> Result<SessionSnapshot, AdmissionServiceError> {
        let record = SessionRecord::new(next_session_id(), Utc::now());
        let stored = self.repository.insert(record)?;
        info!(session_id = %stored.session_id, "admission session started");
        Ok(self.snapshot(&stored))
    }

    /// Merge one section update into the session and re-evaluate.
    ///
    /// Concurrent updates through the same service are applied one at a time,
    /// so two patches to one session never overwrite each other. Services
    /// sharing a repository across processes need the repository to do that.
    pub fn update(
        &self,
        session_id: &SessionId,
        update: SectionUpdate,
    ) -> Result<SessionSnapshot, AdmissionServiceError> {
        let section = update.section();
        let record = {
            let _guard = self.writes.lock().expect("session write lock poisoned");
            let mut record = self.load(session_id)?;
            record.state.update_section(update);
            record.updated_at = Utc::now();
            self.repository.update(record.clone())?;
            record
        };

        let snapshot = self.snapshot(&record);
        debug!(
            %session_id,
            %section,
            completion = snapshot.evaluation.completion_percent,
            "section updated"
        );
        Ok(snapshot)
    }

    pub fn get(&self, session_id: &SessionId) -> Result<SessionSnapshot, AdmissionServiceError> {
        let record = self.load(session_id)?;
        Ok(self.snapshot(&record))
    }

    /// Drop the session and its answers.
    pub fn discard(&self, session_id: &SessionId) -> Result<(), AdmissionServiceError> {
        self.repository
            .remove(session_id)?
            .ok_or(SessionRepositoryError::NotFound)?;
        info!(%session_id, "admission session discarded");
        Ok(())
    }

    /// Gate decision for `step`; `as_of` pins the date used for the age check.
    pub fn next_step(
        &self,
        session_id: &SessionId,
        step: FormStep,
        as_of: Option<NaiveDate>,
    ) -> Result<StepDecision, AdmissionServiceError> {
        let record = self.load(session_id)?;
        let evaluation = self.evaluate_record(record.record(), as_of);
        Ok(StepDecision::from_evaluation(step, &evaluation))
    }

    /// Stateless evaluation of a complete record.
    pub fn evaluate_record(
        &self,
        record: &ApplicantRecord,
        as_of: Option<NaiveDate>,
    ) -> Evaluation {
        match as_of {
            Some(today) => self.validator.evaluate_as_of(record, today),
            None => self.validator.evaluate(record),
        }
    }

    fn load(&self, session_id: &SessionId) -> Result<SessionRecord, AdmissionServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(SessionRepositoryError::NotFound)?;
        Ok(record)
    }

    fn snapshot(&self, record: &SessionRecord) -> SessionSnapshot {
        record.snapshot(self.validator.evaluate(record.record()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Repository(#[from] SessionRepositoryError),
}
