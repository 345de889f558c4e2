//! Admission form answers, field validation and step gating.
//!
//! `FormState` accumulates answers per section, `FieldValidator` evaluates the
//! declarative rule table against them, and the gate functions decide whether
//! the applicant may leave a navigation step.

pub mod domain;
pub mod gate;
pub mod repository;
pub mod router;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AcademicHistory, AcademicHistoryPatch, Address, AddressPatch, ApplicantRecord, Career,
    CareerPatch, Income, IncomePatch, PersonalGeneral, PersonalGeneralPatch, SectionName,
    SectionUpdate, Supplementary, SupplementaryPatch,
};
pub use gate::{can_advance, next_step, previous_step, FormStep};
pub use repository::{
    SessionId, SessionRecord, SessionRepository, SessionRepositoryError, SessionSnapshot,
};
pub use router::{admission_router, EvaluateRequest, StepQuery};
pub use service::{AdmissionService, AdmissionServiceError, StepDecision};
pub use state::{update_section, FormState};
pub use validation::{
    evaluate, evaluate_as_of, Evaluation, FieldKey, FieldReport, FieldStatus, FieldValidator,
    OptionSets, SectionProgressEntry, ValidationConfig,
};
