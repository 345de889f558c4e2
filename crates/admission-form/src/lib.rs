//! University admission form core: typed applicant answers, declarative field
//! validation with progress tracking, step gating and reference catalogs.

pub mod admission;
pub mod catalog;
pub mod config;
pub mod error;
pub mod telemetry;

pub use admission::{
    evaluate, evaluate_as_of, update_section, ApplicantRecord, Evaluation, FieldValidator,
    FormState, FormStep, SectionName, SectionUpdate,
};
pub use catalog::{CatalogEntry, CatalogKind, CatalogService, CatalogSource};
pub use error::AppError;
