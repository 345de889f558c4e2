use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::SectionName;
use super::validation::Evaluation;

/// Navigation pages of the admission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Personal,
    Career,
    AcademicHistory,
}

impl FormStep {
    pub const fn ordered() -> [Self; 3] {
        [Self::Personal, Self::Career, Self::AcademicHistory]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Career => "career",
            Self::AcademicHistory => "academic_history",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal Information",
            Self::Career => "Career",
            Self::AcademicHistory => "Academic History",
        }
    }

    /// Sections rendered on this page.
    pub const fn sections(self) -> &'static [SectionName] {
        match self {
            Self::Personal => &[
                SectionName::PersonalGeneral,
                SectionName::Address,
                SectionName::Supplementary,
                SectionName::Income,
            ],
            Self::Career => &[SectionName::Career],
            Self::AcademicHistory => &[SectionName::AcademicHistory],
        }
    }

    /// Sections that must be valid before leaving this page.
    pub const fn gated_sections(self) -> &'static [SectionName] {
        match self {
            Self::Personal => &[SectionName::PersonalGeneral, SectionName::Address],
            Self::Career => &[SectionName::Career],
            Self::AcademicHistory => &[SectionName::AcademicHistory],
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|step| step.key() == normalized)
    }

    fn position(self) -> usize {
        match self {
            Self::Personal => 0,
            Self::Career => 1,
            Self::AcademicHistory => 2,
        }
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub fn can_advance(step: FormStep, evaluation: &Evaluation) -> bool {
    evaluation.is_step_valid(step)
}

/// The following step when the gate for `step` is open; `None` on the last
/// step or while the gate is closed.
pub fn next_step(step: FormStep, evaluation: &Evaluation) -> Option<FormStep> {
    if !can_advance(step, evaluation) {
        return None;
    }
    FormStep::ordered().get(step.position() + 1).copied()
}

/// Going back is never gated.
pub fn previous_step(step: FormStep) -> Option<FormStep> {
    step.position()
        .checked_sub(1)
        .and_then(|index| FormStep::ordered().get(index).copied())
}
