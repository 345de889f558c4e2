use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exclusive "no selection applies" option in multi-select lists.
pub const NONE_OPTION: &str = "Ninguna";
pub const OTHER_DISABILITY: &str = "Otro";
pub const OTHER_LANGUAGES: &str = "Otro o varias";
pub const OTHER_AWARENESS_CHANNEL: &str = "Otro";
pub const OTHER_PREFERENCE_RANK: &str = "Otra";
pub const OTHER_SCHOOL_TYPE: &str = "Otra";
/// Sentinel used by the academic state/municipality selectors.
pub const OTHER_LOCATION: &str = "otro";

pub const NATIONALITY_MEXICAN: &str = "mexicana";
pub const NATIONALITY_FOREIGN: &str = "extranjera";

pub const YES: &str = "si";
pub const NO: &str = "no";

pub const SEX_OPTIONS: &[&str] = &["masculino", "femenino", "otro"];
pub const JOB_TYPES: &[&str] = &["temporal", "permanente"];

pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// The six groupings of the applicant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionName {
    PersonalGeneral,
    Address,
    Supplementary,
    Income,
    Career,
    AcademicHistory,
}

impl SectionName {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::PersonalGeneral,
            Self::Address,
            Self::Supplementary,
            Self::Income,
            Self::Career,
            Self::AcademicHistory,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PersonalGeneral => "personal_general",
            Self::Address => "address",
            Self::Supplementary => "supplementary",
            Self::Income => "income",
            Self::Career => "career",
            Self::AcademicHistory => "academic_history",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalGeneral => "Personal Data",
            Self::Address => "Address",
            Self::Supplementary => "Supplementary Information",
            Self::Income => "Income",
            Self::Career => "Career Choice",
            Self::AcademicHistory => "Academic History",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|section| section.key() == normalized)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalGeneral {
    pub first_name: Option<String>,
    pub first_surname: Option<String>,
    pub second_surname: Option<String>,
    pub curp: Option<String>,
    /// Calendar date formatted as `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    pub sex: Option<String>,
    pub nationality: Option<String>,
    pub birth_state: Option<String>,
    pub birth_municipality: Option<String>,
    pub birth_country: Option<String>,
    pub foreign_birth_state: Option<String>,
    pub birth_city: Option<String>,
    pub civil_status: Option<String>,
    pub native_language: Option<String>,
    pub has_children: Option<String>,
}

impl PersonalGeneral {
    pub fn birth_date_parsed(&self) -> Option<NaiveDate> {
        self.birth_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT).ok())
    }

    /// Completed years between the birth date and `today`; `None` when the
    /// date is missing, malformed, or in the future.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date_parsed()
            .and_then(|birth| today.years_since(birth))
    }

    pub fn is_mexican(&self) -> bool {
        matches_option(self.nationality.as_deref(), NATIONALITY_MEXICAN)
    }

    pub fn is_foreign(&self) -> bool {
        matches_option(self.nationality.as_deref(), NATIONALITY_FOREIGN)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: Option<String>,
    pub exterior_number: Option<String>,
    pub interior_number: Option<String>,
    pub neighborhood: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub municipality: Option<String>,
    pub postal_code: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Supplementary {
    pub disabilities: Vec<String>,
    pub disability_other: Option<String>,
    pub parent_indigenous_languages: Vec<String>,
    pub parent_indigenous_languages_other: Option<String>,
    pub indigenous_languages: Vec<String>,
    pub indigenous_languages_other: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Income {
    pub family_income: Option<String>,
    pub employed: Option<String>,
    pub job_type: Option<String>,
    pub area_code: Option<String>,
    pub phone: Option<String>,
    pub monthly_income: Option<String>,
    pub employer: Option<String>,
    pub position: Option<String>,
    pub schedule: Option<String>,
}

impl Income {
    pub fn is_employed(&self) -> bool {
        is_yes(self.employed.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Career {
    pub desired_program: Option<String>,
    pub awareness_channel: Option<String>,
    pub awareness_channel_other: Option<String>,
    pub preference_rank: Option<String>,
    pub preference_rank_other: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicHistory {
    pub school_type: Option<String>,
    pub school_type_other: Option<String>,
    pub school_name: Option<String>,
    /// CCT facility code.
    pub school_code: Option<String>,
    pub school_code_confirmation: Option<String>,
    pub state: Option<String>,
    pub state_other: Option<String>,
    pub municipality: Option<String>,
    pub municipality_other: Option<String>,
    pub gpa: Option<String>,
    pub has_scholarship: Option<String>,
    pub scholarship_name: Option<String>,
}

impl AcademicHistory {
    pub fn gpa_value(&self) -> Option<f64> {
        self.gpa
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }

    pub fn has_scholarship(&self) -> bool {
        is_yes(self.has_scholarship.as_deref())
    }
}

/// Applicant answers for a single form session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantRecord {
    pub personal_general: PersonalGeneral,
    pub address: Address,
    pub supplementary: Supplementary,
    pub income: Income,
    pub career: Career,
    pub academic_history: AcademicHistory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersonalGeneralPatch {
    pub first_name: Option<String>,
    pub first_surname: Option<String>,
    pub second_surname: Option<String>,
    pub curp: Option<String>,
    pub birth_date: Option<String>,
    pub sex: Option<String>,
    pub nationality: Option<String>,
    pub birth_state: Option<String>,
    pub birth_municipality: Option<String>,
    pub birth_country: Option<String>,
    pub foreign_birth_state: Option<String>,
    pub birth_city: Option<String>,
    pub civil_status: Option<String>,
    pub native_language: Option<String>,
    pub has_children: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub exterior_number: Option<String>,
    pub interior_number: Option<String>,
    pub neighborhood: Option<String>,
    pub locality: Option<String>,
    pub state: Option<String>,
    pub municipality: Option<String>,
    pub postal_code: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupplementaryPatch {
    pub disabilities: Option<Vec<String>>,
    pub disability_other: Option<String>,
    pub parent_indigenous_languages: Option<Vec<String>>,
    pub parent_indigenous_languages_other: Option<String>,
    pub indigenous_languages: Option<Vec<String>>,
    pub indigenous_languages_other: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncomePatch {
    pub family_income: Option<String>,
    pub employed: Option<String>,
    pub job_type: Option<String>,
    pub area_code: Option<String>,
    pub phone: Option<String>,
    pub monthly_income: Option<String>,
    pub employer: Option<String>,
    pub position: Option<String>,
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CareerPatch {
    pub desired_program: Option<String>,
    pub awareness_channel: Option<String>,
    pub awareness_channel_other: Option<String>,
    pub preference_rank: Option<String>,
    pub preference_rank_other: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcademicHistoryPatch {
    pub school_type: Option<String>,
    pub school_type_other: Option<String>,
    pub school_name: Option<String>,
    pub school_code: Option<String>,
    pub school_code_confirmation: Option<String>,
    pub state: Option<String>,
    pub state_other: Option<String>,
    pub municipality: Option<String>,
    pub municipality_other: Option<String>,
    pub gpa: Option<String>,
    pub has_scholarship: Option<String>,
    pub scholarship_name: Option<String>,
}

/// Partial answers for exactly one section. `Some("")` clears a text field;
/// `None` leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section", content = "fields", rename_all = "snake_case")]
pub enum SectionUpdate {
    PersonalGeneral(PersonalGeneralPatch),
    Address(AddressPatch),
    Supplementary(SupplementaryPatch),
    Income(IncomePatch),
    Career(CareerPatch),
    AcademicHistory(AcademicHistoryPatch),
}

impl SectionUpdate {
    pub const fn section(&self) -> SectionName {
        match self {
            Self::PersonalGeneral(_) => SectionName::PersonalGeneral,
            Self::Address(_) => SectionName::Address,
            Self::Supplementary(_) => SectionName::Supplementary,
            Self::Income(_) => SectionName::Income,
            Self::Career(_) => SectionName::Career,
            Self::AcademicHistory(_) => SectionName::AcademicHistory,
        }
    }
}

/// Case-insensitive comparison against a sentinel or option value.
pub fn matches_option(value: Option<&str>, expected: &str) -> bool {
    value
        .map(|value| value.trim().to_lowercase() == expected.to_lowercase())
        .unwrap_or(false)
}

pub fn is_yes(value: Option<&str>) -> bool {
    matches!(
        value.map(|value| value.trim().to_lowercase()).as_deref(),
        Some("si" | "sí" | "yes")
    )
}

pub fn is_no(value: Option<&str>) -> bool {
    matches_option(value, NO)
}

pub fn contains_option(values: &[String], expected: &str) -> bool {
    values
        .iter()
        .any(|value| matches_option(Some(value), expected))
}
