use serde::{Serialize, Serializer};
use std::fmt;

use super::super::domain::{
    contains_option, is_yes, matches_option, ApplicantRecord, SectionName, JOB_TYPES,
    OTHER_AWARENESS_CHANNEL, OTHER_DISABILITY, OTHER_LANGUAGES, OTHER_LOCATION,
    OTHER_PREFERENCE_RANK, OTHER_SCHOOL_TYPE, SEX_OPTIONS,
};
use super::checks::Check;

const PLACE_MAX_LEN: usize = 50;

/// `section.field` address of one answer in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldKey {
    pub section: SectionName,
    pub name: &'static str,
}

impl FieldKey {
    pub const fn new(section: SectionName, name: &'static str) -> Self {
        Self { section, name }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section.key(), self.name)
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Borrowed view of a field's current answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    List(&'a [String]),
}

impl FieldValue<'_> {
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.map(|v| !v.trim().is_empty()).unwrap_or(false),
            FieldValue::List(values) => !values.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Requirement {
    Always,
    When(fn(&ApplicantRecord) -> bool),
    Optional,
}

impl Requirement {
    pub fn is_active(&self, record: &ApplicantRecord) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::When(predicate) => predicate(record),
            Requirement::Optional => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: FieldKey,
    pub label: &'static str,
    pub requirement: Requirement,
    pub read: for<'a> fn(&'a ApplicantRecord) -> FieldValue<'a>,
    pub check: Check,
}

/// Ordered collection of every field rule, grouped by section.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<FieldRule>,
}

impl RuleTable {
    pub fn standard() -> Self {
        Self {
            rules: standard_field_rules(),
        }
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rules_for_section(&self, section: SectionName) -> Vec<&FieldRule> {
        self.rules
            .iter()
            .filter(|rule| rule.key.section == section)
            .collect()
    }

    pub fn find(&self, key: FieldKey) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.key == key)
    }
}

fn text(value: &Option<String>) -> FieldValue<'_> {
    FieldValue::Text(value.as_deref())
}

fn is_mexican(record: &ApplicantRecord) -> bool {
    record.personal_general.is_mexican()
}

fn is_foreign(record: &ApplicantRecord) -> bool {
    record.personal_general.is_foreign()
}

fn is_employed(record: &ApplicantRecord) -> bool {
    record.income.is_employed()
}

fn standard_field_rules() -> Vec<FieldRule> {
    use SectionName::{AcademicHistory, Address, Career, Income, PersonalGeneral, Supplementary};

    vec![
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "first_name"),
            label: "First name",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.first_name),
            check: Check::PersonName,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "first_surname"),
            label: "First surname",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.first_surname),
            check: Check::PersonName,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "second_surname"),
            label: "Second surname",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.second_surname),
            check: Check::PersonName,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "curp"),
            label: "CURP",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.curp),
            check: Check::Curp,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "birth_date"),
            label: "Birth date",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.birth_date),
            check: Check::BirthDate,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "sex"),
            label: "Sex",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.sex),
            check: Check::OneOf(SEX_OPTIONS),
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "nationality"),
            label: "Nationality",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.nationality),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "birth_state"),
            label: "State of birth",
            requirement: Requirement::When(is_mexican),
            read: |r| text(&r.personal_general.birth_state),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "birth_municipality"),
            label: "Municipality of birth",
            requirement: Requirement::When(is_mexican),
            read: |r| text(&r.personal_general.birth_municipality),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "birth_country"),
            label: "Country of birth",
            requirement: Requirement::When(is_foreign),
            read: |r| text(&r.personal_general.birth_country),
            check: Check::PlaceName {
                max_len: PLACE_MAX_LEN,
            },
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "foreign_birth_state"),
            label: "State or province of birth",
            requirement: Requirement::Optional,
            read: |r| text(&r.personal_general.foreign_birth_state),
            check: Check::PlaceName {
                max_len: PLACE_MAX_LEN,
            },
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "birth_city"),
            label: "City of birth",
            requirement: Requirement::When(is_foreign),
            read: |r| text(&r.personal_general.birth_city),
            check: Check::PlaceName {
                max_len: PLACE_MAX_LEN,
            },
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "civil_status"),
            label: "Civil status",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.civil_status),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "native_language"),
            label: "Native language",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.native_language),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(PersonalGeneral, "has_children"),
            label: "Has children",
            requirement: Requirement::Always,
            read: |r| text(&r.personal_general.has_children),
            check: Check::YesNo,
        },
        FieldRule {
            key: FieldKey::new(Address, "street"),
            label: "Street",
            requirement: Requirement::Always,
            read: |r| text(&r.address.street),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Address, "exterior_number"),
            label: "Exterior number",
            requirement: Requirement::Always,
            read: |r| text(&r.address.exterior_number),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Address, "interior_number"),
            label: "Interior number",
            requirement: Requirement::Optional,
            read: |r| text(&r.address.interior_number),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Address, "neighborhood"),
            label: "Neighborhood",
            requirement: Requirement::Always,
            read: |r| text(&r.address.neighborhood),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Address, "locality"),
            label: "Locality",
            requirement: Requirement::Optional,
            read: |r| text(&r.address.locality),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Address, "state"),
            label: "State",
            requirement: Requirement::Always,
            read: |r| text(&r.address.state),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Address, "municipality"),
            label: "Municipality",
            requirement: Requirement::Always,
            read: |r| text(&r.address.municipality),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Address, "postal_code"),
            label: "Postal code",
            requirement: Requirement::Always,
            read: |r| text(&r.address.postal_code),
            check: Check::Digits { len: 5 },
        },
        FieldRule {
            key: FieldKey::new(Address, "email"),
            label: "Email",
            requirement: Requirement::Always,
            read: |r| text(&r.address.email),
            check: Check::Email,
        },
        FieldRule {
            key: FieldKey::new(Supplementary, "disabilities"),
            label: "Disabilities",
            requirement: Requirement::Always,
            read: |r| FieldValue::List(&r.supplementary.disabilities),
            check: Check::AnySelected,
        },
        FieldRule {
            key: FieldKey::new(Supplementary, "disability_other"),
            label: "Other disability",
            requirement: Requirement::When(|r| {
                contains_option(&r.supplementary.disabilities, OTHER_DISABILITY)
            }),
            read: |r| text(&r.supplementary.disability_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Supplementary, "parent_indigenous_languages"),
            label: "Parents' indigenous languages",
            requirement: Requirement::Always,
            read: |r| FieldValue::List(&r.supplementary.parent_indigenous_languages),
            check: Check::AnySelected,
        },
        FieldRule {
            key: FieldKey::new(Supplementary, "parent_indigenous_languages_other"),
            label: "Parents' other indigenous languages",
            requirement: Requirement::When(|r| {
                contains_option(&r.supplementary.parent_indigenous_languages, OTHER_LANGUAGES)
            }),
            read: |r| text(&r.supplementary.parent_indigenous_languages_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Supplementary, "indigenous_languages"),
            label: "Indigenous languages spoken",
            requirement: Requirement::Always,
            read: |r| FieldValue::List(&r.supplementary.indigenous_languages),
            check: Check::AnySelected,
        },
        FieldRule {
            key: FieldKey::new(Supplementary, "indigenous_languages_other"),
            label: "Other indigenous languages spoken",
            requirement: Requirement::When(|r| {
                contains_option(&r.supplementary.indigenous_languages, OTHER_LANGUAGES)
            }),
            read: |r| text(&r.supplementary.indigenous_languages_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Income, "family_income"),
            label: "Monthly family income",
            requirement: Requirement::Always,
            read: |r| text(&r.income.family_income),
            check: Check::DigitsUpTo { max_len: 5 },
        },
        FieldRule {
            key: FieldKey::new(Income, "employed"),
            label: "Currently employed",
            requirement: Requirement::Always,
            read: |r| text(&r.income.employed),
            check: Check::YesNo,
        },
        FieldRule {
            key: FieldKey::new(Income, "job_type"),
            label: "Job type",
            requirement: Requirement::When(is_employed),
            read: |r| text(&r.income.job_type),
            check: Check::OneOf(JOB_TYPES),
        },
        FieldRule {
            key: FieldKey::new(Income, "area_code"),
            label: "Work phone area code",
            requirement: Requirement::When(is_employed),
            read: |r| text(&r.income.area_code),
            check: Check::Digits { len: 3 },
        },
        FieldRule {
            key: FieldKey::new(Income, "phone"),
            label: "Work phone",
            requirement: Requirement::When(is_employed),
            read: |r| text(&r.income.phone),
            check: Check::Digits { len: 7 },
        },
        FieldRule {
            key: FieldKey::new(Income, "monthly_income"),
            label: "Monthly income",
            requirement: Requirement::When(is_employed),
            read: |r| text(&r.income.monthly_income),
            check: Check::DigitsUpTo { max_len: 5 },
        },
        FieldRule {
            key: FieldKey::new(Income, "employer"),
            label: "Employer",
            requirement: Requirement::When(is_employed),
            read: |r| text(&r.income.employer),
            check: Check::Length { min: 5, max: 50 },
        },
        FieldRule {
            key: FieldKey::new(Income, "position"),
            label: "Position",
            requirement: Requirement::When(is_employed),
            read: |r| text(&r.income.position),
            check: Check::Length { min: 1, max: 50 },
        },
        FieldRule {
            key: FieldKey::new(Income, "schedule"),
            label: "Work schedule",
            requirement: Requirement::When(is_employed),
            read: |r| text(&r.income.schedule),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Career, "desired_program"),
            label: "Desired program",
            requirement: Requirement::Always,
            read: |r| text(&r.career.desired_program),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Career, "awareness_channel"),
            label: "How did you hear about us",
            requirement: Requirement::Always,
            read: |r| text(&r.career.awareness_channel),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Career, "awareness_channel_other"),
            label: "Other channel",
            requirement: Requirement::When(|r| {
                matches_option(r.career.awareness_channel.as_deref(), OTHER_AWARENESS_CHANNEL)
            }),
            read: |r| text(&r.career.awareness_channel_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Career, "preference_rank"),
            label: "Preference rank",
            requirement: Requirement::Always,
            read: |r| text(&r.career.preference_rank),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(Career, "preference_rank_other"),
            label: "Other preference",
            requirement: Requirement::When(|r| {
                matches_option(r.career.preference_rank.as_deref(), OTHER_PREFERENCE_RANK)
            }),
            read: |r| text(&r.career.preference_rank_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "school_type"),
            label: "High school type",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.school_type),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "school_type_other"),
            label: "Other high school type",
            requirement: Requirement::When(|r| {
                matches_option(r.academic_history.school_type.as_deref(), OTHER_SCHOOL_TYPE)
            }),
            read: |r| text(&r.academic_history.school_type_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "school_name"),
            label: "High school name",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.school_name),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "school_code"),
            label: "School code (CCT)",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.school_code),
            check: Check::Alphanumeric { len: 10 },
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "school_code_confirmation"),
            label: "Confirm school code",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.school_code_confirmation),
            check: Check::Matches {
                other: |r| r.academic_history.school_code.as_deref(),
                message: "School codes do not match",
            },
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "state"),
            label: "School state",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.state),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "state_other"),
            label: "Other school state",
            requirement: Requirement::When(|r| {
                matches_option(r.academic_history.state.as_deref(), OTHER_LOCATION)
            }),
            read: |r| text(&r.academic_history.state_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "municipality"),
            label: "School municipality",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.municipality),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "municipality_other"),
            label: "Other school municipality",
            requirement: Requirement::When(|r| {
                matches_option(r.academic_history.municipality.as_deref(), OTHER_LOCATION)
            }),
            read: |r| text(&r.academic_history.municipality_other),
            check: Check::Present,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "gpa"),
            label: "GPA",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.gpa),
            check: Check::Gpa,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "has_scholarship"),
            label: "Had a scholarship",
            requirement: Requirement::Always,
            read: |r| text(&r.academic_history.has_scholarship),
            check: Check::YesNo,
        },
        FieldRule {
            key: FieldKey::new(AcademicHistory, "scholarship_name"),
            label: "Scholarship name",
            requirement: Requirement::When(|r| is_yes(r.academic_history.has_scholarship.as_deref())),
            read: |r| text(&r.academic_history.scholarship_name),
            check: Check::Present,
        },
    ]
}
