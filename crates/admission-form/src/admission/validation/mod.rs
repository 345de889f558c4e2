mod checks;
mod rules;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::domain::{ApplicantRecord, SectionName};
use super::gate::FormStep;
use checks::CheckContext;

pub use checks::Check;
pub use rules::{FieldKey, FieldRule, FieldValue, Requirement, RuleTable};

/// Tunable thresholds used by the rule checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub minimum_age: u32,
    pub gpa_min: f64,
    pub gpa_max: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            minimum_age: 15,
            gpa_min: 6.0,
            gpa_max: 10.0,
        }
    }
}

/// Allowed values for select fields, usually derived from catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSets {
    sets: BTreeMap<FieldKey, Vec<String>>,
}

impl OptionSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, options: Vec<String>) {
        self.sets.insert(key, options);
    }

    pub fn with(mut self, key: FieldKey, options: Vec<String>) -> Self {
        self.insert(key, options);
        self
    }

    pub fn get(&self, key: FieldKey) -> Option<&[String]> {
        self.sets.get(&key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldStatus {
    Valid,
    Invalid {
        message: String,
    },
    /// Not required under the current answers; carries a message when a
    /// supplied value still fails its shape check.
    Inactive {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldStatus::Valid)
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, FieldStatus::Inactive { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            FieldStatus::Valid => None,
            FieldStatus::Invalid { message } => Some(message),
            FieldStatus::Inactive { message } => message.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldReport {
    pub key: FieldKey,
    pub label: &'static str,
    #[serde(flatten)]
    pub status: FieldStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionProgressEntry {
    pub section: SectionName,
    pub label: &'static str,
    pub valid_fields: usize,
    pub required_fields: usize,
    pub is_valid: bool,
}

/// Result of running every rule against one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub section_valid: BTreeMap<SectionName, bool>,
    pub step_valid: BTreeMap<FormStep, bool>,
    pub completion_percent: u8,
    pub valid_fields: usize,
    pub required_fields: usize,
    pub fields: Vec<FieldReport>,
}

impl Evaluation {
    pub fn is_section_valid(&self, section: SectionName) -> bool {
        self.section_valid.get(&section).copied().unwrap_or(false)
    }

    pub fn is_step_valid(&self, step: FormStep) -> bool {
        self.step_valid.get(&step).copied().unwrap_or(false)
    }

    pub fn field(&self, key: FieldKey) -> Option<&FieldReport> {
        self.fields.iter().find(|report| report.key == key)
    }

    pub fn status(&self, section: SectionName, name: &str) -> Option<&FieldStatus> {
        self.fields
            .iter()
            .find(|report| report.key.section == section && report.key.name == name)
            .map(|report| &report.status)
    }

    /// Messages keyed by `section.field` for every field that reports one.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|report| {
                report
                    .status
                    .message()
                    .map(|message| (report.key.to_string(), message.to_string()))
            })
            .collect()
    }

    pub fn section_progress(&self) -> Vec<SectionProgressEntry> {
        SectionName::ordered()
            .into_iter()
            .map(|section| {
                let active = self
                    .fields
                    .iter()
                    .filter(|report| report.key.section == section && report.status.is_active());
                let (valid_fields, required_fields) =
                    active.fold((0, 0), |(valid, total), report| {
                        (valid + usize::from(report.status.is_valid()), total + 1)
                    });
                SectionProgressEntry {
                    section,
                    label: section.label(),
                    valid_fields,
                    required_fields,
                    is_valid: self.is_section_valid(section),
                }
            })
            .collect()
    }
}

/// Evaluates the declarative rule table against applicant records.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    rules: RuleTable,
    config: ValidationConfig,
    options: OptionSets,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl FieldValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            rules: RuleTable::standard(),
            config,
            options: OptionSets::default(),
        }
    }

    pub fn with_options(mut self, options: OptionSets) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn options(&self) -> &OptionSets {
        &self.options
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Status of a single field, or `None` for an unknown key.
    pub fn validate_field(
        &self,
        key: FieldKey,
        record: &ApplicantRecord,
        today: NaiveDate,
    ) -> Option<FieldStatus> {
        self.rules
            .find(key)
            .map(|rule| self.check_rule(rule, record, today))
    }

    pub fn evaluate(&self, record: &ApplicantRecord) -> Evaluation {
        self.evaluate_as_of(record, Local::now().date_naive())
    }

    pub fn evaluate_as_of(&self, record: &ApplicantRecord, today: NaiveDate) -> Evaluation {
        let fields: Vec<FieldReport> = self
            .rules
            .rules()
            .iter()
            .map(|rule| FieldReport {
                key: rule.key,
                label: rule.label,
                status: self.check_rule(rule, record, today),
            })
            .collect();

        let mut section_valid: BTreeMap<SectionName, bool> = SectionName::ordered()
            .into_iter()
            .map(|section| (section, true))
            .collect();
        let mut valid_fields = 0;
        let mut required_fields = 0;

        for report in fields.iter().filter(|report| report.status.is_active()) {
            required_fields += 1;
            if report.status.is_valid() {
                valid_fields += 1;
            } else {
                section_valid.insert(report.key.section, false);
            }
        }

        let step_valid = FormStep::ordered()
            .into_iter()
            .map(|step| {
                let open = step
                    .gated_sections()
                    .iter()
                    .all(|section| section_valid.get(section).copied().unwrap_or(false));
                (step, open)
            })
            .collect();

        Evaluation {
            section_valid,
            step_valid,
            completion_percent: completion_percent(valid_fields, required_fields),
            valid_fields,
            required_fields,
            fields,
        }
    }

    fn check_rule(&self, rule: &FieldRule, record: &ApplicantRecord, today: NaiveDate) -> FieldStatus {
        let value = (rule.read)(record);
        let ctx = CheckContext {
            record,
            today,
            config: &self.config,
            options: self.options.get(rule.key),
        };

        if rule.requirement.is_active(record) {
            if !value.is_present() {
                return FieldStatus::Invalid {
                    message: rule.check.missing_message().to_string(),
                };
            }
            match rule.check.verify(value, &ctx) {
                Ok(()) => FieldStatus::Valid,
                Err(message) => FieldStatus::Invalid { message },
            }
        } else {
            let message = if value.is_present() {
                rule.check.verify(value, &ctx).err()
            } else {
                None
            };
            FieldStatus::Inactive { message }
        }
    }
}

/// Evaluates `record` with the default thresholds and no option sets.
pub fn evaluate(record: &ApplicantRecord) -> Evaluation {
    FieldValidator::default().evaluate(record)
}

pub fn evaluate_as_of(record: &ApplicantRecord, today: NaiveDate) -> Evaluation {
    FieldValidator::default().evaluate_as_of(record, today)
}

fn completion_percent(valid: usize, required: usize) -> u8 {
    if required == 0 {
        return 100;
    }
    let percent = (valid as f64 / required as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}
