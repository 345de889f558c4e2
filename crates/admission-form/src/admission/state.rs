use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    contains_option, is_no, is_yes, matches_option, AcademicHistory, AcademicHistoryPatch,
    Address, AddressPatch, ApplicantRecord, Career, CareerPatch, Income, IncomePatch,
    PersonalGeneral, PersonalGeneralPatch, SectionUpdate, Supplementary, SupplementaryPatch, NO,
    NONE_OPTION, OTHER_AWARENESS_CHANNEL, OTHER_DISABILITY, OTHER_LANGUAGES, OTHER_LOCATION,
    OTHER_PREFERENCE_RANK, OTHER_SCHOOL_TYPE, YES,
};
use super::validation::{Evaluation, FieldValidator};

const INCOME_MAX_DIGITS: usize = 5;
const POSTAL_CODE_DIGITS: usize = 5;
const AREA_CODE_DIGITS: usize = 3;
const PHONE_DIGITS: usize = 7;

/// Accumulates an applicant's answers for one form session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    record: ApplicantRecord,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: ApplicantRecord) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &ApplicantRecord {
        &self.record
    }

    pub fn into_record(self) -> ApplicantRecord {
        self.record
    }

    /// Shallow-merge `update` into its section; every other section is left untouched.
    pub fn update_section(&mut self, update: SectionUpdate) -> &ApplicantRecord {
        apply_update(&mut self.record, update);
        &self.record
    }

    pub fn evaluate(&self, validator: &FieldValidator) -> Evaluation {
        validator.evaluate(&self.record)
    }

    pub fn evaluate_as_of(&self, validator: &FieldValidator, today: NaiveDate) -> Evaluation {
        validator.evaluate_as_of(&self.record, today)
    }
}

/// Pure form of [`FormState::update_section`].
pub fn update_section(record: &ApplicantRecord, update: SectionUpdate) -> ApplicantRecord {
    let mut next = record.clone();
    apply_update(&mut next, update);
    next
}

fn apply_update(record: &mut ApplicantRecord, update: SectionUpdate) {
    match update {
        SectionUpdate::PersonalGeneral(patch) => record.personal_general.merge(patch),
        SectionUpdate::Address(patch) => record.address.merge(patch),
        SectionUpdate::Supplementary(patch) => record.supplementary.merge(patch),
        SectionUpdate::Income(patch) => record.income.merge(patch),
        SectionUpdate::Career(patch) => record.career.merge(patch),
        SectionUpdate::AcademicHistory(patch) => record.academic_history.merge(patch),
    }
}

impl PersonalGeneral {
    fn merge(&mut self, patch: PersonalGeneralPatch) {
        let PersonalGeneralPatch {
            first_name,
            first_surname,
            second_surname,
            curp,
            birth_date,
            sex,
            nationality,
            birth_state,
            birth_municipality,
            birth_country,
            foreign_birth_state,
            birth_city,
            civil_status,
            native_language,
            has_children,
        } = patch;

        if changes(&self.birth_state, birth_state.as_deref()) {
            self.birth_municipality = None;
        }

        merge_text(&mut self.first_name, first_name);
        merge_text(&mut self.first_surname, first_surname);
        merge_text(&mut self.second_surname, second_surname);
        merge_upper(&mut self.curp, curp);
        merge_text(&mut self.birth_date, birth_date);
        merge_text(&mut self.sex, sex);
        merge_text(&mut self.nationality, nationality);
        merge_text(&mut self.birth_state, birth_state);
        merge_text(&mut self.birth_municipality, birth_municipality);
        merge_text(&mut self.birth_country, birth_country);
        merge_text(&mut self.foreign_birth_state, foreign_birth_state);
        merge_text(&mut self.birth_city, birth_city);
        merge_text(&mut self.civil_status, civil_status);
        merge_text(&mut self.native_language, native_language);
        merge_flag(&mut self.has_children, has_children);
    }
}

impl Address {
    fn merge(&mut self, patch: AddressPatch) {
        let AddressPatch {
            street,
            exterior_number,
            interior_number,
            neighborhood,
            locality,
            state,
            municipality,
            postal_code,
            email,
        } = patch;

        if changes(&self.state, state.as_deref()) {
            self.municipality = None;
        }

        merge_text(&mut self.street, street);
        merge_text(&mut self.exterior_number, exterior_number);
        merge_text(&mut self.interior_number, interior_number);
        merge_text(&mut self.neighborhood, neighborhood);
        merge_text(&mut self.locality, locality);
        merge_text(&mut self.state, state);
        merge_text(&mut self.municipality, municipality);
        merge_digits(&mut self.postal_code, postal_code, POSTAL_CODE_DIGITS);
        merge_text(&mut self.email, email);
    }
}

impl Supplementary {
    fn merge(&mut self, patch: SupplementaryPatch) {
        let SupplementaryPatch {
            disabilities,
            disability_other,
            parent_indigenous_languages,
            parent_indigenous_languages_other,
            indigenous_languages,
            indigenous_languages_other,
        } = patch;

        merge_selection(&mut self.disabilities, disabilities);
        merge_text(&mut self.disability_other, disability_other);
        merge_selection(
            &mut self.parent_indigenous_languages,
            parent_indigenous_languages,
        );
        merge_text(
            &mut self.parent_indigenous_languages_other,
            parent_indigenous_languages_other,
        );
        merge_selection(&mut self.indigenous_languages, indigenous_languages);
        merge_text(
            &mut self.indigenous_languages_other,
            indigenous_languages_other,
        );

        clear_unless(
            &mut self.disability_other,
            contains_option(&self.disabilities, OTHER_DISABILITY),
        );
        clear_unless(
            &mut self.parent_indigenous_languages_other,
            contains_option(&self.parent_indigenous_languages, OTHER_LANGUAGES),
        );
        clear_unless(
            &mut self.indigenous_languages_other,
            contains_option(&self.indigenous_languages, OTHER_LANGUAGES),
        );
    }
}

impl Income {
    fn merge(&mut self, patch: IncomePatch) {
        let IncomePatch {
            family_income,
            employed,
            job_type,
            area_code,
            phone,
            monthly_income,
            employer,
            position,
            schedule,
        } = patch;

        merge_digits(&mut self.family_income, family_income, INCOME_MAX_DIGITS);
        merge_flag(&mut self.employed, employed);
        merge_text(&mut self.job_type, job_type);
        merge_digits(&mut self.area_code, area_code, AREA_CODE_DIGITS);
        merge_digits(&mut self.phone, phone, PHONE_DIGITS);
        merge_digits(&mut self.monthly_income, monthly_income, INCOME_MAX_DIGITS);
        merge_text(&mut self.employer, employer);
        merge_text(&mut self.position, position);
        merge_text(&mut self.schedule, schedule);
    }
}

impl Career {
    fn merge(&mut self, patch: CareerPatch) {
        let CareerPatch {
            desired_program,
            awareness_channel,
            awareness_channel_other,
            preference_rank,
            preference_rank_other,
        } = patch;

        merge_text(&mut self.desired_program, desired_program);
        merge_text(&mut self.awareness_channel, awareness_channel);
        merge_text(&mut self.awareness_channel_other, awareness_channel_other);
        merge_text(&mut self.preference_rank, preference_rank);
        merge_text(&mut self.preference_rank_other, preference_rank_other);

        clear_unless(
            &mut self.awareness_channel_other,
            matches_option(self.awareness_channel.as_deref(), OTHER_AWARENESS_CHANNEL),
        );
        clear_unless(
            &mut self.preference_rank_other,
            matches_option(self.preference_rank.as_deref(), OTHER_PREFERENCE_RANK),
        );
    }
}

impl AcademicHistory {
    fn merge(&mut self, patch: AcademicHistoryPatch) {
        let AcademicHistoryPatch {
            school_type,
            school_type_other,
            school_name,
            school_code,
            school_code_confirmation,
            state,
            state_other,
            municipality,
            municipality_other,
            gpa,
            has_scholarship,
            scholarship_name,
        } = patch;

        // Dependent answers reset before the patch lands so the patch can refill them.
        if changes(&self.school_type, school_type.as_deref()) {
            self.school_name = None;
        }
        if changes(&self.state, state.as_deref()) {
            self.municipality = None;
            self.state_other = None;
            self.municipality_other = None;
        }

        merge_text(&mut self.school_type, school_type);
        merge_text(&mut self.school_type_other, school_type_other);
        merge_text(&mut self.school_name, school_name);
        merge_upper(&mut self.school_code, school_code);
        merge_upper(&mut self.school_code_confirmation, school_code_confirmation);
        merge_text(&mut self.state, state);
        merge_text(&mut self.state_other, state_other);
        merge_text(&mut self.municipality, municipality);
        merge_text(&mut self.municipality_other, municipality_other);
        merge_text(&mut self.gpa, gpa);
        merge_flag(&mut self.has_scholarship, has_scholarship);
        merge_text(&mut self.scholarship_name, scholarship_name);

        clear_unless(
            &mut self.school_type_other,
            matches_option(self.school_type.as_deref(), OTHER_SCHOOL_TYPE),
        );
        clear_unless(
            &mut self.state_other,
            matches_option(self.state.as_deref(), OTHER_LOCATION),
        );
        clear_unless(
            &mut self.municipality_other,
            matches_option(self.municipality.as_deref(), OTHER_LOCATION),
        );
        if is_no(self.has_scholarship.as_deref()) {
            self.scholarship_name = None;
        }
    }
}

fn clean(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn changes(current: &Option<String>, incoming: Option<&str>) -> bool {
    match incoming {
        Some(raw) => clean(raw) != current.as_deref(),
        None => false,
    }
}

fn merge_text(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(raw) = incoming {
        *slot = clean(&raw).map(str::to_string);
    }
}

fn merge_upper(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(raw) = incoming {
        *slot = clean(&raw).map(str::to_uppercase);
    }
}

fn merge_digits(slot: &mut Option<String>, incoming: Option<String>, max_len: usize) {
    if let Some(raw) = incoming {
        let digits: String = raw
            .chars()
            .filter(char::is_ascii_digit)
            .take(max_len)
            .collect();
        *slot = (!digits.is_empty()).then_some(digits);
    }
}

fn merge_flag(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(raw) = incoming {
        *slot = clean(&raw).map(|value| {
            if is_yes(Some(value)) {
                YES.to_string()
            } else if is_no(Some(value)) {
                NO.to_string()
            } else {
                value.to_string()
            }
        });
    }
}

fn merge_selection(slot: &mut Vec<String>, incoming: Option<Vec<String>>) {
    if let Some(values) = incoming {
        *slot = normalize_selection(values);
    }
}

/// De-duplicates a multi-select list and keeps `Ninguna` exclusive: picking it
/// last wins over every other option, picking anything after it drops it.
/// Both comparisons ignore case.
fn normalize_selection(values: Vec<String>) -> Vec<String> {
    let cleaned: Vec<&str> = values.iter().filter_map(|value| clean(value)).collect();

    if matches_option(cleaned.last().copied(), NONE_OPTION) {
        return vec![NONE_OPTION.to_string()];
    }

    let mut selection: Vec<String> = Vec::with_capacity(cleaned.len());
    for value in cleaned {
        if matches_option(Some(value), NONE_OPTION)
            || selection
                .iter()
                .any(|existing| matches_option(Some(existing.as_str()), value))
        {
            continue;
        }
        selection.push(value.to_string());
    }
    selection
}

fn clear_unless(slot: &mut Option<String>, keep: bool) {
    if !keep {
        *slot = None;
    }
}
