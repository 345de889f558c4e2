use super::common::*;
use crate::admission::domain::{
    AcademicHistoryPatch, AddressPatch, ApplicantRecord, CareerPatch, IncomePatch, PersonalGeneralPatch,
    SectionName, SectionUpdate, SupplementaryPatch,
};
use crate::admission::state::{update_section, FormState};
use crate::admission::validation::FieldValidator;

#[test]
fn update_only_touches_the_named_section() {
    let record = complete_record();
    let next = update_section(
        &record,
        SectionUpdate::Career(CareerPatch {
            desired_program: Some("Licenciatura en Turismo".to_string()),
            ..CareerPatch::default()
        }),
    );

    assert_eq!(
        next.career.desired_program.as_deref(),
        Some("Licenciatura en Turismo")
    );
    assert_eq!(next.career.awareness_channel, record.career.awareness_channel);
    assert_eq!(next.personal_general, record.personal_general);
    assert_eq!(next.address, record.address);
    assert_eq!(next.academic_history, record.academic_history);
    assert_eq!(record.career.desired_program.as_deref(), Some("Ingeniería en Mecatrónica"));
}

#[test]
fn blank_values_clear_and_codes_are_uppercased() {
    let mut state = FormState::from_record(complete_record());
    state.update_section(SectionUpdate::PersonalGeneral(PersonalGeneralPatch {
        second_surname: Some("   ".to_string()),
        curp: Some(" gorm040512mmsmzra9 ".to_string()),
        ..PersonalGeneralPatch::default()
    }));

    let personal = &state.record().personal_general;
    assert_eq!(personal.second_surname, None);
    assert_eq!(personal.curp.as_deref(), Some("GORM040512MMSMZRA9"));
    assert_eq!(personal.first_name.as_deref(), Some("María José"));
}

#[test]
fn digit_fields_are_sanitized_on_merge() {
    let record = update_section(
        &ApplicantRecord::default(),
        SectionUpdate::Income(IncomePatch {
            family_income: Some("$12,500.00".to_string()),
            employed: Some("Sí".to_string()),
            area_code: Some("(777)".to_string()),
            phone: Some("123-45-678".to_string()),
            ..IncomePatch::default()
        }),
    );

    assert_eq!(record.income.family_income.as_deref(), Some("12500"));
    assert_eq!(record.income.employed.as_deref(), Some("si"));
    assert_eq!(record.income.area_code.as_deref(), Some("777"));
    assert_eq!(record.income.phone.as_deref(), Some("1234567"));
}

#[test]
fn none_option_is_exclusive_in_multi_selects() {
    let mut state = FormState::new();
    state.update_section(SectionUpdate::Supplementary(SupplementaryPatch {
        disabilities: Some(vec!["Visual".to_string(), "Ninguna".to_string()]),
        indigenous_languages: Some(vec![
            "ninguna".to_string(),
            "Náhuatl".to_string(),
            "náhuatl".to_string(),
        ]),
        ..SupplementaryPatch::default()
    }));

    let supplementary = &state.record().supplementary;
    assert_eq!(supplementary.disabilities, vec!["Ninguna".to_string()]);
    assert_eq!(supplementary.indigenous_languages, vec!["Náhuatl".to_string()]);
}

#[test]
fn companions_clear_when_the_sentinel_goes_away() {
    let mut state = FormState::new();
    state.update_section(SectionUpdate::Supplementary(SupplementaryPatch {
        disabilities: Some(vec!["Otro".to_string()]),
        disability_other: Some("Daltonismo".to_string()),
        ..SupplementaryPatch::default()
    }));
    assert_eq!(
        state.record().supplementary.disability_other.as_deref(),
        Some("Daltonismo")
    );

    state.update_section(SectionUpdate::Supplementary(SupplementaryPatch {
        disabilities: Some(vec!["Visual".to_string()]),
        ..SupplementaryPatch::default()
    }));
    assert_eq!(state.record().supplementary.disability_other, None);

    state.update_section(SectionUpdate::Career(CareerPatch {
        awareness_channel: Some("Otro".to_string()),
        awareness_channel_other: Some("Podcast".to_string()),
        ..CareerPatch::default()
    }));
    state.update_section(SectionUpdate::Career(CareerPatch {
        awareness_channel: Some("Radio".to_string()),
        ..CareerPatch::default()
    }));
    assert_eq!(state.record().career.awareness_channel_other, None);
}

#[test]
fn changing_the_school_state_resets_dependent_answers() {
    let mut state = FormState::from_record(complete_record());
    state.update_section(SectionUpdate::AcademicHistory(AcademicHistoryPatch {
        state: Some("Puebla".to_string()),
        ..AcademicHistoryPatch::default()
    }));

    let academic = &state.record().academic_history;
    assert_eq!(academic.state.as_deref(), Some("Puebla"));
    assert_eq!(academic.municipality, None);

    // Re-sending the same state keeps the municipality.
    state.update_section(SectionUpdate::AcademicHistory(AcademicHistoryPatch {
        municipality: Some("Atlixco".to_string()),
        ..AcademicHistoryPatch::default()
    }));
    state.update_section(SectionUpdate::AcademicHistory(AcademicHistoryPatch {
        state: Some("Puebla".to_string()),
        ..AcademicHistoryPatch::default()
    }));
    assert_eq!(
        state.record().academic_history.municipality.as_deref(),
        Some("Atlixco")
    );
}

#[test]
fn changing_a_state_clears_the_municipality_chosen_under_it() {
    let mut state = FormState::from_record(complete_record());
    state.update_section(SectionUpdate::Address(AddressPatch {
        state: Some("Jalisco".to_string()),
        ..AddressPatch::default()
    }));
    state.update_section(SectionUpdate::PersonalGeneral(PersonalGeneralPatch {
        birth_state: Some("Jalisco".to_string()),
        ..PersonalGeneralPatch::default()
    }));

    let record = state.record();
    assert_eq!(record.address.state.as_deref(), Some("Jalisco"));
    assert_eq!(record.address.municipality, None);
    assert_eq!(record.personal_general.birth_state.as_deref(), Some("Jalisco"));
    assert_eq!(record.personal_general.birth_municipality, None);

    let evaluation = state.evaluate_as_of(&FieldValidator::default(), today());
    assert!(!evaluation.is_section_valid(SectionName::Address));
    assert!(!evaluation.is_section_valid(SectionName::PersonalGeneral));

    // State and municipality sent together land together.
    state.update_section(SectionUpdate::Address(AddressPatch {
        state: Some("Morelos".to_string()),
        municipality: Some("Cuautla".to_string()),
        ..AddressPatch::default()
    }));
    assert_eq!(state.record().address.municipality.as_deref(), Some("Cuautla"));
}

#[test]
fn postal_codes_keep_five_digits() {
    let record = update_section(
        &ApplicantRecord::default(),
        SectionUpdate::Address(AddressPatch {
            postal_code: Some("C.P. 62 760-123".to_string()),
            ..AddressPatch::default()
        }),
    );
    assert_eq!(record.address.postal_code.as_deref(), Some("62760"));
}

#[test]
fn changing_the_school_type_resets_the_school_name_unless_refilled() {
    let mut state = FormState::from_record(complete_record());
    state.update_section(SectionUpdate::AcademicHistory(AcademicHistoryPatch {
        school_type: Some("CECYTE".to_string()),
        ..AcademicHistoryPatch::default()
    }));
    assert_eq!(state.record().academic_history.school_name, None);

    state.update_section(SectionUpdate::AcademicHistory(AcademicHistoryPatch {
        school_type: Some("CBTIS".to_string()),
        school_name: Some("CBTis No. 76".to_string()),
        ..AcademicHistoryPatch::default()
    }));
    assert_eq!(
        state.record().academic_history.school_name.as_deref(),
        Some("CBTis No. 76")
    );
}

#[test]
fn declining_a_scholarship_drops_its_name() {
    let mut state = FormState::new();
    state.update_section(SectionUpdate::AcademicHistory(AcademicHistoryPatch {
        has_scholarship: Some("si".to_string()),
        scholarship_name: Some("Benito Juárez".to_string()),
        ..AcademicHistoryPatch::default()
    }));
    state.update_section(SectionUpdate::AcademicHistory(AcademicHistoryPatch {
        has_scholarship: Some("No".to_string()),
        ..AcademicHistoryPatch::default()
    }));

    let academic = &state.record().academic_history;
    assert_eq!(academic.has_scholarship.as_deref(), Some("no"));
    assert_eq!(academic.scholarship_name, None);
}

#[test]
fn section_updates_decode_from_tagged_json() {
    let update: SectionUpdate = serde_json::from_value(serde_json::json!({
        "section": "income",
        "fields": { "employed": "si", "phone": "7654321" }
    }))
    .expect("decodes");
    assert_eq!(update.section(), SectionName::Income);

    let unknown = serde_json::from_value::<SectionUpdate>(serde_json::json!({
        "section": "income",
        "fields": { "salary": "1000" }
    }));
    assert!(unknown.is_err());
}

#[test]
fn state_evaluates_through_the_validator() {
    let state = FormState::from_record(complete_record());
    let evaluation = state.evaluate_as_of(&FieldValidator::default(), today());
    assert_eq!(evaluation.completion_percent, 100);
}
