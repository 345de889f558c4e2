use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::admission::domain::{
    AcademicHistory, Address, ApplicantRecord, Career, Income, PersonalGeneral, Supplementary,
};
use crate::admission::repository::{
    SessionId, SessionRecord, SessionRepository, SessionRepositoryError,
};
use crate::admission::{admission_router, AdmissionService, FieldValidator};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid date")
}

pub(super) fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub(super) fn list(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn personal_general() -> PersonalGeneral {
    PersonalGeneral {
        first_name: text("María José"),
        first_surname: text("Gómez"),
        second_surname: text("Ruiz"),
        curp: text("GORM040512MMSMZRA9"),
        birth_date: text("2004-05-12"),
        sex: text("femenino"),
        nationality: text("mexicana"),
        birth_state: text("Morelos"),
        birth_municipality: text("Cuernavaca"),
        civil_status: text("Soltero(a)"),
        native_language: text("Español"),
        has_children: text("no"),
        ..PersonalGeneral::default()
    }
}

pub(super) fn address() -> Address {
    Address {
        street: text("Av. Universidad"),
        exterior_number: text("12"),
        neighborhood: text("Centro"),
        state: text("Morelos"),
        municipality: text("Emiliano Zapata"),
        postal_code: text("62760"),
        email: text("maria.gomez@example.mx"),
        ..Address::default()
    }
}

pub(super) fn supplementary() -> Supplementary {
    Supplementary {
        disabilities: list(&["Ninguna"]),
        parent_indigenous_languages: list(&["Ninguna"]),
        indigenous_languages: list(&["Ninguna"]),
        ..Supplementary::default()
    }
}

pub(super) fn unemployed_income() -> Income {
    Income {
        family_income: text("12000"),
        employed: text("no"),
        ..Income::default()
    }
}

pub(super) fn employed_income() -> Income {
    Income {
        family_income: text("18000"),
        employed: text("si"),
        job_type: text("temporal"),
        area_code: text("777"),
        phone: text("1234567"),
        monthly_income: text("6000"),
        employer: text("Panadería La Espiga"),
        position: text("Cajera"),
        schedule: text("Fines de semana"),
    }
}

pub(super) fn career() -> Career {
    Career {
        desired_program: text("Ingeniería en Mecatrónica"),
        awareness_channel: text("Ferias educativas"),
        preference_rank: text("Primera opción"),
        ..Career::default()
    }
}

pub(super) fn academic_history() -> AcademicHistory {
    AcademicHistory {
        school_type: text("CONALEP"),
        school_name: text("CONALEP Cuernavaca"),
        school_code: text("ABC1234567"),
        school_code_confirmation: text("ABC1234567"),
        state: text("Morelos"),
        municipality: text("Cuernavaca"),
        gpa: text("8.7"),
        has_scholarship: text("no"),
        ..AcademicHistory::default()
    }
}

/// Every section answered; the applicant is not employed.
pub(super) fn complete_record() -> ApplicantRecord {
    ApplicantRecord {
        personal_general: personal_general(),
        address: address(),
        supplementary: supplementary(),
        income: unemployed_income(),
        career: career(),
        academic_history: academic_history(),
    }
}

pub(super) fn build_service() -> (AdmissionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AdmissionService::new(repository.clone(), FieldValidator::default());
    (service, repository)
}

pub(super) fn router_with_service(service: AdmissionService<MemoryRepository>) -> Router {
    admission_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(SessionRepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), SessionRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id))
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        Err(SessionRepositoryError::Unavailable("store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
