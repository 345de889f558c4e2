use admission_form::admission::{
    SessionId, SessionRecord, SessionRepository, SessionRepositoryError,
};
use admission_form::catalog::{CatalogService, HttpCatalogClient};
use admission_form::config::CatalogConfig;
use admission_form::error::AppError;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, SessionRepositoryError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(SessionRepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), SessionRepositoryError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(SessionRepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        let guard = self.records.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<Option<SessionRecord>, SessionRepositoryError> {
        let mut guard = self.records.lock().expect("session mutex poisoned");
        Ok(guard.remove(id))
    }
}

/// Remote catalogs when a base URL is configured, built-in lists otherwise.
pub(crate) fn catalog_service(config: &CatalogConfig) -> Result<CatalogService, AppError> {
    match &config.base_url {
        Some(base_url) => {
            let client = HttpCatalogClient::from_config(config)?;
            info!(%base_url, "using remote catalog API");
            Ok(CatalogService::new(Arc::new(client)))
        }
        None => {
            info!("no catalog API configured; serving built-in catalogs");
            Ok(CatalogService::offline())
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use admission_form::admission::FormState;
    use chrono::Utc;

    #[test]
    fn updates_require_an_existing_session() {
        let repository = InMemorySessionRepository::default();
        let record = SessionRecord::new(SessionId("ses-000001".to_string()), Utc::now());

        assert!(matches!(
            repository.update(record.clone()),
            Err(SessionRepositoryError::NotFound)
        ));
        repository.insert(record.clone()).expect("insert succeeds");
        assert!(matches!(
            repository.insert(record.clone()),
            Err(SessionRepositoryError::Conflict)
        ));
        assert_eq!(
            repository
                .fetch(&record.session_id)
                .expect("fetch succeeds")
                .map(|stored| stored.state),
            Some(FormState::new())
        );
    }

    #[test]
    fn parse_date_reports_the_raw_value() {
        assert_eq!(
            parse_date(" 2025-08-01 "),
            Ok(NaiveDate::from_ymd_opt(2025, 8, 1).expect("valid date"))
        );
        let error = parse_date("01/08/2025").expect_err("wrong format");
        assert!(error.contains("01/08/2025"));
    }

    #[test]
    fn unconfigured_catalogs_fall_back_to_built_in_lists() {
        assert!(catalog_service(&CatalogConfig::default()).is_ok());
    }
}
