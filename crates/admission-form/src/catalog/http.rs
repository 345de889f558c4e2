//! Typed client for the remote catalog API.
//!
//! | Kind | Path |
//! |------|------|
//! | nationalities | `/nationalities` |
//! | states | `/states/country/{country_id}` |
//! | municipalities | `/municipalities/state/{state_id}` |
//! | civil statuses | `/civil-status` |
//! | native languages | `/native-languages` |
//! | indigenous languages | `/indigenous-languages` |
//! | disabilities | `/disabilities` |
//! | high school types | `/high-school-types` |
//! | careers | `/careers` |
//!
//! Awareness channels and preference ranks have no endpoint and are answered
//! from [`StaticCatalog`].

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::fallback::StaticCatalog;
use super::{CatalogEntry, CatalogError, CatalogKind, CatalogSource};
use crate::config::CatalogConfig;

#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: Url,
    country_id: u64,
}

impl HttpCatalogClient {
    pub fn new(base_url: Url, timeout: Duration, country_id: u64) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| CatalogError::Http {
                endpoint: "client_init".into(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            country_id,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let base_url = config.base_url.clone().ok_or(CatalogError::NotConfigured)?;
        Self::new(base_url, config.timeout(), config.country_id)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn path_for(&self, kind: CatalogKind) -> Option<String> {
        let path = match kind {
            CatalogKind::Nationalities => "/nationalities".to_string(),
            CatalogKind::States => format!("/states/country/{}", self.country_id),
            CatalogKind::Municipalities { state_id } => {
                format!("/municipalities/state/{state_id}")
            }
            CatalogKind::CivilStatuses => "/civil-status".to_string(),
            CatalogKind::NativeLanguages => "/native-languages".to_string(),
            CatalogKind::IndigenousLanguages => "/indigenous-languages".to_string(),
            CatalogKind::Disabilities => "/disabilities".to_string(),
            CatalogKind::HighSchoolTypes => "/high-school-types".to_string(),
            CatalogKind::Careers => "/careers".to_string(),
            CatalogKind::AwarenessChannels | CatalogKind::PreferenceRanks => return None,
        };
        Some(path)
    }

    async fn get_entries(&self, path: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let endpoint = format!("GET {path}");
        // Base URLs may carry a path prefix such as `/api`, so paths are appended
        // rather than resolved.
        let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        let url = Url::parse(&raw).map_err(|source| CatalogError::InvalidUrl {
            endpoint: endpoint.clone(),
            source,
        })?;

        debug!(%url, "fetching catalog");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(CatalogError::Api {
                endpoint,
                status,
                body,
            });
        }

        let body: Value = resp.json().await.map_err(|e| CatalogError::Malformed {
            endpoint: endpoint.clone(),
            reason: format!("body is not JSON: {e}"),
        })?;

        normalize_entries(&endpoint, body)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn fetch(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogError> {
        match self.path_for(kind) {
            Some(path) => self.get_entries(&path).await,
            None => Ok(StaticCatalog.entries(kind)),
        }
    }
}

/// Accepts a bare array or a `{ "data": [...] }` envelope and maps every item
/// onto [`CatalogEntry`].
pub fn normalize_entries(endpoint: &str, body: Value) -> Result<Vec<CatalogEntry>, CatalogError> {
    let malformed = |reason: String| CatalogError::Malformed {
        endpoint: endpoint.to_string(),
        reason,
    };

    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(malformed(
                    "expected an array or an object with a `data` array".to_string(),
                ))
            }
        },
        _ => {
            return Err(malformed(
                "expected an array or an object with a `data` array".to_string(),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = item
                .get("name")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| malformed(format!("item {index} has no `name`")))?;

            let id = match item.get("id") {
                Some(Value::Number(number)) => number
                    .as_u64()
                    .ok_or_else(|| malformed(format!("item {index} has a non-integer `id`")))?,
                Some(Value::String(raw)) => raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| malformed(format!("item {index} has a non-integer `id`")))?,
                Some(Value::Null) | None => index as u64,
                Some(_) => return Err(malformed(format!("item {index} has a non-integer `id`"))),
            };

            // The API spells the field `abrevation`.
            let abbreviation = ["abbreviation", "abrevation"]
                .iter()
                .find_map(|field| item.get(*field).and_then(Value::as_str))
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            Ok(CatalogEntry {
                id,
                name: name.to_string(),
                abbreviation,
            })
        })
        .collect()
}
