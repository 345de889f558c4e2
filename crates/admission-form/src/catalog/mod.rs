//! Reference catalogs (states, languages, disabilities, programs...) that feed
//! the select fields of the admission form.
//!
//! Every source speaks the same contract: a list of [`CatalogEntry`] values for
//! a [`CatalogKind`]. [`HttpCatalogClient`] reads the remote catalog API,
//! [`StaticCatalog`] carries the built-in lists, and [`CatalogService`] combines
//! both so callers always get an answer.

pub mod fallback;
pub mod http;
pub mod router;
pub mod service;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use fallback::StaticCatalog;
pub use http::HttpCatalogClient;
pub use router::catalog_router;
pub use service::{option_sets, CatalogListing, CatalogService};

/// The catalogs the form consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Nationalities,
    States,
    Municipalities { state_id: u64 },
    CivilStatuses,
    NativeLanguages,
    IndigenousLanguages,
    Disabilities,
    HighSchoolTypes,
    Careers,
    AwarenessChannels,
    PreferenceRanks,
}

impl CatalogKind {
    /// Kinds addressable without extra parameters.
    pub const fn listable() -> [Self; 10] {
        [
            Self::Nationalities,
            Self::States,
            Self::CivilStatuses,
            Self::NativeLanguages,
            Self::IndigenousLanguages,
            Self::Disabilities,
            Self::HighSchoolTypes,
            Self::Careers,
            Self::AwarenessChannels,
            Self::PreferenceRanks,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Nationalities => "nationalities",
            Self::States => "states",
            Self::Municipalities { .. } => "municipalities",
            Self::CivilStatuses => "civil_statuses",
            Self::NativeLanguages => "native_languages",
            Self::IndigenousLanguages => "indigenous_languages",
            Self::Disabilities => "disabilities",
            Self::HighSchoolTypes => "high_school_types",
            Self::Careers => "careers",
            Self::AwarenessChannels => "awareness_channels",
            Self::PreferenceRanks => "preference_ranks",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nationalities => "Nationalities",
            Self::States => "States",
            Self::Municipalities { .. } => "Municipalities",
            Self::CivilStatuses => "Civil statuses",
            Self::NativeLanguages => "Native languages",
            Self::IndigenousLanguages => "Indigenous languages",
            Self::Disabilities => "Disabilities",
            Self::HighSchoolTypes => "High school types",
            Self::Careers => "Careers",
            Self::AwarenessChannels => "Awareness channels",
            Self::PreferenceRanks => "Preference ranks",
        }
    }

    /// Parses a listable kind; municipalities need a state id and are built directly.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = match normalized.as_str() {
            "civil_status" => "civil_statuses",
            "high_school_type" => "high_school_types",
            other => other,
        };
        Self::listable()
            .into_iter()
            .find(|kind| kind.key() == normalized)
    }

    pub const fn state_id(self) -> Option<u64> {
        match self {
            Self::Municipalities { state_id } => Some(state_id),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Municipalities { state_id } => write!(f, "municipalities/{state_id}"),
            other => f.write_str(other.key()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl CatalogEntry {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: None,
        }
    }
}

/// Anything able to list catalog entries.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogError>;

    async fn fetch_nationalities(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::Nationalities).await
    }

    async fn fetch_states(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::States).await
    }

    async fn fetch_municipalities(&self, state_id: u64) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::Municipalities { state_id }).await
    }

    async fn fetch_civil_statuses(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::CivilStatuses).await
    }

    async fn fetch_native_languages(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::NativeLanguages).await
    }

    async fn fetch_indigenous_languages(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::IndigenousLanguages).await
    }

    async fn fetch_disabilities(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::Disabilities).await
    }

    async fn fetch_high_school_types(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::HighSchoolTypes).await
    }

    async fn fetch_careers(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.fetch(CatalogKind::Careers).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog API base URL is not configured")]
    NotConfigured,
    #[error("invalid catalog URL for {endpoint}: {source}")]
    InvalidUrl {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP request failed for {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("catalog API returned {status} for {endpoint}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("malformed catalog response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}
