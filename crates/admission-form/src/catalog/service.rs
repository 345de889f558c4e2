use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use super::fallback::StaticCatalog;
use super::{CatalogEntry, CatalogKind, CatalogSource};
use crate::admission::domain::{
    SectionName, NATIONALITY_FOREIGN, NATIONALITY_MEXICAN, NONE_OPTION, OTHER_AWARENESS_CHANNEL,
    OTHER_DISABILITY, OTHER_LANGUAGES, OTHER_PREFERENCE_RANK, OTHER_SCHOOL_TYPE,
};
use crate::admission::validation::{FieldKey, OptionSets};

/// Catalog answer plus whether it came from the built-in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogListing {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_id: Option<u64>,
    pub entries: Vec<CatalogEntry>,
    pub used_fallback: bool,
    /// Why the remote source was skipped, when it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CatalogListing {
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }
}

/// Reads catalogs from the primary source and falls back to [`StaticCatalog`].
#[derive(Clone)]
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    fallback: StaticCatalog,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            fallback: StaticCatalog,
        }
    }

    /// Service answering only from the built-in lists.
    pub fn offline() -> Self {
        Self::new(Arc::new(StaticCatalog))
    }

    pub async fn list(&self, kind: CatalogKind) -> CatalogListing {
        let (mut entries, used_fallback, error) = match self.source.fetch(kind).await {
            Ok(entries) => (entries, false, None),
            Err(error) => {
                warn!(catalog = %kind, %error, "catalog source failed; serving built-in list");
                (self.fallback.entries(kind), true, Some(error.to_string()))
            }
        };

        if kind == CatalogKind::Disabilities {
            ensure_none_first(&mut entries);
        }

        CatalogListing {
            kind: kind.key(),
            state_id: kind.state_id(),
            entries,
            used_fallback,
            error,
        }
    }

    pub async fn municipalities(&self, state_id: u64) -> CatalogListing {
        self.list(CatalogKind::Municipalities { state_id }).await
    }
}

/// Moves `Ninguna` to the head of the list, adding it when the source omitted it.
fn ensure_none_first(entries: &mut Vec<CatalogEntry>) {
    match entries
        .iter()
        .position(|entry| entry.name.eq_ignore_ascii_case(NONE_OPTION))
    {
        Some(0) => {}
        Some(index) => {
            let none = entries.remove(index);
            entries.insert(0, none);
        }
        None => entries.insert(0, CatalogEntry::new(0, NONE_OPTION)),
    }
}

/// Option sets for the validator's select fields, built from the catalogs.
/// Sentinel answers the form relies on are always kept in the sets.
pub async fn option_sets(service: &CatalogService) -> OptionSets {
    use SectionName::{AcademicHistory, Address, Career, PersonalGeneral, Supplementary};

    let states = service.list(CatalogKind::States).await.names();
    let indigenous = with_sentinels(
        service.list(CatalogKind::IndigenousLanguages).await.names(),
        &[NONE_OPTION, OTHER_LANGUAGES],
    );

    OptionSets::new()
        .with(
            FieldKey::new(PersonalGeneral, "nationality"),
            with_sentinels(
                service.list(CatalogKind::Nationalities).await.names(),
                &[NATIONALITY_MEXICAN, NATIONALITY_FOREIGN],
            ),
        )
        .with(
            FieldKey::new(PersonalGeneral, "civil_status"),
            service.list(CatalogKind::CivilStatuses).await.names(),
        )
        .with(
            FieldKey::new(PersonalGeneral, "native_language"),
            service.list(CatalogKind::NativeLanguages).await.names(),
        )
        .with(FieldKey::new(PersonalGeneral, "birth_state"), states.clone())
        .with(FieldKey::new(Address, "state"), states)
        .with(
            FieldKey::new(Supplementary, "disabilities"),
            with_sentinels(
                service.list(CatalogKind::Disabilities).await.names(),
                &[NONE_OPTION, OTHER_DISABILITY],
            ),
        )
        .with(
            FieldKey::new(Supplementary, "parent_indigenous_languages"),
            indigenous.clone(),
        )
        .with(FieldKey::new(Supplementary, "indigenous_languages"), indigenous)
        .with(
            FieldKey::new(Career, "desired_program"),
            service.list(CatalogKind::Careers).await.names(),
        )
        .with(
            FieldKey::new(Career, "awareness_channel"),
            with_sentinels(
                service.list(CatalogKind::AwarenessChannels).await.names(),
                &[OTHER_AWARENESS_CHANNEL],
            ),
        )
        .with(
            FieldKey::new(Career, "preference_rank"),
            with_sentinels(
                service.list(CatalogKind::PreferenceRanks).await.names(),
                &[OTHER_PREFERENCE_RANK],
            ),
        )
        .with(
            FieldKey::new(AcademicHistory, "school_type"),
            with_sentinels(
                service.list(CatalogKind::HighSchoolTypes).await.names(),
                &[OTHER_SCHOOL_TYPE],
            ),
        )
}

fn with_sentinels(mut names: Vec<String>, sentinels: &[&str]) -> Vec<String> {
    // An empty list means "no catalog", which must stay empty to disable membership.
    if names.is_empty() {
        return names;
    }
    for sentinel in sentinels {
        if !names.iter().any(|name| name.eq_ignore_ascii_case(sentinel)) {
            names.push((*sentinel).to_string());
        }
    }
    names
}
