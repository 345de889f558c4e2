use async_trait::async_trait;

use super::{CatalogEntry, CatalogError, CatalogKind, CatalogSource};
use crate::admission::domain::{
    NATIONALITY_FOREIGN, NATIONALITY_MEXICAN, NONE_OPTION, OTHER_AWARENESS_CHANNEL,
    OTHER_DISABILITY, OTHER_LANGUAGES, OTHER_PREFERENCE_RANK, OTHER_SCHOOL_TYPE,
};

/// State id of Morelos, the only state with a built-in municipality list.
pub const MORELOS_STATE_ID: u64 = 17;

const NATIONALITIES: &[&str] = &[NATIONALITY_MEXICAN, NATIONALITY_FOREIGN];

const STATES: &[&str] = &[
    "Aguascalientes",
    "Baja California",
    "Baja California Sur",
    "Campeche",
    "Chiapas",
    "Chihuahua",
    "Ciudad de México",
    "Coahuila",
    "Colima",
    "Durango",
    "Guanajuato",
    "Guerrero",
    "Hidalgo",
    "Jalisco",
    "México",
    "Michoacán",
    "Morelos",
    "Nayarit",
    "Nuevo León",
    "Oaxaca",
    "Puebla",
    "Querétaro",
    "Quintana Roo",
    "San Luis Potosí",
    "Sinaloa",
    "Sonora",
    "Tabasco",
    "Tamaulipas",
    "Tlaxcala",
    "Veracruz",
    "Yucatán",
    "Zacatecas",
];

const MORELOS_MUNICIPALITIES: &[&str] = &[
    "Amacuzac",
    "Atlatlahucan",
    "Axochiapan",
    "Ayala",
    "Coatlán del Río",
    "Cuautla",
    "Cuernavaca",
    "Emiliano Zapata",
    "Huitzilac",
    "Jantetelco",
    "Jiutepec",
    "Jojutla",
    "Jonacatepec de Leandro Valle",
    "Mazatepec",
    "Miacatlán",
    "Ocuituco",
    "Puente de Ixtla",
    "Temixco",
    "Tepalcingo",
    "Tepoztlán",
    "Tetecala",
    "Tetela del Volcán",
    "Tlalnepantla",
    "Tlaltizapán de Zapata",
    "Tlaquiltenango",
    "Tlayacapan",
    "Totolapan",
    "Xochitepec",
    "Yautepec",
    "Yecapixtla",
    "Zacatepec",
    "Zacualpan de Amilpas",
];

const CIVIL_STATUSES: &[&str] = &[
    "Soltero(a)",
    "Casado(a)",
    "Unión libre",
    "Divorciado(a)",
    "Viudo(a)",
];

const NATIVE_LANGUAGES: &[&str] = &[
    "Español",
    "Inglés",
    "Francés",
    "Alemán",
    "Italiano",
    "Portugués",
    "Chino Mandarín",
    "Náhuatl",
    "Otro",
];

const INDIGENOUS_LANGUAGES: &[&str] = &[
    NONE_OPTION,
    "Náhuatl",
    "Maya",
    "Zapoteco",
    "Mixteco",
    "Otomí",
    "Totonaco",
    "Tzotzil",
    "Tzeltal",
    "Mazahua",
    "Huichol",
    "Chinanteco",
    "Purépecha",
    "Mixe",
    "Tlapaneco",
    "Tarahumara",
    "Zoque",
    "Chol",
    "Huasteco",
    "Tepehuano",
    OTHER_LANGUAGES,
];

const DISABILITIES: &[&str] = &[
    NONE_OPTION,
    "Visual",
    "Auditiva",
    "Motriz",
    "Intelectual",
    "Psicosocial",
    "Múltiple",
    OTHER_DISABILITY,
];

const HIGH_SCHOOL_TYPES: &[&str] = &[
    "Bachillerato General",
    "Bachillerato Tecnológico",
    "Preparatoria Abierta",
    "CONALEP",
    "CECYTE",
    "CBTIS",
    "CBTA",
    "CETis",
    "Preparatoria Particular",
    "Telebachillerato",
    OTHER_SCHOOL_TYPE,
];

const CAREERS: &[&str] = &[
    "Ingeniería en Sistemas Computacionales",
    "Ingeniería en Tecnologías de la Información",
    "Ingeniería en Mecatrónica",
    "Ingeniería en Energías Renovables",
    "Ingeniería en Biotecnología",
    "Ingeniería Industrial",
    "Licenciatura en Administración",
    "Licenciatura en Contaduría Pública",
    "Licenciatura en Turismo",
    "Licenciatura en Gastronomía",
    "Técnico Superior Universitario en Desarrollo de Software Multiplataforma",
    "Técnico Superior Universitario en Infraestructura de Redes Digitales",
    "Técnico Superior Universitario en Mecatrónica",
    "Técnico Superior Universitario en Energías Renovables",
    "Técnico Superior Universitario en Biotecnología",
    "Técnico Superior Universitario en Procesos Industriales",
    "Técnico Superior Universitario en Administración",
    "Técnico Superior Universitario en Contaduría",
    "Técnico Superior Universitario en Turismo",
    "Técnico Superior Universitario en Gastronomía",
];

const AWARENESS_CHANNELS: &[&str] = &[
    "Redes sociales (Facebook, Instagram, TikTok)",
    "Página web oficial",
    "Recomendación de familiares o amigos",
    "Ferias educativas",
    "Visita a preparatoria",
    "Radio",
    "Televisión",
    "Periódico o revista",
    "Volantes o carteles",
    OTHER_AWARENESS_CHANNEL,
];

const PREFERENCE_RANKS: &[&str] = &[
    "Primera opción",
    "Segunda opción",
    "Tercera opción",
    "Cuarta opción",
    "Quinta opción",
    OTHER_PREFERENCE_RANK,
];

/// Built-in catalog lists served when the remote API is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn entries(&self, kind: CatalogKind) -> Vec<CatalogEntry> {
        let names: &[&str] = match kind {
            CatalogKind::Nationalities => NATIONALITIES,
            CatalogKind::States => STATES,
            CatalogKind::Municipalities { state_id } if state_id == MORELOS_STATE_ID => {
                MORELOS_MUNICIPALITIES
            }
            CatalogKind::Municipalities { .. } => &[],
            CatalogKind::CivilStatuses => CIVIL_STATUSES,
            CatalogKind::NativeLanguages => NATIVE_LANGUAGES,
            CatalogKind::IndigenousLanguages => INDIGENOUS_LANGUAGES,
            CatalogKind::Disabilities => DISABILITIES,
            CatalogKind::HighSchoolTypes => HIGH_SCHOOL_TYPES,
            CatalogKind::Careers => CAREERS,
            CatalogKind::AwarenessChannels => AWARENESS_CHANNELS,
            CatalogKind::PreferenceRanks => PREFERENCE_RANKS,
        };

        names
            .iter()
            .zip(1u64..)
            .map(|(name, id)| CatalogEntry::new(id, *name))
            .collect()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(self.entries(kind))
    }
}
