//! Artifact catalog: parsing catalog documents into normalized records, a
//! metadata store, and search over it.

pub mod parse;
pub mod record;
pub mod search;
pub mod store;

pub use parse::{parse_catalog, parse_catalog_value, slugify};
pub use record::{CatalogRecord, Publication};
pub use search::DEFAULT_SIMILAR_LIMIT;
pub use store::{CatalogSnapshot, CatalogStore, InMemoryCatalogStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound,
    InvalidFormat(String),
    Json(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound => write!(f, "catalog record not found"),
            CatalogError::InvalidFormat(msg) => write!(f, "invalid catalog: {msg}"),
            CatalogError::Json(msg) => write!(f, "catalog json error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}
