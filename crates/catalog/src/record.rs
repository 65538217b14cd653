use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bibliographic reference attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Publication {
    /// Short label: DOI, then URL, then title. Empty strings are skipped.
    pub fn display(&self) -> Option<&str> {
        [&self.doi, &self.url, &self.title]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .find(|s| !s.is_empty())
    }
}

/// A normalized catalog entry describing one artifact model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub id: String,
    pub title: String,
    pub model_url: String,
    pub meters_per_unit: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub culture: String,
    #[serde(default)]
    pub geo: String,
    #[serde(default, rename = "abstract")]
    pub summary: String,
    #[serde(default)]
    pub publications: Vec<Publication>,
    /// Fields the viewer does not interpret, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl CatalogRecord {
    /// Minimal record with defaults for everything but id and title.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            model_url: String::new(),
            meters_per_unit: 1.0,
            category: String::new(),
            kind: String::new(),
            period: String::new(),
            material: String::new(),
            culture: String::new(),
            geo: String::new(),
            summary: String::new(),
            publications: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Text fields matched by search, in display order.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &str> + '_ {
        [
            self.id.as_str(),
            self.title.as_str(),
            self.model_url.as_str(),
            self.category.as_str(),
            self.kind.as_str(),
            self.period.as_str(),
            self.material.as_str(),
            self.culture.as_str(),
            self.geo.as_str(),
            self.summary.as_str(),
        ]
        .into_iter()
        .chain(self.publications.iter().filter_map(Publication::display))
    }
}
