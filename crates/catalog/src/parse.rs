use serde_json::{Map, Value};

use crate::CatalogError;
use crate::record::{CatalogRecord, Publication};

/// Keys consumed by normalization; everything else lands in `extra`.
const KNOWN_KEYS: &[&str] = &[
    "id",
    "slug",
    "title",
    "modelUrl",
    "url",
    "metersPerUnit",
    "category",
    "type",
    "period",
    "material",
    "culture",
    "geo",
    "abstract",
    "publications",
];

/// Parses and normalizes a catalog document.
///
/// Accepted shapes: `[...]`, `{"items": [...]}` and `{"catalog": {"items": [...]}}`.
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
    let doc: Value = serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))?;
    parse_catalog_value(&doc)
}

pub fn parse_catalog_value(doc: &Value) -> Result<Vec<CatalogRecord>, CatalogError> {
    let items = doc
        .as_array()
        .or_else(|| doc.get("items").and_then(Value::as_array))
        .or_else(|| {
            doc.get("catalog")
                .and_then(|c| c.get("items"))
                .and_then(Value::as_array)
        })
        .ok_or_else(|| CatalogError::InvalidFormat("no items[] array".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(obj) => Ok(normalize(i, obj)),
            _ => Err(CatalogError::InvalidFormat(format!(
                "item {} is not an object",
                i + 1
            ))),
        })
        .collect()
}

fn normalize(i: usize, obj: &Map<String, Value>) -> CatalogRecord {
    let title = text(obj, "title");
    let id = text(obj, "id")
        .or_else(|| text(obj, "slug"))
        .or_else(|| title.as_deref().map(slugify))
        .unwrap_or_else(|| format!("item-{}", i + 1));

    let mut rec = CatalogRecord::new(id, title.unwrap_or_else(|| format!("Record #{}", i + 1)));
    rec.model_url = text(obj, "modelUrl")
        .or_else(|| text(obj, "url"))
        .unwrap_or_default();
    rec.meters_per_unit = obj
        .get("metersPerUnit")
        .and_then(Value::as_f64)
        .filter(|m| m.is_finite() && *m > 0.0)
        .unwrap_or(1.0);
    rec.category = text(obj, "category").unwrap_or_default();
    rec.kind = text(obj, "type").unwrap_or_default();
    rec.period = text(obj, "period").unwrap_or_default();
    rec.material = text(obj, "material").unwrap_or_default();
    rec.culture = text(obj, "culture").unwrap_or_default();
    rec.geo = text(obj, "geo").unwrap_or_default();
    rec.summary = text(obj, "abstract").unwrap_or_default();
    rec.publications = obj
        .get("publications")
        .and_then(Value::as_array)
        .map(|pubs| pubs.iter().filter_map(publication).collect())
        .unwrap_or_default();
    rec.extra = obj
        .iter()
        .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    rec
}

fn publication(v: &Value) -> Option<Publication> {
    match v {
        Value::String(s) if !s.is_empty() => Some(Publication {
            title: Some(s.clone()),
            ..Default::default()
        }),
        Value::Object(_) => serde_json::from_value(v.clone()).ok(),
        _ => None,
    }
}

/// Non-empty string (or number) value for `key`.
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lowercases and collapses every run of characters outside `[a-z0-9]` to `-`.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        return "item".to_string();
    }
    out
}
