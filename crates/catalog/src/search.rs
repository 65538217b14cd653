use std::collections::BTreeSet;

use crate::record::CatalogRecord;

/// Default result cap for [`similar_to`] callers that have no preference.
pub const DEFAULT_SIMILAR_LIMIT: usize = 20;

/// Records where every whitespace-separated term appears (case-insensitively)
/// in at least one text field. An empty query matches everything.
pub fn search<'a>(records: &'a [CatalogRecord], query: &str) -> Vec<&'a CatalogRecord> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    records
        .iter()
        .filter(|rec| {
            let fields: Vec<String> = rec.searchable_fields().map(str::to_lowercase).collect();
            terms
                .iter()
                .all(|t| fields.iter().any(|f| f.contains(t.as_str())))
        })
        .collect()
}

/// Records ranked by Jaccard similarity of title tokens.
///
/// `id_or_text` names a record by id; otherwise it is used as the title to
/// compare against. Equal scores keep store order.
pub fn similar_to<'a>(
    records: &'a [CatalogRecord],
    id_or_text: &str,
    limit: usize,
) -> Vec<&'a CatalogRecord> {
    let base = records
        .iter()
        .find(|r| r.id == id_or_text)
        .map(|r| r.title.as_str())
        .unwrap_or(id_or_text);
    let base = tokens(base);

    let mut scored: Vec<(f64, &CatalogRecord)> = records
        .iter()
        .map(|r| (jaccard(&base, &tokens(&r.title)), r))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, r)| r).collect()
}

/// Lowercased word tokens; anything but letters, digits and `_` separates.
pub fn tokens(s: &str) -> BTreeSet<String> {
    s.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
