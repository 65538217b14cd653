use serde::{Deserialize, Serialize};

use crate::CatalogError;
use crate::record::CatalogRecord;
use crate::search;

/// Serializable contents of a store, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub records: Vec<CatalogRecord>,
}

pub trait CatalogStore {
    /// Replaces every record. Later duplicates of an id overwrite earlier ones
    /// in place.
    fn seed(&mut self, records: Vec<CatalogRecord>) -> Result<(), CatalogError>;
    fn list(&self) -> Result<Vec<CatalogRecord>, CatalogError>;
    fn get(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError>;
    fn upsert(&mut self, record: CatalogRecord) -> Result<(), CatalogError>;
    fn delete(&mut self, id: &str) -> Result<bool, CatalogError>;

    fn require(&self, id: &str) -> Result<CatalogRecord, CatalogError> {
        self.get(id)?.ok_or(CatalogError::NotFound)
    }

    fn search(&self, query: &str) -> Result<Vec<CatalogRecord>, CatalogError> {
        let records = self.list()?;
        Ok(search::search(&records, query).into_iter().cloned().collect())
    }

    fn similar_to(&self, id_or_text: &str, limit: usize) -> Result<Vec<CatalogRecord>, CatalogError> {
        let records = self.list()?;
        Ok(search::similar_to(&records, id_or_text, limit)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    snapshot: CatalogSnapshot,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.records.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.snapshot.records.iter().position(|r| r.id == id)
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn seed(&mut self, records: Vec<CatalogRecord>) -> Result<(), CatalogError> {
        self.snapshot.records.clear();
        for record in records {
            self.upsert(record)?;
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<CatalogRecord>, CatalogError> {
        Ok(self.snapshot.records.clone())
    }

    fn get(&self, id: &str) -> Result<Option<CatalogRecord>, CatalogError> {
        Ok(self.position(id).map(|i| self.snapshot.records[i].clone()))
    }

    fn upsert(&mut self, record: CatalogRecord) -> Result<(), CatalogError> {
        match self.position(&record.id) {
            Some(i) => self.snapshot.records[i] = record,
            None => self.snapshot.records.push(record),
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool, CatalogError> {
        match self.position(id) {
            Some(i) => {
                self.snapshot.records.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
