//! Persistence adapter for the donor collection.
//!
//! The whole collection lives as one JSON array under [`DONORS_KEY`].

use std::sync::Arc;

use serde_json::Value;

use crate::db::{KeyValueStore, DONORS_KEY};
use crate::errors::AppResult;
use crate::models::DonorRecord;

/// State of the stored collection as found on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredDonors {
    /// The key has never been written or was cleared
    Missing,
    /// The value parsed as an array; entries that are not records are dropped
    Loaded(Vec<DonorRecord>),
    /// The value exists but is not a JSON array
    Corrupt { raw: String },
}

impl StoredDonors {
    /// Records usable by the pipeline; a corrupt value reads as empty.
    pub fn into_records(self) -> Vec<DonorRecord> {
        match self {
            StoredDonors::Loaded(records) => records,
            StoredDonors::Missing | StoredDonors::Corrupt { .. } => Vec::new(),
        }
    }
}

/// Reads and writes the donor collection.
#[derive(Clone)]
pub struct DonorStore {
    store: Arc<dyn KeyValueStore>,
}

impl DonorStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Inspect the stored value without hiding corruption.
    ///
    /// Elements of the array that are not records are skipped with a warning;
    /// the remaining records still load.
    pub async fn inspect(&self) -> AppResult<StoredDonors> {
        let Some(raw) = self.store.get(DONORS_KEY).await? else {
            return Ok(StoredDonors::Missing);
        };

        let elements = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!("Stored donor list is unreadable, treating as empty: {}", e);
                return Ok(StoredDonors::Corrupt { raw });
            }
        };

        let records = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| {
                match serde_json::from_value::<DonorRecord>(element) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(index, "Skipping unreadable donor entry: {}", e);
                        None
                    }
                }
            })
            .collect();
        Ok(StoredDonors::Loaded(records))
    }

    /// Load the collection; absent or unreadable data yields an empty list.
    pub async fn load(&self) -> AppResult<Vec<DonorRecord>> {
        Ok(self.inspect().await?.into_records())
    }

    /// Overwrite the stored collection.
    pub async fn save(&self, records: &[DonorRecord]) -> AppResult<()> {
        let json = serde_json::to_string(records)?;
        self.store.set(DONORS_KEY, &json).await
    }

    /// Remove the stored collection entirely.
    pub async fn clear(&self) -> AppResult<bool> {
        self.store.remove(DONORS_KEY).await
    }

    pub async fn revision(&self) -> AppResult<i64> {
        self.store.revision().await
    }
}
