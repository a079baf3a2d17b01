//! Donor directory controller.
//!
//! Owns the session state (persisted collection, current location) and exposes
//! the mutation and search operations. Every successful mutation publishes the
//! new store revision so view layers can re-render.

mod contact;
mod pipeline;
mod store;

pub use contact::*;
pub use pipeline::*;
pub use store::*;

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::{watch, Mutex};

use crate::db::{KeyValueStore, LOCATION_KEY};
use crate::errors::{AppError, AppResult};
use crate::geo::{LocationProvider, LocationTracker, LocationUpdate};
use crate::models::{Coordinates, DonorFilter, DonorRecord, NewDonorRequest, SearchOutcome};

/// National mobile number: ten digits, the first one 6-9.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("phone pattern is valid"));

/// Whether `phone` is an acceptable mobile number.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Interactive yes/no confirmation for destructive actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmation that always agrees, for non-interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Session controller for the donor directory.
pub struct DonorDirectory {
    donors: DonorStore,
    kv: Arc<dyn KeyValueStore>,
    location: LocationTracker,
    // Held across resolving and persisting a location
    location_writes: Mutex<()>,
    changes: watch::Sender<i64>,
}

impl DonorDirectory {
    /// Open a directory over `kv`, restoring any previously saved location.
    pub async fn open(kv: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let saved_location = match kv.get(LOCATION_KEY).await? {
            Some(raw) => serde_json::from_str::<Coordinates>(&raw)
                .ok()
                .filter(Coordinates::is_valid),
            None => None,
        };
        let revision = kv.revision().await?;
        let (changes, _) = watch::channel(revision);

        Ok(Self {
            donors: DonorStore::new(kv.clone()),
            kv,
            location: LocationTracker::with_location(saved_location),
            location_writes: Mutex::new(()),
            changes,
        })
    }

    /// Persistence adapter for direct access to the collection.
    pub fn store(&self) -> &DonorStore {
        &self.donors
    }

    /// Receive the store revision after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<i64> {
        self.changes.subscribe()
    }

    pub async fn current_location(&self) -> Option<Coordinates> {
        self.location.current().await
    }

    /// Run the filter, annotate and order pipeline over the stored donors.
    pub async fn search(&self, filter: &DonorFilter) -> AppResult<SearchOutcome> {
        let records = self.donors.load().await?;
        let location = self.location.current().await;
        Ok(pipeline::search(records, filter, location))
    }

    /// Validate and append a new donor, returning the stored record.
    pub async fn add_donor(&self, request: NewDonorRequest) -> AppResult<DonorRecord> {
        let phone = request.phone.trim();
        if !is_valid_phone(phone) {
            return Err(AppError::Validation(
                "Enter valid 10-digit phone number".to_string(),
            ));
        }

        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let blood_group = request
            .blood_group
            .ok_or_else(|| AppError::Validation("Blood group is required".to_string()))?;

        let coords = parse_coordinates(request.lat.as_deref(), request.lng.as_deref())?;

        let mut records = self.donors.load().await?;
        let record = DonorRecord {
            id: next_id(&records),
            name: name.to_string(),
            blood_group: Some(blood_group),
            phone: phone.to_string(),
            city: request.city.trim().to_string(),
            area: request.area.trim().to_string(),
            available: request.available,
            lat: coords.map(|c| c.lat),
            lng: coords.map(|c| c.lng),
        };
        records.push(record.clone());

        self.donors.save(&records).await?;
        tracing::info!(id = record.id, blood_group = %blood_group, "Donor added");
        self.notify().await?;

        Ok(record)
    }

    /// Delete the donor with `id` after confirmation.
    ///
    /// Returns whether a record was removed; an unknown id changes nothing.
    pub async fn delete_donor(&self, id: i64, confirm: &dyn Confirm) -> AppResult<bool> {
        if !confirm.confirm("Delete this donor?") {
            return Err(AppError::Cancelled("Delete cancelled".to_string()));
        }

        let mut records = self.donors.load().await?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            tracing::debug!(id, "Delete requested for unknown donor");
            return Ok(false);
        }

        self.donors.save(&records).await?;
        tracing::info!(id, "Donor deleted");
        self.notify().await?;

        Ok(true)
    }

    /// Remove every donor after confirmation.
    pub async fn clear_all(&self, confirm: &dyn Confirm) -> AppResult<()> {
        if !confirm.confirm("Delete all donors? This cannot be undone.") {
            return Err(AppError::Cancelled("Clear cancelled".to_string()));
        }

        self.donors.clear().await?;
        tracing::info!("All donors cleared");
        self.notify().await
    }

    /// Ask `provider` for the current position and make it the session location.
    ///
    /// The location is persisted under the same lock that applies it, so an
    /// older request can never land in storage after a newer one.
    pub async fn locate(&self, provider: &dyn LocationProvider) -> AppResult<LocationUpdate> {
        let ticket = self.location.begin();
        let coords = provider.request_location().await?;

        let _writes = self.location_writes.lock().await;
        let update = self.location.resolve(ticket, coords).await;
        if let LocationUpdate::Applied(coords) = update {
            self.kv
                .set(LOCATION_KEY, &serde_json::to_string(&coords)?)
                .await?;
            tracing::info!(lat = coords.lat, lng = coords.lng, "Location set");
            self.notify().await?;
        }
        Ok(update)
    }

    /// Forget the session location.
    pub async fn forget_location(&self) -> AppResult<()> {
        let _writes = self.location_writes.lock().await;
        self.location.clear().await;
        if self.kv.remove(LOCATION_KEY).await? {
            self.notify().await?;
        }
        Ok(())
    }

    /// Fill the request's coordinates from the session location.
    pub async fn fill_location(&self, request: &mut NewDonorRequest) -> AppResult<Coordinates> {
        let coords = self.location.current().await.ok_or_else(|| {
            AppError::Validation("No location set yet; run `locate` first".to_string())
        })?;
        request.lat = Some(coords.lat.to_string());
        request.lng = Some(coords.lng.to_string());
        Ok(coords)
    }

    async fn notify(&self) -> AppResult<()> {
        let revision = self.donors.revision().await?;
        self.changes.send_replace(revision);
        Ok(())
    }
}

/// Timestamp-derived id, bumped past the current maximum on collisions.
fn next_id(records: &[DonorRecord]) -> i64 {
    let now = Utc::now().timestamp_millis();
    match records.iter().map(|r| r.id).max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}

/// Coordinates typed into the form: both blank means none, one blank is an error.
fn parse_coordinates(lat: Option<&str>, lng: Option<&str>) -> AppResult<Option<Coordinates>> {
    let lat = lat.map(str::trim).filter(|s| !s.is_empty());
    let lng = lng.map(str::trim).filter(|s| !s.is_empty());

    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => Coordinates::from_parts(lat, lng)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid coordinates: {lat}, {lng}"))),
        _ => Err(AppError::Validation(
            "Latitude and longitude must be given together".to_string(),
        )),
    }
}
