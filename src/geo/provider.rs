//! Location providers.
//!
//! A provider answers a single request with either coordinates or a failure.
//! It never retries; asking again is an explicit new request.

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::models::Coordinates;

/// Capability to obtain the user's current position on demand.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve the current position once.
    ///
    /// Fails with [`AppError::LocationUnsupported`] when the environment has no
    /// positioning capability and [`AppError::PermissionDenied`] when the
    /// position could not be obtained.
    async fn request_location(&self) -> AppResult<Coordinates>;
}

/// Provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    coords: Coordinates,
}

impl FixedLocationProvider {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn request_location(&self) -> AppResult<Coordinates> {
        if !self.coords.is_valid() {
            return Err(AppError::PermissionDenied(
                "Location permission denied!".to_string(),
            ));
        }
        Ok(self.coords)
    }
}

/// Provider for environments without any positioning capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocationProvider;

#[async_trait]
impl LocationProvider for UnavailableLocationProvider {
    async fn request_location(&self) -> AppResult<Coordinates> {
        Err(AppError::LocationUnsupported(
            "Geolocation not supported on this device".to_string(),
        ))
    }
}

/// Pick a provider for the configured coordinates.
pub fn provider_for(coords: Option<Coordinates>) -> Box<dyn LocationProvider> {
    match coords {
        Some(coords) => Box::new(FixedLocationProvider::new(coords)),
        None => Box::new(UnavailableLocationProvider),
    }
}
