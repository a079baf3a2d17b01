//! Session-scoped current location with superseded-request protection.
//!
//! Every request takes a ticket from a generation counter. A resolution is
//! applied only while its ticket is still the newest one issued, so a slow
//! answer to an old request can never overwrite a newer result.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::models::Coordinates;

/// Handle for one in-flight location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationTicket(u64);

/// What happened to a resolved request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationUpdate {
    /// The position became the current location
    Applied(Coordinates),
    /// A newer request was issued before this one resolved
    Superseded,
}

/// Holds the current location for a session.
#[derive(Debug, Default)]
pub struct LocationTracker {
    generation: AtomicU64,
    current: RwLock<Option<Coordinates>>,
}

impl LocationTracker {
    /// Tracker seeded with a previously resolved location.
    pub fn with_location(coords: Option<Coordinates>) -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: RwLock::new(coords),
        }
    }

    pub async fn current(&self) -> Option<Coordinates> {
        *self.current.read().await
    }

    /// Start a request, superseding any request still in flight.
    pub fn begin(&self) -> LocationTicket {
        LocationTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LocationTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Apply a resolved position unless its request has been superseded.
    pub async fn resolve(&self, ticket: LocationTicket, coords: Coordinates) -> LocationUpdate {
        let mut current = self.current.write().await;
        // Checked under the write lock so a newer resolution cannot interleave.
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "Dropping superseded location result");
            return LocationUpdate::Superseded;
        }
        *current = Some(coords);
        LocationUpdate::Applied(coords)
    }

    /// Forget the current location and invalidate in-flight requests.
    pub async fn clear(&self) {
        let mut current = self.current.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *current = None;
    }
}
