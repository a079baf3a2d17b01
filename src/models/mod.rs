//! Data models for the donor directory and portfolio components.
//!
//! Persisted models keep the camelCase JSON layout of the stored documents.

mod donor;
mod filter;
mod location;
mod theme;

pub use donor::*;
pub use filter::*;
pub use location::*;
pub use theme::*;
