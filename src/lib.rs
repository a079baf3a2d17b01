//! Donor Finder
//!
//! A blood donor directory persisted in SQLite, with blood group, area and
//! availability filters and distance-aware ordering from the user's location.
//! The `portfolio` module holds the interaction logic of the companion
//! portfolio page: theme persistence, the typing intro, carousels, skill bars,
//! the particle background and the contact form.

pub mod cli;
pub mod config;
pub mod db;
pub mod directory;
pub mod errors;
pub mod geo;
pub mod links;
pub mod models;
pub mod portfolio;

#[cfg(test)]
mod tests;
