//! Search criteria and results for the donor directory.

use serde::Serialize;

use super::{AnnotatedDonor, BloodGroup};

/// User-specified search criteria. `None`/`false` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorFilter {
    pub blood_group: Option<BloodGroup>,
    pub area: Option<String>,
    pub available_only: bool,
}

impl DonorFilter {
    /// Filter with every criterion reset, as used by "show all".
    pub fn all() -> Self {
        Self::default()
    }

    /// Same criteria with availability forced on, as used by emergency mode.
    pub fn emergency(mut self) -> Self {
        self.available_only = true;
        self
    }

    /// Normalized area needle: trimmed and lower-cased, `None` when blank.
    pub fn area_needle(&self) -> Option<String> {
        self.area
            .as_deref()
            .map(normalize_text)
            .filter(|needle| !needle.is_empty())
    }
}

/// Trim and lower-case free text for case-insensitive matching.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Result of running the search pipeline.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", content = "donors", rename_all = "camelCase")]
pub enum SearchOutcome {
    /// Nothing has been stored yet
    NoData,
    /// Donors exist but none satisfy the criteria
    NoMatches,
    /// Matching donors in display order
    Results(Vec<AnnotatedDonor>),
}

impl SearchOutcome {
    pub fn donors(&self) -> &[AnnotatedDonor] {
        match self {
            SearchOutcome::Results(donors) => donors,
            SearchOutcome::NoData | SearchOutcome::NoMatches => &[],
        }
    }
}
