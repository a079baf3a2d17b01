//! Filter, annotate and order donors for display.
//!
//! Pure functions over an in-memory list; nothing here touches storage.

use crate::geo::{distance_km, FAR_AWAY_KM};
use crate::models::{AnnotatedDonor, Coordinates, DonorFilter, DonorRecord, SearchOutcome};

/// Run the full search over the persisted collection.
pub fn search(
    records: Vec<DonorRecord>,
    filter: &DonorFilter,
    location: Option<Coordinates>,
) -> SearchOutcome {
    if records.is_empty() {
        return SearchOutcome::NoData;
    }

    let selected = select(records, filter);
    if selected.is_empty() {
        return SearchOutcome::NoMatches;
    }

    let mut donors = annotate(selected, location);
    order(&mut donors, location.is_some());
    SearchOutcome::Results(donors)
}

/// Keep the records that satisfy every active criterion.
pub fn select(records: Vec<DonorRecord>, filter: &DonorFilter) -> Vec<DonorRecord> {
    let needle = filter.area_needle();
    records
        .into_iter()
        .filter(|record| matches(record, filter, needle.as_deref()))
        .collect()
}

/// Whether `record` passes the filter. `area_needle` must already be normalized.
pub fn matches(record: &DonorRecord, filter: &DonorFilter, area_needle: Option<&str>) -> bool {
    let group_ok = filter
        .blood_group
        .map_or(true, |group| record.blood_group == Some(group));
    let area_ok = area_needle.map_or(true, |needle| {
        record.area.trim().to_lowercase().contains(needle)
    });
    let available_ok = !filter.available_only || record.is_available();

    group_ok && area_ok && available_ok
}

/// Attach distances from `location`; donors without coordinates get the
/// far-away sentinel. Without a location nothing is annotated.
pub fn annotate(records: Vec<DonorRecord>, location: Option<Coordinates>) -> Vec<AnnotatedDonor> {
    records
        .into_iter()
        .map(|record| {
            let distance_km = location.map(|here| {
                record
                    .coordinates()
                    .map_or(FAR_AWAY_KM, |there| distance_km(here, there))
            });
            AnnotatedDonor {
                record,
                distance_km,
            }
        })
        .collect()
}

/// Most recent first, then nearest first when a location is known.
///
/// The distance sort is stable, so equal distances keep recency order.
pub fn order(donors: &mut [AnnotatedDonor], location_known: bool) {
    donors.reverse();
    if location_known {
        donors.sort_by(|a, b| {
            a.distance_km
                .unwrap_or(FAR_AWAY_KM)
                .total_cmp(&b.distance_km.unwrap_or(FAR_AWAY_KM))
        });
    }
}
