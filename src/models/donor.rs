//! Donor record model matching the persisted `donors` array.

use serde::{Deserialize, Deserializer, Serialize};

use super::Coordinates;

/// ABO/Rh blood group codes accepted by the directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    /// Parse a blood group code, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        let code = s.trim().to_ascii_uppercase();
        BloodGroup::ALL.into_iter().find(|g| g.as_str() == code)
    }
}

impl std::fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a donor can currently give blood.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Yes,
    #[default]
    No,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Yes)
    }
}

/// A single persisted blood donor entry.
///
/// Every field tolerates being missing or malformed in storage, so records
/// written by other tools load as partially empty instead of failing the
/// whole collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DonorRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub blood_group: Option<BloodGroup>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient")]
    pub area: String,
    #[serde(default, deserialize_with = "lenient")]
    pub available: Availability,
    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lng: Option<f64>,
}

impl DonorRecord {
    /// Coordinates of the donor, only when both components are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinates { lat, lng })
            }
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available.is_available()
    }

    /// Blood group code for display, empty when unknown.
    pub fn blood_group_label(&self) -> &'static str {
        self.blood_group.map(|g| g.as_str()).unwrap_or("")
    }
}

/// Deserialize a field, falling back to its default when the stored value has
/// the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Raw form input for adding a donor.
///
/// Text fields are kept as typed; the directory trims and validates them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonorRequest {
    pub name: String,
    pub blood_group: Option<BloodGroup>,
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub available: Availability,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lng: Option<String>,
}

/// A donor record with its distance from the current location.
///
/// The distance is derived per search and never written back to storage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnnotatedDonor {
    #[serde(flatten)]
    pub record: DonorRecord,
    #[serde(rename = "_distance", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl AnnotatedDonor {
    /// Distance to show to the user, absent when the donor has no coordinates.
    pub fn known_distance(&self) -> Option<f64> {
        self.distance_km
            .filter(|_| self.record.coordinates().is_some())
    }
}
