//! Contact actions and display cards for donors.

use serde::Serialize;

use crate::links::encode_component;
use crate::models::AnnotatedDonor;

/// Outbound links offered for a donor.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactLinks {
    pub call: String,
    pub whatsapp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,
}

impl ContactLinks {
    pub fn for_donor(donor: &AnnotatedDonor, country_code: &str) -> Self {
        let record = &donor.record;
        let message = format!(
            "Hi {}, I need {} blood urgently at {}, {}.",
            record.name,
            record.blood_group_label(),
            record.area,
            record.city
        );

        Self {
            call: format!("tel:{}", record.phone),
            whatsapp: format!(
                "https://wa.me/{}{}?text={}",
                country_code,
                record.phone,
                encode_component(&message)
            ),
            map: record
                .coordinates()
                .map(|c| format!("https://www.google.com/maps?q={},{}", c.lat, c.lng)),
        }
    }
}

/// Everything a view needs to draw one donor.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DonorCard {
    pub id: i64,
    pub name: String,
    pub place: String,
    pub distance: String,
    pub blood_group: String,
    pub status: String,
    pub links: ContactLinks,
}

impl DonorCard {
    pub fn new(donor: &AnnotatedDonor, country_code: &str) -> Self {
        let record = &donor.record;
        let distance = match donor.known_distance() {
            Some(km) => format!("{:.2} km away", km),
            None => "Distance: Not available".to_string(),
        };
        let status = if record.is_available() {
            "Available now"
        } else {
            "Not available"
        };

        Self {
            id: record.id,
            name: record.name.clone(),
            place: format!("{}, {}", record.city, record.area),
            distance,
            blood_group: record.blood_group_label().to_string(),
            status: status.to_string(),
            links: ContactLinks::for_donor(donor, country_code),
        }
    }
}
