//! Venue domain model shared by the API client and its front ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Average walking speed used for radius labels: 100 m per minute.
const WALKING_METERS_PER_MINUTE: u32 = 100;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` when both components are finite and inside the
    /// geographic ranges `[-90, 90]` and `[-180, 180]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// A coffee shop returned by the places provider.
///
/// `id`, `name` and `coordinate` are always populated by the nearby-search
/// parser. The contact fields stay `None` until a details fetch fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub address: Option<String>,
    pub website_url: Option<String>,
    /// Human-readable phone number, e.g. `"(212) 555-0100"`.
    pub phone_number: Option<String>,
    /// Digits-only phone number suitable for a `tel:` link.
    pub dialable_phone_number: Option<String>,
}

impl Venue {
    /// Creates a venue with identity and location only.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            address: None,
            website_url: None,
            phone_number: None,
            dialable_phone_number: None,
        }
    }

    /// Returns a `tel://` URI for the dialable number, if there is one.
    #[must_use]
    pub fn tel_uri(&self) -> Option<String> {
        self.dialable_phone_number
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| format!("tel://{n}"))
    }

    /// Applies a details payload, keeping identity and location untouched.
    ///
    /// The website is always replaced. Phone numbers are replaced only when
    /// the payload carried a contact block; otherwise the current values stay.
    #[must_use]
    pub fn with_details(mut self, details: VenueDetails) -> Self {
        self.website_url = details.website_url;
        if let Some(contact) = details.contact {
            self.phone_number = contact.phone_number;
            self.dialable_phone_number = contact.dialable_phone_number;
        }
        self
    }
}

/// Contact fields from a details response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub phone_number: Option<String>,
    pub dialable_phone_number: Option<String>,
}

/// The detail-only fields returned by a per-venue lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDetails {
    pub website_url: Option<String>,
    /// `None` when the response had no `contact` object at all.
    pub contact: Option<ContactDetails>,
}

/// Search distance options, in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchRadius {
    Near,
    #[default]
    Medium,
    Far,
}

impl SearchRadius {
    pub const ALL: [SearchRadius; 3] = [
        SearchRadius::Near,
        SearchRadius::Medium,
        SearchRadius::Far,
    ];

    #[must_use]
    pub const fn meters(self) -> u32 {
        match self {
            SearchRadius::Near => 200,
            SearchRadius::Medium => 500,
            SearchRadius::Far => 1000,
        }
    }

    #[must_use]
    pub const fn walking_minutes(self) -> u32 {
        self.meters() / WALKING_METERS_PER_MINUTE
    }

    /// Width of a map region centred on the user that fits the whole radius.
    #[must_use]
    pub const fn region_span_meters(self) -> u32 {
        self.meters() * 2
    }

    #[must_use]
    pub fn short_label(self) -> String {
        format!("{} min", self.walking_minutes())
    }

    #[must_use]
    pub fn long_label(self) -> String {
        format!("{} minute walk", self.walking_minutes())
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchRadius::Near => "near",
            SearchRadius::Medium => "medium",
            SearchRadius::Far => "far",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown search radius '{0}' (expected near, medium, far, 200, 500 or 1000)")]
pub struct ParseRadiusError(String);

impl FromStr for SearchRadius {
    type Err = ParseRadiusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_ascii_lowercase();
        match lowered.as_str() {
            "near" => return Ok(SearchRadius::Near),
            "medium" => return Ok(SearchRadius::Medium),
            "far" => return Ok(SearchRadius::Far),
            _ => {}
        }
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(|m| SearchRadius::ALL.into_iter().find(|r| r.meters() == m))
            .ok_or_else(|| ParseRadiusError(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_venue() -> Venue {
        let mut venue = Venue::new("abc123", "Blue Bottle", Coordinate::new(40.7128, -74.006));
        venue.address = Some("1 Main St".to_string());
        venue.phone_number = Some("(212) 555-0100".to_string());
        venue.dialable_phone_number = Some("2125550100".to_string());
        venue
    }

    #[test]
    fn coordinate_validity() {
        assert!(Coordinate::new(40.7128, -74.006).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.1).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn coordinate_display_uses_shortest_float_form() {
        assert_eq!(
            Coordinate::new(40.7128, -74.0060).to_string(),
            "40.7128,-74.006"
        );
    }

    #[test]
    fn radius_values_and_labels() {
        assert_eq!(SearchRadius::Near.meters(), 200);
        assert_eq!(SearchRadius::Medium.meters(), 500);
        assert_eq!(SearchRadius::Far.meters(), 1000);
        assert_eq!(SearchRadius::default(), SearchRadius::Medium);
        assert_eq!(SearchRadius::Near.short_label(), "2 min");
        assert_eq!(SearchRadius::Far.long_label(), "10 minute walk");
        assert_eq!(SearchRadius::Medium.region_span_meters(), 1000);
    }

    #[test]
    fn radius_parses_names_and_meters() {
        assert_eq!("near".parse::<SearchRadius>(), Ok(SearchRadius::Near));
        assert_eq!(" FAR ".parse::<SearchRadius>(), Ok(SearchRadius::Far));
        assert_eq!("500".parse::<SearchRadius>(), Ok(SearchRadius::Medium));
        assert!("750".parse::<SearchRadius>().is_err());
        assert!("walkable".parse::<SearchRadius>().is_err());
    }

    #[test]
    fn tel_uri_requires_dialable_number() {
        let venue = sample_venue();
        assert_eq!(venue.tel_uri().as_deref(), Some("tel://2125550100"));

        let bare = Venue::new("x", "y", Coordinate::new(0.0, 0.0));
        assert_eq!(bare.tel_uri(), None);
    }

    #[test]
    fn with_details_replaces_contact_block_and_keeps_identity() {
        let venue = sample_venue();
        let updated = venue.clone().with_details(VenueDetails {
            website_url: Some("https://bluebottle.example".to_string()),
            contact: Some(ContactDetails {
                phone_number: Some("(212) 555-0199".to_string()),
                dialable_phone_number: None,
            }),
        });

        assert_eq!(updated.id, venue.id);
        assert_eq!(updated.name, venue.name);
        assert_eq!(updated.coordinate, venue.coordinate);
        assert_eq!(updated.address, venue.address);
        assert_eq!(
            updated.website_url.as_deref(),
            Some("https://bluebottle.example")
        );
        assert_eq!(updated.phone_number.as_deref(), Some("(212) 555-0199"));
        assert_eq!(updated.dialable_phone_number, None);
    }

    #[test]
    fn with_details_without_contact_keeps_previous_phones() {
        let mut venue = sample_venue();
        venue.website_url = Some("https://old.example".to_string());
        let updated = venue.clone().with_details(VenueDetails::default());

        assert_eq!(updated.website_url, None);
        assert_eq!(updated.phone_number, venue.phone_number);
        assert_eq!(updated.dialable_phone_number, venue.dialable_phone_number);
    }

    #[test]
    fn venue_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(sample_venue()).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["coordinate"]["latitude"], 40.7128);
        assert_eq!(json["dialable_phone_number"], "2125550100");
        assert_eq!(json["website_url"], serde_json::Value::Null);
    }
}
