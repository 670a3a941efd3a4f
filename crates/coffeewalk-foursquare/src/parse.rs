//! Conversion of FourSquare venue JSON into domain types.
//!
//! Only the envelope is strict: a missing `response`, `groups`, `items` or
//! `venue` node yields [`VenueError::Parse`] naming the path. Individual
//! entries inside a valid envelope that lack an id, a name or a usable
//! coordinate are skipped.

use serde_json::{Map, Value};

use coffeewalk_core::{ContactDetails, Coordinate, Venue, VenueDetails};

use crate::error::VenueError;

/// Label FourSquare attaches to the coordinate meant for map pins.
const DISPLAY_LABEL: &str = "display";

/// Parses an `explore` response into the venues of its first group.
///
/// An empty `groups` array is treated as "nothing nearby" and yields an
/// empty list.
///
/// # Errors
///
/// Returns [`VenueError::Parse`] when `response`, `response.groups`,
/// `response.groups[0]` or `response.groups[0].items` is missing or has the
/// wrong JSON type.
pub fn parse_nearby_list(json: &Value) -> Result<Vec<Venue>, VenueError> {
    let response = object_at(json, "response", "response")?;
    let groups = response
        .get("groups")
        .and_then(Value::as_array)
        .ok_or_else(|| VenueError::parse("response.groups", "expected an array"))?;

    // The first group holds the recommended venues.
    let Some(group) = groups.first() else {
        return Ok(Vec::new());
    };
    let group = group
        .as_object()
        .ok_or_else(|| VenueError::parse("response.groups[0]", "expected an object"))?;
    let items = group
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| VenueError::parse("response.groups[0].items", "expected an array"))?;

    let venues = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let venue = venue_from_item(item);
            if venue.is_none() {
                tracing::debug!(index, "explore: skipping venue without id, name or coordinate");
            }
            venue
        })
        .collect();

    Ok(venues)
}

/// Parses a venue details response.
///
/// # Errors
///
/// Returns [`VenueError::Parse`] when `response` or `response.venue` is
/// missing or not an object.
pub fn parse_details(json: &Value) -> Result<VenueDetails, VenueError> {
    let response = object_at(json, "response", "response")?;
    let venue = response
        .get("venue")
        .and_then(Value::as_object)
        .ok_or_else(|| VenueError::parse("response.venue", "expected an object"))?;

    let contact = venue
        .get("contact")
        .and_then(Value::as_object)
        .map(|contact| ContactDetails {
            phone_number: string_field(contact, "formattedPhone"),
            dialable_phone_number: string_field(contact, "phone"),
        });

    Ok(VenueDetails {
        website_url: string_field(venue, "url"),
        contact,
    })
}

fn object_at<'a>(
    value: &'a Value,
    key: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, VenueError> {
    value
        .get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| VenueError::parse(path, "expected an object"))
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn non_empty_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    string_field(object, key).filter(|s| !s.trim().is_empty())
}

/// Builds a [`Venue`] from one `items[*]` entry, or `None` if it lacks the
/// identity and location fields every venue needs.
fn venue_from_item(item: &Value) -> Option<Venue> {
    let venue = item.get("venue")?.as_object()?;
    let id = non_empty_string(venue, "id")?;
    let name = non_empty_string(venue, "name")?;
    let location = venue.get("location")?.as_object()?;
    let coordinate = labeled_coordinate(location)?;

    let mut parsed = Venue::new(id, name, coordinate);
    parsed.address = string_field(location, "address");
    Some(parsed)
}

/// Picks the coordinate from `labeledLatLngs`, preferring the `display`
/// label and otherwise taking the first pair with numeric `lat`/`lng`.
fn labeled_coordinate(location: &Map<String, Value>) -> Option<Coordinate> {
    let pairs = location.get("labeledLatLngs")?.as_array()?;

    let numeric = |pair: &Value| -> Option<Coordinate> {
        let latitude = pair.get("lat")?.as_f64()?;
        let longitude = pair.get("lng")?.as_f64()?;
        let coordinate = Coordinate::new(latitude, longitude);
        coordinate.is_valid().then_some(coordinate)
    };

    pairs
        .iter()
        .filter(|pair| pair.get("label").and_then(Value::as_str) == Some(DISPLAY_LABEL))
        .find_map(numeric)
        .or_else(|| pairs.iter().find_map(numeric))
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
