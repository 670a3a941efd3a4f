//! `nearby` command: the terminal counterpart of the map screen.

use std::fmt::Write as _;

use anyhow::{bail, Context};
use coffeewalk_core::{AppConfig, Coordinate, SearchRadius, Venue};
use coffeewalk_foursquare::{ErrorKind, FetchOutcome, VenueClient};

#[derive(Debug, Clone, Copy)]
pub(crate) struct NearbyOptions {
    pub radius: SearchRadius,
    pub with_details: bool,
    pub json: bool,
}

pub(crate) async fn run_nearby(
    config: &AppConfig,
    lat: f64,
    lng: f64,
    options: NearbyOptions,
) -> anyhow::Result<()> {
    let client = VenueClient::from_config(config).context("failed to build venue client")?;
    let coordinate = Coordinate::new(lat, lng);

    tracing::info!(
        %coordinate,
        radius_m = options.radius.meters(),
        "searching for coffee"
    );

    let mut venues = match client.fetch_nearby(coordinate, options.radius).await {
        FetchOutcome::Success(venues) => venues,
        FetchOutcome::Failure(err) => bail!("{}: {err}", failure_message(err.kind())),
        FetchOutcome::Canceled => {
            tracing::debug!("nearby search canceled");
            return Ok(());
        }
    };

    if options.with_details {
        // One lookup at a time; each completes before the next starts.
        for venue in &mut venues {
            match client.fetch_details(venue.clone()).await {
                FetchOutcome::Success(detailed) => *venue = detailed,
                FetchOutcome::Failure(err) => {
                    tracing::warn!(venue_id = %venue.id, error = %err, "details lookup failed");
                }
                FetchOutcome::Canceled => {
                    tracing::debug!(venue_id = %venue.id, "details lookup canceled");
                }
            }
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&venues)?);
    } else if venues.is_empty() {
        println!(
            "No coffee found within a {}.",
            options.radius.long_label()
        );
    } else {
        println!(
            "{} coffee shop(s) within a {}:",
            venues.len(),
            options.radius.long_label()
        );
        for venue in &venues {
            println!("{}", format_venue(venue));
        }
    }

    Ok(())
}

/// User-facing summary for a failed fetch.
pub(crate) fn failure_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidRequest => "could not build the venue request",
        ErrorKind::NetworkError => "could not reach the venue service",
        ErrorKind::ParseError => "the venue service returned an unexpected response",
    }
}

pub(crate) fn format_radius(radius: SearchRadius) -> String {
    format!(
        "{:<7} {:>5} m  {}",
        radius.to_string(),
        radius.meters(),
        radius.long_label()
    )
}

pub(crate) fn format_venue(venue: &Venue) -> String {
    let mut line = format!("- {} ({})", venue.name, venue.coordinate);
    if let Some(address) = &venue.address {
        let _ = write!(line, "\n    {address}");
    }
    if let Some(phone) = &venue.phone_number {
        let _ = write!(line, "\n    {phone}");
    }
    if let Some(website) = &venue.website_url {
        let _ = write!(line, "\n    {website}");
    }
    line
}
