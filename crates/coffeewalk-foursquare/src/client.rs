//! HTTP client for the FourSquare venues API.
//!
//! Wraps `reqwest` with credential signing, single-request supersession and
//! typed response parsing. Every operation finishes with a [`FetchOutcome`];
//! nothing is returned as a bare error.

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use coffeewalk_core::{AppConfig, Coordinate, SearchRadius, Venue};

use crate::error::VenueError;
use crate::in_flight::RequestSlot;
use crate::outcome::{FetchOutcome, PendingFetch};
use crate::parse::{parse_details, parse_nearby_list};

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2/venues";

/// Category filter sent with every nearby search.
const SECTION: &str = "coffee";

/// Characters escaped in credential query values (RFC 3986 unreserved are kept).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// `client_id`/`client_secret` pair issued by the FourSquare developer portal.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &"[redacted]")
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

/// Client for nearby-coffee searches and venue detail lookups.
///
/// Tracks one request at a time: starting any operation cancels the one
/// still in flight, which then completes with [`FetchOutcome::Canceled`]
/// before the new one reports. Use separate clients for independent
/// concurrent lookups. Dropping the client cancels its in-flight request.
///
/// The `fetch_*` methods spawn onto the current Tokio runtime and panic when
/// called outside one.
pub struct VenueClient {
    http: Client,
    credentials: Credentials,
    base_url: Url,
    slot: RequestSlot,
}

impl VenueClient {
    /// Creates a client pointed at the production FourSquare API.
    ///
    /// # Errors
    ///
    /// Returns [`VenueError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(credentials: Credentials) -> Result<Self, VenueError> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`VenueError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`VenueError::InvalidRequest`] if
    /// `base_url` is not a usable http(s) URL.
    pub fn with_base_url(credentials: Credentials, base_url: &str) -> Result<Self, VenueError> {
        let http = Client::builder()
            .user_agent(coffeewalk_core::config::DEFAULT_USER_AGENT)
            .build()
            .map_err(VenueError::http)?;
        Self::from_parts(http, credentials, base_url)
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`VenueClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, VenueError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let credentials = Credentials::new(
            config.foursquare_client_id.as_str(),
            config.foursquare_client_secret.as_str(),
        );
        let http = builder.build().map_err(VenueError::http)?;
        Self::from_parts(http, credentials, &config.api_base_url)
    }

    fn from_parts(
        http: Client,
        credentials: Credentials,
        base_url: &str,
    ) -> Result<Self, VenueError> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            VenueError::InvalidRequest(format!("invalid base URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(VenueError::InvalidRequest(format!(
                "base URL '{base_url}' must be an absolute http(s) URL"
            )));
        }

        Ok(Self {
            http,
            credentials,
            base_url,
            slot: RequestSlot::default(),
        })
    }

    /// Searches for coffee shops within `radius` of `coordinate`.
    ///
    /// Returns immediately; the [`PendingFetch`] resolves once with the
    /// outcome. An empty list is a successful result.
    pub fn fetch_nearby(
        &self,
        coordinate: Coordinate,
        radius: SearchRadius,
    ) -> PendingFetch<Vec<Venue>> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.fetch_nearby_with(coordinate, radius, move |outcome| {
            let _ = tx.send(outcome);
        });
        PendingFetch::new(rx)
    }

    /// Callback form of [`VenueClient::fetch_nearby`]. `completion` is
    /// invoked exactly once, on a runtime worker.
    pub fn fetch_nearby_with<C>(
        &self,
        coordinate: Coordinate,
        radius: SearchRadius,
        completion: C,
    ) where
        C: FnOnce(FetchOutcome<Vec<Venue>>) + Send + 'static,
    {
        let url = self.explore_url(coordinate, radius, today());
        let http = self.http.clone();
        self.slot.start(
            "explore",
            async move {
                let body = request_json(&http, url?).await?;
                let venues = parse_nearby_list(&body)?;
                tracing::debug!(count = venues.len(), "explore returned venues");
                Ok::<_, VenueError>(venues)
            },
            completion,
        );
    }

    /// Looks up website and phone details for `venue`.
    ///
    /// On success the returned venue keeps the input's identity, location and
    /// address; see [`Venue::with_details`] for how contact fields are merged.
    pub fn fetch_details(&self, venue: Venue) -> PendingFetch<Venue> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.fetch_details_with(venue, move |outcome| {
            let _ = tx.send(outcome);
        });
        PendingFetch::new(rx)
    }

    /// Callback form of [`VenueClient::fetch_details`].
    pub fn fetch_details_with<C>(&self, venue: Venue, completion: C)
    where
        C: FnOnce(FetchOutcome<Venue>) + Send + 'static,
    {
        let url = self.details_url(&venue.id, today());
        let http = self.http.clone();
        self.slot.start(
            "details",
            async move {
                let body = request_json(&http, url?).await?;
                let details = parse_details(&body)?;
                Ok::<_, VenueError>(venue.with_details(details))
            },
            completion,
        );
    }

    /// Cancels the in-flight request, if any. Its completion reports
    /// [`FetchOutcome::Canceled`].
    pub fn cancel(&self) {
        self.slot.cancel();
    }

    /// Builds `{base}/explore?ll=..&radius=..&section=coffee&<credentials>`.
    fn explore_url(
        &self,
        coordinate: Coordinate,
        radius: SearchRadius,
        date: NaiveDate,
    ) -> Result<Url, VenueError> {
        if !coordinate.is_valid() {
            return Err(VenueError::InvalidRequest(format!(
                "coordinate out of range: {coordinate}"
            )));
        }

        let mut url = self.endpoint("explore")?;
        let mut query = format!(
            "ll={},{}&radius={}&section={SECTION}",
            coordinate.latitude,
            coordinate.longitude,
            radius.meters()
        );
        self.append_credentials(&mut query, date);
        url.set_query(Some(&query));
        Ok(url)
    }

    /// Builds `{base}/{venue_id}?<credentials>`.
    fn details_url(&self, venue_id: &str, date: NaiveDate) -> Result<Url, VenueError> {
        if venue_id.trim().is_empty() {
            return Err(VenueError::InvalidRequest("venue id is empty".to_owned()));
        }

        let mut url = self.endpoint(venue_id)?;
        let mut query = String::new();
        self.append_credentials(&mut query, date);
        url.set_query(Some(&query));
        Ok(url)
    }

    fn endpoint(&self, segment: &str) -> Result<Url, VenueError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                VenueError::InvalidRequest(format!("cannot extend base URL {}", self.base_url))
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Appends `client_id`, `client_secret` and the `v=yyyyMMdd` version stamp.
    fn append_credentials(&self, query: &mut String, date: NaiveDate) {
        if !query.is_empty() {
            query.push('&');
        }
        // Writing into a String cannot fail.
        let _ = write!(
            query,
            "client_id={}&client_secret={}&v={}",
            utf8_percent_encode(&self.credentials.client_id, QUERY_VALUE),
            utf8_percent_encode(&self.credentials.client_secret, QUERY_VALUE),
            date.format("%Y%m%d")
        );
    }
}

/// Local calendar date used for the version stamp, read at call time.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Sends a GET request, checks for a 2xx status and parses the body as JSON.
///
/// Error context uses only the URL path so credentials never end up in logs
/// or error messages.
async fn request_json(http: &Client, url: Url) -> Result<serde_json::Value, VenueError> {
    let path = url.path().to_owned();
    tracing::debug!(path = %path, "sending venue request");

    let response = http.get(url).send().await.map_err(VenueError::http)?;
    let status = response.status();
    let body = response.text().await.map_err(VenueError::http)?;

    if !status.is_success() {
        let status = status.as_u16();
        tracing::debug!(path = %path, status, "venue request rejected");
        // A JSON error body is the provider answering without a `response`
        // payload; anything else came from the transport path.
        return Err(match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => VenueError::Provider {
                status,
                path,
                detail: provider_error_detail(&json),
            },
            Err(_) => VenueError::UnexpectedStatus { status, path },
        });
    }

    serde_json::from_str(&body).map_err(|e| VenueError::Json {
        context: path,
        source: e,
    })
}

/// Extracts `meta.errorDetail` from a FourSquare error body, if present.
fn provider_error_detail(json: &serde_json::Value) -> Option<String> {
    json.get("meta")
        .and_then(|meta| meta.get("errorDetail"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
