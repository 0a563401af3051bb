//! Geocoding providers: the GSI address-search service.

use super::types::{Coordinate, GeocodeError};
use serde::Deserialize;
use std::time::Duration;

/// Default endpoint of the GSI (国土地理院) address search API.
pub const GSI_ADDRESS_SEARCH_URL: &str = "https://msearch.gsi.go.jp/address-search/AddressSearch";

const USER_AGENT: &str = concat!("geonews/", env!("CARGO_PKG_VERSION"));

/// Turns a place query into a coordinate.
///
/// Failures are values, not panics: the refresh loop drops the article and
/// moves on.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError>;
}

// ─── Response shape ─────────────────────────────────────────────

#[derive(Deserialize)]
struct GsiFeature {
    geometry: GsiGeometry,
    #[serde(default)]
    properties: Option<GsiProperties>,
}

#[derive(Deserialize)]
struct GsiGeometry {
    /// GeoJSON order: longitude, latitude.
    coordinates: Vec<f64>,
}

#[derive(Deserialize)]
struct GsiProperties {
    #[serde(default)]
    title: Option<String>,
}

/// Interpret a GSI response body. Takes the first feature and swaps its
/// `[lon, lat]` pair into a latitude-first [`Coordinate`].
pub fn parse_response(query: &str, body: &str) -> Result<Coordinate, GeocodeError> {
    let features: Vec<GsiFeature> =
        serde_json::from_str(body).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    let first = features
        .first()
        .ok_or_else(|| GeocodeError::NoResults(query.to_string()))?;

    match first.geometry.coordinates.as_slice() {
        [lon, lat, ..] => {
            if let Some(title) = first.properties.as_ref().and_then(|p| p.title.as_deref()) {
                tracing::debug!(query, matched = title, "geocoder match");
            }
            Ok(Coordinate::new(*lat, *lon))
        }
        other => Err(GeocodeError::InvalidResponse(format!(
            "expected [lon, lat], got {} values",
            other.len()
        ))),
    }
}

// ─── GSI client ─────────────────────────────────────────────────

/// Blocking client for the GSI address search API.
pub struct GsiGeocoder {
    agent: ureq::Agent,
    base_url: String,
}

impl GsiGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl Default for GsiGeocoder {
    fn default() -> Self {
        Self::new(GSI_ADDRESS_SEARCH_URL, Duration::from_secs(10))
    }
}

impl Geocoder for GsiGeocoder {
    fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let response = match self.agent.get(&self.base_url).query("q", query).call() {
            Ok(r) => r,
            Err(ureq::Error::Status(code, _)) => return Err(GeocodeError::Status(code)),
            Err(e) => return Err(GeocodeError::Network(e.to_string())),
        };

        // ureq only errors on 4xx/5xx; anything else that isn't 200 is still a miss.
        if response.status() != 200 {
            return Err(GeocodeError::Status(response.status()));
        }

        let body = response
            .into_string()
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        parse_response(query, &body)
    }
}
