//! Free-text geocoding via Nominatim.
//!
//! The address book needs coordinates before the backend will accept an
//! address, and users type cities and zip codes, not latitudes. This
//! client resolves a free-text query to a single best-match point.
//! Nominatim is a public service; its usage policy requires an
//! identifying User-Agent, which comes from configuration.

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::GeocoderConfig;

/// Errors that can occur during a geocode lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Result row carried coordinates that do not parse.
    #[error("geocoder returned unparseable coordinates: {0}")]
    BadCoordinate(#[from] std::num::ParseFloatError),
}

/// A geocoded point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One result row from the Nominatim search endpoint.
///
/// Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

/// Client for the Nominatim search API.
#[derive(Clone)]
pub struct GeocoderClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl GeocoderClient {
    /// Create a new geocoder client.
    #[must_use]
    pub fn new(config: &GeocoderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Look up coordinates for a free-text query (typically "city zip").
    ///
    /// Returns `Ok(None)` when the geocoder finds nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the geocoder is unreachable, answers with a
    /// non-success status, or hands back coordinates that do not parse.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let results: Vec<SearchResult> = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("format", "json"), ("limit", "1"), ("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        Ok(Some(GeoPoint {
            lat: first.lat.parse::<f64>()?,
            lng: first.lon.parse::<f64>()?,
        }))
    }
}
