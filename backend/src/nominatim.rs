use async_trait::async_trait;
use serde::Deserialize;
use shared::GeoPoint;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("no geocoding match for {0:?}")]
    NotFound(String),
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected geocoding payload: {0}")]
    Malformed(String),
}

/// A resolved place: coordinates plus the label the geocoder gave it.
#[derive(Debug, Clone)]
pub struct Place {
    pub position: GeoPoint,
    pub label: String,
}

/// Forward and reverse geocoding as the HTTP layer consumes it.
///
/// # Contract
/// `forward` fails loudly so the caller can report an unresolvable query.
/// `reverse` degrades to a bare coordinate label instead; a missing
/// address must never sink a route request.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn forward(&self, query: &str) -> Result<Place, GeocodeError>;
    async fn reverse(&self, point: GeoPoint) -> String;
}

/// Client for a Nominatim search/reverse endpoint pair.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    bias: Option<String>,
}

impl NominatimClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            bias: None,
        }
    }

    /// Region suffix appended to under-specified queries, e.g. "Mumbai,
    /// India" so that "Bandra Station" resolves to the local one.
    pub fn with_bias(mut self, bias: impl Into<String>) -> Self {
        self.bias = Some(bias.into());
        self
    }

    /// Append the bias suffix unless the query already mentions the
    /// region, matched on the suffix's last comma component.
    fn biased_query(&self, query: &str) -> String {
        let Some(bias) = &self.bias else {
            return query.to_string();
        };
        let marker = bias.rsplit(',').next().unwrap_or(bias).trim().to_lowercase();
        if !marker.is_empty() && !query.to_lowercase().contains(&marker) {
            format!("{query}, {bias}")
        } else {
            query.to_string()
        }
    }

    async fn try_reverse(&self, point: GeoPoint) -> Result<String, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let lat = point.lat.to_string();
        let lng = point.lng.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lng.as_str()),
            ])
            .send()
            .await?;
        let row: ReverseRow = response.json().await?;

        Ok(row.display_name)
    }
}

// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct SearchRow {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct ReverseRow {
    display_name: String,
}

fn place_from_row(row: SearchRow) -> Result<Place, GeocodeError> {
    let lat = row
        .lat
        .parse::<f64>()
        .map_err(|_| GeocodeError::Malformed(format!("latitude {:?}", row.lat)))?;
    let lng = row
        .lon
        .parse::<f64>()
        .map_err(|_| GeocodeError::Malformed(format!("longitude {:?}", row.lon)))?;

    Ok(Place {
        position: GeoPoint { lat, lng },
        label: row.display_name,
    })
}

fn fallback_label(point: GeoPoint) -> String {
    format!("{:.4}, {:.4}", point.lat, point.lng)
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn forward(&self, query: &str) -> Result<Place, GeocodeError> {
        if query.trim().is_empty() {
            return Err(GeocodeError::NotFound(query.to_string()));
        }

        let biased = self.biased_query(query);
        tracing::debug!("Geocoding {biased:?}");

        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("format", "json"), ("q", biased.as_str()), ("limit", "5")])
            .send()
            .await?;
        let rows: Vec<SearchRow> = response.json().await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;
        place_from_row(row)
    }

    async fn reverse(&self, point: GeoPoint) -> String {
        match self.try_reverse(point).await {
            Ok(label) => label,
            Err(err) => {
                tracing::warn!("Reverse geocoding failed, using coordinate label: {err}");
                fallback_label(point)
            }
        }
    }
}
