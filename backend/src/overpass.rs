use async_trait::async_trait;
use serde::Deserialize;
use shared::{BoundingBox, GeoPoint, Poi};

#[derive(Debug, thiserror::Error)]
pub enum PlaceSearchError {
    #[error("place search request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Amenity families the area scan understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoiCategory {
    Police,
    SafeStop,
}

impl PoiCategory {
    fn default_name(self) -> &'static str {
        match self {
            PoiCategory::Police => "Police Station",
            PoiCategory::SafeStop => "Safe Stop",
        }
    }
}

/// Amenity lookup consumed by the area scan.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn query(
        &self,
        bbox: BoundingBox,
        category: PoiCategory,
    ) -> Result<Vec<Poi>, PlaceSearchError>;
}

/// Client for an Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    base_url: String,
}

impl OverpassClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }
}

/// Overpass QL for one category over a south,west,north,east box.
///
/// Police coverage includes ways and relations (station grounds are often
/// mapped as areas), resolved to their center point. Safe stops are point
/// amenities, capped at 200 so dense districts stay readable.
fn overpass_ql(bbox: BoundingBox, category: PoiCategory) -> String {
    let bbox = format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east);
    match category {
        PoiCategory::Police => format!(
            r#"[out:json][timeout:25];
(
  node["amenity"="police"]({bbox});
  way["amenity"="police"]({bbox});
  relation["amenity"="police"]({bbox});
);
out center;"#
        ),
        PoiCategory::SafeStop => format!(
            r#"[out:json][timeout:25];
(
  node["shop"="convenience"]({bbox});
  node["amenity"="fuel"]({bbox});
  node["amenity"="hospital"]({bbox});
  node["amenity"="cafe"]({bbox});
);
out center 200;"#
        ),
    }
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: OverpassTags,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OverpassTags {
    name: Option<String>,
    amenity: Option<String>,
    shop: Option<String>,
    opening_hours: Option<String>,
}

fn poi_from_element(el: OverpassElement, category: PoiCategory) -> Option<Poi> {
    let (lat, lng) = match (el.lat, el.lon, &el.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(center)) => (center.lat, center.lon),
        _ => return None,
    };

    let kind = match category {
        PoiCategory::Police => el.tags.amenity.unwrap_or_else(|| "police".to_string()),
        PoiCategory::SafeStop => el
            .tags
            .amenity
            .or(el.tags.shop)
            .unwrap_or_else(|| "safe_spot".to_string()),
    };
    // Fuel stations and hospitals are treated as always open even when the
    // opening_hours tag is missing.
    let open_around_clock = el.tags.opening_hours.as_deref() == Some("24/7")
        || kind.contains("fuel")
        || kind.contains("hospital");
    let name = el
        .tags
        .name
        .unwrap_or_else(|| category.default_name().to_string());

    Some(Poi {
        position: GeoPoint { lat, lng },
        name,
        category: kind,
        open_around_clock,
    })
}

#[async_trait]
impl PlaceSearch for OverpassClient {
    async fn query(
        &self,
        bbox: BoundingBox,
        category: PoiCategory,
    ) -> Result<Vec<Poi>, PlaceSearchError> {
        let ql = overpass_ql(bbox, category);
        let url = format!("{}/api/interpreter", self.base_url);
        tracing::debug!("Overpass {category:?} query over {bbox:?}");

        let response = self
            .http
            .get(&url)
            .query(&[("data", ql.as_str())])
            .send()
            .await?;
        let body: OverpassResponse = response.json().await?;

        Ok(body
            .elements
            .into_iter()
            .filter_map(|el| poi_from_element(el, category))
            .collect())
    }
}
