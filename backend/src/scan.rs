use shared::{BoundingBox, ScanResponse};

use crate::overpass::{PlaceSearch, PoiCategory};

/// Collect police stations and safe stops over the viewport concurrently.
///
/// A category that fails comes back empty rather than failing the scan;
/// the map stays useful with whichever layer resolved.
pub async fn scan_area(places: &dyn PlaceSearch, bbox: BoundingBox) -> ScanResponse {
    let (police, safe_stops) = tokio::join!(
        places.query(bbox, PoiCategory::Police),
        places.query(bbox, PoiCategory::SafeStop),
    );

    ScanResponse {
        police: police.unwrap_or_else(|err| {
            tracing::warn!("Police station scan failed: {err}");
            Vec::new()
        }),
        safe_stops: safe_stops.unwrap_or_else(|err| {
            tracing::warn!("Safe stop scan failed: {err}");
            Vec::new()
        }),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use shared::{GeoPoint, Poi};

    use super::*;
    use crate::overpass::PlaceSearchError;

    const BBOX: BoundingBox = BoundingBox {
        south: 18.90,
        west: 72.80,
        north: 18.98,
        east: 72.88,
    };

    struct StubPlaces {
        police_fails: bool,
    }

    fn poi(name: &str, category: &str) -> Poi {
        Poi {
            position: GeoPoint {
                lat: 18.94,
                lng: 72.83,
            },
            name: name.to_string(),
            category: category.to_string(),
            open_around_clock: false,
        }
    }

    #[async_trait]
    impl PlaceSearch for StubPlaces {
        async fn query(
            &self,
            _bbox: BoundingBox,
            category: PoiCategory,
        ) -> Result<Vec<Poi>, PlaceSearchError> {
            match category {
                PoiCategory::Police if self.police_fails => {
                    // An unparseable URL yields a request error without
                    // touching the network.
                    let err = reqwest::Client::new()
                        .get("relative-url-without-base")
                        .send()
                        .await
                        .expect_err("invalid url must not resolve");
                    Err(PlaceSearchError::Http(err))
                }
                PoiCategory::Police => Ok(vec![poi("Colaba Police Station", "police")]),
                PoiCategory::SafeStop => Ok(vec![
                    poi("Sea View Cafe", "cafe"),
                    poi("City Fuel", "fuel"),
                ]),
            }
        }
    }

    #[tokio::test]
    async fn test_scan_merges_both_categories() {
        let places = StubPlaces {
            police_fails: false,
        };
        let scan = scan_area(&places, BBOX).await;

        assert_eq!(scan.police.len(), 1);
        assert_eq!(scan.safe_stops.len(), 2);
        assert_eq!(scan.police[0].name, "Colaba Police Station");
    }

    #[tokio::test]
    async fn test_failed_category_comes_back_empty() {
        let places = StubPlaces { police_fails: true };
        let scan = scan_area(&places, BBOX).await;

        assert!(scan.police.is_empty());
        assert_eq!(scan.safe_stops.len(), 2);
    }
}
