use thiserror::Error;

use crate::nominatim::GeocodeError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error("no route found between the requested locations")]
    NoRoutesFound,
}
