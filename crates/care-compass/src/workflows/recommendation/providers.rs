use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use super::domain::Coordinates;

/// Distance and duration reported by a routing provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Failure surfaced by an external lookup. The pipeline treats every
/// variant the same way: recover locally and report a diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum ProviderFailure {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("lookup failed: {0}")]
    Lookup(String),
    #[error("no result for the requested location")]
    NoResult,
}

/// Resolves a free-text facility address to coordinates. Vendor adapters,
/// stubs, and test doubles all implement this seam; the engine never talks
/// to a specific mapping vendor.
pub trait Geocoder: Send + Sync {
    fn geocode<'a>(&'a self, address: &'a str)
        -> BoxFuture<'a, Result<Coordinates, ProviderFailure>>;
}

/// Produces a route estimate between two points. Implementations own any
/// retry policy; the engine issues exactly one call per candidate.
pub trait RoutePlanner: Send + Sync {
    fn route(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> BoxFuture<'_, Result<RouteEstimate, ProviderFailure>>;
}
