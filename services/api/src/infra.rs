use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use care_compass::config::DatasetConfig;
use care_compass::error::AppError;
use care_compass::workflows::intake::SheetImporter;
use care_compass::workflows::recommendation::{
    Coordinates, FacilityRecord, Geocoder, ProviderFailure, RouteEstimate, RoutePlanner,
};
use futures::future::BoxFuture;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Placeholder geocoder for deployments without a mapping vendor wired in.
/// The pipeline degrades per contract: coordinate-less facilities are
/// skipped with a diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UnconfiguredGeocoder;

impl Geocoder for UnconfiguredGeocoder {
    fn geocode<'a>(
        &'a self,
        _address: &'a str,
    ) -> BoxFuture<'a, Result<Coordinates, ProviderFailure>> {
        Box::pin(async {
            Err(ProviderFailure::Unavailable(
                "geocoding provider not configured".to_string(),
            ))
        })
    }
}

/// Placeholder route planner; every candidate falls back to its
/// straight-line distance with no duration.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UnconfiguredRoutePlanner;

impl RoutePlanner for UnconfiguredRoutePlanner {
    fn route(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
    ) -> BoxFuture<'_, Result<RouteEstimate, ProviderFailure>> {
        Box::pin(async {
            Err(ProviderFailure::Unavailable(
                "route provider not configured".to_string(),
            ))
        })
    }
}

pub(crate) fn load_facilities(dataset: &DatasetConfig) -> Result<Vec<FacilityRecord>, AppError> {
    match &dataset.sheet_path {
        Some(path) => {
            let import = SheetImporter::from_path(path)?;
            for issue in &import.issues {
                warn!(%issue, "facility row skipped during import");
            }
            info!(
                count = import.facilities.len(),
                sheet = %path.display(),
                "facility sheet loaded"
            );
            Ok(import.facilities)
        }
        None => {
            warn!("APP_FACILITY_SHEET is not set; serving an empty facility dataset");
            Ok(Vec::new())
        }
    }
}
