//! varnex-va library interface
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::services::{
    HotspotService, IsoformOverrideService, MutationAssessorService, VariantAnnotator,
};

/// Application state shared across handlers
///
/// Holds the long-lived collaborators only. Per-request enrichment state is
/// built by the handlers and dropped with the request.
#[derive(Clone)]
pub struct AppState {
    /// Base annotation resolver (VEP)
    pub annotator: Arc<dyn VariantAnnotator>,
    /// Isoform override tables
    pub isoform_overrides: Arc<dyn IsoformOverrideService>,
    /// Cancer hotspot data
    pub hotspots: Arc<dyn HotspotService>,
    /// Mutation-impact scores
    pub mutation_assessor: Arc<dyn MutationAssessorService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        annotator: Arc<dyn VariantAnnotator>,
        isoform_overrides: Arc<dyn IsoformOverrideService>,
        hotspots: Arc<dyn HotspotService>,
        mutation_assessor: Arc<dyn MutationAssessorService>,
    ) -> Self {
        Self {
            annotator,
            isoform_overrides,
            hotspots,
            mutation_assessor,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::annotation_routes())
        .merge(api::health_routes())
        .with_state(state)
}
