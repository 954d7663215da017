//! Per-request enrichment service construction
//!
//! Translates a request's `isoformOverrideSource` and `fields` parameters
//! into a populated `EnrichmentService`. Used identically by the single and
//! batch annotation paths.

use crate::enrichment::{
    EnrichmentService, HotspotEnricher, IsoformOverrideEnricher, MutationAssessorEnricher,
};
use crate::services::{HotspotService, IsoformOverrideService, MutationAssessorService};
use std::sync::Arc;
use tracing::debug;

// Request token → response field key. `hotspots` deliberately maps to a
// different response key; keep the table here, not inside the enrichers.
const HOTSPOTS_TOKEN: &str = "hotspots";
const HOTSPOTS_FIELD: &str = "cancerHotspots";
const MUTATION_ASSESSOR_TOKEN: &str = "mutation_assessor";
const MUTATION_ASSESSOR_FIELD: &str = "mutation_assessor";

/// Build the post-enrichment service for one request
///
/// Token matching is case-sensitive and exact; unrecognized tokens are
/// ignored without error so new field names can roll out ahead of older
/// deployments. The override enricher is registered only when the override
/// source actually has data — a missing source means the field is omitted,
/// not that the request fails.
///
/// Enrichment runs after the base annotation is fully formed; nothing a
/// registered enricher attaches becomes part of the canonical annotation.
pub fn build_enrichment_service(
    override_source: Option<&str>,
    fields: &[String],
    overrides: &Arc<dyn IsoformOverrideService>,
    hotspots: &Arc<dyn HotspotService>,
    mutation_assessor: &Arc<dyn MutationAssessorService>,
) -> EnrichmentService {
    let mut service = EnrichmentService::new();

    if let Some(source) = override_source {
        if overrides.has_data(source) {
            service.register_enricher(
                source,
                Box::new(IsoformOverrideEnricher::new(source, Arc::clone(overrides))),
            );
        } else {
            debug!(source, "isoform override source has no data; field omitted");
        }
    }

    if fields.iter().any(|f| f == HOTSPOTS_TOKEN) {
        service.register_enricher(
            HOTSPOTS_FIELD,
            Box::new(HotspotEnricher::new(Arc::clone(hotspots), true)),
        );
    }

    if fields.iter().any(|f| f == MUTATION_ASSESSOR_TOKEN) {
        service.register_enricher(
            MUTATION_ASSESSOR_FIELD,
            Box::new(MutationAssessorEnricher::new(Arc::clone(mutation_assessor))),
        );
    }

    service
}
