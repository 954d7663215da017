//! External data service boundaries
//!
//! The enrichment core talks to its collaborators through these traits so
//! the service composition (and the tests) can swap implementations freely.
//! Production implementations live in the sibling client modules.

pub mod hotspot_client;
pub mod isoform_override;
pub mod mutation_assessor_client;
pub mod vep_client;

pub use hotspot_client::CancerHotspotsClient;
pub use isoform_override::FileIsoformOverrideService;
pub use mutation_assessor_client::MutationAssessorClient;
pub use vep_client::VepClient;

use crate::enrichment::{EnrichmentError, EnrichmentService};
use crate::models::{Hotspot, IsoformOverride, MutationAssessorScore, VariantAnnotation};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of the base annotation lookup itself
///
/// These surface as the request's overall failure; the enrichment pass never
/// masks them and never produces them.
#[derive(Debug, Error)]
pub enum AnnotatorError {
    /// The variant identifier could not be resolved to an annotation
    #[error("variant could not be resolved: {0}")]
    Unresolved(String),

    /// The annotation backend failed (transport, non-success status, bad payload)
    #[error("annotation lookup failed: {0}")]
    Upstream(String),
}

/// Resolves variant identifiers to base annotations
///
/// Implementations must invoke the provided hook's `enrich` on each resolved
/// annotation before returning it. Hook additions are response-only: they
/// must never reach whatever canonical representation the resolver keeps.
#[async_trait]
pub trait VariantAnnotator: Send + Sync {
    /// Resolve and enrich a single variant
    async fn annotate(
        &self,
        variant: &str,
        post_enrichment: &EnrichmentService,
    ) -> Result<VariantAnnotation, AnnotatorError>;

    /// Resolve and enrich a batch of variants
    ///
    /// Request order is preserved; variants the backend cannot resolve are
    /// dropped from the result.
    async fn annotate_all(
        &self,
        variants: &[String],
        post_enrichment: &EnrichmentService,
    ) -> Result<Vec<VariantAnnotation>, AnnotatorError>;
}

/// Isoform override tables, keyed by source name
#[async_trait]
pub trait IsoformOverrideService: Send + Sync {
    /// Whether the named source exists and has any data. Registration guard:
    /// the override enricher is only registered when this returns true.
    fn has_data(&self, source: &str) -> bool;

    /// The override matching this annotation's genes, if any
    async fn overrides_for(
        &self,
        source: &str,
        annotation: &VariantAnnotation,
    ) -> Result<Option<IsoformOverride>, EnrichmentError>;
}

/// Cancer hotspot classification data
#[async_trait]
pub trait HotspotService: Send + Sync {
    /// Hotspots matching this annotation's residues. Empty means no hotspot
    /// data for this variant.
    async fn hotspots_for(
        &self,
        annotation: &VariantAnnotation,
        include_single_residue: bool,
    ) -> Result<Vec<Hotspot>, EnrichmentError>;
}

/// Precomputed mutation-impact scores
#[async_trait]
pub trait MutationAssessorService: Send + Sync {
    /// The score for this annotation's genomic change, if known
    async fn score_for(
        &self,
        annotation: &VariantAnnotation,
    ) -> Result<Option<MutationAssessorScore>, EnrichmentError>;
}
