//! Post-annotation enrichment
//!
//! After the base annotation is resolved, a per-request `EnrichmentService`
//! applies a caller-selected set of enrichers, each attaching one named
//! auxiliary field. Enrichment is strictly additive: payloads land in the
//! annotation's enrichment map and never touch the canonical base fields.
//!
//! Failure isolation: an enricher that cannot reach its upstream loses only
//! its own field. The service logs the failure and continues with the
//! remaining enrichers, so callers always get the base annotation back.

pub mod factory;
pub mod hotspot;
pub mod isoform;
pub mod mutation_assessor;

pub use factory::build_enrichment_service;
pub use hotspot::HotspotEnricher;
pub use isoform::IsoformOverrideEnricher;
pub use mutation_assessor::MutationAssessorEnricher;

use crate::models::VariantAnnotation;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Enrichment failure modes
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The backing data service could not be reached or answered abnormally.
    /// The field is omitted; the request still succeeds.
    #[error("enrichment data unavailable: {0}")]
    Unavailable(String),

    /// The enricher was registered against a source or service it cannot
    /// serve. Should not happen given the registration guards; treated as a
    /// local no-op.
    #[error("enricher misconfigured: {0}")]
    Misconfigured(String),
}

/// Serialize an enrichment payload to the attachable JSON form
pub(crate) fn payload_value<T: serde::Serialize>(payload: &T) -> Result<Value, EnrichmentError> {
    serde_json::to_value(payload)
        .map_err(|e| EnrichmentError::Misconfigured(format!("payload not serializable: {}", e)))
}

/// One unit of enrichment work
///
/// Given a base annotation, compute the auxiliary payload this enricher is
/// responsible for. `Ok(None)` means the upstream has no data for this
/// variant; the field is simply omitted. Errors are reserved for
/// transport/configuration failures of the backing service.
///
/// Enrichers do not write to the annotation themselves; the service attaches
/// the returned payload under the registered field name.
#[async_trait]
pub trait AnnotationEnricher: Send + Sync {
    async fn enrich(&self, annotation: &VariantAnnotation) -> Result<Option<Value>, EnrichmentError>;
}

/// Ordered field-name → enricher mapping
///
/// Registration order is preserved and determines application order.
/// Registering an existing name replaces the enricher but keeps the original
/// position. Lifetime equals one request; there is no removal.
#[derive(Default)]
pub struct EnricherRegistry {
    entries: Vec<(String, Box<dyn AnnotationEnricher>)>,
}

impl EnricherRegistry {
    pub fn register(&mut self, field_name: impl Into<String>, enricher: Box<dyn AnnotationEnricher>) {
        let field_name = field_name.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field_name) {
            Some(entry) => entry.1 = enricher,
            None => self.entries.push((field_name, enricher)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn AnnotationEnricher)> {
        self.entries
            .iter()
            .map(|(name, enricher)| (name.as_str(), enricher.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Applies registered enrichers to resolved annotations
///
/// Built fresh for every request (enabled fields vary per request), handed to
/// the variant annotator as a post-processing hook. With zero registrations,
/// `enrich` is the identity transform.
#[derive(Default)]
pub struct EnrichmentService {
    registry: EnricherRegistry,
}

impl EnrichmentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enricher for a field name (last registration wins)
    pub fn register_enricher(
        &mut self,
        field_name: impl Into<String>,
        enricher: Box<dyn AnnotationEnricher>,
    ) {
        self.registry.register(field_name, enricher);
    }

    /// Registered field names, in application order
    pub fn registered_fields(&self) -> Vec<&str> {
        self.registry.iter().map(|(name, _)| name).collect()
    }

    /// Apply every registered enricher to one annotation, in registration
    /// order
    ///
    /// Infallible by design: an enricher failure loses only its own field.
    pub async fn enrich(&self, annotation: &mut VariantAnnotation) {
        for (field_name, enricher) in self.registry.iter() {
            match enricher.enrich(annotation).await {
                Ok(Some(payload)) => annotation.set_enrichment(field_name, payload),
                Ok(None) => {
                    // no upstream data for this variant; omit the field
                }
                Err(e) => {
                    warn!(
                        variant = %annotation.variant,
                        field = field_name,
                        "enrichment skipped: {}", e
                    );
                }
            }
        }
    }

    /// Apply enrichment to each annotation independently
    ///
    /// Elements have no ordering dependency on one another, so they are
    /// enriched concurrently.
    pub async fn enrich_all(&self, annotations: &mut [VariantAnnotation]) {
        futures::future::join_all(annotations.iter_mut().map(|a| self.enrich(a))).await;
    }
}
