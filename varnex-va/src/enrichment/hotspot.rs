//! Cancer hotspot enricher
//!
//! Attaches hotspot classifications matching the annotation's residues.
//! Whether single-residue hotspots are included is fixed at construction.

use crate::enrichment::{payload_value, AnnotationEnricher, EnrichmentError};
use crate::models::VariantAnnotation;
use crate::services::HotspotService;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub struct HotspotEnricher {
    hotspots: Arc<dyn HotspotService>,
    include_single_residue: bool,
}

impl HotspotEnricher {
    pub fn new(hotspots: Arc<dyn HotspotService>, include_single_residue: bool) -> Self {
        Self {
            hotspots,
            include_single_residue,
        }
    }
}

#[async_trait]
impl AnnotationEnricher for HotspotEnricher {
    async fn enrich(&self, annotation: &VariantAnnotation) -> Result<Option<Value>, EnrichmentError> {
        let hits = self
            .hotspots
            .hotspots_for(annotation, self.include_single_residue)
            .await?;

        if hits.is_empty() {
            Ok(None)
        } else {
            Ok(Some(payload_value(&hits)?))
        }
    }
}
