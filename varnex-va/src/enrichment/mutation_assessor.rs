//! Mutation-impact score enricher

use crate::enrichment::{payload_value, AnnotationEnricher, EnrichmentError};
use crate::models::VariantAnnotation;
use crate::services::MutationAssessorService;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub struct MutationAssessorEnricher {
    scores: Arc<dyn MutationAssessorService>,
}

impl MutationAssessorEnricher {
    pub fn new(scores: Arc<dyn MutationAssessorService>) -> Self {
        Self { scores }
    }
}

#[async_trait]
impl AnnotationEnricher for MutationAssessorEnricher {
    async fn enrich(&self, annotation: &VariantAnnotation) -> Result<Option<Value>, EnrichmentError> {
        match self.scores.score_for(annotation).await? {
            Some(score) => Ok(Some(payload_value(&score)?)),
            None => Ok(None),
        }
    }
}
