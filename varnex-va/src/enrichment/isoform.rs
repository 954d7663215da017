//! Isoform override enricher
//!
//! Attaches the override transcript for the annotation's gene from one named
//! override source. Registered under the source's name, and only when the
//! override service reports having data for that source.

use crate::enrichment::{payload_value, AnnotationEnricher, EnrichmentError};
use crate::models::VariantAnnotation;
use crate::services::IsoformOverrideService;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub struct IsoformOverrideEnricher {
    source: String,
    overrides: Arc<dyn IsoformOverrideService>,
}

impl IsoformOverrideEnricher {
    pub fn new(source: impl Into<String>, overrides: Arc<dyn IsoformOverrideService>) -> Self {
        Self {
            source: source.into(),
            overrides,
        }
    }
}

#[async_trait]
impl AnnotationEnricher for IsoformOverrideEnricher {
    async fn enrich(&self, annotation: &VariantAnnotation) -> Result<Option<Value>, EnrichmentError> {
        match self.overrides.overrides_for(&self.source, annotation).await? {
            Some(override_entry) => Ok(Some(payload_value(&override_entry)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IsoformOverride, TranscriptConsequence};

    struct SingleSourceOverrides;

    #[async_trait]
    impl IsoformOverrideService for SingleSourceOverrides {
        fn has_data(&self, source: &str) -> bool {
            source == "uniprot"
        }

        async fn overrides_for(
            &self,
            source: &str,
            annotation: &VariantAnnotation,
        ) -> Result<Option<IsoformOverride>, EnrichmentError> {
            if source != "uniprot" {
                return Ok(None);
            }
            Ok(annotation
                .gene_symbols()
                .iter()
                .find(|g| **g == "BRAF")
                .map(|_| IsoformOverride {
                    gene_symbol: "BRAF".to_string(),
                    transcript_id: "ENST00000288602".to_string(),
                }))
        }
    }

    #[tokio::test]
    async fn attaches_override_for_matching_gene() {
        let enricher = IsoformOverrideEnricher::new("uniprot", Arc::new(SingleSourceOverrides));
        let mut annotation = VariantAnnotation::new("7:g.140453136A>T");
        annotation.transcript_consequences = vec![TranscriptConsequence {
            gene_symbol: Some("BRAF".to_string()),
            ..Default::default()
        }];

        let payload = enricher.enrich(&annotation).await.unwrap().unwrap();
        assert_eq!(payload["transcriptId"], "ENST00000288602");
    }

    #[tokio::test]
    async fn no_override_means_no_field() {
        let enricher = IsoformOverrideEnricher::new("uniprot", Arc::new(SingleSourceOverrides));
        let annotation = VariantAnnotation::new("X:g.66937331T>A");

        assert!(enricher.enrich(&annotation).await.unwrap().is_none());
    }
}
