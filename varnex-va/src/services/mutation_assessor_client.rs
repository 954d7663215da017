// Mutation Assessor API Client
//
// Looks up precomputed mutation-impact scores by genomic coordinates.

use crate::enrichment::EnrichmentError;
use crate::models::{MutationAssessorScore, VariantAnnotation};
use crate::services::MutationAssessorService;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub struct MutationAssessorClient {
    client: reqwest::Client,
    base_url: String,
}

impl MutationAssessorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("varnex/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client (system error)"),
            base_url: base_url.into(),
        }
    }
}

/// Comma-separated genomic key the score service is indexed by:
/// "chromosome,position,reference,alternate". None when the annotation is
/// missing any piece (nothing to look up).
fn variant_key(annotation: &VariantAnnotation) -> Option<String> {
    let chromosome = annotation.seq_region_name.as_deref()?;
    let position = annotation.start?;
    let alleles = annotation.allele_string.as_deref()?;
    let (reference, alternate) = alleles.split_once('/')?;

    Some(format!("{},{},{},{}", chromosome, position, reference, alternate))
}

#[async_trait]
impl MutationAssessorService for MutationAssessorClient {
    async fn score_for(
        &self,
        annotation: &VariantAnnotation,
    ) -> Result<Option<MutationAssessorScore>, EnrichmentError> {
        let Some(key) = variant_key(annotation) else {
            debug!(variant = %annotation.variant, "no genomic key; skipping score lookup");
            return Ok(None);
        };

        let url = format!("{}/api/scores", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("variant", key.as_str())])
            .send()
            .await
            .map_err(|e| EnrichmentError::Unavailable(format!("score request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(EnrichmentError::Unavailable(format!(
                "score service returned error status: {}",
                response.status()
            )));
        }

        let score = response.json().await.map_err(|e| {
            EnrichmentError::Unavailable(format!("failed to parse score response: {}", e))
        })?;
        Ok(Some(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_key_from_genomic_coordinates() {
        let mut annotation = VariantAnnotation::new("7:g.140453136A>T");
        annotation.seq_region_name = Some("7".to_string());
        annotation.start = Some(140453136);
        annotation.allele_string = Some("A/T".to_string());

        assert_eq!(variant_key(&annotation).as_deref(), Some("7,140453136,A,T"));
    }

    #[test]
    fn missing_coordinates_yield_no_key() {
        let mut annotation = VariantAnnotation::new("7:g.140453136A>T");
        annotation.allele_string = Some("A/T".to_string());
        assert!(variant_key(&annotation).is_none());

        annotation.seq_region_name = Some("7".to_string());
        annotation.start = Some(140453136);
        annotation.allele_string = Some("AT".to_string()); // no separator
        assert!(variant_key(&annotation).is_none());
    }

    #[test]
    fn score_parses_from_api_shape() {
        let score: MutationAssessorScore = serde_json::from_str(
            r#"{
                "functionalImpact": "medium",
                "functionalImpactScore": 2.65,
                "msaLink": "http://mutationassessor.org/r3/?cm=msa&ty=f&p=BRAF_HUMAN&rb=551&re=700",
                "pdbLink": null
            }"#,
        )
        .unwrap();

        assert_eq!(score.functional_impact.as_deref(), Some("medium"));
        assert_eq!(score.functional_impact_score, Some(2.65));
        assert!(score.pdb_link.is_none());
    }
}
