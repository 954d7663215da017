// Ensembl VEP REST Client
//
// Resolves HGVS variant identifiers to base annotations via the VEP web
// service, then runs the request's post-enrichment hook over each resolved
// annotation before returning it.

use crate::enrichment::EnrichmentService;
use crate::models::{TranscriptConsequence, VariantAnnotation};
use crate::services::{AnnotatorError, VariantAnnotator};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct VepAnnotation {
    input: Option<String>,
    assembly_name: Option<String>,
    seq_region_name: Option<String>,
    start: Option<i64>,
    end: Option<i64>,
    allele_string: Option<String>,
    strand: Option<i32>,
    most_severe_consequence: Option<String>,
    #[serde(default)]
    transcript_consequences: Vec<VepTranscriptConsequence>,
}

#[derive(Debug, Deserialize)]
struct VepTranscriptConsequence {
    transcript_id: Option<String>,
    gene_symbol: Option<String>,
    gene_id: Option<String>,
    #[serde(default)]
    consequence_terms: Vec<String>,
    protein_start: Option<i64>,
    protein_end: Option<i64>,
    hgvsc: Option<String>,
    hgvsp: Option<String>,
    canonical: Option<i32>,
}

pub struct VepClient {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl VepClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        // Ensembl REST rate limit: 15 requests/second
        // Safe: 15 is always non-zero
        let quota = governor::Quota::per_second(std::num::NonZeroU32::new(15).unwrap());
        let rate_limiter = governor::RateLimiter::direct(quota);

        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("varnex/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client (system error)"),
            base_url: base_url.into(),
            rate_limiter,
        }
    }

    /// Fetch the base annotation for a single HGVS variant
    async fn fetch_one(&self, variant: &str) -> Result<VariantAnnotation, AnnotatorError> {
        debug!("Fetching VEP annotation: {}", variant);

        self.rate_limiter.until_ready().await;

        let url = format!("{}/vep/human/hgvs/{}", self.base_url, variant);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AnnotatorError::Upstream(format!("VEP request failed: {}", e)))?;

        // VEP answers 400 for HGVS strings it cannot interpret
        if response.status() == reqwest::StatusCode::BAD_REQUEST
            || response.status() == reqwest::StatusCode::NOT_FOUND
        {
            return Err(AnnotatorError::Unresolved(variant.to_string()));
        }
        if !response.status().is_success() {
            return Err(AnnotatorError::Upstream(format!(
                "VEP returned error status: {}",
                response.status()
            )));
        }

        let mut annotations: Vec<VepAnnotation> = response
            .json()
            .await
            .map_err(|e| AnnotatorError::Upstream(format!("Failed to parse VEP response: {}", e)))?;

        if annotations.is_empty() {
            return Err(AnnotatorError::Unresolved(variant.to_string()));
        }

        Ok(to_annotation(variant, annotations.remove(0)))
    }

    /// Fetch base annotations for a batch of HGVS variants
    async fn fetch_batch(
        &self,
        variants: &[String],
    ) -> Result<Vec<VariantAnnotation>, AnnotatorError> {
        debug!("Fetching VEP annotations for {} variants", variants.len());

        self.rate_limiter.until_ready().await;

        let url = format!("{}/vep/human/hgvs", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({ "hgvs_notations": variants }))
            .send()
            .await
            .map_err(|e| AnnotatorError::Upstream(format!("VEP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AnnotatorError::Upstream(format!(
                "VEP returned error status: {}",
                response.status()
            )));
        }

        let resolved: Vec<VepAnnotation> = response
            .json()
            .await
            .map_err(|e| AnnotatorError::Upstream(format!("Failed to parse VEP response: {}", e)))?;

        Ok(match_batch(variants, resolved))
    }
}

/// Map a raw VEP block onto the domain annotation
fn to_annotation(variant: &str, raw: VepAnnotation) -> VariantAnnotation {
    let mut annotation = VariantAnnotation::new(variant);
    annotation.assembly_name = raw.assembly_name;
    annotation.seq_region_name = raw.seq_region_name;
    annotation.start = raw.start;
    annotation.end = raw.end;
    annotation.allele_string = raw.allele_string;
    annotation.strand = raw.strand;
    annotation.most_severe_consequence = raw.most_severe_consequence;
    annotation.transcript_consequences = raw
        .transcript_consequences
        .into_iter()
        .map(|tc| TranscriptConsequence {
            transcript_id: tc.transcript_id,
            gene_symbol: tc.gene_symbol,
            gene_id: tc.gene_id,
            consequence_terms: tc.consequence_terms,
            protein_start: tc.protein_start,
            protein_end: tc.protein_end,
            hgvsc: tc.hgvsc,
            hgvsp: tc.hgvsp,
            canonical: tc.canonical,
        })
        .collect();
    annotation
}

/// Pair batch results with the requested variants, preserving request order.
/// Variants VEP did not resolve are dropped.
fn match_batch(variants: &[String], resolved: Vec<VepAnnotation>) -> Vec<VariantAnnotation> {
    let mut by_input: HashMap<String, VariantAnnotation> = resolved
        .into_iter()
        .filter_map(|raw| {
            let input = raw.input.clone()?;
            let annotation = to_annotation(&input, raw);
            Some((input, annotation))
        })
        .collect();

    variants
        .iter()
        .filter_map(|variant| {
            let annotation = by_input.remove(variant);
            if annotation.is_none() {
                debug!("VEP returned no annotation for {}", variant);
            }
            annotation
        })
        .collect()
}

#[async_trait]
impl VariantAnnotator for VepClient {
    async fn annotate(
        &self,
        variant: &str,
        post_enrichment: &EnrichmentService,
    ) -> Result<VariantAnnotation, AnnotatorError> {
        let mut annotation = self.fetch_one(variant).await?;

        // The canonical annotation is complete at this point; everything the
        // hook attaches is response-only.
        post_enrichment.enrich(&mut annotation).await;

        Ok(annotation)
    }

    async fn annotate_all(
        &self,
        variants: &[String],
        post_enrichment: &EnrichmentService,
    ) -> Result<Vec<VariantAnnotation>, AnnotatorError> {
        let mut annotations = self.fetch_batch(variants).await?;
        post_enrichment.enrich_all(&mut annotations).await;
        Ok(annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEP_BLOCK: &str = r#"{
        "input": "7:g.140453136A>T",
        "assembly_name": "GRCh37",
        "seq_region_name": "7",
        "start": 140453136,
        "end": 140453136,
        "allele_string": "A/T",
        "strand": 1,
        "most_severe_consequence": "missense_variant",
        "colocated_variants": [{"id": "COSM476"}],
        "transcript_consequences": [{
            "transcript_id": "ENST00000288602",
            "gene_symbol": "BRAF",
            "gene_id": "ENSG00000157764",
            "consequence_terms": ["missense_variant"],
            "protein_start": 600,
            "protein_end": 600,
            "hgvsp": "ENSP00000288602.6:p.Val600Glu",
            "canonical": 1,
            "sift_prediction": "deleterious"
        }]
    }"#;

    #[test]
    fn raw_block_maps_to_domain_annotation() {
        let raw: VepAnnotation = serde_json::from_str(VEP_BLOCK).unwrap();
        let annotation = to_annotation("7:g.140453136A>T", raw);

        assert_eq!(annotation.variant, "7:g.140453136A>T");
        assert_eq!(annotation.assembly_name.as_deref(), Some("GRCh37"));
        assert_eq!(annotation.allele_string.as_deref(), Some("A/T"));
        assert_eq!(
            annotation.most_severe_consequence.as_deref(),
            Some("missense_variant")
        );
        // unknown VEP keys never leak into the enrichment map
        assert!(annotation.enrichment.is_empty());

        let tc = annotation.canonical_transcript().unwrap();
        assert_eq!(tc.gene_symbol.as_deref(), Some("BRAF"));
        assert_eq!(tc.protein_start, Some(600));
    }

    #[test]
    fn batch_matching_preserves_request_order_and_drops_unresolved() {
        let resolved: Vec<VepAnnotation> = vec![
            serde_json::from_str(r#"{"input": "17:g.41242962->GA"}"#).unwrap(),
            serde_json::from_str(VEP_BLOCK).unwrap(),
        ];
        let variants = vec![
            "7:g.140453136A>T".to_string(),
            "1:g.1bogus".to_string(),
            "17:g.41242962->GA".to_string(),
        ];

        let annotations = match_batch(&variants, resolved);

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].variant, "7:g.140453136A>T");
        assert_eq!(annotations[1].variant, "17:g.41242962->GA");
    }

    #[tokio::test]
    #[ignore] // Requires network access - run with: cargo test -- --ignored
    async fn fetch_known_variant_from_ensembl() {
        let client = VepClient::new("https://grch37.rest.ensembl.org", Duration::from_secs(30));
        let annotation = client.fetch_one("7:g.140453136A>T").await.unwrap();

        assert_eq!(annotation.seq_region_name.as_deref(), Some("7"));
        assert!(annotation
            .transcript_consequences
            .iter()
            .any(|tc| tc.gene_symbol.as_deref() == Some("BRAF")));
    }
}
