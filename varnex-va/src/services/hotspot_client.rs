// Cancer Hotspots API Client
//
// Queries hotspot classifications by gene and matches them against the
// annotated protein positions.

use crate::enrichment::EnrichmentError;
use crate::models::{Hotspot, VariantAnnotation};
use crate::services::HotspotService;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub struct CancerHotspotsClient {
    client: reqwest::Client,
    base_url: String,
}

impl CancerHotspotsClient {
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

    /// Fetch all hotspot records for one gene. An unknown gene is no data,
    /// not an error.
    async fn fetch_by_gene(&self, gene: &str) -> Result<Vec<Hotspot>, EnrichmentError> {
        let url = format!("{}/api/hotspots/byGene/{}", self.base_url, gene);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Unavailable(format!("hotspot request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(vec![]);
        }
        if !response.status().is_success() {
            return Err(EnrichmentError::Unavailable(format!(
                "hotspot service returned error status: {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            EnrichmentError::Unavailable(format!("failed to parse hotspot response: {}", e))
        })
    }
}

/// Numeric position of a hotspot residue label (e.g. "V600" → 600)
fn residue_position(residue: &str) -> Option<i64> {
    let digits: String = residue.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Keep the records that land on one of the annotation's protein positions
/// for the given gene
fn matching_hotspots(
    records: Vec<Hotspot>,
    annotation: &VariantAnnotation,
    gene: &str,
    include_single_residue: bool,
) -> Vec<Hotspot> {
    records
        .into_iter()
        .filter(|record| include_single_residue || record.hotspot_type != "single residue")
        .filter(|record| {
            let Some(position) = residue_position(&record.residue) else {
                return false;
            };
            annotation
                .transcript_consequences
                .iter()
                .filter(|tc| tc.gene_symbol.as_deref() == Some(gene))
                .any(|tc| {
                    let start = tc.protein_start.unwrap_or(i64::MAX);
                    let end = tc.protein_end.unwrap_or(start);
                    start <= position && position <= end
                })
        })
        .collect()
}

#[async_trait]
impl HotspotService for CancerHotspotsClient {
    async fn hotspots_for(
        &self,
        annotation: &VariantAnnotation,
        include_single_residue: bool,
    ) -> Result<Vec<Hotspot>, EnrichmentError> {
        let mut hits = Vec::new();

        for gene in annotation.gene_symbols() {
            let records = self.fetch_by_gene(gene).await?;
            hits.extend(matching_hotspots(
                records,
                annotation,
                gene,
                include_single_residue,
            ));
        }

        debug!(
            variant = %annotation.variant,
            hits = hits.len(),
            "hotspot lookup complete"
        );
        Ok(hits)
    }
}
