//! Domain model for variant annotation
//!
//! `VariantAnnotation` carries the VEP-derived base annotation plus an
//! open-ended map of enrichment fields. The two are kept structurally
//! separate: the canonical annotation is the struct without the flattened
//! `enrichment` map, and only the enrichment pass writes that map.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One resolved variant's base annotation plus enrichment fields
///
/// Identity is the `variant` string that produced it. Base fields follow the
/// VEP response vocabulary. Enrichment fields serialize after the base
/// fields, in the order they were attached (`serde_json` is built with
/// `preserve_order`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantAnnotation {
    /// Variant identifier as submitted (e.g. "17:g.41242962->GA")
    pub variant: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq_region_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,

    /// Reference/alternate alleles, slash separated (e.g. "T/A")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allele_string: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strand: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_severe_consequence: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transcript_consequences: Vec<TranscriptConsequence>,

    /// Enrichment fields attached after annotation, never part of the
    /// canonical record
    #[serde(flatten)]
    pub enrichment: serde_json::Map<String, Value>,
}

impl VariantAnnotation {
    /// Create an empty annotation for the given variant identifier
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            assembly_name: None,
            seq_region_name: None,
            start: None,
            end: None,
            allele_string: None,
            strand: None,
            most_severe_consequence: None,
            transcript_consequences: Vec::new(),
            enrichment: serde_json::Map::new(),
        }
    }

    /// Attach an enrichment payload under a field name, replacing any prior
    /// payload for that name
    pub fn set_enrichment(&mut self, field_name: &str, payload: Value) {
        self.enrichment.insert(field_name.to_string(), payload);
    }

    /// Look up an enrichment payload by field name
    pub fn enrichment_field(&self, field_name: &str) -> Option<&Value> {
        self.enrichment.get(field_name)
    }

    /// The canonical transcript consequence, falling back to the first one
    pub fn canonical_transcript(&self) -> Option<&TranscriptConsequence> {
        self.transcript_consequences
            .iter()
            .find(|tc| tc.canonical == Some(1))
            .or_else(|| self.transcript_consequences.first())
    }

    /// Distinct gene symbols across transcript consequences, in order
    pub fn gene_symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        for tc in &self.transcript_consequences {
            if let Some(symbol) = tc.gene_symbol.as_deref() {
                if !symbols.contains(&symbol) {
                    symbols.push(symbol);
                }
            }
        }
        symbols
    }
}

/// Per-transcript consequence block from VEP
///
/// Only the subset consumed by enrichment and override lookup; unknown VEP
/// keys are ignored on deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptConsequence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gene_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub consequence_terms: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_start: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_end: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hgvsc: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hgvsp: Option<String>,

    /// 1 when VEP flags this transcript as canonical
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<i32>,
}

/// One cancer hotspot record, as attached under `cancerHotspots`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub hugo_symbol: String,

    /// Hotspot residue (e.g. "V600")
    pub residue: String,

    /// Hotspot classification ("single residue" or "in-frame indel")
    #[serde(rename = "type")]
    pub hotspot_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tumor_count: Option<u32>,
}

/// Mutation-impact score payload, as attached under `mutation_assessor`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationAssessorScore {
    /// Functional impact class ("neutral", "low", "medium", "high")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functional_impact: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub functional_impact_score: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub msa_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdb_link: Option<String>,
}

/// Isoform override payload, attached under the override source's name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsoformOverride {
    pub gene_symbol: String,

    /// Transcript to treat as canonical for this gene
    pub transcript_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn annotation_with_transcripts() -> VariantAnnotation {
        let mut annotation = VariantAnnotation::new("7:g.140453136A>T");
        annotation.transcript_consequences = vec![
            TranscriptConsequence {
                transcript_id: Some("ENST00000479537".to_string()),
                gene_symbol: Some("BRAF".to_string()),
                canonical: None,
                ..Default::default()
            },
            TranscriptConsequence {
                transcript_id: Some("ENST00000288602".to_string()),
                gene_symbol: Some("BRAF".to_string()),
                canonical: Some(1),
                ..Default::default()
            },
        ];
        annotation
    }

    #[test]
    fn canonical_transcript_prefers_canonical_flag() {
        let annotation = annotation_with_transcripts();
        let canonical = annotation.canonical_transcript().unwrap();
        assert_eq!(canonical.transcript_id.as_deref(), Some("ENST00000288602"));
    }

    #[test]
    fn canonical_transcript_falls_back_to_first() {
        let mut annotation = annotation_with_transcripts();
        annotation.transcript_consequences[1].canonical = None;
        let canonical = annotation.canonical_transcript().unwrap();
        assert_eq!(canonical.transcript_id.as_deref(), Some("ENST00000479537"));
    }

    #[test]
    fn gene_symbols_are_distinct_and_ordered() {
        let mut annotation = annotation_with_transcripts();
        annotation.transcript_consequences.push(TranscriptConsequence {
            gene_symbol: Some("LUC7L2".to_string()),
            ..Default::default()
        });
        assert_eq!(annotation.gene_symbols(), vec!["BRAF", "LUC7L2"]);
    }

    #[test]
    fn enrichment_fields_flatten_into_output() {
        let mut annotation = VariantAnnotation::new("X:g.66937331T>A");
        annotation.set_enrichment("cancerHotspots", json!([{"residue": "V600"}]));
        annotation.set_enrichment("mutation_assessor", json!({"functionalImpact": "high"}));

        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value["variant"], "X:g.66937331T>A");
        assert_eq!(value["cancerHotspots"][0]["residue"], "V600");
        assert_eq!(value["mutation_assessor"]["functionalImpact"], "high");
    }

    #[test]
    fn base_annotation_has_no_enrichment_fields() {
        let annotation = VariantAnnotation::new("X:g.66937331T>A");
        let value = serde_json::to_value(&annotation).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.keys().all(|k| k == "variant"));
    }
}
