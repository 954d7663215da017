//! Isoform override tables
//!
//! Override tables name, per source, the transcript to treat as canonical
//! for a gene. Tables are tab-separated (`gene_symbol<TAB>transcript_id`,
//! `#` comments). The crate ships embedded `uniprot` and `mskcc` defaults; a
//! configured directory of `<source>.tsv` files replaces them entirely.

use crate::enrichment::EnrichmentError;
use crate::models::{IsoformOverride, VariantAnnotation};
use crate::services::IsoformOverrideService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};
use varnex_common::Error;

const UNIPROT_OVERRIDES: &str = include_str!("../../data/isoform_overrides_uniprot.tsv");
const MSKCC_OVERRIDES: &str = include_str!("../../data/isoform_overrides_mskcc.tsv");

/// File-backed override tables, loaded once at startup
pub struct FileIsoformOverrideService {
    /// source name → gene symbol → override
    sources: HashMap<String, HashMap<String, IsoformOverride>>,
}

impl FileIsoformOverrideService {
    /// Build from the tables embedded in the binary
    pub fn with_embedded_defaults() -> Self {
        let mut sources = HashMap::new();
        sources.insert("uniprot".to_string(), parse_table(UNIPROT_OVERRIDES));
        sources.insert("mskcc".to_string(), parse_table(MSKCC_OVERRIDES));
        Self { sources }
    }

    /// Build from a directory of `<source>.tsv` files
    pub fn from_dir(dir: &Path) -> varnex_common::Result<Self> {
        let mut sources = HashMap::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("tsv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = stem.strip_prefix("isoform_overrides_").unwrap_or(stem);

            let content = std::fs::read_to_string(&path)?;
            let table = parse_table(&content);
            if table.is_empty() {
                warn!("Override table {} has no entries", path.display());
            }
            sources.insert(source.to_string(), table);
        }

        if sources.is_empty() {
            return Err(Error::Config(format!(
                "No override tables (*.tsv) found in {}",
                dir.display()
            )));
        }

        info!(
            "Loaded {} isoform override sources from {}",
            sources.len(),
            dir.display()
        );
        Ok(Self { sources })
    }
}

/// Parse one override table. Malformed lines are skipped.
fn parse_table(content: &str) -> HashMap<String, IsoformOverride> {
    let mut table = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut columns = line.split('\t');
        let (Some(gene), Some(transcript)) = (columns.next(), columns.next()) else {
            continue;
        };
        table.insert(
            gene.to_string(),
            IsoformOverride {
                gene_symbol: gene.to_string(),
                transcript_id: transcript.to_string(),
            },
        );
    }

    table
}

#[async_trait]
impl IsoformOverrideService for FileIsoformOverrideService {
    fn has_data(&self, source: &str) -> bool {
        self.sources.get(source).is_some_and(|table| !table.is_empty())
    }

    async fn overrides_for(
        &self,
        source: &str,
        annotation: &VariantAnnotation,
    ) -> Result<Option<IsoformOverride>, EnrichmentError> {
        let Some(table) = self.sources.get(source) else {
            // Registration is guarded by has_data, so an unknown source here
            // is a misconfiguration; the service treats it as a no-op.
            return Err(EnrichmentError::Misconfigured(format!(
                "unknown override source: {}",
                source
            )));
        };

        Ok(annotation
            .gene_symbols()
            .into_iter()
            .find_map(|gene| table.get(gene).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TranscriptConsequence;

    fn braf_annotation() -> VariantAnnotation {
        let mut annotation = VariantAnnotation::new("7:g.140453136A>T");
        annotation.transcript_consequences = vec![TranscriptConsequence {
            gene_symbol: Some("BRAF".to_string()),
            ..Default::default()
        }];
        annotation
    }

    #[test]
    fn embedded_defaults_cover_known_sources() {
        let service = FileIsoformOverrideService::with_embedded_defaults();
        assert!(service.has_data("uniprot"));
        assert!(service.has_data("mskcc"));
        assert!(!service.has_data("besthit"));
    }

    #[tokio::test]
    async fn lookup_matches_annotation_gene() {
        let service = FileIsoformOverrideService::with_embedded_defaults();

        let hit = service
            .overrides_for("uniprot", &braf_annotation())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.transcript_id, "ENST00000288602");

        let miss = service
            .overrides_for("uniprot", &VariantAnnotation::new("X:g.66937331T>A"))
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn unknown_source_is_a_misconfiguration() {
        let service = FileIsoformOverrideService::with_embedded_defaults();
        let result = service.overrides_for("besthit", &braf_annotation()).await;
        assert!(matches!(result, Err(EnrichmentError::Misconfigured(_))));
    }

    #[test]
    fn tables_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("besthit.tsv"),
            "# comment\nBRAF\tENST00000288602\nbad-line-without-tab\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let service = FileIsoformOverrideService::from_dir(dir.path()).unwrap();
        assert!(service.has_data("besthit"));
        assert!(!service.has_data("uniprot"));
    }

    #[test]
    fn empty_directory_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileIsoformOverrideService::from_dir(dir.path()).is_err());
    }
}
