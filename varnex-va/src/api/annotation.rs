//! Variant annotation API handlers
//!
//! `GET /annotation/{variant}` and `POST /annotation` are the primary
//! endpoints; the `/hgvs` routes are legacy aliases kept for callers that
//! predate `/annotation`. All paths build the same per-request enrichment
//! service before delegating to the annotator.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::enrichment::{build_enrichment_service, EnrichmentService};
use crate::error::ApiResult;
use crate::models::VariantAnnotation;
use crate::AppState;

/// Query parameters shared by every annotation endpoint
#[derive(Debug, Default, Deserialize)]
pub struct AnnotationQuery {
    /// Isoform override source (e.g. "uniprot")
    #[serde(rename = "isoformOverrideSource")]
    pub isoform_override_source: Option<String>,

    /// Comma separated list of enrichment fields to include
    /// (case-sensitive!). For example: hotspots,mutation_assessor
    pub fields: Option<String>,
}

/// Query parameters for the legacy POST /hgvs route, which carries the
/// variants themselves as a query parameter
#[derive(Debug, Deserialize)]
pub struct LegacyAnnotationQuery {
    /// Comma separated list of variants
    pub variants: String,

    #[serde(rename = "isoformOverrideSource")]
    pub isoform_override_source: Option<String>,

    pub fields: Option<String>,
}

/// Split a comma separated `fields` parameter. No trimming or case folding:
/// tokens match exactly or not at all, and unrecognized tokens are ignored
/// downstream.
fn split_fields(fields: Option<&str>) -> Vec<String> {
    fields
        .map(|f| f.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

/// Build the per-request post-enrichment service from the query parameters
fn enrichment_for(state: &AppState, override_source: Option<&str>, fields: Option<&str>) -> EnrichmentService {
    let fields = split_fields(fields);
    build_enrichment_service(
        override_source,
        &fields,
        &state.isoform_overrides,
        &state.hotspots,
        &state.mutation_assessor,
    )
}

/// GET /annotation/{variant}
///
/// Retrieves the annotation for one variant, enriched per the query
/// parameters.
pub async fn fetch_variant_annotation_get(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    Query(query): Query<AnnotationQuery>,
) -> ApiResult<Json<VariantAnnotation>> {
    let enrichment = enrichment_for(
        &state,
        query.isoform_override_source.as_deref(),
        query.fields.as_deref(),
    );
    let annotation = state.annotator.annotate(&variant, &enrichment).await?;
    Ok(Json(annotation))
}

/// POST /annotation
///
/// Retrieves annotations for the list of variants in the request body.
pub async fn fetch_variant_annotation_post(
    State(state): State<AppState>,
    Query(query): Query<AnnotationQuery>,
    Json(variants): Json<Vec<String>>,
) -> ApiResult<Json<Vec<VariantAnnotation>>> {
    let enrichment = enrichment_for(
        &state,
        query.isoform_override_source.as_deref(),
        query.fields.as_deref(),
    );
    let annotations = state.annotator.annotate_all(&variants, &enrichment).await?;
    Ok(Json(annotations))
}

/// GET /hgvs/{variants}
///
/// Legacy route: comma separated variant list in the path.
pub async fn get_hgvs_annotations(
    State(state): State<AppState>,
    Path(variants): Path<String>,
    Query(query): Query<AnnotationQuery>,
) -> ApiResult<Json<Vec<VariantAnnotation>>> {
    let variants: Vec<String> = variants.split(',').map(str::to_string).collect();
    let enrichment = enrichment_for(
        &state,
        query.isoform_override_source.as_deref(),
        query.fields.as_deref(),
    );
    let annotations = state.annotator.annotate_all(&variants, &enrichment).await?;
    Ok(Json(annotations))
}

/// POST /hgvs
///
/// Legacy route: comma separated variant list as a query parameter.
pub async fn post_hgvs_annotations(
    State(state): State<AppState>,
    Query(query): Query<LegacyAnnotationQuery>,
) -> ApiResult<Json<Vec<VariantAnnotation>>> {
    let variants: Vec<String> = query.variants.split(',').map(str::to_string).collect();
    let enrichment = enrichment_for(
        &state,
        query.isoform_override_source.as_deref(),
        query.fields.as_deref(),
    );
    let annotations = state.annotator.annotate_all(&variants, &enrichment).await?;
    Ok(Json(annotations))
}

/// Build annotation routes
pub fn annotation_routes() -> Router<AppState> {
    Router::new()
        .route("/annotation", post(fetch_variant_annotation_post))
        .route("/annotation/:variant", get(fetch_variant_annotation_get))
        .route("/hgvs/:variants", get(get_hgvs_annotations))
        .route("/hgvs", post(post_hgvs_annotations))
}
