//! varnex-va - Variant Annotation Service
//!
//! Accepts HGVS variant identifiers, proxies the VEP base annotation, and
//! enriches each annotation per-request with caller-selected auxiliary
//! fields (isoform overrides, cancer hotspots, mutation-impact scores).

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use varnex_va::services::{
    CancerHotspotsClient, FileIsoformOverrideService, HotspotService, IsoformOverrideService,
    MutationAssessorClient, MutationAssessorService, VariantAnnotator, VepClient,
};
use varnex_va::{build_router, config, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; RUST_LOG overrides the default filter, which is
    // also how enrichment-failure visibility is tuned
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "varnex_va=info,varnex_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting varnex-va (Variant Annotation) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml_config = varnex_common::config::load_toml_config()?;
    let service_config = config::resolve_service_config(&toml_config);
    info!("VEP backend: {}", service_config.vep_base_url);

    // Isoform override tables: configured directory, or the embedded defaults
    let isoform_overrides: Arc<dyn IsoformOverrideService> =
        match &service_config.isoform_override_dir {
            Some(dir) => Arc::new(FileIsoformOverrideService::from_dir(dir)?),
            None => Arc::new(FileIsoformOverrideService::with_embedded_defaults()),
        };

    let annotator: Arc<dyn VariantAnnotator> = Arc::new(VepClient::new(
        service_config.vep_base_url.clone(),
        service_config.http_timeout,
    ));
    let hotspots: Arc<dyn HotspotService> = Arc::new(CancerHotspotsClient::new(
        service_config.hotspots_base_url.clone(),
        service_config.http_timeout,
    ));
    let mutation_assessor: Arc<dyn MutationAssessorService> = Arc::new(
        MutationAssessorClient::new(
            service_config.mutation_assessor_base_url.clone(),
            service_config.http_timeout,
        ),
    );

    let state = AppState::new(annotator, isoform_overrides, hotspots, mutation_assessor);
    let app = build_router(state);

    // Start server
    let listener =
        tokio::net::TcpListener::bind(("127.0.0.1", service_config.port)).await?;
    info!("Listening on http://127.0.0.1:{}", service_config.port);
    info!(
        "Health check: http://127.0.0.1:{}/health",
        service_config.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
