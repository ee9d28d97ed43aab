mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, warn};

use podconn_core::{CredentialCache, PublishStatus, RunReport, Sampler};
use podconn_exec::{
    aws::EksTokenIssuer,
    kubectl::{Kubectl, KubectlDiscovery, KubectlProbe},
};
use podconn_model::SamplerConfig;
use podconn_observe::init_logger;
use podconn_prometheus::{PrometheusMetrics, PushGatewayPublisher};

use crate::config::AgentConfig;

fn main() -> anyhow::Result<()> {
    let cfg = AgentConfig::default();

    // Local offset detection needs a single-threaded process.
    init_logger(&cfg.logger)?;
    info!("logger initialized");

    cfg.sampler.validate().context("invalid sampler config")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run(cfg.sampler))
}

async fn run(cfg: SamplerConfig) -> anyhow::Result<()> {
    // 1) collaborators
    let kubectl = Kubectl::default();
    let issuer = Arc::new(EksTokenIssuer::new(&cfg.cluster_name));
    let credentials = Arc::new(
        CredentialCache::new(issuer, cfg.credential_ttl())
            .with_fetch_timeout(cfg.credential_timeout()),
    );
    let discovery = Arc::new(KubectlDiscovery::from_config(kubectl.clone(), &cfg)?);
    let probe = Arc::new(KubectlProbe::from_config(kubectl, &cfg));
    let metrics = Arc::new(PrometheusMetrics::new().context("failed to register metrics")?);

    // 2) sampler
    let mut builder = Sampler::builder(discovery, credentials, probe)
        .with_config(&cfg)
        .metrics(metrics.clone());
    if cfg.publish.enabled.is_enabled() {
        let publisher = PushGatewayPublisher::from_config(&cfg.publish)?;
        info!(endpoint = publisher.endpoint(), "publishing to pushgateway");
        builder = builder.publisher(Arc::new(publisher));
    }
    let sampler = builder.build();

    // 3) one run
    let report = sampler.run_once().await?;
    log_report(&report);

    match metrics.encode_text() {
        Ok(text) => debug!(registry = %text, "in-process metrics"),
        Err(e) => warn!(error = %e, "failed to encode metrics"),
    }
    Ok(())
}

fn log_report(report: &RunReport) {
    info!(%report, "run finished");
    if let PublishStatus::Failed(reason) = &report.publish {
        warn!(%reason, "total was not published");
    }
}
