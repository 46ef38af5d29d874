//! daily-zoo — fetch today's page of animal photos into storage and email a report.

use tracing::{error, info};

use zoo_core::config::load_dotenv;
use zoo_core::ZooConfig;
use zoo_ingest::{IngestJob, JobOutcome, LiveSetup};
use zoo_notify::{StatusMailer, TemplateRenderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ZooConfig::from_env().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
    config.log_summary();

    let renderer = TemplateRenderer::new()?;
    let mailer = StatusMailer::from_config(&config.email);
    let job = IngestJob::new(config, mailer, renderer);

    match job.run(&LiveSetup).await {
        JobOutcome::Done(report) => {
            info!(
                uploaded = report.uploaded,
                skipped = report.skipped,
                errors = report.errors.len(),
                "Done"
            );
            Ok(())
        }
        JobOutcome::Failed { error, .. } => anyhow::bail!("job failed: {error}"),
    }
}
