//! The daily run: start report, setup, one pass over every category, final report.

use chrono::{DateTime, Local, NaiveDate};
use thiserror::Error;
use tracing::{error, info, warn};

use zoo_core::cursor::page_for;
use zoo_core::{Category, ImageRecord, ZooConfig};
use zoo_metadata::{InsertOutcome, MetadataError};
use zoo_notify::{escape_html, FailedContext, StartedContext, StatusMailer, SucceededContext, TemplateRenderer};
use zoo_storage::{get_or_create, StorageError};

use crate::report::{format_duration, RunReport};
use crate::search::SearchError;
use crate::setup::{JobSetup, Services, SetupError};

const IMAGE_MIME: &str = "image/jpeg";

/// Anything that stops one category; the run moves on to the next.
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

#[derive(Debug)]
pub enum JobOutcome {
    Done(RunReport),
    Failed { report: RunReport, error: String },
}

impl JobOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            Self::Done(report) | Self::Failed { report, .. } => report,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

pub struct IngestJob {
    config: ZooConfig,
    mailer: StatusMailer,
    renderer: TemplateRenderer,
}

impl IngestJob {
    pub fn new(config: ZooConfig, mailer: StatusMailer, renderer: TemplateRenderer) -> Self {
        Self {
            config,
            mailer,
            renderer,
        }
    }

    pub async fn run(&self, setup: &dyn JobSetup) -> JobOutcome {
        self.run_at(setup, Local::now()).await
    }

    /// Run with an explicit start time; the cursor page derives from its date.
    pub async fn run_at(&self, setup: &dyn JobSetup, started_at: DateTime<Local>) -> JobOutcome {
        let today = started_at.date_naive();
        let mut report = RunReport::new(started_at);
        let categories = &self.config.job.categories;

        info!(date = %today, categories = categories.len(), "Daily zoo job started");
        self.notify_started(today, started_at, categories.len()).await;

        let (services, root) = match self.connect(setup).await {
            Ok(connected) => connected,
            Err(e) => {
                error!(error = %e, "Job setup failed");
                report.finish(Local::now());
                let message = e.to_string();
                self.notify_failed(today, &message).await;
                return JobOutcome::Failed {
                    report,
                    error: message,
                };
            }
        };

        let page = page_for(today, self.config.job.project_start);
        info!(page, "Fetching page");

        for category in categories {
            if let Err(e) = self
                .ingest_category(&services, &root, category, page, today, &mut report)
                .await
            {
                warn!(category = %category, error = %e, "Category failed");
                report.record_error(category.as_str(), &e);
            }
        }

        report.finish(Local::now());
        info!(
            uploaded = report.uploaded,
            skipped = report.skipped,
            errors = report.errors.len(),
            duration = %format_duration(report.duration()),
            "Daily zoo job finished"
        );

        let ctx = SucceededContext {
            date: today.to_string(),
            duration: format_duration(report.duration()),
            uploaded: report.uploaded,
            storage_label: services.files.label().to_string(),
            errors: report.errors.clone(),
            folder_url: services.files.folder_url(&root),
        };
        let subject = format!("✅ Job Success: {} New Images", report.uploaded);
        let body = self
            .renderer
            .render_succeeded(&ctx)
            .unwrap_or_else(|e| fallback_body(&e, &format!("{} new images uploaded.", report.uploaded)));
        self.mailer.send(&subject, &body).await;

        JobOutcome::Done(report)
    }

    async fn connect(&self, setup: &dyn JobSetup) -> Result<(Services, String), SetupError> {
        self.config.search.api_key()?;
        self.config.search.per_page()?;
        let root = self.config.storage.root_folder_id()?.to_string();
        let services = setup.connect(&self.config).await?;
        Ok((services, root))
    }

    async fn ingest_category(
        &self,
        services: &Services,
        root: &str,
        category: &Category,
        page: u32,
        today: NaiveDate,
        report: &mut RunReport,
    ) -> Result<(), CategoryError> {
        let folder = get_or_create(services.files.as_ref(), &category.display_name(), root).await?;

        let hits = services
            .search
            .search(category.as_str(), page, self.config.search.per_page)
            .await?;
        if hits.is_empty() {
            info!(category = %category, page, "No results");
            report.empty_categories += 1;
            return Ok(());
        }

        for hit in hits {
            if services.metadata.exists_by_external_id(hit.id).await? {
                info!(category = %category, id = hit.id, "Already recorded, skipping");
                report.skipped += 1;
                continue;
            }

            let content = services.search.download(&hit.image_url).await?;
            let stored = services
                .files
                .create_file(&category.file_name(hit.id), &folder, content, IMAGE_MIME)
                .await?;

            let record = ImageRecord {
                external_id: hit.id,
                category: category.as_str().to_string(),
                tags: hit.tags,
                author: hit.user,
                storage_url: stored.view_url,
                date_added: today,
                source_url: hit.page_url,
            };
            match services.metadata.insert(&record).await? {
                InsertOutcome::Inserted => {
                    report.uploaded += 1;
                    info!(category = %category, id = record.external_id, "Uploaded");
                }
                InsertOutcome::AlreadyExists => {
                    info!(category = %category, id = record.external_id, "Recorded concurrently, skipping");
                    report.skipped += 1;
                }
            }

            if !self.config.job.upload_delay.is_zero() {
                tokio::time::sleep(self.config.job.upload_delay).await;
            }
        }
        Ok(())
    }

    async fn notify_started(&self, today: NaiveDate, started_at: DateTime<Local>, category_count: usize) {
        let ctx = StartedContext {
            date: today.to_string(),
            start_time: started_at.format("%H:%M:%S").to_string(),
            category_count,
        };
        let body = self
            .renderer
            .render_started(&ctx)
            .unwrap_or_else(|e| fallback_body(&e, &format!("Processing {category_count} categories.")));
        self.mailer.send(&format!("🚀 Job Started: {today}"), &body).await;
    }

    async fn notify_failed(&self, today: NaiveDate, message: &str) {
        let ctx = FailedContext {
            date: today.to_string(),
            error: message.to_string(),
        };
        let body = self
            .renderer
            .render_failed(&ctx)
            .unwrap_or_else(|e| fallback_body(&e, message));
        self.mailer.send("🚨 Job Failed: Critical Error", &body).await;
    }
}

fn fallback_body(render_error: &dyn std::fmt::Display, text: &str) -> String {
    warn!(error = %render_error, "Template rendering failed, sending plain report");
    format!("<html><body><pre>{}</pre></body></html>", escape_html(text))
}
