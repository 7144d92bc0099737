//! Execution engine module
//!
//! Main read loop and stream orchestration.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Runs the selected streams concurrently under one `RunContext`
//! - `SyncConfig` - Concurrency and page limits
//! - `SyncReport` / `StreamReport` - What each stream achieved and why it stopped
//!
//! Each stream runs parameterize, fetch, extract, validate, enrich and emit
//! for every page until its pagination driver is done. A failing record is
//! dropped; a failing stream never stops its siblings.

mod types;

pub use types::{RunStatus, StreamReport, StreamStatus, SyncConfig, SyncReport};

use crate::enrich::{enrich, RunContext};
use crate::error::{Error, Result};
use crate::extract::{decode_body, RecordExtractor};
use crate::http::Transport;
use crate::output::RecordSink;
use crate::pagination::PaginationDriver;
use crate::streams::{build_params, StreamCatalog, StreamDescriptor};
use crate::validate::validate_record;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// Page fetcher shared by every stream
    transport: Arc<dyn Transport>,
    /// Sync configuration
    config: SyncConfig,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            config: SyncConfig::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Sync the streams the run's configuration selects
    ///
    /// Unknown stream names fail before any request is issued.
    pub async fn sync(
        &self,
        catalog: &StreamCatalog,
        ctx: Arc<RunContext>,
        sink: Arc<dyn RecordSink>,
        cancel: CancellationToken,
    ) -> Result<SyncReport> {
        let streams = catalog.resolve(&ctx.config().selected_streams())?;
        Ok(self.run(streams, ctx, sink, cancel).await)
    }

    /// Run the given streams, reporting in the order given
    pub async fn run(
        &self,
        streams: Vec<Arc<StreamDescriptor>>,
        ctx: Arc<RunContext>,
        sink: Arc<dyn RecordSink>,
        cancel: CancellationToken,
    ) -> SyncReport {
        let start = Instant::now();
        let concurrency = self.config.max_concurrency.max(1);
        info!(
            streams = streams.len(),
            concurrency,
            synced_at = %ctx.synced_at(),
            "Starting sync"
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut handles = Vec::with_capacity(streams.len());

        for descriptor in streams {
            let name = descriptor.name.clone();
            let task = StreamTask {
                transport: Arc::clone(&self.transport),
                max_pages: self.config.max_pages_per_stream,
                descriptor,
                ctx: Arc::clone(&ctx),
                sink: Arc::clone(&sink),
                cancel: cancel.clone(),
            };
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                task.run().await
            });
            handles.push((name, handle));
        }

        let (names, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let results = join_all(handles).await;

        let mut reports = Vec::with_capacity(results.len());
        for (name, result) in names.into_iter().zip(results) {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(stream = %name, error = %e, "Stream task aborted");
                    let mut report = StreamReport::new(name);
                    report.fail(&Error::Other(format!("Stream task aborted: {e}")));
                    report.finish(0);
                    reports.push(report);
                }
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let report = SyncReport::new(
            crate::validate::format_instant(ctx.synced_at()),
            reports,
            start.elapsed().as_millis() as u64,
        );

        info!(
            status = ?report.status,
            records = report.records_emitted(),
            duration_ms = report.duration_ms,
            "Sync finished"
        );
        report
    }
}

/// Everything one stream's loop needs, owned so it can be spawned
struct StreamTask {
    transport: Arc<dyn Transport>,
    max_pages: usize,
    descriptor: Arc<StreamDescriptor>,
    ctx: Arc<RunContext>,
    sink: Arc<dyn RecordSink>,
    cancel: CancellationToken,
}

impl StreamTask {
    async fn run(self) -> StreamReport {
        let start = Instant::now();
        let stream = self.descriptor.name.as_str();
        let mut report = StreamReport::new(stream);

        info!(stream, "Starting stream");
        if let Err(e) = self.run_pages(&mut report).await {
            match e {
                Error::Cancelled | Error::PageLimit { .. } => {
                    warn!(stream, pages = report.pages_fetched, "{e}");
                }
                _ => error!(stream, pages = report.pages_fetched, error = %e, "Stream failed"),
            }
            report.fail(&e);
        }

        #[allow(clippy::cast_possible_truncation)]
        report.finish(start.elapsed().as_millis() as u64);
        info!(
            stream,
            status = ?report.status,
            records = report.records_emitted,
            dropped = report.records_dropped,
            pages = report.pages_fetched,
            "Finished stream"
        );
        report
    }

    /// Page loop; an `Err` stops this stream only
    async fn run_pages(&self, report: &mut StreamReport) -> Result<()> {
        let descriptor = &self.descriptor;
        let stream = descriptor.name.as_str();
        let url = descriptor.url();
        let extractor = RecordExtractor::new(&descriptor.records_path);
        let mut driver = PaginationDriver::new(descriptor.paginate, &descriptor.pagination);

        while !driver.is_done() {
            if self.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if self.max_pages > 0 && report.pages_fetched >= self.max_pages {
                return Err(Error::PageLimit {
                    stream: stream.to_string(),
                    max_pages: self.max_pages,
                });
            }

            let params = build_params(descriptor, self.ctx.config(), driver.cursor())?;
            let response = self.transport.fetch(&url, &params).await?;
            if !response.is_success() {
                return Err(Error::http_status(response.status, response.body));
            }
            report.pages_fetched += 1;
            let page = report.pages_fetched;

            let body = decode_body(&response.body)?;
            let raw_records = extractor.extract(&body)?;
            debug!(stream, page, records = raw_records.len(), "Fetched page");

            for (position, raw) in raw_records.iter().enumerate() {
                match validate_record(&descriptor.schema, raw) {
                    Ok(valid) => {
                        let record = enrich(valid, &self.ctx);
                        self.sink.emit(stream, record).await?;
                        report.records_emitted += 1;
                    }
                    Err(e) if e.is_record_level() => {
                        warn!(stream, page, position, error = %e, "Dropped record");
                        report.drop_record(&e);
                    }
                    Err(e) => return Err(e),
                }
            }

            driver.advance(&body, raw_records.len());
        }

        Ok(())
    }
}
