//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::{SyncConfig, SyncEngine, SyncReport};
use crate::enrich::RunContext;
use crate::error::{Result, ResultExt};
use crate::http::{HttpClient, Transport};
use crate::output::{RecordSink, StdoutSink};
use crate::schema::weather_registry;
use crate::streams::StreamCatalog;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Streams => self.streams(),
            Commands::Discover => self.discover(),
            Commands::Read {
                streams,
                max_concurrency,
            } => self.read(streams.as_deref(), *max_concurrency).await,
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }

        Ok(TapConfig::default())
    }

    /// Catalog of the built-in streams, honouring a base URL override
    fn load_catalog(config: &TapConfig) -> Result<StreamCatalog> {
        let registry = weather_registry()?;
        StreamCatalog::builtin(&registry, config.base_url.as_deref())
    }

    /// List available streams (lightweight, no schemas)
    fn streams(&self) -> Result<()> {
        let config = self.load_config()?;
        let catalog = Self::load_catalog(&config)?;

        self.output_message(&json!({
            "type": "STREAMS",
            "streams": catalog.names(),
        }));

        Ok(())
    }

    /// Print the catalog with each stream's JSON Schema
    fn discover(&self) -> Result<()> {
        let config = self.load_config()?;
        let catalog = Self::load_catalog(&config)?;

        let streams: Vec<Value> = catalog
            .streams()
            .iter()
            .map(|stream| {
                json!({
                    "name": stream.name,
                    "url": stream.url(),
                    "schema": stream.schema.to_json_schema(),
                    "key_properties": [],
                    "paginate": stream.paginate,
                    "settings": stream.location.settings(),
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "CATALOG",
            "catalog": { "streams": streams }
        }));

        Ok(())
    }

    /// Read data from streams
    async fn read(&self, streams: Option<&str>, max_concurrency: Option<usize>) -> Result<()> {
        let mut config = self.load_config()?;

        if let Some(selection) = streams {
            config.streams = parse_stream_list(selection);
        }
        if let Some(max) = max_concurrency {
            config.sync.max_concurrency = max;
        }

        let catalog = Self::load_catalog(&config)?;
        // Unknown names fail before any request is issued
        let selected = catalog.resolve(&config.selected_streams())?;

        let transport: Arc<dyn Transport> =
            Arc::new(HttpClient::with_config(config.http_client_config())?);
        let engine = SyncEngine::new(transport).with_config(SyncConfig::from(&config.sync));

        let sink = Arc::new(StdoutSink::stdout());
        for descriptor in &selected {
            sink.write_schema(descriptor).await?;
        }

        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, stopping after in-flight requests");
                    cancel.cancel();
                }
            })
        };

        let ctx = Arc::new(RunContext::new(config));
        let record_sink: Arc<dyn RecordSink> = sink;
        let report = engine.run(selected, ctx, record_sink, cancel).await;
        watcher.abort();

        info!(
            status = ?report.status,
            records = report.records_emitted(),
            "Read complete"
        );
        self.output_message(&summary_message(&report)?);

        Ok(())
    }

    /// Output a message to stdout
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Split a comma-separated stream list, ignoring blanks
fn parse_stream_list(selection: &str) -> Vec<String> {
    selection
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Build the SYNC_SUMMARY message for a finished run
fn summary_message(report: &SyncReport) -> Result<Value> {
    let streams =
        serde_json::to_value(&report.streams).context("Failed to serialize stream reports")?;
    let failures =
        serde_json::to_value(report.failures()).context("Failed to serialize failure counts")?;
    let failed_streams = report
        .streams
        .iter()
        .filter(|s| s.status == crate::engine::StreamStatus::Failed)
        .count();

    Ok(json!({
        "type": "SYNC_SUMMARY",
        "summary": {
            "status": report.status,
            "synced_at": report.synced_at,
            "total_records": report.records_emitted(),
            "total_streams": report.streams.len(),
            "failed_streams": failed_streams,
            "failures": failures,
            "duration_ms": report.duration_ms,
            "streams": streams
        }
    }))
}
