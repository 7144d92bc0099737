//! Record sinks
//!
//! The sync engine hands every typed record to a `RecordSink`; durability and
//! batching are the sink's business.

use super::message::SingerMessage;
use crate::enrich::TypedRecord;
use crate::error::{Error, Result};
use crate::streams::StreamDescriptor;
use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Receives records one at a time
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Accept one record for a stream
    async fn emit(&self, stream: &str, record: TypedRecord) -> Result<()>;
}

// ============================================================================
// JSON Lines
// ============================================================================

/// Writes Singer messages as JSON lines
///
/// Each message is written and flushed as one line while the writer lock is
/// held, so lines from concurrent streams never interleave.
pub struct JsonLinesSink<W: AsyncWrite + Unpin + Send> {
    writer: Mutex<W>,
}

/// JSON lines on standard output
pub type StdoutSink = JsonLinesSink<tokio::io::Stdout>;

impl StdoutSink {
    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesSink<W> {
    /// Create a sink over any writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Write the SCHEMA message for a stream
    pub async fn write_schema(&self, descriptor: &StreamDescriptor) -> Result<()> {
        self.write_message(&SingerMessage::schema(descriptor)).await
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    async fn write_message(&self, message: &SingerMessage<'_>) -> Result<()> {
        let mut line = serde_json::to_vec(message)
            .map_err(|e| Error::sink(format!("Failed to serialize message: {e}")))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(&line)
            .await
            .map_err(|e| Error::sink(format!("Failed to write message: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| Error::sink(format!("Failed to flush message: {e}")))
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> RecordSink for JsonLinesSink<W> {
    async fn emit(&self, stream: &str, record: TypedRecord) -> Result<()> {
        self.write_message(&SingerMessage::record(stream, &record))
            .await
    }
}

// ============================================================================
// In-Memory
// ============================================================================

/// Collects records in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(String, TypedRecord)>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record emitted so far, with its stream name
    pub async fn records(&self) -> Vec<(String, TypedRecord)> {
        self.records.lock().await.clone()
    }

    /// Records of one stream, in emission order
    pub async fn records_for(&self, stream: &str) -> Vec<TypedRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|(name, _)| name == stream)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Number of records emitted
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn emit(&self, stream: &str, record: TypedRecord) -> Result<()> {
        self.records.lock().await.push((stream.to_string(), record));
        Ok(())
    }
}
