//! Newline-delimited JSON event sink.

use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;

use crate::events::{
    EventEnvelope,
    ports::{EventPublishError, EventPublishResult, EventPublisher},
};

/// Writes each envelope as one JSON object per line.
///
/// Writes are synchronous and flushed per event. Wrap a buffered file or a
/// pipe to a sync agent as the writer.
#[derive(Debug)]
pub struct JsonLinesEventSink<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesEventSink<W>
where
    W: Write + Send,
{
    /// Creates a sink writing to `writer`.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink, returning the writer.
    ///
    /// # Errors
    ///
    /// Returns publisher runtime errors when the writer lock is poisoned.
    pub fn into_inner(self) -> EventPublishResult<W> {
        self.writer
            .into_inner()
            .map_err(|err| EventPublishError::runtime(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl<W> EventPublisher for JsonLinesEventSink<W>
where
    W: Write + Send,
{
    async fn publish(&self, envelope: &EventEnvelope) -> EventPublishResult<()> {
        let mut line = serde_json::to_vec(envelope)?;
        line.push(b'\n');

        let mut writer = self
            .writer
            .lock()
            .map_err(|err| EventPublishError::runtime(std::io::Error::other(err.to_string())))?;
        writer
            .write_all(&line)
            .and_then(|()| writer.flush())
            .map_err(EventPublishError::runtime)
    }
}
