//! Destinations for snapshots and live events.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use swimbots_data::{LiveEvent, WorldSnapshot};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

#[async_trait]
pub trait SnapshotSink: Send {
    async fn publish_snapshot(&mut self, snapshot: &WorldSnapshot) -> Result<()>;
    async fn publish_event(&mut self, event: &LiveEvent) -> Result<()>;

    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl SnapshotSink for Box<dyn SnapshotSink> {
    async fn publish_snapshot(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        (**self).publish_snapshot(snapshot).await
    }

    async fn publish_event(&mut self, event: &LiveEvent) -> Result<()> {
        (**self).publish_event(event).await
    }

    async fn flush(&mut self) -> Result<()> {
        (**self).flush().await
    }
}

/// Discards everything.
pub struct NullSink;

#[async_trait]
impl SnapshotSink for NullSink {
    async fn publish_snapshot(&mut self, _snapshot: &WorldSnapshot) -> Result<()> {
        Ok(())
    }

    async fn publish_event(&mut self, _event: &LiveEvent) -> Result<()> {
        Ok(())
    }
}

/// Keeps everything in memory. Useful for embedding and tests.
#[derive(Default)]
pub struct MemorySink {
    pub snapshots: Vec<WorldSnapshot>,
    pub events: Vec<LiveEvent>,
}

#[async_trait]
impl SnapshotSink for MemorySink {
    async fn publish_snapshot(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }

    async fn publish_event(&mut self, event: &LiveEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
enum Frame<'a> {
    Snapshot(&'a WorldSnapshot),
    Event(&'a LiveEvent),
}

/// Writes one JSON object per line:
/// `{"kind":"snapshot","data":{..}}` or `{"kind":"event","data":{..}}`.
pub struct JsonLinesSink<W: AsyncWrite + Unpin + Send> {
    writer: BufWriter<W>,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            buf: Vec::with_capacity(4096),
        }
    }

    async fn write_frame(&mut self, frame: Frame<'_>) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, &frame)?;
        self.buf.push(b'\n');
        self.writer.write_all(&self.buf).await?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> SnapshotSink for JsonLinesSink<W> {
    async fn publish_snapshot(&mut self, snapshot: &WorldSnapshot) -> Result<()> {
        self.write_frame(Frame::Snapshot(snapshot)).await
    }

    async fn publish_event(&mut self, event: &LiveEvent) -> Result<()> {
        self.write_frame(Frame::Event(event)).await
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }
}
