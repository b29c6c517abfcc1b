mod memory;

use std::{fmt, future::Future};

use serde_json::{Map, Value};
use tokio::sync::mpsc;

pub use memory::{MemoryStore, Operation, RemoteCall};

/// A document as the remote store delivers it: an opaque id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotEvent {
    /// Complete listing of the collection at one point in time.
    Snapshot(Vec<Document>),
    /// The stream terminated. Nothing follows this event.
    Failed(String),
}

/// Cancellable stream of snapshot events for one collection.
///
/// The remote side is released when the subscription is dropped or
/// [`Subscription::unsubscribe`] is called.
pub struct Subscription {
    collection: String,
    events: mpsc::UnboundedReceiver<SnapshotEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("collection", &self.collection)
            .field("released", &self.release.is_none())
            .finish()
    }
}

impl Subscription {
    pub fn new(
        collection: impl Into<String>,
        events: mpsc::UnboundedReceiver<SnapshotEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            collection: collection.into(),
            events,
            release: Some(Box::new(release)),
        }
    }

    /// Wait for the next event. A stream closed by the remote side without a
    /// failure event reports as failed.
    pub async fn next(&mut self) -> SnapshotEvent {
        self.events
            .recv()
            .await
            .unwrap_or_else(|| SnapshotEvent::Failed("snapshot stream closed".to_string()))
    }

    /// Take the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<SnapshotEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Some(SnapshotEvent::Failed("snapshot stream closed".to_string()))
            }
        }
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Subscribable document collections hosted by a remote store.
pub trait RemoteCollectionClient {
    fn subscribe(&self, collection: &str) -> impl Future<Output = anyhow::Result<Subscription>>;
    /// Returns the id assigned by the store.
    fn create(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> impl Future<Output = anyhow::Result<String>>;
    /// Merges `fields` into an existing document.
    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> impl Future<Output = anyhow::Result<()>>;
    fn delete(&self, collection: &str, id: &str) -> impl Future<Output = anyhow::Result<()>>;
    /// Deletes every id or none of them.
    fn batch_delete(
        &self,
        collection: &str,
        ids: &[String],
    ) -> impl Future<Output = anyhow::Result<()>>;
}
