use tracing::{debug, error, warn};

use crate::{
    config::HubConfig,
    core::{
        error::HubError,
        model::{CollectionKind, Link, Project, ProjectId, Record, collate},
        remote::{Document, RemoteCollectionClient, SnapshotEvent, Subscription},
    },
};

/// What applying one snapshot event did to the mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUpdate {
    Replaced {
        collection: CollectionKind,
        applied: usize,
        skipped: usize,
    },
    Failed(CollectionKind),
}

/// Local mirrors of the `projects` and `links` collections.
///
/// The mirrors are only ever written by applying a snapshot, and each snapshot
/// replaces the whole mirror. After a stream fails the store keeps serving the
/// last good data and reports the failure through [`SyncStore::failure`].
#[derive(Debug)]
pub struct SyncStore {
    projects: Vec<Project>,
    links: Vec<Link>,
    project_stream: Option<Subscription>,
    link_stream: Option<Subscription>,
    project_snapshots: u64,
    link_snapshots: u64,
    failure: Option<HubError>,
}

impl SyncStore {
    /// Subscribe to both collections. Events are not applied until the store
    /// is polled.
    pub async fn open<C: RemoteCollectionClient>(
        client: &C,
        config: &HubConfig,
    ) -> Result<Self, HubError> {
        let project_stream = subscribe(client, &config.projects_collection).await?;
        let link_stream = subscribe(client, &config.links_collection).await?;
        Ok(Self {
            projects: Vec::new(),
            links: Vec::new(),
            project_stream: Some(project_stream),
            link_stream: Some(link_stream),
            project_snapshots: 0,
            link_snapshots: 0,
            failure: None,
        })
    }

    /// Projects ordered by name.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// All links ordered by title, orphans included.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| &project.id == id)
    }

    /// Number of snapshots applied to a collection so far.
    pub fn snapshots_applied(&self, collection: CollectionKind) -> u64 {
        match collection {
            CollectionKind::Projects => self.project_snapshots,
            CollectionKind::Links => self.link_snapshots,
        }
    }

    pub fn is_streaming(&self, collection: CollectionKind) -> bool {
        match collection {
            CollectionKind::Projects => self.project_stream.is_some(),
            CollectionKind::Links => self.link_stream.is_some(),
        }
    }

    /// The most recent stream failure, if the store is degraded.
    pub fn failure(&self) -> Option<&HubError> {
        self.failure.as_ref()
    }

    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    /// Apply every event already queued, in arrival order per collection.
    pub fn poll(&mut self) -> Vec<StoreUpdate> {
        let mut updates = Vec::new();
        while let Some(event) = self.project_stream.as_mut().and_then(Subscription::try_next) {
            updates.push(self.apply(CollectionKind::Projects, event));
        }
        while let Some(event) = self.link_stream.as_mut().and_then(Subscription::try_next) {
            updates.push(self.apply(CollectionKind::Links, event));
        }
        updates
    }

    /// Wait for the next event on either stream and apply it. Returns `None`
    /// once both streams have ended.
    pub async fn next_update(&mut self) -> Option<StoreUpdate> {
        if self.project_stream.is_none() && self.link_stream.is_none() {
            return None;
        }
        let (collection, event) = tokio::select! {
            biased;
            event = next_event(&mut self.project_stream) => (CollectionKind::Projects, event),
            event = next_event(&mut self.link_stream) => (CollectionKind::Links, event),
        };
        Some(self.apply(collection, event))
    }

    pub fn apply(&mut self, collection: CollectionKind, event: SnapshotEvent) -> StoreUpdate {
        match event {
            SnapshotEvent::Snapshot(documents) => {
                let (applied, skipped) = match collection {
                    CollectionKind::Projects => {
                        self.project_snapshots += 1;
                        replace(&mut self.projects, &documents)
                    }
                    CollectionKind::Links => {
                        self.link_snapshots += 1;
                        replace(&mut self.links, &documents)
                    }
                };
                debug!(%collection, applied, skipped, "applied snapshot");
                StoreUpdate::Replaced {
                    collection,
                    applied,
                    skipped,
                }
            }
            SnapshotEvent::Failed(reason) => {
                error!(%collection, %reason, "snapshot stream failed");
                match collection {
                    CollectionKind::Projects => self.project_stream = None,
                    CollectionKind::Links => self.link_stream = None,
                }
                self.failure = Some(HubError::Subscription { collection, reason });
                StoreUpdate::Failed(collection)
            }
        }
    }

    /// Release both subscriptions. The mirrors keep their last contents.
    pub fn close(&mut self) {
        self.project_stream = None;
        self.link_stream = None;
    }
}

async fn subscribe<C: RemoteCollectionClient>(
    client: &C,
    collection: &str,
) -> Result<Subscription, HubError> {
    client.subscribe(collection).await.map_err(|err| {
        error!(collection, error = %format!("{err:#}"), "could not subscribe");
        HubError::Initialization(format!("{err:#}"))
    })
}

async fn next_event(stream: &mut Option<Subscription>) -> SnapshotEvent {
    match stream {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

/// Rebuild `mirror` from `documents`, dropping documents that do not decode.
fn replace<T: Record>(mirror: &mut Vec<T>, documents: &[Document]) -> (usize, usize) {
    let mut records = Vec::with_capacity(documents.len());
    for document in documents {
        match T::from_document(document) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(collection = %T::COLLECTION, id = %document.id, error = %err, "skipping document");
            }
        }
    }
    records.sort_by(|a, b| {
        collate(a.sort_key(), b.sort_key()).then_with(|| a.record_id().cmp(b.record_id()))
    });
    let skipped = documents.len() - records.len();
    *mirror = records;
    (mirror.len(), skipped)
}
