pub mod config;
pub mod core;

pub use config::HubConfig;
pub use crate::core::{
    error::{HubError, MutationAction, ValidationError},
    model::{CollectionKind, Link, LinkId, Project, ProjectId},
    remote::{Document, MemoryStore, RemoteCollectionClient, SnapshotEvent, Subscription},
    sync::{
        Clipboard, DeleteTarget, Hub, MutationCoordinator, PendingRequest, RequestOutcome,
        SearchHit, StoreUpdate, SyncStore,
    },
};
