mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from linkhub for tests
pub use linkhub::{
    Clipboard, CollectionKind, DeleteTarget, Hub, HubConfig, HubError, Link, LinkId,
    MemoryStore, MutationAction, PendingRequest, Project, ProjectId, RequestOutcome,
    StoreUpdate, ValidationError,
    core::remote::{Operation, RemoteCollectionClient},
};
