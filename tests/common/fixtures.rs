use std::sync::Mutex;

use linkhub::{Clipboard, Hub, HubConfig, LinkId, MemoryStore, ProjectId};
use serde_json::json;

pub const CREATED_AT: &str = "2024-05-01T12:00:00Z";

/// Opens a hub over a fresh in-memory store and applies the initial snapshots.
/// Returns the hub and a handle on the same store.
pub async fn open_hub() -> (Hub<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let hub = open_hub_on(&store).await;
    (hub, store)
}

pub async fn open_hub_on(store: &MemoryStore) -> Hub<MemoryStore> {
    let _ = tracing_subscriber::fmt::try_init();
    let mut hub = Hub::open(store.clone(), HubConfig::default())
        .await
        .expect("Failed to open hub");
    hub.sync();
    hub
}

/// Writes a project document straight into the store.
pub fn seed_project(store: &MemoryStore, id: &str, name: &str) -> ProjectId {
    store.insert_raw(
        "projects",
        id,
        json!({ "name": name, "createdAt": CREATED_AT }),
    )
    .expect("Failed to seed document");
    ProjectId::new(id)
}

/// Writes a link document straight into the store.
pub fn seed_link(store: &MemoryStore, id: &str, title: &str, url: &str, project_id: &str) -> LinkId {
    store.insert_raw(
        "links",
        id,
        json!({
            "title": title,
            "url": url,
            "projectId": project_id,
            "createdAt": CREATED_AT
        }),
    )
    .expect("Failed to seed document");
    LinkId::new(id)
}

pub fn project_names(hub: &Hub<MemoryStore>) -> Vec<String> {
    hub.store()
        .projects()
        .iter()
        .map(|project| project.name.clone())
        .collect()
}

pub fn link_titles(hub: &Hub<MemoryStore>) -> Vec<String> {
    hub.store()
        .links()
        .iter()
        .map(|link| link.title.clone())
        .collect()
}

/// Clipboard that remembers what was written.
#[derive(Default)]
pub struct RecordingClipboard {
    pub written: Mutex<Vec<String>>,
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        self.written
            .lock()
            .expect("clipboard lock")
            .push(text.to_string());
        Ok(())
    }
}

/// Clipboard without permission to write.
pub struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn write_text(&self, _text: &str) -> anyhow::Result<()> {
        anyhow::bail!("clipboard access denied")
    }
}
