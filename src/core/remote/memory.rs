use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::bail;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{Document, RemoteCollectionClient, SnapshotEvent, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Subscribe,
    Create,
    Update,
    Delete,
    BatchDelete,
}

/// One call received by a [`MemoryStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
    pub operation: Operation,
    pub collection: String,
    pub ids: Vec<String>,
}

#[derive(Debug)]
struct Subscriber {
    id: u64,
    sender: mpsc::UnboundedSender<SnapshotEvent>,
}

#[derive(Debug, Default)]
struct StoreState {
    collections: HashMap<String, BTreeMap<String, Map<String, Value>>>,
    subscribers: HashMap<String, Vec<Subscriber>>,
    next_subscriber: u64,
    failures: HashSet<Operation>,
    calls: Vec<RemoteCall>,
}

impl StoreState {
    fn record(&mut self, operation: Operation, collection: &str, ids: Vec<String>) {
        self.calls.push(RemoteCall {
            operation,
            collection: collection.to_string(),
            ids,
        });
    }

    fn check_failure(&mut self, operation: Operation, collection: &str) -> anyhow::Result<()> {
        if self.failures.remove(&operation) {
            bail!("remote store rejected {operation:?} on {collection}");
        }
        Ok(())
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn broadcast(&mut self, collection: &str) {
        let snapshot = self.snapshot(collection);
        if let Some(subscribers) = self.subscribers.get_mut(collection) {
            subscribers.retain(|subscriber| {
                subscriber
                    .sender
                    .send(SnapshotEvent::Snapshot(snapshot.clone()))
                    .is_ok()
            });
        }
    }

    fn unsubscribe(&mut self, collection: &str, id: u64) {
        if let Some(subscribers) = self.subscribers.get_mut(collection) {
            subscribers.retain(|subscriber| subscriber.id != id);
        }
    }
}

/// In-process document store implementing [`RemoteCollectionClient`].
///
/// Every change pushes a full snapshot to the collection's subscribers. Calls
/// are logged and individual operations can be made to fail once, which is
/// what the integration tests and the demo binary drive the core with.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

fn lock(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        lock(&self.state)
    }

    /// Write a document directly, bypassing the call log and failure plan.
    /// `fields` must be a JSON object.
    pub fn insert_raw(&self, collection: &str, id: &str, fields: Value) -> anyhow::Result<()> {
        let fields = match fields {
            Value::Object(fields) => fields,
            other => bail!("document {collection}/{id} must be an object, got {other}"),
        };
        let mut state = self.state();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        state.broadcast(collection);
        Ok(())
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.state().snapshot(collection)
    }

    pub fn contains(&self, collection: &str, id: &str) -> bool {
        self.state()
            .collections
            .get(collection)
            .is_some_and(|documents| documents.contains_key(id))
    }

    /// Make the next call of `operation` fail without side effects.
    pub fn fail_next(&self, operation: Operation) {
        self.state().failures.insert(operation);
    }

    /// Terminate every open stream on `collection` with a failure event.
    pub fn break_subscriptions(&self, collection: &str, reason: &str) {
        let mut state = self.state();
        if let Some(subscribers) = state.subscribers.remove(collection) {
            for subscriber in subscribers {
                let _ = subscriber
                    .sender
                    .send(SnapshotEvent::Failed(reason.to_string()));
            }
        }
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state().calls.clone()
    }

    /// Calls other than subscriptions.
    pub fn mutation_calls(&self) -> Vec<RemoteCall> {
        self.state()
            .calls
            .iter()
            .filter(|call| call.operation != Operation::Subscribe)
            .cloned()
            .collect()
    }

    pub fn subscriber_count(&self, collection: &str) -> usize {
        self.state()
            .subscribers
            .get(collection)
            .map_or(0, Vec::len)
    }
}

impl RemoteCollectionClient for MemoryStore {
    async fn subscribe(&self, collection: &str) -> anyhow::Result<Subscription> {
        let mut state = self.state();
        state.record(Operation::Subscribe, collection, vec![]);
        state.check_failure(Operation::Subscribe, collection)?;

        let (sender, events) = mpsc::unbounded_channel();
        let _ = sender.send(SnapshotEvent::Snapshot(state.snapshot(collection)));
        let id = state.next_subscriber;
        state.next_subscriber += 1;
        state
            .subscribers
            .entry(collection.to_string())
            .or_default()
            .push(Subscriber { id, sender });

        let weak = Arc::downgrade(&self.state);
        let name = collection.to_string();
        Ok(Subscription::new(collection, events, move || {
            if let Some(state) = weak.upgrade() {
                lock(&state).unsubscribe(&name, id);
            }
        }))
    }

    async fn create(&self, collection: &str, fields: Map<String, Value>) -> anyhow::Result<String> {
        let mut state = self.state();
        let id = Uuid::new_v4().simple().to_string();
        state.record(Operation::Create, collection, vec![id.clone()]);
        state.check_failure(Operation::Create, collection)?;

        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        state.broadcast(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> anyhow::Result<()> {
        let mut state = self.state();
        state.record(Operation::Update, collection, vec![id.to_string()]);
        state.check_failure(Operation::Update, collection)?;

        let Some(document) = state
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
        else {
            bail!("no document {id} in {collection}");
        };
        document.extend(fields);
        state.broadcast(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<()> {
        let mut state = self.state();
        state.record(Operation::Delete, collection, vec![id.to_string()]);
        state.check_failure(Operation::Delete, collection)?;

        let removed = state
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some();
        if removed {
            state.broadcast(collection);
        }
        Ok(())
    }

    async fn batch_delete(&self, collection: &str, ids: &[String]) -> anyhow::Result<()> {
        let mut state = self.state();
        state.record(Operation::BatchDelete, collection, ids.to_vec());
        state.check_failure(Operation::BatchDelete, collection)?;

        if let Some(documents) = state.collections.get_mut(collection) {
            for id in ids {
                documents.remove(id);
            }
        }
        state.broadcast(collection);
        Ok(())
    }
}
