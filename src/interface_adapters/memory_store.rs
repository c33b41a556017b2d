// In-process PlayerStore with diff subscriptions, backing the demo binary and
// the integration tests. The production backend adapter lives with the
// embedding application; this one mirrors its observable contract: an initial
// snapshot of added events, then one batch per mutation, field-level patches
// applied store-side, and store-assigned `lastSeen` stamps.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::domain::errors::StoreError;
use crate::domain::ports::{PlayerStore, Subscription};
use crate::domain::state::{ChangeBatch, ChangeEvent, ChangeKind, PlayerRecord, RecordPatch, SnapshotEntry};
use crate::interface_adapters::protocol::{FieldOp, PlayerRecordDoc, patch_ops};

// Per-subscriber buffer; a full buffer drops the batch, not the subscriber.
const SUBSCRIBER_CAPACITY: usize = 64;

pub struct MemoryStore {
    match_id: String,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    documents: BTreeMap<String, Value>,
    subscribers: Vec<mpsc::Sender<ChangeBatch>>,
}

impl MemoryStore {
    pub fn new(match_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            match_id: match_id.into(),
            inner: Mutex::new(Inner::default()),
        })
    }

    fn document_path(&self, player_id: &str) -> String {
        format!("matches/{}/players/{}", self.match_id, player_id)
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl Inner {
    fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.documents
            .iter()
            .filter_map(|(id, doc)| {
                decode(doc).map(|record| SnapshotEntry {
                    player_id: id.clone(),
                    record,
                })
            })
            .collect()
    }

    fn broadcast(&mut self, changes: Vec<ChangeEvent>) {
        let batch = ChangeBatch {
            changes,
            snapshot: self.snapshot(),
        };
        self.subscribers.retain(|tx| match tx.try_send(batch.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("subscriber lagging, change batch dropped");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}

fn decode(doc: &Value) -> Option<PlayerRecord> {
    match serde_json::from_value::<PlayerRecordDoc>(doc.clone()) {
        Ok(doc) => Some(doc.into()),
        Err(e) => {
            warn!(error = %e, "undecodable player document skipped");
            None
        }
    }
}

#[async_trait]
impl PlayerStore for MemoryStore {
    /// Create-or-replace. Replacing an existing document surfaces as a
    /// modified event to subscribers.
    async fn create(&self, player_id: &str, record: PlayerRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let mut doc = PlayerRecordDoc::from(record);
        doc.last_seen = Self::now_millis();
        let value =
            serde_json::to_value(&doc).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let replaced = inner
            .documents
            .insert(player_id.to_string(), value)
            .is_some();
        debug!(path = %self.document_path(player_id), replaced, "document written");

        let kind = if replaced {
            ChangeKind::Modified
        } else {
            ChangeKind::Added
        };
        inner.broadcast(vec![ChangeEvent {
            kind,
            player_id: player_id.to_string(),
            record: doc.into(),
        }]);
        Ok(())
    }

    async fn update(&self, player_id: &str, patch: RecordPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let record = {
            let Some(doc) = inner.documents.get_mut(player_id) else {
                return Err(StoreError::NotFound(player_id.to_string()));
            };
            let Some(fields) = doc.as_object_mut() else {
                return Err(StoreError::Unavailable(format!(
                    "malformed document for {player_id}"
                )));
            };
            for (field, op) in patch_ops(&patch) {
                match op {
                    FieldOp::Set(value) => {
                        fields.insert(field.to_string(), value);
                    }
                    FieldOp::Increment(delta) => {
                        let current = fields.get(field).and_then(Value::as_i64).unwrap_or(0);
                        fields.insert(field.to_string(), Value::from(current + delta));
                    }
                }
            }
            if patch.touch_last_seen {
                fields.insert("lastSeen".to_string(), Value::from(Self::now_millis()));
            }
            decode(doc)
        };

        if let Some(record) = record {
            inner.broadcast(vec![ChangeEvent {
                kind: ChangeKind::Modified,
                player_id: player_id.to_string(),
                record,
            }]);
        }
        Ok(())
    }

    /// Deleting an absent document is a no-op, matching the best-effort
    /// delete-on-disconnect contract.
    async fn delete(&self, player_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(doc) = inner.documents.remove(player_id) else {
            return Ok(());
        };
        debug!(path = %self.document_path(player_id), "document deleted");
        if let Some(record) = decode(&doc) {
            inner.broadcast(vec![ChangeEvent {
                kind: ChangeKind::Removed,
                player_id: player_id.to_string(),
                record,
            }]);
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription, StoreError> {
        let mut inner = self.inner.lock().await;
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);

        // Initial delivery: the current collection as added events.
        let snapshot = inner.snapshot();
        let changes = snapshot
            .iter()
            .map(|entry| ChangeEvent {
                kind: ChangeKind::Added,
                player_id: entry.player_id.clone(),
                record: entry.record.clone(),
            })
            .collect();
        let _ = tx.try_send(ChangeBatch { changes, snapshot });

        inner.subscribers.push(tx);
        Ok(Subscription { changes: rx })
    }
}
