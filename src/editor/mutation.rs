use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{instrument, warn};

use super::collection::RowKey;
use crate::error::EditError;
use crate::services::gateway::{CrudGateway, RecordKind};

/// A remote write decided by a confirmed dialog, addressed to a row by key.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingMutation<R> {
    Create { key: RowKey, record: R },
    Update { key: RowKey, record: R },
    Delete { key: RowKey, id: i32 },
}

impl<R> PendingMutation<R> {
    pub fn key(&self) -> RowKey {
        match self {
            PendingMutation::Create { key, .. }
            | PendingMutation::Update { key, .. }
            | PendingMutation::Delete { key, .. } => *key,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<R> {
    Saved { key: RowKey, created: bool, record: R },
    Deleted { key: RowKey, id: i32, count: u64 },
    Failed { key: RowKey, message: String },
}

impl<R> MutationOutcome<R> {
    pub fn key(&self) -> RowKey {
        match self {
            MutationOutcome::Saved { key, .. }
            | MutationOutcome::Deleted { key, .. }
            | MutationOutcome::Failed { key, .. } => *key,
        }
    }
}

#[instrument(level = "debug", skip_all, fields(kind = K::LABEL, key = %mutation.key()))]
pub async fn execute<K: RecordKind>(
    gateway: &CrudGateway<K>,
    mutation: PendingMutation<K::Record>,
) -> MutationOutcome<K::Record> {
    let key = mutation.key();
    let result = match mutation {
        PendingMutation::Create { record, .. } => gateway
            .create(&record)
            .await
            .map(|record| MutationOutcome::Saved { key, created: true, record }),
        PendingMutation::Update { record, .. } => gateway
            .update(&record)
            .await
            .map(|record| MutationOutcome::Saved { key, created: false, record }),
        PendingMutation::Delete { id, .. } => gateway
            .delete_by_id(id)
            .await
            .map(|count| MutationOutcome::Deleted { key, id, count }),
    };

    result.unwrap_or_else(|failure| MutationOutcome::Failed {
        key,
        message: failure.to_string(),
    })
}

/// In-flight remote calls of one editor. Dropping the bag aborts them all.
pub struct MutationBag<K: RecordKind> {
    gateway: CrudGateway<K>,
    tasks: JoinSet<MutationOutcome<K::Record>>,
}

impl<K: RecordKind> MutationBag<K> {
    pub fn new(gateway: CrudGateway<K>) -> Self {
        Self {
            gateway,
            tasks: JoinSet::new(),
        }
    }

    pub fn gateway(&self) -> &CrudGateway<K> {
        &self.gateway
    }

    /// Starts the call on the current tokio runtime. Without one the
    /// mutation is dropped and `NoRuntime` is returned.
    pub fn spawn(&mut self, mutation: PendingMutation<K::Record>) -> Result<(), EditError> {
        let handle = Handle::try_current().map_err(|err| {
            warn!(error = %err, kind = K::LABEL, key = %mutation.key(), "no runtime for remote call");
            EditError::NoRuntime
        })?;
        let gateway = self.gateway.clone();
        self.tasks
            .spawn_on(async move { execute(&gateway, mutation).await }, &handle);
        Ok(())
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for the next call to settle. `None` once nothing is in flight.
    pub async fn next(&mut self) -> Option<MutationOutcome<K::Record>> {
        loop {
            match self.tasks.join_next().await? {
                Ok(outcome) => return Some(outcome),
                Err(err) => warn!(error = %err, kind = K::LABEL, "remote call task did not complete"),
            }
        }
    }
}
