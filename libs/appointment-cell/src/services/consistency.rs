// libs/appointment-cell/src/services/consistency.rs
//
// Serializes writes per practitioner so the final conflict check and the
// write it guards cannot interleave with another booking for the same
// calendar. Different practitioners never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
pub struct PractitionerLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl PractitionerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for and holds the practitioner's write lock until the guard drops.
    ///
    /// Locks nobody holds or waits on are dropped from the table on the way in,
    /// so it only tracks practitioners with writes in flight.
    pub async fn acquire(&self, practitioner_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|id, lock| *id == practitioner_id || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(practitioner_id).or_default())
        };

        debug!("Acquiring scheduling lock for practitioner {}", practitioner_id);
        lock.lock_owned().await
    }

    /// Practitioners currently in the table.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
