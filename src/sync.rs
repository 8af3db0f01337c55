//! Periodic reconciliation of the local object list against the server.
//!
//! The reconciler pulls the room's full object list on a fixed period and
//! hands it to the store's merge policy. Network failures during a tick are
//! logged and do not stop the loop; the next tick simply tries again. The
//! caller passes the set of ids under an active drag so a stale poll never
//! overwrites the user's live drag.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashSet;
use std::time::Duration;

use crate::api::ObjectApi;
use crate::consts::SYNC_PERIOD;
use crate::object::ObjectId;
use crate::store::{CanvasObjectStore, StoreError};

/// Poll-and-merge reconciler for one room.
#[derive(Debug, Clone)]
pub struct SyncReconciler {
    period: Duration,
}

impl Default for SyncReconciler {
    fn default() -> Self {
        Self { period: SYNC_PERIOD }
    }
}

impl SyncReconciler {
    /// Reconciler with a custom poll period.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// The interval between polls.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// One reconciliation cycle: fetch the room's object list and merge it.
    ///
    /// Returns whether the local list was replaced.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] if the fetch fails; the local list is
    /// untouched in that case.
    pub async fn tick<A: ObjectApi>(
        &self,
        store: &mut CanvasObjectStore<A>,
        dragged: &HashSet<ObjectId>,
    ) -> Result<bool, StoreError> {
        let fetched = store.api().list_objects(store.room_id()).await?;
        Ok(store.merge_remote(fetched, dragged))
    }
}
