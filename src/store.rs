//! Local object store: the authoritative client-side list and its
//! remote-backed mutations.
//!
//! The store owns the only copy of the room's object list the rest of the
//! engine reads. Every mutation goes through the server first: objects are
//! appended only after the server returns them with an id, removed only
//! after a delete succeeds, and rewritten only after every update of a
//! drag-commit lands. Two short-lived id sets — recently-created and erased
//! — act as suppression windows so a poll that raced a local mutation can
//! neither drop a fresh object nor resurrect a deleted one.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use futures_util::future::join_all;
use uuid::Uuid;

use crate::api::{ApiError, ObjectApi};
use crate::object::{DecodeError, ObjectData, ObjectId, SceneObject, WireObject};

/// Error returned by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The remote call backing the operation failed.
    #[error("failed to persist to the server: {0}")]
    Persistence(#[from] ApiError),
    /// The server answered a mutation with an object this client cannot decode.
    #[error("server returned an undecodable object: {0}")]
    Decode(#[from] DecodeError),
}

/// The authoritative local list of canvas objects for one room.
pub struct CanvasObjectStore<A> {
    api: A,
    room_id: Uuid,
    objects: Vec<SceneObject>,
    /// Ids created locally that the server has not yet echoed back in a poll.
    recently_created: HashSet<ObjectId>,
    /// Ids deleted locally that a stale poll might still contain.
    erased: HashSet<ObjectId>,
}

impl<A: ObjectApi> CanvasObjectStore<A> {
    /// Create an empty store for `room_id` backed by `api`.
    pub fn new(api: A, room_id: Uuid) -> Self {
        Self {
            api,
            room_id,
            objects: Vec::new(),
            recently_created: HashSet::new(),
            erased: HashSet::new(),
        }
    }

    /// The room this store belongs to.
    #[must_use]
    pub fn room_id(&self) -> Uuid {
        self.room_id
    }

    /// The remote operations backing this store.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The local object list in server creation order.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Look up an object by id.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    /// Number of objects in the local list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the local list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Persist a new object and append it to the local list.
    ///
    /// The object is only ever added after the server has returned it with
    /// its assigned id; on failure the local list is untouched.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] if the remote create fails,
    /// [`StoreError::Decode`] if the server's echo is unparseable.
    pub async fn create(&mut self, data: &ObjectData) -> Result<ObjectId, StoreError> {
        let wire = self
            .api
            .create_object(self.room_id, data.kind().as_wire_str(), data.encode())
            .await?;
        let obj = SceneObject::decode(&wire)?;
        let id = obj.id;
        self.recently_created.insert(id);
        self.objects.push(obj);
        Ok(id)
    }

    /// Delete one object remotely, removing it locally only on success.
    ///
    /// A failed remote delete leaves the object visible; the eraser retries
    /// it naturally on a later stroke.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] if the remote delete fails.
    pub async fn delete(&mut self, id: ObjectId) -> Result<(), StoreError> {
        self.api.delete_object(self.room_id, id).await?;
        self.objects.retain(|obj| obj.id != id);
        self.erased.insert(id);
        Ok(())
    }

    /// Ask the server to remove the most-recently-created object.
    ///
    /// Guarded no-op when the local list is empty: no remote call is made.
    /// The local list is never mutated here — the next poll cycle is the
    /// sole source of the post-undo truth.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] if the remote undo fails.
    pub async fn undo(&mut self) -> Result<(), StoreError> {
        if self.objects.is_empty() {
            return Ok(());
        }
        let removed = self.api.undo(self.room_id).await?;
        // The removed object may still be inside its create suppression
        // window; close it so the next poll does not carry it forward.
        self.recently_created.remove(&removed.id);
        Ok(())
    }

    /// Ask the server to restore the most-recently-deleted object.
    ///
    /// A nothing-to-restore answer from the server is a benign no-op.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] for any other remote failure.
    pub async fn redo(&mut self) -> Result<(), StoreError> {
        match self.api.redo(self.room_id).await {
            Ok(_) => Ok(()),
            Err(err) if err.is_nothing_to_restore() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the data of several objects, one remote update per object.
    ///
    /// The requests run in parallel. The local list is rewritten only after
    /// every update succeeds; on partial failure nothing is applied locally
    /// and the half-committed server state is picked up by the next poll.
    ///
    /// # Errors
    ///
    /// [`StoreError::Persistence`] carrying the first failure.
    pub async fn update_many(
        &mut self,
        updates: HashMap<ObjectId, ObjectData>,
    ) -> Result<(), StoreError> {
        let requests: Vec<_> = updates
            .iter()
            .map(|(id, data)| self.api.update_object(self.room_id, *id, data.encode()))
            .collect();

        let mut first_failure = None;
        let mut failed = 0_usize;
        for result in join_all(requests).await {
            if let Err(err) = result {
                failed += 1;
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }

        if let Some(err) = first_failure {
            log::error!(
                "update_many: {failed} of {} updates failed, local list left untouched: {err}",
                updates.len()
            );
            return Err(err.into());
        }

        for obj in &mut self.objects {
            if let Some(data) = updates.get(&obj.id) {
                obj.data = data.clone();
            }
        }
        Ok(())
    }

    /// Merge a freshly-fetched server list into the local list.
    ///
    /// The merge is a coarse whole-list swap gated on the id sets differing;
    /// when the sets are identical the local list is left untouched so
    /// redundant polls cause no re-render. Objects whose delete is still in
    /// its suppression window are dropped from the incoming list, local
    /// objects the server has not echoed back yet are carried forward, and
    /// objects inside an active drag session keep their local copy so a
    /// stale poll cannot fight the user's live drag.
    ///
    /// Returns `true` if the local list was replaced.
    pub fn merge_remote(&mut self, fetched: Vec<WireObject>, dragged: &HashSet<ObjectId>) -> bool {
        let fetched_ids: HashSet<ObjectId> = fetched.iter().map(|wire| wire.id).collect();

        let mut incoming: Vec<SceneObject> = Vec::with_capacity(fetched.len());
        for wire in &fetched {
            if self.erased.contains(&wire.id) {
                continue;
            }
            match SceneObject::decode(wire) {
                Ok(obj) => incoming.push(obj),
                Err(err) => log::warn!("skipping malformed object {}: {err}", wire.id),
            }
        }

        // Prune suppression windows the server has confirmed: an erased id
        // absent from the fetch is truly gone, a created id present in the
        // fetch no longer needs carrying.
        self.erased.retain(|id| fetched_ids.contains(id));
        self.recently_created.retain(|id| !fetched_ids.contains(id));

        // Carry forward local creations the fetch predates, and objects
        // inside an active drag session that another client has deleted —
        // the session keeps its target until commit, and the post-commit
        // poll removes it.
        for obj in &self.objects {
            let created_ahead =
                self.recently_created.contains(&obj.id) && !fetched_ids.contains(&obj.id);
            let mid_drag = dragged.contains(&obj.id) && !fetched_ids.contains(&obj.id);
            if created_ahead || mid_drag {
                incoming.push(obj.clone());
            }
        }

        let incoming_ids: HashSet<ObjectId> = incoming.iter().map(|obj| obj.id).collect();
        let local_ids: HashSet<ObjectId> = self.objects.iter().map(|obj| obj.id).collect();
        if incoming_ids == local_ids {
            return false;
        }

        let merged: Vec<SceneObject> = incoming
            .into_iter()
            .map(|obj| {
                if dragged.contains(&obj.id) {
                    self.objects
                        .iter()
                        .find(|local| local.id == obj.id)
                        .cloned()
                        .unwrap_or(obj)
                } else {
                    obj
                }
            })
            .collect();
        self.objects = merged;
        true
    }
}
