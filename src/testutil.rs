//! Shared test helpers: an in-memory [`ObjectApi`] double with call
//! recording and failure injection, plus object fixture builders.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::api::{ApiError, ObjectApi};
use crate::object::{LineData, ObjectData, ObjectId, PathData, PathPoint, SceneObject, WireObject};

/// A line payload with a fixed test style.
pub fn line_data(x1: f64, y1: f64, x2: f64, y2: f64) -> ObjectData {
    ObjectData::Line(LineData {
        x1,
        y1,
        x2,
        y2,
        color: "#000000".to_owned(),
        stroke_width: 2.0,
    })
}

/// A path payload through the given points with a fixed test style.
pub fn path_data(points: &[(f64, f64)]) -> ObjectData {
    ObjectData::Path(PathData {
        points: points.iter().map(|&(x, y)| PathPoint { x, y }).collect(),
        color: "#000000".to_owned(),
        stroke_width: 2.0,
    })
}

/// A wire object wrapping `data` with a fresh id.
pub fn wire_from(data: &ObjectData) -> WireObject {
    WireObject {
        id: Uuid::new_v4(),
        object_type: data.kind().as_wire_str().to_owned(),
        data: data.encode(),
        created_at: "2024-05-01T00:00:00Z".to_owned(),
    }
}

/// A decoded scene object wrapping `data` with a fresh id.
pub fn scene_from(data: ObjectData) -> SceneObject {
    SceneObject {
        id: Uuid::new_v4(),
        kind: data.kind(),
        data,
        created_at: "2024-05-01T00:00:00Z".to_owned(),
    }
}

/// Observable state of the [`MockApi`] server double.
#[derive(Default)]
pub struct MockState {
    /// Live objects, in creation order.
    pub objects: Vec<WireObject>,
    /// Objects removed by delete/undo, most recent last.
    pub deleted: Vec<WireObject>,
    pub create_calls: usize,
    pub list_calls: usize,
    pub delete_calls: Vec<ObjectId>,
    pub update_calls: Vec<ObjectId>,
    pub undo_calls: usize,
    pub redo_calls: usize,
    pub fail_create: bool,
    pub fail_list: bool,
    pub fail_delete: bool,
    pub fail_update_ids: HashSet<ObjectId>,
}

/// In-memory [`ObjectApi`] implementation. Clones share the same state so a
/// test can keep a handle while the engine owns another.
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Replace the server's live object list.
    pub fn seed(&self, objects: Vec<WireObject>) {
        self.state().objects = objects;
    }
}

fn transient() -> ApiError {
    ApiError::Status { status: 500, message: "injected failure".to_owned() }
}

impl ObjectApi for MockApi {
    async fn create_object(
        &self,
        _room_id: Uuid,
        object_type: &str,
        object_data: String,
    ) -> Result<WireObject, ApiError> {
        let mut state = self.state();
        state.create_calls += 1;
        if state.fail_create {
            return Err(transient());
        }
        let wire = WireObject {
            id: Uuid::new_v4(),
            object_type: object_type.to_owned(),
            data: object_data,
            created_at: "2024-05-01T00:00:00Z".to_owned(),
        };
        state.objects.push(wire.clone());
        Ok(wire)
    }

    async fn list_objects(&self, _room_id: Uuid) -> Result<Vec<WireObject>, ApiError> {
        let mut state = self.state();
        state.list_calls += 1;
        if state.fail_list {
            return Err(transient());
        }
        Ok(state.objects.clone())
    }

    async fn delete_object(&self, _room_id: Uuid, id: ObjectId) -> Result<(), ApiError> {
        let mut state = self.state();
        state.delete_calls.push(id);
        if state.fail_delete {
            return Err(transient());
        }
        if let Some(index) = state.objects.iter().position(|obj| obj.id == id) {
            let removed = state.objects.remove(index);
            state.deleted.push(removed);
        }
        Ok(())
    }

    async fn update_object(
        &self,
        _room_id: Uuid,
        id: ObjectId,
        object_data: String,
    ) -> Result<(), ApiError> {
        let mut state = self.state();
        state.update_calls.push(id);
        if state.fail_update_ids.contains(&id) {
            return Err(transient());
        }
        if let Some(obj) = state.objects.iter_mut().find(|obj| obj.id == id) {
            obj.data = object_data;
        }
        Ok(())
    }

    async fn undo(&self, _room_id: Uuid) -> Result<WireObject, ApiError> {
        let mut state = self.state();
        state.undo_calls += 1;
        let Some(removed) = state.objects.pop() else {
            return Err(ApiError::Status { status: 400, message: "nothing to undo".to_owned() });
        };
        state.deleted.push(removed.clone());
        Ok(removed)
    }

    async fn redo(&self, _room_id: Uuid) -> Result<WireObject, ApiError> {
        let mut state = self.state();
        state.redo_calls += 1;
        let Some(restored) = state.deleted.pop() else {
            return Err(ApiError::Status { status: 404, message: "nothing to restore".to_owned() });
        };
        state.objects.push(restored.clone());
        Ok(restored)
    }
}
