//! Input model: tools, the pointer gesture state machine, and the actions
//! it emits.
//!
//! The state machine is pure: each pointer handler takes the event position
//! and a read-only snapshot of the store's object list and returns the
//! [`Action`]s the engine should execute. No hidden globals, no network —
//! which is what makes every gesture testable without a drawing surface.
//! Pointer-leave is the universal cancellation signal: it discards any
//! in-progress draw, drag, or box-select without emitting mutations.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::{HashMap, HashSet};

use crate::consts::{
    BORDER_THRESHOLD_PX, BOX_PADDING_PX, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH,
    ERASER_RADIUS_PX, HIT_THRESHOLD_PX, PATH_SAMPLE_MIN_DIST_PX,
};
use crate::geom::{
    Point, Rect, bounding_box, distance, eraser_collision, hit_test, point_on_box_border,
    selection_box_collision,
};
use crate::object::{LineData, ObjectData, ObjectId, PathData, PathPoint, SceneObject};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw a straight line segment.
    Line,
    /// Draw a freehand path.
    Path,
    /// Erase objects under a circular cursor.
    Eraser,
}

/// Mutations and notifications emitted by the gesture handlers for the
/// engine to execute.
#[derive(Debug, Clone)]
pub enum Action {
    /// Persist a new object with this payload.
    CreateObject { data: ObjectData },
    /// Erase one object.
    DeleteObject { id: ObjectId },
    /// Commit a finished drag: replace each object's data payload.
    CommitDrag { updates: HashMap<ObjectId, ObjectData> },
    /// Transient state changed; the host should schedule a redraw.
    RenderNeeded,
}

/// Ephemeral state of an in-progress selection drag.
///
/// The session owns working copies of the dragged objects; the authoritative
/// store stays untouched until commit. The translation is always recomputed
/// from the original snapshot and the net pointer delta, never from the
/// previous frame's translated position, so N move events and a single move
/// of the same net displacement land on identical coordinates.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Bounding box of the selection at drag start (padding included).
    pub origin_box: Rect,
    /// Pointer position at drag start.
    pub start_pointer: Point,
    /// Offset from the drag anchor to the pointer at drag start.
    pub pointer_offset: Point,
    /// Snapshot of each dragged object's payload at drag start.
    pub originals: HashMap<ObjectId, ObjectData>,
    /// Net pointer displacement since drag start.
    pub delta: (f64, f64),
}

impl DragSession {
    /// The dragged objects' payloads translated by the current delta.
    #[must_use]
    pub fn working_copies(&self) -> HashMap<ObjectId, ObjectData> {
        let (dx, dy) = self.delta;
        self.originals
            .iter()
            .map(|(id, data)| (*id, data.translated(dx, dy)))
            .collect()
    }

    /// Ids of the objects inside this session.
    #[must_use]
    pub fn dragged_ids(&self) -> HashSet<ObjectId> {
        self.originals.keys().copied().collect()
    }
}

/// The active gesture being tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A line is being drawn from `start` to the live `current` endpoint.
    DrawingLine { start: Point, current: Point },
    /// A freehand path is being sampled.
    DrawingPath { points: Vec<Point> },
    /// A selection is being dragged.
    Dragging(DragSession),
    /// A rubber-band rectangle is being grown from `anchor`.
    BoxSelecting { anchor: Point, current: Point },
}

/// The full interaction state: active tool, selection, gesture, and the
/// stroke style applied to newly drawn objects.
#[derive(Debug, Clone)]
pub struct InteractionState {
    /// Currently active tool.
    pub tool: Tool,
    /// Selected object ids; only meaningful while `tool == Select`.
    pub selection: HashSet<ObjectId>,
    /// The gesture in progress, if any.
    pub gesture: Gesture,
    /// Last known pointer position, used for the eraser cursor preview.
    pub pointer: Option<Point>,
    /// Stroke color for new objects, as a CSS color string.
    pub stroke_color: String,
    /// Stroke width for new objects, in pixels.
    pub stroke_width: f64,
    /// Radius of the eraser circle, in pixels.
    pub eraser_radius: f64,
    /// Ids already erased during the current eraser stroke, so one object
    /// never receives two delete calls from a single stroke.
    erased_this_stroke: HashSet<ObjectId>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            selection: HashSet::new(),
            gesture: Gesture::Idle,
            pointer: None,
            stroke_color: DEFAULT_STROKE_COLOR.to_owned(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            eraser_radius: ERASER_RADIUS_PX,
            erased_this_stroke: HashSet::new(),
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the active tool, clearing the selection and cancelling any
    /// gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.tool = tool;
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.erased_this_stroke.clear();
    }

    /// Ids currently inside an active drag session. The reconciler must not
    /// overwrite these with polled server state.
    #[must_use]
    pub fn dragged_ids(&self) -> HashSet<ObjectId> {
        match &self.gesture {
            Gesture::Dragging(session) => session.dragged_ids(),
            _ => HashSet::new(),
        }
    }

    /// Handle pointer-down at `pos` over the given object snapshot.
    pub fn pointer_down(&mut self, pos: Point, objects: &[SceneObject]) -> Vec<Action> {
        self.pointer = Some(pos);
        match self.tool {
            Tool::Line => {
                self.gesture = Gesture::DrawingLine { start: pos, current: pos };
                vec![Action::RenderNeeded]
            }
            Tool::Path => {
                self.gesture = Gesture::DrawingPath { points: vec![pos] };
                vec![Action::RenderNeeded]
            }
            Tool::Eraser => {
                self.erased_this_stroke.clear();
                vec![Action::RenderNeeded]
            }
            Tool::Select => self.select_pointer_down(pos, objects),
        }
    }

    /// Handle pointer-move to `pos` over the given object snapshot.
    pub fn pointer_move(&mut self, pos: Point, objects: &[SceneObject]) -> Vec<Action> {
        self.pointer = Some(pos);

        if self.tool == Tool::Eraser {
            return self.erase_at(pos, objects);
        }

        match &mut self.gesture {
            Gesture::DrawingLine { current, .. } => {
                *current = pos;
                vec![Action::RenderNeeded]
            }
            Gesture::DrawingPath { points } => {
                let far_enough = points
                    .last()
                    .is_none_or(|last| distance(*last, pos) >= PATH_SAMPLE_MIN_DIST_PX);
                if far_enough {
                    points.push(pos);
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Gesture::Dragging(session) => {
                session.delta = (pos.x - session.start_pointer.x, pos.y - session.start_pointer.y);
                vec![Action::RenderNeeded]
            }
            Gesture::BoxSelecting { current, .. } => {
                *current = pos;
                vec![Action::RenderNeeded]
            }
            Gesture::Idle => Vec::new(),
        }
    }

    /// Handle pointer-up at `pos` over the given object snapshot.
    pub fn pointer_up(&mut self, pos: Point, objects: &[SceneObject]) -> Vec<Action> {
        self.pointer = Some(pos);

        if self.tool == Tool::Eraser {
            self.erased_this_stroke.clear();
            return Vec::new();
        }

        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => Vec::new(),
            Gesture::DrawingLine { start, .. } => {
                let data = ObjectData::Line(LineData {
                    x1: start.x,
                    y1: start.y,
                    x2: pos.x,
                    y2: pos.y,
                    color: self.stroke_color.clone(),
                    stroke_width: self.stroke_width,
                });
                vec![Action::CreateObject { data }, Action::RenderNeeded]
            }
            Gesture::DrawingPath { mut points } => {
                let far_enough = points
                    .last()
                    .is_none_or(|last| distance(*last, pos) >= PATH_SAMPLE_MIN_DIST_PX);
                if far_enough {
                    points.push(pos);
                }
                if points.len() < 2 {
                    // Too short to be a stroke; discard silently.
                    return vec![Action::RenderNeeded];
                }
                let data = ObjectData::Path(PathData {
                    points: points.iter().map(|p| PathPoint { x: p.x, y: p.y }).collect(),
                    color: self.stroke_color.clone(),
                    stroke_width: self.stroke_width,
                });
                vec![Action::CreateObject { data }, Action::RenderNeeded]
            }
            Gesture::Dragging(mut session) => {
                session.delta = (pos.x - session.start_pointer.x, pos.y - session.start_pointer.y);
                let updates = session.working_copies();
                vec![Action::CommitDrag { updates }, Action::RenderNeeded]
            }
            Gesture::BoxSelecting { anchor, .. } => {
                let rect = Rect::from_corners(anchor, pos);
                self.selection = objects
                    .iter()
                    .filter(|obj| selection_box_collision(rect, obj))
                    .map(|obj| obj.id)
                    .collect();
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Handle the pointer leaving the canvas: cancel everything in progress
    /// without committing.
    pub fn pointer_leave(&mut self) -> Vec<Action> {
        self.pointer = None;
        self.erased_this_stroke.clear();
        self.gesture = Gesture::Idle;
        vec![Action::RenderNeeded]
    }

    /// Decide the select-tool sub-interaction at pointer-down: border-drag,
    /// object-drag, or box-select — in that priority order.
    fn select_pointer_down(&mut self, pos: Point, objects: &[SceneObject]) -> Vec<Action> {
        if !self.selection.is_empty() {
            if let Some(bbox) = bounding_box(objects, &self.selection, BOX_PADDING_PX) {
                if point_on_box_border(pos, bbox, BORDER_THRESHOLD_PX) {
                    let center = bbox.center();
                    self.start_drag(pos, center, bbox, objects);
                    return vec![Action::RenderNeeded];
                }
            }
        }

        if let Some(hit) = hit_test(pos, objects, HIT_THRESHOLD_PX) {
            let id = hit.id;
            let (ax, ay) = hit.data.first_point();
            if !self.selection.contains(&id) {
                self.selection.clear();
                self.selection.insert(id);
            }
            if let Some(bbox) = bounding_box(objects, &self.selection, BOX_PADDING_PX) {
                self.start_drag(pos, Point::new(ax, ay), bbox, objects);
            }
            return vec![Action::RenderNeeded];
        }

        self.selection.clear();
        self.gesture = Gesture::BoxSelecting { anchor: pos, current: pos };
        vec![Action::RenderNeeded]
    }

    fn start_drag(&mut self, pos: Point, anchor: Point, bbox: Rect, objects: &[SceneObject]) {
        let originals: HashMap<ObjectId, ObjectData> = objects
            .iter()
            .filter(|obj| self.selection.contains(&obj.id))
            .map(|obj| (obj.id, obj.data.clone()))
            .collect();
        self.gesture = Gesture::Dragging(DragSession {
            origin_box: bbox,
            start_pointer: pos,
            pointer_offset: Point::new(pos.x - anchor.x, pos.y - anchor.y),
            originals,
            delta: (0.0, 0.0),
        });
    }

    /// Test every object not yet erased this stroke against the eraser
    /// circle and emit one delete per newly-hit object.
    fn erase_at(&mut self, pos: Point, objects: &[SceneObject]) -> Vec<Action> {
        let mut actions = Vec::new();
        for obj in objects {
            if self.erased_this_stroke.contains(&obj.id) {
                continue;
            }
            if eraser_collision(pos, self.eraser_radius, obj) {
                self.erased_this_stroke.insert(obj.id);
                actions.push(Action::DeleteObject { id: obj.id });
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }
}
