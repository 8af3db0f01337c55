//! Draw-list production: turns store contents plus transient interaction
//! state into an ordered list of drawing commands.
//!
//! This module is pure — it reads a snapshot and produces data; it never
//! mutates anything and has no dependency on a drawing surface. The host
//! rasterizes the returned [`DrawCmd`]s in order: committed objects first
//! (store order, which is server creation order), then the in-progress
//! stroke, then selection chrome and the eraser cursor on top.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use crate::consts::BOX_PADDING_PX;
use crate::geom::{Point, Rect, bounding_box};
use crate::input::{Gesture, InteractionState, Tool};
use crate::object::{ObjectData, SceneObject};

/// One drawing command for the host to rasterize.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Stroke a straight line segment.
    Line { a: Point, b: Point, color: String, width: f64 },
    /// Stroke a polyline through the given points.
    Path { points: Vec<Point>, color: String, width: f64 },
    /// The dashed bounding box around the current selection.
    SelectionBox(Rect),
    /// The rubber-band rectangle of an in-progress box-select.
    RubberBand(Rect),
    /// The eraser cursor circle.
    EraserCursor { center: Point, radius: f64 },
}

/// Produce the full draw list for one frame.
#[must_use]
pub fn draw_list(objects: &[SceneObject], input: &InteractionState) -> Vec<DrawCmd> {
    let working = match &input.gesture {
        Gesture::Dragging(session) => session.working_copies(),
        _ => HashMap::new(),
    };

    let mut out = Vec::with_capacity(objects.len() + 3);

    for obj in objects {
        let data = working.get(&obj.id).unwrap_or(&obj.data);
        out.push(object_cmd(data));
    }

    match &input.gesture {
        Gesture::DrawingLine { start, current } => {
            out.push(DrawCmd::Line {
                a: *start,
                b: *current,
                color: input.stroke_color.clone(),
                width: input.stroke_width,
            });
        }
        Gesture::DrawingPath { points } if points.len() >= 2 => {
            out.push(DrawCmd::Path {
                points: points.clone(),
                color: input.stroke_color.clone(),
                width: input.stroke_width,
            });
        }
        Gesture::BoxSelecting { anchor, current } => {
            out.push(DrawCmd::RubberBand(Rect::from_corners(*anchor, *current)));
        }
        _ => {}
    }

    if input.tool == Tool::Select && !input.selection.is_empty() {
        match &input.gesture {
            Gesture::Dragging(session) => {
                let (dx, dy) = session.delta;
                out.push(DrawCmd::SelectionBox(session.origin_box.translated(dx, dy)));
            }
            Gesture::BoxSelecting { .. } => {}
            _ => {
                if let Some(bbox) = bounding_box(objects, &input.selection, BOX_PADDING_PX) {
                    out.push(DrawCmd::SelectionBox(bbox));
                }
            }
        }
    }

    if input.tool == Tool::Eraser {
        if let Some(center) = input.pointer {
            out.push(DrawCmd::EraserCursor { center, radius: input.eraser_radius });
        }
    }

    out
}

fn object_cmd(data: &ObjectData) -> DrawCmd {
    match data {
        ObjectData::Line(line) => DrawCmd::Line {
            a: Point::new(line.x1, line.y1),
            b: Point::new(line.x2, line.y2),
            color: line.color.clone(),
            width: line.stroke_width,
        },
        ObjectData::Path(path) => DrawCmd::Path {
            points: path.points.iter().map(|p| Point::new(p.x, p.y)).collect(),
            color: path.color.clone(),
            width: path.stroke_width,
        },
    }
}
