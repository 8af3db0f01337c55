//! Object model: drawable primitives, their wire representation, and the
//! decode boundary between the two.
//!
//! The server stores each object's shape payload as a JSON-encoded string
//! inside the wire envelope ([`WireObject::data`]). That string is decoded
//! exactly once, at the store boundary, into the tagged [`ObjectData`] union;
//! downstream code (hit-testing, rendering, drag translation) only ever sees
//! decoded values. A malformed payload yields [`DecodeError`] and the caller
//! skips that one object — a corrupt row never aborts processing of the rest.

#[cfg(test)]
#[path = "object_test.rs"]
mod object_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a canvas object. Assigned by the server on
/// creation; the client never mints ids for persisted objects.
pub type ObjectId = Uuid;

/// The kind of a canvas object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Straight line segment between two endpoints.
    Line,
    /// Freehand polyline of sampled points.
    Path,
}

/// Shape payload for a [`ObjectKind::Line`] object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineData {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

/// A single sampled point of a freehand path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

/// Shape payload for a [`ObjectKind::Path`] object.
///
/// The point list is append-only during authoring and holds at least two
/// points once finalized; after persistence it only ever changes by whole
/// translation (drag-commit), never by re-shaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathData {
    pub points: Vec<PathPoint>,
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub stroke_width: f64,
}

/// Decoded shape payload, tagged by object kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectData {
    Line(LineData),
    Path(PathData),
}

/// Error raised when a wire object's `data` string cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The `type` field names a kind this client does not know.
    #[error("unknown object type: {0}")]
    UnknownKind(String),
    /// The `data` string is not valid JSON for the declared kind.
    #[error("malformed object data: {0}")]
    MalformedData(#[from] serde_json::Error),
}

impl ObjectData {
    /// The kind tag matching this payload.
    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Line(_) => ObjectKind::Line,
            Self::Path(_) => ObjectKind::Path,
        }
    }

    /// Decode a wire `data` string for the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedData`] if the string is not valid
    /// JSON for the kind's payload shape.
    pub fn decode(kind: ObjectKind, data: &str) -> Result<Self, DecodeError> {
        match kind {
            ObjectKind::Line => Ok(Self::Line(serde_json::from_str(data)?)),
            ObjectKind::Path => Ok(Self::Path(serde_json::from_str(data)?)),
        }
    }

    /// Encode this payload back into the wire's JSON string form.
    #[must_use]
    pub fn encode(&self) -> String {
        let result = match self {
            Self::Line(line) => serde_json::to_string(line),
            Self::Path(path) => serde_json::to_string(path),
        };
        // Serializing plain numeric/string fields cannot fail.
        result.unwrap_or_default()
    }

    /// A copy of this payload translated by `(dx, dy)`.
    ///
    /// Translation is the only geometry-changing edit a persisted object
    /// supports; drag working copies are produced with this.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        match self {
            Self::Line(line) => Self::Line(LineData {
                x1: line.x1 + dx,
                y1: line.y1 + dy,
                x2: line.x2 + dx,
                y2: line.y2 + dy,
                color: line.color.clone(),
                stroke_width: line.stroke_width,
            }),
            Self::Path(path) => Self::Path(PathData {
                points: path
                    .points
                    .iter()
                    .map(|p| PathPoint { x: p.x + dx, y: p.y + dy })
                    .collect(),
                color: path.color.clone(),
                stroke_width: path.stroke_width,
            }),
        }
    }

    /// The first authored coordinate of this shape: a line's first endpoint
    /// or a path's first sample. Used as the drag anchor for object-drag.
    #[must_use]
    pub fn first_point(&self) -> (f64, f64) {
        match self {
            Self::Line(line) => (line.x1, line.y1),
            Self::Path(path) => path
                .points
                .first()
                .map_or((0.0, 0.0), |p| (p.x, p.y)),
        }
    }
}

/// A canvas object as it travels on the wire.
///
/// `data` is the shape payload as a JSON-encoded string; see
/// [`SceneObject::decode`] for the one place it is parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireObject {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub object_type: String,
    pub data: String,
    pub created_at: String,
}

/// A fully-decoded canvas object held in the local store.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub data: ObjectData,
    pub created_at: String,
}

impl SceneObject {
    /// Decode a wire object into its in-memory form.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownKind`] for a `type` this client does
    /// not handle and [`DecodeError::MalformedData`] for an unparseable
    /// `data` string.
    pub fn decode(wire: &WireObject) -> Result<Self, DecodeError> {
        let kind = match wire.object_type.as_str() {
            "line" => ObjectKind::Line,
            "path" => ObjectKind::Path,
            other => return Err(DecodeError::UnknownKind(other.to_owned())),
        };
        let data = ObjectData::decode(kind, &wire.data)?;
        Ok(Self {
            id: wire.id,
            kind,
            data,
            created_at: wire.created_at.clone(),
        })
    }
}

impl ObjectKind {
    /// The wire `type` string for this kind.
    #[must_use]
    pub fn as_wire_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Path => "path",
        }
    }
}
