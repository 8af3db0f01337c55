//! Client-side canvas engine for the shared drawing room.
//!
//! This crate owns the interactive side of a multi-user canvas: it keeps a
//! local view of the room's drawable objects merged from periodic server
//! polls and locally-originated optimistic edits, interprets pointer input
//! into drawing, selection, dragging, and erasing gestures, and produces a
//! draw list for the host to rasterize. The host layer is responsible only
//! for wiring pointer events into [`engine::CanvasEngine`], driving the sync
//! loop, and painting the returned [`render::DrawCmd`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine composing store, input, and sync |
//! | [`store`] | Local object list and its remote-backed mutations |
//! | [`sync`] | Periodic poll-and-merge reconciliation |
//! | [`input`] | Pointer gesture state machine |
//! | [`geom`] | Hit-testing, bounding boxes, and collision tests |
//! | [`object`] | Object model and wire (de)serialization |
//! | [`render`] | Pure draw-list production |
//! | [`api`] | Remote object operations (trait + HTTP implementation) |
//! | [`consts`] | Shared numeric constants (thresholds, poll period, defaults) |

pub mod api;
pub mod consts;
pub mod engine;
pub mod geom;
pub mod input;
pub mod object;
pub mod render;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testutil;
