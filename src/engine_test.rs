#![allow(clippy::float_cmp)]

use std::time::Duration;

use super::*;
use crate::consts::SYNC_PERIOD;
use crate::object::{ObjectData, SceneObject};
use crate::testutil::{MockApi, line_data, wire_from};

fn engine_with(api: &MockApi) -> CanvasEngine<MockApi> {
    CanvasEngine::new(api.clone(), Uuid::new_v4())
}

fn line_coords(obj: &SceneObject) -> (f64, f64, f64, f64) {
    match &obj.data {
        ObjectData::Line(line) => (line.x1, line.y1, line.x2, line.y2),
        ObjectData::Path(_) => panic!("expected a line"),
    }
}

// =============================================================
// Drawing
// =============================================================

#[tokio::test]
async fn drawing_a_line_persists_it_with_the_chosen_style() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);
    engine.set_tool(Tool::Line);
    engine.set_stroke_color("#ff0000");

    assert!(engine.pointer_down(Point::new(10.0, 10.0)).await);
    engine.pointer_move(Point::new(30.0, 30.0)).await;
    assert!(engine.pointer_up(Point::new(50.0, 50.0)).await);

    let state = api.state();
    assert_eq!(state.objects.len(), 1);
    drop(state);
    assert_eq!(engine.store().len(), 1);
    assert_eq!(line_coords(&engine.store().objects()[0]), (10.0, 10.0, 50.0, 50.0));
    match &engine.store().objects()[0].data {
        ObjectData::Line(line) => assert_eq!(line.color, "#ff0000"),
        ObjectData::Path(_) => panic!("expected a line"),
    }
}

#[tokio::test]
async fn failed_save_leaves_the_canvas_unchanged() {
    let api = MockApi::new();
    api.state().fail_create = true;
    let mut engine = engine_with(&api);
    engine.set_tool(Tool::Line);

    engine.pointer_down(Point::new(0.0, 0.0)).await;
    let redraw = engine.pointer_up(Point::new(10.0, 10.0)).await;

    // The stroke disappears but the engine still asks for a repaint.
    assert!(redraw);
    assert!(engine.store().is_empty());
}

#[tokio::test]
async fn pointer_leave_discards_the_stroke_without_a_save() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);
    engine.set_tool(Tool::Line);

    engine.pointer_down(Point::new(0.0, 0.0)).await;
    engine.pointer_move(Point::new(10.0, 10.0)).await;
    assert!(engine.pointer_leave());

    assert_eq!(api.state().create_calls, 0);
    assert!(engine.store().is_empty());
}

// =============================================================
// Erasing
// =============================================================

#[tokio::test]
async fn eraser_stroke_deletes_remotely_once() {
    let api = MockApi::new();
    api.seed(vec![wire_from(&line_data(0.0, 0.0, 100.0, 0.0))]);
    let mut engine = engine_with(&api);
    engine.load().await.unwrap();
    engine.set_tool(Tool::Eraser);
    // Widened radius: the stroke passes 12px above the line.
    engine.set_eraser_radius(15.0);

    engine.pointer_down(Point::new(50.0, 12.0)).await;
    engine.pointer_move(Point::new(50.0, 12.0)).await;
    engine.pointer_move(Point::new(52.0, 12.0)).await;
    engine.pointer_up(Point::new(52.0, 12.0)).await;

    assert_eq!(api.state().delete_calls.len(), 1);
    assert!(engine.store().is_empty());
    assert!(api.state().objects.is_empty());
}

// =============================================================
// Dragging
// =============================================================

#[tokio::test]
async fn drag_commits_translated_coordinates_for_each_member() {
    let api = MockApi::new();
    let a = wire_from(&line_data(0.0, 0.0, 10.0, 10.0));
    let b = wire_from(&line_data(20.0, 20.0, 30.0, 30.0));
    api.seed(vec![a.clone(), b.clone()]);
    let mut engine = engine_with(&api);
    engine.load().await.unwrap();

    // Rubber-band both objects, then grab the first and drag by (30, -10).
    engine.pointer_down(Point::new(-10.0, -10.0)).await;
    engine.pointer_up(Point::new(40.0, 40.0)).await;
    assert_eq!(engine.input().selection.len(), 2);

    engine.pointer_down(Point::new(5.0, 5.0)).await;
    engine.pointer_move(Point::new(20.0, 0.0)).await;
    engine.pointer_up(Point::new(35.0, -5.0)).await;

    assert_eq!(api.state().update_calls.len(), 2);
    assert_eq!(line_coords(engine.store().get(a.id).unwrap()), (30.0, -10.0, 40.0, 0.0));
    assert_eq!(line_coords(engine.store().get(b.id).unwrap()), (50.0, 10.0, 60.0, 20.0));
}

#[tokio::test]
async fn poll_during_a_drag_keeps_the_dragged_object_local() {
    let api = MockApi::new();
    let a = wire_from(&line_data(0.0, 0.0, 10.0, 10.0));
    api.seed(vec![a.clone()]);
    let mut engine = engine_with(&api);
    engine.load().await.unwrap();

    engine.pointer_down(Point::new(5.0, 5.0)).await;
    engine.pointer_move(Point::new(50.0, 50.0)).await;

    // Another client moves the object and adds a second one mid-drag.
    let mut moved = a.clone();
    moved.data = line_data(900.0, 900.0, 910.0, 910.0).encode();
    let b = wire_from(&line_data(20.0, 20.0, 30.0, 30.0));
    api.seed(vec![moved, b.clone()]);

    assert!(engine.poll_once().await.unwrap());

    // The drag target kept its pre-drag payload; the new object arrived.
    assert_eq!(line_coords(engine.store().get(a.id).unwrap()), (0.0, 0.0, 10.0, 10.0));
    assert!(engine.store().get(b.id).is_some());
}

// =============================================================
// Undo / redo
// =============================================================

#[tokio::test]
async fn undo_on_an_empty_canvas_never_reaches_the_server() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);

    engine.undo().await.unwrap();

    assert_eq!(api.state().undo_calls, 0);
}

#[tokio::test]
async fn undo_then_poll_removes_the_last_object() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);
    engine.set_tool(Tool::Line);
    engine.pointer_down(Point::new(0.0, 0.0)).await;
    engine.pointer_up(Point::new(10.0, 10.0)).await;

    engine.undo().await.unwrap();
    assert_eq!(api.state().undo_calls, 1);
    // Undo leaves the local list to the poll.
    assert_eq!(engine.store().len(), 1);

    assert!(engine.poll_once().await.unwrap());
    assert!(engine.store().is_empty());
}

#[tokio::test]
async fn redo_after_undo_restores_via_the_next_poll() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);
    engine.set_tool(Tool::Line);
    engine.pointer_down(Point::new(0.0, 0.0)).await;
    engine.pointer_up(Point::new(10.0, 10.0)).await;
    engine.undo().await.unwrap();
    engine.poll_once().await.unwrap();

    engine.redo().await.unwrap();
    assert!(engine.poll_once().await.unwrap());

    assert_eq!(engine.store().len(), 1);
}

#[tokio::test]
async fn redo_with_nothing_to_restore_is_not_an_error() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);

    engine.redo().await.unwrap();

    assert_eq!(api.state().redo_calls, 1);
}

// =============================================================
// Sync
// =============================================================

#[tokio::test]
async fn load_pulls_the_existing_room_contents() {
    let api = MockApi::new();
    api.seed(vec![
        wire_from(&line_data(0.0, 0.0, 10.0, 10.0)),
        wire_from(&line_data(20.0, 20.0, 30.0, 30.0)),
    ]);
    let mut engine = engine_with(&api);

    assert!(engine.load().await.unwrap());
    assert_eq!(engine.store().len(), 2);
}

#[tokio::test]
async fn quiet_polls_report_no_change() {
    let api = MockApi::new();
    api.seed(vec![wire_from(&line_data(0.0, 0.0, 10.0, 10.0))]);
    let mut engine = engine_with(&api);

    assert!(engine.load().await.unwrap());
    assert!(!engine.poll_once().await.unwrap());
    assert!(!engine.poll_once().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn sync_loop_waits_a_full_period_before_its_first_poll() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);
    engine.load().await.unwrap();
    assert_eq!(api.state().list_calls, 1);

    // Just short of one period: the loop must not have polled again.
    tokio::select! {
        () = engine.run_sync() => {}
        () = tokio::time::sleep(SYNC_PERIOD - Duration::from_millis(100)) => {}
    }
    assert_eq!(api.state().list_calls, 1);

    // A fresh loop run crosses one full period and polls exactly once.
    tokio::select! {
        () = engine.run_sync() => {}
        () = tokio::time::sleep(SYNC_PERIOD + Duration::from_millis(100)) => {}
    }
    assert_eq!(api.state().list_calls, 2);
}

#[tokio::test]
async fn poll_picks_up_remote_additions() {
    let api = MockApi::new();
    let mut engine = engine_with(&api);
    engine.load().await.unwrap();

    api.seed(vec![wire_from(&line_data(0.0, 0.0, 10.0, 10.0))]);

    assert!(engine.poll_once().await.unwrap());
    assert_eq!(engine.store().len(), 1);
}
