//! End-to-end whiteboard sessions over real storage backends.

use inkboard_core::storage::{DRAWINGS_KEY, MemoryStorage, Storage};
use inkboard_core::{
    AlwaysConfirm, Drawing, FileStorage, PointerEvent, SaveKind, ToolKind, Whiteboard, WhiteboardConfig,
};
use std::sync::Arc;

fn config() -> WhiteboardConfig {
    WhiteboardConfig {
        width: 200,
        height: 120,
        ..WhiteboardConfig::default()
    }
}

fn draw_rectangle(board: &mut Whiteboard<impl Storage>, from: (f64, f64), to: (f64, f64)) {
    board.set_tool(ToolKind::Rectangle);
    board.pointer(PointerEvent::down(from.0, from.1));
    board.pointer(PointerEvent::moved((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
    board.pointer(PointerEvent::moved(to.0, to.1));
    board.pointer(PointerEvent::up(to.0, to.1));
}

fn stored_drawings(storage: &impl Storage) -> Vec<Drawing> {
    let json = storage.get(DRAWINGS_KEY).unwrap().unwrap_or_else(|| "[]".to_string());
    serde_json::from_str(&json).unwrap()
}

#[test]
fn test_save_list_edit_delete() {
    let storage = Arc::new(MemoryStorage::new());
    let mut board = Whiteboard::new(config(), Arc::clone(&storage)).unwrap();

    draw_rectangle(&mut board, (10.0, 10.0), (100.0, 60.0));
    let created = board.save().unwrap();
    assert_eq!(created.kind, SaveKind::Created);
    assert!(created.persisted);

    let listed: Vec<_> = board.drawings().map(|e| (e.id, e.data.to_string())).collect();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0, created.id);
    assert!(listed[0].1.starts_with("data:image/png;base64,"));
    let original_data = listed[0].1.clone();

    assert!(board.edit_drawing(created.id));
    let pixels_after_load = board.surface().data().to_vec();
    draw_rectangle(&mut board, (120.0, 20.0), (180.0, 100.0));
    assert_ne!(board.surface().data(), &pixels_after_load[..]);

    let updated = board.save().unwrap();
    assert_eq!(updated.kind, SaveKind::Updated);
    assert_eq!(updated.id, created.id);

    let persisted = stored_drawings(&*storage);
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].id, created.id);
    assert_ne!(persisted[0].data, original_data);

    assert!(!board.delete_drawing(created.id + 1, &mut AlwaysConfirm));
    assert_eq!(stored_drawings(&*storage).len(), 1);

    assert!(board.delete_drawing(created.id, &mut AlwaysConfirm));
    assert!(stored_drawings(&*storage).is_empty());
    assert_eq!(board.drawings().count(), 0);
}

#[test]
fn test_save_then_edit_restores_pixels() {
    let mut board = Whiteboard::new(config(), MemoryStorage::new()).unwrap();
    board.set_tool(ToolKind::Pen);
    board.pointer(PointerEvent::down(20.0, 20.0));
    board.pointer(PointerEvent::moved(60.0, 40.0));
    board.pointer(PointerEvent::moved(90.0, 90.0));
    board.pointer(PointerEvent::up(90.0, 90.0));
    let drawn = board.surface().data().to_vec();

    let id = board.save().unwrap().id;
    board.new_drawing();
    assert!(board.surface().is_blank());

    assert!(board.edit_drawing(id));
    assert_eq!(board.surface().data(), &drawn[..]);
}

#[test]
fn test_quota_failure_keeps_drawing_in_memory() {
    let storage = Arc::new(MemoryStorage::with_quota(64));
    let mut board = Whiteboard::new(config(), Arc::clone(&storage)).unwrap();
    draw_rectangle(&mut board, (10.0, 10.0), (100.0, 60.0));

    let report = board.save().unwrap();
    assert!(!report.persisted);
    assert!(storage.get(DRAWINGS_KEY).unwrap().is_none());

    assert_eq!(board.drawings().count(), 1);
    assert!(board.store().get(report.id).is_some());
}

#[test]
fn test_file_storage_session_restart() {
    let dir = tempfile::tempdir().unwrap();
    let first_id = {
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let mut board = Whiteboard::new(config(), storage).unwrap();
        draw_rectangle(&mut board, (10.0, 10.0), (100.0, 60.0));
        board.toggle_theme();
        board.save().unwrap().id
    };

    let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
    let mut board = Whiteboard::new(config(), storage).unwrap();
    assert!(board.theme().is_dark());
    assert_eq!(board.store().len(), 1);

    draw_rectangle(&mut board, (30.0, 30.0), (60.0, 60.0));
    let second_id = board.save().unwrap().id;
    assert!(second_id > first_id);
    assert_eq!(board.drawings().count(), 2);
}

#[test]
fn test_zoom_round_trip() {
    let mut board = Whiteboard::new(config(), MemoryStorage::new()).unwrap();
    let note = board.add_sticky_note().unwrap();
    let text_box = board.add_text_box().unwrap();
    let before = [
        board.overlay_screen_rect(note).unwrap(),
        board.overlay_screen_rect(text_box).unwrap(),
    ];

    for _ in 0..5 {
        board.zoom_in();
    }
    for _ in 0..5 {
        board.zoom_out();
    }

    let after = [
        board.overlay_screen_rect(note).unwrap(),
        board.overlay_screen_rect(text_box).unwrap(),
    ];
    for (a, b) in before.iter().zip(after.iter()) {
        assert!((a.x0 - b.x0).abs() < 1e-9);
        assert!((a.y0 - b.y0).abs() < 1e-9);
        assert!((a.x1 - b.x1).abs() < 1e-9);
        assert!((a.y1 - b.y1).abs() < 1e-9);
    }
}
