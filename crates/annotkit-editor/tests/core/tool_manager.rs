use annotkit_core::{
    DocumentEvent, EditorEvent, EventCategory, EventFilter, Point, Rect,
};
use annotkit_editor::{
    Annotation, AnnotationType, DocumentModel, EditState, EditorOptions, GestureEvent,
    MemoryDocument, PlatformRequest, ToolManager,
};
use std::sync::{Arc, Mutex};

use crate::fixtures::{add, doc_with, page, rect_of};

fn manager(doc: MemoryDocument) -> ToolManager<MemoryDocument> {
    ToolManager::new(doc, EditorOptions::default(), 50)
}

#[test]
fn test_drag_handle_then_undo_redo() {
    let original = Rect::new(10.0, 10.0, 100.0, 50.0);
    let (doc, id) = doc_with(AnnotationType::Square, original);
    let mut tools = manager(doc);
    assert!(tools.select_annotation(id, 1));

    assert!(tools.handle_gesture(GestureEvent::Began(Point::new(110.0, 60.0))));
    assert!(!tools.undo_coordinator().is_enabled());
    tools.handle_gesture(GestureEvent::Changed(Point::new(180.0, 120.0)));
    assert!(tools.handle_gesture(GestureEvent::Ended(Point::new(251.0, 251.0))));
    assert!(tools.undo_coordinator().is_enabled());

    let resized = Rect::new(10.0, 10.0, 190.0, 190.0);
    assert_eq!(rect_of(tools.document(), id), resized);
    assert_eq!(tools.controller().state(), EditState::Selected);
    assert_eq!(tools.controller().handle_layout().map(|l| l.frame), Some(resized));

    assert_eq!(tools.undo(), Some("Resize annotation".to_string()));
    assert_eq!(rect_of(tools.document(), id), original);
    assert_eq!(tools.controller().selection_frame(tools.document()), Some(original));

    assert_eq!(tools.redo(), Some("Resize annotation".to_string()));
    assert_eq!(rect_of(tools.document(), id), resized);
}

#[test]
fn test_drag_body_moves() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(40.0, 40.0, 40.0, 40.0));
    let mut tools = manager(doc);
    tools.select_annotation(id, 1);

    assert!(tools.handle_gesture(GestureEvent::Began(Point::new(60.0, 60.0))));
    tools.handle_gesture(GestureEvent::Ended(Point::new(70.0, 50.0)));
    assert_eq!(rect_of(tools.document(), id), Rect::new(50.0, 30.0, 40.0, 40.0));
}

#[test]
fn test_drag_outside_selection_does_nothing() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 20.0, 20.0));
    let mut tools = manager(doc);
    tools.select_annotation(id, 1);
    assert!(!tools.handle_gesture(GestureEvent::Began(Point::new(150.0, 150.0))));
    assert!(!tools.handle_gesture(GestureEvent::Ended(Point::new(160.0, 160.0))));
    assert!(!tools.undo_coordinator().can_undo());
}

#[test]
fn test_tap_selects_topmost() {
    let (mut doc, bottom) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 100.0, 100.0));
    let top = add(&mut doc, AnnotationType::Circle, Rect::new(40.0, 40.0, 20.0, 20.0));
    let mut tools = manager(doc);

    assert!(tools.handle_gesture(GestureEvent::Tap {
        page: 1,
        point: Point::new(50.0, 50.0)
    }));
    assert_eq!(tools.controller().selection().iter().next().map(|r| r.id), Some(top));

    assert!(tools.handle_gesture(GestureEvent::Tap {
        page: 1,
        point: Point::new(20.0, 20.0)
    }));
    assert_eq!(tools.controller().selection().iter().next().map(|r| r.id), Some(bottom));

    assert!(!tools.handle_gesture(GestureEvent::Tap {
        page: 1,
        point: Point::new(190.0, 190.0)
    }));
    assert_eq!(tools.controller().state(), EditState::Idle);
}

#[test]
fn test_cancelled_gesture_restores_nothing_to_undo() {
    let original = Rect::new(10.0, 10.0, 50.0, 50.0);
    let (doc, id) = doc_with(AnnotationType::Square, original);
    let mut tools = manager(doc);
    tools.select_annotation(id, 1);
    tools.handle_gesture(GestureEvent::Began(Point::new(30.0, 30.0)));
    tools.handle_gesture(GestureEvent::Changed(Point::new(90.0, 90.0)));
    assert!(tools.handle_gesture(GestureEvent::Cancelled));

    assert_eq!(rect_of(tools.document(), id), original);
    assert!(tools.undo_coordinator().is_enabled());
    assert!(!tools.undo_coordinator().can_undo());
}

#[test]
fn test_undo_ignored_mid_drag() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let mut tools = manager(doc);
    tools.select_annotation(id, 1);
    tools.set_annotation_opacity(0.5);

    tools.handle_gesture(GestureEvent::Began(Point::new(30.0, 30.0)));
    assert_eq!(tools.handle_platform_request(PlatformRequest::Undo), None);
    tools.handle_gesture(GestureEvent::Cancelled);
    assert_eq!(
        tools.handle_platform_request(PlatformRequest::Undo),
        Some("Change opacity".to_string())
    );
    assert_eq!(
        tools.handle_platform_request(PlatformRequest::Redo),
        Some("Change opacity".to_string())
    );
}

#[test]
fn test_rotation_gesture() {
    let (doc, id) = doc_with(AnnotationType::FreeText, Rect::new(50.0, 50.0, 100.0, 100.0));
    let mut tools = manager(doc);
    tools.select_annotation(id, 1);
    assert!(tools.handle_gesture(GestureEvent::RotationBegan(Point::new(150.0, 100.0))));
    tools.handle_gesture(GestureEvent::Ended(Point::new(100.0, 50.0)));

    let rotation = tools.document().annotation(id, 1).expect("annotation").rotation;
    assert!((rotation - 270.0).abs() < 1e-9);
}

#[test]
fn test_add_and_remove_annotation_are_undoable() {
    let mut tools = manager(MemoryDocument::with_pages(1, page()));
    let ink = Annotation::new(AnnotationType::Ink, 1, Rect::new(5.0, 5.0, 30.0, 30.0));
    let id = ink.id;

    tools.add_annotation(ink).expect("add");
    tools.select_annotation(id, 1);
    tools.remove_annotation(id, 1).expect("remove");
    assert!(tools.controller().selection().is_empty());
    assert!(tools.document().annotations_on_page(1).is_empty());

    assert_eq!(tools.undo(), Some("Delete Ink".to_string()));
    assert!(tools.document().annotation(id, 1).is_some());
    assert_eq!(tools.undo(), Some("Add Ink".to_string()));
    assert!(tools.document().annotation(id, 1).is_none());
}

#[test]
fn test_failed_change_leaves_no_entry() {
    let mut tools = manager(MemoryDocument::with_pages(1, page()));
    let stray = Annotation::new(AnnotationType::Ink, 4, Rect::new(5.0, 5.0, 30.0, 30.0));
    assert!(tools.add_annotation(stray).is_err());
    assert!(tools.move_page(1, 3).is_err());
    assert!(!tools.undo_coordinator().can_undo());
}

#[test]
fn test_page_operations_are_undoable() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 20.0, 20.0));
    let mut tools = manager(doc);

    tools.insert_page(1, Rect::new(0.0, 0.0, 300.0, 300.0)).expect("insert");
    assert_eq!(tools.document().page_count(), 2);
    assert!(tools.document().annotation(id, 2).is_some());

    tools.move_page(2, 1).expect("move");
    assert!(tools.document().annotation(id, 1).is_some());

    tools.remove_page(2).expect("remove");
    assert_eq!(tools.document().page_count(), 1);

    tools.modify_page_content(1).expect("touch");
    assert_eq!(tools.document().pages()[0].content_revision, 1);

    assert_eq!(tools.undo(), Some("Edit page 1".to_string()));
    assert_eq!(tools.undo(), Some("Delete page 2".to_string()));
    assert_eq!(tools.undo(), Some("Move page 2 to 1".to_string()));
    assert_eq!(tools.undo(), Some("Add page 1".to_string()));
    assert_eq!(tools.document().page_count(), 1);
    assert_eq!(rect_of(tools.document(), id), Rect::new(10.0, 10.0, 20.0, 20.0));
}

#[test]
fn test_form_field_fill_is_undoable() {
    let (doc, field) = doc_with(AnnotationType::Widget, Rect::new(10.0, 10.0, 80.0, 20.0));
    let mut tools = manager(doc);
    tools.set_form_field_value(field, 1, "Jane").expect("fill");
    assert_eq!(
        tools.document().annotation(field, 1).and_then(|a| a.contents),
        Some("Jane".to_string())
    );
    tools.undo();
    assert_eq!(tools.document().annotation(field, 1).and_then(|a| a.contents), None);
}

#[test]
fn test_commit_signals_changed_region() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 20.0, 20.0));
    let mut tools = manager(doc);
    let regions = Arc::new(Mutex::new(Vec::new()));
    let sink = regions.clone();
    tools.bus().subscribe(
        EventFilter::Categories(vec![EventCategory::Document]),
        move |event| {
            if let EditorEvent::Document(DocumentEvent::RegionChanged { page, rect }) = event {
                sink.lock().expect("lock").push((page, rect));
            }
        },
    );

    tools.select_annotation(id, 1);
    tools.handle_gesture(GestureEvent::Began(Point::new(20.0, 20.0)));
    tools.handle_gesture(GestureEvent::Ended(Point::new(30.0, 20.0)));

    let regions = regions.lock().expect("lock");
    assert_eq!(regions.as_slice(), [(1, Rect::new(10.0, 10.0, 30.0, 20.0))]);
}

#[test]
fn test_large_handles_are_easier_to_grab() {
    let original = Rect::new(10.0, 10.0, 100.0, 50.0);
    let (doc, id) = doc_with(AnnotationType::Square, original);
    let mut tools = manager(doc.clone());
    tools.select_annotation(id, 1);
    assert!(!tools.handle_gesture(GestureEvent::Began(Point::new(122.0, 60.0))));

    let options = EditorOptions {
        handle_size: 30.0,
        ..EditorOptions::default()
    };
    let mut tools = ToolManager::new(doc, options, 50);
    tools.select_annotation(id, 1);
    assert!(tools.handle_gesture(GestureEvent::Began(Point::new(122.0, 60.0))));
    tools.handle_gesture(GestureEvent::Ended(Point::new(132.0, 60.0)));
    assert_eq!(rect_of(tools.document(), id), Rect::new(10.0, 10.0, 110.0, 50.0));
}
