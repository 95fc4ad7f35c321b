use annotkit_core::{AnnotationRef, EventBus, Point, Rect};
use annotkit_editor::{
    Annotation, AnnotationEditController, AnnotationType, DocumentModel, EditDelegate, EditState,
    EditorOptions, Handle, MemoryDocument, TransformMode,
};
use std::sync::{Arc, Mutex};

use crate::fixtures::{add, coordinator, doc_with, page, rect_of, FlakyDocument};

fn controller() -> AnnotationEditController {
    AnnotationEditController::new(EditorOptions::default(), Arc::new(EventBus::new()))
}

struct RefuseInk;

impl EditDelegate for RefuseInk {
    fn should_select(&mut self, annotation: &Annotation) -> bool {
        annotation.kind != AnnotationType::Ink
    }
}

#[test]
fn test_select_and_deselect() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 100.0, 50.0));
    let mut ctl = controller();
    assert_eq!(ctl.state(), EditState::Idle);

    assert!(ctl.select_annotation(&doc, id, 1));
    assert_eq!(ctl.state(), EditState::Selected);
    assert_eq!(ctl.selected_annotations(), vec![AnnotationRef::new(id, 1)]);
    assert_eq!(ctl.handle_layout().map(|l| l.handles.len()), Some(8));

    ctl.deselect_annotation();
    assert_eq!(ctl.state(), EditState::Idle);
    assert!(ctl.selection().is_empty());
    ctl.deselect_annotation();
    assert_eq!(ctl.state(), EditState::Idle);
}

#[test]
fn test_select_rejections() {
    let (mut doc, square) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let widget = add(&mut doc, AnnotationType::Widget, Rect::new(0.0, 0.0, 20.0, 20.0));
    let mut ctl = controller();

    assert!(!ctl.select_annotation(&doc, widget, 1));
    assert!(!ctl.select_annotation(&doc, square, 2));
    assert!(!ctl.select_annotation(&doc, square, 0));
    assert_eq!(ctl.state(), EditState::Idle);
    assert!(ctl.selection().is_empty());
}

#[test]
fn test_delegate_can_veto_selection() {
    let (mut doc, square) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let ink = add(&mut doc, AnnotationType::Ink, Rect::new(0.0, 0.0, 20.0, 20.0));
    let mut ctl = controller();
    ctl.set_delegate(Box::new(RefuseInk));

    assert!(!ctl.select_annotation(&doc, ink, 1));
    assert!(ctl.select_annotation(&doc, square, 1));
}

#[test]
fn test_transform_without_selection_is_noop() {
    let (doc, _) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let mut ctl = controller();
    assert!(!ctl.begin_transform(&doc, TransformMode::Move, Point::new(20.0, 20.0)));
    assert_eq!(ctl.update_transform(Point::new(30.0, 30.0)), None);
    assert_eq!(ctl.state(), EditState::Idle);
}

#[test]
fn test_resize_past_page_commits_bounded_rect() {
    let (mut doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 100.0, 50.0));
    let mut undo = coordinator();
    let mut ctl = controller();
    assert!(ctl.select_annotation(&doc, id, 1));

    assert!(ctl.begin_transform(
        &doc,
        TransformMode::Resize(Handle::BottomRight),
        Point::new(110.0, 60.0)
    ));
    assert_eq!(ctl.state(), EditState::Transforming);
    ctl.update_transform(Point::new(150.0, 100.0));
    ctl.update_transform(Point::new(200.0, 170.0));
    let candidate = ctl.update_transform(Point::new(250.0, 250.0));
    assert_eq!(candidate, Some(Rect::new(10.0, 10.0, 190.0, 190.0)));

    assert!(ctl.commit_transform(&mut doc, &mut undo));
    assert_eq!(ctl.state(), EditState::Selected);
    assert_eq!(rect_of(&doc, id), Rect::new(10.0, 10.0, 190.0, 190.0));
    assert_eq!(undo.chain().undo_depth(), 1);
    assert_eq!(undo.undo_description(), Some("Resize annotation"));
}

#[test]
fn test_cancel_leaves_document_untouched() {
    let original = Rect::new(10.0, 10.0, 100.0, 50.0);
    let (doc, id) = doc_with(AnnotationType::Square, original);
    let mut ctl = controller();
    ctl.select_annotation(&doc, id, 1);

    ctl.begin_transform(&doc, TransformMode::Move, Point::new(50.0, 30.0));
    ctl.update_transform(Point::new(90.0, 90.0));
    ctl.cancel_transform();

    assert_eq!(ctl.state(), EditState::Selected);
    assert!(ctl.session().is_none());
    assert_eq!(rect_of(&doc, id), original);
}

#[test]
fn test_commit_without_session_is_noop() {
    let (mut doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let mut undo = coordinator();
    let mut ctl = controller();
    ctl.select_annotation(&doc, id, 1);
    assert!(!ctl.commit_transform(&mut doc, &mut undo));
    assert!(!undo.can_undo());
}

#[test]
fn test_stamp_locks_aspect_ratio() {
    let (mut doc, id) = doc_with(AnnotationType::Stamp, Rect::new(10.0, 10.0, 60.0, 30.0));
    let mut undo = coordinator();
    let mut ctl = controller();
    ctl.select_annotation(&doc, id, 1);

    assert!(ctl.maintain_aspect_ratio(&doc));
    assert_eq!(ctl.handle_layout().map(|l| l.handles.len()), Some(4));
    assert!(!ctl.begin_transform(&doc, TransformMode::Resize(Handle::Right), Point::new(70.0, 25.0)));

    assert!(ctl.begin_transform(
        &doc,
        TransformMode::Resize(Handle::BottomRight),
        Point::new(70.0, 40.0)
    ));
    assert!(ctl.aspect_guide().is_some());
    ctl.update_transform(Point::new(100.0, 45.0));
    ctl.commit_transform(&mut doc, &mut undo);

    let rect = rect_of(&doc, id);
    assert!((rect.width / rect.height - 2.0).abs() < 1e-9);
    assert!((rect.width - 90.0).abs() < 1e-9);
}

#[test]
fn test_aspect_override() {
    let (doc, id) = doc_with(AnnotationType::Stamp, Rect::new(10.0, 10.0, 60.0, 30.0));
    let mut ctl = controller();
    ctl.set_maintain_aspect_ratio(Some(false));
    ctl.select_annotation(&doc, id, 1);
    assert!(!ctl.maintain_aspect_ratio(&doc));
    assert!(ctl.begin_transform(&doc, TransformMode::Resize(Handle::Right), Point::new(70.0, 25.0)));
}

#[test]
fn test_text_markup_cannot_move() {
    let (doc, id) = doc_with(AnnotationType::Highlight, Rect::new(10.0, 10.0, 60.0, 10.0));
    let mut ctl = controller();
    assert!(ctl.select_annotation(&doc, id, 1));
    assert!(ctl.handle_layout().is_some_and(|l| l.handles.is_empty()));
    assert!(!ctl.begin_transform(&doc, TransformMode::Move, Point::new(20.0, 15.0)));
    assert_eq!(ctl.state(), EditState::Selected);
}

#[test]
fn test_multi_selection_moves_together() {
    let (mut doc, a) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 20.0, 20.0));
    let b = add(&mut doc, AnnotationType::Circle, Rect::new(50.0, 50.0, 10.0, 10.0));
    let mut undo = coordinator();
    let mut ctl = controller();

    assert!(ctl.set_selected_annotations(&doc, &[AnnotationRef::new(a, 1), AnnotationRef::new(b, 1)]));
    assert_eq!(ctl.selection_frame(&doc), Some(Rect::new(10.0, 10.0, 50.0, 50.0)));

    ctl.begin_transform(&doc, TransformMode::Move, Point::new(30.0, 30.0));
    ctl.update_transform(Point::new(40.0, 35.0));
    assert!(ctl.commit_transform(&mut doc, &mut undo));

    assert_eq!(rect_of(&doc, a), Rect::new(20.0, 15.0, 20.0, 20.0));
    assert_eq!(rect_of(&doc, b), Rect::new(60.0, 55.0, 10.0, 10.0));
    assert_eq!(undo.undo_description(), Some("Move 2 annotations"));
    assert_eq!(undo.chain().undo_depth(), 1);
}

#[test]
fn test_rotate_stamp() {
    let (mut doc, id) = doc_with(AnnotationType::Stamp, Rect::new(50.0, 50.0, 100.0, 100.0));
    let mut undo = coordinator();
    let mut ctl = controller();
    ctl.select_annotation(&doc, id, 1);

    assert!(ctl.begin_transform(&doc, TransformMode::Rotate, Point::new(150.0, 100.0)));
    ctl.update_transform(Point::new(100.0, 150.0));
    assert!(ctl.commit_transform(&mut doc, &mut undo));

    let annotation = doc.annotation(id, 1).expect("annotation");
    assert!((annotation.rotation - 90.0).abs() < 1e-9);
    assert_eq!(annotation.rect, Rect::new(50.0, 50.0, 100.0, 100.0));
}

#[test]
fn test_square_cannot_rotate() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(50.0, 50.0, 10.0, 10.0));
    let mut ctl = controller();
    ctl.select_annotation(&doc, id, 1);
    assert!(!ctl.begin_transform(&doc, TransformMode::Rotate, Point::new(60.0, 55.0)));
}

#[test]
fn test_style_setters() {
    let (mut doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let mut undo = coordinator();
    let mut ctl = controller();

    assert!(!ctl.set_annotation_opacity(&mut doc, &mut undo, 0.5));

    ctl.select_annotation(&doc, id, 1);
    assert!(ctl.set_annotation_opacity(&mut doc, &mut undo, 1.7));
    assert!(ctl.set_annotation_border(&mut doc, &mut undo, -3.0));

    let style = doc.annotation(id, 1).expect("annotation").style;
    assert_eq!(style.opacity, 1.0);
    assert_eq!(style.thickness, 0.0);
    assert_eq!(undo.chain().full_history(), vec!["Change opacity", "Change border"]);
}

#[test]
fn test_style_rejected_while_transforming() {
    let (mut doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let mut undo = coordinator();
    let mut ctl = controller();
    ctl.select_annotation(&doc, id, 1);
    ctl.begin_transform(&doc, TransformMode::Move, Point::new(20.0, 20.0));

    assert!(!ctl.set_annotation_opacity(&mut doc, &mut undo, 0.2));
    assert!(!undo.can_undo());
}

#[test]
fn test_minimum_size_option() {
    let (mut doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 100.0, 100.0));
    let mut undo = coordinator();
    let mut ctl = AnnotationEditController::new(
        EditorOptions {
            minimum_annotation_size: 30.0,
            ..Default::default()
        },
        Arc::new(EventBus::new()),
    );
    ctl.select_annotation(&doc, id, 1);
    ctl.begin_transform(
        &doc,
        TransformMode::Resize(Handle::BottomRight),
        Point::new(110.0, 110.0),
    );
    ctl.update_transform(Point::new(0.0, 0.0));
    ctl.commit_transform(&mut doc, &mut undo);
    assert_eq!(rect_of(&doc, id), Rect::new(10.0, 10.0, 30.0, 30.0));
}

#[test]
fn test_bound_helpers() {
    let (doc, id) = doc_with(AnnotationType::Square, Rect::new(10.0, 10.0, 50.0, 50.0));
    let mut ctl = controller();
    assert_eq!(
        ctl.bound_point_to_page(&doc, Point::new(-5.0, 500.0)),
        Point::new(-5.0, 500.0)
    );

    ctl.select_annotation(&doc, id, 1);
    assert_eq!(
        ctl.bound_point_to_page(&doc, Point::new(-5.0, 500.0)),
        Point::new(0.0, 200.0)
    );
    assert_eq!(
        ctl.bound_page_rect(&doc, Rect::new(180.0, 0.0, 40.0, 40.0), 1),
        Ok(Rect::new(160.0, 0.0, 40.0, 40.0))
    );
    assert!(ctl.bound_page_rect(&doc, Rect::new(0.0, 0.0, 1.0, 1.0), 9).is_err());
    assert_eq!(
        ctl.bound_rect_to_page(&doc, Rect::new(150.0, 150.0, 100.0, 100.0), true),
        Rect::new(150.0, 150.0, 50.0, 50.0)
    );
    assert!(page().contains_rect(&ctl.bound_rect_to_page(
        &doc,
        Rect::new(150.0, 150.0, 100.0, 100.0),
        false
    )));
}

#[test]
fn test_vector_rendering_hint() {
    let (mut doc, ink) = doc_with(AnnotationType::Ink, Rect::new(10.0, 10.0, 50.0, 50.0));
    let note = add(&mut doc, AnnotationType::Text, Rect::new(0.0, 0.0, 20.0, 20.0));
    let ctl = controller();
    assert!(ctl.should_render_as_vector(&doc, AnnotationRef::new(ink, 1)));
    assert!(!ctl.should_render_as_vector(&doc, AnnotationRef::new(note, 1)));
}

#[derive(Clone, Default)]
struct TextEditor {
    opened: Arc<Mutex<Vec<Annotation>>>,
}

impl EditDelegate for TextEditor {
    fn did_begin_editing_free_text(&mut self, annotation: &Annotation) {
        self.opened.lock().expect("lock").push(annotation.clone());
    }
}

#[test]
fn test_edit_free_text_hands_annotation_to_delegate() {
    let (mut doc, text) = doc_with(AnnotationType::FreeText, Rect::new(10.0, 10.0, 80.0, 20.0));
    let other_text = add(&mut doc, AnnotationType::FreeText, Rect::new(10.0, 50.0, 80.0, 20.0));
    let square = add(&mut doc, AnnotationType::Square, Rect::new(100.0, 100.0, 20.0, 20.0));
    let editor = TextEditor::default();
    let mut ctl = controller();
    ctl.set_delegate(Box::new(editor.clone()));

    assert!(!ctl.edit_selected_free_text(&doc));

    ctl.select_annotation(&doc, text, 1);
    assert!(ctl.edit_selected_free_text(&doc));

    ctl.select_annotation(&doc, square, 1);
    assert!(!ctl.edit_selected_free_text(&doc));

    ctl.set_selected_annotations(
        &doc,
        &[AnnotationRef::new(text, 1), AnnotationRef::new(other_text, 1)],
    );
    assert!(!ctl.edit_selected_free_text(&doc));

    let opened = editor.opened.lock().expect("lock");
    assert_eq!(opened.iter().map(|a| a.id).collect::<Vec<_>>(), vec![text]);
}

#[test]
fn test_default_locked_types_follow_type_table() {
    let options = EditorOptions::default();
    for kind in AnnotationType::ALL {
        assert_eq!(
            options.aspect_locked_types.contains(&kind),
            kind.locks_aspect_ratio_by_default(),
            "{}",
            kind
        );
    }
}

#[test]
fn test_unwritten_changes_leave_no_undo_entry() {
    let mut inner = MemoryDocument::with_pages(1, page());
    let square = Annotation::new(AnnotationType::Square, 1, Rect::new(10.0, 10.0, 40.0, 40.0));
    let id = square.id;
    inner.add_annotation(square).expect("add");
    let mut doc = FlakyDocument {
        inner,
        fail_update: true,
        ..Default::default()
    };
    let mut undo = coordinator();
    let mut ctl = controller();
    assert!(ctl.select_annotation(&doc, id, 1));

    assert!(!ctl.set_annotation_opacity(&mut doc, &mut undo, 0.5));
    assert!(!undo.can_undo());

    assert!(ctl.begin_transform(&doc, TransformMode::Move, Point::new(20.0, 20.0)));
    ctl.update_transform(Point::new(50.0, 50.0));
    assert!(!ctl.commit_transform(&mut doc, &mut undo));
    assert!(!undo.can_undo());
    assert_eq!(ctl.state(), EditState::Selected);
    assert_eq!(rect_of(&doc, id), Rect::new(10.0, 10.0, 40.0, 40.0));
}
