use annotkit_core::bounds::{bound_point_to_rect, bound_rect_to_page, BoundsMode};
use annotkit_core::geometry::{Point, Rect};
use proptest::prelude::*;

fn crop() -> Rect {
    Rect::new(0.0, 0.0, 612.0, 792.0)
}

#[test]
fn test_bottom_right_drag_past_page() {
    let page = Rect::new(0.0, 0.0, 200.0, 200.0);
    let dragged = Rect::from_points(Point::new(10.0, 10.0), Point::new(250.0, 250.0));
    let bounded = bound_rect_to_page(&dragged, &page, BoundsMode::Resizing);
    assert_eq!(bounded, Rect::new(10.0, 10.0, 190.0, 190.0));
}

#[test]
fn test_resize_entirely_outside_collapses_on_edge() {
    let bounded = bound_rect_to_page(
        &Rect::new(700.0, 10.0, 50.0, 50.0),
        &crop(),
        BoundsMode::Resizing,
    );
    assert_eq!(bounded.x, 612.0);
    assert_eq!(bounded.width, 0.0);
}

proptest! {
    #[test]
    fn resize_candidates_stay_on_page(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        w in 0.0f64..2000.0,
        h in 0.0f64..2000.0,
    ) {
        let bounded = bound_rect_to_page(&Rect::new(x, y, w, h), &crop(), BoundsMode::Resizing);
        prop_assert!(crop().contains_rect(&bounded));
    }

    #[test]
    fn fitting_moves_stay_on_page_and_keep_size(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        w in 1.0f64..612.0,
        h in 1.0f64..792.0,
    ) {
        let moved = Rect::new(x, y, w, h);
        let bounded = bound_rect_to_page(&moved, &crop(), BoundsMode::Moving);
        prop_assert!(crop().contains_rect(&bounded));
        prop_assert!((bounded.width - w).abs() < 1e-9);
        prop_assert!((bounded.height - h).abs() < 1e-9);
    }

    #[test]
    fn bounded_points_stay_on_page(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
        let p = bound_point_to_rect(Point::new(x, y), &crop());
        prop_assert!(crop().contains_point(&p));
    }
}
