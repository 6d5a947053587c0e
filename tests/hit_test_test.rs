use flow_gui::{
    Point2,
    data_structures::{
        control::{Blank, Control},
        geometry::Rect,
    },
    pick,
};

use crate::common::test_utils::{engine, point};

mod common;

fn blank(rect: Rect) -> Control {
    Control::new(Blank).with_rect(rect)
}

#[test]
fn deepest_control_wins_over_its_ancestors() {
    let mut engine = engine();
    let layer = engine.add_layer();
    let parent = engine
        .add_control(layer, blank(Rect::new(0.0, 0.0, 200.0, 200.0)))
        .unwrap();
    let child = engine
        .add_control(parent, blank(Rect::new(50.0, 50.0, 100.0, 100.0)))
        .unwrap();
    engine.propagate_clip();

    assert_eq!(engine.hit_test(point(60.0, 60.0)), Some(child));
    assert_eq!(engine.hit_test(point(10.0, 10.0)), Some(parent));
    assert_eq!(engine.hit_test(point(500.0, 500.0)), None);
}

#[test]
fn later_sibling_wins_where_siblings_overlap() {
    let mut engine = engine();
    let layer = engine.add_layer();
    let first = engine
        .add_control(layer, blank(Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    let second = engine
        .add_control(layer, blank(Rect::new(50.0, 50.0, 150.0, 150.0)))
        .unwrap();
    engine.propagate_clip();

    assert_eq!(engine.hit_test(point(75.0, 75.0)), Some(second));

    engine.tree_mut().move_to_front(first).unwrap();
    assert_eq!(engine.hit_test(point(75.0, 75.0)), Some(first));
}

#[test]
fn shared_edge_pixel_belongs_to_exactly_one_sibling() {
    let mut engine = engine();
    let layer = engine.add_layer();
    let left = engine
        .add_control(layer, blank(Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    let right = engine
        .add_control(layer, blank(Rect::new(100.0, 0.0, 200.0, 100.0)))
        .unwrap();
    engine.propagate_clip();

    // Pixel 99 is centered at 99.5, pixel 100 at 100.5.
    assert_eq!(engine.hit_test(point(99.0, 10.0)), Some(left));
    assert_eq!(engine.hit_test(point(100.0, 10.0)), Some(right));

    // Swapping the sibling order must not move the boundary.
    engine.tree_mut().move_to_front(left).unwrap();
    assert_eq!(engine.hit_test(point(99.0, 10.0)), Some(left));
    assert_eq!(engine.hit_test(point(100.0, 10.0)), Some(right));
}

#[test]
fn non_hoverable_controls_are_transparent_to_the_pointer() {
    let mut engine = engine();
    let layer = engine.add_layer();
    let below = engine
        .add_control(layer, blank(Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    engine
        .add_control(
            layer,
            blank(Rect::new(0.0, 0.0, 100.0, 100.0)).hoverable(false),
        )
        .unwrap();
    engine.propagate_clip();

    assert_eq!(engine.hit_test(point(10.0, 10.0)), Some(below));
}

#[test]
fn layers_are_never_hit() {
    let mut engine = engine();
    engine.add_layer();
    engine.propagate_clip();

    assert_eq!(engine.hit_test(point(10.0, 10.0)), None);
}

#[test]
fn clipped_away_part_of_a_child_is_not_hit() {
    let mut engine = engine();
    let layer = engine.add_layer();
    let parent = engine
        .add_control(
            layer,
            blank(Rect::new(0.0, 0.0, 100.0, 100.0)).clip_children(true),
        )
        .unwrap();
    let child = engine
        .add_control(parent, blank(Rect::new(50.0, 50.0, 300.0, 300.0)))
        .unwrap();
    engine.propagate_clip();

    assert_eq!(engine.hit_test(point(60.0, 60.0)), Some(child));
    assert_eq!(engine.hit_test(point(150.0, 150.0)), None);
}

#[test]
fn overlay_and_later_layers_cover_earlier_layers() {
    let mut engine = engine();
    let bottom = engine.add_layer();
    let top = engine.add_layer();
    engine
        .add_control(bottom, blank(Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    let covering = engine
        .add_control(top, blank(Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    engine.propagate_clip();
    assert_eq!(engine.hit_test(point(10.0, 10.0)), Some(covering));

    let popup = engine
        .tree_mut()
        .insert(blank(Rect::new(0.0, 0.0, 40.0, 40.0)));
    engine.show_overlay(popup, point(5.0, 5.0)).unwrap();
    engine.propagate_clip();
    assert_eq!(engine.hit_test(point(10.0, 10.0)), Some(popup));
}

#[test]
fn repeated_hit_tests_agree() {
    let mut engine = engine();
    let layer = engine.add_layer();
    for i in 0..10 {
        let offset = i as f32 * 15.0;
        engine
            .add_control(
                layer,
                blank(Rect::new(offset, offset, offset + 60.0, offset + 60.0)),
            )
            .unwrap();
    }
    engine.propagate_clip();

    let layers = engine.all_layers();
    for y in (0..200).step_by(7) {
        for x in (0..200).step_by(7) {
            let position = Point2::new(x as f32, y as f32);
            let first = pick::hit_test(engine.tree(), &layers, position);
            let second = pick::hit_test(engine.tree(), &layers, position);
            assert_eq!(first, second);
            assert_eq!(first, engine.hit_test(position));
        }
    }
}
