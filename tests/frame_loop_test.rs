use std::{cell::RefCell, rc::Rc};

use flow_gui::{
    CursorIcon, Vector2,
    data_structures::{
        control::{Control, Panel},
        geometry::Rect,
    },
    events::{InputEvent, MouseButton},
    render::{Color, DrawCommand},
};

use crate::common::test_utils::{
    FRAME, MockHost, engine, frame_at, new_log, point, receivers, recording,
};

mod common;

#[test]
fn unfocused_host_only_drains_input() {
    let mut engine = engine();
    let log = new_log();
    let layer = engine.add_layer();
    engine
        .add_control(layer, recording(&log, Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    let mut host = MockHost::new().at(10.0, 10.0);
    host.focused = false;

    engine.push_input(InputEvent::Resized {
        width: 1024,
        height: 768,
    });
    engine.update(&mut host, FRAME);

    assert_eq!(engine.resolution(), (1024, 768));
    assert_eq!(
        engine.control(layer).unwrap().rect(),
        Rect::new(0.0, 0.0, 1024.0, 768.0)
    );
    assert_eq!(host.repaint_requests, 0);
    assert!(log.borrow().is_empty());
    assert_eq!(engine.hovered(), None);
}

#[test]
fn focused_frame_requests_repaint_and_updates_depth_first() {
    let mut engine = engine();
    let log = new_log();
    let first_layer = engine.add_layer();
    let second_layer = engine.add_layer();
    let a = engine
        .add_control(first_layer, recording(&log, Rect::new(0.0, 0.0, 50.0, 50.0)))
        .unwrap();
    let a_child = engine
        .add_control(a, recording(&log, Rect::new(0.0, 0.0, 10.0, 10.0)))
        .unwrap();
    let b = engine
        .add_control(first_layer, recording(&log, Rect::new(60.0, 0.0, 90.0, 50.0)))
        .unwrap();
    let c = engine
        .add_control(second_layer, recording(&log, Rect::new(0.0, 60.0, 50.0, 90.0)))
        .unwrap();
    let popup = engine
        .tree_mut()
        .insert(recording(&log, Rect::new(0.0, 0.0, 20.0, 20.0)));
    engine.show_overlay(popup, point(400.0, 400.0)).unwrap();

    let mut host = MockHost::new().at(700.0, 500.0);
    engine.update(&mut host, FRAME);

    assert_eq!(host.repaint_requests, 1);
    assert_eq!(receivers(&log, "update"), vec![a, a_child, b, c, popup]);
}

#[test]
fn unfocused_host_input_is_handled_immediately() {
    let mut engine = engine();
    let moves = Rc::new(RefCell::new(0));
    let counter = moves.clone();
    engine.on_mouse_moved(move |_| *counter.borrow_mut() += 1);
    let mut host = MockHost::new();
    host.focused = false;

    for x in 0..5 {
        engine.receive_input(
            &mut host,
            InputEvent::Moved {
                position: point(x as f32, 0.0),
                delta: Vector2::new(1.0, 0.0),
            },
        );
    }

    assert_eq!(engine.queued_input(), 0);
    assert_eq!(*moves.borrow(), 5);
    assert_eq!(host.repaint_requests, 0);
}

#[test]
fn focused_host_input_waits_for_the_next_frame() {
    let mut engine = engine();
    let moves = Rc::new(RefCell::new(0));
    let counter = moves.clone();
    engine.on_mouse_moved(move |_| *counter.borrow_mut() += 1);
    let mut host = MockHost::new();

    engine.receive_input(
        &mut host,
        InputEvent::Moved {
            position: point(10.0, 10.0),
            delta: Vector2::new(0.0, 0.0),
        },
    );
    assert_eq!(engine.queued_input(), 1);
    assert_eq!(host.repaint_requests, 1);
    assert_eq!(*moves.borrow(), 0);

    engine.update(&mut host, FRAME);
    assert_eq!(engine.queued_input(), 0);
    assert_eq!(*moves.borrow(), 1);
}

#[test]
fn queued_input_is_handled_before_hover_is_recomputed() {
    let mut engine = engine();
    let log = new_log();
    let layer = engine.add_layer();
    let target = engine
        .add_control(layer, recording(&log, Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    let mut host = MockHost::new();

    // Nothing is hovered yet, so the queued press reaches no control.
    engine.push_input(InputEvent::Pressed {
        position: point(10.0, 10.0),
        button: MouseButton::Left,
    });
    frame_at(&mut engine, &mut host, 10.0, 10.0);

    assert!(receivers(&log, "pressed").is_empty());
    assert_eq!(receivers(&log, "entered"), vec![target]);
    assert_eq!(engine.hovered(), Some(target));
}

#[test]
fn frozen_hover_keeps_the_previous_hover_target() {
    let mut engine = engine();
    let log = new_log();
    let layer = engine.add_layer();
    let target = engine
        .add_control(layer, recording(&log, Rect::new(0.0, 0.0, 100.0, 100.0)))
        .unwrap();
    let mut host = MockHost::new();
    frame_at(&mut engine, &mut host, 10.0, 10.0);
    assert_eq!(engine.hovered(), Some(target));

    engine.set_hover_frozen(true);
    log.borrow_mut().clear();
    frame_at(&mut engine, &mut host, 500.0, 500.0);

    assert_eq!(engine.hovered(), Some(target));
    assert!(receivers(&log, "left").is_empty());
    assert!(receivers(&log, "hovering").is_empty());
    assert_eq!(receivers(&log, "update"), vec![target]);

    engine.set_hover_frozen(false);
    frame_at(&mut engine, &mut host, 500.0, 500.0);
    assert_eq!(engine.hovered(), None);
    assert_eq!(receivers(&log, "left"), vec![target]);
}

#[test]
fn cursor_visual_is_applied_on_the_next_frame() {
    let mut engine = engine();
    let mut host = MockHost::new();
    engine.set_cursor_visual(CursorIcon::Grab);
    assert_eq!(host.cursor_icon, None);

    engine.update(&mut host, FRAME);
    assert_eq!(host.cursor_icon, Some(CursorIcon::Grab));
    assert_eq!(engine.cursor_visual(), CursorIcon::Grab);
}

fn colour(r: f64) -> Color {
    Color {
        r,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    }
}

#[test]
fn render_presents_commands_in_paint_order_under_each_visible_rect() {
    let mut engine = engine();
    let layer = engine.add_layer();
    let parent = engine
        .add_control(
            layer,
            Control::new(Panel::new(colour(0.1)))
                .with_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
                .clip_children(true),
        )
        .unwrap();
    engine
        .add_control(
            parent,
            Control::new(Panel::new(colour(0.2))).with_rect(Rect::new(50.0, 50.0, 150.0, 150.0)),
        )
        .unwrap();
    engine
        .add_control(
            parent,
            Control::new(Panel::new(colour(0.3))).with_rect(Rect::new(200.0, 200.0, 300.0, 300.0)),
        )
        .unwrap();
    engine
        .add_control(
            layer,
            Control::new(Panel::new(colour(0.4))).with_rect(Rect::new(300.0, 0.0, 400.0, 100.0)),
        )
        .unwrap();

    let mut host = MockHost::new();
    engine.update(&mut host, FRAME);
    engine.render(&mut host);

    assert_eq!(host.frames.len(), 1);
    let frame = &host.frames[0];
    assert_eq!((frame.width, frame.height), (800, 600));
    assert_eq!(frame.clear_colour, engine.config().clear_colour);

    // The third panel is clipped away entirely and records nothing.
    let fills: Vec<(f64, Rect)> = frame
        .commands
        .iter()
        .map(|command| match command {
            DrawCommand::FillRect { color, clip, .. } => (color.r, *clip),
            other => panic!("unexpected command {:?}", other),
        })
        .collect();
    assert_eq!(
        fills,
        vec![
            (0.1, Rect::new(0.0, 0.0, 100.0, 100.0)),
            (0.2, Rect::new(50.0, 50.0, 100.0, 100.0)),
            (0.4, Rect::new(300.0, 0.0, 400.0, 100.0)),
        ]
    );
}

#[test]
fn paint_listeners_run_after_the_widget() {
    let mut engine = engine();
    let layer = engine.add_layer();
    let panel = engine
        .add_control(
            layer,
            Control::new(Panel::new(colour(0.5)))
                .with_rect(Rect::new(0.0, 0.0, 100.0, 100.0))
                .with_paint_listener(|_, painter| {
                    painter.line(point(0.0, 0.0), point(100.0, 100.0), Color::BLACK, 1.0)
                }),
        )
        .unwrap();
    engine.propagate_clip();

    let frame = engine.paint();

    assert_eq!(frame.len(), 2);
    assert!(matches!(frame.commands[0], DrawCommand::FillRect { .. }));
    assert!(matches!(frame.commands[1], DrawCommand::Line { .. }));
    assert_eq!(
        frame.commands[1].clip(),
        engine.control(panel).unwrap().visible_rect()
    );
}
