use std::{cell::RefCell, rc::Rc, time::Duration};

use flow_gui::{
    CursorIcon,
    context::{GuiConfig, HostWindow},
    data_structures::{
        control::{Bounds, Control, ControlId, Widget},
        geometry::Rect,
    },
    engine::GuiEngine,
    events::{GuiEvent, InputEvent, MouseButton},
    render::DisplayList,
};
use cgmath::{Point2, Vector2};

pub const FRAME: Duration = Duration::from_millis(16);

/// In-memory host window.
pub struct MockHost {
    pub size: (u32, u32),
    pub cursor: Point2<f32>,
    pub focused: bool,
    pub repaint_requests: u32,
    pub cursor_icon: Option<CursorIcon>,
    pub frames: Vec<DisplayList>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            size: (800, 600),
            cursor: Point2::new(0.0, 0.0),
            focused: true,
            repaint_requests: 0,
            cursor_icon: None,
            frames: Vec::new(),
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.cursor = Point2::new(x, y);
        self
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostWindow for MockHost {
    fn client_size(&self) -> (u32, u32) {
        self.size
    }

    fn cursor_position(&self) -> Point2<f32> {
        self.cursor
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn request_repaint(&mut self) {
        self.repaint_requests += 1;
    }

    fn set_cursor_icon(&mut self, icon: CursorIcon) {
        self.cursor_icon = Some(icon);
    }

    fn present(&mut self, frame: DisplayList) {
        self.frames.push(frame);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Instance,
    Broadcast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: ControlId,
    pub kind: &'static str,
    pub source: Source,
}

pub type Log = Rc<RefCell<Vec<Entry>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn kind(event: &GuiEvent) -> &'static str {
    match event {
        GuiEvent::Update(_) => "update",
        GuiEvent::Pressed(_) => "pressed",
        GuiEvent::Released(_) => "released",
        GuiEvent::Clicked(_) => "clicked",
        GuiEvent::Moved(_) => "moved",
        GuiEvent::Entered(_) => "entered",
        GuiEvent::Left(_) => "left",
        GuiEvent::Hovering(_) => "hovering",
    }
}

/// Widget writing every event it sees into a shared log.
pub struct Recorder {
    log: Log,
}

impl Widget for Recorder {
    fn on_event(&mut self, bounds: &Bounds, event: &GuiEvent) {
        self.log.borrow_mut().push(Entry {
            id: bounds.id,
            kind: kind(event),
            source: Source::Instance,
        });
    }
}

/// A control whose widget and broadcast listener both record into `log`.
pub fn recording(log: &Log, rect: Rect) -> Control {
    let broadcast = log.clone();
    Control::new(Recorder { log: log.clone() })
        .with_rect(rect)
        .with_listener(move |id, event| {
            broadcast.borrow_mut().push(Entry {
                id,
                kind: kind(event),
                source: Source::Broadcast,
            })
        })
}

/// Entries of one kind, in dispatch order.
pub fn of_kind(log: &Log, kind: &str) -> Vec<Entry> {
    log.borrow()
        .iter()
        .filter(|entry| entry.kind == kind)
        .copied()
        .collect()
}

/// Ids that received `kind` through their widget, in dispatch order.
pub fn receivers(log: &Log, kind: &str) -> Vec<ControlId> {
    of_kind(log, kind)
        .into_iter()
        .filter(|entry| entry.source == Source::Instance)
        .map(|entry| entry.id)
        .collect()
}

pub fn engine() -> GuiEngine {
    GuiEngine::new(GuiConfig {
        initial_size: (800, 600),
        ..Default::default()
    })
}

pub fn point(x: f32, y: f32) -> Point2<f32> {
    Point2::new(x, y)
}

pub fn press(engine: &mut GuiEngine, x: f32, y: f32, button: MouseButton) {
    engine.dispatch(InputEvent::Pressed {
        position: point(x, y),
        button,
    });
}

pub fn release(engine: &mut GuiEngine, x: f32, y: f32, button: MouseButton) {
    engine.dispatch(InputEvent::Released {
        position: point(x, y),
        button,
    });
}

pub fn move_to(engine: &mut GuiEngine, x: f32, y: f32) {
    engine.dispatch(InputEvent::Moved {
        position: point(x, y),
        delta: Vector2::new(0.0, 0.0),
    });
}

/// Run one frame with the host cursor at `(x, y)`.
pub fn frame_at(engine: &mut GuiEngine, host: &mut MockHost, x: f32, y: f32) {
    host.cursor = point(x, y);
    engine.update(host, FRAME);
}
