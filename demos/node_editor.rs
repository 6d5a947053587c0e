//! Interactive node editor on a live winit window.
//!
//! The engine only records display lists; nothing is rasterized, so the
//! window stays blank. Run with `RUST_LOG=debug` to follow presses, drags and
//! new links in the log.

use std::time::Duration;

use flow_gui::{
    CursorIcon,
    context::GuiConfig,
    data_structures::{
        control::{Control, Panel},
        geometry::Rect,
    },
    editor::{LinkKey, NodeDesc, NodePanel},
    engine::GuiEngine,
    flow::GuiFlow,
    render::Color,
};

struct NodeEditor {
    panel: Option<NodePanel>,
}

impl GuiFlow for NodeEditor {
    fn on_init(&mut self, engine: &mut GuiEngine) -> anyhow::Result<()> {
        let layer = engine.add_layer();
        let mut panel = NodePanel::new(engine, layer)?;

        let source = panel.add_node(
            engine,
            NodeDesc::new("Noise").output("value"),
            [80.0, 120.0].into(),
        )?;
        let mix = panel.add_node(
            engine,
            NodeDesc::new("Mix").input("a").input("b").output("out"),
            [360.0, 160.0].into(),
        )?;
        let output = panel.add_node(
            engine,
            NodeDesc::new("Output").input("colour"),
            [640.0, 180.0].into(),
        )?;
        panel.add_link(engine, LinkKey::new(source, 0, mix, 0))?;
        panel.add_link(engine, LinkKey::new(mix, 0, output, 0))?;
        panel.on_link_added(|key| log::info!("linked {:?}", key));

        let menu = engine.tree_mut().insert(
            Control::new(Panel::new(Color {
                r: 0.3,
                g: 0.3,
                b: 0.35,
                a: 1.0,
            }))
            .with_rect(Rect::new(0.0, 0.0, 140.0, 80.0)),
        );
        engine.set_context_menu(panel.layout(), menu)?;

        engine.on_mouse_pressed(|event| log::debug!("pressed at {:?}", event.cursor_pos));

        self.panel = Some(panel);
        Ok(())
    }

    fn on_update(&mut self, engine: &mut GuiEngine, _dt: Duration) {
        if let Some(panel) = self.panel.as_mut() {
            panel.on_frame(engine);
            let icon = if panel.dragged_node().is_some() || panel.dragged_port().is_some() {
                CursorIcon::Grabbing
            } else {
                CursorIcon::Default
            };
            engine.set_cursor_visual(icon);
        }
    }
}

fn main() {
    let config = GuiConfig {
        title: "node editor".to_string(),
        ..Default::default()
    };
    let _ = flow_gui::flow::run(config, vec![Box::new(NodeEditor { panel: None })]);
}
