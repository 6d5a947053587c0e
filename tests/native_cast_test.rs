use flow_gui::native::{
    CommandList, NativeViewport, PipelineState, PixelFormat, PrimitiveTopology, Resource,
    Viewport, native_cast, native_format, native_topology, native_viewport,
};

#[test]
fn missing_handles_cast_to_missing_native_objects() {
    assert!(native_cast::<PipelineState>(None).is_none());
    assert!(native_cast::<Resource>(None).is_none());
    assert!(native_cast::<CommandList>(None).is_none());
}

#[test]
fn topologies_map_one_to_one() {
    let pairs = [
        (PrimitiveTopology::PointList, wgpu::PrimitiveTopology::PointList),
        (PrimitiveTopology::LineList, wgpu::PrimitiveTopology::LineList),
        (PrimitiveTopology::LineStrip, wgpu::PrimitiveTopology::LineStrip),
        (PrimitiveTopology::TriangleList, wgpu::PrimitiveTopology::TriangleList),
        (PrimitiveTopology::TriangleStrip, wgpu::PrimitiveTopology::TriangleStrip),
    ];
    for (source, expected) in pairs {
        assert_eq!(native_topology(source), expected);
    }
}

#[test]
fn viewport_fields_keep_their_values() {
    let viewport = Viewport {
        top_left_x: 4.0,
        top_left_y: 8.0,
        width: 640.0,
        height: 480.0,
        min_depth: 0.0,
        max_depth: 1.0,
    };

    assert_eq!(
        native_viewport(&viewport),
        NativeViewport {
            x: 4.0,
            y: 8.0,
            w: 640.0,
            h: 480.0,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    );
}

#[test]
#[should_panic]
fn pixel_formats_have_no_mapping_yet() {
    native_format(PixelFormat::Rgba8Unorm);
}
