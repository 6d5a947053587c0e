//! Translation between the engine's abstract graphics types and the native
//! `wgpu` objects behind them.
//!
//! Each abstract handle wraps exactly one native object and exposes it through
//! [`NativeHandle::native`]. [`native_cast`] accepts a missing handle and
//! yields a missing native object instead of failing. Enum and struct
//! translators map abstract values onto their `wgpu` counterparts.

/// Access to the native object behind an abstract handle.
pub trait NativeHandle {
    type Native;

    fn native(&self) -> &Self::Native;
}

/// Native object of `source`, or `None` for a missing handle.
pub fn native_cast<H: NativeHandle>(source: Option<&H>) -> Option<&H::Native> {
    source.map(|handle| handle.native())
}

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident => $native:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            native: $native,
        }

        impl $name {
            pub fn from_native(native: $native) -> Self {
                Self { native }
            }

            pub fn into_native(self) -> $native {
                self.native
            }
        }

        impl NativeHandle for $name {
            type Native = $native;

            fn native(&self) -> &Self::Native {
                &self.native
            }
        }
    };
}

native_handle!(
    /// A compiled render pipeline.
    PipelineState => wgpu::RenderPipeline
);
native_handle!(
    /// A GPU buffer.
    Resource => wgpu::Buffer
);
native_handle!(
    /// Records commands; the encoder owns its command memory.
    CommandAllocator => wgpu::CommandEncoder
);
native_handle!(
    /// A finished, submittable list of commands.
    CommandList => wgpu::CommandBuffer
);
native_handle!(
    /// Describes the resource bindings a pipeline expects.
    RootSignature => wgpu::PipelineLayout
);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

impl From<PrimitiveTopology> for wgpu::PrimitiveTopology {
    fn from(source: PrimitiveTopology) -> Self {
        match source {
            PrimitiveTopology::PointList => wgpu::PrimitiveTopology::PointList,
            PrimitiveTopology::LineList => wgpu::PrimitiveTopology::LineList,
            PrimitiveTopology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveTopology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

pub fn native_topology(source: PrimitiveTopology) -> wgpu::PrimitiveTopology {
    source.into()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub top_left_x: f32,
    pub top_left_y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// Viewport in the argument order `wgpu::RenderPass::set_viewport` expects.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NativeViewport {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl NativeViewport {
    pub fn apply(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_viewport(self.x, self.y, self.w, self.h, self.min_depth, self.max_depth);
    }
}

impl From<Viewport> for NativeViewport {
    fn from(source: Viewport) -> Self {
        Self {
            x: source.top_left_x,
            y: source.top_left_y,
            w: source.width,
            h: source.height,
            min_depth: source.min_depth,
            max_depth: source.max_depth,
        }
    }
}

pub fn native_viewport(source: &Viewport) -> NativeViewport {
    (*source).into()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    R32Uint,
    R32Float,
    Rgba16Float,
    Depth24Plus,
    Depth32Float,
}

/// Pixel format translation has no defined mapping yet. Which formats have to
/// be supported is decided by whoever extends this path; until then every call
/// panics instead of guessing.
pub fn native_format(source: PixelFormat) -> wgpu::TextureFormat {
    unimplemented!("no native texture format mapping for {:?}", source)
}
