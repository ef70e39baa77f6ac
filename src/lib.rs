//! flow-cubes
//!
//! Instanced, lit, spinning cubes on native and WASM. A box geometry is shared
//! by a handful of coloured instances that rotate as a function of time, while
//! the render loop keeps the surface's backing buffer in sync with the size it
//! is displayed at.
//!
//! High-level modules
//! - `animation`: the per-frame driver and its injectable frame scheduler
//! - `camera`: perspective camera, projection and camera uniforms
//! - `config`: demo presets (cube colours, camera, light, resize policy)
//! - `context`: GPU and window context that owns device/queue/surface
//! - `data_structures`: scene, geometry, instances, meshes and textures
//! - `flow`: the winit event loop driving everything
//! - `pipelines`: the instanced Phong pipeline and light uniform
//! - `render`: the `Renderer` capability and its wgpu implementation
//! - `surface`: backing-buffer / display-size synchronisation
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod surface;

// Re-exports commonly used types for convenience in downstream code.
pub use animation::{AnimationDriver, FrameContext, FrameScheduler};
pub use config::{DemoConfig, Preset, ResizePolicy};
pub use render::Renderer;
pub use surface::{DisplaySurface, SurfaceSize};
