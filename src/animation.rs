//! The animation driver.
//!
//! Once started, the driver is invoked once per display refresh with a
//! timestamp in milliseconds. Each invocation
//!
//! 1. syncs the backing buffer with the displayed size (responsive policy only)
//!    and updates the camera aspect if it had to resize, or if this is the
//!    first frame with a usable display size,
//! 2. spins every cube, instance `i` at `1 + 0.1 * i` radians per second
//!    around both the x and the y axis,
//! 3. renders one frame,
//! 4. asks the scheduler for the next frame.
//!
//! The loop never stops by itself. A render error is returned to the caller
//! and the next frame is not requested.

use std::f64::consts::TAU;

use anyhow::bail;

use crate::{
    camera::Camera,
    config::ResizePolicy,
    data_structures::scene::{MeshHandle, Scene},
    render::Renderer,
    surface::{resize_to_display_size, target_backing_size},
};

/// Speed-up per instance index: each cube spins 10% faster than the previous.
pub const SPEED_STEP: f64 = 0.1;

fn speed(index: usize) -> f64 {
    1.0 + index as f64 * SPEED_STEP
}

/// Rotation speed in radians per second of the instance at `index`.
pub fn rotation_speed(index: usize) -> f32 {
    speed(index) as f32
}

/// Rotation angle in radians of the instance at `index` after `t_sec` seconds.
pub fn rotation_angle(index: usize, t_sec: f64) -> f64 {
    t_sec * speed(index)
}

/// Set the rotation of every mesh in `handles` for time `t_sec`.
///
/// Both axes get the same angle, wrapped to `[0, 2π)` before it is narrowed
/// to `f32` so long uptimes keep sub-frame precision. The speed depends on
/// the position in `handles`, not on the mesh index in the scene.
pub fn animate(scene: &mut Scene, handles: &[MeshHandle], t_sec: f64) {
    for (i, handle) in handles.iter().enumerate() {
        match scene.mesh_mut(*handle) {
            Some(mesh) => {
                let angle = rotation_angle(i, t_sec).rem_euclid(TAU) as f32;
                mesh.rotation = (angle, angle);
            }
            None => log::warn!("Mesh {:?} is not part of the scene", handle),
        }
    }
}

/// "Call me again before the next repaint."
///
/// Every call registers exactly one future frame. Implementations must not
/// invoke the driver synchronously from inside `request_frame`.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

impl FrameScheduler for std::sync::Arc<winit::window::Window> {
    fn request_frame(&mut self) {
        self.request_redraw();
    }
}

/// The handles a frame works on: scene, camera and the animated meshes in
/// animation order.
#[derive(Clone, Debug)]
pub struct FrameContext {
    pub scene: Scene,
    pub camera: Camera,
    pub cubes: Vec<MeshHandle>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

pub struct AnimationDriver<S: FrameScheduler> {
    scheduler: S,
    policy: ResizePolicy,
    state: DriverState,
    frames: u64,
    // Set once the camera aspect matches the display.
    aspect_synced: bool,
}

impl<S: FrameScheduler> std::fmt::Debug for AnimationDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationDriver")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("frames", &self.frames)
            .field("aspect_synced", &self.aspect_synced)
            .finish()
    }
}

impl<S: FrameScheduler> AnimationDriver<S> {
    pub fn new(scheduler: S, policy: ResizePolicy) -> Self {
        Self {
            scheduler,
            policy,
            state: DriverState::Idle,
            frames: 0,
            aspect_synced: false,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Schedule the first frame. There is exactly one start per driver.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if self.state == DriverState::Running {
            bail!("The animation driver is already running");
        }
        self.state = DriverState::Running;
        log::info!("Animation loop started ({:?} resize policy)", self.policy);
        self.scheduler.request_frame();
        Ok(())
    }

    /// Run one invocation of the loop at `t_ms` milliseconds.
    pub fn frame<R: Renderer + ?Sized>(
        &mut self,
        t_ms: f64,
        ctx: &mut FrameContext,
        renderer: &mut R,
    ) -> anyhow::Result<()> {
        if self.state != DriverState::Running {
            bail!("Frame delivered before the animation driver was started");
        }
        let t_sec = t_ms / 1000.0;

        if self.policy == ResizePolicy::Responsive {
            let display = match resize_to_display_size(renderer) {
                Some(css) => Some(css),
                // The backing buffer may already match the display at start-up,
                // the configured aspect still has to be replaced once.
                None if !self.aspect_synced => {
                    let (css_width, css_height) = renderer.css_size();
                    target_backing_size(css_width, css_height, renderer.pixel_ratio())
                        .map(|_| (css_width, css_height))
                }
                None => None,
            };
            if let Some((css_width, css_height)) = display {
                ctx.camera
                    .projection
                    .set_aspect((css_width / css_height) as f32);
                ctx.camera.projection.update();
                self.aspect_synced = true;
            }
        }

        animate(&mut ctx.scene, &ctx.cubes, t_sec);

        renderer.render(&ctx.scene, &ctx.camera)?;
        self.frames += 1;

        self.scheduler.request_frame();
        Ok(())
    }
}
