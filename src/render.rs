//! Rendering the scene.
//!
//! [`Renderer`] is the capability the animation driver needs from an engine:
//! a surface it can resize plus a way to draw the scene from a camera.
//! [`GpuRenderer`] is the wgpu implementation. The GPU resources themselves
//! live in [`SceneResources`] which does not depend on a window, so the same
//! code draws into a swapchain texture or into an off-screen target.

use std::iter;

use anyhow::anyhow;

use crate::{
    camera::{Camera, CameraResources},
    context::Context,
    data_structures::{
        instance::InstanceRaw,
        model::{DrawModel, Mesh},
        scene::Scene,
    },
    pipelines::{basic::mk_basic_pipeline, light::LightResources},
    surface::{DisplaySurface, SurfaceSize},
};

/// An engine that can draw a [`Scene`] onto a resizable surface.
pub trait Renderer: DisplaySurface {
    /// Draw one frame. An error here is fatal for the render loop.
    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()>;
}

/// Raw per-instance data for every mesh of `scene`, in scene order.
pub fn instance_data(scene: &Scene) -> Vec<InstanceRaw> {
    scene
        .meshes()
        .iter()
        .map(|mesh| mesh.to_instance().to_raw())
        .collect()
}

/// Everything on the GPU that is needed to draw a scene.
#[derive(Debug)]
pub struct SceneResources {
    pub mesh: Mesh,
    pub instance_buffer: wgpu::Buffer,
    pub instance_capacity: usize,
    pub instance_count: usize,
    pub camera: CameraResources,
    pub light: LightResources,
    pub pipeline: wgpu::RenderPipeline,
    pub clear_colour: wgpu::Color,
}

impl SceneResources {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        scene: &Scene,
        camera: &Camera,
        clear_colour: wgpu::Color,
    ) -> Self {
        let mesh = Mesh::from_box(device, "Box", scene.geometry());
        let camera = CameraResources::new(device, camera);
        let light = LightResources::new(device, scene.lights().first());
        if scene.lights().len() > 1 {
            log::warn!(
                "Only the first of {} lights is used for shading",
                scene.lights().len()
            );
        }
        let pipeline = mk_basic_pipeline(
            device,
            color_format,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );

        let instance_capacity = scene.meshes().len();
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            // Zero sized vertex buffers can't be bound, keep room for one.
            size: (instance_capacity.max(1) * std::mem::size_of::<InstanceRaw>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut resources = Self {
            mesh,
            instance_buffer,
            instance_capacity,
            instance_count: 0,
            camera,
            light,
            pipeline,
            clear_colour,
        };
        resources.write_instances(queue, scene);
        resources
    }

    /// Upload the current transforms, camera and light.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene, camera: &Camera) {
        self.write_instances(queue, scene);
        self.camera.write(queue, camera);
        self.light.write(queue, scene.lights().first());
    }

    fn write_instances(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let mut data = instance_data(scene);
        if data.len() > self.instance_capacity {
            log::warn!(
                "Scene has {} meshes but only {} were uploaded at start-up, drawing the first {}",
                data.len(),
                self.instance_capacity,
                self.instance_capacity
            );
            data.truncate(self.instance_capacity);
        }
        self.instance_count = data.len();
        if !data.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&data));
        }
    }

    /// Record a render pass that clears `view` and draws all instances.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_colour),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if self.instance_count == 0 {
            log::warn!("you attemted to render something with zero instances");
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.draw_mesh_instanced(
            &self.mesh,
            0..self.instance_count as u32,
            &self.camera.bind_group,
            &self.light.bind_group,
        );
    }
}

/// A window surface plus the resources to draw the scene onto it.
#[derive(Debug)]
pub struct GpuRenderer {
    pub ctx: Context,
    pub resources: SceneResources,
}

impl GpuRenderer {
    pub fn new(ctx: Context, scene: &Scene, camera: &Camera, clear_colour: wgpu::Color) -> Self {
        let resources = SceneResources::new(
            &ctx.device,
            &ctx.queue,
            ctx.config.format,
            scene,
            camera,
            clear_colour,
        );
        Self { ctx, resources }
    }
}

impl DisplaySurface for GpuRenderer {
    fn css_size(&self) -> (f64, f64) {
        self.ctx.css_size()
    }

    fn pixel_ratio(&self) -> f64 {
        self.ctx.pixel_ratio()
    }

    fn backing_size(&self) -> SurfaceSize {
        self.ctx.backing_size()
    }

    fn set_backing_size(&mut self, size: SurfaceSize) {
        self.ctx.set_backing_size(size)
    }
}

impl Renderer for GpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()> {
        self.resources.update(&self.ctx.queue, scene, camera);

        let output = match self.ctx.surface.get_current_texture() {
            Ok(output) => output,
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.ctx.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(anyhow!("Unable to acquire surface texture: {}", e)),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.resources
            .encode(&mut encoder, &view, &self.ctx.depth_texture.view);
        self.ctx.queue.submit(iter::once(encoder.finish()));

        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }
}
