use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    data_structures::texture,
    surface::{DisplayMetrics, DisplaySurface, SurfaceSize},
};

/// Central GPU context for one window: device, queue and the configured
/// surface together with a depth texture of the same size.
#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        // Same derivation as the resize check, so the first frame finds the
        // backing buffer already in place.
        let size = DisplayMetrics::from_physical(window.inner_size(), window.scale_factor())
            .backing_size()
            .unwrap_or(SurfaceSize::new(1, 1));

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Cannot create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter is compatible with the surface")?;

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("Cannot open the graphics device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader outputs linear colours, an Srgb surface encodes them on write.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface supports no texture formats")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn metrics(&self) -> DisplayMetrics {
        DisplayMetrics::from_physical(self.window.inner_size(), self.window.scale_factor())
    }

    /// Configure the surface again after it was lost or became outdated.
    ///
    /// Uses the size the resize check would pick so the two never fight
    /// over the swapchain, even when nothing else tracks the display size.
    pub fn reconfigure(&mut self) {
        match self.metrics().backing_size() {
            Some(size) => self.set_backing_size(size),
            None => self.surface.configure(&self.device, &self.config),
        }
    }
}

impl DisplaySurface for Context {
    fn css_size(&self) -> (f64, f64) {
        self.metrics().css_size()
    }

    fn pixel_ratio(&self) -> f64 {
        self.metrics().pixel_ratio
    }

    fn backing_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.config.width, self.config.height)
    }

    fn set_backing_size(&mut self, size: SurfaceSize) {
        if size.width == 0 || size.height == 0 {
            log::warn!("Ignoring resize to an empty backing buffer {:?}", size);
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
    }
}
