use anyhow::bail;
use flow_cubes::{
    DisplaySurface, FrameScheduler, Renderer, SurfaceSize,
    camera::Camera,
    data_structures::scene::Scene,
};

/// A surface whose displayed size and pixel ratio are set by the test.
#[derive(Debug, Clone)]
pub(crate) struct FakeSurface {
    pub css: (f64, f64),
    pub ratio: f64,
    pub backing: SurfaceSize,
    resizes: Vec<SurfaceSize>,
}

impl FakeSurface {
    pub fn new(css: (f64, f64), ratio: f64, backing: (u32, u32)) -> Self {
        Self {
            css,
            ratio,
            backing: backing.into(),
            resizes: Vec::new(),
        }
    }

    /// Every size the backing buffer was set to, in order.
    pub fn resizes(&self) -> &[SurfaceSize] {
        &self.resizes
    }
}

impl DisplaySurface for FakeSurface {
    fn css_size(&self) -> (f64, f64) {
        self.css
    }

    fn pixel_ratio(&self) -> f64 {
        self.ratio
    }

    fn backing_size(&self) -> SurfaceSize {
        self.backing
    }

    fn set_backing_size(&mut self, size: SurfaceSize) {
        self.backing = size;
        self.resizes.push(size);
    }
}

/// What the renderer saw when it was asked to draw.
#[derive(Debug, Clone)]
pub(crate) struct RenderedFrame {
    pub rotations: Vec<(f32, f32)>,
    pub aspect: f32,
    pub backing: SurfaceSize,
}

/// A renderer that records every frame instead of drawing it.
#[derive(Debug)]
pub(crate) struct RecordingRenderer {
    pub surface: FakeSurface,
    pub frames: Vec<RenderedFrame>,
    /// Fail the render call with this (0-based) index.
    pub fail_at: Option<usize>,
}

impl RecordingRenderer {
    pub fn new(surface: FakeSurface) -> Self {
        Self {
            surface,
            frames: Vec::new(),
            fail_at: None,
        }
    }

    pub fn render_calls(&self) -> usize {
        self.frames.len()
    }
}

impl DisplaySurface for RecordingRenderer {
    fn css_size(&self) -> (f64, f64) {
        self.surface.css_size()
    }

    fn pixel_ratio(&self) -> f64 {
        self.surface.pixel_ratio()
    }

    fn backing_size(&self) -> SurfaceSize {
        self.surface.backing_size()
    }

    fn set_backing_size(&mut self, size: SurfaceSize) {
        self.surface.set_backing_size(size)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()> {
        if self.fail_at == Some(self.frames.len()) {
            bail!("device lost");
        }
        self.frames.push(RenderedFrame {
            rotations: scene.meshes().iter().map(|m| m.rotation).collect(),
            aspect: camera.projection.aspect(),
            backing: self.surface.backing,
        });
        Ok(())
    }
}

/// Stands in for the display refresh: requests pile up until the test
/// delivers them with [`ManualScheduler::take`].
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    pending: u32,
    requested: u32,
}

impl ManualScheduler {
    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn requested(&self) -> u32 {
        self.requested
    }

    /// Consume one pending frame request, `false` if there is none.
    pub fn take(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending += 1;
        self.requested += 1;
    }
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {} but got {}",
        expected,
        actual
    );
}
