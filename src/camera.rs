//! Perspective camera, its projection and the GPU uniform derived from both.

use cgmath::{Matrix4, Point3, Rad, Vector3, perspective};

use crate::config::CameraConfig;

// wgpu's clip space has z in [0, 1] while cgmath produces OpenGL's [-1, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A camera that looks down the negative z axis from `position`.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub projection: Projection,
}

impl Camera {
    pub fn new(position: Point3<f32>, projection: Projection) -> Self {
        Self {
            position,
            projection,
        }
    }

    pub fn calc_view(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, -Vector3::unit_z(), Vector3::unit_y())
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.projection.matrix() * self.calc_view()
    }
}

impl From<&CameraConfig> for Camera {
    fn from(config: &CameraConfig) -> Self {
        let projection = Projection::new(
            config.aspect,
            cgmath::Deg(config.fov_deg),
            config.near,
            config.far,
        );
        Camera::new(config.position.into(), projection)
    }
}

/// Perspective projection with a mutable aspect ratio.
///
/// The matrix is cached: after [`set_aspect`](Self::set_aspect) it keeps the
/// old value until [`update`](Self::update) is called.
#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
    matrix: Matrix4<f32>,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(aspect: f32, fovy: F, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect,
            fovy: fovy.into(),
            znear,
            zfar,
            matrix: Matrix4::from_scale(1.0),
        };
        projection.update();
        projection
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Recompute the projection matrix from the current parameters.
    pub fn update(&mut self) {
        self.matrix =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // vec4 to keep the uniform 16 byte aligned
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = camera.view_proj().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform, its buffer and bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: &Camera) -> Self {
        use wgpu::util::DeviceExt;

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, camera: &Camera) {
        self.uniform.update_view_proj(camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
