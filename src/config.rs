//! Demo configuration.
//!
//! Everything the scene is built from lives in [`DemoConfig`]. Two presets are
//! provided: [`Preset::Basic`] renders at a fixed aspect ratio without ever
//! looking at the displayed size, [`Preset::Responsive`] keeps the backing
//! buffer and camera in sync with the displayed size every frame.

use std::{fmt, str::FromStr};

use anyhow::anyhow;

/// Environment variable that selects the preset for the binary.
pub const PRESET_ENV: &str = "FLOW_CUBES_PRESET";

/// What happens when the displayed size of the surface changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Camera aspect stays at its configured value.
    Fixed,
    /// Backing buffer and camera aspect follow the displayed size.
    Responsive,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightConfig {
    /// sRGB hex colour, e.g. `0xffffff`.
    pub colour: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

/// One cube: sRGB hex colour and offset along the x axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeSpec {
    pub colour: u32,
    pub x: f32,
}

impl CubeSpec {
    pub const fn new(colour: u32, x: f32) -> Self {
        Self { colour, x }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub title: String,
    pub camera: CameraConfig,
    pub light: LightConfig,
    /// Clear colour as sRGB hex. `None` clears to black.
    pub background: Option<u32>,
    /// Width, height and depth of the shared box geometry.
    pub box_size: [f32; 3],
    pub cubes: Vec<CubeSpec>,
    pub resize: ResizePolicy,
}

const CUBES: [CubeSpec; 3] = [
    CubeSpec::new(0x44aa88, 0.0),
    CubeSpec::new(0x8844aa, -2.0),
    CubeSpec::new(0xaa8844, 2.0),
];

impl DemoConfig {
    pub fn basic() -> Self {
        Self {
            title: "flow-cubes".to_string(),
            camera: CameraConfig {
                fov_deg: 90.0,
                aspect: 2.0,
                near: 0.1,
                far: 5.0,
                position: [0.0, 0.0, 2.0],
            },
            light: LightConfig {
                colour: 0xffffff,
                intensity: 3.0,
                position: [-1.0, 3.0, 6.0],
            },
            background: None,
            box_size: [1.0, 1.0, 1.0],
            cubes: CUBES.to_vec(),
            resize: ResizePolicy::Fixed,
        }
    }

    pub fn responsive() -> Self {
        Self {
            title: "flow-cubes (responsive)".to_string(),
            camera: CameraConfig {
                fov_deg: 75.0,
                aspect: 2.0,
                near: 0.1,
                far: 120.0,
                position: [0.0, 0.0, 2.0],
            },
            light: LightConfig {
                colour: 0xffffff,
                intensity: 3.0,
                position: [-1.0, 2.0, 4.0],
            },
            background: Some(0xaaaaaa),
            box_size: [1.0, 1.0, 1.0],
            cubes: CUBES.to_vec(),
            resize: ResizePolicy::Responsive,
        }
    }

    /// Read the preset from [`PRESET_ENV`], defaulting to the responsive one.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(PRESET_ENV) {
            Ok(name) => Ok(name.parse::<Preset>()?.config()),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(anyhow!("{} is not valid unicode: {}", PRESET_ENV, e)),
        }
    }

    /// Clear colour in linear space for the render pass.
    pub fn clear_colour(&self) -> wgpu::Color {
        match self.background {
            Some(hex) => {
                let [r, g, b] = srgb_hex_to_linear(hex);
                wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: 1.0,
                }
            }
            None => wgpu::Color::BLACK,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self::responsive()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Basic,
    Responsive,
}

impl Preset {
    pub fn config(self) -> DemoConfig {
        match self {
            Preset::Basic => DemoConfig::basic(),
            Preset::Responsive => DemoConfig::responsive(),
        }
    }
}

impl FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Preset::Basic),
            "responsive" => Ok(Preset::Responsive),
            other => Err(anyhow!(
                "unknown preset '{}', expected 'basic' or 'responsive'",
                other
            )),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Basic => f.write_str("basic"),
            Preset::Responsive => f.write_str("responsive"),
        }
    }
}

/// Convert a `0xRRGGBB` sRGB colour to linear RGB in `[0, 1]`.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0)]
}
