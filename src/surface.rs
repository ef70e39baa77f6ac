//! Backing-buffer synchronisation.
//!
//! A rendering surface has two sizes: the size it is *displayed* at (CSS or
//! logical pixels) and the size of the raster it is *drawn* into (the backing
//! buffer, physical pixels). They drift apart whenever the window is resized,
//! the page layout changes or the surface moves to a screen with a different
//! pixel density. [`resize_to_display_size`] brings them back in line and is
//! meant to run right before every frame.

/// Size of a backing buffer in physical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl From<(u32, u32)> for SurfaceSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// Anything that is displayed at one size but rendered at another.
///
/// Implemented by the GPU [`Context`](crate::context::Context) for real windows
/// and by fakes in tests.
pub trait DisplaySurface {
    /// Displayed size in CSS / logical pixels.
    fn css_size(&self) -> (f64, f64);

    /// Physical pixels per CSS pixel.
    fn pixel_ratio(&self) -> f64;

    /// Current size of the backing buffer.
    fn backing_size(&self) -> SurfaceSize;

    /// Reallocate the backing buffer. Callers only pass non-zero sizes.
    fn set_backing_size(&mut self, size: SurfaceSize);
}

/// Pixel ratio used when the platform reports none or nonsense.
pub const FALLBACK_PIXEL_RATIO: f64 = 1.0;

// Products this close to an integer are rounding noise from a
// physical -> logical -> physical round trip.
const SNAP_EPSILON: f64 = 1e-6;

fn floor_pixels(v: f64) -> f64 {
    let nearest = v.round();
    if (v - nearest).abs() < SNAP_EPSILON {
        nearest
    } else {
        v.floor()
    }
}

fn usable(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// How a window with a given physical size is displayed.
///
/// Native windows report physical pixels plus a scale factor, the resize
/// check works on logical (CSS) pixels. Both the GPU context and its
/// surface configuration derive their sizes from here so they always agree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMetrics {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl DisplayMetrics {
    pub fn from_physical(physical: winit::dpi::PhysicalSize<u32>, scale_factor: f64) -> Self {
        let pixel_ratio = if usable(scale_factor) {
            scale_factor
        } else {
            FALLBACK_PIXEL_RATIO
        };
        Self {
            css_width: physical.width as f64 / pixel_ratio,
            css_height: physical.height as f64 / pixel_ratio,
            pixel_ratio,
        }
    }

    pub fn css_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    /// The backing size the resize check will settle on, `None` while the
    /// window is minimised.
    pub fn backing_size(&self) -> Option<SurfaceSize> {
        target_backing_size(self.css_width, self.css_height, self.pixel_ratio)
    }
}

/// The backing size a surface displayed at `css_width` x `css_height` should
/// have at the given pixel ratio.
///
/// Returns `None` for degenerate display sizes (zero, negative or not finite)
/// or when flooring yields an empty buffer. A ratio that is not a positive
/// finite number is replaced by [`FALLBACK_PIXEL_RATIO`]. Products within
/// float noise of a whole pixel count as that pixel.
pub fn target_backing_size(css_width: f64, css_height: f64, pixel_ratio: f64) -> Option<SurfaceSize> {
    if !usable(css_width) || !usable(css_height) {
        return None;
    }
    let ratio = if usable(pixel_ratio) {
        pixel_ratio
    } else {
        FALLBACK_PIXEL_RATIO
    };
    let width = floor_pixels(css_width * ratio);
    let height = floor_pixels(css_height * ratio);
    if width < 1.0 || height < 1.0 {
        return None;
    }
    Some(SurfaceSize {
        width: width.min(u32::MAX as f64) as u32,
        height: height.min(u32::MAX as f64) as u32,
    })
}

/// Resize the backing buffer of `surface` if it no longer matches the
/// displayed size.
///
/// Returns the displayed CSS size when a resize happened so the caller can
/// derive the new aspect ratio from it, `None` otherwise. Calling this twice
/// without the display size changing resizes at most once.
pub fn resize_to_display_size<S: DisplaySurface + ?Sized>(surface: &mut S) -> Option<(f64, f64)> {
    let (css_width, css_height) = surface.css_size();
    let target = match target_backing_size(css_width, css_height, surface.pixel_ratio()) {
        Some(target) => target,
        None => {
            log::debug!(
                "Skipping resize for degenerate display size {}x{}",
                css_width,
                css_height
            );
            return None;
        }
    };
    if surface.backing_size() == target {
        return None;
    }
    log::debug!(
        "Resizing backing buffer from {:?} to {:?}",
        surface.backing_size(),
        target
    );
    surface.set_backing_size(target);
    Some((css_width, css_height))
}
