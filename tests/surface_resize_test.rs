use flow_cubes::surface::{
    DisplayMetrics, FALLBACK_PIXEL_RATIO, SurfaceSize, resize_to_display_size,
    target_backing_size,
};
use winit::dpi::PhysicalSize;

use crate::common::test_utils::FakeSurface;

mod common;

#[test]
fn should_scale_display_size_by_pixel_ratio() {
    let mut surface = FakeSurface::new((800.0, 600.0), 2.0, (300, 150));

    let resized = resize_to_display_size(&mut surface);

    assert_eq!(resized, Some((800.0, 600.0)));
    assert_eq!(surface.backing, SurfaceSize::new(1600, 1200));
}

#[test]
fn should_floor_fractional_backing_sizes() {
    assert_eq!(
        target_backing_size(333.3, 100.9, 1.5),
        Some(SurfaceSize::new(499, 151))
    );
}

#[test]
fn should_resize_only_once_for_unchanged_display_size() {
    let mut surface = FakeSurface::new((640.0, 480.0), 1.25, (1, 1));

    assert!(resize_to_display_size(&mut surface).is_some());
    assert!(resize_to_display_size(&mut surface).is_none());

    assert_eq!(surface.resizes(), &[SurfaceSize::new(800, 600)]);
}

#[test]
fn should_not_resize_when_backing_already_matches() {
    let mut surface = FakeSurface::new((400.0, 300.0), 1.0, (400, 300));

    assert!(resize_to_display_size(&mut surface).is_none());
    assert!(surface.resizes().is_empty());
}

#[test]
fn should_follow_display_size_changes() {
    let mut surface = FakeSurface::new((400.0, 300.0), 1.0, (400, 300));

    // e.g. the window was dragged onto a high density screen
    surface.ratio = 2.0;
    assert_eq!(resize_to_display_size(&mut surface), Some((400.0, 300.0)));
    // e.g. the window got narrower
    surface.css = (200.0, 300.0);
    assert_eq!(resize_to_display_size(&mut surface), Some((200.0, 300.0)));

    assert_eq!(
        surface.resizes(),
        &[SurfaceSize::new(800, 600), SurfaceSize::new(400, 600)]
    );
}

#[test]
fn should_skip_degenerate_display_sizes() {
    for css in [(0.0, 600.0), (800.0, 0.0), (-1.0, 600.0), (f64::NAN, 600.0), (800.0, f64::INFINITY)] {
        let mut surface = FakeSurface::new(css, 1.0, (300, 150));
        assert!(resize_to_display_size(&mut surface).is_none(), "{:?}", css);
        assert_eq!(surface.backing, SurfaceSize::new(300, 150));
    }
}

#[test]
fn should_skip_sizes_that_floor_to_nothing() {
    assert_eq!(target_backing_size(0.4, 100.0, 1.0), None);
}

#[test]
fn should_fall_back_for_unusable_pixel_ratios() {
    for ratio in [0.0, -2.0, f64::NAN] {
        assert_eq!(
            target_backing_size(800.0, 600.0, ratio),
            target_backing_size(800.0, 600.0, FALLBACK_PIXEL_RATIO)
        );
    }
    assert_eq!(
        target_backing_size(800.0, 600.0, 0.0),
        Some(SurfaceSize::new(800, 600))
    );
}

#[test]
fn should_map_window_back_to_its_physical_size() {
    for scale in [1.0, 1.1, 1.25, 1.333, 1.5, 1.75, 2.0, 2.25, 2.5, 3.0] {
        for phys in 1..4000u32 {
            let metrics = DisplayMetrics::from_physical(PhysicalSize::new(phys, phys), scale);
            assert_eq!(
                metrics.backing_size(),
                Some(SurfaceSize::new(phys, phys)),
                "{} px at scale {}",
                phys,
                scale
            );
        }
    }
}

#[test]
fn should_leave_a_window_sized_backing_buffer_alone() {
    // what the GPU context configures at start-up, e.g. 61 x 115 px at 175%
    let metrics = DisplayMetrics::from_physical(PhysicalSize::new(61, 115), 1.75);
    let backing = metrics.backing_size().unwrap();
    let mut surface = FakeSurface::new(metrics.css_size(), metrics.pixel_ratio, (61, 115));

    assert_eq!(backing, SurfaceSize::new(61, 115));
    assert!(resize_to_display_size(&mut surface).is_none());
    assert!(surface.resizes().is_empty());
}

#[test]
fn should_fall_back_for_invalid_scale_factors() {
    let metrics = DisplayMetrics::from_physical(PhysicalSize::new(800, 600), 0.0);

    assert_eq!(metrics.pixel_ratio, FALLBACK_PIXEL_RATIO);
    assert_eq!(metrics.css_size(), (800.0, 600.0));
    assert_eq!(metrics.backing_size(), Some(SurfaceSize::new(800, 600)));
}

#[test]
fn should_have_no_backing_size_while_minimised() {
    let metrics = DisplayMetrics::from_physical(PhysicalSize::new(0, 0), 2.0);

    assert_eq!(metrics.backing_size(), None);
}
