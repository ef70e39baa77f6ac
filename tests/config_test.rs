use flow_cubes::{
    DemoConfig, Preset, ResizePolicy,
    config::{CubeSpec, srgb_hex_to_linear},
};

#[test]
fn should_parse_preset_names() {
    assert_eq!("basic".parse::<Preset>().unwrap(), Preset::Basic);
    assert_eq!(" Responsive ".parse::<Preset>().unwrap(), Preset::Responsive);
    assert!("fancy".parse::<Preset>().is_err());
    assert_eq!(Preset::Basic.to_string(), "basic");
}

#[test]
fn should_describe_both_variants() {
    let basic = DemoConfig::basic();
    let responsive = DemoConfig::responsive();

    assert_eq!(basic.resize, ResizePolicy::Fixed);
    assert_eq!(basic.camera.fov_deg, 90.0);
    assert_eq!(basic.camera.far, 5.0);
    assert_eq!(basic.light.position, [-1.0, 3.0, 6.0]);
    assert_eq!(basic.clear_colour(), wgpu::Color::BLACK);

    assert_eq!(responsive.resize, ResizePolicy::Responsive);
    assert_eq!(responsive.camera.fov_deg, 75.0);
    assert_eq!(responsive.camera.far, 120.0);
    assert_eq!(responsive.light.position, [-1.0, 2.0, 4.0]);
    assert_eq!(responsive.background, Some(0xaaaaaa));

    for config in [&basic, &responsive] {
        assert_eq!(config.camera.aspect, 2.0);
        assert_eq!(config.camera.position, [0.0, 0.0, 2.0]);
        assert_eq!(config.light.intensity, 3.0);
        assert_eq!(
            config.cubes,
            vec![
                CubeSpec::new(0x44aa88, 0.0),
                CubeSpec::new(0x8844aa, -2.0),
                CubeSpec::new(0xaa8844, 2.0),
            ]
        );
    }
    assert_eq!(DemoConfig::default(), responsive);
}

#[test]
fn should_convert_srgb_hex_to_linear() {
    assert_eq!(srgb_hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
    for c in srgb_hex_to_linear(0xffffff) {
        assert!((c - 1.0).abs() < 1e-6);
    }
    let [r, g, b] = srgb_hex_to_linear(0xaaaaaa);
    assert!((r - 0.4020).abs() < 1e-3);
    assert_eq!(r, g);
    assert_eq!(g, b);
}
