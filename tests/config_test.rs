use std::path::PathBuf;

use clap::Parser;
use love_donuts::{
    camera::CameraUniform,
    config::{DemoConfig, SceneKind},
    data_structures::instance::InstanceRaw,
    pipelines::light::LightUniform,
    resources::texture::procedural_matcap,
};

#[test]
fn defaults_show_a_hundred_donuts() {
    let config = DemoConfig::default();
    assert_eq!(config.scene, SceneKind::Donuts);
    assert_eq!(config.donut_count, 100);
    assert_eq!(config.seed, None);
    assert_eq!(config.asset_root, PathBuf::from("./assets"));
}

#[test]
fn no_flags_means_defaults() {
    let config = DemoConfig::try_parse_from(["love-donuts"]).expect("parses");
    assert_eq!(config, DemoConfig::default());
}

#[test]
fn flags_override_defaults() {
    let config = DemoConfig::try_parse_from([
        "love-donuts",
        "--scene",
        "Materials",
        "--assets",
        "/srv/assets",
        "--seed",
        "42",
        "--donuts",
        "12",
    ])
    .expect("parses");
    assert_eq!(config.scene, SceneKind::Materials);
    assert_eq!(config.asset_root, PathBuf::from("/srv/assets"));
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.donut_count, 12);
}

#[test]
fn scene_aliases_and_case_are_accepted() {
    let scene = |name: &str| {
        DemoConfig::try_parse_from(["love-donuts", "--scene", name])
            .ok()
            .map(|c| c.scene)
    };
    assert_eq!(scene("TEXT"), Some(SceneKind::Donuts));
    assert_eq!(scene("primitives"), Some(SceneKind::Materials));
    assert_eq!(scene("teapots"), None);
}

#[test]
fn bad_flags_are_rejected() {
    assert!(DemoConfig::try_parse_from(["love-donuts", "--seed", "-1"]).is_err());
    assert!(DemoConfig::try_parse_from(["love-donuts", "--donuts", "many"]).is_err());
}

#[cfg(unix)]
#[test]
fn unrelated_non_utf8_variables_do_not_stop_start_up() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    const NAME: &str = "LOVE_DONUTS_TEST_LATIN1";
    // SAFETY: no other test touches this variable.
    unsafe { std::env::set_var(NAME, OsStr::from_bytes(b"caf\xe9")) };
    let config = DemoConfig::try_parse_from(["love-donuts"]);
    unsafe { std::env::remove_var(NAME) };
    assert_eq!(config.ok(), Some(DemoConfig::default()));
}

#[test]
fn query_pairs_configure_the_web_build() {
    let config = DemoConfig::from_pairs([
        ("scene", "Materials"),
        ("seed", "7"),
        ("assets", "/my assets"),
        ("flag", ""),
    ]);
    assert_eq!(config.scene, SceneKind::Materials);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.asset_root, PathBuf::from("/my assets"));
    assert_eq!(config.donut_count, 100);
}

#[test]
fn bad_query_values_keep_the_default() {
    let config = DemoConfig::from_pairs([("scene", "teapots"), ("seed", "-1"), ("donuts", "x")]);
    assert_eq!(config, DemoConfig::default());
    let config = DemoConfig::from_pairs([("scene", " primitives ")]);
    assert_eq!(config.scene, SceneKind::Materials);
}

#[test]
fn procedural_matcap_is_a_lit_sphere() {
    let matcap = procedural_matcap(64, [1.0, 0.5, 0.25]);
    assert_eq!(matcap.dimensions(), (64, 64));
    let corner = matcap.get_pixel(0, 0);
    let lit = matcap.get_pixel(24, 20);
    let shadow = matcap.get_pixel(44, 50);
    assert!(lit[0] > shadow[0], "{:?} vs {:?}", lit, shadow);
    assert!(lit[0] > corner[0]);
    assert!(matcap.pixels().all(|p| p[3] == 255));
    assert_eq!(procedural_matcap(0, [1.0; 3]).dimensions(), (1, 1));
}

#[test]
fn default_lights_match_the_scene() {
    let light = LightUniform::default();
    assert_eq!(light.ambient_color, [1.0, 1.0, 1.0]);
    assert_eq!(light.ambient_intensity, 0.5);
    assert_eq!(light.position, [2.0, 3.0, 4.0]);
    assert_eq!(light.intensity, 0.5);
}

#[test]
fn uniform_layouts_match_the_shaders() {
    assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    assert_eq!(std::mem::size_of::<CameraUniform>(), 144);
    assert_eq!(std::mem::size_of::<InstanceRaw>(), 25 * 4);
}
