// Viewer context: load, frame, pick, ignite and counter gating together.

use glam::{Mat4, Vec2, Vec3, Vec4};
use ignite_core::constants::EFFECT_LIFE_MS;
use ignite_core::*;

const VIEW: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

// Off-centre so the pick ray stays clear of box edges.
const ON_MODEL: Vec2 = Vec2::new(360.0, 330.0);

fn house(with_flame: bool) -> (LoadedAsset, MaterialId) {
    let mut b = Asset::builder();
    let wall = b.material(Material::Standard(StandardMaterial {
        base_color: Vec4::new(0.8, 0.7, 0.6, 1.0),
        emissive: Vec3::ZERO,
        emissive_intensity: 1.0,
    }));
    let mesh = b.mesh(Mesh::cuboid(Vec3::ZERO, Vec3::new(2.0, 4.0, 2.0), Some(wall)));
    let root = b.node(Some("house"), Mat4::IDENTITY, vec![mesh], None);
    if with_flame {
        let flame_mesh = b.mesh(Mesh::cuboid(
            Vec3::splat(-0.1),
            Vec3::splat(0.1),
            Some(wall),
        ));
        b.node(
            Some("flame"),
            Mat4::from_translation(Vec3::new(1.0, 4.0, 1.0)),
            vec![flame_mesh],
            Some(root),
        );
    }
    (
        LoadedAsset {
            url: String::from("./assets/house.glb"),
            asset: b.build(),
        },
        wall,
    )
}

fn emissive_of(ctx: &ViewerContext, id: MaterialId) -> (Vec3, f32) {
    match ctx.asset().and_then(|a| a.material(id)) {
        Some(Material::Standard(m)) => (m.emissive, m.emissive_intensity),
        other => panic!("not a standard material: {other:?}"),
    }
}

#[test]
fn pointer_before_load_does_nothing() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    assert_eq!(ctx.pointer_down(ON_MODEL, 0.0), PointerOutcome::NotReady);
    assert!(ctx.ignite_fallback(0.0).is_none());
    assert_eq!(ctx.status().status_text(), "Ready");
}

#[test]
fn attach_frames_asset_and_hides_companion() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    let (loaded, _) = house(true);
    ctx.attach_asset(loaded);

    assert_eq!(ctx.asset_generation(), 1);
    assert_eq!(ctx.asset_url(), Some("./assets/house.glb"));
    let framing = ctx.framing().expect("framed");
    // the flame cube pokes 0.1 above the roof
    assert!((framing.size.y - 4.1).abs() < 1e-4);
    let bounds = ctx.framed_bounds().expect("bounds");
    assert!((bounds.max_dim() - 0.8).abs() < 1e-4);

    let asset = ctx.asset().expect("asset");
    let flame = asset.find_node("flame").expect("flame");
    assert!(!asset.node(flame).expect("node").visible);
    assert_eq!(ctx.status().status_text(), "Loaded ./assets/house.glb");
}

#[test]
fn missing_companion_is_reported() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    let (loaded, _) = house(false);
    ctx.attach_asset(loaded);
    assert_eq!(ctx.status().warnings().len(), 1);
    assert!(ctx.status().status_text().contains("flame"));
}

#[test]
fn click_on_model_ignites_and_counts_once_per_window() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    let (loaded, wall) = house(true);
    ctx.attach_asset(loaded);
    ctx.tick(0.0);
    let before = emissive_of(&ctx, wall);

    let first = ctx.pointer_down(ON_MODEL, 1_000.0);
    let PointerOutcome::Ignited {
        hit,
        effect,
        increment,
    } = first
    else {
        panic!("expected ignite, got {first:?}");
    };
    assert_eq!(effect, TriggerOutcome::Started);
    assert!(increment);
    assert_eq!(hit.material, Some(wall));
    assert!(ctx.effect().marker().visible);
    assert_eq!(ctx.effect().marker().position, hit.point);
    assert!((emissive_of(&ctx, wall).1 - 2.0).abs() < 1e-6);

    // companion shows while running
    let flame = ctx.asset().and_then(|a| a.find_node("flame")).expect("flame");
    assert!(ctx.asset().and_then(|a| a.node(flame)).expect("node").visible);

    let second = ctx.pointer_down(ON_MODEL, 2_000.0);
    match second {
        PointerOutcome::Ignited {
            effect, increment, ..
        } => {
            assert_eq!(effect, TriggerOutcome::Restarted);
            assert!(!increment);
        }
        other => panic!("expected ignite, got {other:?}"),
    }
    assert!(ctx.status().active_toast(2_000.0).is_some());

    // runs to completion and restores
    let phase = ctx.tick(2_000.0 + EFFECT_LIFE_MS);
    assert_eq!(phase, EffectPhase::Finished);
    assert_eq!(emissive_of(&ctx, wall), before);
    assert!(!ctx.effect().marker().visible);
    assert!(!ctx.asset().and_then(|a| a.node(flame)).expect("node").visible);

    // beyond the cooldown window the next ignition counts again
    match ctx.pointer_down(ON_MODEL, 11_500.0) {
        PointerOutcome::Ignited { increment, .. } => assert!(increment),
        other => panic!("expected ignite, got {other:?}"),
    }
}

#[test]
fn click_on_empty_space_does_nothing() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    let (loaded, wall) = house(true);
    ctx.attach_asset(loaded);
    let before = emissive_of(&ctx, wall);
    assert_eq!(ctx.pointer_down(Vec2::new(2.0, 2.0), 0.0), PointerOutcome::Missed);
    assert!(!ctx.effect().is_active());
    assert_eq!(emissive_of(&ctx, wall), before);
    // a miss does not consume the cooldown
    assert!(ctx.gate_increment(1.0));
}

#[test]
fn fallback_ignites_at_companion() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    let (loaded, wall) = house(true);
    ctx.attach_asset(loaded);
    let before = emissive_of(&ctx, wall);
    let outcome = ctx.ignite_fallback(0.0).expect("asset loaded");
    let asset = ctx.asset().expect("asset");
    let flame = asset.find_node("flame").expect("flame");
    assert!((outcome.point - asset.node_position(flame)).length() < 1e-6);
    assert!(outcome.increment);
    // no surface was clicked, nothing highlighted
    assert_eq!(emissive_of(&ctx, wall), before);
}

#[test]
fn fallback_without_companion_uses_top_of_bounds() {
    let config = ViewerConfig {
        companion_node: None,
        ..ViewerConfig::default()
    };
    let mut ctx = ViewerContext::new(config, VIEW);
    let (loaded, _) = house(false);
    ctx.attach_asset(loaded);
    assert!(ctx.status().warnings().is_empty());
    let point = ctx.fallback_point();
    assert!(point.x.abs() < 1e-5 && point.z.abs() < 1e-5);
    assert!((point.y - 0.4).abs() < 1e-5);
}

#[test]
fn pick_increments_can_be_disabled() {
    let mut config = ViewerConfig::default();
    config.counter.increment_on_pick = false;
    let mut ctx = ViewerContext::new(config, VIEW);
    let (loaded, _) = house(true);
    ctx.attach_asset(loaded);
    match ctx.pointer_down(ON_MODEL, 0.0) {
        PointerOutcome::Ignited { increment, .. } => assert!(!increment),
        other => panic!("expected ignite, got {other:?}"),
    }
    assert!(ctx.ignite_fallback(100.0).expect("loaded").increment);
}

#[test]
fn load_failure_sets_status() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    ctx.on_load_event(&LoadEvent::Attempt {
        url: "./a.glb",
        index: 0,
        total: 2,
    });
    assert_eq!(ctx.status().status_text(), "Loading ./a.glb (1/2)…");
    ctx.load_failed(&LoadError::Exhausted {
        tried: vec![String::from("./a.glb"), String::from("./b.glb")],
    });
    assert_eq!(ctx.status().status_text(), "Could not load model");
    assert!(ctx.asset().is_none());
}

#[test]
fn shutdown_restores_running_highlight() {
    let mut ctx = ViewerContext::new(ViewerConfig::default(), VIEW);
    let (loaded, wall) = house(true);
    ctx.attach_asset(loaded);
    let before = emissive_of(&ctx, wall);
    ctx.pointer_down(ON_MODEL, 0.0);
    ctx.shutdown();
    assert_eq!(emissive_of(&ctx, wall), before);
    assert!(!ctx.effect().is_active());
}
