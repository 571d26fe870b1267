// Ignite effect lifecycle: marker, light, highlight and restore.

use glam::{Mat4, Vec3, Vec4};
use ignite_core::constants::{rgb_hex, EFFECT_LIFE_MS, MATCH_LIGHT_FLOOR, MATCH_LIGHT_INTENSITY};
use ignite_core::*;

struct Fixture {
    asset: Asset,
    lit: MaterialId,
    flat: MaterialId,
    companion: NodeId,
}

fn fixture() -> Fixture {
    let mut b = Asset::builder();
    let lit = b.material(Material::Standard(StandardMaterial {
        base_color: Vec4::ONE,
        emissive: Vec3::new(0.1, 0.2, 0.3),
        emissive_intensity: 0.7,
    }));
    let flat = b.material(Material::Basic {
        color: Vec4::new(1.0, 0.0, 0.0, 1.0),
    });
    let m1 = b.mesh(Mesh::cuboid(Vec3::ZERO, Vec3::ONE, Some(lit)));
    let m2 = b.mesh(Mesh::cuboid(Vec3::splat(2.0), Vec3::splat(3.0), Some(flat)));
    let root = b.node(Some("house"), Mat4::IDENTITY, vec![m1, m2], None);
    let companion = b.node(
        Some("flame"),
        Mat4::from_translation(Vec3::new(0.0, 1.5, 0.0)),
        vec![],
        Some(root),
    );
    let mut asset = b.build();
    asset.set_subtree_visible(companion, false);
    Fixture {
        asset,
        lit,
        flat,
        companion,
    }
}

fn emissive(asset: &Asset, id: MaterialId) -> (Vec3, f32) {
    match asset.material(id) {
        Some(Material::Standard(m)) => (m.emissive, m.emissive_intensity),
        other => panic!("not a standard material: {other:?}"),
    }
}

#[test]
fn trigger_shows_marker_and_full_light() {
    let mut f = fixture();
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    let p = Vec3::new(0.5, 1.0, 0.5);
    let outcome = player.trigger(1000.0, p, Some(f.lit), &mut f.asset);
    assert_eq!(outcome, TriggerOutcome::Started);

    let phase = player.update(1000.0, &mut f.asset);
    assert_eq!(phase, EffectPhase::Running { progress: 0.0 });
    assert!(player.marker().visible);
    assert_eq!(player.marker().position, p);
    assert!(player.light().visible);
    assert_eq!(player.light().position, p);
    assert!((player.light().intensity - MATCH_LIGHT_INTENSITY).abs() < 1e-6);
    assert!((player.light().color - rgb_hex(0xffc46b)).length() < 1e-6);
}

#[test]
fn highlight_applies_while_running() {
    let mut f = fixture();
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    player.trigger(0.0, Vec3::ZERO, Some(f.lit), &mut f.asset);
    let (color, intensity) = emissive(&f.asset, f.lit);
    assert!((color - rgb_hex(0xffa000)).length() < 1e-6);
    assert!((intensity - 2.0).abs() < 1e-6);
}

#[test]
fn light_decays_linearly_towards_floor() {
    let mut f = fixture();
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    player.trigger(0.0, Vec3::ZERO, None, &mut f.asset);

    let half = player.update(EFFECT_LIFE_MS * 0.5, &mut f.asset);
    match half {
        EffectPhase::Running { progress } => assert!((progress - 0.5).abs() < 1e-6),
        other => panic!("expected running, got {other:?}"),
    }
    let expected = MATCH_LIGHT_INTENSITY * (1.0 - 0.5 * (1.0 - MATCH_LIGHT_FLOOR));
    assert!((player.light().intensity - expected).abs() < 1e-5);

    let mut last = player.light().intensity;
    for step in 6..10 {
        player.update(EFFECT_LIFE_MS * step as f64 / 10.0, &mut f.asset);
        assert!(player.light().intensity < last);
        last = player.light().intensity;
    }
}

#[test]
fn marker_pulses_around_base_scale() {
    let mut f = fixture();
    let params = EffectParams::default();
    let base = params.marker_scale;
    let amp = params.pulse_amplitude;
    let mut player = EffectPlayer::new(params, TriggerPolicy::Restart);
    player.trigger(0.0, Vec3::ZERO, None, &mut f.asset);
    let mut saw_change = false;
    for t in (0..1400).step_by(37) {
        player.update(t as f64, &mut f.asset);
        let s = player.marker().scale;
        assert!(s.x >= base.x * (1.0 - amp) - 1e-6 && s.x <= base.x * (1.0 + amp) + 1e-6);
        assert!((s.y / s.x - base.y / base.x).abs() < 1e-4);
        saw_change |= (s.x - base.x).abs() > 1e-4;
    }
    assert!(saw_change);
}

#[test]
fn completion_hides_and_restores_exactly() {
    let mut f = fixture();
    let before = emissive(&f.asset, f.lit);
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    player.trigger(500.0, Vec3::ZERO, Some(f.lit), &mut f.asset);

    assert_eq!(
        player.update(500.0 + EFFECT_LIFE_MS, &mut f.asset),
        EffectPhase::Finished
    );
    assert!(!player.marker().visible);
    assert!(!player.light().visible);
    assert!(!player.is_active());
    assert_eq!(emissive(&f.asset, f.lit), before);

    // idle afterwards
    assert_eq!(player.update(5000.0, &mut f.asset), EffectPhase::Idle);
}

#[test]
fn unlit_material_is_not_highlighted() {
    let mut f = fixture();
    let before = f.asset.material(f.flat).cloned();
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    player.trigger(0.0, Vec3::ZERO, Some(f.flat), &mut f.asset);
    assert!(player.marker().visible);
    match player.state() {
        EffectState::Active(instance) => assert!(instance.highlight.is_none()),
        EffectState::Idle => panic!("expected active"),
    }
    assert_eq!(f.asset.material(f.flat).cloned(), before);
}

#[test]
fn restart_restores_previous_highlight_first() {
    let mut f = fixture();
    let before = emissive(&f.asset, f.lit);
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    player.trigger(0.0, Vec3::ZERO, Some(f.lit), &mut f.asset);
    let second = Vec3::new(1.0, 2.0, 3.0);
    let outcome = player.trigger(300.0, second, Some(f.lit), &mut f.asset);
    assert_eq!(outcome, TriggerOutcome::Restarted);
    assert_eq!(player.marker().position, second);

    // the second snapshot must be the original values, not the highlight
    match player.state() {
        EffectState::Active(instance) => {
            let record = instance.highlight.expect("highlight");
            assert_eq!((record.previous_color, record.previous_intensity), before);
            assert_eq!(instance.start_ms, 300.0);
        }
        EffectState::Idle => panic!("expected active"),
    }

    player.update(300.0 + EFFECT_LIFE_MS, &mut f.asset);
    assert_eq!(emissive(&f.asset, f.lit), before);
}

#[test]
fn debounce_ignores_triggers_while_running() {
    let mut f = fixture();
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Debounce);
    let first = Vec3::new(0.1, 0.2, 0.3);
    assert_eq!(
        player.trigger(0.0, first, None, &mut f.asset),
        TriggerOutcome::Started
    );
    assert_eq!(
        player.trigger(100.0, Vec3::ONE, None, &mut f.asset),
        TriggerOutcome::Ignored
    );
    assert_eq!(player.marker().position, first);

    player.update(EFFECT_LIFE_MS, &mut f.asset);
    assert_eq!(
        player.trigger(EFFECT_LIFE_MS + 1.0, Vec3::ONE, None, &mut f.asset),
        TriggerOutcome::Started
    );
}

#[test]
fn companion_node_follows_effect_visibility() {
    let mut f = fixture();
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    player.set_companion(Some(f.companion));
    assert!(!f.asset.node(f.companion).expect("node").visible);

    player.trigger(0.0, Vec3::ZERO, None, &mut f.asset);
    assert!(f.asset.node(f.companion).expect("node").visible);

    player.update(EFFECT_LIFE_MS, &mut f.asset);
    assert!(!f.asset.node(f.companion).expect("node").visible);
}

#[test]
fn cancel_restores_mid_flight() {
    let mut f = fixture();
    let before = emissive(&f.asset, f.lit);
    let mut player = EffectPlayer::new(EffectParams::default(), TriggerPolicy::Restart);
    player.trigger(0.0, Vec3::ZERO, Some(f.lit), &mut f.asset);
    player.update(200.0, &mut f.asset);
    player.cancel(&mut f.asset);
    assert!(!player.is_active());
    assert!(!player.marker().visible);
    assert_eq!(emissive(&f.asset, f.lit), before);
}

#[test]
fn progress_is_clamped() {
    assert_eq!(progress(0.0, 100.0, 1500.0), 0.0);
    assert_eq!(progress(100.0, 100.0, 1500.0), 0.0);
    assert!((progress(850.0, 100.0, 1500.0) - 0.5).abs() < 1e-6);
    assert_eq!(progress(99_999.0, 100.0, 1500.0), 1.0);
    assert_eq!(progress(5.0, 0.0, 0.0), 1.0);
}
