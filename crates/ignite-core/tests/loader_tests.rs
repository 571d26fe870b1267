// glTF decoding and candidate-list loading.

mod common;

use common::*;
use glam::Vec3;
use ignite_core::*;

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn glb_decodes_to_asset() {
    let bytes = cuboid_glb(Vec3::ZERO, Vec3::new(2.0, 4.0, 2.0));
    let gltf = ignite_core::decode::parse(&bytes).expect("parse");
    assert!(ignite_core::decode::external_buffer_uris(&gltf).is_empty());
    let asset = ignite_core::decode::build_asset(&gltf, &Default::default()).expect("build");

    assert_eq!(asset.node_count(), 2);
    let surfaces = asset.surfaces();
    assert_eq!(surfaces.len(), 1);
    let bounds = asset.world_bounds();
    assert!((bounds.size() - Vec3::new(2.0, 4.0, 2.0)).length() < 1e-6);

    let flame = asset.find_node("flame").expect("flame node");
    assert!((asset.node_position(flame) - Vec3::new(0.0, 4.0, 0.0)).length() < 1e-6);

    let mesh_id = surfaces[0].mesh;
    let mesh = asset.mesh(mesh_id).expect("mesh");
    assert_eq!(mesh.indices.len(), 36);
    match mesh.material.and_then(|m| asset.material(m)) {
        Some(Material::Standard(m)) => {
            assert!((m.emissive - Vec3::new(0.0, 0.1, 0.0)).length() < 1e-6);
            assert_eq!(m.emissive_intensity, 1.0);
        }
        other => panic!("expected standard material, got {other:?}"),
    }
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let err = ignite_core::decode::parse(b"definitely not gltf").expect_err("garbage");
    assert!(matches!(err, LoadError::Gltf(_)));
}

#[test]
fn first_candidate_that_loads_wins() {
    let source = MapSource::default()
        .with("a.glb", b"corrupt".to_vec())
        .with("b.glb", cuboid_glb(Vec3::ZERO, Vec3::new(2.0, 4.0, 2.0)))
        .with("c.glb", cuboid_glb(Vec3::ZERO, Vec3::ONE));
    let mut events = Vec::new();
    let loaded = pollster::block_on(load_first(
        &source,
        &urls(&["a.glb", "b.glb", "c.glb"]),
        |e| {
            events.push(match e {
                LoadEvent::Attempt { url, .. } => format!("try {url}"),
                LoadEvent::Failed { url, .. } => format!("fail {url}"),
                LoadEvent::Loaded { url } => format!("ok {url}"),
            })
        },
    ))
    .expect("loaded");

    assert_eq!(loaded.url, "b.glb");
    assert_eq!(events, ["try a.glb", "fail a.glb", "try b.glb", "ok b.glb"]);
    assert_eq!(*source.requested.borrow(), ["a.glb", "b.glb"]);
    assert!((loaded.asset.world_bounds().size() - Vec3::new(2.0, 4.0, 2.0)).length() < 1e-6);
}

#[test]
fn missing_files_are_skipped() {
    let source = MapSource::default().with("models/ok.glb", cuboid_glb(Vec3::ZERO, Vec3::ONE));
    let loaded = pollster::block_on(load_first(
        &source,
        &urls(&["models/missing.glb", "models/ok.glb"]),
        |_| {},
    ))
    .expect("loaded");
    assert_eq!(loaded.url, "models/ok.glb");
}

#[test]
fn exhausted_candidates_report_every_url() {
    let source = MapSource::default().with("x.glb", vec![0; 16]);
    let tried = urls(&["x.glb", "y.glb"]);
    let err = pollster::block_on(load_first(&source, &tried, |_| {})).expect_err("none load");
    match err {
        LoadError::Exhausted { tried: reported } => assert_eq!(reported, tried),
        other => panic!("expected exhausted, got {other:?}"),
    }
}

#[test]
fn empty_candidate_list_is_an_error() {
    let source = MapSource::default();
    let err = pollster::block_on(load_first(&source, &[], |_| {})).expect_err("empty");
    assert!(matches!(err, LoadError::NoCandidates));
    assert!(source.requested.borrow().is_empty());
}

#[test]
fn external_buffers_resolve_next_to_the_asset() {
    let (min, max) = (Vec3::splat(-1.0), Vec3::splat(1.0));
    let json = cuboid_json(min, max, Some("house.bin"));
    let source = MapSource::default()
        .with(
            "assets/house.gltf",
            serde_json::to_vec(&json).expect("json"),
        )
        .with("assets/house.bin", cuboid_bin(min, max));
    let asset = pollster::block_on(load_asset(&source, "assets/house.gltf")).expect("loaded");
    assert_eq!(*source.requested.borrow(), ["assets/house.gltf", "assets/house.bin"]);
    assert!((asset.world_bounds().size() - Vec3::splat(2.0)).length() < 1e-6);
}

fn cyclic_gltf() -> Vec<u8> {
    let json = serde_json::json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "a", "children": [1] },
            { "name": "b", "children": [0] }
        ]
    });
    serde_json::to_vec(&json).expect("json")
}

#[test]
fn cyclic_node_hierarchy_is_rejected() {
    let bytes = cyclic_gltf();
    let gltf = ignite_core::decode::parse(&bytes).expect("parse");
    let err = ignite_core::decode::build_asset(&gltf, &Default::default()).expect_err("cycle");
    assert!(matches!(err, LoadError::NodeCycle { .. }));
}

#[test]
fn cyclic_candidate_falls_through() {
    let source = MapSource::default()
        .with("loop.gltf", cyclic_gltf())
        .with("ok.glb", cuboid_glb(Vec3::ZERO, Vec3::ONE));
    let loaded = pollster::block_on(load_first(&source, &urls(&["loop.gltf", "ok.glb"]), |_| {}))
        .expect("second loads");
    assert_eq!(loaded.url, "ok.glb");
}

#[test]
fn missing_external_buffer_fails_that_candidate() {
    let json = cuboid_json(Vec3::ZERO, Vec3::ONE, Some("gone.bin"));
    let source = MapSource::default().with("m.gltf", serde_json::to_vec(&json).expect("json"));
    let err = pollster::block_on(load_asset(&source, "m.gltf")).expect_err("no buffer");
    assert!(matches!(err, LoadError::Fetch { .. }));
}

#[test]
fn relative_uris_resolve_against_base_directory() {
    assert_eq!(resolve_relative("./assets/a.glb", "a.bin"), "./assets/a.bin");
    assert_eq!(resolve_relative("a.gltf", "a.bin"), "a.bin");
    assert_eq!(
        resolve_relative("./assets/a.gltf", "https://cdn.example/a.bin"),
        "https://cdn.example/a.bin"
    );
    assert_eq!(resolve_relative("./assets/a.gltf", "/abs/a.bin"), "/abs/a.bin");
}
