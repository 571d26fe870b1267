// Viewer configuration parsing and status text.

use ignite_core::*;

#[test]
fn empty_object_gives_defaults() {
    let config = ViewerConfig::from_json("{}").expect("defaults");
    assert_eq!(config, ViewerConfig::default());
    assert_eq!(
        config.asset_candidates,
        ["./assets/casita-draco.glb", "./assets/casita-file.glb"]
    );
    assert_eq!(config.trigger_policy, TriggerPolicy::Restart);
    assert_eq!(config.companion_node.as_deref(), Some("flame"));
    assert_eq!(config.counter.cooldown_ms, 10_000.0);
    assert!(config.remote_counter().is_none());
}

#[test]
fn partial_overrides_keep_other_defaults() {
    let json = r#"{
        "asset_candidates": ["./m.glb"],
        "trigger_policy": "debounce",
        "framing": { "fill_ratio": 1.5 },
        "effect": { "life_ms": 800 },
        "companion_node": null
    }"#;
    let config = ViewerConfig::from_json(json).expect("parsed");
    assert_eq!(config.asset_candidates, ["./m.glb"]);
    assert_eq!(config.trigger_policy, TriggerPolicy::Debounce);
    assert_eq!(config.framing.fill_ratio, 1.5);
    assert_eq!(config.framing.padding, FramingParams::default().padding);
    assert_eq!(config.effect.life_ms, 800.0);
    assert_eq!(config.effect.light_floor, EffectParams::default().light_floor);
    assert!(config.companion_node.is_none());
}

#[test]
fn remote_counter_needs_every_field() {
    let json = r#"{ "counter": { "remote": {
        "endpoint": "https://example.supabase.co",
        "api_key": "",
        "counter_id": "global"
    } } }"#;
    let config = ViewerConfig::from_json(json).expect("parsed");
    assert!(config.counter.remote.is_some());
    assert!(config.remote_counter().is_none());

    let json = r#"{ "counter": { "remote": {
        "endpoint": "https://example.supabase.co",
        "api_key": "anon",
        "counter_id": "global"
    } } }"#;
    let config = ViewerConfig::from_json(json).expect("parsed");
    assert_eq!(
        config.remote_counter().map(|r| r.counter_id.as_str()),
        Some("global")
    );
}

#[test]
fn invalid_values_are_rejected() {
    for json in [
        r#"{ "asset_candidates": [] }"#,
        r#"{ "framing": { "fill_ratio": 0 } }"#,
        r#"{ "effect": { "life_ms": -1 } }"#,
        r#"{ "counter": { "cooldown_ms": -5 } }"#,
    ] {
        let err = ViewerConfig::from_json(json).expect_err(json);
        assert!(matches!(err, ConfigError::Invalid(_)), "{json}: {err}");
    }
    assert!(matches!(
        ViewerConfig::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        ViewerConfig::from_json(r#"{ "trigger_policy": "sometimes" }"#),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn status_text_follows_load_state() {
    let mut board = StatusBoard::default();
    assert_eq!(board.status_text(), "Ready");
    board.set_load(LoadStatus::Loading {
        url: String::from("./a.glb"),
        attempt: 1,
        total: 2,
    });
    assert_eq!(board.status_text(), "Loading ./a.glb (2/2)…");
    board.set_load(LoadStatus::Loaded {
        url: String::from("./a.glb"),
    });
    assert_eq!(board.status_text(), "Loaded ./a.glb");
    board.warn("no \"flame\" node");
    board.warn("no \"flame\" node");
    assert_eq!(board.warnings().len(), 1);
    assert_eq!(board.status_text(), "Loaded ./a.glb · no \"flame\" node");
    board.set_load(LoadStatus::Failed { tried: vec![] });
    assert!(board.status_text().starts_with("Could not load model"));
}

#[test]
fn toast_expires() {
    let mut board = StatusBoard::default();
    board.show_toast("slow down", 1_000.0, 2_500.0);
    assert_eq!(board.active_toast(1_000.0), Some("slow down"));
    assert_eq!(board.active_toast(3_499.0), Some("slow down"));
    assert!(!board.expire_toast(3_000.0));
    assert!(board.expire_toast(3_500.0));
    assert_eq!(board.active_toast(3_500.0), None);
}

#[test]
fn counter_text_shows_placeholder_until_read() {
    let mut board = StatusBoard::default();
    assert_eq!(board.counter_text(), "…");
    board.set_counter(CounterReading {
        value: 3,
        source: CounterSource::Local,
    });
    assert_eq!(board.counter_text(), "3 (local)");
}
