use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::{NamedTempFile, TempDir};

use lots_o_hats::config::{ENV_SCALE_X, ENV_TRANSLATE_X_PCT, ENV_TRANSLATE_Y_PCT};
use lots_o_hats::{OverlayConfig, OverlayError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [ENV_SCALE_X, ENV_TRANSLATE_X_PCT, ENV_TRANSLATE_Y_PCT] {
        std::env::remove_var(key);
    }
}

fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write config");
    path
}

#[test]
fn loads_reference_crown_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        "crown.json",
        r#"{
            "hatFilenames": ["crown.png"],
            "classifierModelFilename": "res10_300x300_ssd_iter_140000.caffemodel",
            "classifierNetworkFilename": "deploy.prototxt",
            "scaleX": 1.5,
            "translateYPct": 0.75
        }"#,
    );

    let cfg = OverlayConfig::load(&path).expect("load config");

    assert_eq!(cfg.accessories, vec![dir.path().join("crown.png")]);
    let classifier = cfg.classifier.expect("classifier artifacts");
    assert_eq!(
        classifier.model,
        dir.path().join("res10_300x300_ssd_iter_140000.caffemodel")
    );
    assert_eq!(classifier.network, dir.path().join("deploy.prototxt"));
    assert_eq!(cfg.placement.scale_x, vec![1.5]);
    assert_eq!(cfg.placement.translate_x_pct, vec![0.0]);
    assert_eq!(cfg.placement.translate_y_pct, vec![0.75]);
}

#[test]
fn absent_placement_keys_use_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = TempDir::new().expect("temp dir");
    let path = write_config(&dir, "plain.json", r#"{"accessories": ["a.png", "b.png"]}"#);

    let cfg = OverlayConfig::load(&path).expect("load config");

    assert!(cfg.classifier.is_none());
    assert_eq!(cfg.placement.scale_x, vec![1.0]);
    assert_eq!(cfg.placement.translate_x_pct, vec![0.0]);
    assert_eq!(cfg.placement.translate_y_pct, vec![0.0]);
}

#[test]
fn toml_config_is_accepted() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        "party.toml",
        r#"
accessories = ["cone.png", "/opt/hats/bowler.png"]
scaleX = [1.2, 0.8]
translateXPct = [0.0, 0.1, -0.1]
"#,
    );

    let cfg = OverlayConfig::load(&path).expect("load config");

    assert_eq!(
        cfg.accessories,
        vec![
            dir.path().join("cone.png"),
            PathBuf::from("/opt/hats/bowler.png")
        ]
    );
    assert_eq!(cfg.placement.scale_x, vec![1.2, 0.8]);
    assert_eq!(cfg.placement.translate_x_pct, vec![0.0, 0.1, -0.1]);
}

#[test]
fn env_overrides_replace_sequences() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(
        &mut file,
        br#"{"accessories": ["crown.png"], "scaleX": [1.5], "translateYPct": 0.75}"#,
    )
    .expect("write config");

    std::env::set_var(ENV_SCALE_X, "2.0, 0.5");
    std::env::set_var(ENV_TRANSLATE_Y_PCT, "0.25");

    let cfg = OverlayConfig::load(file.path()).expect("load config");

    assert_eq!(cfg.placement.scale_x, vec![2.0, 0.5]);
    assert_eq!(cfg.placement.translate_x_pct, vec![0.0]);
    assert_eq!(cfg.placement.translate_y_pct, vec![0.25]);

    clear_env();
}

#[test]
fn invalid_env_override_is_a_config_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, br#"{"accessories": ["crown.png"]}"#)
        .expect("write config");
    std::env::set_var(ENV_TRANSLATE_X_PCT, "left");

    let result = OverlayConfig::load(file.path());
    clear_env();

    assert!(matches!(result, Err(OverlayError::ConfigRead { .. })));
}

#[test]
fn missing_or_malformed_file_is_a_config_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("missing.json");
    let err = OverlayConfig::load(&missing).unwrap_err();
    assert!(matches!(err, OverlayError::ConfigRead { ref path, .. } if *path == missing));

    let broken = write_config(&dir, "broken.json", "{ not json");
    assert!(matches!(
        OverlayConfig::load(&broken),
        Err(OverlayError::ConfigRead { .. })
    ));
}
