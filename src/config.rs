//! Overlay configuration.
//!
//! The on-disk file is JSON (or TOML when the path ends in `.toml`). Every key
//! is optional at parse time; defaults, environment overrides and validation
//! are applied afterwards, and relative paths are resolved against the
//! directory holding the config file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{OverlayError, Result};

const DEFAULT_SCALE_X: f64 = 1.0;
const DEFAULT_TRANSLATE_X_PCT: f64 = 0.0;
const DEFAULT_TRANSLATE_Y_PCT: f64 = 0.0;

pub const ENV_SCALE_X: &str = "LOTS_O_HATS_SCALE_X";
pub const ENV_TRANSLATE_X_PCT: &str = "LOTS_O_HATS_TRANSLATE_X_PCT";
pub const ENV_TRANSLATE_Y_PCT: &str = "LOTS_O_HATS_TRANSLATE_Y_PCT";

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct OverlayConfigFile {
    #[serde(alias = "hatFilenames")]
    accessories: Option<Vec<PathBuf>>,
    #[serde(alias = "classifierModelFilename")]
    classifier_model: Option<PathBuf>,
    #[serde(alias = "classifierNetworkFilename")]
    classifier_network: Option<PathBuf>,
    scale_x: Option<FloatList>,
    translate_x_pct: Option<FloatList>,
    translate_y_pct: Option<FloatList>,
}

/// A float key may hold a bare number (single-accessory configs) or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FloatList {
    One(f64),
    Many(Vec<f64>),
}

impl FloatList {
    fn into_vec(self) -> Vec<f64> {
        match self {
            FloatList::One(value) => vec![value],
            FloatList::Many(values) => values,
        }
    }
}

/// Per-detection placement tuning. Each sequence cycles independently.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub scale_x: Vec<f64>,
    pub translate_x_pct: Vec<f64>,
    pub translate_y_pct: Vec<f64>,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            scale_x: vec![DEFAULT_SCALE_X],
            translate_x_pct: vec![DEFAULT_TRANSLATE_X_PCT],
            translate_y_pct: vec![DEFAULT_TRANSLATE_Y_PCT],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierArtifacts {
    pub model: PathBuf,
    pub network: PathBuf,
}

#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Where the config was read from; error messages refer to it.
    pub source_path: PathBuf,
    pub accessories: Vec<PathBuf>,
    pub classifier: Option<ClassifierArtifacts>,
    pub placement: PlacementConfig,
}

impl OverlayConfig {
    /// Read, apply environment overrides, validate, and resolve paths.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_cfg = read_config_file(path)?;
        let mut cfg = Self::from_file(file_cfg, path)?;
        cfg.apply_env()?;
        cfg.validate()?;
        cfg.resolve_relative_paths();
        log::info!(
            "loaded config {} ({} accessories, {}/{}/{} placement variants)",
            path.display(),
            cfg.accessories.len(),
            cfg.placement.scale_x.len(),
            cfg.placement.translate_x_pct.len(),
            cfg.placement.translate_y_pct.len()
        );
        Ok(cfg)
    }

    fn from_file(file: OverlayConfigFile, path: &Path) -> Result<Self> {
        let classifier = match (file.classifier_model, file.classifier_network) {
            (Some(model), Some(network)) => Some(ClassifierArtifacts { model, network }),
            (None, None) => None,
            _ => {
                return Err(OverlayError::config(
                    path,
                    "classifierModel and classifierNetwork must be given together",
                ))
            }
        };
        let defaults = PlacementConfig::default();
        let placement = PlacementConfig {
            scale_x: file
                .scale_x
                .map(FloatList::into_vec)
                .unwrap_or(defaults.scale_x),
            translate_x_pct: file
                .translate_x_pct
                .map(FloatList::into_vec)
                .unwrap_or(defaults.translate_x_pct),
            translate_y_pct: file
                .translate_y_pct
                .map(FloatList::into_vec)
                .unwrap_or(defaults.translate_y_pct),
        };
        Ok(Self {
            source_path: path.to_path_buf(),
            accessories: file.accessories.unwrap_or_default(),
            classifier,
            placement,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(values) = self.env_floats(ENV_SCALE_X)? {
            self.placement.scale_x = values;
        }
        if let Some(values) = self.env_floats(ENV_TRANSLATE_X_PCT)? {
            self.placement.translate_x_pct = values;
        }
        if let Some(values) = self.env_floats(ENV_TRANSLATE_Y_PCT)? {
            self.placement.translate_y_pct = values;
        }
        Ok(())
    }

    fn env_floats(&self, key: &str) -> Result<Option<Vec<f64>>> {
        let Ok(raw) = std::env::var(key) else {
            return Ok(None);
        };
        let parsed = split_csv(&raw)
            .iter()
            .map(|entry| entry.parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                OverlayError::config(
                    &self.source_path,
                    format!("{key} must be a comma-separated list of numbers: {e}"),
                )
            })?;
        if parsed.is_empty() {
            return Ok(None);
        }
        Ok(Some(parsed))
    }

    fn validate(&self) -> Result<()> {
        let fail = |reason: &str| Err(OverlayError::config(&self.source_path, reason));
        if self.accessories.is_empty() {
            return fail("at least one accessory image is required");
        }
        let placement = &self.placement;
        if placement.scale_x.is_empty()
            || placement.translate_x_pct.is_empty()
            || placement.translate_y_pct.is_empty()
        {
            return fail("scaleX, translateXPct and translateYPct must not be empty");
        }
        if placement
            .scale_x
            .iter()
            .any(|s| !s.is_finite() || *s <= 0.0)
        {
            return fail("scaleX values must be finite and greater than zero");
        }
        if placement
            .translate_x_pct
            .iter()
            .chain(placement.translate_y_pct.iter())
            .any(|t| !t.is_finite())
        {
            return fail("translate values must be finite");
        }
        Ok(())
    }

    fn resolve_relative_paths(&mut self) {
        let base = self
            .source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        for accessory in &mut self.accessories {
            *accessory = resolve_against(&base, accessory);
        }
        if let Some(classifier) = self.classifier.as_mut() {
            classifier.model = resolve_against(&base, &classifier.model);
            classifier.network = resolve_against(&base, &classifier.network);
        }
    }
}

fn read_config_file(path: &Path) -> Result<OverlayConfigFile> {
    let raw = std::fs::read_to_string(path).map_err(|e| OverlayError::config(path, e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(&raw).map_err(|e| OverlayError::config(path, e))
    } else {
        serde_json::from_str(&raw).map_err(|e| OverlayError::config(path, e))
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<OverlayConfig> {
        let file: OverlayConfigFile = serde_json::from_str(json).expect("parse json");
        let cfg = OverlayConfig::from_file(file, Path::new("data/crown.json"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[test]
    fn scalar_float_keys_become_single_element_lists() {
        let cfg = parse(r#"{"accessories": ["crown.png"], "scaleX": 1.5, "translateYPct": 0.75}"#)
            .unwrap();
        assert_eq!(cfg.placement.scale_x, vec![1.5]);
        assert_eq!(cfg.placement.translate_x_pct, vec![0.0]);
        assert_eq!(cfg.placement.translate_y_pct, vec![0.75]);
    }

    #[test]
    fn legacy_key_names_are_accepted() {
        let cfg = parse(
            r#"{
                "hatFilenames": ["crown.png"],
                "classifierModelFilename": "res10.caffemodel",
                "classifierNetworkFilename": "deploy.prototxt"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.accessories, vec![PathBuf::from("crown.png")]);
        let classifier = cfg.classifier.unwrap();
        assert_eq!(classifier.model, PathBuf::from("res10.caffemodel"));
        assert_eq!(classifier.network, PathBuf::from("deploy.prototxt"));
    }

    #[test]
    fn rejects_missing_accessories_and_empty_lists() {
        assert!(parse(r#"{}"#).is_err());
        assert!(parse(r#"{"accessories": ["a.png"], "scaleX": []}"#).is_err());
        assert!(parse(r#"{"accessories": ["a.png"], "scaleX": [0.0]}"#).is_err());
    }

    #[test]
    fn rejects_half_specified_classifier() {
        let err = parse(r#"{"accessories": ["a.png"], "classifierModel": "m.onnx"}"#)
            .unwrap_err();
        assert!(matches!(err, OverlayError::ConfigRead { .. }));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut cfg = parse(
            r#"{
                "accessories": ["crown.png", "/abs/hat.png"],
                "classifierModel": "model.onnx",
                "classifierNetwork": "deploy.prototxt"
            }"#,
        )
        .unwrap();
        cfg.resolve_relative_paths();
        assert_eq!(cfg.accessories[0], PathBuf::from("data/crown.png"));
        assert_eq!(cfg.accessories[1], PathBuf::from("/abs/hat.png"));
        let classifier = cfg.classifier.unwrap();
        assert_eq!(classifier.model, PathBuf::from("data/model.onnx"));
        assert_eq!(classifier.network, PathBuf::from("data/deploy.prototxt"));
    }
}
