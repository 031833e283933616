#![cfg(feature = "backend-tract")]

use std::path::Path;

use anyhow::Context;
use image::RgbImage;
use tract_onnx::prelude::*;

use crate::config::ClassifierArtifacts;
use crate::detect::backend::DetectorBackend;
use crate::detect::blob::{build_blob, BlobParams, BLOB_SIZE};
use crate::detect::result::DetectionFeed;
use crate::error::{OverlayError, Result};

type Plan = TypedRunnableModel<TypedModel>;

/// Tract-based backend for ONNX SSD face detectors.
///
/// Loads a local model file and runs it on a 300x300 blob built from each
/// frame. Output is the model's raw `[1, 1, N, 7]` tensor, flattened.
pub struct TractBackend {
    model: Plan,
    params: BlobParams,
}

impl TractBackend {
    /// Load the classifier model and pick preprocessing from its artifacts.
    ///
    /// Both artifacts must exist and be non-empty.
    pub fn new(artifacts: &ClassifierArtifacts) -> Result<Self> {
        ensure_artifact(&artifacts.model)?;
        ensure_artifact(&artifacts.network)?;

        let model = load_plan(&artifacts.model)
            .map_err(|e| OverlayError::asset(&artifacts.model, format!("{e:#}")))?;
        let params = BlobParams::for_artifacts(&artifacts.model, &artifacts.network);
        log::info!(
            "TractBackend: loaded {} ({:?} preprocessing)",
            artifacts.model.display(),
            params.order
        );
        Ok(Self { model, params })
    }

    fn run(&self, frame: &RgbImage) -> anyhow::Result<Vec<f32>> {
        let side = BLOB_SIZE as usize;
        let blob = build_blob(frame, &self.params);
        let input = tract_ndarray::Array4::from_shape_vec((1, 3, side, side), blob)
            .context("blob shape mismatch")?
            .into_tensor();
        let outputs = self
            .model
            .run(tvec!(input.into()))
            .context("ONNX inference failed")?;
        let output = outputs
            .first()
            .context("model produced no outputs")?;
        let values = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        Ok(values.iter().copied().collect())
    }
}

impl DetectorBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&mut self, frame: &RgbImage) -> Result<DetectionFeed> {
        let values = self
            .run(frame)
            .map_err(|e| OverlayError::inference(self.name(), format!("{e:#}")))?;
        Ok(DetectionFeed::new(values))
    }

    fn warm_up(&mut self) -> Result<()> {
        self.detect(&RgbImage::new(BLOB_SIZE, BLOB_SIZE)).map(|_| ())
    }
}

fn load_plan(model_path: &Path) -> anyhow::Result<Plan> {
    let side = BLOB_SIZE as usize;
    tract_onnx::onnx()
        .model_for_path(model_path)
        .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
        .with_input_fact(
            0,
            InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, side, side)),
        )
        .context("failed to set input fact")?
        .into_optimized()
        .context("failed to optimize ONNX model")?
        .into_runnable()
        .context("failed to build runnable ONNX model")
}

fn ensure_artifact(path: &Path) -> Result<()> {
    let meta = std::fs::metadata(path).map_err(|e| OverlayError::asset(path, e))?;
    if meta.len() == 0 {
        return Err(OverlayError::asset(path, "classifier artifact is empty"));
    }
    Ok(())
}
