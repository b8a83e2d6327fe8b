// Emotion classification using ONNX Runtime inference

use crate::error::{PipelineError, Result};
use crate::models::{EmotionScores, Frame, EMOTION_COUNT};
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;
use ort::session::Session;
use ort::value::Value;
use tracing::error;

/// Model input edge length (48x48 grayscale, FER-2013 layout)
const INPUT_SIZE: i32 = 48;

/// Pluggable emotion classification backend.
///
/// The region is not required to contain a face; any valid crop yields a
/// probability distribution over the canonical vocabulary. Per-call failures
/// surface as [`PipelineError::Inference`] and are recoverable by the caller.
pub trait EmotionClassifier {
    fn classify(&mut self, region: &Frame) -> Result<EmotionScores>;
}

/// Emotion classifier backed by an ONNX Runtime session
#[derive(Debug)]
pub struct OnnxEmotionClassifier {
    session: Session,
}

impl OnnxEmotionClassifier {
    /// Creates a new classifier by loading the ONNX model at `model_path`.
    ///
    /// Failure here is fatal for pipeline construction.
    pub fn new(model_path: &str) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| {
                PipelineError::ClassifierUnavailable(format!(
                    "failed to create session builder: {e}"
                ))
            })?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load ONNX model: {}", e);
                PipelineError::ClassifierUnavailable(format!("ONNX model load failed: {e}"))
            })?;

        Ok(Self { session })
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&mut self, region: &Frame) -> Result<EmotionScores> {
        if region.width == 0 || region.height == 0 {
            return Err(PipelineError::Inference("empty face region".to_string()));
        }

        let pixels = preprocess(region)?;

        let input_array = ndarray::Array4::from_shape_vec(
            (1, 1, INPUT_SIZE as usize, INPUT_SIZE as usize),
            pixels,
        )
        .map_err(|e| PipelineError::Inference(format!("failed to create input array: {e}")))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| PipelineError::Inference(format!("failed to create input tensor: {e}")))?;

        let inputs = ort::inputs![input_tensor];
        let outputs = self.session.run(inputs).map_err(|e| {
            error!("ONNX inference failed: {}", e);
            PipelineError::Inference(format!("inference failed: {e}"))
        })?;

        let (_, output_value) = outputs
            .iter()
            .next()
            .ok_or_else(|| PipelineError::Inference("no output from model".to_string()))?;

        let tensor = output_value.try_extract_tensor::<f32>().map_err(|e| {
            PipelineError::Inference(format!("failed to extract output tensor: {e}"))
        })?;
        let raw = tensor.1;

        if raw.len() < EMOTION_COUNT {
            return Err(PipelineError::Inference(format!(
                "model produced {} scores, expected {EMOTION_COUNT}",
                raw.len()
            )));
        }

        // The model may emit one row per sub-face it finds in the crop.
        // Only the first row is kept; the rest are discarded.
        let logits = &raw[..EMOTION_COUNT];
        Ok(EmotionScores::new(softmax(logits)))
    }
}

/// Scales a face crop to the model input: grayscale, 48x48, normalized to [0, 1]
fn preprocess(region: &Frame) -> Result<Vec<f32>> {
    let mat = region
        .to_mat()
        .map_err(|e| PipelineError::Inference(format!("failed to build region Mat: {e}")))?;

    let mut gray = Mat::default();
    imgproc::cvt_color(
        &mat,
        &mut gray,
        imgproc::COLOR_RGB2GRAY,
        0,
    )
    .map_err(|e| PipelineError::Inference(format!("failed to convert to grayscale: {e}")))?;

    let mut resized = Mat::default();
    imgproc::resize(
        &gray,
        &mut resized,
        Size::new(INPUT_SIZE, INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )
    .map_err(|e| PipelineError::Inference(format!("failed to resize region: {e}")))?;

    let data = resized
        .data_bytes()
        .map_err(|e| PipelineError::Inference(format!("failed to read resized region: {e}")))?;

    Ok(data.iter().map(|&pixel| pixel as f32 / 255.0).collect())
}

/// Numerically stable softmax over the raw model scores
fn softmax(logits: &[f32]) -> [f32; EMOTION_COUNT] {
    let max_logit = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_sum: f32 = logits.iter().map(|&x| (x - max_logit).exp()).sum();
    let mut probabilities = [0.0f32; EMOTION_COUNT];
    for (out, &x) in probabilities.iter_mut().zip(logits) {
        *out = (x - max_logit).exp() / exp_sum;
    }
    probabilities
}
