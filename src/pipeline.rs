// Pipeline orchestrator: detection, per-face classification, annotation

use crate::annotate::annotate;
use crate::classify::{EmotionClassifier, OnnxEmotionClassifier};
use crate::detect::{CascadeFaceDetector, FaceDetector};
use crate::error::{PipelineError, Result};
use crate::models::{FaceRegion, Frame, PipelineResult};
use crate::translate::LabelTranslator;
use tracing::{info, warn};

/// Runs the full pipeline over one still image: detect faces, classify each
/// region, translate the dominant code, draw the annotation.
///
/// The pipeline is stateless across invocations; every `process` call is an
/// independent run seeded only by its input frame.
pub struct EmotionPipeline {
    detector: Box<dyn FaceDetector>,
    classifier: Box<dyn EmotionClassifier>,
    translator: LabelTranslator,
}

impl EmotionPipeline {
    /// Assembles a pipeline from its three components
    pub fn new(
        detector: Box<dyn FaceDetector>,
        classifier: Box<dyn EmotionClassifier>,
        translator: LabelTranslator,
    ) -> Self {
        Self {
            detector,
            classifier,
            translator,
        }
    }

    /// Wires the default backends: Haar cascade detection, ONNX emotion
    /// inference, Spanish labels. Fails fast if either model cannot load.
    pub fn from_model_files(cascade_path: &str, model_path: &str) -> Result<Self> {
        Ok(Self::new(
            Box::new(CascadeFaceDetector::new(cascade_path)?),
            Box::new(OnnxEmotionClassifier::new(model_path)?),
            LabelTranslator::spanish(),
        ))
    }

    /// Processes one image and returns the annotated copy plus the face count.
    ///
    /// Faces whose classification fails are skipped without annotation; the
    /// run continues and the face still counts toward `face_count`. Only
    /// fatal conditions abort the run, so the caller always gets either a
    /// complete result or a single top-level error.
    pub fn process(&mut self, image: &Frame) -> Result<PipelineResult> {
        if image.width == 0 || image.height == 0 {
            return Err(PipelineError::InvalidImage(
                "image has zero dimensions".to_string(),
            ));
        }
        let expected = image.width as usize * image.height as usize * 3;
        if image.data.len() != expected {
            return Err(PipelineError::InvalidImage(format!(
                "buffer holds {} bytes, expected {expected}",
                image.data.len()
            )));
        }

        let boxes = self.detector.detect(image)?;
        info!("detected {} face(s)", boxes.len());

        // Single writer: this clone is the only buffer mutated below.
        let mut annotated = image.clone();
        for bbox in &boxes {
            let region = FaceRegion::crop(&annotated, *bbox);
            let scores = match self.classifier.classify(&region.pixels) {
                Ok(scores) => scores,
                Err(PipelineError::Inference(reason)) => {
                    warn!("classification failed for face at {:?}: {}", bbox, reason);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let label = self.translator.translate(scores.dominant().code());
            annotate(&mut annotated, bbox, label)?;
        }

        Ok(PipelineResult {
            image: annotated,
            face_count: boxes.len(),
        })
    }
}
