// Face detection using an OpenCV Haar cascade

use crate::error::{PipelineError, Result};
use crate::models::{BoundingBox, Frame};
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use tracing::{debug, error};

/// Geometric step between successive scan scales. Smaller values scan more
/// scales and find more faces at the cost of speed.
const SCALE_FACTOR: f64 = 1.3;
/// Minimum number of overlapping detections required to confirm a region
const MIN_NEIGHBORS: i32 = 5;
/// Candidate windows smaller than this edge length are discarded
const MIN_FACE_SIZE: i32 = 30;

/// Pluggable face detection backend.
///
/// Returns candidate face boxes in scan order. The order is stable for a
/// given image and configuration but otherwise unspecified.
pub trait FaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>>;
}

/// Face detector backed by OpenCV's Haar cascade classifier
#[derive(Debug)]
pub struct CascadeFaceDetector {
    classifier: CascadeClassifier,
}

impl CascadeFaceDetector {
    /// Creates a new detector by loading the Haar cascade XML at `cascade_path`.
    ///
    /// Failure here is fatal for pipeline construction; a loaded detector
    /// never fails on a face-free image.
    pub fn new(cascade_path: &str) -> Result<Self> {
        let classifier = CascadeClassifier::new(cascade_path).map_err(|e| {
            error!("Failed to load Haar cascade: {}", e);
            PipelineError::DetectorUnavailable(format!("Haar cascade load failed: {e}"))
        })?;

        let empty = classifier
            .empty()
            .map_err(|e| PipelineError::DetectorUnavailable(e.to_string()))?;
        if empty {
            return Err(PipelineError::DetectorUnavailable(
                "Haar cascade classifier is empty".to_string(),
            ));
        }

        Ok(Self { classifier })
    }
}

impl FaceDetector for CascadeFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>> {
        let gray = rgb_to_gray(frame)?;

        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            &gray,
            &mut faces,
            SCALE_FACTOR,
            MIN_NEIGHBORS,
            0, // flags, unused by the current cascade implementation
            Size::new(MIN_FACE_SIZE, MIN_FACE_SIZE),
            Size::new(0, 0), // no upper size limit
        )?;

        let boxes: Vec<BoundingBox> = faces
            .iter()
            .filter_map(|rect| clamp_to_frame(rect, frame))
            .collect();
        debug!("cascade confirmed {} region(s)", boxes.len());
        Ok(boxes)
    }
}

/// Converts an RGB frame to a single-channel luminance Mat
fn rgb_to_gray(frame: &Frame) -> Result<Mat> {
    let mat = frame.to_mat()?;
    let mut gray = Mat::default();
    imgproc::cvt_color(
        &mat,
        &mut gray,
        imgproc::COLOR_RGB2GRAY,
        0,
    )?;
    Ok(gray)
}

/// Clamps a detection rect to the frame bounds, dropping degenerate boxes
fn clamp_to_frame(rect: Rect, frame: &Frame) -> Option<BoundingBox> {
    let x = (rect.x.max(0) as u32).min(frame.width);
    let y = (rect.y.max(0) as u32).min(frame.height);
    let width = (rect.width.max(0) as u32).min(frame.width - x);
    let height = (rect.height.max(0) as u32).min(frame.height - y);
    if width == 0 || height == 0 {
        return None;
    }
    Some(BoundingBox {
        x,
        y,
        width,
        height,
    })
}
