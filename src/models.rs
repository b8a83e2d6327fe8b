// Core data models for the emotion annotation pipeline

use crate::error::Result;
use opencv::core::Mat;
use opencv::prelude::*;

/// Number of canonical emotion codes
pub const EMOTION_COUNT: usize = 7;

/// A still image as an RGB pixel buffer, row-major
#[derive(Clone, Debug)]
pub struct Frame {
    /// Raw RGB pixel data (width * height * 3 bytes)
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl Frame {
    /// Creates a new Frame with the given parameters
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Copies the pixels under `bbox` into a new Frame.
    ///
    /// The box is clamped to the frame bounds, so the result may be smaller
    /// than the requested box (and empty if the box lies fully outside).
    pub fn crop(&self, bbox: &BoundingBox) -> Frame {
        let x = bbox.x.min(self.width);
        let y = bbox.y.min(self.height);
        let w = bbox.width.min(self.width - x);
        let h = bbox.height.min(self.height - y);

        let src_stride = (self.width * 3) as usize;
        let dst_stride = (w * 3) as usize;
        let mut data = vec![0u8; dst_stride * h as usize];
        for row in 0..h as usize {
            let src_start = (y as usize + row) * src_stride + x as usize * 3;
            data[row * dst_stride..(row + 1) * dst_stride]
                .copy_from_slice(&self.data[src_start..src_start + dst_stride]);
        }

        Frame::new(data, w, h)
    }

    /// Converts the frame into an owned, continuous 3-channel OpenCV Mat
    pub(crate) fn to_mat(&self) -> Result<Mat> {
        let mat = Mat::from_slice(&self.data)?;
        let mat = mat.reshape(3, self.height as i32)?;
        Ok(mat.try_clone()?)
    }
}

/// Location of one candidate face within a Frame, top-left origin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A detected face: its bounding box plus the pixels cropped under it
#[derive(Clone, Debug)]
pub struct FaceRegion {
    pub bbox: BoundingBox,
    pub pixels: Frame,
}

impl FaceRegion {
    /// Crops `bbox` out of `frame` into an owned region
    pub fn crop(frame: &Frame, bbox: BoundingBox) -> Self {
        Self {
            bbox,
            pixels: frame.crop(&bbox),
        }
    }
}

/// The canonical emotion vocabulary, declared in canonical order.
///
/// The declaration order doubles as the tie-break order for
/// [`EmotionScores::dominant`] and as the score index via `as usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
}

impl Emotion {
    /// All emotions in canonical order
    pub const CANONICAL: [Emotion; EMOTION_COUNT] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// The lowercase canonical code produced by the classifier
    pub fn code(self) -> &'static str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Probability per canonical emotion code, keyed by canonical order.
///
/// Values are in [0, 1] but need not sum to exactly 1.
#[derive(Clone, Copy, Debug)]
pub struct EmotionScores {
    scores: [f32; EMOTION_COUNT],
}

impl EmotionScores {
    /// Creates scores from an array in canonical order
    pub fn new(scores: [f32; EMOTION_COUNT]) -> Self {
        Self { scores }
    }

    /// The probability assigned to `emotion`
    pub fn score(&self, emotion: Emotion) -> f32 {
        self.scores[emotion as usize]
    }

    /// The emotion with the highest score.
    ///
    /// Ties are broken by first occurrence in canonical order; the underlying
    /// model does not document its own tie-break, so this is a fixed policy.
    pub fn dominant(&self) -> Emotion {
        let mut best = 0;
        for i in 1..EMOTION_COUNT {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        Emotion::CANONICAL[best]
    }

    /// Iterates over (emotion, score) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::CANONICAL.iter().map(|&e| (e, self.score(e)))
    }
}

/// Result of one pipeline run: the annotated image and how many faces it found
#[derive(Clone, Debug)]
pub struct PipelineResult {
    /// The input image with rectangles and labels drawn on it
    pub image: Frame,
    /// Number of detected faces, including any skipped during classification
    pub face_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_frame(width: u32, height: u32) -> Frame {
        let data = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        Frame::new(data, width, height)
    }

    #[test]
    fn crop_copies_exact_pixels() {
        let frame = numbered_frame(8, 6);
        let bbox = BoundingBox {
            x: 2,
            y: 1,
            width: 3,
            height: 2,
        };
        let crop = frame.crop(&bbox);
        assert_eq!(crop.width, 3);
        assert_eq!(crop.height, 2);
        for row in 0..2u32 {
            for col in 0..3u32 {
                for ch in 0..3u32 {
                    let src = (((1 + row) * 8 + 2 + col) * 3 + ch) as usize;
                    let dst = ((row * 3 + col) * 3 + ch) as usize;
                    assert_eq!(crop.data[dst], frame.data[src]);
                }
            }
        }
    }

    #[test]
    fn crop_clamps_to_frame_bounds() {
        let frame = numbered_frame(10, 10);
        let bbox = BoundingBox {
            x: 7,
            y: 8,
            width: 20,
            height: 20,
        };
        let crop = frame.crop(&bbox);
        assert_eq!(crop.width, 3);
        assert_eq!(crop.height, 2);
    }

    #[test]
    fn crop_outside_frame_is_empty() {
        let frame = numbered_frame(4, 4);
        let bbox = BoundingBox {
            x: 10,
            y: 10,
            width: 5,
            height: 5,
        };
        let crop = frame.crop(&bbox);
        assert_eq!(crop.width, 0);
        assert_eq!(crop.height, 0);
        assert!(crop.data.is_empty());
    }

    #[test]
    fn dominant_picks_highest_score() {
        let scores = EmotionScores::new([0.01, 0.02, 0.03, 0.8, 0.04, 0.05, 0.05]);
        assert_eq!(scores.dominant(), Emotion::Happy);
    }

    #[test]
    fn dominant_tie_breaks_by_canonical_order() {
        // happy and sad tie; happy comes first canonically
        let scores = EmotionScores::new([0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0]);
        assert_eq!(scores.dominant(), Emotion::Happy);

        // full tie resolves to the first canonical code
        let scores = EmotionScores::new([0.1; EMOTION_COUNT]);
        assert_eq!(scores.dominant(), Emotion::Angry);
    }

    #[test]
    fn scores_expose_all_seven_codes() {
        let scores = EmotionScores::new([0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        let pairs: Vec<_> = scores.iter().collect();
        assert_eq!(pairs.len(), EMOTION_COUNT);
        assert_eq!(pairs[0], (Emotion::Angry, 0.1));
        assert_eq!(pairs[6], (Emotion::Neutral, 0.7));
    }

    #[test]
    fn emotion_codes_are_lowercase_vocabulary() {
        let codes: Vec<_> = Emotion::CANONICAL.iter().map(|e| e.code()).collect();
        assert_eq!(
            codes,
            ["angry", "disgust", "fear", "happy", "sad", "surprise", "neutral"]
        );
    }
}
