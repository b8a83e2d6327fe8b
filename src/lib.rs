// Library exports for the face & emotion annotation pipeline

pub mod annotate;
pub mod classify;
pub mod detect;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod translate;

pub use error::{PipelineError, Result};
pub use models::{BoundingBox, Emotion, EmotionScores, FaceRegion, Frame, PipelineResult};
pub use pipeline::EmotionPipeline;
pub use translate::LabelTranslator;
