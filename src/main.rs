// Thin command-line surface: decode an image, run the pipeline, save the result

use emociones::error::{PipelineError, Result};
use emociones::models::Frame;
use emociones::EmotionPipeline;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CASCADE_PATH: &str = "assets/models/haarcascade_frontalface_default.xml";
const EMOTION_MODEL_PATH: &str = "assets/models/emotion.onnx";
const DEFAULT_OUTPUT: &str = "imagen_procesada.jpg";

/// Initializes logging to stderr, keeping stdout for the face count
fn init_logging() {
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_ansi(false);
    tracing_subscriber::registry().with(fmt_layer).init();
}

fn main() -> Result<()> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: emociones <imagen> [salida]");
            std::process::exit(2);
        }
    };
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let decoded = image::open(&input)?.to_rgb8();
    let (width, height) = decoded.dimensions();
    let frame = Frame::new(decoded.into_raw(), width, height);

    let mut pipeline = EmotionPipeline::from_model_files(CASCADE_PATH, EMOTION_MODEL_PATH)?;
    let result = pipeline.process(&frame)?;

    let annotated =
        image::RgbImage::from_raw(result.image.width, result.image.height, result.image.data)
            .ok_or_else(|| {
                PipelineError::InvalidImage("annotated buffer has unexpected size".to_string())
            })?;
    annotated.save(&output)?;

    info!("saved annotated image to {}", output);
    println!("Número de caras detectadas: {}", result.face_count);
    Ok(())
}
