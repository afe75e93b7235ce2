//! Capture one frame from a camera preview and read the license plate text in it.
//!
//! The run is strictly sequential: preview frames until the user presses
//! `c` (capture) or `q` (quit); a capture is written to disk, passed through
//! a [`Preprocess`] chain and read by an [`ocr::OcrEngine`].

use std::path::PathBuf;
use std::time::Duration;

pub mod camera;
pub mod capture;
pub mod display;
pub mod error;
pub mod image_process;
pub mod ocr;

pub use camera::{ Frame, FrameSource };
pub use capture::{ CaptureLoop, Outcome };
pub use display::{ Command, DisplaySink };
pub use error::{ LprError, LprErrorKind };
pub use image_process::{ Preprocess, Preprocessor };
pub use ocr::{ EngineKind, OcrEngine, TextFragment, TextRecognizer };

pub const DEFAULT_IMAGE_PATH: &str = "captured_image.jpg";

/// Everything fixed for the lifetime of one run. The preprocessing variant
/// and the engine come from cargo features (`binarize`, `word-engine`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub device_index: u32,
    pub image_path: PathBuf,
    pub preprocess: Preprocess,
    pub engine: EngineKind,
    pub lang: String,
    pub window_title: String,
    pub poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_index: 0,
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            preprocess: Preprocess::default(),
            engine: EngineKind::default(),
            lang: "eng".to_string(),
            window_title: "Camera Feed".to_string(),
            poll_interval: Duration::from_millis(1),
        }
    }
}

impl Config {

    /// Load the configured engine and wrap it for recognition.
    pub fn recognizer(&self) -> Result<TextRecognizer, LprError> {
        let engine = ocr::load_engine(self.engine, &self.lang)?;
        Ok(TextRecognizer::new(engine))
    }

    pub fn capture_loop<'a>(&'a self, recognizer: &'a TextRecognizer) -> CaptureLoop<'a> {
        CaptureLoop::new(&self.preprocess, recognizer, &self.image_path).poll_interval(self.poll_interval)
    }
}
