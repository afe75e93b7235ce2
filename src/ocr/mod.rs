//! Text recognition. Engines are opaque: each turns an image into a list of
//! fragments, and [`TextRecognizer`] flattens those into one line of text.

use image::DynamicImage;

use std::fmt;

use crate::error::LprError;

pub mod tesseract;

/// One piece of text found by an engine.
/// `region` is x, y, width, height in image pixels, when the engine reports one.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub region: Option<[u32; 4]>,
    pub text: String,
    pub confidence: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self { region: None, text: text.into(), confidence }
    }

    pub fn with_region(mut self, region: [u32; 4]) -> Self {
        self.region = Some(region);
        self
    }
}

pub trait OcrEngine {
    fn name(&self) -> &str;

    /// Fragments in the engine's own order.
    fn read_text(&self, img: &DynamicImage) -> Result<Vec<TextFragment>, LprError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// whole image is one short text field
    Word,
    /// free-form detection of any number of text regions
    Regions,
}

impl Default for EngineKind {
    fn default() -> Self {
        if cfg!(feature = "word-engine") {
            EngineKind::Word
        } else {
            EngineKind::Regions
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Word => f.write_str("word"),
            EngineKind::Regions => f.write_str("regions"),
        }
    }
}

/// Load the engine once; the returned handle is reused for every call.
pub fn load_engine(kind: EngineKind, lang: &str) -> Result<Box<dyn OcrEngine>, LprError> {
    let engine: Box<dyn OcrEngine> = match kind {
        EngineKind::Word => Box::new(tesseract::WordEngine::new(lang)?),
        EngineKind::Regions => Box::new(tesseract::RegionEngine::new(lang)?),
    };
    log::info!("loaded ocr engine {}", engine.name());
    Ok(engine)
}

/// Runs an engine and joins every fragment with a single space.
/// Order, duplicates and blank fragments are kept as the engine returned them;
/// locations and confidences are dropped.
pub struct TextRecognizer {
    engine: Box<dyn OcrEngine>,
}

impl TextRecognizer {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self { engine }
    }

    pub fn recognize(&self, img: &DynamicImage) -> Result<String, LprError> {
        let fragments = self.engine.read_text(img)?;
        log::debug!("{} returned {} fragments", self.engine.name(), fragments.len());
        Ok(join_fragments(&fragments))
    }
}

pub fn join_fragments(fragments: &[TextFragment]) -> String {
    let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
    texts.join(" ")
}
