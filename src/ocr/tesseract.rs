//! Engines backed by the system tesseract binary through rusty-tesseract.

use image::DynamicImage;
use rusty_tesseract::{ Args, Image };

use std::collections::HashMap;

use super::{ OcrEngine, TextFragment };
use crate::error::LprError;

// page segmentation modes
const PSM_SINGLE_WORD: i32 = 8;
const PSM_SPARSE_TEXT: i32 = 11;
const OEM_DEFAULT: i32 = 3;

fn args(lang: &str, psm: i32) -> Args {
    Args {
        lang: lang.to_string(),
        config_variables: HashMap::new(),
        dpi: Some(150),
        psm: Some(psm),
        oem: Some(OEM_DEFAULT),
    }
}

fn probe() -> Result<String, LprError> {
    let version = rusty_tesseract::get_tesseract_version()
        .map_err(|e| LprError::engine_unavailable(format!("tesseract not found: {}", e)))?;
    let version = version.lines().next().unwrap_or_default().trim().to_string();
    log::info!("using {}", version);
    Ok(version)
}

/// Treats the whole image as one short text field, which suits frames
/// where nothing crops the plate out first.
pub struct WordEngine {
    args: Args,
}

impl WordEngine {
    pub fn new(lang: &str) -> Result<Self, LprError> {
        probe()?;
        Ok(Self { args: args(lang, PSM_SINGLE_WORD) })
    }
}

impl OcrEngine for WordEngine {

    fn name(&self) -> &str {
        "tesseract-word"
    }

    fn read_text(&self, img: &DynamicImage) -> Result<Vec<TextFragment>, LprError> {
        let img = Image::from_dynamic_image(img)?;
        let text = rusty_tesseract::image_to_string(&img, &self.args)?;
        // no per-word confidence in this mode
        Ok(vec![TextFragment::new(text.trim(), 1.0)])
    }
}

/// Finds as much text as possible in no particular layout and returns
/// every recognised word with its box.
pub struct RegionEngine {
    args: Args,
}

impl RegionEngine {
    pub fn new(lang: &str) -> Result<Self, LprError> {
        probe()?;
        Ok(Self { args: args(lang, PSM_SPARSE_TEXT) })
    }
}

impl OcrEngine for RegionEngine {

    fn name(&self) -> &str {
        "tesseract-regions"
    }

    fn read_text(&self, img: &DynamicImage) -> Result<Vec<TextFragment>, LprError> {
        let img = Image::from_dynamic_image(img)?;
        let output = rusty_tesseract::image_to_data(&img, &self.args)?;
        let fragments = output.data.iter()
            .filter_map(|d| word_fragment([d.left, d.top, d.width, d.height], d.conf, &d.text))
            .collect();
        Ok(fragments)
    }
}

/// Rows for pages, blocks and lines carry a negative confidence and no text.
fn word_fragment(bounds: [i32; 4], conf: f32, text: &str) -> Option<TextFragment> {
    let text = text.trim();
    if text.is_empty() || conf < 0.0 {
        return None;
    }
    let [left, top, width, height] = bounds;
    let region = [left.max(0) as u32, top.max(0) as u32, width.max(0) as u32, height.max(0) as u32];
    Some(TextFragment::new(text, conf / 100.0).with_region(region))
}
