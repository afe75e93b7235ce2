/// Filter chains run on a captured frame before it is handed to an ocr engine.

use image::{ DynamicImage, GrayImage };
use imageproc::{ contrast, filter };
use imageproc::contrast::ThresholdType;

use std::fmt;

use crate::camera::Frame;

// 5-tap binomial kernel, applied in both directions gives the 5x5 gaussian
const GAUSSIAN_5: [f32; 5] = [1.0/16.0, 4.0/16.0, 6.0/16.0, 4.0/16.0, 1.0/16.0];

/// Anything turning a frame into the single channel image fed to recognition.
pub trait Preprocessor {
    fn run(&self, frame: &Frame) -> GrayImage;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preprocess {
    /// color to gray, nothing else; for engines normalizing on their own
    Grayscale,
    /// gray, 5x5 blur, then global otsu threshold
    Binarize,
}

impl Default for Preprocess {
    fn default() -> Self {
        if cfg!(feature = "binarize") {
            Preprocess::Binarize
        } else {
            Preprocess::Grayscale
        }
    }
}

impl Preprocessor for Preprocess {
    fn run(&self, frame: &Frame) -> GrayImage {
        let gray = to_grayscale(frame);
        match self {
            Preprocess::Grayscale => gray,
            Preprocess::Binarize => binarize_otsu(&denoise(&gray)),
        }
    }
}

impl fmt::Display for Preprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preprocess::Grayscale => f.write_str("gray"),
            Preprocess::Binarize => f.write_str("binarize"),
        }
    }
}

pub fn to_grayscale(frame: &Frame) -> GrayImage {
    DynamicImage::ImageRgb8(frame.as_rgb().clone()).to_luma8()
}

/// Gaussian blur with a fixed 5x5 kernel; borders are clamped.
pub fn denoise(img: &GrayImage) -> GrayImage {
    filter::separable_filter_equal(img, &GAUSSIAN_5)
}

/// Global threshold at the otsu level of the image histogram.
/// Every output pixel is either 0 or 255.
pub fn binarize_otsu(img: &GrayImage) -> GrayImage {
    let level = contrast::otsu_level(img);
    log::debug!("otsu threshold level {}", level);
    contrast::threshold(img, level, ThresholdType::Binary)
}

pub fn is_binary(img: &GrayImage) -> bool {
    img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255)
}


#[cfg(test)]
mod test {

    use image::{ GrayImage, Luma, Rgb, RgbImage };

    use std::error::Error;

    use super::{ binarize_otsu, denoise, is_binary, Preprocess, Preprocessor };
    use crate::camera::Frame;

    fn gradient_frame(width: u32, height: u32) -> Result<Frame, Box<dyn Error>> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) * 3 % 256) as u8])
        });
        Ok(Frame::new(img)?)
    }

    #[test]
    fn grayscale_keeps_dimensions() -> Result<(), Box<dyn Error>> {
        for (w, h) in [(1, 1), (3, 17), (64, 48)].iter() {
            let frame = gradient_frame(*w, *h)?;
            let out = Preprocess::Grayscale.run(&frame);
            assert_eq!(out.dimensions(), (*w, *h));
        }
        Ok(())
    }

    #[test]
    fn binarize_is_two_valued_and_keeps_dimensions() -> Result<(), Box<dyn Error>> {
        for (w, h) in [(1, 1), (5, 5), (31, 9), (64, 48)].iter() {
            let frame = gradient_frame(*w, *h)?;
            let out = Preprocess::Binarize.run(&frame);
            assert_eq!(out.dimensions(), (*w, *h));
            assert!(is_binary(&out));
        }
        Ok(())
    }

    #[test]
    fn otsu_separates_dark_text_from_light_plate() {
        let img = GrayImage::from_fn(20, 10, |x, _| if x < 6 { Luma([30]) } else { Luma([200]) });
        let out = binarize_otsu(&img);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(19, 9).0[0], 255);
    }

    #[test]
    fn denoise_leaves_flat_image_untouched() {
        let img = GrayImage::from_pixel(9, 9, Luma([120]));
        assert_eq!(denoise(&img), img);
    }

    #[test]
    fn variant_follows_build_features() {
        let expected = if cfg!(feature = "binarize") { Preprocess::Binarize } else { Preprocess::Grayscale };
        assert_eq!(Preprocess::default(), expected);
        assert_eq!(Preprocess::Binarize.to_string(), "binarize");
    }
}
