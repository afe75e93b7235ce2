use image::DynamicImage;

use std::io::Write;
use std::path::{ Path, PathBuf };
use std::time::Duration;

use crate::camera::{ Frame, FrameSource, OpenedSource };
use crate::display::{ Command, DisplaySink };
use crate::error::LprError;
use crate::image_process::Preprocessor;
use crate::ocr::TextRecognizer;

/// How a run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Recognized { image_path: PathBuf, text: String },
    Cancelled,
}

/// Preview the camera until the user captures or quits; a capture is saved,
/// preprocessed and recognised, then the run ends. At most one capture per run.
pub struct CaptureLoop<'a> {
    preprocessor: &'a dyn Preprocessor,
    recognizer: &'a TextRecognizer,
    image_path: PathBuf,
    poll_interval: Duration,
}

impl<'a> CaptureLoop<'a> {

    pub fn new(preprocessor: &'a dyn Preprocessor, recognizer: &'a TextRecognizer, image_path: impl Into<PathBuf>) -> Self {
        Self {
            preprocessor,
            recognizer,
            image_path: image_path.into(),
            poll_interval: Duration::from_millis(1),
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Status lines go to `out`. The preview surface is opened only once the
    /// camera is; on the way out the camera is released before the surface is
    /// closed. Device and read failures are printed and returned; ocr failures
    /// are returned as they are.
    pub fn run<S, D, F>(&self, source: &mut S, open_display: F, out: &mut dyn Write) -> Result<Outcome, LprError>
    where S: FrameSource + ?Sized, D: DisplaySink, F: FnOnce() -> Result<D, LprError>
    {
        writeln!(out, "Initializing camera...")?;
        let mut opened = match OpenedSource::open(source) {
            Ok(opened) => opened,
            Err(e) => {
                writeln!(out, "Error: Unable to access the camera")?;
                log::error!("{}", e);
                return Err(e);
            },
        };
        log::debug!("idle -> previewing");
        let mut display = open_display()?;
        writeln!(out, "Press 'c' to capture an image and extract number plate text or 'q' to quit.")?;

        let res = self.preview(&mut opened, &mut display, out);
        drop(opened);
        display.close();
        res
    }

    fn preview<S, D>(&self, opened: &mut OpenedSource<'_, S>, display: &mut D, out: &mut dyn Write) -> Result<Outcome, LprError>
    where S: FrameSource + ?Sized, D: DisplaySink
    {
        loop {
            let frame = match opened.read_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    writeln!(out, "Error: Unable to read from the camera")?;
                    log::error!("{}", e);
                    return Err(e);
                },
            };
            display.show(&frame);

            let command = display.wait_key(self.poll_interval).map(Command::from_key);
            match command {
                Some(Command::Capture) => {
                    log::debug!("previewing -> processing");
                    let text = self.process(&frame, out)?;
                    log::debug!("processing -> done");
                    return Ok(Outcome::Recognized { image_path: self.image_path.clone(), text });
                },
                Some(Command::Quit) => {
                    log::debug!("previewing -> cancelled");
                    writeln!(out, "Exiting without capturing.")?;
                    return Ok(Outcome::Cancelled);
                },
                Some(Command::Ignored) | None => {},
            }
        }
    }

    fn process(&self, frame: &Frame, out: &mut dyn Write) -> Result<String, LprError> {
        save_frame(frame, &self.image_path)?;
        writeln!(out, "Image saved as {}", self.image_path.display())?;

        writeln!(out, "Processing image to extract number plate text...")?;
        let preprocessed = self.preprocessor.run(frame);
        let text = self.recognizer.recognize(&DynamicImage::ImageLuma8(preprocessed))?;
        writeln!(out, "Extracted Text: {}", text)?;
        Ok(text)
    }
}

/// Write the frame as jpeg, replacing any earlier capture at `path`.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), LprError> {
    frame.as_rgb().save_with_format(path, image::ImageFormat::Jpeg)?;
    log::info!("saved {}x{} frame to {}", frame.width(), frame.height(), path.display());
    Ok(())
}
