use image::ImageError;
use rusty_tesseract::TessError;

use std::error::Error;
use std::fmt;
use std::io::Error as IOError;

#[derive(Debug)]
pub struct LprError(LprErrorKind);

#[derive(Debug)]
pub enum LprErrorKind {
    /// camera could not be acquired
    DeviceUnavailable(String),
    /// an opened camera failed to deliver a frame
    ReadError(String),
    /// the device handed back a frame with a zero dimension
    EmptyFrame,
    /// the configured engine was not compiled in or failed to initialise
    EngineUnavailable(String),
    /// the preview surface could not be created
    Display(String),
    IOError(IOError),
    ImageError(ImageError),
    TesseractError(TessError),
}

impl LprError {
    pub fn kind(&self) -> &LprErrorKind {
        &self.0
    }

    pub fn device_unavailable(msg: impl Into<String>) -> Self {
        Self(LprErrorKind::DeviceUnavailable(msg.into()))
    }

    pub fn read_error(msg: impl Into<String>) -> Self {
        Self(LprErrorKind::ReadError(msg.into()))
    }

    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self(LprErrorKind::EngineUnavailable(msg.into()))
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self(LprErrorKind::Display(msg.into()))
    }

    /// Device and read failures end the run without any result.
    pub fn is_device_failure(&self) -> bool {
        matches!(
            self.kind(),
            LprErrorKind::DeviceUnavailable(_) | LprErrorKind::ReadError(_) | LprErrorKind::EmptyFrame
        )
    }
}

impl<T> From<T> for LprError
where T: Into<LprErrorKind>
{
    fn from(e: T) -> Self {
        Self(e.into())
    }
}

impl fmt::Display for LprError {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            LprErrorKind::DeviceUnavailable(msg) => write!(f, "unable to access the camera: {}", msg),
            LprErrorKind::ReadError(msg) => write!(f, "unable to read from the camera: {}", msg),
            LprErrorKind::EmptyFrame => write!(f, "camera returned an empty frame"),
            LprErrorKind::EngineUnavailable(msg) => write!(f, "ocr engine unavailable: {}", msg),
            LprErrorKind::Display(msg) => write!(f, "unable to open preview window: {}", msg),
            LprErrorKind::IOError(e) => e.fmt(f),
            LprErrorKind::ImageError(e) => e.fmt(f),
            LprErrorKind::TesseractError(e) => e.fmt(f),
        }
    }
}

impl Error for LprError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.kind() {
            LprErrorKind::IOError(e) => Some(e),
            LprErrorKind::ImageError(e) => Some(e),
            LprErrorKind::TesseractError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IOError> for LprErrorKind {
    fn from(e: IOError) -> Self {
        Self::IOError(e)
    }
}

impl From<ImageError> for LprErrorKind {
    fn from(e: ImageError) -> Self {
        Self::ImageError(e)
    }
}

impl From<TessError> for LprErrorKind {
    fn from(e: TessError) -> Self {
        Self::TesseractError(e)
    }
}


#[cfg(test)]
mod test {

    use std::error::Error;
    use std::io;

    use super::{ LprError, LprErrorKind };

    #[test]
    fn io_error_converts_and_keeps_source() {
        let err: LprError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err.kind(), LprErrorKind::IOError(_)));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "gone");
    }

    #[test]
    fn device_failures_are_classified() {
        assert!(LprError::device_unavailable("index 0").is_device_failure());
        assert!(LprError::read_error("timeout").is_device_failure());
        assert!(!LprError::engine_unavailable("tesseract missing").is_device_failure());
        assert_eq!(
            LprError::device_unavailable("index 0").to_string(),
            "unable to access the camera: index 0"
        );
    }
}
