use image::RgbImage;

use crate::error::{ LprError, LprErrorKind };

/// One raster image from the live feed, 8 bits per RGB channel.
/// A frame never has a zero dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame(RgbImage);

impl Frame {

    pub fn new(img: RgbImage) -> Result<Self, LprError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(LprErrorKind::EmptyFrame.into());
        }
        Ok(Self(img))
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, LprError> {
        let img = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| LprError::read_error(format!("buffer does not fit a {}x{} frame", width, height)))?;
        Self::new(img)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.0
    }
}

/// A capture device yielding frames on demand.
pub trait FrameSource {
    /// Acquire the device. No retry is attempted on failure.
    fn open(&mut self) -> Result<(), LprError>;

    /// Block until the next frame is available.
    fn read_frame(&mut self) -> Result<Frame, LprError>;

    fn release(&mut self);
}

/// An opened source; the device is released when this goes out of scope.
pub struct OpenedSource<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: FrameSource + ?Sized> OpenedSource<'a, S> {

    pub fn open(source: &'a mut S) -> Result<Self, LprError> {
        source.open()?;
        Ok(Self { source })
    }

    pub fn read_frame(&mut self) -> Result<Frame, LprError> {
        self.source.read_frame()
    }
}

impl<'a, S: FrameSource + ?Sized> Drop for OpenedSource<'a, S> {
    fn drop(&mut self) {
        log::debug!("releasing capture device");
        self.source.release();
    }
}

/// Webcam backed by nokhwa, using the platform's native capture api when one is known.
#[cfg(feature = "camera")]
pub struct NokhwaCamera {
    index: u32,
    camera: Option<nokhwa::Camera>,
}

#[cfg(feature = "camera")]
impl NokhwaCamera {
    pub fn new(index: u32) -> Self {
        Self { index, camera: None }
    }
}

#[cfg(feature = "camera")]
impl FrameSource for NokhwaCamera {

    fn open(&mut self) -> Result<(), LprError> {
        use nokhwa::pixel_format::RgbFormat;
        use nokhwa::utils::{ CameraIndex, RequestedFormat, RequestedFormatType };
        use nokhwa::Camera;

        #[cfg(target_os = "macos")]
        nokhwa::nokhwa_initialize(|granted| log::debug!("camera permission granted: {}", granted));

        let index = CameraIndex::Index(self.index);
        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let camera = match nokhwa::native_api_backend() {
            Some(backend) => {
                log::debug!("opening camera {} with backend {:?}", self.index, backend);
                Camera::with_backend(index, format, backend)
            },
            None => Camera::new(index, format),
        };
        let mut camera = camera.map_err(|e| LprError::device_unavailable(e.to_string()))?;
        camera.open_stream().map_err(|e| LprError::device_unavailable(e.to_string()))?;
        log::info!("camera {} opened at {}", self.index, camera.resolution());
        self.camera = Some(camera);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, LprError> {
        use nokhwa::pixel_format::RgbFormat;

        let camera = self.camera.as_mut().ok_or_else(|| LprError::read_error("camera is not open"))?;
        let buffer = camera.frame().map_err(|e| LprError::read_error(e.to_string()))?;
        let decoded = buffer.decode_image::<RgbFormat>().map_err(|e| LprError::read_error(e.to_string()))?;
        // nokhwa links its own copy of `image`, so hand the pixels over raw
        let (width, height) = (decoded.width(), decoded.height());
        Frame::from_raw(width, height, decoded.into_raw())
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("failed to stop camera stream: {}", e);
            }
        }
    }
}
