use std::time::Duration;

use crate::camera::Frame;
#[cfg(feature = "window")]
use crate::error::LprError;

/// Single-key commands accepted while previewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Capture,
    Quit,
    Ignored,
}

impl Command {
    pub fn from_key(key: char) -> Self {
        match key {
            'c' => Command::Capture,
            'q' => Command::Quit,
            _ => Command::Ignored,
        }
    }
}

/// Live preview surface that also reports key presses.
/// Showing a frame is best-effort and never fails the run.
pub trait DisplaySink {
    fn show(&mut self, frame: &Frame);

    /// Wait up to `timeout` for a key press.
    fn wait_key(&mut self, timeout: Duration) -> Option<char>;

    fn close(&mut self);
}

impl<D: DisplaySink + ?Sized> DisplaySink for &mut D {
    fn show(&mut self, frame: &Frame) {
        (**self).show(frame)
    }

    fn wait_key(&mut self, timeout: Duration) -> Option<char> {
        (**self).wait_key(timeout)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// The typed character of a text input event; shift and layout already applied.
#[cfg(any(feature = "window", test))]
fn key_from_text(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(feature = "window")]
pub struct SdlWindow {
    _context: sdl2::Sdl,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    textures: sdl2::render::TextureCreator<sdl2::video::WindowContext>,
    events: sdl2::EventPump,
    sized: bool,
}

#[cfg(feature = "window")]
impl SdlWindow {

    pub fn open(title: &str) -> Result<Self, LprError> {
        let context = sdl2::init().map_err(LprError::display)?;
        let video = context.video().map_err(LprError::display)?;
        let window = video.window(title, 640, 480)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| LprError::display(e.to_string()))?;
        let canvas = window.into_canvas().build().map_err(|e| LprError::display(e.to_string()))?;
        let textures = canvas.texture_creator();
        // key presses are read as typed text so `C` and `c` stay distinct
        video.text_input().start();
        let events = context.event_pump().map_err(LprError::display)?;
        Ok(Self { _context: context, canvas, textures, events, sized: false })
    }

    fn draw(&mut self, frame: &Frame) -> Result<(), String> {
        use sdl2::pixels::PixelFormatEnum;

        let (width, height) = (frame.width(), frame.height());
        if !self.sized {
            self.canvas.window_mut().set_size(width, height).map_err(|e| e.to_string())?;
            self.sized = true;
        }
        let mut texture = self.textures
            .create_texture_streaming(PixelFormatEnum::RGB24, width, height)
            .map_err(|e| e.to_string())?;
        texture.update(None, frame.as_rgb().as_raw(), width as usize * 3).map_err(|e| e.to_string())?;
        self.canvas.clear();
        self.canvas.copy(&texture, None, None)?;
        self.canvas.present();
        Ok(())
    }
}

#[cfg(feature = "window")]
impl DisplaySink for SdlWindow {

    fn show(&mut self, frame: &Frame) {
        if let Err(e) = self.draw(frame) {
            log::warn!("failed to draw preview frame: {}", e);
        }
    }

    fn wait_key(&mut self, timeout: Duration) -> Option<char> {
        use sdl2::event::Event;

        let first = self.events.wait_event_timeout(timeout.as_millis().max(1) as u32);
        first.into_iter().chain(self.events.poll_iter()).find_map(|event| match event {
            // closing the window counts as quitting
            Event::Quit { .. } => Some('q'),
            Event::TextInput { text, .. } => key_from_text(&text),
            _ => None,
        })
    }

    fn close(&mut self) {
        self.canvas.window_mut().hide();
    }
}
