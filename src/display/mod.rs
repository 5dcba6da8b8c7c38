mod pixel_buffer;

pub use pixel_buffer::PixelBuffer;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::sys::SDL_WindowFlags;
use sdl2::video::{Window, WindowContext};
use sdl2::{EventPump, Sdl, VideoSubsystem};

use crate::error::Result;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

/// Bounds of one connected display in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub index: i32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Where a show window goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Borderless, always on top, covering a whole display
    Overlay(Screen),
    /// A regular centered window, for development
    Windowed { width: u32, height: u32 },
}

impl Placement {
    pub fn size(&self) -> (u32, u32) {
        match *self {
            Self::Overlay(screen) => (screen.width, screen.height),
            Self::Windowed { width, height } => (width, height),
        }
    }
}

pub struct Display {
    _sdl: Sdl,
    video: VideoSubsystem,
    event_pump: EventPump,
}

/// A show window and its canvas
pub struct Overlay {
    canvas: Canvas<Window>,
    window_id: u32,
    width: u32,
    height: u32,
}

pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    WindowClosed(u32),
    KeyDown { key: Keycode, keymod: Mod },
}

impl Display {
    pub fn init() -> Result<Self> {
        let sdl = sdl2::init()?;
        let video = sdl.video()?;
        let event_pump = sdl.event_pump()?;
        Ok(Self {
            _sdl: sdl,
            video,
            event_pump,
        })
    }

    /// Every connected display
    pub fn screens(&self) -> Result<Vec<Screen>> {
        let count = self.video.num_video_displays()?;
        (0..count)
            .map(|index| -> Result<Screen> {
                let bounds = self.video.display_bounds(index)?;
                Ok(Screen {
                    index,
                    x: bounds.x(),
                    y: bounds.y(),
                    width: bounds.width(),
                    height: bounds.height(),
                })
            })
            .collect()
    }

    /// Open a show window
    pub fn open(
        &self,
        title: &str,
        placement: &Placement,
    ) -> Result<(Overlay, TextureCreator<WindowContext>)> {
        let (width, height) = placement.size();
        let mut builder = self.video.window(title, width, height);
        match *placement {
            Placement::Overlay(screen) => {
                builder
                    .set_window_flags(
                        SDL_WindowFlags::SDL_WINDOW_ALWAYS_ON_TOP as u32
                            | SDL_WindowFlags::SDL_WINDOW_SKIP_TASKBAR as u32,
                    )
                    .position(screen.x, screen.y)
                    .borderless();
            },
            Placement::Windowed { .. } => {
                builder.position_centered();
            },
        }
        let window = builder.build().map_err(|e| e.to_string())?;
        let window_id = window.id();

        // Not vsynced; the session paces presents
        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;
        let texture_creator = canvas.texture_creator();

        Ok((
            Overlay {
                canvas,
                window_id,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::Window {
                    window_id,
                    win_event: WindowEvent::Close,
                    ..
                } => events.push(InputEvent::WindowClosed(window_id)),
                Event::KeyDown {
                    keycode: Some(key),
                    keymod,
                    ..
                } => events.push(InputEvent::KeyDown { key, keymod }),
                _ => {},
            }
        }

        events
    }
}

impl Overlay {
    pub fn window_id(&self) -> u32 {
        self.window_id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn present(&mut self, target: &mut RenderTarget, buffer: &PixelBuffer) -> Result<()> {
        target
            .texture
            .update(None, buffer.as_bytes(), (buffer.width() * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    /// Take the window off screen; it is destroyed when dropped
    pub fn close(&mut self) {
        self.canvas.window_mut().hide();
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming render target matching a window
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_size() {
        let screen = Screen {
            index: 1,
            x: 1920,
            y: 0,
            width: 2560,
            height: 1440,
        };
        assert_eq!(Placement::Overlay(screen).size(), (2560, 1440));
        assert_eq!(
            Placement::Windowed {
                width: 640,
                height: 480
            }
            .size(),
            (640, 480)
        );
    }
}
