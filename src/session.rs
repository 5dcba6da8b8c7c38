//! One show: a window and a simulation stage per screen
//!
//! Stages are ticked serially from this loop at a fixed interval. A screen's
//! window closes when its stage runs out of display time; the session ends
//! when every screen is done, or early when dismissed.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use sdl2::keyboard::Keycode;

use crate::config::Hotkey;
use crate::control::Command;
use crate::display::{
    Display, InputEvent, Overlay, PixelBuffer, Placement, RenderTarget, DEFAULT_HEIGHT,
    DEFAULT_WIDTH,
};
use crate::error::Result;
use crate::fireworks::{PrimitiveStore, SimulationStage, Tick};
use crate::random::Rng;
use crate::util::TickMeter;

const TITLE: &str = "DeskBurst";

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub display_time: Duration,
    pub tick_interval: Duration,
    pub seed: u64,
    /// Single window of this size instead of one overlay per display
    pub windowed: Option<(u32, u32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every stage ran out of display time
    Elapsed,
    /// Escape, the hotkey, or a remote toggle
    Dismissed,
    /// The application should exit
    Quit,
}

struct ScreenShow<'a> {
    overlay: Overlay,
    target: RenderTarget<'a>,
    buffer: PixelBuffer,
    stage: SimulationStage<PrimitiveStore, Rng>,
}

impl ScreenShow<'_> {
    fn render(&mut self) -> Result<()> {
        self.buffer.clear(0, 0, 0);
        self.stage.surface().rasterize(&mut self.buffer);
        self.overlay.present(&mut self.target, &self.buffer)
    }

    fn close(&mut self) {
        self.stage.stop();
        self.overlay.close();
    }
}

/// Window placements for a show: every display, or one dev window
pub fn placements(display: &Display, windowed: Option<(u32, u32)>) -> Result<Vec<Placement>> {
    if let Some((width, height)) = windowed {
        return Ok(vec![Placement::Windowed { width, height }]);
    }
    let screens = display.screens()?;
    if screens.is_empty() {
        warn!("no displays reported, falling back to a window");
        return Ok(vec![Placement::Windowed {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }]);
    }
    Ok(screens.into_iter().map(Placement::Overlay).collect())
}

/// Run one show to completion
pub fn run(
    display: &mut Display,
    options: &SessionOptions,
    hotkey: &Hotkey,
    remote: &mut dyn FnMut() -> Vec<Command>,
) -> Result<SessionEnd> {
    let placements = placements(display, options.windowed)?;

    let mut overlays = Vec::with_capacity(placements.len());
    let mut creators = Vec::with_capacity(placements.len());
    for placement in &placements {
        debug!("opening {:?}", placement);
        let (overlay, creator) = display.open(TITLE, placement)?;
        overlays.push(overlay);
        creators.push(creator);
    }

    // Declared after `creators` so the textures drop first
    let mut shows = Vec::with_capacity(overlays.len());
    for (index, (overlay, creator)) in overlays.into_iter().zip(&creators).enumerate() {
        let (width, height) = (overlay.width(), overlay.height());
        let target = RenderTarget::with_size(creator, width, height)?;
        let rng = Rng::new(Rng::derive_seed(options.seed, index));
        let stage = SimulationStage::new(width, height, options.display_time, rng, PrimitiveStore::new());
        shows.push(ScreenShow {
            overlay,
            target,
            buffer: PixelBuffer::with_size(width, height),
            stage,
        });
    }

    info!(
        "show started on {} screen(s) for {:?} (seed {})",
        shows.len(),
        options.display_time,
        options.seed
    );
    let end = drive(display, &mut shows, options, hotkey, remote)?;
    info!("show ended: {:?}", end);
    Ok(end)
}

fn drive(
    display: &mut Display,
    shows: &mut [ScreenShow<'_>],
    options: &SessionOptions,
    hotkey: &Hotkey,
    remote: &mut dyn FnMut() -> Vec<Command>,
) -> Result<SessionEnd> {
    let mut meter = TickMeter::new(60);
    let mut next_tick = Instant::now();

    loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit => return Ok(SessionEnd::Quit),
                InputEvent::KeyDown { key, keymod } => {
                    if key == Keycode::Escape || hotkey.matches(key, keymod) {
                        return Ok(SessionEnd::Dismissed);
                    }
                },
                InputEvent::WindowClosed(id) => {
                    if let Some(show) = shows.iter_mut().find(|s| s.overlay.window_id() == id) {
                        show.close();
                    }
                },
            }
        }

        for cmd in remote() {
            match cmd {
                Command::Toggle => return Ok(SessionEnd::Dismissed),
                Command::Quit => return Ok(SessionEnd::Quit),
            }
        }

        for show in shows.iter_mut().filter(|s| !s.stage.is_finished()) {
            match show.stage.tick() {
                Tick::Running(_) => show.render()?,
                Tick::Finished => {
                    debug!("screen window {} done", show.overlay.window_id());
                    show.overlay.close();
                },
            }
        }
        meter.tick();

        if shows.iter().all(|s| s.stage.is_finished()) {
            debug!(
                "{} ticks, {:.1} ticks/s recent average",
                meter.total_ticks(),
                meter.avg_rate()
            );
            return Ok(SessionEnd::Elapsed);
        }

        next_tick += options.tick_interval;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            // Fell behind; resync instead of bursting
            next_tick = now;
        }
    }
}
