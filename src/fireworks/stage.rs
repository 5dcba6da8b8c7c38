//! Per-screen simulation driver
//!
//! A [`SimulationStage`] owns the fireworks of one screen, its render surface
//! and its random source. The host calls [`SimulationStage::tick`] at a fixed
//! rate; physics is per tick and never scaled by real elapsed time, so a
//! slower clock slows the show down without changing trajectories.

use std::time::{Duration, Instant};

use log::{debug, trace};

use super::firework::Firework;
use super::surface::RenderSurface;
use crate::math::Vec2;
use crate::random::RandomSource;

/// Firework colors, drawn uniformly
pub const PALETTE: [(u8, u8, u8); 8] = [
    (255, 0, 0),     // Red
    (255, 255, 255), // White
    (0, 0, 255),     // Blue
    (0, 128, 0),     // Green
    (255, 215, 0),   // Gold
    (128, 0, 128),   // Purple
    (255, 165, 0),   // Orange
    (255, 192, 203), // Pink
];

/// Fireworks that may still appear already exploded, anywhere on screen
pub const INITIAL_BUDGET: u32 = 15;
/// Fireworks that may still launch from the bottom edge via the budget roll
pub const LAUNCH_BUDGET: u32 = 10;

/// Reference session length
pub const DEFAULT_DISPLAY_TIME: Duration = Duration::from_millis(10_000);
/// Nominal clock interval the physics constants are tuned for (~60 Hz)
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

// Spawn probabilities, in percent
const IMMEDIATE_SPAWN_CHANCE: u32 = 20;
const LAUNCH_SPAWN_CHANCE: u32 = 10;
const REPLACEMENT_CHANCE: u32 = 70;

/// Launches start this far above the bottom edge, at most
const LAUNCH_JITTER: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    /// Already exploded, at a random point over the whole surface
    Immediate,
    /// Rising from near the bottom edge
    Launch,
}

/// What happened during one tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub spawned_immediate: u32,
    pub spawned_launch: u32,
    pub reaped: u32,
    pub replacements: u32,
    pub active: usize,
    pub particles: usize,
    pub initial_budget: u32,
    pub launch_budget: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running(TickReport),
    /// The display time ran out or the host stopped the stage
    Finished,
}

pub struct SimulationStage<S: RenderSurface, R: RandomSource> {
    fireworks: Vec<Firework>,
    surface: S,
    rng: R,
    width: f32,
    height: f32,
    initial_budget: u32,
    launch_budget: u32,
    display_time: Duration,
    started: Instant,
    finished: bool,
}

impl<S: RenderSurface, R: RandomSource> SimulationStage<S, R> {
    /// Start a stage now
    pub fn new(width: u32, height: u32, display_time: Duration, rng: R, surface: S) -> Self {
        Self::starting_at(width, height, display_time, rng, surface, Instant::now())
    }

    /// Start a stage whose display time is measured from `started`
    pub fn starting_at(
        width: u32,
        height: u32,
        display_time: Duration,
        rng: R,
        surface: S,
        started: Instant,
    ) -> Self {
        let mut stage = Self {
            fireworks: Vec::new(),
            surface,
            rng,
            width: width as f32,
            height: height as f32,
            initial_budget: INITIAL_BUDGET,
            launch_budget: LAUNCH_BUDGET,
            display_time,
            started,
            finished: false,
        };

        // One burst straight away so the screen lights up without waiting
        // for a launch, plus one launch
        stage.spawn(SpawnKind::Immediate);
        stage.spawn(SpawnKind::Launch);

        debug!(
            "stage {}x{} started, display time {:?}",
            width, height, display_time
        );
        stage
    }

    /// Advance one step using the monotonic clock
    pub fn tick(&mut self) -> Tick {
        self.tick_at(Instant::now())
    }

    /// Advance one step as of `now`
    pub fn tick_at(&mut self, now: Instant) -> Tick {
        if self.finished {
            return Tick::Finished;
        }
        if now.saturating_duration_since(self.started) >= self.display_time {
            debug!(
                "stage display time elapsed with {} fireworks live",
                self.fireworks.len()
            );
            self.stop();
            return Tick::Finished;
        }

        let mut report = TickReport::default();

        if self.initial_budget > 0 && self.rng.below(100) < IMMEDIATE_SPAWN_CHANCE {
            self.spawn(SpawnKind::Immediate);
            self.initial_budget -= 1;
            report.spawned_immediate += 1;
        }

        if self.launch_budget > 0 && self.rng.below(100) < LAUNCH_SPAWN_CHANCE {
            self.spawn(SpawnKind::Launch);
            self.launch_budget -= 1;
            report.spawned_launch += 1;
        }

        // Back to front: removals never shift an unvisited firework, and
        // replacements land past the cursor so they wait for the next tick
        let mut i = self.fireworks.len();
        while i > 0 {
            i -= 1;
            self.fireworks[i].advance(&mut self.rng, &mut self.surface);

            if self.fireworks[i].is_dead() {
                self.fireworks.remove(i);
                report.reaped += 1;

                if self.rng.below(100) < REPLACEMENT_CHANCE {
                    self.spawn(SpawnKind::Launch);
                    report.replacements += 1;
                }
            }
        }

        report.active = self.fireworks.len();
        report.particles = self.fireworks.iter().map(|f| f.particles().len()).sum();
        report.initial_budget = self.initial_budget;
        report.launch_budget = self.launch_budget;
        trace!("{:?}", report);

        Tick::Running(report)
    }

    /// Stop ticking and release every primitive still on the surface
    pub fn stop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        for mut fw in self.fireworks.drain(..) {
            fw.release(&mut self.surface);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn spawn(&mut self, kind: SpawnKind) {
        let x = self.rng.next_f32() * self.width;
        let y = match kind {
            SpawnKind::Immediate => self.rng.next_f32() * self.height,
            SpawnKind::Launch => self.height - self.rng.next_f32() * LAUNCH_JITTER,
        };
        let color = PALETTE[self.rng.below(PALETTE.len() as u32) as usize];

        let mut fw = Firework::launch(Vec2::new(x, y), color, &mut self.rng, &mut self.surface);
        if kind == SpawnKind::Immediate {
            fw.explode(&mut self.rng, &mut self.surface);
        }
        self.fireworks.push(fw);
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn initial_budget(&self) -> u32 {
        self.initial_budget
    }

    pub fn launch_budget(&self) -> u32 {
        self.launch_budget
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

impl<S: RenderSurface, R: RandomSource> Drop for SimulationStage<S, R> {
    fn drop(&mut self) {
        self.stop();
    }
}
