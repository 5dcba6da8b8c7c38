//! Firework entity: a rising shell that bursts into sparks

use std::f32::consts::TAU;

use super::particle::Particle;
use super::surface::{PrimitiveHandle, PrimitiveKind, RenderSurface};
use crate::math::Vec2;
use crate::random::RandomSource;

/// Sparks created by every explosion
pub const PARTICLES_PER_BURST: usize = 150;
/// Deceleration of a rising shell, per tick. Much steeper than spark gravity
/// so the ascent arcs over and bursts quickly.
pub const ASCENT_DECELERATION: f32 = 0.35;
/// Ascent ticks after which a shell bursts regardless of its velocity
pub const MAX_ASCENT_TICKS: u32 = 100;
/// Shell disc diameter
pub const SHELL_SIZE: f32 = 8.0;

const LAUNCH_SPEED_BASE: f32 = 20.0;
const LAUNCH_SPEED_JITTER: u32 = 8;
const BURST_SPEED_MIN: f32 = 3.0;
const BURST_SPEED_RANGE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Rising; the shell primitive is the only visual
    Ascending { shell: PrimitiveHandle },
    /// Burst; the particle swarm is the only visual
    Exploded,
}

pub struct Firework {
    x: f32,
    y: f32,
    vy: f32,
    color: (u8, u8, u8),
    age: u32,
    state: State,
    particles: Vec<Particle>,
}

impl Firework {
    /// Launch a shell from `origin` with an upward speed in [20, 28)
    pub fn launch(
        origin: Vec2,
        color: (u8, u8, u8),
        rng: &mut impl RandomSource,
        surface: &mut impl RenderSurface,
    ) -> Self {
        let vy = -(LAUNCH_SPEED_BASE + rng.below(LAUNCH_SPEED_JITTER) as f32);
        Self::with_velocity(origin, vy, color, surface)
    }

    /// Launch a shell with an explicit initial vertical velocity
    /// (negative is upward)
    pub fn with_velocity(
        origin: Vec2,
        vy: f32,
        color: (u8, u8, u8),
        surface: &mut impl RenderSurface,
    ) -> Self {
        let shell = surface.create(PrimitiveKind::Shell, origin, SHELL_SIZE, color);
        Self {
            x: origin.x,
            y: origin.y,
            vy,
            color,
            age: 0,
            state: State::Ascending { shell },
            particles: Vec::new(),
        }
    }

    pub fn advance(&mut self, rng: &mut impl RandomSource, surface: &mut impl RenderSurface) {
        match self.state {
            State::Ascending { shell } => {
                self.y += self.vy;
                self.vy += ASCENT_DECELERATION;
                self.age += 1;

                let (r, g, b) = self.color;
                surface.update(shell, self.position(), (r, g, b, 255));

                // Apex reached, or the safety cap ran out
                if self.vy >= 0.0 || self.age >= MAX_ASCENT_TICKS {
                    self.explode(rng, surface);
                }
            },
            State::Exploded => {
                self.particles.retain_mut(|p| {
                    p.advance(surface);
                    if p.is_dead() {
                        p.release(surface);
                        false
                    } else {
                        true
                    }
                });
            },
        }
    }

    /// Burst into sparks at the current position. No-op once exploded.
    pub fn explode(&mut self, rng: &mut impl RandomSource, surface: &mut impl RenderSurface) {
        let State::Ascending { shell } = self.state else {
            return;
        };
        surface.remove(shell);
        self.state = State::Exploded;

        let origin = self.position();
        self.particles.reserve_exact(PARTICLES_PER_BURST);
        for _ in 0..PARTICLES_PER_BURST {
            let angle = rng.next_f32() * TAU;
            let speed = BURST_SPEED_MIN + rng.next_f32() * BURST_SPEED_RANGE;
            self.particles.push(Particle::spawn(
                origin,
                Vec2::from_angle(angle, speed),
                self.color,
                surface,
            ));
        }
    }

    /// Release every primitive the firework still owns
    pub fn release(&mut self, surface: &mut impl RenderSurface) {
        if let State::Ascending { shell } = self.state {
            surface.remove(shell);
            self.state = State::Exploded;
        }
        for p in self.particles.drain(..) {
            p.release(surface);
        }
    }

    #[inline]
    pub fn is_exploded(&self) -> bool {
        self.state == State::Exploded
    }

    /// Exploded and every spark has faded
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.is_exploded() && self.particles.is_empty()
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn velocity_y(&self) -> f32 {
        self.vy
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn color(&self) -> (u8, u8, u8) {
        self.color
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Primitives currently owned: the shell, or one per live spark
    pub fn primitive_count(&self) -> usize {
        if self.is_exploded() {
            self.particles.len()
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fireworks::surface::PrimitiveStore;
    use crate::random::scripted::Scripted;
    use crate::random::Rng;

    const RED: (u8, u8, u8) = (255, 0, 0);

    #[test]
    fn test_launch_velocity_range() {
        let mut rng = Rng::new(3);
        let mut store = PrimitiveStore::new();
        for _ in 0..200 {
            let fw = Firework::launch(Vec2::new(0.0, 500.0), RED, &mut rng, &mut store);
            assert!(fw.velocity_y() <= -20.0 && fw.velocity_y() > -28.0);
            assert_eq!(fw.velocity_y().fract(), 0.0);
        }
    }

    #[test]
    fn test_ascent_integration() {
        let mut rng = Rng::new(1);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::with_velocity(Vec2::new(50.0, 500.0), -20.0, RED, &mut store);

        fw.advance(&mut rng, &mut store);
        assert_eq!(fw.position(), Vec2::new(50.0, 480.0));
        assert!((fw.velocity_y() + 19.65).abs() < 1e-5);
        assert_eq!(fw.age(), 1);
        assert!(!fw.is_exploded());

        let shell = store.iter().next().copied();
        assert_eq!(shell.map(|p| p.kind), Some(PrimitiveKind::Shell));
        assert_eq!(shell.map(|p| p.position), Some(Vec2::new(50.0, 480.0)));
    }

    #[test]
    fn test_explodes_at_apex() {
        let mut rng = Rng::new(1);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::with_velocity(Vec2::new(0.0, 500.0), -20.0, RED, &mut store);

        let mut ticks = 0;
        while !fw.is_exploded() {
            fw.advance(&mut rng, &mut store);
            ticks += 1;
        }
        // -20 + 0.35 * n >= 0 first holds at n = 58
        assert_eq!(ticks, 58);
        assert!(fw.velocity_y() >= 0.0);
    }

    #[test]
    fn test_non_negative_velocity_explodes_on_first_advance() {
        let mut rng = Rng::new(1);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::with_velocity(Vec2::new(0.0, 100.0), 1.0, RED, &mut store);

        fw.advance(&mut rng, &mut store);
        assert!(fw.is_exploded());
        assert_eq!(fw.particles().len(), PARTICLES_PER_BURST);
    }

    #[test]
    fn test_safety_cap_forces_explosion() {
        let mut rng = Rng::new(1);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::with_velocity(Vec2::new(0.0, 0.0), -1000.0, RED, &mut store);

        for _ in 0..MAX_ASCENT_TICKS - 1 {
            fw.advance(&mut rng, &mut store);
        }
        assert!(!fw.is_exploded());
        fw.advance(&mut rng, &mut store);
        assert!(fw.is_exploded());
        assert_eq!(fw.age(), MAX_ASCENT_TICKS);
    }

    #[test]
    fn test_explosion_replaces_shell_with_sparks() {
        let mut rng = Rng::new(11);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::launch(Vec2::new(300.0, 300.0), RED, &mut rng, &mut store);
        assert_eq!(store.len(), 1);

        fw.explode(&mut rng, &mut store);
        assert_eq!(store.len(), PARTICLES_PER_BURST);
        assert!(store.iter().all(|p| p.kind == PrimitiveKind::Spark));
        assert!(store.iter().all(|p| p.color == (255, 0, 0, 255)));
        assert!(fw
            .particles()
            .iter()
            .all(|p| p.position() == Vec2::new(300.0, 300.0)));
    }

    #[test]
    fn test_explode_happens_once() {
        let mut rng = Rng::new(5);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::launch(Vec2::default(), RED, &mut rng, &mut store);
        fw.explode(&mut rng, &mut store);
        fw.explode(&mut rng, &mut store);
        assert_eq!(fw.particles().len(), PARTICLES_PER_BURST);
        assert_eq!(store.totals(), (1 + PARTICLES_PER_BURST as u64, 1));
    }

    #[test]
    fn test_burst_angles_and_speeds() {
        let mut rng = Rng::new(2024);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::launch(Vec2::default(), RED, &mut rng, &mut store);
        fw.explode(&mut rng, &mut store);

        let mut quadrants = [0usize; 4];
        for p in fw.particles() {
            let v = p.velocity();
            let speed = v.length();
            assert!(speed >= 3.0 - 1e-4 && speed < 8.0 + 1e-4, "speed {}", speed);
            let angle = v.y.atan2(v.x).rem_euclid(TAU);
            quadrants[(angle / (TAU / 4.0)) as usize % 4] += 1;
        }
        assert!(quadrants.iter().all(|&q| q > 0), "{:?}", quadrants);
    }

    #[test]
    fn test_burst_with_midrange_draws() {
        let mut rng = Scripted::new(0.5, 0);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::launch(Vec2::default(), RED, &mut rng, &mut store);
        fw.explode(&mut rng, &mut store);
        // angle = pi, speed = 5.5
        let v = fw.particles()[0].velocity();
        assert!(v.approx_eq(&Vec2::new(-5.5, 0.0), 1e-4));
    }

    #[test]
    fn test_dies_after_sparks_fade() {
        let mut rng = Rng::new(9);
        let mut store = PrimitiveStore::new();
        let mut fw = Firework::launch(Vec2::default(), RED, &mut rng, &mut store);
        fw.explode(&mut rng, &mut store);

        for _ in 0..66 {
            fw.advance(&mut rng, &mut store);
            assert!(!fw.is_dead());
            assert_eq!(store.len(), PARTICLES_PER_BURST);
        }
        fw.advance(&mut rng, &mut store);
        assert!(fw.is_dead());
        assert!(store.is_empty());
    }

    #[test]
    fn test_release_ascending_and_exploded() {
        let mut rng = Rng::new(4);
        let mut store = PrimitiveStore::new();

        let mut rising = Firework::launch(Vec2::default(), RED, &mut rng, &mut store);
        let mut burst = Firework::launch(Vec2::default(), RED, &mut rng, &mut store);
        burst.explode(&mut rng, &mut store);
        assert_eq!(store.len(), 1 + PARTICLES_PER_BURST);
        assert_eq!(rising.primitive_count() + burst.primitive_count(), store.len());

        rising.release(&mut store);
        burst.release(&mut store);
        assert!(store.is_empty());
        assert!(rising.is_dead() && burst.is_dead());
    }
}
