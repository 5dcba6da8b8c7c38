//! A single decaying spark

use super::surface::{PrimitiveHandle, PrimitiveKind, RenderSurface};
use crate::math::Vec2;

/// Downward acceleration applied to sparks, per tick
pub const SPARK_GRAVITY: f32 = 0.1;
/// Life lost per tick; a spark fades out in ~67 ticks
pub const LIFE_DECAY: f32 = 0.015;
/// Spark disc diameter
pub const SPARK_SIZE: f32 = 4.0;

/// A spark flying out of an exploded firework
pub struct Particle {
    pos: Vec2,
    vel: Vec2,
    color: (u8, u8, u8),
    life: f32,
    handle: PrimitiveHandle,
}

impl Particle {
    pub fn spawn(
        pos: Vec2,
        vel: Vec2,
        color: (u8, u8, u8),
        surface: &mut impl RenderSurface,
    ) -> Self {
        let handle = surface.create(PrimitiveKind::Spark, pos, SPARK_SIZE, color);
        Self {
            pos,
            vel,
            color,
            life: 1.0,
            handle,
        }
    }

    /// One fixed step of motion and fade, then report to the surface
    pub fn advance(&mut self, surface: &mut impl RenderSurface) {
        self.pos += self.vel;
        self.vel.y += SPARK_GRAVITY;
        self.life -= LIFE_DECAY;

        let (r, g, b) = self.color;
        surface.update(self.handle, self.pos, (r, g, b, self.alpha()));
    }

    /// Opacity proportional to remaining life
    #[inline]
    pub fn alpha(&self) -> u8 {
        // `as` saturates, so negative life maps to 0
        (255.0 * self.life) as u8
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Give the spark's primitive back to the surface
    pub fn release(&self, surface: &mut impl RenderSurface) {
        surface.remove(self.handle);
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fireworks::surface::PrimitiveStore;

    #[test]
    fn test_life_strictly_decreases_until_dead() {
        let mut store = PrimitiveStore::new();
        let mut p = Particle::spawn(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), (255, 0, 0), &mut store);

        let mut last = p.life();
        let mut ticks = 0;
        while !p.is_dead() {
            p.advance(&mut store);
            ticks += 1;
            assert!(p.life() < last);
            last = p.life();
        }
        // 1.0 / 0.015 = 66.7
        assert_eq!(ticks, 67);
    }

    #[test]
    fn test_motion_and_gravity() {
        let mut store = PrimitiveStore::new();
        let mut p = Particle::spawn(Vec2::new(10.0, 10.0), Vec2::new(2.0, -3.0), (0, 0, 255), &mut store);

        p.advance(&mut store);
        // Position uses the velocity from before gravity is applied
        assert!(p.position().approx_eq(&Vec2::new(12.0, 7.0), 1e-5));
        assert!(p.velocity().approx_eq(&Vec2::new(2.0, -2.9), 1e-5));

        p.advance(&mut store);
        assert!(p.position().approx_eq(&Vec2::new(14.0, 4.1), 1e-4));
    }

    #[test]
    fn test_alpha_reported_to_surface() {
        let mut store = PrimitiveStore::new();
        let mut p = Particle::spawn(Vec2::default(), Vec2::default(), (0, 128, 0), &mut store);
        assert_eq!(store.iter().next().map(|prim| prim.color.3), Some(255));

        p.advance(&mut store);
        let prim = store.iter().next().copied();
        assert_eq!(prim.map(|prim| prim.color), Some((0, 128, 0, 251)));
        assert_eq!(p.alpha(), 251);
    }

    #[test]
    fn test_alpha_never_wraps() {
        let mut store = PrimitiveStore::new();
        let mut p = Particle::spawn(Vec2::default(), Vec2::default(), (1, 1, 1), &mut store);
        for _ in 0..80 {
            p.advance(&mut store);
        }
        assert!(p.is_dead());
        assert_eq!(p.alpha(), 0);
    }

    #[test]
    fn test_release_frees_primitive() {
        let mut store = PrimitiveStore::new();
        let p = Particle::spawn(Vec2::default(), Vec2::default(), (1, 1, 1), &mut store);
        assert_eq!(store.len(), 1);
        p.release(&mut store);
        assert!(store.is_empty());
    }
}
