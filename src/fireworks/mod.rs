//! Fireworks simulation: shells, sparks and the per-screen stage that drives
//! them. Nothing here touches SDL; the host only sees a [`RenderSurface`].

mod firework;
mod particle;
mod stage;
mod surface;

#[allow(unused_imports)]
pub use firework::{Firework, ASCENT_DECELERATION, MAX_ASCENT_TICKS, PARTICLES_PER_BURST};
#[allow(unused_imports)]
pub use particle::{Particle, LIFE_DECAY, SPARK_GRAVITY};
#[allow(unused_imports)]
pub use stage::{
    SimulationStage, SpawnKind, Tick, TickReport, DEFAULT_DISPLAY_TIME, PALETTE, TICK_INTERVAL,
};
#[allow(unused_imports)]
pub use surface::{Primitive, PrimitiveHandle, PrimitiveKind, PrimitiveStore, RenderSurface};
