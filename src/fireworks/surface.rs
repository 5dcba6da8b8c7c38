//! Render surface seam between the simulation and the screen
//!
//! The simulation only pushes primitives; it never reads them back.
//! [`PrimitiveStore`] is the retained implementation the host paints from.

use std::collections::BTreeMap;

use crate::display::PixelBuffer;
use crate::math::Vec2;

/// Opaque handle to a primitive owned by exactly one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrimitiveHandle(u64);

/// What an entity looks like on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// The rising point of an unexploded firework
    Shell,
    /// A single spark of an explosion
    Spark,
}

/// Sink for visual primitives
pub trait RenderSurface {
    /// Create a disc of diameter `size` centered on `position`, fully opaque
    fn create(
        &mut self,
        kind: PrimitiveKind,
        position: Vec2,
        size: f32,
        color: (u8, u8, u8),
    ) -> PrimitiveHandle;

    /// Move a primitive and set its color with alpha
    fn update(&mut self, handle: PrimitiveHandle, position: Vec2, color: (u8, u8, u8, u8));

    /// Release a primitive; the handle is invalid afterwards
    fn remove(&mut self, handle: PrimitiveHandle);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn create(
        &mut self,
        kind: PrimitiveKind,
        position: Vec2,
        size: f32,
        color: (u8, u8, u8),
    ) -> PrimitiveHandle {
        (**self).create(kind, position, size, color)
    }

    fn update(&mut self, handle: PrimitiveHandle, position: Vec2, color: (u8, u8, u8, u8)) {
        (**self).update(handle, position, color);
    }

    fn remove(&mut self, handle: PrimitiveHandle) {
        (**self).remove(handle);
    }
}

/// A primitive as the store retains it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub position: Vec2,
    pub size: f32,
    pub color: (u8, u8, u8, u8),
}

/// Retained scene of live primitives, painted in creation order
#[derive(Debug, Default)]
pub struct PrimitiveStore {
    primitives: BTreeMap<PrimitiveHandle, Primitive>,
    next_id: u64,
    created: u64,
    removed: u64,
}

impl PrimitiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live primitives
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn get(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        self.primitives.get(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.values()
    }

    /// Total (created, removed) since the store was made
    pub fn totals(&self) -> (u64, u64) {
        (self.created, self.removed)
    }

    /// Paint every primitive as an alpha-blended disc
    pub fn rasterize(&self, buffer: &mut PixelBuffer) {
        for p in self.primitives.values() {
            let (r, g, b, a) = p.color;
            if a == 0 {
                continue;
            }
            let radius = (p.size * 0.5) as i32;
            buffer.fill_circle_blend(
                p.position.x.round() as i32,
                p.position.y.round() as i32,
                radius,
                r,
                g,
                b,
                a,
            );
        }
    }
}

impl RenderSurface for PrimitiveStore {
    fn create(
        &mut self,
        kind: PrimitiveKind,
        position: Vec2,
        size: f32,
        color: (u8, u8, u8),
    ) -> PrimitiveHandle {
        let handle = PrimitiveHandle(self.next_id);
        self.next_id += 1;
        self.created += 1;
        self.primitives.insert(
            handle,
            Primitive {
                kind,
                position,
                size,
                color: (color.0, color.1, color.2, 255),
            },
        );
        handle
    }

    fn update(&mut self, handle: PrimitiveHandle, position: Vec2, color: (u8, u8, u8, u8)) {
        if let Some(p) = self.primitives.get_mut(&handle) {
            p.position = position;
            p.color = color;
        } else {
            log::warn!("update of released primitive {:?}", handle);
        }
    }

    fn remove(&mut self, handle: PrimitiveHandle) {
        if self.primitives.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            log::warn!("double release of primitive {:?}", handle);
        }
    }
}
