// SPDX-License-Identifier: MIT OR Apache-2.0
//! Brush overlay registration.
//!
//! The engine does not draw. It publishes brush state into an
//! [`OverlayRegistry`] shared with the host's renderer, which draws the
//! cursor ring and the falloff gradient from it. Entries are owned by an
//! [`OverlayGuard`]: acquiring registers them, dropping or releasing the
//! guard removes them.

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for an overlay entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayId(pub Uuid);

impl OverlayId {
    /// Create a new random overlay ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OverlayId {
    fn default() -> Self {
        Self::new()
    }
}

/// What the renderer should draw for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    /// Outline circle with a center dot, shown whenever the brush is active
    Cursor,
    /// Filled gradient disc scaled by strength, shown while painting
    Falloff,
}

/// Brush state published for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushOverlay {
    /// Entry type
    pub kind: OverlayKind,
    /// Center in region pixels
    pub position: [f32; 2],
    /// Radius in region pixels
    pub radius: f32,
    /// Brush strength
    pub strength: f32,
    /// Whether the entry should be drawn this frame
    pub visible: bool,
}

impl BrushOverlay {
    /// Gradient alpha for each of the falloff disc's layers
    pub fn falloff_alphas(&self) -> [f32; 4] {
        std::array::from_fn(|i| 0.15 * (1.0 - i as f32 / 4.0) * self.strength)
    }
}

/// Overlay entries shared between the engine and a renderer
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    entries: Arc<Mutex<IndexMap<OverlayId, BrushOverlay>>>,
}

impl OverlayRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries in registration order
    pub fn entries(&self) -> Vec<BrushOverlay> {
        self.entries.lock().values().copied().collect()
    }

    /// Visible entries in registration order
    pub fn visible(&self) -> Vec<BrushOverlay> {
        self.entries
            .lock()
            .values()
            .filter(|o| o.visible)
            .copied()
            .collect()
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn insert(&self, overlay: BrushOverlay) -> OverlayId {
        let id = OverlayId::new();
        self.entries.lock().insert(id, overlay);
        id
    }

    fn update(&self, id: OverlayId, f: impl FnOnce(&mut BrushOverlay)) {
        if let Some(entry) = self.entries.lock().get_mut(&id) {
            f(entry);
        }
    }

    fn remove(&self, id: OverlayId) {
        self.entries.lock().shift_remove(&id);
    }
}

/// Scoped registration of the brush cursor and falloff overlays
#[derive(Debug)]
pub struct OverlayGuard {
    registry: OverlayRegistry,
    cursor: Option<OverlayId>,
    falloff: Option<OverlayId>,
}

impl OverlayGuard {
    /// Register both overlays at `position`
    pub fn acquire(registry: &OverlayRegistry, position: [f32; 2], radius: f32, strength: f32) -> Self {
        let cursor = registry.insert(BrushOverlay {
            kind: OverlayKind::Cursor,
            position,
            radius,
            strength,
            visible: true,
        });
        let falloff = registry.insert(BrushOverlay {
            kind: OverlayKind::Falloff,
            position,
            radius,
            strength,
            visible: false,
        });
        tracing::debug!("Registered brush overlays");

        Self {
            registry: registry.clone(),
            cursor: Some(cursor),
            falloff: Some(falloff),
        }
    }

    /// Whether the overlays are still registered
    pub fn is_registered(&self) -> bool {
        self.cursor.is_some() || self.falloff.is_some()
    }

    /// Publish the current brush state
    pub fn update(&self, position: [f32; 2], radius: f32, strength: f32, painting: bool) {
        if let Some(id) = self.cursor {
            self.registry.update(id, |o| {
                o.position = position;
                o.radius = radius;
                o.strength = strength;
            });
        }
        if let Some(id) = self.falloff {
            self.registry.update(id, |o| {
                o.position = position;
                o.radius = radius;
                o.strength = strength;
                o.visible = painting;
            });
        }
    }

    /// Unregister the overlays; safe to call repeatedly
    pub fn release(&mut self) {
        let mut released = false;
        for id in [self.cursor.take(), self.falloff.take()].into_iter().flatten() {
            self.registry.remove(id);
            released = true;
        }
        if released {
            tracing::debug!("Released brush overlays");
        }
    }
}

impl Drop for OverlayGuard {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let registry = OverlayRegistry::new();
        let mut guard = OverlayGuard::acquire(&registry, [10.0, 20.0], 50.0, 0.5);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.visible().len(), 1);

        guard.release();
        assert!(registry.is_empty());
        assert!(!guard.is_registered());

        guard.release();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_drop_releases() {
        let registry = OverlayRegistry::new();
        {
            let _guard = OverlayGuard::acquire(&registry, [0.0, 0.0], 50.0, 0.5);
            assert_eq!(registry.len(), 2);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_update_shows_falloff_while_painting() {
        let registry = OverlayRegistry::new();
        let guard = OverlayGuard::acquire(&registry, [0.0, 0.0], 50.0, 0.5);
        guard.update([5.0, 6.0], 80.0, 1.0, true);

        let visible = registry.visible();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|o| o.position == [5.0, 6.0] && o.radius == 80.0));

        let falloff = visible.iter().find(|o| o.kind == OverlayKind::Falloff).unwrap();
        assert_eq!(falloff.falloff_alphas()[0], 0.15);
    }
}
