//=========================================================================
// Touch Dispatch
//=========================================================================
//
// Single-pointer touch routing.
//
// Architecture:
//   device (x, y) ─► ScreenTransform::to_virtual ─► (vx, vy)
//       ├─► every global listener, in registration order
//       └─► every sprite listener whose sprite box contains (vx, vy)
//
// Hit testing is point-in-box (inclusive), the same containment rule the
// collision engine applies to corners.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::core::collision::Collider;
use crate::core::screen::ScreenTransform;
use crate::core::sprite::SpriteHandle;
use crate::core::EngineError;

//=== TouchPhase ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Begin,
    Move,
    End,
}

//=== TouchEvent ==========================================================

/// A touch sample in device pixels, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self { phase, x, y }
    }
}

//=== TouchListener =======================================================

/// Receives touch notifications in virtual coordinates.
///
/// All callbacks default to no-ops; implement the phases you need.
pub trait TouchListener: Send + Sync {
    fn on_touch_begin(&self, _x: f32, _y: f32) {}
    fn on_touch_move(&self, _x: f32, _y: f32) {}
    fn on_touch_end(&self, _x: f32, _y: f32) {}
}

fn same_listener(a: &Arc<dyn TouchListener>, b: &Arc<dyn TouchListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

fn notify(listener: &dyn TouchListener, phase: TouchPhase, x: f32, y: f32) {
    match phase {
        TouchPhase::Begin => listener.on_touch_begin(x, y),
        TouchPhase::Move => listener.on_touch_move(x, y),
        TouchPhase::End => listener.on_touch_end(x, y),
    }
}

//=== TouchDispatcher =====================================================

/// Global and per-sprite touch listeners.
#[derive(Default)]
pub struct TouchDispatcher {
    listeners: Vec<Arc<dyn TouchListener>>,
    sprite_listeners: Vec<(SpriteHandle, Arc<dyn TouchListener>)>,
}

impl TouchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Global Listeners -------------------------------------------------

    /// Adds a global listener. Returns `false` if it was already added.
    pub fn add_listener(&mut self, listener: Arc<dyn TouchListener>) -> bool {
        if self.listeners.iter().any(|l| same_listener(l, &listener)) {
            debug!(target: "touch", "Listener already registered, ignoring");
            return false;
        }
        self.listeners.push(listener);
        true
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn TouchListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        self.listeners.len() != before
    }

    //--- Sprite Listeners -------------------------------------------------

    /// Adds a listener notified only while the touch point is inside
    /// `sprite`. Returns `false` if the exact pair was already added.
    pub fn add_sprite_listener(
        &mut self,
        sprite: &SpriteHandle,
        listener: Arc<dyn TouchListener>,
    ) -> bool {
        let exists = self
            .sprite_listeners
            .iter()
            .any(|(s, l)| s.ptr_eq(sprite) && same_listener(l, &listener));
        if exists {
            debug!(target: "touch", "Sprite listener already registered, ignoring");
            return false;
        }
        self.sprite_listeners.push((sprite.clone(), listener));
        true
    }

    pub fn remove_sprite_listener(
        &mut self,
        sprite: &SpriteHandle,
        listener: &Arc<dyn TouchListener>,
    ) -> bool {
        let before = self.sprite_listeners.len();
        self.sprite_listeners
            .retain(|(s, l)| !(s.ptr_eq(sprite) && same_listener(l, listener)));
        self.sprite_listeners.len() != before
    }

    /// Removes every listener attached to `sprite`; returns how many.
    pub fn remove_sprite_listeners(&mut self, sprite: &SpriteHandle) -> usize {
        let before = self.sprite_listeners.len();
        self.sprite_listeners.retain(|(s, _)| !s.ptr_eq(sprite));
        before - self.sprite_listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
        self.sprite_listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len() + self.sprite_listeners.len()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Maps a device touch into virtual space and notifies listeners.
    ///
    /// Returns the virtual point the listeners received.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotConfigured`] if the screen has no virtual size.
    pub fn dispatch(
        &self,
        screen: &ScreenTransform,
        event: TouchEvent,
    ) -> Result<(f32, f32), EngineError> {
        let (x, y) = screen.to_virtual(event.x, event.y)?;
        trace!(target: "touch", "{:?} device ({}, {}) -> virtual ({}, {})", event.phase, event.x, event.y, x, y);

        self.notify_virtual(event.phase, x, y);
        Ok((x, y))
    }

    /// Notifies listeners of a touch already in virtual coordinates.
    pub fn notify_virtual(&self, phase: TouchPhase, x: f32, y: f32) {
        for listener in &self.listeners {
            notify(listener.as_ref(), phase, x, y);
        }

        for (sprite, listener) in &self.sprite_listeners {
            if sprite.aabb().contains_point(x, y) {
                notify(listener.as_ref(), phase, x, y);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
