//=========================================================================
// Sprites
//=========================================================================
//
// Architecture:
//   Sprite        plain value (center, size, rotation, texture)
//   SpriteHandle  shared identity: Arc<SharedSprite> ─► Mutex<Sprite>
//
// Scenes keep handles to the sprites they move around; the pool, the
// collision engine and touch hit testing hold clones of the same handle
// and compare them by pointer identity.
//
//=========================================================================

//=== Module Declarations =================================================

mod animation;
mod container;

//=== Public API ==========================================================

pub use animation::{AnimationSet, AnimationState};
pub use container::{ActiveSprites, SlotId, SpriteContainer};

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

//=== Internal Dependencies ===============================================

use crate::core::collision::Collider;
use crate::core::render::TextureId;

//=== Sprite ==============================================================

/// A renderable entity in virtual space.
///
/// `x`/`y` is the center, `w`/`h` the size (never negative once written
/// through a [`SpriteHandle`]), `rotation` is in radians. A sprite without
/// a texture still collides and hit-tests but renders empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub rotation: f32,
    pub texture: Option<TextureId>,
}

impl Sprite {
    /// Creates an untextured, unrotated sprite centered at `(x, y)`.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
            rotation: 0.0,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }
}

impl Collider for Sprite {
    fn xywh(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.w.max(0.0), self.h.max(0.0))
    }
}

//=== SharedSprite ========================================================

/// Heap cell behind a [`SpriteHandle`]. Its address is the sprite identity.
pub(crate) struct SharedSprite {
    state: Mutex<Sprite>,
}

impl SharedSprite {
    fn lock(&self) -> MutexGuard<'_, Sprite> {
        // A panic while holding the lock cannot leave a Copy value torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Collider for SharedSprite {
    fn xywh(&self) -> (f32, f32, f32, f32) {
        self.lock().xywh()
    }
}

//=== SpriteHandle ========================================================

/// Cloneable shared handle to a sprite.
///
/// Clones refer to the same sprite; [`SpriteHandle::ptr_eq`] is the
/// identity used by the pool ("at most one active slot per sprite").
///
/// ```rust
/// use sprite_engine::prelude::*;
///
/// let ball = SpriteHandle::new(Sprite::new(540.0, 960.0, 48.0, 48.0));
/// let alias = ball.clone();
/// alias.set_position(10.0, 20.0);
/// assert_eq!((ball.get().x, ball.get().y), (10.0, 20.0));
/// assert!(ball.ptr_eq(&alias));
/// ```
#[derive(Clone)]
pub struct SpriteHandle(Arc<SharedSprite>);

impl SpriteHandle {
    /// Wraps `sprite`. Negative sizes are clamped to zero.
    pub fn new(mut sprite: Sprite) -> Self {
        sprite.w = sprite.w.max(0.0);
        sprite.h = sprite.h.max(0.0);
        Self(Arc::new(SharedSprite {
            state: Mutex::new(sprite),
        }))
    }

    //--- Access -----------------------------------------------------------

    /// Returns a snapshot of the sprite.
    pub fn get(&self) -> Sprite {
        *self.0.lock()
    }

    /// Overwrites the sprite. Negative sizes are clamped to zero.
    pub fn set(&self, sprite: Sprite) {
        self.update(|s| *s = sprite);
    }

    /// Mutates the sprite in place and returns the closure's result.
    pub fn update<R>(&self, f: impl FnOnce(&mut Sprite) -> R) -> R {
        let mut guard = self.0.lock();
        let result = f(&mut guard);
        guard.w = guard.w.max(0.0);
        guard.h = guard.h.max(0.0);
        result
    }

    pub fn set_position(&self, x: f32, y: f32) {
        self.update(|s| {
            s.x = x;
            s.y = y;
        });
    }

    pub fn set_size(&self, w: f32, h: f32) {
        self.update(|s| {
            s.w = w;
            s.h = h;
        });
    }

    pub fn set_rotation(&self, radians: f32) {
        self.update(|s| s.rotation = radians);
    }

    pub fn set_texture(&self, texture: Option<TextureId>) {
        self.update(|s| s.texture = texture);
    }

    //--- Identity ---------------------------------------------------------

    /// Returns `true` if both handles refer to the same sprite.
    pub fn ptr_eq(&self, other: &SpriteHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns this sprite as a collider sharing the same identity.
    ///
    /// Use this (not `Arc::new(handle)`) when registering sprites with the
    /// collision engine, so `unregister` can find them again.
    pub fn as_collider(&self) -> Arc<dyn Collider> {
        self.0.clone()
    }
}

impl Collider for SpriteHandle {
    fn xywh(&self) -> (f32, f32, f32, f32) {
        self.0.xywh()
    }
}

impl fmt::Debug for SpriteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteHandle")
            .field("ptr", &Arc::as_ptr(&self.0))
            .field("sprite", &self.get())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
