//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use sprite_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineHandle, EngineState};
pub use crate::core::EngineError;

// Scenes
pub use crate::core::scene::{Driver, SceneContext};

// Sprites and rendering
pub use crate::core::render::{AssetLoader, NodeHandle, PixelData, Renderer, TextureId};
pub use crate::core::sprite::{AnimationSet, Sprite, SpriteHandle};

// Collision and touch
pub use crate::core::collision::{Collider, CollisionListener, CollisionPolicy};
pub use crate::core::touch::{TouchEvent, TouchListener, TouchPhase};

// Host events
pub use crate::core::platform_bridge::{PlatformEvent, TickControl};
