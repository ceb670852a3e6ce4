//=========================================================================
// Engine Core
//
// Host-independent systems driven by the tick.
//
// Components:
// - `sprite`: Sprite state, pooled container and texture animation
// - `screen`: Virtual ↔ device coordinate transform
// - `collision`: Registered-pair AABB collision checks
// - `touch`: Single-pointer touch routing
// - `scene`: Driver trait and the context it runs against
// - `render`: Renderer and asset-loading seams implemented by the host
// - `platform_bridge`: Host → engine event channel contract
//
//=========================================================================

//=== Module Declarations =================================================

pub mod collision;
pub mod platform_bridge;
pub mod render;
pub mod scene;
pub mod screen;
pub mod sprite;
pub mod touch;

mod error;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use error::EngineError;
