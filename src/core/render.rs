//=========================================================================
// Render & Asset Collaborators
//=========================================================================
//
// The engine core performs no drawing and no I/O. It talks to two
// host-provided collaborators:
//
//   Renderer     ← node allocation, per-frame transform/texture, present
//   AssetLoader  ← name → pixel data (used only during scene setup)
//
// Both may block; they are only ever called from the tick thread.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Affine2;

//=== Internal Dependencies ===============================================

use crate::core::EngineError;

//=== Handles =============================================================

/// Renderer-side node handle, opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// Renderer-side texture reference, opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

//=== PixelData ===========================================================

/// Decoded RGBA8 image returned by an [`AssetLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

//=== Renderer ============================================================

/// Drawing backend consumed by the sprite pool and the render pass.
///
/// Every visible sprite owns one node. Nodes are allocated when the pool
/// grows, receive a device-space transform and a texture each tick, and
/// are released only when the whole pool is torn down (scene switch or
/// engine stop).
pub trait Renderer: Send {
    /// Allocates a new render node.
    fn allocate_node(&mut self) -> NodeHandle;

    /// Sets the device-space affine mapping the unit square onto the node.
    fn set_transform(&mut self, node: NodeHandle, transform: Affine2);

    /// Sets (or clears) the node's texture. `None` renders empty.
    fn set_texture(&mut self, node: NodeHandle, texture: Option<TextureId>);

    /// Releases a node allocated by [`Renderer::allocate_node`].
    fn release_node(&mut self, node: NodeHandle);

    /// Draws the active nodes, in pool order.
    fn present(&mut self, active: &[NodeHandle]);

    /// Uploads decoded pixels and returns a texture reference.
    fn create_texture(&mut self, pixels: &PixelData) -> TextureId;
}

//=== AssetLoader =========================================================

/// Resolves an asset name to decoded pixels.
pub trait AssetLoader: Send {
    fn load(&self, name: &str) -> Result<PixelData, EngineError>;
}
