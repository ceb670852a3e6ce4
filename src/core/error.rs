//=========================================================================
// Engine Errors
//=========================================================================
//
// Caller-visible failures of the engine core.
//
// Removing an inactive sprite or a registration that does not exist is
// NOT an error; those operations are idempotent and report `false`.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== EngineError =========================================================

/// Errors produced by the sprite pool, the screen transform and scene setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The sprite is already active in the container.
    #[error("sprite is already active in the container")]
    DuplicateSprite,

    /// The screen transform was used before `configure()` was called.
    #[error("screen transform used before configure()")]
    NotConfigured,

    /// The requested virtual resolution is not strictly positive and finite.
    #[error("invalid virtual screen size {width}x{height}")]
    InvalidScreenSize { width: f32, height: f32 },

    /// An asset collaborator failed to resolve a name.
    #[error("failed to load asset `{name}`: {reason}")]
    AssetLoad { name: String, reason: String },

    /// The engine has been stopped and no longer accepts scenes.
    #[error("engine has been stopped")]
    Stopped,
}

//=========================================================================
// Unit Tests
//=========================================================================
