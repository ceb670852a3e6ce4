//=========================================================================
// Sprite Engine — Library Root
//
// A 2D sprite engine core: pooled sprites, a letterboxing screen
// transform, pairwise collision checks and single-pointer touch routing,
// run one scene at a time at a fixed tick.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the core systems scenes work with (`core`)
// - Translate winit window events into engine events (`platform`)
//
// Typical usage:
// ```no_run
// use sprite_engine::prelude::*;
//
// let mut engine = EngineBuilder::new().build(renderer)?;
// engine.set_scene(TitleScene::new())?;
// engine.spawn().join();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the host-independent systems. Scenes mostly use them
// through `SceneContext`.
//
pub mod core;

// `platform` adapts winit window events for hosts built on winit. Other
// hosts send `PlatformEvent`s directly.
pub mod platform;

pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the builder and the tick loop.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineHandle, EngineState};
