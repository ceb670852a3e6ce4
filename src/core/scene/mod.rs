//=========================================================================
// Scene System
//=========================================================================
//
// A scene is a `Driver`: the game code the engine runs once per tick.
//
// Architecture:
//   Engine
//     ├─ driver: Box<dyn Driver>      (exactly one active scene)
//     └─ SceneContext                 (sprites, collisions, touch, screen)
//
// Flow:
//   set_scene() → teardown → Driver::initialize()
//   tick()      → Driver::drive() → collisions → render → pending switch
//
//=========================================================================

//=== Module Declarations =================================================

mod context;
mod transition_queue;

//=== Public API ==========================================================

pub use context::SceneContext;

pub(crate) use transition_queue::PendingScene;

//=== Internal Dependencies ===============================================

use crate::core::EngineError;

//=== Driver Trait ========================================================

/// Game code for one scene.
///
/// `initialize` runs once when the scene becomes active; `drive` runs once
/// per tick after input was dispatched and before collisions are checked.
///
/// Touch hooks default to no-ops and receive virtual coordinates.
///
/// ```rust
/// # use sprite_engine::prelude::*;
/// struct Title {
///     logo: SpriteHandle,
/// }
///
/// impl Driver for Title {
///     fn initialize(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
///         ctx.configure_screen(1080.0, 1920.0)?;
///         ctx.add_sprite(&self.logo)?;
///         Ok(())
///     }
///
///     fn drive(&mut self, _ctx: &mut SceneContext) {
///         self.logo.update(|s| s.rotation += 0.01);
///     }
/// }
/// ```
pub trait Driver: Send {
    /// Builds the scene: configures the screen, adds sprites and
    /// registers listeners.
    ///
    /// An error aborts the scene switch; the engine is left without an
    /// active scene.
    fn initialize(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError>;

    /// Per-tick scene logic.
    fn drive(&mut self, ctx: &mut SceneContext);

    fn on_touch_begin(&mut self, _ctx: &mut SceneContext, _x: f32, _y: f32) {}
    fn on_touch_move(&mut self, _ctx: &mut SceneContext, _x: f32, _y: f32) {}
    fn on_touch_end(&mut self, _ctx: &mut SceneContext, _x: f32, _y: f32) {}

    /// Name used in log output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
