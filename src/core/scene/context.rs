//=========================================================================
// Scene Context
//=========================================================================
//
// Everything a driver can touch while it runs.
//
// Architecture:
//   SceneContext
//     ├─ sprites:    SpriteContainer     (pooled render nodes)
//     ├─ renderer:   Box<dyn Renderer>   (host rendering seam)
//     ├─ collisions: CollisionEngine     (pub)
//     ├─ touch:      TouchDispatcher     (pub)
//     ├─ screen:     ScreenTransform
//     └─ pending:    PendingScene        (applied at the tick boundary)
//
// Sprite add/remove goes through the context because pooling needs the
// renderer to allocate nodes.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{Driver, PendingScene};
use crate::core::collision::{CollisionEngine, CollisionPolicy};
use crate::core::render::{AssetLoader, NodeHandle, Renderer, TextureId};
use crate::core::screen::ScreenTransform;
use crate::core::sprite::{AnimationSet, SlotId, SpriteContainer, SpriteHandle};
use crate::core::touch::TouchDispatcher;
use crate::core::EngineError;

//=== SceneContext ========================================================

/// Engine state shared with the active [`Driver`].
pub struct SceneContext {
    pub collisions: CollisionEngine,
    pub touch: TouchDispatcher,
    pub(crate) screen: ScreenTransform,
    sprites: SpriteContainer,
    renderer: Box<dyn Renderer>,
    assets: Option<Box<dyn AssetLoader>>,
    pending: PendingScene,
    frame_nodes: Vec<NodeHandle>,
    tick: u64,
}

impl SceneContext {
    pub(crate) fn new(
        renderer: Box<dyn Renderer>,
        assets: Option<Box<dyn AssetLoader>>,
        policy: CollisionPolicy,
    ) -> Self {
        Self {
            collisions: CollisionEngine::new(policy),
            touch: TouchDispatcher::new(),
            screen: ScreenTransform::new(),
            sprites: SpriteContainer::new(),
            renderer,
            assets,
            pending: PendingScene::default(),
            frame_nodes: Vec::new(),
            tick: 0,
        }
    }

    //--- Sprites ----------------------------------------------------------

    /// Makes `sprite` visible, reusing a pooled node when one is free.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicateSprite`] if the sprite is already active.
    pub fn add_sprite(&mut self, sprite: &SpriteHandle) -> Result<SlotId, EngineError> {
        self.sprites.add(sprite, self.renderer.as_mut())
    }

    /// Hides `sprite` and returns its node to the pool. Removing a sprite
    /// that is not active is a no-op returning `false`.
    pub fn remove_sprite(&mut self, sprite: &SpriteHandle) -> bool {
        let Some(node) = self.sprites.node_of(sprite) else {
            return false;
        };
        self.renderer.set_texture(node, None);
        self.sprites.remove(sprite)
    }

    pub fn sprites(&self) -> &SpriteContainer {
        &self.sprites
    }

    //--- Textures ---------------------------------------------------------

    /// Starts a flip-book animation on an active sprite.
    pub fn start_animation(
        &mut self,
        sprite: &SpriteHandle,
        set: Arc<AnimationSet>,
        looping: bool,
    ) -> bool {
        self.sprites.start_animation(sprite, set, looping)
    }

    pub fn stop_animation(&mut self, sprite: &SpriteHandle) -> bool {
        self.sprites.stop_animation(sprite)
    }

    /// Swaps the sprite's texture, stopping any animation that would
    /// overwrite it.
    pub fn replace_texture(&mut self, sprite: &SpriteHandle, texture: Option<TextureId>) {
        self.sprites.stop_animation(sprite);
        sprite.set_texture(texture);
    }

    /// Loads a named image through the asset loader and uploads it.
    ///
    /// # Errors
    ///
    /// [`EngineError::AssetLoad`] if no loader is installed or the loader
    /// fails.
    pub fn load_texture(&mut self, name: &str) -> Result<TextureId, EngineError> {
        let loader = self.assets.as_ref().ok_or_else(|| EngineError::AssetLoad {
            name: name.to_string(),
            reason: "no asset loader installed".to_string(),
        })?;

        let pixels = loader.load(name)?;
        let texture = self.renderer.create_texture(&pixels);
        debug!(
            target: "engine",
            "Loaded `{}` ({}x{}) as {:?}",
            name, pixels.width, pixels.height, texture
        );
        Ok(texture)
    }

    //--- Screen -----------------------------------------------------------

    /// Sets the scene's design resolution.
    pub fn configure_screen(&mut self, width: f32, height: f32) -> Result<(), EngineError> {
        self.screen.configure(width, height)
    }

    pub fn screen(&self) -> &ScreenTransform {
        &self.screen
    }

    //--- Scene Switching --------------------------------------------------

    /// Switches to `driver` once the current tick has rendered.
    ///
    /// A later request in the same tick replaces this one.
    pub fn request_scene<D: Driver + 'static>(&mut self, driver: D) {
        info!(target: "scene", "Scene switch to {} requested", driver.name());
        self.pending.request(Box::new(driver));
    }

    /// Ticks completed since the engine was built.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    //--- Engine Hooks -----------------------------------------------------

    pub(crate) fn take_pending_scene(&mut self) -> Option<Box<dyn Driver>> {
        self.pending.take()
    }

    /// Drops everything the outgoing scene created.
    pub(crate) fn teardown(&mut self) {
        self.sprites.release_all(self.renderer.as_mut());
        self.touch.clear();
        self.collisions.unregister_all();
        self.pending.clear();
    }

    /// Advances animations and pushes every active sprite to the renderer.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotConfigured`] if sprites are active but the screen
    /// has no virtual size. A failed pass advances nothing and writes
    /// nothing to the renderer.
    pub(crate) fn render(&mut self) -> Result<(), EngineError> {
        if self.sprites.active_count() > 0 && !self.screen.is_configured() {
            return Err(EngineError::NotConfigured);
        }

        self.sprites.progress_animations();

        let mut active = std::mem::take(&mut self.frame_nodes);
        active.clear();

        for (sprite, node) in self.sprites.active_sprites() {
            let state = sprite.get();
            let transform = self.screen.to_device_transform(&state)?;
            self.renderer.set_transform(node, transform);
            self.renderer.set_texture(node, state.texture);
            active.push(node);
        }

        self.renderer.present(&active);
        self.frame_nodes = active;
        self.tick += 1;
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
