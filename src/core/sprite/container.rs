//=========================================================================
// Sprite Container
//=========================================================================
//
// Pool of (sprite, render node) slots.
//
// Architecture:
//   slots: Vec<Slot>
//     Slot { sprite, node, in_use, generation, animation }
//
// Invariants:
// - at most one in-use slot per sprite identity
// - the slot count never shrinks while a scene is alive; removal only
//   flips `in_use`, and the node is kept for the next add
// - new nodes are requested from the renderer only when no inactive slot
//   is available
//
// Scene teardown (`release_all`) is the one place nodes go back to the
// renderer and the pool is emptied.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{AnimationSet, AnimationState, SpriteHandle};
use crate::core::render::{NodeHandle, Renderer};
use crate::core::EngineError;

//=== SlotId ==============================================================

/// Stable handle to a pool slot.
///
/// The generation changes every time the slot is reused, so an id kept
/// past its sprite's removal never addresses the slot's next occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u32,
}

impl SlotId {
    pub fn index(&self) -> usize {
        self.index
    }
}

//=== Slot ================================================================

struct Slot {
    sprite: Option<SpriteHandle>,
    node: NodeHandle,
    in_use: bool,
    generation: u32,
    animation: Option<AnimationState>,
}

impl Slot {
    fn holds(&self, sprite: &SpriteHandle) -> bool {
        self.in_use && self.sprite.as_ref().is_some_and(|s| s.ptr_eq(sprite))
    }

    fn id(&self, index: usize) -> SlotId {
        SlotId {
            index,
            generation: self.generation,
        }
    }

    fn deactivate(&mut self) {
        self.in_use = false;
        self.sprite = None;
        self.animation = None;
    }
}

//=== SpriteContainer =====================================================

/// Pooled set of renderable sprites.
///
/// ```rust,ignore
/// let slot = container.add(&ball, &mut renderer)?;   // new node
/// container.remove(&ball);                           // node kept
/// container.add(&other, &mut renderer)?;             // reuses the slot
/// ```
#[derive(Default)]
pub struct SpriteContainer {
    slots: Vec<Slot>,
}

impl SpriteContainer {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    //--- Add / Remove -----------------------------------------------------

    /// Activates `sprite` in the pool.
    ///
    /// Reuses the first inactive slot (keeping its node) or appends a new
    /// slot with a freshly allocated node.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicateSprite`] if the sprite is already active.
    pub fn add(
        &mut self,
        sprite: &SpriteHandle,
        renderer: &mut dyn Renderer,
    ) -> Result<SlotId, EngineError> {
        if self.contains(sprite) {
            warn!(target: "sprite", "Sprite {:?} is already active, ignoring add", sprite);
            return Err(EngineError::DuplicateSprite);
        }

        if let Some(index) = self.slots.iter().position(|slot| !slot.in_use) {
            let slot = &mut self.slots[index];
            slot.sprite = Some(sprite.clone());
            slot.in_use = true;
            slot.generation = slot.generation.wrapping_add(1);
            slot.animation = None;

            debug!(target: "sprite", "Reusing slot {} (node {:?})", index, slot.node);
            return Ok(slot.id(index));
        }

        let node = renderer.allocate_node();
        let index = self.slots.len();
        self.slots.push(Slot {
            sprite: Some(sprite.clone()),
            node,
            in_use: true,
            generation: 0,
            animation: None,
        });

        debug!(target: "sprite", "Pool grew to {} slots (node {:?})", self.slots.len(), node);
        Ok(self.slots[index].id(index))
    }

    /// Deactivates `sprite`. Returns `false` (no-op) if it was not active.
    pub fn remove(&mut self, sprite: &SpriteHandle) -> bool {
        match self.slots.iter_mut().position(|slot| slot.holds(sprite)) {
            Some(index) => {
                self.slots[index].deactivate();
                debug!(target: "sprite", "Released slot {}", index);
                true
            }
            None => {
                debug!(target: "sprite", "Sprite not active, nothing to remove");
                false
            }
        }
    }

    /// Deactivates the slot addressed by `id`, if it still holds the sprite
    /// it was issued for.
    pub fn remove_slot(&mut self, id: SlotId) -> bool {
        match self.slots.get_mut(id.index) {
            Some(slot) if slot.in_use && slot.generation == id.generation => {
                slot.deactivate();
                debug!(target: "sprite", "Released slot {}", id.index);
                true
            }
            _ => false,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains(&self, sprite: &SpriteHandle) -> bool {
        self.slots.iter().any(|slot| slot.holds(sprite))
    }

    pub fn slot_of(&self, sprite: &SpriteHandle) -> Option<SlotId> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, slot)| slot.holds(sprite))
            .map(|(index, slot)| slot.id(index))
    }

    pub fn node_of(&self, sprite: &SpriteHandle) -> Option<NodeHandle> {
        self.slots
            .iter()
            .find(|slot| slot.holds(sprite))
            .map(|slot| slot.node)
    }

    /// Number of slots, active or not.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.in_use).count()
    }

    /// Active `(sprite, node)` pairs in pool order.
    ///
    /// The iterator is `Clone`, and each call starts a fresh pass.
    pub fn active_sprites(&self) -> ActiveSprites<'_> {
        ActiveSprites {
            slots: self.slots.iter(),
        }
    }

    //--- Animation --------------------------------------------------------

    /// Starts a texture animation on an active sprite.
    ///
    /// The first frame is applied immediately. Returns `false` if the
    /// sprite is not active.
    pub fn start_animation(
        &mut self,
        sprite: &SpriteHandle,
        set: Arc<AnimationSet>,
        looping: bool,
    ) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|slot| slot.holds(sprite)) else {
            warn!(target: "sprite", "Cannot animate inactive sprite {:?}", sprite);
            return false;
        };

        let state = AnimationState::new(set, looping);
        if let Some(texture) = state.current() {
            sprite.set_texture(Some(texture));
        }
        slot.animation = Some(state);
        true
    }

    /// Stops the sprite's animation, leaving its current texture in place.
    pub fn stop_animation(&mut self, sprite: &SpriteHandle) -> bool {
        self.slots
            .iter_mut()
            .find(|slot| slot.holds(sprite))
            .and_then(|slot| slot.animation.take())
            .is_some()
    }

    /// Advances every active animation by one tick.
    pub(crate) fn progress_animations(&mut self) {
        for slot in self.slots.iter_mut().filter(|slot| slot.in_use) {
            let (Some(sprite), Some(animation)) = (&slot.sprite, &mut slot.animation) else {
                continue;
            };
            if let Some(texture) = animation.advance() {
                sprite.set_texture(Some(texture));
            }
        }
    }

    //--- Teardown ---------------------------------------------------------

    /// Releases every node back to the renderer and empties the pool.
    pub fn release_all(&mut self, renderer: &mut dyn Renderer) {
        if self.slots.is_empty() {
            return;
        }

        debug!(target: "sprite", "Releasing {} pooled nodes", self.slots.len());
        for slot in self.slots.drain(..) {
            renderer.release_node(slot.node);
        }
    }
}

//=== ActiveSprites =======================================================

/// Iterator over the active `(sprite, node)` pairs of a [`SpriteContainer`].
#[derive(Clone)]
pub struct ActiveSprites<'a> {
    slots: std::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for ActiveSprites<'a> {
    type Item = (&'a SpriteHandle, NodeHandle);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().find_map(|slot| match (&slot.sprite, slot.in_use) {
            (Some(sprite), true) => Some((sprite, slot.node)),
            _ => None,
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
