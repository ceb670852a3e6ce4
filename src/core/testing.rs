//=========================================================================
// Test Doubles
//=========================================================================
//
// Recording renderer and counting listeners shared by unit tests.
//
//=========================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use glam::Affine2;

use crate::core::collision::{Collider, CollisionListener};
use crate::core::render::{NodeHandle, PixelData, Renderer, TextureId};
use crate::core::touch::TouchListener;

//=== RecordingRenderer ===================================================

#[derive(Default)]
pub(crate) struct RenderLog {
    next_id: u64,
    pub allocated: Vec<NodeHandle>,
    pub released: Vec<NodeHandle>,
    pub transforms: HashMap<NodeHandle, Affine2>,
    pub textures: HashMap<NodeHandle, Option<TextureId>>,
    pub presented: Vec<Vec<NodeHandle>>,
    pub created_textures: Vec<(u32, u32)>,
}

/// Renderer that records every call. Clones share the same log.
#[derive(Clone, Default)]
pub(crate) struct RecordingRenderer {
    log: Arc<Mutex<RenderLog>>,
}

impl RecordingRenderer {
    pub fn log(&self) -> MutexGuard<'_, RenderLog> {
        self.log.lock().unwrap()
    }
}

impl Renderer for RecordingRenderer {
    fn allocate_node(&mut self) -> NodeHandle {
        let mut log = self.log();
        log.next_id += 1;
        let node = NodeHandle(log.next_id);
        log.allocated.push(node);
        node
    }

    fn set_transform(&mut self, node: NodeHandle, transform: Affine2) {
        self.log().transforms.insert(node, transform);
    }

    fn set_texture(&mut self, node: NodeHandle, texture: Option<TextureId>) {
        self.log().textures.insert(node, texture);
    }

    fn release_node(&mut self, node: NodeHandle) {
        self.log().released.push(node);
    }

    fn present(&mut self, active: &[NodeHandle]) {
        self.log().presented.push(active.to_vec());
    }

    fn create_texture(&mut self, pixels: &PixelData) -> TextureId {
        let mut log = self.log();
        log.created_textures.push((pixels.width, pixels.height));
        TextureId(1000 + log.created_textures.len() as u64)
    }
}

//=== Counting Listeners ==================================================

/// Collision listener counting its invocations.
#[derive(Default)]
pub(crate) struct CountingCollisions {
    pub hits: AtomicUsize,
}

impl CountingCollisions {
    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl CollisionListener for CountingCollisions {
    fn on_collision(&self, _a: &dyn Collider, _b: &dyn Collider) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

/// Touch listener recording `(phase, x, y)` triples.
#[derive(Default)]
pub(crate) struct RecordingTouches {
    pub events: Mutex<Vec<(&'static str, f32, f32)>>,
}

impl RecordingTouches {
    pub fn events(&self) -> Vec<(&'static str, f32, f32)> {
        self.events.lock().unwrap().clone()
    }
}

impl TouchListener for RecordingTouches {
    fn on_touch_begin(&self, x: f32, y: f32) {
        self.events.lock().unwrap().push(("begin", x, y));
    }

    fn on_touch_move(&self, x: f32, y: f32) {
        self.events.lock().unwrap().push(("move", x, y));
    }

    fn on_touch_end(&self, x: f32, y: f32) {
        self.events.lock().unwrap().push(("end", x, y));
    }
}
