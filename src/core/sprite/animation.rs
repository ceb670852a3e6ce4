//=========================================================================
// Texture Animation
//=========================================================================
//
// Tick-based flip-book animation. A set is an ordered list of textures
// shown for `interval_ticks` ticks each; the pool advances every active
// slot's state once per tick during the render pass.
//
// Integer ticks only, so playback is deterministic under the fixed tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

//=== Internal Dependencies ===============================================

use crate::core::render::TextureId;

//=== AnimationSet ========================================================

/// Frames of a flip-book animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSet {
    frames: Vec<TextureId>,
    interval_ticks: u32,
}

impl AnimationSet {
    /// Creates a set showing each frame for `interval_ticks` ticks.
    ///
    /// An interval of zero is treated as one tick.
    pub fn new(frames: Vec<TextureId>, interval_ticks: u32) -> Self {
        Self {
            frames,
            interval_ticks: interval_ticks.max(1),
        }
    }

    pub fn frames(&self) -> &[TextureId] {
        &self.frames
    }

    pub fn interval_ticks(&self) -> u32 {
        self.interval_ticks
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

//=== AnimationState ======================================================

/// Playback position of one sprite's animation.
#[derive(Debug, Clone)]
pub struct AnimationState {
    set: Arc<AnimationSet>,
    frame_index: usize,
    elapsed_ticks: u32,
    looping: bool,
    finished: bool,
}

impl AnimationState {
    pub fn new(set: Arc<AnimationSet>, looping: bool) -> Self {
        let finished = set.is_empty();
        Self {
            set,
            frame_index: 0,
            elapsed_ticks: 0,
            looping,
            finished,
        }
    }

    /// Texture shown right now, if the set has frames.
    pub fn current(&self) -> Option<TextureId> {
        self.set.frames.get(self.frame_index).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances one tick.
    ///
    /// Returns the new texture when the frame changed this tick, `None`
    /// otherwise. A finished non-looping animation holds its last frame.
    pub fn advance(&mut self) -> Option<TextureId> {
        if self.finished {
            return None;
        }

        self.elapsed_ticks += 1;
        if self.elapsed_ticks < self.set.interval_ticks {
            return None;
        }
        self.elapsed_ticks = 0;

        let len = self.set.frames.len();
        if self.frame_index + 1 < len {
            self.frame_index += 1;
        } else if self.looping {
            if len == 1 {
                return None;
            }
            self.frame_index = 0;
        } else {
            self.finished = true;
            return None;
        }

        self.current()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
