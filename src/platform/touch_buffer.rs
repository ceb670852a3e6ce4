//=========================================================================
// Touch Buffer
//
// Collects the pointer samples of one host frame before they are sent to
// the engine as a single `PlatformEvent::Touches` batch.
//
// Responsibilities:
// - Keep begin/end samples in order
// - Coalesce consecutive moves (only the latest position matters)
// - Hand the batch over via `drain()`
//
// Notes:
// The buffer lives for one frame and is emptied on every flush.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::touch::{TouchEvent, TouchPhase};

//=== TouchBuffer Struct ==================================================
pub struct TouchBuffer {
    events: Vec<TouchEvent>,
}

impl TouchBuffer {
    //--- Construction -----------------------------------------------------
    pub fn new() -> Self {
        const BASE_CAPACITY: usize = 16;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- Push -------------------------------------------------------------
    //
    // A move directly following another move replaces it. Identical
    // consecutive samples are dropped.
    //
    pub fn push(&mut self, event: TouchEvent) {
        match self.events.last_mut() {
            Some(last) if last.phase == TouchPhase::Move && event.phase == TouchPhase::Move => {
                *last = event;
            }
            Some(last) if *last == event => {}
            _ => self.events.push(event),
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns this frame's samples, or `None` when nothing was buffered.
    //
    pub fn drain(&mut self) -> Option<Vec<TouchEvent>> {
        if self.events.is_empty() {
            return None;
        }
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for TouchBuffer {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
