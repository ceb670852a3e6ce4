//=========================================================================
// Scene Request Slot
//=========================================================================
//
// Holds the scene a driver asked to switch to.
//
// Drivers request a switch while driving; the engine applies it at the
// tick boundary, after the render pass. Only the latest request survives.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::Driver;

//=== PendingScene ========================================================

/// Single-entry queue for the next scene.
#[derive(Default)]
pub(crate) struct PendingScene {
    next: Option<Box<dyn Driver>>,
}

impl PendingScene {
    /// Queues `driver`, replacing any earlier request from this tick.
    pub(crate) fn request(&mut self, driver: Box<dyn Driver>) {
        if let Some(previous) = self.next.replace(driver) {
            warn!(
                target: "scene",
                "Scene request {} replaced before it was applied",
                previous.name()
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.next.is_some()
    }

    pub(crate) fn take(&mut self) -> Option<Box<dyn Driver>> {
        self.next.take()
    }

    pub(crate) fn clear(&mut self) {
        self.next = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
