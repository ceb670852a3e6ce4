//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Host-to-engine event types.
//
// Defines the contract for communication between the host thread and the
// tick thread. Coordinates are device pixels.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::touch::TouchEvent;

//=== PlatformEvent =======================================================

/// Events sent from the host to the engine over a crossbeam channel.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Touch samples for one host frame, in order.
    Touches(Vec<TouchEvent>),

    /// Device viewport changed size.
    ViewportResized { width: f32, height: f32 },

    /// Host is shutting down; the engine stops at the next tick.
    Shutdown,
}
