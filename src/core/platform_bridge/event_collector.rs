//=========================================================================
// Event Collector
//=========================================================================
//
// Platform event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → events → TickControl
//
// Bounded polling keeps a flooded channel from starving the tick; what is
// left over is picked up next tick, in order.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events with bounded polling.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    max_events: usize,
    events: Vec<PlatformEvent>,
}

impl EventCollector {
    pub(crate) fn new(receiver: Receiver<PlatformEvent>, max_events: usize) -> Self {
        Self {
            receiver,
            max_events,
            events: Vec::with_capacity(4),
        }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    ///
    /// Returns [`TickControl::Exit`] on `Shutdown` or once every sender
    /// has been dropped. Events drained earlier in the same call are
    /// discarded; the engine stops without applying them.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < self.max_events {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Shutdown) => {
                    info!(target: "engine", "Shutdown received");
                    return self.exit();
                }
                Ok(event) => {
                    self.events.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => {
                    info!(target: "engine", "All event senders dropped");
                    return self.exit();
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= self.max_events {
            warn!(target: "engine", "Event queue backlog: drained {} events this tick", drained);
        }

        TickControl::Continue
    }

    /// Returns collected events for this tick.
    #[cfg(test)]
    pub(crate) fn events(&self) -> &[PlatformEvent] {
        &self.events
    }

    /// Takes ownership of collected events, leaving an empty vec.
    pub(crate) fn take_events(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.events)
    }

    fn exit(&mut self) -> TickControl {
        if !self.events.is_empty() {
            debug!(target: "engine", "Discarding {} events drained before exit", self.events.len());
            self.events.clear();
        }
        TickControl::Exit
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
