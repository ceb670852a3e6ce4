//=========================================================================
// Platform Subsystem
//
// Bridges winit window events with the engine's tick via a crossbeam
// channel. The host owns the event loop and the window; it forwards each
// `WindowEvent` to `WinitInput`.
//
// Architecture:
// ```text
//  Host Thread:                     Tick Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  winit Event Loop        │    │  Engine::tick    │
//  │   ↓                      │    │   ↓              │
//  │  PointerTracker          │    │  EventCollector  │
//  │   └─ one pointer         │    │   ↓              │
//  │   ↓                      │    │  Driver / touch  │
//  │  TouchBuffer             │    │  listeners       │
//  │   └─ coalesced moves     │    └──────────────────┘
//  │   ↓                      │             ↑
//  │  RedrawRequested (flush) │             │
//  │   ↓                      │             │
//  │  Channel ────────────────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Frame Boundary: RedrawRequested
//   → Buffered pointer samples sent as one batch
//   → Empty batches are not sent
//
// Resized and CloseRequested are forwarded immediately, after flushing
// any buffered samples so ordering is preserved.
//
//=========================================================================

//=== Submodules ==========================================================

mod pointer;
mod touch_buffer;

//=== External Crates =====================================================

use crossbeam_channel::Sender;
use log::*;
use winit::event::WindowEvent;

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformEvent, TickControl};
use crate::core::touch::TouchEvent;
use pointer::PointerTracker;

pub use touch_buffer::TouchBuffer;

//=== WinitInput ==========================================================

/// Converts winit window events into [`PlatformEvent`]s.
///
/// # Usage
///
/// ```no_run
/// # use sprite_engine::platform::WinitInput;
/// # use sprite_engine::prelude::*;
/// # fn forward(engine: &mut Engine, events: Vec<winit::event::WindowEvent>) {
/// let Some(sender) = engine.take_event_sender() else { return };
/// let mut input = WinitInput::new(sender);
/// for event in &events {
///     if input.handle_window_event(event) == TickControl::Exit {
///         break; // host exits its event loop
///     }
/// }
/// # }
/// ```
pub struct WinitInput {
    /// Buffers pointer samples until the frame boundary.
    buffer: TouchBuffer,

    /// Channel to the engine.
    event_sender: Sender<PlatformEvent>,

    /// Reduces touches and mouse input to a single pointer.
    pointer: PointerTracker,
}

impl WinitInput {
    //--- Construction -----------------------------------------------------

    pub fn new(event_sender: Sender<PlatformEvent>) -> Self {
        info!(target: "platform", "Winit input bridge initialized");
        Self {
            buffer: TouchBuffer::new(),
            event_sender,
            pointer: PointerTracker::new(),
        }
    }

    //--- Event Handling ---------------------------------------------------

    /// Handles one window event.
    ///
    /// Returns [`TickControl::Exit`] after forwarding a close request; the
    /// host should then leave its event loop.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> TickControl {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.flush();
                self.send(PlatformEvent::Shutdown);
                return TickControl::Exit;
            }

            WindowEvent::Resized(size) => {
                debug!(target: "platform", "Viewport resized to {}x{}", size.width, size.height);
                self.flush();
                self.send(PlatformEvent::ViewportResized {
                    width: size.width as f32,
                    height: size.height as f32,
                });
            }

            WindowEvent::Touch(touch) => {
                let sample = self.pointer.process_touch(
                    touch.id,
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                );
                self.buffer_sample(sample);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let sample = self
                    .pointer
                    .process_cursor_moved(position.x as f32, position.y as f32);
                self.buffer_sample(sample);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let sample = self.pointer.process_mouse_button(*button, *state);
                self.buffer_sample(sample);
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush all buffered samples
                self.flush();
            }

            _ => {
                // Ignore: Focused, KeyboardInput, etc.
            }
        }

        TickControl::Continue
    }

    /// Sends buffered pointer samples as one batch.
    ///
    /// Hosts without a redraw cycle call this once per frame themselves.
    /// If the engine is gone, the samples are dropped with a warning.
    pub fn flush(&mut self) {
        if let Some(touches) = self.buffer.drain() {
            trace!(target: "platform::input", "Flushing {} touch samples", touches.len());

            let count = touches.len();
            if self.event_sender.send(PlatformEvent::Touches(touches)).is_err() {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} touch samples",
                    count
                );
            }
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn buffer_sample(&mut self, sample: Option<TouchEvent>) {
        if let Some(sample) = sample {
            self.buffer.push(sample);
        }
    }

    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            warn!(target: "platform", "Channel disconnected, engine is gone");
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
