//=========================================================================
// Pointer Tracker
//=========================================================================
//
// Reduces winit touch and mouse input to the engine's single pointer.
//
// Architecture:
//   Winit Touch / Mouse → PointerTracker → TouchEvent (device px) → TouchBuffer
//
// The first finger down owns the pointer until it lifts; other fingers
// are ignored. With no finger down, the left mouse button drives the
// pointer at the last cursor position.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::event::{ElementState, MouseButton, TouchPhase as WinitTouchPhase};

//=== Internal Dependencies ===============================================

use crate::core::touch::{TouchEvent, TouchPhase};

//=== Pointer Owner =======================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Touch(u64),
    Mouse,
}

//=== PointerTracker ======================================================

/// Tracks which finger (or the mouse) currently owns the pointer.
#[derive(Debug, Default)]
pub(crate) struct PointerTracker {
    owner: Option<Owner>,
    cursor: (f32, f32),
}

impl PointerTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn is_down(&self) -> bool {
        self.owner.is_some()
    }

    //--- Touch ------------------------------------------------------------

    /// Converts a winit touch sample; `None` if the finger does not own
    /// the pointer.
    pub(crate) fn process_touch(
        &mut self,
        id: u64,
        phase: WinitTouchPhase,
        x: f32,
        y: f32,
    ) -> Option<TouchEvent> {
        match phase {
            WinitTouchPhase::Started => {
                if self.owner.is_some() {
                    trace!(target: "platform::input", "Ignoring extra finger {}", id);
                    return None;
                }
                self.owner = Some(Owner::Touch(id));
                Some(TouchEvent::new(TouchPhase::Begin, x, y))
            }
            WinitTouchPhase::Moved => {
                (self.owner == Some(Owner::Touch(id)))
                    .then(|| TouchEvent::new(TouchPhase::Move, x, y))
            }
            WinitTouchPhase::Ended | WinitTouchPhase::Cancelled => {
                if self.owner != Some(Owner::Touch(id)) {
                    return None;
                }
                self.owner = None;
                Some(TouchEvent::new(TouchPhase::End, x, y))
            }
        }
    }

    //--- Mouse ------------------------------------------------------------

    /// Records the cursor; emits a move while the left button is held.
    pub(crate) fn process_cursor_moved(&mut self, x: f32, y: f32) -> Option<TouchEvent> {
        self.cursor = (x, y);
        (self.owner == Some(Owner::Mouse)).then(|| TouchEvent::new(TouchPhase::Move, x, y))
    }

    /// Left button press/release at the last cursor position.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: MouseButton,
        state: ElementState,
    ) -> Option<TouchEvent> {
        if button != MouseButton::Left {
            return None;
        }

        let (x, y) = self.cursor;
        match state {
            ElementState::Pressed if self.owner.is_none() => {
                self.owner = Some(Owner::Mouse);
                Some(TouchEvent::new(TouchPhase::Begin, x, y))
            }
            ElementState::Released if self.owner == Some(Owner::Mouse) => {
                self.owner = None;
                Some(TouchEvent::new(TouchPhase::End, x, y))
            }
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
