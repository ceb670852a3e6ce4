//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host (winit or any other windowing layer) with the engine.
//
// The host never calls into the tick directly: it sends `PlatformEvent`s
// and the engine drains them at the start of each tick.
//
// Components:
// - `interface`: Event types (the contract)
// - `event_collector`: Engine-side bounded draining
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use event_collector::TickControl;
pub use interface::PlatformEvent;

pub(crate) use event_collector::EventCollector;
