//=========================================================================
// Sprite Engine
//
// Main entry point and tick coordinator.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──tick()──>  one frame
//         │                          │
//         ├─ with_tps()              ├─ set_scene()
//         ├─ with_channel_capacity() └─ spawn() ──> EngineHandle
//         └─ with_virtual_resolution()     (tick thread @ TPS)
// ```
//
// Tick order:
//   1. Drain platform events (viewport, touches, shutdown)
//   2. Driver::drive()
//   3. Collision check
//   4. Render pass (animations, transforms, present)
//   5. Apply a requested scene switch
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::collision::CollisionPolicy;
use crate::core::platform_bridge::{EventCollector, PlatformEvent, TickControl};
use crate::core::render::{AssetLoader, Renderer};
use crate::core::scene::{Driver, SceneContext};
use crate::core::touch::{TouchEvent, TouchPhase};
use crate::core::EngineError;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second when spawned)
/// - **Channel capacity**: 128 events
/// - **Max events per tick**: 100
/// - **Collision policy**: [`CollisionPolicy::FirstMatch`]
///
/// # Examples
///
/// ```no_run
/// # use sprite_engine::prelude::*;
/// # fn renderer() -> Box<dyn Renderer> { unimplemented!() }
/// let engine = EngineBuilder::new()
///     .with_tps(30.0)
///     .with_virtual_resolution(1080.0, 1920.0)
///     .with_viewport(540.0, 960.0)
///     .build(renderer())?;
/// # Ok::<(), EngineError>(())
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    max_events_per_tick: usize,
    virtual_resolution: Option<(f32, f32)>,
    viewport: Option<(f32, f32)>,
    collision_policy: CollisionPolicy,
    assets: Option<Box<dyn AssetLoader>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            max_events_per_tick: 100,
            virtual_resolution: None,
            viewport: None,
            collision_policy: CollisionPolicy::default(),
            assets: None,
        }
    }

    /// Sets the tick rate used by [`Engine::spawn`].
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for host → engine communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Caps how many platform events one tick drains. Leftovers wait for
    /// the next tick.
    ///
    /// Default: 100
    ///
    /// # Panics
    ///
    /// Panics if `max == 0`.
    pub fn with_max_events_per_tick(mut self, max: usize) -> Self {
        assert!(max > 0, "Max events per tick must be positive");
        self.max_events_per_tick = max;
        self
    }

    /// Pre-configures the virtual resolution. Scenes may still change it
    /// in `initialize`.
    pub fn with_virtual_resolution(mut self, width: f32, height: f32) -> Self {
        self.virtual_resolution = Some((width, height));
        self
    }

    /// Initial device viewport. Defaults to the virtual size.
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Some((width, height));
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Installs the collaborator behind [`SceneContext::load_texture`].
    pub fn with_asset_loader<L: AssetLoader + 'static>(mut self, loader: L) -> Self {
        self.assets = Some(Box::new(loader));
        self
    }

    /// Builds the engine around the host renderer.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidScreenSize`] if a virtual resolution was set
    /// and is not strictly positive.
    pub fn build(self, renderer: Box<dyn Renderer>) -> Result<Engine, EngineError> {
        info!(
            target: "engine",
            "Building engine (TPS: {}, channel: {}, policy: {:?})",
            self.tps, self.channel_capacity, self.collision_policy
        );

        let mut context = SceneContext::new(renderer, self.assets, self.collision_policy);
        if let Some((width, height)) = self.viewport {
            context.screen.on_viewport_change(width, height);
        }
        if let Some((width, height)) = self.virtual_resolution {
            context.configure_screen(width, height)?;
        }

        let (sender, receiver) = bounded(self.channel_capacity);

        Ok(Engine {
            context,
            driver: None,
            state: EngineState::Uninitialized,
            collector: EventCollector::new(receiver, self.max_events_per_tick),
            sender: Some(sender),
            tps: self.tps,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== EngineState =========================================================

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No active scene.
    Uninitialized,
    /// A scene initialized successfully and is being driven.
    Active,
    /// `stop()` ran or the host shut down; ticks are no-ops.
    Stopped,
}

//=== Engine ==============================================================

/// Sprite engine runtime.
///
/// Owns the active scene and everything it created. Drive it manually
/// with [`Engine::tick`] or move it onto its own thread with
/// [`Engine::spawn`].
pub struct Engine {
    context: SceneContext,
    driver: Option<Box<dyn Driver>>,
    state: EngineState,
    collector: EventCollector,
    /// Parked until the host or `spawn()` takes it; the engine never keeps
    /// a copy, so dropping every taken sender disconnects the channel.
    sender: Option<Sender<PlatformEvent>>,
    tps: f64,
}

impl Engine {
    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    /// Hands the host the sender for platform events. Events are applied
    /// at the start of the next tick.
    ///
    /// Clone it as needed. Once every clone is dropped the next tick stops
    /// the engine. Returns `None` if the sender was already taken.
    pub fn take_event_sender(&mut self) -> Option<Sender<PlatformEvent>> {
        self.sender.take()
    }

    /// Name of the active scene's driver.
    pub fn scene_name(&self) -> Option<&'static str> {
        self.driver.as_ref().map(|driver| driver.name())
    }

    //--- Scene Lifecycle --------------------------------------------------

    /// Replaces the active scene.
    ///
    /// The previous scene's sprites, listeners and collision registrations
    /// are released, then `driver.initialize()` runs exactly once.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Stopped`] after [`Engine::stop`].
    /// - Whatever `initialize` returned; the engine is then left without a
    ///   scene in [`EngineState::Uninitialized`].
    pub fn set_scene<D: Driver + 'static>(&mut self, driver: D) -> Result<(), EngineError> {
        self.install(Box::new(driver))
    }

    /// Stops the engine and releases the active scene. Idempotent.
    pub fn stop(&mut self) {
        if self.state == EngineState::Stopped {
            return;
        }

        if let Some(driver) = self.driver.take() {
            info!(target: "scene", "Leaving scene {}", driver.name());
        }
        self.context.teardown();
        self.state = EngineState::Stopped;

        info!(target: "engine", "Engine stopped after {} ticks", self.context.tick_count());
    }

    //--- Host Input -------------------------------------------------------

    /// Routes a device-space touch: first to the driver, then to the
    /// registered touch listeners.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotConfigured`] if no virtual resolution is set.
    pub fn dispatch_touch(&mut self, event: TouchEvent) -> Result<(), EngineError> {
        let (x, y) = self.context.screen.to_virtual(event.x, event.y)?;

        if let Some(driver) = self.driver.as_mut() {
            match event.phase {
                TouchPhase::Begin => driver.on_touch_begin(&mut self.context, x, y),
                TouchPhase::Move => driver.on_touch_move(&mut self.context, x, y),
                TouchPhase::End => driver.on_touch_end(&mut self.context, x, y),
            }
        }

        self.context.touch.notify_virtual(event.phase, x, y);
        Ok(())
    }

    /// Applies a new device viewport. Degenerate sizes are ignored.
    pub fn on_viewport_change(&mut self, width: f32, height: f32) -> bool {
        self.context.screen.on_viewport_change(width, height)
    }

    //--- Tick -------------------------------------------------------------

    /// Runs one frame.
    ///
    /// Returns [`TickControl::Exit`] once the engine is stopped, including
    /// when this tick drained a `Shutdown` event or found every sender
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotConfigured`] if sprites are active but no virtual
    /// resolution was set, or an error from initializing a requested scene.
    /// A failed render pass leaves the frame untouched; a scene requested
    /// during the tick is still installed.
    pub fn tick(&mut self) -> Result<TickControl, EngineError> {
        if self.state == EngineState::Stopped {
            return Ok(TickControl::Exit);
        }

        //--- Step 1: Drain platform events --------------------------------
        if self.collector.collect_frame() == TickControl::Exit {
            self.stop();
            return Ok(TickControl::Exit);
        }
        for event in self.collector.take_events() {
            self.apply_platform_event(event);
        }

        //--- Step 2: Drive the active scene -------------------------------
        if let Some(driver) = self.driver.as_mut() {
            driver.drive(&mut self.context);
        }

        //--- Step 3: Collisions -------------------------------------------
        self.context.collisions.evaluate_and_notify();

        //--- Step 4: Render -----------------------------------------------
        let rendered = self.context.render();

        //--- Step 5: Requested scene switch -------------------------------
        if let Some(next) = self.context.take_pending_scene() {
            self.install(next)?;
        }

        rendered.map(|()| TickControl::Continue)
    }

    //--- Execution --------------------------------------------------------

    /// Moves the engine onto a tick thread paced at the configured TPS.
    ///
    /// The thread runs until a `Shutdown` event arrives (see
    /// [`EngineHandle::shutdown`]) or every sender is dropped, including
    /// the handle's. Tick errors are logged and the loop keeps going.
    ///
    /// The parked sender moves into the handle. If the host already took
    /// it, the handle has none and the host's senders control shutdown.
    pub fn spawn(mut self) -> EngineHandle {
        let sender = self.sender.take();
        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);

        info!(target: "engine", "Spawning tick thread (TPS: {})", self.tps);

        let join = thread::spawn(move || {
            loop {
                let frame_start = Instant::now();

                match self.tick() {
                    Ok(TickControl::Exit) => break,
                    Ok(TickControl::Continue) => {}
                    Err(e) => error!(target: "engine", "Tick failed: {}", e),
                }

                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            info!(target: "engine", "Tick thread exiting");
        });

        EngineHandle { sender, join }
    }

    //--- Internal Helpers -------------------------------------------------

    fn install(&mut self, mut driver: Box<dyn Driver>) -> Result<(), EngineError> {
        if self.state == EngineState::Stopped {
            return Err(EngineError::Stopped);
        }

        if let Some(previous) = self.driver.take() {
            info!(target: "scene", "Leaving scene {}", previous.name());
        }
        self.context.teardown();

        info!(target: "scene", "Entering scene {}", driver.name());
        match driver.initialize(&mut self.context) {
            Ok(()) => {
                self.driver = Some(driver);
                self.state = EngineState::Active;
                Ok(())
            }
            Err(e) => {
                error!(target: "scene", "Scene {} failed to initialize: {}", driver.name(), e);
                self.context.teardown();
                self.state = EngineState::Uninitialized;
                Err(e)
            }
        }
    }

    fn apply_platform_event(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::Touches(touches) => {
                for touch in touches {
                    if let Err(e) = self.dispatch_touch(touch) {
                        warn!(target: "touch", "Dropping {:?}: {}", touch.phase, e);
                    }
                }
            }
            PlatformEvent::ViewportResized { width, height } => {
                self.on_viewport_change(width, height);
            }
            // Consumed by the collector.
            PlatformEvent::Shutdown => {}
        }
    }
}

//=== EngineHandle ========================================================

/// Handle to an engine running on its tick thread.
///
/// Dropping the handle drops its sender; the thread exits once no other
/// sender is left.
pub struct EngineHandle {
    sender: Option<Sender<PlatformEvent>>,
    join: thread::JoinHandle<()>,
}

impl EngineHandle {
    pub fn sender(&self) -> Option<Sender<PlatformEvent>> {
        self.sender.clone()
    }

    /// Queues an event for the next tick. Returns `false` if the tick
    /// thread is gone or the handle holds no sender.
    pub fn send(&self, event: PlatformEvent) -> bool {
        self.sender
            .as_ref()
            .is_some_and(|sender| sender.send(event).is_ok())
    }

    /// Asks the tick thread to stop after its current tick.
    pub fn shutdown(&self) {
        match &self.sender {
            Some(sender) => {
                if sender.send(PlatformEvent::Shutdown).is_err() {
                    warn!(target: "engine", "Tick thread already exited");
                }
            }
            None => warn!(target: "engine", "Handle holds no sender; shut down through the host's sender"),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the tick thread to exit.
    pub fn join(self) -> thread::Result<()> {
        self.join.join()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::core::collision::{Collider, CollisionListener};
    use crate::core::sprite::{Sprite, SpriteHandle};
    use crate::core::testing::{CountingCollisions, RecordingRenderer, RecordingTouches};

    //=====================================================================
    // Test Drivers
    //=====================================================================

    /// Adds one sprite and counts lifecycle calls.
    struct Counting {
        sprite: SpriteHandle,
        initialized: Arc<AtomicUsize>,
        driven: Arc<AtomicUsize>,
        touches: Arc<Mutex<Vec<(TouchPhase, f32, f32)>>>,
    }

    impl Counting {
        fn new() -> Self {
            Self {
                sprite: SpriteHandle::new(Sprite::new(50.0, 50.0, 10.0, 10.0)),
                initialized: Arc::default(),
                driven: Arc::default(),
                touches: Arc::default(),
            }
        }
    }

    impl Driver for Counting {
        fn initialize(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
            self.initialized.fetch_add(1, Ordering::SeqCst);
            ctx.configure_screen(100.0, 100.0)?;
            ctx.add_sprite(&self.sprite)?;
            Ok(())
        }

        fn drive(&mut self, _ctx: &mut SceneContext) {
            self.driven.fetch_add(1, Ordering::SeqCst);
        }

        fn on_touch_begin(&mut self, _ctx: &mut SceneContext, x: f32, y: f32) {
            self.touches.lock().unwrap().push((TouchPhase::Begin, x, y));
        }

        fn on_touch_end(&mut self, _ctx: &mut SceneContext, x: f32, y: f32) {
            self.touches.lock().unwrap().push((TouchPhase::End, x, y));
        }
    }

    struct Failing;

    impl Driver for Failing {
        fn initialize(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
            ctx.configure_screen(0.0, 100.0)
        }

        fn drive(&mut self, _ctx: &mut SceneContext) {}
    }

    /// Requests `next` on its first tick.
    struct Switching {
        next: Option<Counting>,
        driven: Arc<AtomicUsize>,
    }

    impl Switching {
        fn to(next: Counting) -> Self {
            Self { next: Some(next), driven: Arc::default() }
        }
    }

    impl Driver for Switching {
        fn initialize(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
            ctx.configure_screen(100.0, 100.0)?;
            ctx.add_sprite(&SpriteHandle::new(Sprite::new(10.0, 10.0, 5.0, 5.0)))?;
            Ok(())
        }

        fn drive(&mut self, ctx: &mut SceneContext) {
            self.driven.fetch_add(1, Ordering::SeqCst);
            if let Some(next) = self.next.take() {
                ctx.request_scene(next);
            }
        }
    }

    /// Adds a sprite without configuring the screen, then requests `next`.
    struct Unconfigured {
        next: Option<Counting>,
    }

    impl Driver for Unconfigured {
        fn initialize(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
            ctx.add_sprite(&SpriteHandle::new(Sprite::new(10.0, 10.0, 5.0, 5.0))).map(|_| ())
        }

        fn drive(&mut self, ctx: &mut SceneContext) {
            if let Some(next) = self.next.take() {
                ctx.request_scene(next);
            }
        }
    }

    /// Sets a flag on collision.
    struct Flag(AtomicBool);

    impl CollisionListener for Flag {
        fn on_collision(&self, _a: &dyn Collider, _b: &dyn Collider) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Moves `mover` into `target` on tick 2 and records what the
    /// collision flag looked like at the start of each drive.
    struct Chaser {
        mover: SpriteHandle,
        target: SpriteHandle,
        flag: Arc<Flag>,
        seen: Arc<Mutex<Vec<bool>>>,
    }

    impl Driver for Chaser {
        fn initialize(&mut self, ctx: &mut SceneContext) -> Result<(), EngineError> {
            ctx.configure_screen(100.0, 100.0)?;
            ctx.add_sprite(&self.mover)?;
            ctx.add_sprite(&self.target)?;
            ctx.collisions.register(
                self.mover.as_collider(),
                self.target.as_collider(),
                self.flag.clone(),
            );
            Ok(())
        }

        fn drive(&mut self, ctx: &mut SceneContext) {
            self.seen.lock().unwrap().push(self.flag.0.load(Ordering::SeqCst));
            if ctx.tick_count() == 1 {
                self.mover.set_position(75.0, 75.0);
            }
        }
    }

    fn engine(renderer: &RecordingRenderer) -> Engine {
        EngineBuilder::new().build(Box::new(renderer.clone())).unwrap()
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.max_events_per_tick, 100);
        assert_eq!(builder.collision_policy, CollisionPolicy::FirstMatch);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        EngineBuilder::new().with_channel_capacity(0);
    }

    #[test]
    fn builder_rejects_invalid_virtual_resolution() {
        let result = EngineBuilder::new()
            .with_virtual_resolution(-1.0, 100.0)
            .build(Box::new(RecordingRenderer::default()));
        assert!(matches!(result, Err(EngineError::InvalidScreenSize { .. })));
    }

    #[test]
    fn builder_applies_screen_settings() {
        let engine = EngineBuilder::new()
            .with_virtual_resolution(1080.0, 1920.0)
            .with_viewport(540.0, 960.0)
            .build(Box::new(RecordingRenderer::default()))
            .unwrap();
        assert_eq!(engine.context().screen().scale(), Ok(0.5));
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    //=====================================================================
    // Scene Lifecycle Tests
    //=====================================================================

    #[test]
    fn set_scene_initializes_once() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let driver = Counting::new();
        let initialized = driver.initialized.clone();
        let driven = driver.driven.clone();

        engine.set_scene(driver).unwrap();
        assert_eq!(engine.state(), EngineState::Active);

        for _ in 0..3 {
            assert_eq!(engine.tick(), Ok(TickControl::Continue));
        }

        assert_eq!(initialized.load(Ordering::SeqCst), 1);
        assert_eq!(driven.load(Ordering::SeqCst), 3);
        assert_eq!(renderer.log().presented.len(), 3);
    }

    #[test]
    fn set_scene_releases_previous_scene() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);

        engine.set_scene(Counting::new()).unwrap();
        engine.context_mut().touch.add_listener(Arc::new(RecordingTouches::default()));
        engine.set_scene(Counting::new()).unwrap();

        assert_eq!(renderer.log().released.len(), 1);
        assert_eq!(engine.context().touch.listener_count(), 0);
        assert_eq!(engine.context().sprites().active_count(), 1);
    }

    #[test]
    fn failed_initialize_leaves_engine_uninitialized() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        engine.set_scene(Counting::new()).unwrap();

        let result = engine.set_scene(Failing);

        assert!(matches!(result, Err(EngineError::InvalidScreenSize { .. })));
        assert_eq!(engine.state(), EngineState::Uninitialized);
        assert_eq!(engine.scene_name(), None);
        assert_eq!(engine.tick(), Ok(TickControl::Continue));
    }

    #[test]
    fn requested_scene_applies_after_render() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let next = Counting::new();
        let initialized = next.initialized.clone();

        engine.set_scene(Switching::to(next)).unwrap();
        engine.tick().unwrap();

        assert_eq!(initialized.load(Ordering::SeqCst), 1);
        let log = renderer.log();
        // The switching scene's sprite was still presented this tick
        assert_eq!(log.presented[0].len(), 1);
        assert_eq!(log.released.len(), 1);
    }

    #[test]
    fn replaced_scene_is_never_driven_again() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let first = Counting::new();
        let first_driven = first.driven.clone();
        engine.set_scene(first).unwrap();
        engine.tick().unwrap();

        let second = Counting::new();
        let second_driven = second.driven.clone();
        engine.set_scene(second).unwrap();
        for _ in 0..3 {
            engine.tick().unwrap();
        }

        assert_eq!(first_driven.load(Ordering::SeqCst), 1);
        assert_eq!(second_driven.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn requested_scene_replaces_requester_for_later_ticks() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let next = Counting::new();
        let next_driven = next.driven.clone();
        let switching = Switching::to(next);
        let switching_driven = switching.driven.clone();
        engine.set_scene(switching).unwrap();

        for _ in 0..4 {
            engine.tick().unwrap();
        }

        assert_eq!(switching_driven.load(Ordering::SeqCst), 1);
        assert_eq!(next_driven.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn requested_scene_installs_even_when_render_fails() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let next = Counting::new();
        let initialized = next.initialized.clone();
        engine.set_scene(Unconfigured { next: Some(next) }).unwrap();

        assert_eq!(engine.tick(), Err(EngineError::NotConfigured));

        assert_eq!(initialized.load(Ordering::SeqCst), 1);
        assert!(engine.scene_name().is_some_and(|name| name.ends_with("Counting")));
        let log = renderer.log();
        assert!(log.presented.is_empty());
        assert!(log.transforms.is_empty());
        drop(log);

        // The new scene configured the screen, so the next pass renders
        assert_eq!(engine.tick(), Ok(TickControl::Continue));
        assert_eq!(renderer.log().presented.len(), 1);
    }

    #[test]
    fn stopped_engine_exits_and_rejects_scenes() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        engine.set_scene(Counting::new()).unwrap();

        engine.stop();
        engine.stop();

        assert_eq!(engine.state(), EngineState::Stopped);
        assert_eq!(engine.tick(), Ok(TickControl::Exit));
        assert_eq!(engine.set_scene(Counting::new()), Err(EngineError::Stopped));
        assert_eq!(renderer.log().released.len(), 1);
    }

    //=====================================================================
    // Tick Tests
    //=====================================================================

    #[test]
    fn collision_is_seen_by_driver_one_tick_later() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let seen = Arc::new(Mutex::new(Vec::new()));

        engine
            .set_scene(Chaser {
                mover: SpriteHandle::new(Sprite::new(10.0, 10.0, 10.0, 10.0)),
                target: SpriteHandle::new(Sprite::new(80.0, 80.0, 10.0, 10.0)),
                flag: Arc::new(Flag(AtomicBool::new(false))),
                seen: seen.clone(),
            })
            .unwrap();

        for _ in 0..3 {
            engine.tick().unwrap();
        }

        // Moved during tick 2, collided at the end of tick 2, seen on tick 3
        assert_eq!(*seen.lock().unwrap(), vec![false, false, true]);
    }

    #[test]
    fn collisions_are_checked_every_tick() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        engine.context_mut().configure_screen(100.0, 100.0).unwrap();

        let a = SpriteHandle::new(Sprite::new(10.0, 10.0, 10.0, 10.0));
        let b = SpriteHandle::new(Sprite::new(12.0, 12.0, 10.0, 10.0));
        let hits = Arc::new(CountingCollisions::default());
        engine
            .context_mut()
            .collisions
            .register(a.as_collider(), b.as_collider(), hits.clone());

        engine.tick().unwrap();
        engine.tick().unwrap();

        assert_eq!(hits.count(), 2);
    }

    #[test]
    fn platform_touches_reach_driver_then_listeners() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let driver = Counting::new();
        let touches = driver.touches.clone();
        engine.set_scene(driver).unwrap();

        let listener = Arc::new(RecordingTouches::default());
        engine.context_mut().touch.add_listener(listener.clone());

        let sender = engine.take_event_sender().unwrap();
        sender
            .send(PlatformEvent::Touches(vec![
                TouchEvent::new(TouchPhase::Begin, 25.0, 75.0),
                TouchEvent::new(TouchPhase::End, 25.0, 75.0),
            ]))
            .unwrap();

        engine.tick().unwrap();

        assert_eq!(
            *touches.lock().unwrap(),
            vec![(TouchPhase::Begin, 25.0, 25.0), (TouchPhase::End, 25.0, 25.0)]
        );
        assert_eq!(listener.events(), vec![("begin", 25.0, 25.0), ("end", 25.0, 25.0)]);
    }

    #[test]
    fn touches_before_configure_are_dropped() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        let listener = Arc::new(RecordingTouches::default());
        engine.context_mut().touch.add_listener(listener.clone());

        let sender = engine.take_event_sender().unwrap();
        sender
            .send(PlatformEvent::Touches(vec![TouchEvent::new(TouchPhase::Begin, 1.0, 1.0)]))
            .unwrap();

        assert_eq!(engine.tick(), Ok(TickControl::Continue));
        assert!(listener.events().is_empty());
        assert_eq!(
            engine.dispatch_touch(TouchEvent::new(TouchPhase::Begin, 1.0, 1.0)),
            Err(EngineError::NotConfigured)
        );
    }

    #[test]
    fn viewport_events_rescale_screen() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        engine.set_scene(Counting::new()).unwrap();

        let sender = engine.take_event_sender().unwrap();
        sender
            .send(PlatformEvent::ViewportResized { width: 200.0, height: 200.0 })
            .unwrap();
        engine.tick().unwrap();

        assert_eq!(engine.context().screen().scale(), Ok(2.0));
    }

    #[test]
    fn shutdown_event_stops_engine() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        engine.set_scene(Counting::new()).unwrap();

        let sender = engine.take_event_sender().unwrap();
        sender.send(PlatformEvent::Shutdown).unwrap();

        assert_eq!(engine.tick(), Ok(TickControl::Exit));
        assert_eq!(engine.state(), EngineState::Stopped);
    }

    #[test]
    fn dropping_every_sender_stops_engine() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        engine.set_scene(Counting::new()).unwrap();

        let sender = engine.take_event_sender().unwrap();
        assert!(engine.take_event_sender().is_none());
        let clone = sender.clone();
        drop(sender);
        assert_eq!(engine.tick(), Ok(TickControl::Continue));

        drop(clone);
        assert_eq!(engine.tick(), Ok(TickControl::Exit));
        assert_eq!(engine.state(), EngineState::Stopped);
        assert_eq!(renderer.log().released.len(), 1);
    }

    #[test]
    fn render_without_virtual_resolution_fails() {
        let renderer = RecordingRenderer::default();
        let mut engine = engine(&renderer);
        engine
            .context_mut()
            .add_sprite(&SpriteHandle::new(Sprite::new(1.0, 1.0, 1.0, 1.0)))
            .unwrap();

        assert_eq!(engine.tick(), Err(EngineError::NotConfigured));
    }

    //=====================================================================
    // Tick Thread Tests
    //=====================================================================

    #[test]
    fn spawned_engine_ticks_until_shutdown() {
        let renderer = RecordingRenderer::default();
        let mut engine = EngineBuilder::new()
            .with_tps(500.0)
            .build(Box::new(renderer.clone()))
            .unwrap();
        let driver = Counting::new();
        let driven = driver.driven.clone();
        engine.set_scene(driver).unwrap();

        let handle = engine.spawn();
        while driven.load(Ordering::SeqCst) < 3 {
            thread::sleep(Duration::from_millis(1));
        }
        handle.shutdown();

        assert!(handle.join().is_ok());
        // Stop released the scene's node
        assert_eq!(renderer.log().released.len(), 1);
    }

    #[test]
    fn spawned_engine_exits_when_handle_sender_drops() {
        let renderer = RecordingRenderer::default();
        let mut engine = EngineBuilder::new()
            .with_tps(500.0)
            .build(Box::new(renderer.clone()))
            .unwrap();
        engine.set_scene(Counting::new()).unwrap();

        let EngineHandle { sender, join } = engine.spawn();
        assert!(sender.is_some());
        drop(sender);

        assert!(join.join().is_ok());
        assert_eq!(renderer.log().released.len(), 1);
    }

    #[test]
    fn handle_without_sender_reports_failed_send() {
        let renderer = RecordingRenderer::default();
        let mut engine = EngineBuilder::new()
            .with_tps(500.0)
            .build(Box::new(renderer.clone()))
            .unwrap();
        let host = engine.take_event_sender().unwrap();

        let handle = engine.spawn();
        assert!(handle.sender().is_none());
        assert!(!handle.send(PlatformEvent::Shutdown));

        host.send(PlatformEvent::Shutdown).unwrap();
        assert!(handle.join().is_ok());
    }
}
