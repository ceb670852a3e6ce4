//=========================================================================
// Collision Engine
//=========================================================================
//
// Pairwise AABB detection over explicitly registered collider pairs.
//
// Architecture:
//   registrations: Vec<Registration { a, b, listener }>
//       ↓ evaluate_and_notify() (once per tick, after Drive)
//   corner test: any corner of A inside B (inclusive)
//       ↓
//   listener.on_collision(A, B)
//
// Identity: colliders and listeners are `Arc`s compared by address.
// A pair is registered at most once; registering it again replaces the
// listener.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use glam::Vec2;
use log::{debug, trace, warn};

//=== Aabb ================================================================

/// Axis-aligned box stored as center + size (virtual units, Y up).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a box from two opposite corners.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let (w, h) = ((x1 - x0).abs(), (y1 - y0).abs());
        Self::new(x0.min(x1) + w / 2.0, y0.min(y1) + h / 2.0, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x - self.w / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.h / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Corners in order: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left(), self.top()),
            Vec2::new(self.right(), self.top()),
            Vec2::new(self.left(), self.bottom()),
            Vec2::new(self.right(), self.bottom()),
        ]
    }

    /// Inclusive point-in-box test.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.bottom() && y <= self.top()
    }

    /// Returns `true` if any corner of `self` lies inside `other`.
    ///
    /// One-directional: a box entirely enclosing `other` without any of
    /// its own corners inside is not reported.
    pub fn corner_hits(&self, other: &Aabb) -> bool {
        self.corners()
            .iter()
            .any(|corner| other.contains_point(corner.x, corner.y))
    }
}

//=== Collider ============================================================

/// Anything with a box in virtual space.
pub trait Collider: Send + Sync {
    /// Center `x`, center `y`, width, height.
    fn xywh(&self) -> (f32, f32, f32, f32);

    fn aabb(&self) -> Aabb {
        let (x, y, w, h) = self.xywh();
        Aabb::new(x, y, w, h)
    }
}

impl Collider for Aabb {
    fn xywh(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.w, self.h)
    }
}

/// Identity comparison for shared colliders (address only, vtable ignored).
pub fn same_collider(a: &Arc<dyn Collider>, b: &Arc<dyn Collider>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

//=== CollisionListener ===================================================

/// Receives collision notifications.
///
/// Invoked on the tick thread. Listeners that need to change scene state
/// record the hit (flag, counter, channel) and let the driver act on it
/// during its next `drive`.
pub trait CollisionListener: Send + Sync {
    fn on_collision(&self, a: &dyn Collider, b: &dyn Collider);
}

impl<F> CollisionListener for F
where
    F: Fn(&dyn Collider, &dyn Collider) + Send + Sync,
{
    fn on_collision(&self, a: &dyn Collider, b: &dyn Collider) {
        self(a, b)
    }
}

//=== CollisionPolicy =====================================================

/// How many listeners may fire per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Notify only the first colliding registration, in registration order.
    #[default]
    FirstMatch,

    /// Notify every colliding registration, in registration order.
    AllMatches,
}

//=== CollisionEngine =====================================================

struct Registration {
    a: Arc<dyn Collider>,
    b: Arc<dyn Collider>,
    listener: Arc<dyn CollisionListener>,
}

impl Registration {
    fn matches(&self, a: &Arc<dyn Collider>, b: &Arc<dyn Collider>) -> bool {
        same_collider(&self.a, a) && same_collider(&self.b, b)
    }
}

/// Registered collider pairs and their listeners.
#[derive(Default)]
pub struct CollisionEngine {
    registrations: Vec<Registration>,
    policy: CollisionPolicy,
}

impl CollisionEngine {
    //--- Construction -----------------------------------------------------

    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            registrations: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: CollisionPolicy) {
        self.policy = policy;
    }

    //--- Registration -----------------------------------------------------

    /// Watches the pair `(a, b)`.
    ///
    /// If the exact pair is already registered its listener is replaced
    /// and its position in evaluation order is kept.
    pub fn register(
        &mut self,
        a: Arc<dyn Collider>,
        b: Arc<dyn Collider>,
        listener: Arc<dyn CollisionListener>,
    ) {
        if let Some(existing) = self.registrations.iter_mut().find(|r| r.matches(&a, &b)) {
            warn!(target: "collision", "Collider pair was already registered and its listener has been replaced");
            existing.listener = listener;
            return;
        }

        self.registrations.push(Registration { a, b, listener });
        debug!(target: "collision", "Registered pair ({} total)", self.registrations.len());
    }

    /// Stops watching exactly the pair `(a, b)`. Returns `false` if the
    /// pair was not registered.
    pub fn unregister(&mut self, a: &Arc<dyn Collider>, b: &Arc<dyn Collider>) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| !r.matches(a, b));

        let removed = self.registrations.len() != before;
        if removed {
            debug!(target: "collision", "Unregistered pair ({} left)", self.registrations.len());
        }
        removed
    }

    pub fn unregister_all(&mut self) {
        if !self.registrations.is_empty() {
            debug!(target: "collision", "Clearing {} registrations", self.registrations.len());
        }
        self.registrations.clear();
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    //--- Evaluation -------------------------------------------------------

    /// Tests every registration in order and notifies listeners.
    ///
    /// Under [`CollisionPolicy::FirstMatch`] evaluation stops at the first
    /// hit. Returns the number of listeners notified.
    pub fn evaluate_and_notify(&self) -> usize {
        let mut notified = 0;

        for registration in &self.registrations {
            let a = registration.a.aabb();
            let b = registration.b.aabb();

            if !a.corner_hits(&b) {
                continue;
            }

            trace!(target: "collision", "Hit {:?} -> {:?}", a, b);
            registration
                .listener
                .on_collision(registration.a.as_ref(), registration.b.as_ref());
            notified += 1;

            if self.policy == CollisionPolicy::FirstMatch {
                break;
            }
        }

        notified
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
