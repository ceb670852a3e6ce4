//=========================================================================
// Screen Transform
//=========================================================================
//
// Maps the virtual (design-resolution) space onto the device viewport.
//
//   scale   = min(deviceW / virtualW, deviceH / virtualH)
//   marginW = deviceW - virtualW * scale
//   marginH = deviceH - virtualH * scale
//
// The virtual image is letterboxed and centered (half of each margin on
// either side), never cropped. Virtual Y grows upward, device Y grows
// downward.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Affine2, Vec2};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::sprite::Sprite;
use crate::core::EngineError;

//=== ScreenTransform =====================================================

/// Virtual ↔ device coordinate mapping.
///
/// Until the host reports a viewport, the viewport is assumed to equal
/// the virtual size (scale 1, no margins).
#[derive(Debug, Clone, Default)]
pub struct ScreenTransform {
    virtual_size: Option<Vec2>,
    viewport: Option<Vec2>,
    scale: f32,
    margin: Vec2,
}

impl ScreenTransform {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Configuration ----------------------------------------------------

    /// Sets the design resolution and recomputes the mapping.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidScreenSize`] unless both sides are positive
    /// and finite.
    pub fn configure(&mut self, width: f32, height: f32) -> Result<(), EngineError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(EngineError::InvalidScreenSize { width, height });
        }

        if let Some(previous) = self.virtual_size {
            debug!(
                target: "screen",
                "Virtual size reconfigured {}x{} -> {}x{}",
                previous.x, previous.y, width, height
            );
        }

        self.virtual_size = Some(Vec2::new(width, height));
        self.recompute();
        Ok(())
    }

    /// Applies a new device viewport.
    ///
    /// Zero or non-finite sizes (e.g. a minimized window) are ignored and
    /// the previous mapping is kept. Returns whether the viewport changed.
    pub fn on_viewport_change(&mut self, width: f32, height: f32) -> bool {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            warn!(target: "screen", "Ignoring degenerate viewport {}x{}", width, height);
            return false;
        }

        self.viewport = Some(Vec2::new(width, height));
        self.recompute();
        true
    }

    pub fn is_configured(&self) -> bool {
        self.virtual_size.is_some()
    }

    //--- Derived State ----------------------------------------------------

    /// Configured virtual size as `(width, height)`.
    pub fn virtual_size(&self) -> Option<(f32, f32)> {
        self.virtual_size.map(|v| (v.x, v.y))
    }

    /// Current device viewport as `(width, height)`.
    pub fn viewport(&self) -> Option<(f32, f32)> {
        self.viewport.or(self.virtual_size).map(|v| (v.x, v.y))
    }

    pub fn scale(&self) -> Result<f32, EngineError> {
        self.require_configured()?;
        Ok(self.scale)
    }

    /// Total horizontal and vertical letterbox margins in device pixels.
    pub fn margins(&self) -> Result<(f32, f32), EngineError> {
        self.require_configured()?;
        Ok((self.margin.x, self.margin.y))
    }

    //--- Mapping ----------------------------------------------------------

    /// Device-space affine mapping the unit square onto `sprite`.
    ///
    /// Composition order is translate → rotate about the sprite center
    /// (only when `rotation != 0`) → scale to the sprite's device size.
    /// Changing that order moves the visual pivot.
    pub fn to_device_transform(&self, sprite: &Sprite) -> Result<Affine2, EngineError> {
        let virtual_size = self.require_configured()?;
        let s = self.scale;

        let translation = Vec2::new(
            sprite.x * s - sprite.w / 2.0 * s + self.margin.x / 2.0,
            (virtual_size.y - sprite.y) * s - sprite.h / 2.0 * s + self.margin.y / 2.0,
        );
        let size = Vec2::new(sprite.w * s, sprite.h * s);

        let mut affine = Affine2::from_translation(translation);
        if sprite.rotation != 0.0 {
            let pivot = size * 0.5;
            affine = affine
                * Affine2::from_translation(pivot)
                * Affine2::from_angle(sprite.rotation)
                * Affine2::from_translation(-pivot);
        }

        Ok(affine * Affine2::from_scale(size))
    }

    /// Maps a virtual point to device pixels.
    pub fn to_device(&self, x: f32, y: f32) -> Result<(f32, f32), EngineError> {
        let virtual_size = self.require_configured()?;
        Ok((
            x * self.scale + self.margin.x / 2.0,
            (virtual_size.y - y) * self.scale + self.margin.y / 2.0,
        ))
    }

    /// Maps device pixels back to a virtual point.
    pub fn to_virtual(&self, x: f32, y: f32) -> Result<(f32, f32), EngineError> {
        let virtual_size = self.require_configured()?;
        Ok((
            (x - self.margin.x / 2.0) / self.scale,
            virtual_size.y - (y - self.margin.y / 2.0) / self.scale,
        ))
    }

    //--- Internal Helpers -------------------------------------------------

    fn require_configured(&self) -> Result<Vec2, EngineError> {
        self.virtual_size.ok_or(EngineError::NotConfigured)
    }

    fn recompute(&mut self) {
        let Some(virtual_size) = self.virtual_size else {
            return;
        };
        let device = self.viewport.unwrap_or(virtual_size);

        self.scale = (device.x / virtual_size.x).min(device.y / virtual_size.y);
        self.margin = device - virtual_size * self.scale;

        debug!(
            target: "screen",
            "Viewport {}x{} -> scale {}, margins {}x{}",
            device.x, device.y, self.scale, self.margin.x, self.margin.y
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
