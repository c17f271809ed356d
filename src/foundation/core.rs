use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{TilemuxError, TilemuxResult};

pub use kurbo::Rect;

/// Largest width or height a pixel surface may have.
pub const MAX_SURFACE_DIM: u32 = u16::MAX as u32;

/// Pixel dimensions of a surface.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Scale by a device pixel ratio. Fractional pixels are truncated, matching how a canvas
    /// stores an assigned non-integer size.
    pub fn scaled(self, ratio: f64) -> Self {
        fn scale(v: u32, ratio: f64) -> u32 {
            let out = (f64::from(v) * ratio).floor();
            if out.is_finite() && out > 0.0 {
                out.min(f64::from(u32::MAX)) as u32
            } else {
                0
            }
        }
        Self {
            width: scale(self.width, ratio),
            height: scale(self.height, ratio),
        }
    }

    pub fn validate_surface(self) -> TilemuxResult<()> {
        if self.width > MAX_SURFACE_DIM || self.height > MAX_SURFACE_DIM {
            return Err(TilemuxError::validation(format!(
                "surface {}x{} exceeds the {MAX_SURFACE_DIM} px per side limit",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A viewport's pixel rectangle within the shared offscreen surface.
///
/// `sx`/`sy` are in buffer space: top-left origin, +y down.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TileRect {
    pub sx: u32,
    pub sy: u32,
    pub s_width: u32,
    pub s_height: u32,
}

impl TileRect {
    pub fn new(sx: u32, sy: u32, s_width: u32, s_height: u32) -> Self {
        Self {
            sx,
            sy,
            s_width,
            s_height,
        }
    }

    /// Rectangle anchored at the origin covering a whole private surface.
    pub fn full(size: PixelSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn size(self) -> PixelSize {
        PixelSize::new(self.s_width, self.s_height)
    }

    pub fn is_smaller_than(self, min: u32) -> bool {
        self.s_width < min || self.s_height < min
    }
}

/// Straight (non-premultiplied) RGB background colour, channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Background(pub [f32; 3]);

impl Default for Background {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Background {
    pub const BLACK: Self = Self([0.0, 0.0, 0.0]);

    /// Opaque RGBA8. Each channel is `floor(255 * c)`; an opaque colour is identical in
    /// premultiplied and straight form.
    pub fn to_rgba8(self) -> [u8; 4] {
        let ch = |c: f32| -> u8 {
            if c.is_nan() {
                return 0;
            }
            (255.0 * c.clamp(0.0, 1.0)).floor() as u8
        };
        [ch(self.0[0]), ch(self.0[1]), ch(self.0[2]), 255]
    }
}

static ENGINE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Generate a process-unique engine identifier.
pub fn generate_engine_id() -> String {
    let seq = ENGINE_SEQ.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    format!("engine-{pid:08x}-{seq:012x}")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
