use crate::foundation::error::{ReelError, ReelResult};

pub use kurbo::{Affine, BezPath, Point, Vec2};

/// 0-based index into a scene's frame list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Next index in a looping sequence of `frame_count` frames.
    ///
    /// `frame_count == 0` always yields frame 0.
    pub fn next_wrapping(self, frame_count: u64) -> Self {
        if frame_count == 0 {
            return Self(0);
        }
        Self((self.0 + 1) % frame_count)
    }
}

/// Target playback rate in frames per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameRate(f64);

impl FrameRate {
    /// Create a validated frame rate (finite and > 0).
    pub fn new(fps: f64) -> ReelResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ReelError::scene(format!(
                "frameRate must be finite and > 0, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Interval between two frames in milliseconds (`1000 / fps`).
    pub fn interval_ms(self) -> f64 {
        1000.0 / self.0
    }

    /// Number of frame durations kept by a rate counter: the whole frames in one second,
    /// at least one.
    pub fn sample_window(self) -> usize {
        (self.0.floor() as usize).max(1)
    }
}

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

/// Local transform of a placement: translate, then scale, then rotate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    /// Translation in parent space.
    pub translate: Vec2,
    /// Non-uniform scale, default (1,1).
    pub scale: Vec2,
    /// Rotation in radians.
    pub rotation_rad: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            rotation_rad: 0.0,
        }
    }
}

impl Transform2D {
    /// Matrix that, post-multiplied onto a current transform, places local content.
    pub fn to_affine(self) -> Affine {
        // Canonical order: T(translate) * S(scale) * R(rot)
        Affine::translate(self.translate)
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
            * Affine::rotate(self.rotation_rad)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
