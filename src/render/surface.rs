use std::sync::Arc;

use crate::foundation::core::{Affine, Point, Rgba8Premul, Vec2};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::style::{FillPaint, StrokePaint};

/// Abstract 2D immediate-mode drawing target.
///
/// The model is the classic canvas one: a current transform that transform calls post-multiply,
/// a stack of save/restore checkpoints capturing transform, clip and paint state, a current path
/// built by `begin_path`/`move_to`/`line_to`/`quad_to`, and fill/stroke/clip operations that
/// consume the current path with the current paint. Clips only ever narrow until the matching
/// `restore`.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;
    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Clear every pixel to transparent. Transform, clip and checkpoints are untouched.
    fn clear(&mut self);

    /// Push a checkpoint of transform, clip and paint state.
    fn save(&mut self);
    /// Pop the most recent checkpoint, dropping clips established since.
    fn restore(&mut self) -> ReelResult<()>;
    /// Number of outstanding checkpoints.
    fn save_depth(&self) -> usize;
    /// Number of clip regions currently intersected.
    fn clip_depth(&self) -> usize;

    /// Current transform.
    fn transform(&self) -> Affine;
    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Post-multiply a translation.
    fn translate(&mut self, v: Vec2) {
        let t = self.transform() * Affine::translate(v);
        self.set_transform(t);
    }

    /// Post-multiply a non-uniform scale.
    fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.transform() * Affine::scale_non_uniform(sx, sy);
        self.set_transform(t);
    }

    /// Post-multiply a rotation (radians, clockwise on a y-down surface).
    fn rotate(&mut self, radians: f64) {
        let t = self.transform() * Affine::rotate(radians);
        self.set_transform(t);
    }

    /// Discard the current path and start a new one.
    fn begin_path(&mut self);
    /// Start a sub-path at `p`.
    fn move_to(&mut self, p: Point);
    /// Straight segment to `p`.
    fn line_to(&mut self, p: Point);
    /// Quadratic Bézier segment to `p` with control point `ctrl`.
    fn quad_to(&mut self, ctrl: Point, p: Point);

    /// Set the paint used by [`Surface::fill`].
    fn set_fill_paint(&mut self, paint: &FillPaint);
    /// Set the paint and geometry used by [`Surface::stroke`].
    fn set_stroke_paint(&mut self, paint: &StrokePaint);

    /// Fill the current path (non-zero winding).
    fn fill(&mut self);
    /// Stroke the current path.
    fn stroke(&mut self);
    /// Intersect the clip region with the current path.
    fn clip(&mut self);

    /// Draw `raster` with its top-left corner at the local origin.
    fn draw_image(&mut self, raster: &Raster);
}

/// Immutable premultiplied RGBA8 image, cheap to clone.
///
/// Used both for decoded bitmap assets and for cached shape rasters.
#[derive(Clone, Debug)]
pub struct Raster {
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl Raster {
    /// Build a raster from tightly packed, row-major premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, bytes: &[u8]) -> ReelResult<Self> {
        let w = surface_dim(width, "raster width")?;
        let h = surface_dim(height, "raster height")?;
        if bytes.len()
            != (width as usize)
                .saturating_mul(height as usize)
                .saturating_mul(4)
        {
            return Err(ReelError::render("raster byte len mismatch"));
        }

        let mut may_have_opacities = false;
        let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
            (width as usize) * (height as usize),
        );
        for px in bytes.chunks_exact(4) {
            may_have_opacities |= px[3] != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
                px[0], px[1], px[2], px[3],
            ]));
        }
        let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
        Ok(Self::from_pixmap(pixmap))
    }

    pub(crate) fn from_pixmap(pixmap: vello_cpu::Pixmap) -> Self {
        Self {
            pixmap: Arc::new(pixmap),
        }
    }

    pub(crate) fn pixmap(&self) -> &Arc<vello_cpu::Pixmap> {
        &self.pixmap
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }
}

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`; transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        if x >= self.width || y >= self.height {
            return Rgba8Premul::transparent();
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    /// `true` when every pixel has zero alpha.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Convert premultiplied bytes into straight alpha (for encoders such as PNG).
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if !self.premultiplied {
            return out;
        }
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = crate::foundation::math::unpremul_u8(px[0], a);
            px[1] = crate::foundation::math::unpremul_u8(px[1], a);
            px[2] = crate::foundation::math::unpremul_u8(px[2], a);
        }
        out
    }
}

pub(crate) fn surface_dim(v: u32, what: &str) -> ReelResult<u16> {
    if v == 0 {
        return Err(ReelError::render(format!("{what} must be > 0")));
    }
    v.try_into()
        .map_err(|_| ReelError::render(format!("{what} exceeds u16: {v}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
