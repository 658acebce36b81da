//! Per-channel color manipulation of bitmap placements.

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::ReelResult;
use crate::foundation::math::{Fnv1a64, unpremul_u8};
use crate::render::surface::Raster;
use crate::scene::model::ColorManipulationDef;

/// `true` when `m` leaves every pixel unchanged.
pub fn is_identity(m: &ColorManipulationDef) -> bool {
    *m == ColorManipulationDef::default()
}

/// Stable key for a manipulation, used to share tinted rasters across frames.
pub fn fingerprint(m: &ColorManipulationDef) -> u64 {
    let mut h = Fnv1a64::new_default();
    for v in [
        m.red_multiplier,
        m.green_multiplier,
        m.blue_multiplier,
        m.alpha_multiplier,
        m.red_offset,
        m.green_offset,
        m.blue_offset,
        m.alpha_offset,
    ] {
        h.write_f64(v);
    }
    h.finish()
}

/// Apply `out = in * multiplier + offset` to every straight-alpha channel of `src`.
pub fn apply_color_manipulation(src: &Raster, m: &ColorManipulationDef) -> ReelResult<Raster> {
    let channel = |c: u8, mul: f64, off: f64| -> u8 {
        (f64::from(c) * mul + off).round().clamp(0.0, 255.0) as u8
    };

    let mut out = Vec::with_capacity(src.data().len());
    for px in src.data().chunks_exact(4) {
        let a = px[3];
        let r = channel(unpremul_u8(px[0], a), m.red_multiplier, m.red_offset);
        let g = channel(unpremul_u8(px[1], a), m.green_multiplier, m.green_offset);
        let b = channel(unpremul_u8(px[2], a), m.blue_multiplier, m.blue_offset);
        let a = channel(a, m.alpha_multiplier, m.alpha_offset);
        let p = Rgba8Premul::from_straight_rgba(r, g, b, a);
        out.extend_from_slice(&[p.r, p.g, p.b, p.a]);
    }
    Raster::from_premul_rgba8(src.width(), src.height(), &out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/color.rs"]
mod tests;
