use anyhow::Context;

use crate::foundation::error::ReelResult;
use crate::foundation::math::mul_div255_u8;
use crate::render::surface::Raster;

/// Decode an encoded image (PNG, JPEG, ...) into a premultiplied [`Raster`].
pub fn decode_image(bytes: &[u8]) -> ReelResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Raster::from_premul_rgba8(width, height, &rgba8_premul)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
