use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let raster = decode_image(&png_bytes(3, 2, [100, 50, 200, 128])).unwrap();
    assert_eq!((raster.width(), raster.height()), (3, 2));
    assert_eq!(
        &raster.data()[..4],
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn fully_transparent_pixels_drop_color() {
    let raster = decode_image(&png_bytes(1, 1, [255, 255, 255, 0])).unwrap();
    assert_eq!(raster.data(), &[0, 0, 0, 0]);
}

#[test]
fn garbage_bytes_fail() {
    assert!(decode_image(b"not an image").is_err());
}
