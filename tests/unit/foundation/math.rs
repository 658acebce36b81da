use super::*;

#[test]
fn fnv_incremental_writes_match_one_shot() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"reelplay");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"reel");
    b.write_bytes(b"play");
    assert_eq!(a.finish(), b.finish());
    assert_ne!(a.finish(), Fnv1a64::new_default().finish());
}

#[test]
fn fnv_f64_treats_signed_zero_equal() {
    let mut a = Fnv1a64::new_default();
    a.write_f64(0.0);
    let mut b = Fnv1a64::new_default();
    b.write_f64(-0.0);
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn unpremul_inverts_opaque_and_zero_alpha() {
    assert_eq!(unpremul_u8(200, 255), 200);
    assert_eq!(unpremul_u8(10, 0), 0);
    assert_eq!(unpremul_u8(64, 128), 128);
}
