use super::*;

#[test]
fn frame_index_wraps_around_animation_length() {
    assert_eq!(FrameIndex(0).next_wrapping(3), FrameIndex(1));
    assert_eq!(FrameIndex(2).next_wrapping(3), FrameIndex(0));
    assert_eq!(FrameIndex(5).next_wrapping(0), FrameIndex(0));
}

#[test]
fn frame_rate_rejects_non_positive() {
    assert!(FrameRate::new(0.0).is_err());
    assert!(FrameRate::new(-24.0).is_err());
    assert!(FrameRate::new(f64::NAN).is_err());

    let fr = FrameRate::new(25.0).unwrap();
    assert_eq!(fr.interval_ms(), 40.0);
    assert_eq!(fr.sample_window(), 25);
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), kurbo::Affine::IDENTITY);

    let t = Transform2D {
        translate: Vec2::new(10.0, -2.5),
        ..Transform2D::default()
    };
    assert_eq!(
        t.to_affine(),
        kurbo::Affine::translate(Vec2::new(10.0, -2.5))
    );
}

#[test]
fn transform_applies_rotate_before_scale_before_translate() {
    let t = Transform2D {
        translate: Vec2::new(100.0, 0.0),
        scale: Vec2::new(2.0, 1.0),
        rotation_rad: std::f64::consts::FRAC_PI_2,
    };
    // (1,0) -> rotate -> (0,1) -> scale -> (0,1) -> translate -> (100,1)
    let p = t.to_affine() * Point::new(1.0, 0.0);
    assert!((p.x - 100.0).abs() < 1e-9);
    assert!((p.y - 1.0).abs() < 1e-9);
}

#[test]
fn premul_rounds_to_nearest() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(c.a, 128);
}

#[test]
fn sample_window_counts_whole_frames() {
    assert_eq!(FrameRate::new(23.976).unwrap().sample_window(), 23);
    assert_eq!(FrameRate::new(0.5).unwrap().sample_window(), 1);
}
