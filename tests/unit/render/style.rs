use super::*;
use crate::scene::model::{ColorDef, ColorStopDef, Vec2Def};

fn stroke_def(caps: &str, joints: &str) -> StrokeStyleDef {
    StrokeStyleDef {
        color: ColorDef::rgb(0, 0, 255),
        weight: 2.0,
        caps: caps.to_owned(),
        joints: joints.to_owned(),
        solid_style: String::new(),
        stroke_type: String::new(),
    }
}

#[test]
fn css_color_keeps_authored_precision() {
    let c = Rgba {
        red: 255.0,
        green: 12.5,
        blue: 0.0,
        alpha: 0.25,
    };
    assert_eq!(c.to_css(), "rgba(255,12.5,0,0.25)");
}

#[test]
fn unit_color_is_clamped() {
    let c = Rgba {
        red: 300.0,
        green: -4.0,
        blue: 255.0,
        alpha: 2.0,
    };
    assert_eq!(c.to_unit_f32(), [1.0, 0.0, 1.0, 1.0]);
}

#[test]
fn solid_fill_resolves_directly() {
    let paint = resolve_fill(&FillStyleDef::SolidColor(ColorDef::rgb(1, 2, 3))).unwrap();
    let FillPaint::Solid(c) = paint else {
        panic!("expected solid paint");
    };
    assert_eq!((c.red, c.green, c.blue, c.alpha), (1.0, 2.0, 3.0, 1.0));
}

#[test]
fn gradient_stops_keep_authored_order() {
    let style = FillStyleDef::LinearGradient {
        start: Vec2Def::new(0.0, 0.0),
        stop: Vec2Def::new(10.0, 0.0),
        color_stops: vec![
            ColorStopDef {
                ratio: 0.8,
                color: ColorDef::rgb(255, 0, 0),
            },
            ColorStopDef {
                ratio: 0.2,
                color: ColorDef::rgb(0, 255, 0),
            },
        ],
    };
    let FillPaint::LinearGradient { start, end, stops } = resolve_fill(&style).unwrap() else {
        panic!("expected linear gradient");
    };
    assert_eq!(start, Point::new(0.0, 0.0));
    assert_eq!(end, Point::new(10.0, 0.0));
    let offsets: Vec<f64> = stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.8, 0.2]);
}

#[test]
fn radial_gradient_rejects_negative_radius() {
    let style = FillStyleDef::RadialGradient {
        center: Vec2Def::new(0.0, 0.0),
        radius: -1.0,
        color_stops: vec![],
    };
    assert!(matches!(resolve_fill(&style), Err(ReelError::Scene(_))));
}

#[test]
fn unknown_fill_is_unsupported() {
    let err = resolve_fill(&FillStyleDef::Unknown("bitmapFill".to_owned())).unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.to_string().contains("bitmapFill"));
}

#[test]
fn caps_none_maps_to_butt() {
    let paint = resolve_stroke(&stroke_def("none", "miter")).unwrap();
    assert_eq!(paint.cap, LineCap::Butt);
    assert_eq!(paint.join, LineJoin::Miter);
    assert_eq!(paint.width, 2.0);
}

#[test]
fn caps_and_joins_outside_the_set_are_unsupported() {
    assert!(resolve_stroke(&stroke_def("arrow", "round")).unwrap_err().is_unsupported());
    assert!(resolve_stroke(&stroke_def("round", "spiky")).unwrap_err().is_unsupported());
}

#[test]
fn dashed_and_hairline_strokes_are_passed_through() {
    let mut s = stroke_def("round", "round");
    assert!(!is_solid_pass_through(&s));
    s.stroke_type = "SolidStroke".to_owned();
    assert!(!is_solid_pass_through(&s));
    s.stroke_type = "DashedStroke".to_owned();
    assert!(is_solid_pass_through(&s));
    s.stroke_type = "SolidStroke".to_owned();
    s.solid_style = "hairline".to_owned();
    assert!(is_solid_pass_through(&s));
}
