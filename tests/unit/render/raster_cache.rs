use super::*;
use crate::render::recording::{Op, RecordingSurface};
use crate::scene::model::{
    ColorDef, FillStyleDef, PathDef, PathPointDef, StrokeStyleDef, Vec2Def,
};

fn red_square() -> ShapeDef {
    ShapeDef {
        fill_styles: vec![FillStyleDef::SolidColor(ColorDef::rgb(255, 0, 0))],
        fill_paths: vec![PathDef {
            points: vec![
                PathPointDef::MoveTo {
                    p: Vec2Def::new(0.0, 0.0),
                },
                PathPointDef::LineTo {
                    p: Vec2Def::new(10.0, 0.0),
                },
                PathPointDef::LineTo {
                    p: Vec2Def::new(10.0, 10.0),
                },
                PathPointDef::LineTo {
                    p: Vec2Def::new(0.0, 10.0),
                },
            ],
            index: 0,
        }],
        ..ShapeDef::default()
    }
}

fn blue_stroke() -> StrokeStyleDef {
    StrokeStyleDef {
        color: ColorDef::rgb(0, 0, 255),
        weight: 4.0,
        caps: "round".to_owned(),
        joints: "round".to_owned(),
        solid_style: String::new(),
        stroke_type: String::new(),
    }
}

#[test]
fn square_box_has_margin_on_every_side() {
    let bbox = compute_bounding_box(&red_square()).unwrap();
    assert_eq!(
        bbox,
        BoundingBox {
            min_x: -20.0,
            min_y: -20.0,
            max_x: 30.0,
            max_y: 30.0,
        }
    );
    assert_eq!(bbox.raster_size(), (50, 50));
    assert_eq!(bbox.origin(), Vec2::new(-20.0, -20.0));
}

#[test]
fn control_points_do_not_extend_the_box() {
    let mut shape = red_square();
    shape.fill_paths[0].points.push(PathPointDef::QuadraticCurveTo {
        control: Vec2Def::new(500.0, -500.0),
        p: Vec2Def::new(0.0, 0.0),
    });
    let bbox = compute_bounding_box(&shape).unwrap();
    assert_eq!((bbox.max_x, bbox.min_y), (30.0, -20.0));
}

#[test]
fn stroke_points_are_included() {
    let mut shape = red_square();
    shape.stroke_styles.push(blue_stroke());
    shape.stroke_paths.push(PathDef {
        points: vec![
            PathPointDef::MoveTo {
                p: Vec2Def::new(-5.0, 40.0),
            },
            PathPointDef::LineTo {
                p: Vec2Def::new(15.0, 40.0),
            },
        ],
        index: 0,
    });
    let bbox = compute_bounding_box(&shape).unwrap();
    assert_eq!(bbox.min_x, -25.0);
    assert_eq!(bbox.max_y, 60.0);
}

#[test]
fn empty_shape_is_malformed() {
    let err = compute_bounding_box(&ShapeDef::default()).unwrap_err();
    assert!(matches!(err, ReelError::Scene(_)));
}

#[test]
fn fills_are_committed_before_strokes() {
    let mut shape = red_square();
    shape.stroke_styles.push(blue_stroke());
    // Authored with the stroke first; drawing order must not follow authoring order.
    shape.stroke_paths.push(shape.fill_paths[0].clone());

    let mut s = RecordingSurface::new(50, 50);
    draw_shape(&mut s, &shape).unwrap();
    let fill_at = s.ops.iter().position(|op| *op == Op::Fill).unwrap();
    let stroke_at = s.ops.iter().position(|op| *op == Op::Stroke).unwrap();
    assert!(fill_at < stroke_at);
    assert_eq!(s.count(|op| *op == Op::BeginPath), 2);
}

#[test]
fn rasterized_square_sits_at_margin_offset() {
    let shape = red_square();
    let bbox = compute_bounding_box(&shape).unwrap();
    let raster = rasterize_shape(&shape, &bbox).unwrap();
    assert_eq!((raster.width(), raster.height()), (50, 50));

    let px = |x: usize, y: usize| {
        let i = (y * 50 + x) * 4;
        &raster.data()[i..i + 4]
    };
    assert_eq!(px(25, 25), &[255, 0, 0, 255]);
    assert_eq!(px(5, 5)[3], 0);
    assert_eq!(px(35, 35)[3], 0);
}
