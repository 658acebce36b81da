//! Test double that records every surface call.

use crate::foundation::core::{Affine, Point};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::style::{FillPaint, StrokePaint};
use crate::render::surface::{Raster, Surface};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Clear,
    Save,
    Restore,
    SetTransform(Affine),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    FillPaint(FillPaint),
    StrokePaint(StrokePaint),
    Fill,
    Stroke,
    Clip,
    DrawImage { width: u32, height: u32, transform: Affine },
}

#[derive(Debug)]
pub(crate) struct RecordingSurface {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) ops: Vec<Op>,
    transform: Affine,
    stack: Vec<(Affine, usize)>,
    clips: usize,
}

impl RecordingSurface {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            clips: 0,
        }
    }

    pub(crate) fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn save(&mut self) {
        self.stack.push((self.transform, self.clips));
        self.ops.push(Op::Save);
    }

    fn restore(&mut self) -> ReelResult<()> {
        let (t, clips) = self
            .stack
            .pop()
            .ok_or_else(|| ReelError::render("restore without save"))?;
        self.transform = t;
        self.clips = clips;
        self.ops.push(Op::Restore);
        Ok(())
    }

    fn save_depth(&self) -> usize {
        self.stack.len()
    }

    fn clip_depth(&self) -> usize {
        self.clips
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.ops.push(Op::SetTransform(transform));
    }

    fn begin_path(&mut self) {
        self.ops.push(Op::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.ops.push(Op::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.ops.push(Op::LineTo(p));
    }

    fn quad_to(&mut self, ctrl: Point, p: Point) {
        self.ops.push(Op::QuadTo(ctrl, p));
    }

    fn set_fill_paint(&mut self, paint: &FillPaint) {
        self.ops.push(Op::FillPaint(paint.clone()));
    }

    fn set_stroke_paint(&mut self, paint: &StrokePaint) {
        self.ops.push(Op::StrokePaint(*paint));
    }

    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }

    fn clip(&mut self) {
        self.clips += 1;
        self.ops.push(Op::Clip);
    }

    fn draw_image(&mut self, raster: &Raster) {
        self.ops.push(Op::DrawImage {
            width: raster.width(),
            height: raster.height(),
            transform: self.transform,
        });
    }
}
