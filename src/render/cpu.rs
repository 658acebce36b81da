use crate::foundation::core::{Affine, BezPath, Point};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::style::{FillPaint, GradientStop, LineCap, LineJoin, Rgba, StrokePaint};
use crate::render::surface::{FrameRGBA, Raster, Surface, surface_dim};

/// [`Surface`] backed by `vello_cpu`.
///
/// Drawing is recorded into a `vello_cpu::RenderContext`; pixels are produced on
/// [`CpuSurface::snapshot`]. Each clip is a `vello_cpu` clip layer, so the clip stack is kept
/// alongside the context to pop layers on `restore` and to re-establish them after `clear`.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    transform: Affine,
    path: BezPath,
    fill: FillPaint,
    stroke: StrokePaint,
    clips: Vec<ClipLayer>,
    saves: Vec<SavedState>,
}

struct ClipLayer {
    transform: Affine,
    path: vello_cpu::kurbo::BezPath,
}

struct SavedState {
    transform: Affine,
    clip_depth: usize,
    fill: FillPaint,
    stroke: StrokePaint,
}

impl CpuSurface {
    /// Create a transparent surface. Zero or oversized dimensions are a render error.
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        let w = surface_dim(width, "surface width")?;
        let h = surface_dim(height, "surface height")?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            transform: Affine::IDENTITY,
            path: BezPath::new(),
            fill: FillPaint::Solid(BLACK),
            stroke: StrokePaint {
                width: 1.0,
                cap: LineCap::Butt,
                join: LineJoin::Miter,
                color: BLACK,
            },
            clips: Vec::new(),
            saves: Vec::new(),
        })
    }

    /// Render everything drawn so far into a fresh premultiplied frame.
    pub fn snapshot(&mut self) -> FrameRGBA {
        let pixmap = self.render_pixmap();
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Render everything drawn so far into an immutable [`Raster`].
    pub fn to_raster(&mut self) -> Raster {
        Raster::from_pixmap(self.render_pixmap())
    }

    fn render_pixmap(&mut self) -> vello_cpu::Pixmap {
        // Layers must be balanced for rasterization; the clip stack is re-pushed afterwards.
        for _ in &self.clips {
            self.ctx.pop_layer();
        }
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        self.push_clip_layers();
        pixmap
    }

    fn push_clip_layers(&mut self) {
        for clip in &self.clips {
            self.ctx.set_transform(affine_to_cpu(clip.transform));
            self.ctx.push_clip_layer(&clip.path);
        }
    }

    fn sync_transform(&mut self) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("save_depth", &self.saves.len())
            .field("clip_depth", &self.clips.len())
            .finish_non_exhaustive()
    }
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn clear(&mut self) {
        self.ctx.reset();
        self.push_clip_layers();
    }

    fn save(&mut self) {
        self.saves.push(SavedState {
            transform: self.transform,
            clip_depth: self.clips.len(),
            fill: self.fill.clone(),
            stroke: self.stroke,
        });
    }

    fn restore(&mut self) -> ReelResult<()> {
        let saved = self
            .saves
            .pop()
            .ok_or_else(|| ReelError::render("restore without matching save"))?;
        while self.clips.len() > saved.clip_depth {
            self.clips.pop();
            self.ctx.pop_layer();
        }
        self.transform = saved.transform;
        self.fill = saved.fill;
        self.stroke = saved.stroke;
        Ok(())
    }

    fn save_depth(&self) -> usize {
        self.saves.len()
    }

    fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Point) {
        if self.path.elements().is_empty() {
            self.path.move_to(p);
        } else {
            self.path.line_to(p);
        }
    }

    fn quad_to(&mut self, ctrl: Point, p: Point) {
        if self.path.elements().is_empty() {
            self.path.move_to(ctrl);
        }
        self.path.quad_to(ctrl, p);
    }

    fn set_fill_paint(&mut self, paint: &FillPaint) {
        self.fill = paint.clone();
    }

    fn set_stroke_paint(&mut self, paint: &StrokePaint) {
        self.stroke = *paint;
    }

    fn fill(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        self.sync_transform();
        set_fill_paint_cpu(&mut self.ctx, &self.fill);
        self.ctx.fill_path(&bezpath_to_cpu(&self.path));
    }

    fn stroke(&mut self) {
        if self.path.elements().is_empty() || self.stroke.width <= 0.0 {
            return;
        }
        self.sync_transform();
        self.ctx.set_stroke(stroke_to_cpu(&self.stroke));
        self.ctx.set_paint(color_to_cpu(self.stroke.color));
        self.ctx.stroke_path(&bezpath_to_cpu(&self.path));
    }

    fn clip(&mut self) {
        let path = bezpath_to_cpu(&self.path);
        self.sync_transform();
        self.ctx.push_clip_layer(&path);
        self.clips.push(ClipLayer {
            transform: self.transform,
            path,
        });
    }

    fn draw_image(&mut self, raster: &Raster) {
        self.sync_transform();
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(raster.pixmap().clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(raster.width()),
            f64::from(raster.height()),
        ));
    }
}

const BLACK: Rgba = Rgba {
    red: 0.0,
    green: 0.0,
    blue: 0.0,
    alpha: 1.0,
};

fn color_to_cpu(c: Rgba) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::new(c.to_unit_f32())
}

fn stops_to_cpu(stops: &[GradientStop]) -> Vec<vello_cpu::peniko::ColorStop> {
    stops
        .iter()
        .map(|s| vello_cpu::peniko::ColorStop::from((s.offset as f32, color_to_cpu(s.color))))
        .collect()
}

fn set_fill_paint_cpu(ctx: &mut vello_cpu::RenderContext, paint: &FillPaint) {
    match paint {
        FillPaint::Solid(c) => ctx.set_paint(color_to_cpu(*c)),
        FillPaint::LinearGradient { start, end, stops } => {
            let stops = stops_to_cpu(stops);
            let gradient =
                vello_cpu::peniko::Gradient::new_linear(point_to_cpu(*start), point_to_cpu(*end))
                    .with_stops(stops.as_slice());
            ctx.set_paint(gradient);
        }
        FillPaint::RadialGradient {
            center,
            radius,
            stops,
        } => {
            let stops = stops_to_cpu(stops);
            let gradient =
                vello_cpu::peniko::Gradient::new_radial(point_to_cpu(*center), *radius as f32)
                    .with_stops(stops.as_slice());
            ctx.set_paint(gradient);
        }
    }
}

fn stroke_to_cpu(s: &StrokePaint) -> vello_cpu::kurbo::Stroke {
    let cap = match s.cap {
        LineCap::Butt => vello_cpu::kurbo::Cap::Butt,
        LineCap::Round => vello_cpu::kurbo::Cap::Round,
        LineCap::Square => vello_cpu::kurbo::Cap::Square,
    };
    let join = match s.join {
        LineJoin::Round => vello_cpu::kurbo::Join::Round,
        LineJoin::Bevel => vello_cpu::kurbo::Join::Bevel,
        LineJoin::Miter => vello_cpu::kurbo::Join::Miter,
    };
    vello_cpu::kurbo::Stroke::new(s.width)
        .with_caps(cap)
        .with_join(join)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
