//! Fill and stroke style resolution.
//!
//! Style records are resolved into paint state that is set on a [`Surface`] right before the
//! path it applies to is built and consumed (the surface is immediate-mode).

use crate::foundation::core::Point;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::surface::Surface;
use crate::scene::model::{ColorDef, ColorStopDef, FillStyleDef, StrokeStyleDef};

/// Color in the exporter's native ranges: channels 0..=255, alpha 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red, 0..=255.
    pub red: f64,
    /// Green, 0..=255.
    pub green: f64,
    /// Blue, 0..=255.
    pub blue: f64,
    /// Alpha, 0..=1.
    pub alpha: f64,
}

impl Rgba {
    /// CSS color string, `rgba(r,g,b,a)`, numbers printed as authored.
    pub fn to_css(self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.red, self.green, self.blue, self.alpha
        )
    }

    /// Normalized `[r, g, b, a]` in `0..=1`, clamped.
    pub fn to_unit_f32(self) -> [f32; 4] {
        let c = |v: f64| (v / 255.0).clamp(0.0, 1.0) as f32;
        [
            c(self.red),
            c(self.green),
            c(self.blue),
            self.alpha.clamp(0.0, 1.0) as f32,
        ]
    }
}

impl From<ColorDef> for Rgba {
    fn from(c: ColorDef) -> Self {
        Self {
            red: c.red,
            green: c.green,
            blue: c.blue,
            alpha: c.alpha,
        }
    }
}

/// Gradient stop in authored order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, `0..=1`.
    pub offset: f64,
    /// Stop color.
    pub color: Rgba,
}

/// Resolved fill paint.
#[derive(Clone, Debug, PartialEq)]
pub enum FillPaint {
    /// Uniform color.
    Solid(Rgba),
    /// Linear gradient from `start` to `end` in local coordinates.
    LinearGradient {
        /// Start point.
        start: Point,
        /// End point.
        end: Point,
        /// Stops, never re-sorted.
        stops: Vec<GradientStop>,
    },
    /// Radial gradient around `center`.
    RadialGradient {
        /// Center point.
        center: Point,
        /// Outer radius.
        radius: f64,
        /// Stops, never re-sorted.
        stops: Vec<GradientStop>,
    },
}

/// Line cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    /// Flat cap ending exactly at the endpoint (the authoring tool calls this "none").
    Butt,
    /// Semicircular cap.
    Round,
    /// Square cap extending half the width.
    Square,
}

/// Line join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    /// Rounded join.
    Round,
    /// Beveled join.
    Bevel,
    /// Mitered join.
    Miter,
}

/// Resolved stroke paint and geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokePaint {
    /// Line width.
    pub width: f64,
    /// Cap style.
    pub cap: LineCap,
    /// Join style.
    pub join: LineJoin,
    /// Stroke color.
    pub color: Rgba,
}

/// Resolve a fill style record.
pub fn resolve_fill(style: &FillStyleDef) -> ReelResult<FillPaint> {
    match style {
        FillStyleDef::SolidColor(c) => Ok(FillPaint::Solid((*c).into())),
        FillStyleDef::LinearGradient {
            start,
            stop,
            color_stops,
        } => Ok(FillPaint::LinearGradient {
            start: start.to_point(),
            end: stop.to_point(),
            stops: resolve_stops(color_stops)?,
        }),
        FillStyleDef::RadialGradient {
            center,
            radius,
            color_stops,
        } => {
            if !radius.is_finite() || *radius < 0.0 {
                return Err(ReelError::scene(format!(
                    "radial gradient radius must be finite and >= 0, got {radius}"
                )));
            }
            Ok(FillPaint::RadialGradient {
                center: center.to_point(),
                radius: *radius,
                stops: resolve_stops(color_stops)?,
            })
        }
        FillStyleDef::Unknown(tag) => Err(ReelError::unsupported(format!(
            "fill style type \"{tag}\""
        ))),
    }
}

fn resolve_stops(stops: &[ColorStopDef]) -> ReelResult<Vec<GradientStop>> {
    stops
        .iter()
        .map(|s| {
            if !(0.0..=1.0).contains(&s.ratio) {
                return Err(ReelError::scene(format!(
                    "gradient stop ratio must be in [0, 1], got {}",
                    s.ratio
                )));
            }
            Ok(GradientStop {
                offset: s.ratio,
                color: s.color.into(),
            })
        })
        .collect()
}

/// Resolve a stroke style record. `caps: "none"` maps to [`LineCap::Butt`].
pub fn resolve_stroke(style: &StrokeStyleDef) -> ReelResult<StrokePaint> {
    let cap = match style.caps.as_str() {
        "none" | "butt" => LineCap::Butt,
        "round" => LineCap::Round,
        "square" => LineCap::Square,
        other => {
            return Err(ReelError::unsupported(format!("stroke cap \"{other}\"")));
        }
    };
    let join = match style.joints.as_str() {
        "round" => LineJoin::Round,
        "bevel" => LineJoin::Bevel,
        "miter" => LineJoin::Miter,
        other => {
            return Err(ReelError::unsupported(format!("stroke join \"{other}\"")));
        }
    };
    if !style.weight.is_finite() || style.weight < 0.0 {
        return Err(ReelError::scene(format!(
            "stroke weight must be finite and >= 0, got {}",
            style.weight
        )));
    }

    Ok(StrokePaint {
        width: style.weight,
        cap,
        join,
        color: style.color.into(),
    })
}

/// `true` when the record asks for something drawn here as a plain solid stroke
/// (dashed/dotted stroke kinds, hairlines).
pub fn is_solid_pass_through(style: &StrokeStyleDef) -> bool {
    let kind_is_solid = style.stroke_type.is_empty() || style.stroke_type == "SolidStroke";
    !kind_is_solid || style.solid_style == "hairline"
}

/// Resolve `style` and make it the surface's fill paint.
pub fn apply_fill<S: Surface + ?Sized>(surface: &mut S, style: &FillStyleDef) -> ReelResult<()> {
    let paint = resolve_fill(style)?;
    surface.set_fill_paint(&paint);
    Ok(())
}

/// Resolve `style` and make it the surface's stroke paint.
pub fn apply_stroke<S: Surface + ?Sized>(
    surface: &mut S,
    style: &StrokeStyleDef,
) -> ReelResult<()> {
    let paint = resolve_stroke(style)?;
    surface.set_stroke_paint(&paint);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
