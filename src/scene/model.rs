//! Serde boundary types for the exported scene document.
//!
//! Field names follow the exporter's camelCase JSON. Tagged unions (`type` field) keep an
//! `Unknown` catch-all so that unsupported kinds surface as [`crate::ReelError::Unsupported`]
//! naming the offending tag, rather than as an opaque parse failure.

use serde::{Deserialize, Deserializer, de::Error as _};

/// Root of the scene document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDef {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Target playback rate.
    pub frame_rate: f64,
    /// Instance definitions, addressed by position.
    #[serde(default)]
    pub instances: Vec<InstanceDef>,
    /// Frames in playback order.
    #[serde(default)]
    pub frames: Vec<FrameDef>,
}

/// 2D coordinate; accepts `[x, y]` or `{"x": .., "y": ..}`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2Def {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Vec2Def {
    /// Construct from components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_point(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    pub(crate) fn to_vec2(self) -> kurbo::Vec2 {
        kurbo::Vec2::new(self.x, self.y)
    }
}

impl<'de> Deserialize<'de> for Vec2Def {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// Split an object carrying a string `type` tag into `(tag, object)`.
fn split_type_tag<E: serde::de::Error>(
    value: serde_json::Value,
    what: &str,
) -> Result<(String, serde_json::Value), E> {
    let tag = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| E::custom(format!("{what} is missing a string \"type\" field")))?
        .to_owned();
    Ok((tag, value))
}

/// Reusable instance definition.
#[derive(Debug, Clone)]
pub enum InstanceDef {
    /// External image asset.
    Bitmap(BitmapDef),
    /// Vector shape made of fill and stroke paths.
    Shape(ShapeDef),
    /// Instance `type` outside the supported set.
    Unknown(String),
}

impl<'de> Deserialize<'de> for InstanceDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let (tag, value) = split_type_tag::<D::Error>(value, "instance")?;
        match tag.as_str() {
            "bitmap" => serde_json::from_value(value)
                .map(Self::Bitmap)
                .map_err(D::Error::custom),
            "shape" => serde_json::from_value(value)
                .map(Self::Shape)
                .map_err(D::Error::custom),
            _ => Ok(Self::Unknown(tag)),
        }
    }
}

/// Bitmap instance referencing an image by asset name.
#[derive(Debug, Clone, Deserialize)]
pub struct BitmapDef {
    /// Asset name, relative to the assets root.
    pub path: String,
}

/// Vector shape instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDef {
    /// Fill styles addressed by [`PathDef::index`] of fill paths.
    #[serde(default)]
    pub fill_styles: Vec<FillStyleDef>,
    /// Stroke styles addressed by [`PathDef::index`] of stroke paths.
    #[serde(default)]
    pub stroke_styles: Vec<StrokeStyleDef>,
    /// Filled paths, painted first.
    #[serde(default)]
    pub fill_paths: Vec<PathDef>,
    /// Stroked paths, painted after all fills.
    #[serde(default)]
    pub stroke_paths: Vec<PathDef>,
}

impl ShapeDef {
    /// Total number of path instructions across fill and stroke paths.
    pub fn point_count(&self) -> usize {
        self.fill_paths
            .iter()
            .chain(self.stroke_paths.iter())
            .map(|p| p.points.len())
            .sum()
    }
}

/// Ordered path instructions plus the style index they are painted with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathDef {
    /// Instructions in authored order.
    #[serde(default)]
    pub points: Vec<PathPointDef>,
    /// Index into the owning shape's fill or stroke styles.
    #[serde(default)]
    pub index: usize,
}

/// One path instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum PathPointDef {
    /// Start a new sub-path at `p`.
    MoveTo {
        /// Target point.
        p: Vec2Def,
    },
    /// Straight segment to `p`.
    LineTo {
        /// Target point.
        p: Vec2Def,
    },
    /// Quadratic Bézier segment to `p` through `control`.
    QuadraticCurveTo {
        /// Control point.
        control: Vec2Def,
        /// End point.
        p: Vec2Def,
    },
    /// Instruction `type` outside the supported set.
    Unknown(String),
}

impl PathPointDef {
    /// End point of the instruction, if it has one.
    pub fn end_point(&self) -> Option<Vec2Def> {
        match self {
            Self::MoveTo { p } | Self::LineTo { p } | Self::QuadraticCurveTo { p, .. } => Some(*p),
            Self::Unknown(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for PathPointDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Plain {
            p: Vec2Def,
        }

        #[derive(Deserialize)]
        struct Quad {
            control: Vec2Def,
            p: Vec2Def,
        }

        let value = serde_json::Value::deserialize(deserializer)?;
        let (tag, value) = split_type_tag::<D::Error>(value, "path point")?;
        match tag.as_str() {
            "moveTo" => {
                let Plain { p } = serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok(Self::MoveTo { p })
            }
            "lineTo" => {
                let Plain { p } = serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok(Self::LineTo { p })
            }
            "quadraticCurveTo" => {
                let Quad { control, p } =
                    serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok(Self::QuadraticCurveTo { control, p })
            }
            _ => Ok(Self::Unknown(tag)),
        }
    }
}

/// Color in the exporter's native ranges: channels 0..=255, alpha 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ColorDef {
    /// Red channel, 0..=255.
    pub red: f64,
    /// Green channel, 0..=255.
    pub green: f64,
    /// Blue channel, 0..=255.
    pub blue: f64,
    /// Alpha, 0..=1.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl ColorDef {
    /// Opaque color from 8-bit channels.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: f64::from(red),
            green: f64::from(green),
            blue: f64::from(blue),
            alpha: 1.0,
        }
    }
}

/// Gradient stop: position in `[0, 1]` and color.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ColorStopDef {
    /// Stop position along the gradient.
    pub ratio: f64,
    /// Stop color.
    #[serde(flatten)]
    pub color: ColorDef,
}

/// Fill style record.
#[derive(Debug, Clone, PartialEq)]
pub enum FillStyleDef {
    /// Uniform color.
    SolidColor(ColorDef),
    /// Linear gradient between `start` and `stop`.
    LinearGradient {
        /// Gradient start in shape-local space.
        start: Vec2Def,
        /// Gradient end in shape-local space.
        stop: Vec2Def,
        /// Stops in authored order.
        color_stops: Vec<ColorStopDef>,
    },
    /// Radial gradient around `center`.
    RadialGradient {
        /// Gradient center in shape-local space.
        center: Vec2Def,
        /// Outer radius.
        radius: f64,
        /// Stops in authored order.
        color_stops: Vec<ColorStopDef>,
    },
    /// Fill `type` outside the supported set.
    Unknown(String),
}

impl<'de> Deserialize<'de> for FillStyleDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Linear {
            start: Vec2Def,
            stop: Vec2Def,
            #[serde(default)]
            color_stops: Vec<ColorStopDef>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Radial {
            center: Vec2Def,
            radius: f64,
            #[serde(default)]
            color_stops: Vec<ColorStopDef>,
        }

        let value = serde_json::Value::deserialize(deserializer)?;
        let (tag, value) = split_type_tag::<D::Error>(value, "fill style")?;
        match tag.as_str() {
            "solidColor" => serde_json::from_value(value)
                .map(Self::SolidColor)
                .map_err(D::Error::custom),
            "linearGradient" => {
                let l: Linear = serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok(Self::LinearGradient {
                    start: l.start,
                    stop: l.stop,
                    color_stops: l.color_stops,
                })
            }
            // The exporter writes this one capitalized.
            "RadialGradient" => {
                let r: Radial = serde_json::from_value(value).map_err(D::Error::custom)?;
                Ok(Self::RadialGradient {
                    center: r.center,
                    radius: r.radius,
                    color_stops: r.color_stops,
                })
            }
            _ => Ok(Self::Unknown(tag)),
        }
    }
}

/// Stroke style record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyleDef {
    /// Stroke color.
    #[serde(flatten)]
    pub color: ColorDef,
    /// Line width.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Line cap; `"none"` means butt.
    #[serde(default = "default_round")]
    pub caps: String,
    /// Line join.
    #[serde(default = "default_round")]
    pub joints: String,
    /// Authoring-tool solid style (e.g. `"hairline"`).
    #[serde(default)]
    pub solid_style: String,
    /// Authoring-tool stroke kind (e.g. `"SolidStroke"`, `"DashedStroke"`).
    #[serde(default)]
    pub stroke_type: String,
}

fn default_weight() -> f64 {
    1.0
}

fn default_round() -> String {
    "round".to_owned()
}

/// One frame: placements in paint order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameDef {
    /// Placements in authored (paint) order.
    #[serde(default)]
    pub instances: Vec<PlacementDef>,
}

/// Per-frame occurrence of an instance definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDef {
    /// Index into [`SceneDef::instances`].
    pub instance_index: usize,
    /// Translation.
    #[serde(default)]
    pub translate: Vec2Def,
    /// Scale, default `(1, 1)`.
    #[serde(default = "default_scale")]
    pub scale: Vec2Def,
    /// Rotation in radians.
    #[serde(default)]
    pub rotation: f64,
    /// This placement only contributes a clip region.
    #[serde(default)]
    pub mask: bool,
    /// This placement is clipped by [`Self::masks`].
    #[serde(default)]
    pub masked: bool,
    /// Indices into the same frame's placements, applied in order.
    #[serde(default)]
    pub masks: Vec<usize>,
    /// Optional per-channel color transform (bitmap placements only).
    #[serde(default)]
    pub color_manipulation: Option<ColorManipulationDef>,
}

fn default_scale() -> Vec2Def {
    Vec2Def::new(1.0, 1.0)
}

impl PlacementDef {
    /// Unmasked, untransformed placement of `instance_index`.
    pub fn new(instance_index: usize) -> Self {
        Self {
            instance_index,
            translate: Vec2Def::default(),
            scale: default_scale(),
            rotation: 0.0,
            mask: false,
            masked: false,
            masks: Vec::new(),
            color_manipulation: None,
        }
    }

    /// Local transform of this placement.
    pub fn transform(&self) -> crate::foundation::core::Transform2D {
        crate::foundation::core::Transform2D {
            translate: self.translate.to_vec2(),
            scale: self.scale.to_vec2(),
            rotation_rad: self.rotation,
        }
    }
}

/// `out = in * multiplier + offset` per straight-alpha channel, offsets in 0..=255 units.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorManipulationDef {
    /// Alpha multiplier.
    #[serde(default = "one")]
    pub alpha_multiplier: f64,
    /// Red multiplier.
    #[serde(default = "one")]
    pub red_multiplier: f64,
    /// Green multiplier.
    #[serde(default = "one")]
    pub green_multiplier: f64,
    /// Blue multiplier.
    #[serde(default = "one")]
    pub blue_multiplier: f64,
    /// Alpha offset.
    #[serde(default)]
    pub alpha_offset: f64,
    /// Red offset.
    #[serde(default)]
    pub red_offset: f64,
    /// Green offset.
    #[serde(default)]
    pub green_offset: f64,
    /// Blue offset.
    #[serde(default)]
    pub blue_offset: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for ColorManipulationDef {
    fn default() -> Self {
        Self {
            alpha_multiplier: 1.0,
            red_multiplier: 1.0,
            green_multiplier: 1.0,
            blue_multiplier: 1.0,
            alpha_offset: 0.0,
            red_offset: 0.0,
            green_offset: 0.0,
            blue_offset: 0.0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
