//! Per-shape bounding boxes and pre-rendered rasters.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::foundation::core::Vec2;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::cpu::CpuSurface;
use crate::render::path::trace_path;
use crate::render::style::{apply_fill, apply_stroke, is_solid_pass_through};
use crate::render::surface::{Raster, Surface};
use crate::scene::Scene;
use crate::scene::model::{InstanceDef, ShapeDef};

/// Margin added on every side of a shape's authored extent.
pub const BOUNDING_BOX_MARGIN: f64 = 20.0;

/// Authored-geometry extent of a shape plus [`BOUNDING_BOX_MARGIN`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub min_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Bottom edge.
    pub max_y: f64,
}

impl BoundingBox {
    /// Top-left corner as an offset from the shape's local origin.
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_y)
    }

    /// Raster size in whole pixels (fractional extents truncate).
    pub fn raster_size(&self) -> (u32, u32) {
        (
            (self.max_x - self.min_x).max(0.0) as u32,
            (self.max_y - self.min_y).max(0.0) as u32,
        )
    }
}

/// Scan every instruction end point of `shape` (stroke paths, then fill paths) and expand by
/// the margin. Curve control points do not contribute.
pub fn compute_bounding_box(shape: &ShapeDef) -> ReelResult<BoundingBox> {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut seen = false;

    let points = shape
        .stroke_paths
        .iter()
        .chain(shape.fill_paths.iter())
        .flat_map(|path| path.points.iter())
        .filter_map(|pt| pt.end_point());
    for p in points {
        seen = true;
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    if !seen {
        return Err(ReelError::scene("shape has no path points"));
    }

    Ok(BoundingBox {
        min_x: min_x - BOUNDING_BOX_MARGIN,
        min_y: min_y - BOUNDING_BOX_MARGIN,
        max_x: max_x + BOUNDING_BOX_MARGIN,
        max_y: max_y + BOUNDING_BOX_MARGIN,
    })
}

/// Paint every fill path (in order), then every stroke path (in order), in the surface's
/// current coordinate frame.
pub fn draw_shape<S: Surface + ?Sized>(surface: &mut S, shape: &ShapeDef) -> ReelResult<()> {
    for path in &shape.fill_paths {
        let style = shape.fill_styles.get(path.index).ok_or_else(|| {
            ReelError::scene(format!("fill style index {} out of range", path.index))
        })?;
        apply_fill(surface, style)?;
        trace_path(surface, &path.points)?;
        surface.fill();
    }
    for path in &shape.stroke_paths {
        let style = shape.stroke_styles.get(path.index).ok_or_else(|| {
            ReelError::scene(format!("stroke style index {} out of range", path.index))
        })?;
        apply_stroke(surface, style)?;
        trace_path(surface, &path.points)?;
        surface.stroke();
    }
    Ok(())
}

/// Rasterize `shape` onto a fresh surface sized to `bbox`, shifted so `bbox`'s origin lands at
/// pixel `(0, 0)`.
pub fn rasterize_shape(shape: &ShapeDef, bbox: &BoundingBox) -> ReelResult<Raster> {
    let (w, h) = bbox.raster_size();
    let mut surface = CpuSurface::new(w, h)?;
    surface.translate(-bbox.origin());
    draw_shape(&mut surface, shape)?;
    Ok(surface.to_raster())
}

/// Bounding box and raster of one shape instance.
#[derive(Clone, Debug)]
pub struct CachedShape {
    /// Extent the raster covers, in the shape's local space.
    pub bbox: BoundingBox,
    /// Pre-rendered shape.
    pub raster: Raster,
}

/// Pre-rendered rasters for every shape instance of a scene, keyed by instance index.
///
/// Populated once by [`ShapeRasterCache::prepare`] and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct ShapeRasterCache {
    entries: BTreeMap<usize, CachedShape>,
}

impl ShapeRasterCache {
    /// Compute boxes and rasterize every shape instance in `scene`.
    #[tracing::instrument(skip(scene), fields(instances = scene.instances().len()))]
    pub fn prepare(scene: &Scene) -> ReelResult<Self> {
        let shapes: Vec<(usize, &ShapeDef)> = scene
            .instances()
            .iter()
            .enumerate()
            .filter_map(|(i, inst)| match inst {
                InstanceDef::Shape(s) => Some((i, s)),
                _ => None,
            })
            .collect();

        for &(index, shape) in &shapes {
            for (style_index, style) in shape.stroke_styles.iter().enumerate() {
                if is_solid_pass_through(style) {
                    tracing::warn!(
                        instance = index,
                        style = style_index,
                        stroke_type = %style.stroke_type,
                        solid_style = %style.solid_style,
                        "stroke drawn as plain solid stroke"
                    );
                }
            }
        }

        let rendered = shapes
            .par_iter()
            .map(|&(index, shape)| -> ReelResult<(usize, CachedShape)> {
                let bbox = compute_bounding_box(shape)
                    .map_err(|e| ReelError::scene(format!("instance {index}: {}", e.detail())))?;
                let raster = rasterize_shape(shape, &bbox)?;
                tracing::debug!(
                    instance = index,
                    width = raster.width(),
                    height = raster.height(),
                    "shape rasterized"
                );
                Ok((index, CachedShape { bbox, raster }))
            })
            .collect::<ReelResult<Vec<_>>>()?;

        Ok(Self {
            entries: rendered.into_iter().collect(),
        })
    }

    /// Cached entry for shape instance `index`.
    pub fn get(&self, index: usize) -> Option<&CachedShape> {
        self.entries.get(&index)
    }

    /// Entries in instance-index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CachedShape)> {
        self.entries.iter().map(|(i, e)| (*i, e))
    }

    /// Number of cached shapes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the scene has no shape instances.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster_cache.rs"]
mod tests;
