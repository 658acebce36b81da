//! Per-frame compositing of placements onto a [`Surface`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::store::AssetStore;
use crate::foundation::core::{Affine, FrameIndex, Point};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::color::{apply_color_manipulation, fingerprint, is_identity};
use crate::render::path::trace_path;
use crate::render::raster_cache::ShapeRasterCache;
use crate::render::style::apply_fill;
use crate::render::surface::{Raster, Surface};
use crate::scene::Scene;
use crate::scene::model::{FrameDef, InstanceDef, PlacementDef};

/// Draws frames of a [`Scene`] from pre-rendered shape rasters and loaded bitmaps.
///
/// All derived data is built up front ([`FrameCompositor::new`] and
/// [`FrameCompositor::prepare_bitmaps`]); [`FrameCompositor::draw`] only reads it.
#[derive(Debug)]
pub struct FrameCompositor {
    scene: Arc<Scene>,
    shapes: ShapeRasterCache,
    tinted: HashMap<(usize, u64), Raster>,
}

impl FrameCompositor {
    /// Pre-rasterize every shape instance of `scene`.
    pub fn new(scene: Arc<Scene>) -> ReelResult<Self> {
        let shapes = ShapeRasterCache::prepare(&scene)?;
        Ok(Self {
            scene,
            shapes,
            tinted: HashMap::new(),
        })
    }

    /// Build color-manipulated variants of bitmaps used by any placement.
    ///
    /// Must run after `assets` settled; bitmaps without a manipulation need no preparation.
    pub fn prepare_bitmaps(&mut self, assets: &AssetStore) -> ReelResult<()> {
        for frame in self.scene.frames() {
            for placement in &frame.instances {
                let Some(m) = placement.color_manipulation.as_ref() else {
                    continue;
                };
                if is_identity(m) {
                    continue;
                }
                let InstanceDef::Bitmap(b) = self.scene.instance(placement.instance_index)? else {
                    continue;
                };
                let key = (placement.instance_index, fingerprint(m));
                if self.tinted.contains_key(&key) {
                    continue;
                }
                let tinted = apply_color_manipulation(assets.get_asset(&b.path)?, m)?;
                self.tinted.insert(key, tinted);
            }
        }
        tracing::debug!(tinted = self.tinted.len(), "bitmap variants prepared");
        Ok(())
    }

    /// Scene being drawn.
    pub fn scene(&self) -> &Arc<Scene> {
        &self.scene
    }

    /// Shape rasters and bounding boxes.
    pub fn shapes(&self) -> &ShapeRasterCache {
        &self.shapes
    }

    /// Clear `surface` and draw frame `index`.
    ///
    /// Checkpoint depth and transform are the same before and after, also when an error is
    /// returned part-way through.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        index: FrameIndex,
        assets: &AssetStore,
    ) -> ReelResult<()> {
        let frame = self.scene.frame(index)?;
        tracing::trace!(frame = index.0, placements = frame.instances.len(), "draw");

        surface.clear();
        for placement in &frame.instances {
            if placement.mask {
                continue;
            }
            surface.save();
            let drawn = self.draw_placement(surface, frame, placement, assets);
            let restored = surface.restore();
            drawn?;
            restored?;
        }
        Ok(())
    }

    fn draw_placement<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &FrameDef,
        placement: &PlacementDef,
        assets: &AssetStore,
    ) -> ReelResult<()> {
        let instance = self.scene.instance(placement.instance_index)?;
        if placement.masked {
            self.clip_to_masks(surface, frame, &placement.masks, assets)?;
        }

        let t = placement.transform();
        surface.translate(t.translate);
        surface.scale(t.scale.x, t.scale.y);
        surface.rotate(t.rotation_rad);

        match instance {
            InstanceDef::Bitmap(b) => {
                let raster = self.bitmap_raster(placement, &b.path, assets)?;
                surface.draw_image(raster);
            }
            InstanceDef::Shape(_) => {
                let cached = self.shapes.get(placement.instance_index).ok_or_else(|| {
                    ReelError::render(format!(
                        "no cached raster for shape instance {}",
                        placement.instance_index
                    ))
                })?;
                surface.translate(cached.bbox.origin());
                surface.draw_image(&cached.raster);
            }
            InstanceDef::Unknown(tag) => {
                return Err(ReelError::unsupported(format!("instance type \"{tag}\"")));
            }
        }
        Ok(())
    }

    fn bitmap_raster<'a>(
        &'a self,
        placement: &PlacementDef,
        path: &str,
        assets: &'a AssetStore,
    ) -> ReelResult<&'a Raster> {
        if let Some(m) = placement.color_manipulation.as_ref()
            && !is_identity(m)
        {
            return self
                .tinted
                .get(&(placement.instance_index, fingerprint(m)))
                .ok_or_else(|| {
                    ReelError::asset(format!(
                        "color-manipulated '{path}' used before bitmaps were prepared"
                    ))
                });
        }
        assets.get_asset(path)
    }

    /// Intersect the clip with every mask placement in `masks`, leaving the transform as found.
    fn clip_to_masks<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &FrameDef,
        masks: &[usize],
        assets: &AssetStore,
    ) -> ReelResult<()> {
        let base = surface.transform();
        let clipped = masks
            .iter()
            .try_for_each(|&m| self.clip_to_mask(surface, frame, m, base, assets));
        surface.set_transform(base);
        clipped
    }

    fn clip_to_mask<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &FrameDef,
        mask_index: usize,
        base: Affine,
        assets: &AssetStore,
    ) -> ReelResult<()> {
        let mask = frame.instances.get(mask_index).ok_or_else(|| {
            ReelError::scene(format!("mask index {mask_index} out of range"))
        })?;
        surface.set_transform(base * mask.transform().to_affine());

        match self.scene.instance(mask.instance_index)? {
            InstanceDef::Bitmap(b) => {
                let raster = assets.get_asset(&b.path)?;
                let (w, h) = (f64::from(raster.width()), f64::from(raster.height()));
                surface.begin_path();
                surface.move_to(Point::new(0.0, 0.0));
                surface.line_to(Point::new(w, 0.0));
                surface.line_to(Point::new(w, h));
                surface.line_to(Point::new(0.0, h));
                surface.line_to(Point::new(0.0, 0.0));
                surface.clip();
            }
            InstanceDef::Shape(shape) => {
                for path in &shape.fill_paths {
                    let style = shape.fill_styles.get(path.index).ok_or_else(|| {
                        ReelError::scene(format!("fill style index {} out of range", path.index))
                    })?;
                    apply_fill(surface, style)?;
                    trace_path(surface, &path.points)?;
                    surface.clip();
                }
            }
            InstanceDef::Unknown(tag) => {
                return Err(ReelError::unsupported(format!("instance type \"{tag}\"")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
