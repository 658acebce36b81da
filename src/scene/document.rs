use crate::foundation::core::{Canvas, FrameIndex, FrameRate};
use crate::foundation::error::{ReelError, ReelResult};
use crate::scene::model::{FrameDef, InstanceDef, SceneDef};
use crate::scene::validate::validate_scene;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Validated, immutable scene document.
///
/// Construction always validates, so every frame's `instanceIndex` and mask references are known
/// to be in range and every style/instruction kind is supported. Nothing in a `Scene` is mutated
/// after load; derived data (bounding boxes, rasters) lives in [`crate::ShapeRasterCache`].
#[derive(Debug, Clone)]
pub struct Scene {
    def: SceneDef,
    frame_rate: FrameRate,
}

impl Scene {
    /// Parse and validate a scene from a JSON reader.
    #[tracing::instrument(skip(r))]
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let def: SceneDef = serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse scene JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse and validate a scene from a JSON string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::scene(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate an in-memory document.
    pub fn from_def(def: SceneDef) -> ReelResult<Self> {
        validate_scene(&def)?;
        let frame_rate = FrameRate::new(def.frame_rate)?;
        tracing::debug!(
            instances = def.instances.len(),
            frames = def.frames.len(),
            "scene validated"
        );
        Ok(Self { def, frame_rate })
    }

    /// Output surface dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.def.width,
            height: self.def.height,
        }
    }

    /// Target playback rate.
    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Instance definitions, index-addressed.
    pub fn instances(&self) -> &[InstanceDef] {
        &self.def.instances
    }

    /// Instance definition at `index`.
    pub fn instance(&self, index: usize) -> ReelResult<&InstanceDef> {
        self.def.instances.get(index).ok_or_else(|| {
            ReelError::scene(format!(
                "instanceIndex {index} out of range ({} instances)",
                self.def.instances.len()
            ))
        })
    }

    /// All frames in playback order.
    pub fn frames(&self) -> &[FrameDef] {
        &self.def.frames
    }

    /// Animation length in frames.
    pub fn frame_count(&self) -> u64 {
        self.def.frames.len() as u64
    }

    /// Frame at `index`.
    pub fn frame(&self, index: FrameIndex) -> ReelResult<&FrameDef> {
        usize::try_from(index.0)
            .ok()
            .and_then(|i| self.def.frames.get(i))
            .ok_or_else(|| {
                ReelError::scene(format!(
                    "frame {} out of range ({} frames)",
                    index.0,
                    self.def.frames.len()
                ))
            })
    }

    /// Distinct bitmap asset names referenced by instance definitions, in first-use order.
    pub fn bitmap_asset_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for inst in &self.def.instances {
            if let InstanceDef::Bitmap(b) = inst
                && !out.contains(&b.path.as_str())
            {
                out.push(b.path.as_str());
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
