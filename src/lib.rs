//! reelplay composites and plays back 2D vector/bitmap animations exported as a JSON scene.
//!
//! - Load and validate a [`Scene`]
//! - Create a [`Player`] (pre-renders shapes, loads bitmaps, attaches a [`CpuSurface`])
//! - Draw single frames or play the wrapping frame sequence at the scene's frame rate
//!
//! The compositor draws against the abstract [`Surface`] trait; [`CpuSurface`] implements it
//! on `vello_cpu`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Fixed-interval animation clock.
pub mod clock;
/// Bootstrap and clocked playback.
pub mod player;
/// Drawing surfaces, styles, shape cache and compositor.
pub mod render;
/// Scene document model and loading.
pub mod scene;

pub use crate::assets::decode::decode_image;
pub use crate::assets::store::{
    AssetSource, AssetStore, AssetStoreOpts, FsAssetSource, MemoryAssetSource, normalize_rel_path,
};
pub use crate::clock::AnimationClock;
pub use crate::foundation::core::{
    Affine, BezPath, Canvas, FrameIndex, FrameRate, Point, Rgba8Premul, Transform2D, Vec2,
};
pub use crate::foundation::error::{ReelError, ReelResult};
pub use crate::player::{Player, PlayerOpts};
pub use crate::render::compositor::FrameCompositor;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::raster_cache::{
    BOUNDING_BOX_MARGIN, BoundingBox, CachedShape, ShapeRasterCache, compute_bounding_box,
};
pub use crate::render::style::{FillPaint, LineCap, LineJoin, Rgba, StrokePaint};
pub use crate::render::surface::{FrameRGBA, Raster, Surface};
pub use crate::scene::Scene;
