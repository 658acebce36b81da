//! Bootstrap and clocked playback.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use crate::assets::store::{AssetSource, AssetStore, AssetStoreOpts, FsAssetSource};
use crate::clock::AnimationClock;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::compositor::FrameCompositor;
use crate::render::cpu::CpuSurface;
use crate::render::surface::FrameRGBA;
use crate::scene::Scene;

/// Options for [`Player`].
#[derive(Clone, Debug)]
pub struct PlayerOpts {
    /// Directory bitmap asset paths are resolved against.
    pub assets_root: PathBuf,
    /// Wrap back to frame 0 after the last frame; otherwise playback ends there.
    pub looping: bool,
    /// Worker threads for asset decoding. `None` uses rayon defaults.
    pub asset_threads: Option<usize>,
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("."),
            looping: true,
            asset_threads: None,
        }
    }
}

/// Loaded scene ready to draw: shapes pre-rendered, bitmaps loaded, output surface attached.
pub struct Player {
    compositor: FrameCompositor,
    assets: AssetStore,
    surface: CpuSurface,
    clock: AnimationClock,
    frame: FrameIndex,
    drawn: bool,
    looping: bool,
}

impl Player {
    /// Load the scene at `path`; bitmap assets resolve relative to `opts.assets_root`.
    pub fn from_path(path: impl AsRef<Path>, opts: PlayerOpts) -> ReelResult<Self> {
        let scene = Scene::from_path(path)?;
        Self::new(scene, opts)
    }

    /// Prepare `scene` reading bitmaps from the filesystem.
    pub fn new(scene: Scene, opts: PlayerOpts) -> ReelResult<Self> {
        let source = FsAssetSource::new(opts.assets_root.clone());
        Self::with_source(scene, source, opts)
    }

    /// Prepare `scene` reading bitmaps from `source`.
    ///
    /// Pre-renders every shape, loads every referenced bitmap and only attaches the output
    /// surface once all loads settled. Any failure aborts before playback can start.
    #[tracing::instrument(skip_all, fields(
        width = scene.canvas().width,
        height = scene.canvas().height,
        frames = scene.frame_count(),
    ))]
    pub fn with_source(
        scene: Scene,
        source: impl AssetSource + 'static,
        opts: PlayerOpts,
    ) -> ReelResult<Self> {
        let scene = Arc::new(scene);
        let mut compositor = FrameCompositor::new(scene.clone())?;

        let mut assets = AssetStore::new(
            source,
            AssetStoreOpts {
                threads: opts.asset_threads,
            },
        );
        for name in scene.bitmap_asset_names() {
            assets.load_asset(name)?;
        }

        let settled = Rc::new(Cell::new(false));
        let flag = settled.clone();
        assets.on_all_loaded(move || flag.set(true));
        assets.load_pending()?;
        if !settled.get() {
            return Err(ReelError::asset("assets did not settle"));
        }

        compositor.prepare_bitmaps(&assets)?;
        let canvas = scene.canvas();
        let surface = CpuSurface::new(canvas.width, canvas.height)?;
        tracing::info!(
            shapes = compositor.shapes().len(),
            bitmaps = scene.bitmap_asset_names().len(),
            "player ready"
        );

        Ok(Self {
            compositor,
            assets,
            surface,
            clock: AnimationClock::new(scene.frame_rate()),
            frame: FrameIndex(0),
            drawn: false,
            looping: opts.looping,
        })
    }

    /// Scene being played.
    pub fn scene(&self) -> &Scene {
        self.compositor.scene()
    }

    /// Compositor and its shape cache.
    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    /// Loaded bitmap assets.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Most recently drawn (or sought) frame.
    pub fn current_frame(&self) -> FrameIndex {
        self.frame
    }

    /// Draw frame `index` and return its pixels.
    pub fn draw_frame(&mut self, index: FrameIndex) -> ReelResult<FrameRGBA> {
        self.compositor
            .draw(&mut self.surface, index, &self.assets)?;
        self.frame = index;
        self.drawn = true;
        Ok(self.surface.snapshot())
    }

    /// Move to the next frame (`(frame + 1) % frame_count`) and draw it.
    ///
    /// Without looping, playback is a single pass: frame 0 is drawn first when nothing was
    /// drawn yet, and `None` is returned once the last frame was drawn.
    pub fn advance(&mut self) -> ReelResult<Option<FrameRGBA>> {
        if !self.looping && !self.drawn {
            return self.draw_frame(self.frame).map(Some);
        }
        let next = self.frame.next_wrapping(self.scene().frame_count());
        if !self.looping && next.0 <= self.frame.0 {
            return Ok(None);
        }
        self.draw_frame(next).map(Some)
    }

    /// Play up to `ticks` frames at the scene's frame rate, handing each drawn frame to
    /// `on_frame`. Returns the achieved rate.
    pub fn play(
        &mut self,
        ticks: u64,
        mut on_frame: impl FnMut(FrameIndex, &FrameRGBA) -> ReelResult<()>,
    ) -> ReelResult<f64> {
        let mut clock = self.clock.clone();
        let result = clock.run(ticks, |_| match self.advance()? {
            Some(frame) => {
                on_frame(self.frame, &frame)?;
                Ok(true)
            }
            None => Ok(false),
        });
        self.clock = clock;
        result?;
        Ok(self.clock.achieved_rate())
    }

    /// Rate achieved by the last [`Player::play`].
    pub fn achieved_rate(&self) -> f64 {
        self.clock.achieved_rate()
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("frame", &self.frame)
            .field("looping", &self.looping)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/unit/player.rs"]
mod tests;
