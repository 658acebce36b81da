use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::decode::decode_image;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::surface::Raster;

/// Normalize and validate scene-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::asset("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::asset("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::asset("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::asset("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Where encoded asset bytes come from.
pub trait AssetSource: Send + Sync {
    /// Read the encoded bytes of the asset at normalized path `name`.
    fn read(&self, name: &str) -> ReelResult<Vec<u8>>;
}

/// Reads assets from files under a root directory.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Resolve asset names relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsAssetSource {
    fn read(&self, name: &str) -> ReelResult<Vec<u8>> {
        let path = self.root.join(Path::new(name));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(ReelError::from)
    }
}

/// In-memory asset bytes keyed by normalized name.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the bytes for `name`.
    pub fn insert(&mut self, name: impl AsRef<str>, bytes: Vec<u8>) -> ReelResult<()> {
        self.files.insert(normalize_rel_path(name.as_ref())?, bytes);
        Ok(())
    }
}

impl AssetSource for MemoryAssetSource {
    fn read(&self, name: &str) -> ReelResult<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| ReelError::asset(format!("no asset named '{name}'")))
    }
}

/// Options for [`AssetStore`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AssetStoreOpts {
    /// Worker threads for parallel decoding. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

enum AssetState {
    Pending,
    Loaded(Raster),
    Failed(String),
}

type LoadedCallback = Box<dyn FnOnce()>;

/// Table of bitmap assets plus "all loaded" signaling.
///
/// `load_asset` registers a name and bumps the pending count. `load_pending` decodes every
/// pending asset and, once the count reaches zero, fires queued `on_all_loaded` callbacks exactly
/// once in registration order. A failed load still settles; it surfaces as an asset error from
/// `load_pending` and from every later `get_asset` for that name.
pub struct AssetStore {
    source: Box<dyn AssetSource>,
    opts: AssetStoreOpts,
    assets: HashMap<String, AssetState>,
    order: Vec<String>,
    pending: usize,
    callbacks: Vec<LoadedCallback>,
}

impl AssetStore {
    /// Empty store reading from `source`.
    pub fn new(source: impl AssetSource + 'static, opts: AssetStoreOpts) -> Self {
        Self {
            source: Box::new(source),
            opts,
            assets: HashMap::new(),
            order: Vec::new(),
            pending: 0,
            callbacks: Vec::new(),
        }
    }

    /// Register `name` for loading. Names already known are ignored.
    pub fn load_asset(&mut self, name: &str) -> ReelResult<()> {
        let key = normalize_rel_path(name)?;
        if self.assets.contains_key(&key) {
            return Ok(());
        }
        self.assets.insert(key.clone(), AssetState::Pending);
        self.order.push(key);
        self.pending += 1;
        Ok(())
    }

    /// Number of registered assets not yet settled.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Run `callback` once every pending asset has settled; immediately when nothing is pending.
    pub fn on_all_loaded(&mut self, callback: impl FnOnce() + 'static) {
        if self.pending == 0 {
            callback();
        } else {
            self.callbacks.push(Box::new(callback));
        }
    }

    /// Decode every pending asset, then fire queued callbacks.
    #[tracing::instrument(skip(self), fields(pending = self.pending))]
    pub fn load_pending(&mut self) -> ReelResult<()> {
        let names: Vec<String> = self
            .order
            .iter()
            .filter(|n| matches!(self.assets.get(*n), Some(AssetState::Pending)))
            .cloned()
            .collect();

        if !names.is_empty() {
            let pool = build_thread_pool(self.opts.threads)?;
            let source = self.source.as_ref();
            let decoded: Vec<(String, ReelResult<Raster>)> = pool.install(|| {
                names
                    .par_iter()
                    .map(|name| {
                        let raster = source.read(name).and_then(|bytes| decode_image(&bytes));
                        (name.clone(), raster)
                    })
                    .collect()
            });

            for (name, result) in decoded {
                let state = match result {
                    Ok(raster) => {
                        tracing::debug!(
                            asset = %name,
                            width = raster.width(),
                            height = raster.height(),
                            "asset loaded"
                        );
                        AssetState::Loaded(raster)
                    }
                    Err(e) => {
                        tracing::warn!(asset = %name, error = %e, "asset failed to load");
                        AssetState::Failed(e.detail())
                    }
                };
                self.assets.insert(name, state);
                self.pending = self.pending.saturating_sub(1);
            }
        }

        if self.pending == 0 {
            for callback in std::mem::take(&mut self.callbacks) {
                callback();
            }
        }

        match self.first_failure() {
            Some((name, msg)) => Err(ReelError::asset(format!("'{name}' failed to load: {msg}"))),
            None => Ok(()),
        }
    }

    /// Decoded raster for `name`.
    pub fn get_asset(&self, name: &str) -> ReelResult<&Raster> {
        let key = normalize_rel_path(name)?;
        match self.assets.get(&key) {
            Some(AssetState::Loaded(r)) => Ok(r),
            Some(AssetState::Pending) => Err(ReelError::asset(format!(
                "'{key}' requested before loading completed"
            ))),
            Some(AssetState::Failed(msg)) => {
                Err(ReelError::asset(format!("'{key}' failed to load: {msg}")))
            }
            None => Err(ReelError::asset(format!("'{key}' was never registered"))),
        }
    }

    fn first_failure(&self) -> Option<(&str, &str)> {
        self.order.iter().find_map(|n| match self.assets.get(n) {
            Some(AssetState::Failed(msg)) => Some((n.as_str(), msg.as_str())),
            _ => None,
        })
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("assets", &self.order)
            .field("pending", &self.pending)
            .field("callbacks", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::asset("asset 'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::asset(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
