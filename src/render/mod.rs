/// Color manipulation of bitmap placements.
pub mod color;
/// Per-frame compositing and mask clipping.
pub mod compositor;
/// `vello_cpu` surface.
pub mod cpu;
/// Path instruction interpreter.
pub mod path;
/// Shape bounding boxes and raster cache.
pub mod raster_cache;
#[cfg(test)]
pub(crate) mod recording;
/// Fill/stroke style resolution.
pub mod style;
/// Abstract drawing surface and pixel containers.
pub mod surface;
