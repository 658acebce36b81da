pub(crate) mod document;
/// Serde boundary types of the JSON scene document.
pub mod model;
pub(crate) mod validate;

pub use document::Scene;
