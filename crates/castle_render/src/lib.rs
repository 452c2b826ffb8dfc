//! Flat-colour rectangle renderer.
//!
//! The renderer knows nothing about simulation space: callers hand it
//! screen-space, top-left anchored pixel rectangles and it draws them in
//! submission order.

pub mod gpu_context;
pub mod rect_pipeline;
pub mod vertex;

pub use gpu_context::GpuContext;
pub use rect_pipeline::{ColoredRect, RectRenderer};
pub use vertex::RectVertex;
