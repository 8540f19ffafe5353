//! Template rendering and style compilation

pub mod stylesheet;
pub mod templates;

pub use stylesheet::compile_stylesheet;
pub use templates::{GlyphContext, RenderContext, Templates};
