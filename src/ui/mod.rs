//! Terminal output

pub mod render;
pub mod theme;

pub use render::{render_view, RenderOptions};
