//! SchemInk Render Library
//!
//! Renderer abstraction and implementations for SchemInk.
//! The bundled backend projects a session to a standalone SVG document.

mod renderer;
mod svg;

pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError};
pub use svg::SvgRenderer;
