//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use schemink_core::controller::Overlay;
use schemink_core::session::Session;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    Lines,
    /// Only grid dots (.).
    #[default]
    Dots,
}

impl GridStyle {
    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }

    /// Parse a display name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        [GridStyle::None, GridStyle::Lines, GridStyle::Dots]
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(name))
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editing session to render.
    pub session: &'a Session,
    /// Transient gesture feedback from the controller.
    pub overlay: Overlay,
    /// Viewport size in pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Wire stroke color.
    pub wire_color: Color,
    /// Symbol body stroke color.
    pub element_color: Color,
    /// Connector dot fill color.
    pub port_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(session: &'a Session, viewport_size: Size) -> Self {
        Self {
            session,
            overlay: Overlay::default(),
            viewport_size,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            grid_style: GridStyle::Dots,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            wire_color: Color::from_rgba8(30, 41, 59, 255),
            element_color: Color::from_rgba8(17, 24, 39, 255),
            port_color: Color::from_rgba8(220, 38, 38, 255),
        }
    }

    /// Set the controller overlay (marquee, wire preview).
    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = overlay;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Set the wire stroke color.
    pub fn with_wire_color(mut self, color: Color) -> Self {
        self.wire_color = color;
        self
    }
}

/// Trait for rendering backends.
///
/// A backend projects the session in a [`RenderContext`] into its own output
/// (an SVG string, a GPU command buffer, ...). Rendering never mutates the
/// session; hosts call it again whenever the session revision moves.
pub trait Renderer {
    type Output;

    /// Render one frame.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<Self::Output>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
