//! SVG backend.
//!
//! Draw order: background, grid, wires, elements (body, label, connectors),
//! then the controller overlay. Everything below the background sits in one
//! group carrying the view transform, so coordinates inside are scene units.

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer};
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use schemink_core::catalog::Catalog;
use schemink_core::scene::{Element, Wire};
use std::fmt::Write;

/// Connector dot radius in scene units.
const PORT_RADIUS: f64 = 4.0;
/// Gap between the bottom of a symbol and its label baseline.
const LABEL_OFFSET: f64 = 12.0;
const LABEL_FONT_SIZE: f64 = 11.0;
const TEXT_FONT_SIZE: f64 = 14.0;
/// Grids denser than this many cells are skipped.
const MAX_GRID_CELLS: f64 = 40_000.0;

/// Renders a session into a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    stroke_width: f64,
    show_ports: bool,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self {
            stroke_width: 2.0,
            show_ports: true,
        }
    }

    /// Toggle connector dots.
    pub fn with_ports(mut self, show: bool) -> Self {
        self.show_ports = show;
        self
    }

    fn render_grid(
        &self,
        out: &mut String,
        ctx: &RenderContext,
        transform: Affine,
    ) -> RenderResult<()> {
        let grid_size = ctx.session.config().grid_size;
        if ctx.grid_style == GridStyle::None || grid_size <= 0.0 {
            return Ok(());
        }
        let (start_x, start_y, end_x, end_y) = grid_bounds(ctx, transform, grid_size);
        let cells = ((end_x - start_x) / grid_size + 1.0) * ((end_y - start_y) / grid_size + 1.0);
        if cells > MAX_GRID_CELLS {
            log::debug!("grid skipped: {cells} cells at zoom {}", ctx.session.view().zoom);
            return Ok(());
        }

        let mut d = String::new();
        match ctx.grid_style {
            GridStyle::None => {}
            GridStyle::Lines => {
                let mut x = start_x;
                while x <= end_x {
                    write!(d, "M{x} {start_y}V{end_y}")?;
                    x += grid_size;
                }
                let mut y = start_y;
                while y <= end_y {
                    write!(d, "M{start_x} {y}H{end_x}")?;
                    y += grid_size;
                }
                writeln!(
                    out,
                    concat!(
                        r#"<path class="grid" d="{d}" fill="none" stroke="{stroke}""#,
                        r#" stroke-opacity="0.4" stroke-width="0.5"/>"#,
                    ),
                    d = d,
                    stroke = hex(Color::from_rgba8(200, 200, 200, 255)),
                )?;
            }
            GridStyle::Dots => {
                let dot = 0.75;
                let mut x = start_x;
                while x <= end_x {
                    let mut y = start_y;
                    while y <= end_y {
                        let side = dot * 2.0;
                        write!(d, "M{} {}h{side}v{side}h-{side}z", x - dot, y - dot)?;
                        y += grid_size;
                    }
                    x += grid_size;
                }
                writeln!(
                    out,
                    r#"<path class="grid" d="{d}" fill="{}" fill-opacity="0.6"/>"#,
                    hex(Color::from_rgba8(160, 160, 160, 255))
                )?;
            }
        }
        Ok(())
    }

    fn render_wire(&self, out: &mut String, ctx: &RenderContext, wire: &Wire) -> RenderResult<()> {
        let scene = ctx.session.scene();
        let Some(path) = scene.wire_path(ctx.session.catalog(), wire) else {
            log::debug!("wire {} has an unresolved endpoint, not drawn", wire.id);
            return Ok(());
        };
        let selected = ctx.session.selection().wire() == Some(wire.id.as_str());
        let (class, color, width) = if selected {
            ("wire selected", ctx.selection_color, self.stroke_width + 1.0)
        } else {
            ("wire", ctx.wire_color, self.stroke_width)
        };
        writeln!(
            out,
            concat!(
                r#"<path class="{class}" data-id="{id}" d="{d}""#,
                r#" fill="none" stroke="{stroke}"{opacity}"#,
                r#" stroke-width="{width}" stroke-linejoin="round"/>"#,
            ),
            class = class,
            id = attr(&wire.id),
            d = polyline(&path)?,
            stroke = hex(color),
            opacity = opacity("stroke-opacity", color),
            width = width,
        )?;
        Ok(())
    }

    fn render_element(
        &self,
        out: &mut String,
        ctx: &RenderContext,
        element: &Element,
        catalog: &Catalog,
    ) -> RenderResult<()> {
        let Some(kind) = element.symbol(catalog) else {
            log::debug!("element {} has unknown type {:?}, not drawn", element.id, element.kind);
            return Ok(());
        };
        let size = kind.footprint(&element.label);
        let (width, height) = (size.width, size.height);
        let selected = ctx.session.selection().contains_element(&element.id);
        let color = if selected { ctx.selection_color } else { ctx.element_color };

        writeln!(
            out,
            concat!(
                r#"<g class="{}" data-id="{}" data-type="{}""#,
                r#" transform="translate({} {}) rotate({} {} {})">"#,
            ),
            if selected { "element selected" } else { "element" },
            attr(&element.id),
            attr(&element.kind),
            element.x,
            element.y,
            element.rot,
            width / 2.0,
            height / 2.0,
        )?;

        if selected {
            writeln!(
                out,
                concat!(
                    r#"<rect class="highlight" x="-3" y="-3" width="{}" height="{}""#,
                    r#" fill="none" stroke="{}" stroke-dasharray="4 3"/>"#,
                ),
                width + 6.0,
                height + 6.0,
                hex(ctx.selection_color),
            )?;
        }

        if kind.is_borderless() {
            writeln!(
                out,
                concat!(
                    r#"<text class="body" x="0" y="{}" font-family="sans-serif""#,
                    r#" font-size="{}" fill="{}">{}</text>"#,
                ),
                height * 0.75,
                TEXT_FONT_SIZE,
                hex(color),
                html_escape::encode_text(&element.label),
            )?;
        } else {
            let mut body = kurbo::BezPath::new();
            kind.draw(&mut body, width, height);
            writeln!(
                out,
                concat!(
                    r#"<path class="body" d="{}" fill="none" stroke="{}" stroke-width="{}""#,
                    r#" stroke-linecap="round" stroke-linejoin="round"/>"#,
                ),
                body.to_svg(),
                hex(color),
                self.stroke_width,
            )?;
            if !element.label.is_empty() {
                writeln!(
                    out,
                    concat!(
                        r#"<text class="label" x="{}" y="{}" text-anchor="middle""#,
                        r#" font-family="sans-serif" font-size="{}" fill="{}">{}</text>"#,
                    ),
                    width / 2.0,
                    height + LABEL_OFFSET,
                    LABEL_FONT_SIZE,
                    hex(ctx.element_color),
                    html_escape::encode_text(&element.label),
                )?;
            }
        }

        if self.show_ports {
            for port in kind.describe().ports {
                writeln!(
                    out,
                    r#"<circle class="port" data-port="{}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                    attr(port.id),
                    port.offset.x,
                    port.offset.y,
                    PORT_RADIUS,
                    hex(ctx.port_color),
                )?;
            }
        }

        writeln!(out, "</g>")?;
        Ok(())
    }

    fn render_overlay(&self, out: &mut String, ctx: &RenderContext) -> RenderResult<()> {
        if let Some(rect) = ctx.overlay.marquee {
            writeln!(
                out,
                concat!(
                    r#"<rect class="marquee" x="{}" y="{}" width="{}" height="{}""#,
                    r#" fill="{}" fill-opacity="0.1" stroke="{}" stroke-dasharray="4 4"/>"#,
                ),
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height(),
                hex(ctx.selection_color),
                hex(ctx.selection_color),
            )?;
        }
        if let Some(path) = ctx.overlay.wire_preview {
            writeln!(
                out,
                concat!(
                    r#"<path class="wire-preview" d="{}" fill="none" stroke="{}""#,
                    r#" stroke-width="{}" stroke-dasharray="6 4"/>"#,
                ),
                polyline(&path)?,
                hex(ctx.selection_color),
                self.stroke_width,
            )?;
        }
        Ok(())
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&mut self, ctx: &RenderContext) -> RenderResult<String> {
        let session = ctx.session;
        let scene = session.scene();
        let catalog = session.catalog();
        let transform = session.view().transform();
        let (width, height) = (ctx.viewport_size.width, ctx.viewport_size.height);

        let mut out = String::new();
        writeln!(
            out,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}""#,
                r#" viewBox="0 0 {width} {height}">"#,
            ),
            width = width,
            height = height,
        )?;
        let background = self.background_color(ctx);
        writeln!(
            out,
            r#"<rect class="background" width="100%" height="100%" fill="{}"{}/>"#,
            hex(background),
            opacity("fill-opacity", background),
        )?;

        let [a, b, c, d, e, f] = transform.as_coeffs();
        writeln!(out, r#"<g class="viewport" transform="matrix({a} {b} {c} {d} {e} {f})">"#)?;
        self.render_grid(&mut out, ctx, transform)?;
        for wire in &scene.wires {
            self.render_wire(&mut out, ctx, wire)?;
        }
        for element in &scene.elements {
            self.render_element(&mut out, ctx, element, catalog)?;
        }
        self.render_overlay(&mut out, ctx)?;
        writeln!(out, "</g>")?;
        writeln!(out, "</svg>")?;

        log::debug!(
            "rendered {} elements, {} wires at revision {}",
            scene.elements.len(),
            scene.wires.len(),
            session.revision()
        );
        Ok(out)
    }
}

/// Scene-space grid extent covering the viewport, aligned to the grid.
fn grid_bounds(ctx: &RenderContext, transform: Affine, grid_size: f64) -> (f64, f64, f64, f64) {
    let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
    let inv = transform.inverse();
    let world_tl = inv * Point::new(viewport.x0, viewport.y0);
    let world_br = inv * Point::new(viewport.x1, viewport.y1);

    let start_x = (world_tl.x / grid_size).floor() * grid_size;
    let start_y = (world_tl.y / grid_size).floor() * grid_size;
    let end_x = (world_br.x / grid_size).ceil() * grid_size;
    let end_y = (world_br.y / grid_size).ceil() * grid_size;

    (start_x, start_y, end_x, end_y)
}

fn polyline(points: &[Point]) -> RenderResult<String> {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let op = if i == 0 { 'M' } else { 'L' };
        write!(d, "{op}{} {}", p.x, p.y)?;
    }
    Ok(d)
}

fn hex(color: Color) -> String {
    let c = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Opacity attribute for translucent colors, empty when opaque.
fn opacity(name: &str, color: Color) -> String {
    let alpha = color.to_rgba8().a;
    if alpha == u8::MAX {
        String::new()
    } else {
        format!(r#" {name}="{:.3}""#, f64::from(alpha) / 255.0)
    }
}

fn attr(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
