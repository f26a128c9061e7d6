//! Document-level operations behind the CLI subcommands.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use kurbo::{Rect, Size};
use schemink_core::catalog::Catalog;
use schemink_core::config::EditorConfig;
use schemink_core::scene::{Scene, WireId};
use schemink_core::session::Session;
use schemink_render::{GridStyle, RenderContext, Renderer, SvgRenderer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Read and parse a document file.
pub fn read_scene(path: &Path) -> AppResult<Scene> {
    let json = std::fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let scene = Scene::from_json(&json)?;
    log::info!(
        "Loaded {} ({} elements, {} wires)",
        path.display(),
        scene.elements.len(),
        scene.wires.len()
    );
    Ok(scene)
}

/// Write to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> AppResult<()> {
    match path {
        Some(path) => std::fs::write(path, contents).map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}

/// How a document is projected to SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub viewport: Size,
    /// Zoom to fit the content before rendering.
    pub fit: bool,
    pub grid: GridStyle,
    pub show_ports: bool,
}

impl RenderOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            viewport: config.viewport(),
            fit: true,
            grid: config.grid(),
            show_ports: config.show_ports,
        }
    }
}

/// Render a scene to a standalone SVG document.
pub fn render_svg(
    scene: Scene,
    editor: &EditorConfig,
    options: &RenderOptions,
) -> AppResult<String> {
    let mut session = Session::with_scene(editor.clone(), scene);
    session.set_viewport(options.viewport);
    if options.fit && !session.zoom_fit() {
        log::debug!("Nothing to fit, rendering at default view");
    }
    let ctx = RenderContext::new(&session, options.viewport).with_grid(options.grid);
    let svg = SvgRenderer::new().with_ports(options.show_ports).render(&ctx)?;
    Ok(svg)
}

/// Summary of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub elements: usize,
    pub wires: usize,
    /// Element count per type name.
    pub by_type: BTreeMap<String, usize>,
    /// Type names the catalog does not know.
    pub unknown_types: Vec<String>,
    pub bounds: Option<Rect>,
    /// Wires whose endpoints do not resolve to a known port.
    pub dangling: Vec<WireId>,
}

impl DocumentInfo {
    pub fn from_scene(scene: &Scene, catalog: &Catalog) -> Self {
        let mut by_type = BTreeMap::new();
        for element in &scene.elements {
            *by_type.entry(element.kind.clone()).or_insert(0) += 1;
        }
        let unknown_types = by_type
            .keys()
            .filter(|kind| catalog.lookup(kind).is_none())
            .cloned()
            .collect();
        Self {
            elements: scene.elements.len(),
            wires: scene.wires.len(),
            by_type,
            unknown_types,
            bounds: scene.bounds(catalog),
            dangling: scene.dangling_wires(catalog).into_iter().map(|w| w.id.clone()).collect(),
        }
    }
}

impl fmt::Display for DocumentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Elements: {}", self.elements)?;
        for (kind, count) in &self.by_type {
            writeln!(f, "  {kind:12} {count}")?;
        }
        writeln!(f, "Wires:    {}", self.wires)?;
        match self.bounds {
            Some(b) => writeln!(f, "Bounds:   ({}, {}) to ({}, {})", b.x0, b.y0, b.x1, b.y1)?,
            None => writeln!(f, "Bounds:   empty")?,
        }
        if !self.unknown_types.is_empty() {
            writeln!(f, "Unknown types: {}", self.unknown_types.join(", "))?;
        }
        if !self.dangling.is_empty() {
            writeln!(f, "Dangling wires: {}", self.dangling.join(", "))?;
        }
        Ok(())
    }
}

/// Symbol table: type name, display name, footprint and ports.
pub fn catalog_table(catalog: &Catalog) -> String {
    let mut out = format!("  {:12} {:12} {:>9}  {}\n", "TYPE", "NAME", "SIZE", "PORTS");
    for kind in catalog.symbols() {
        let info = kind.describe();
        let ports = info
            .ports
            .iter()
            .map(|p| format!("{}({},{} {})", p.id, p.offset.x, p.offset.y, p.side.tag()))
            .collect::<Vec<_>>()
            .join(" ");
        let size = format!("{}x{}", info.width, info.height);
        let name = kind.type_name();
        out.push_str(&format!("  {name:12} {:12} {size:>9}  {ports}\n", info.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "elements": [
            {"id": "r1", "type": "resistor", "x": 0, "y": 0, "rot": 0, "label": "R1"},
            {"id": "c1", "type": "capacitor", "x": 100, "y": 0, "rot": 0, "label": "C1"},
            {"id": "x1", "type": "mystery", "x": 0, "y": 100, "rot": 0, "label": ""}
        ],
        "wires": [
            {"id": "w1", "from": {"el": "r1", "port": "B"}, "to": {"el": "c1", "port": "A"}},
            {"id": "w2", "from": {"el": "r1", "port": "A"}, "to": {"el": "gone", "port": "A"}}
        ]
    }"#;

    #[test]
    fn test_document_info() {
        let scene = Scene::from_json(DOC).unwrap();
        let info = DocumentInfo::from_scene(&scene, &Catalog::builtin());
        assert_eq!(info.elements, 3);
        assert_eq!(info.wires, 2);
        assert_eq!(info.by_type.get("resistor"), Some(&1));
        assert_eq!(info.unknown_types, vec!["mystery".to_string()]);
        assert_eq!(info.dangling, vec!["w2".to_string()]);
        assert_eq!(info.bounds, Some(Rect::new(0.0, 0.0, 180.0, 40.0)));

        let text = info.to_string();
        assert!(text.contains("Dangling wires: w2"));
        assert!(text.contains("Unknown types: mystery"));
    }

    #[test]
    fn test_render_fits_content() {
        let scene = Scene::from_json(DOC).unwrap();
        let options = RenderOptions {
            viewport: Size::new(400.0, 300.0),
            fit: true,
            grid: GridStyle::None,
            show_ports: true,
        };
        let svg = render_svg(scene, &EditorConfig::default(), &options).unwrap();
        assert!(svg.contains(r#"width="400" height="300""#));
        assert!(!svg.contains(r#"transform="matrix(1 0 0 1 0 0)""#));
        assert!(svg.contains("R1"));
    }

    #[test]
    fn test_render_without_fit() {
        let options = RenderOptions {
            viewport: Size::new(200.0, 100.0),
            fit: false,
            grid: GridStyle::None,
            show_ports: false,
        };
        let svg = render_svg(Scene::new(), &EditorConfig::default(), &options).unwrap();
        assert!(svg.contains(r#"transform="matrix(1 0 0 1 0 0)""#));
    }

    #[test]
    fn test_read_scene_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        assert!(matches!(read_scene(&path), Err(AppError::Read { .. })));
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(read_scene(&path), Err(AppError::Document(_))));
        std::fs::write(&path, DOC).unwrap();
        assert_eq!(read_scene(&path).unwrap().elements.len(), 3);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        write_output(Some(&path), "<svg/>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
    }

    #[test]
    fn test_catalog_table() {
        let table = catalog_table(&Catalog::builtin());
        let resistor = table.lines().find(|l| l.trim_start().starts_with("resistor")).unwrap();
        assert!(resistor.contains("80x40"));
        assert!(resistor.contains("A(0,20 W)"));
        assert!(resistor.contains("B(80,20 E)"));
    }
}
