//! Symbol catalog: the fixed set of circuit symbols an element can reference.
//!
//! Each [`SymbolKind`] describes its nominal footprint and ports and can
//! append its body outline to a [`BezPath`]. The core only reads from the
//! catalog; elements reference symbols by type name.

use kurbo::{BezPath, Circle, Point, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Tolerance used when flattening circles into path elements.
const CURVE_TOLERANCE: f64 = 0.1;

/// Approximate advance of one label character for text elements.
pub const TEXT_CHAR_WIDTH: f64 = 8.0;
/// Line height of text elements.
pub const TEXT_HEIGHT: f64 = 20.0;
/// Footprint width of an empty text element.
pub const TEXT_MIN_WIDTH: f64 = 20.0;

/// Compass side a port faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "W")]
    West,
    /// Centered connection point (terminals).
    #[serde(rename = "C")]
    Center,
}

impl Side {
    /// Single-letter tag used in documents and listings.
    pub fn tag(self) -> &'static str {
        match self {
            Side::North => "N",
            Side::East => "E",
            Side::South => "S",
            Side::West => "W",
            Side::Center => "C",
        }
    }
}

/// A connection point in a symbol's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortDef {
    pub id: &'static str,
    pub offset: Point,
    pub side: Side,
}

impl PortDef {
    const fn new(id: &'static str, x: f64, y: f64, side: Side) -> Self {
        Self {
            id,
            offset: Point::new(x, y),
            side,
        }
    }
}

/// Static description of a symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolInfo {
    /// Display name.
    pub name: &'static str,
    /// Nominal width in scene units.
    pub width: f64,
    /// Nominal height in scene units.
    pub height: f64,
    /// Connection points.
    pub ports: &'static [PortDef],
}

impl SymbolInfo {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Find a port by id.
    pub fn port(&self, id: &str) -> Option<&'static PortDef> {
        self.ports.iter().find(|p| p.id == id)
    }
}

const TWO_TERMINAL_80: &[PortDef] = &[
    PortDef::new("A", 0.0, 20.0, Side::West),
    PortDef::new("B", 80.0, 20.0, Side::East),
];
const TWO_TERMINAL_90: &[PortDef] = &[
    PortDef::new("A", 0.0, 20.0, Side::West),
    PortDef::new("B", 90.0, 20.0, Side::East),
];
const GROUND_PORTS: &[PortDef] = &[PortDef::new("G", 25.0, 0.0, Side::North)];
const VCC_PORTS: &[PortDef] = &[PortDef::new("V", 25.0, 50.0, Side::South)];
const TERMINAL_PORTS: &[PortDef] = &[PortDef::new("T", 15.0, 15.0, Side::Center)];
const NO_PORTS: &[PortDef] = &[];

/// Every symbol the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Resistor,
    Capacitor,
    Inductor,
    Lamp,
    Switch,
    Ground,
    Vcc,
    Terminal,
    /// Borderless free text; its footprint follows the label length.
    Text,
}

impl SymbolKind {
    /// All kinds, in palette order followed by text.
    pub const ALL: [SymbolKind; 9] = [
        SymbolKind::Resistor,
        SymbolKind::Capacitor,
        SymbolKind::Inductor,
        SymbolKind::Lamp,
        SymbolKind::Switch,
        SymbolKind::Ground,
        SymbolKind::Vcc,
        SymbolKind::Terminal,
        SymbolKind::Text,
    ];

    /// Type name stored in documents.
    pub fn type_name(self) -> &'static str {
        match self {
            SymbolKind::Resistor => "resistor",
            SymbolKind::Capacitor => "capacitor",
            SymbolKind::Inductor => "inductor",
            SymbolKind::Lamp => "lamp",
            SymbolKind::Switch => "switch",
            SymbolKind::Ground => "ground",
            SymbolKind::Vcc => "vcc",
            SymbolKind::Terminal => "terminal",
            SymbolKind::Text => "text",
        }
    }

    /// Look up a kind by its document type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }

    /// Nominal geometry and ports.
    ///
    /// For [`SymbolKind::Text`] the nominal size is the empty-label size;
    /// use [`SymbolKind::footprint`] for the label-dependent size.
    pub fn describe(self) -> SymbolInfo {
        let (name, width, height, ports) = match self {
            SymbolKind::Resistor => ("Resistor", 80.0, 40.0, TWO_TERMINAL_80),
            SymbolKind::Capacitor => ("Capacitor", 80.0, 40.0, TWO_TERMINAL_80),
            SymbolKind::Inductor => ("Inductor", 80.0, 40.0, TWO_TERMINAL_80),
            SymbolKind::Lamp => ("Lamp", 80.0, 40.0, TWO_TERMINAL_80),
            SymbolKind::Switch => ("Switch", 90.0, 40.0, TWO_TERMINAL_90),
            SymbolKind::Ground => ("Ground", 50.0, 50.0, GROUND_PORTS),
            SymbolKind::Vcc => ("VCC", 50.0, 50.0, VCC_PORTS),
            SymbolKind::Terminal => ("Terminal", 30.0, 30.0, TERMINAL_PORTS),
            SymbolKind::Text => ("Text", TEXT_MIN_WIDTH, TEXT_HEIGHT, NO_PORTS),
        };
        SymbolInfo {
            name,
            width,
            height,
            ports,
        }
    }

    /// Footprint of an element of this kind carrying `label`.
    pub fn footprint(self, label: &str) -> Size {
        match self {
            SymbolKind::Text => {
                let chars = label.chars().count() as f64;
                Size::new((chars * TEXT_CHAR_WIDTH).max(TEXT_MIN_WIDTH), TEXT_HEIGHT)
            }
            _ => self.describe().size(),
        }
    }

    /// Whether the body is drawn without an outline (label only).
    pub fn is_borderless(self) -> bool {
        self == SymbolKind::Text
    }

    /// Append the symbol's body outline, sized `width` × `height`, to `canvas`.
    pub fn draw(self, canvas: &mut BezPath, width: f64, height: f64) {
        let mid_y = height / 2.0;
        match self {
            SymbolKind::Resistor => {
                let (left, right) = (10.0, width - 10.0);
                segment(canvas, (0.0, mid_y), (left, mid_y));
                segment(canvas, (right, mid_y), (width, mid_y));
                let step = (right - left) / 6.0;
                let mut x = left;
                let mut swing = -12.0;
                canvas.move_to((x, mid_y));
                for _ in 0..6 {
                    x += step;
                    canvas.line_to((x, mid_y + swing));
                    swing = -swing;
                }
            }
            SymbolKind::Capacitor => {
                let left_plate = width / 2.0 - 6.0;
                let right_plate = width / 2.0 + 6.0;
                segment(canvas, (0.0, mid_y), (left_plate - 6.0, mid_y));
                segment(canvas, (left_plate, 8.0), (left_plate, height - 8.0));
                segment(canvas, (right_plate, 8.0), (right_plate, height - 8.0));
                segment(canvas, (right_plate + 6.0, mid_y), (width, mid_y));
            }
            SymbolKind::Inductor => {
                let (left, right) = (10.0, width - 10.0);
                segment(canvas, (0.0, mid_y), (left, mid_y));
                segment(canvas, (right, mid_y), (width, mid_y));
                let r = (right - left) / 12.0;
                let mut x = left;
                for _ in 0..4 {
                    canvas.move_to((x, mid_y));
                    canvas.quad_to((x + r, mid_y - r), (x + 1.5 * r, mid_y));
                    canvas.quad_to((x + 2.5 * r, mid_y + r), (x + 3.0 * r, mid_y));
                    x += 3.0 * r;
                }
            }
            SymbolKind::Lamp => {
                let (cx, r) = (width / 2.0, 12.0);
                segment(canvas, (0.0, mid_y), (cx - r - 8.0, mid_y));
                segment(canvas, (cx + r + 8.0, mid_y), (width, mid_y));
                circle(canvas, (cx, mid_y), r);
                let d = r / 1.5;
                segment(canvas, (cx - d, mid_y - d), (cx + d, mid_y + d));
                segment(canvas, (cx - d, mid_y + d), (cx + d, mid_y - d));
            }
            SymbolKind::Switch => {
                segment(canvas, (0.0, mid_y), (20.0, mid_y));
                circle(canvas, (28.0, mid_y), 3.0);
                circle(canvas, (width - 28.0, mid_y), 3.0);
                segment(canvas, (30.0, mid_y - 2.0), (width - 30.0, mid_y - 12.0));
                segment(canvas, (width - 20.0, mid_y), (width, mid_y));
            }
            SymbolKind::Ground => {
                let (cx, top) = (width / 2.0, 12.0);
                segment(canvas, (cx, 0.0), (cx, top));
                segment(canvas, (cx - 12.0, top + 6.0), (cx + 12.0, top + 6.0));
                segment(canvas, (cx - 8.0, top + 12.0), (cx + 8.0, top + 12.0));
                segment(canvas, (cx - 4.0, top + 18.0), (cx + 4.0, top + 18.0));
            }
            SymbolKind::Vcc => {
                let (cx, base) = (width / 2.0, height - 12.0);
                segment(canvas, (cx, base), (cx, height));
                canvas.move_to((cx, base - 26.0));
                canvas.line_to((cx - 12.0, base - 6.0));
                canvas.line_to((cx + 12.0, base - 6.0));
                canvas.close_path();
                segment(canvas, (cx, base - 20.0), (cx, base - 12.0));
                segment(canvas, (cx - 4.0, base - 16.0), (cx + 4.0, base - 16.0));
            }
            SymbolKind::Terminal => circle(canvas, (width / 2.0, height / 2.0), 4.0),
            SymbolKind::Text => {}
        }
    }

    /// Convenience wrapper producing a fresh path at the nominal size.
    pub fn body_path(self) -> BezPath {
        let info = self.describe();
        let mut path = BezPath::new();
        self.draw(&mut path, info.width, info.height);
        path
    }
}

fn segment(canvas: &mut BezPath, from: (f64, f64), to: (f64, f64)) {
    canvas.move_to(from);
    canvas.line_to(to);
}

fn circle(canvas: &mut BezPath, center: (f64, f64), radius: f64) {
    canvas.extend(Circle::new(center, radius).path_elements(CURVE_TOLERANCE));
}

/// Read-only lookup from document type names to symbols.
#[derive(Debug, Clone)]
pub struct Catalog {
    symbols: Vec<SymbolKind>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in analog symbol set.
    pub fn builtin() -> Self {
        Self {
            symbols: SymbolKind::ALL.to_vec(),
        }
    }

    /// Resolve a type name.
    pub fn lookup(&self, type_name: &str) -> Option<SymbolKind> {
        self.symbols
            .iter()
            .copied()
            .find(|k| k.type_name() == type_name)
    }

    /// Footprint of an element with the given type and label, `None` for
    /// unknown types.
    pub fn footprint(&self, type_name: &str, label: &str) -> Option<Size> {
        self.lookup(type_name).map(|k| k.footprint(label))
    }

    /// Symbols offered for placement, in palette order. Text is placed with
    /// the text tool and is not part of the palette.
    pub fn palette(&self) -> impl Iterator<Item = SymbolKind> + '_ {
        self.symbols.iter().copied().filter(|k| *k != SymbolKind::Text)
    }

    /// All known symbols.
    pub fn symbols(&self) -> &[SymbolKind] {
        &self.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_roundtrip() {
        for kind in SymbolKind::ALL {
            assert_eq!(SymbolKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(SymbolKind::from_type_name("transistor"), None);
    }

    #[test]
    fn test_two_terminal_ports_on_edges() {
        let info = SymbolKind::Switch.describe();
        assert_eq!(info.width, 90.0);
        let b = info.port("B").unwrap();
        assert_eq!(b.offset, Point::new(90.0, 20.0));
        assert_eq!(b.side, Side::East);
        assert!(info.port("C").is_none());
    }

    #[test]
    fn test_text_footprint_grows_with_label() {
        assert_eq!(SymbolKind::Text.footprint(""), Size::new(TEXT_MIN_WIDTH, TEXT_HEIGHT));
        assert_eq!(SymbolKind::Text.footprint("R1 pull-up"), Size::new(80.0, TEXT_HEIGHT));
        assert_eq!(SymbolKind::Resistor.footprint("anything long"), Size::new(80.0, 40.0));
    }

    #[test]
    fn test_draw_stays_inside_bounds() {
        for kind in SymbolKind::ALL {
            let path = kind.body_path();
            if kind == SymbolKind::Text {
                assert!(path.elements().is_empty());
                continue;
            }
            let info = kind.describe();
            let bbox = path.bounding_box();
            assert!(bbox.x0 >= -0.5 && bbox.x1 <= info.width + 0.5, "{kind:?}: {bbox:?}");
            assert!(bbox.y0 >= -0.5 && bbox.y1 <= info.height + 0.5, "{kind:?}: {bbox:?}");
        }
    }

    #[test]
    fn test_palette_excludes_text() {
        let catalog = Catalog::builtin();
        let palette: Vec<_> = catalog.palette().collect();
        assert_eq!(palette.len(), 8);
        assert_eq!(palette[0], SymbolKind::Resistor);
        assert!(!palette.contains(&SymbolKind::Text));
        assert!(catalog.footprint("nonexistent", "").is_none());
    }
}
