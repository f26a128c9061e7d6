//! Scene document: placed elements and the wires between their ports.
//!
//! [`Scene`] is a plain value. It is what gets serialized, what history
//! snapshots hold, and what the renderer reads. The structural operations
//! here are untracked; undoable commands live on
//! [`Session`](crate::session::Session).

use crate::catalog::{Catalog, SymbolKind};
use crate::error::{DocumentError, SceneError, SceneResult};
use crate::geometry;
use kurbo::{Point, Rect, Size};
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Identifier of a placed element.
pub type ElementId = String;
/// Identifier of a wire.
pub type WireId = String;

/// Generate a fresh element id.
pub fn new_element_id() -> ElementId {
    format!("el-{}", Uuid::new_v4().simple())
}

/// Generate a fresh wire id.
pub fn new_wire_id() -> WireId {
    format!("w-{}", Uuid::new_v4().simple())
}

/// A placed symbol instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Catalog type name. Unknown names are kept but never rendered.
    #[serde(rename = "type")]
    pub kind: String,
    /// Top-left x in scene units.
    pub x: f64,
    /// Top-left y in scene units.
    pub y: f64,
    /// Rotation in degrees about the element center, in `[0, 360)`.
    #[serde(default)]
    pub rot: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
}

impl Element {
    /// Top-left position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    /// Resolve this element's symbol.
    pub fn symbol(&self, catalog: &Catalog) -> Option<SymbolKind> {
        catalog.lookup(&self.kind)
    }

    /// Nominal unrotated size, `None` for unknown types.
    pub fn footprint(&self, catalog: &Catalog) -> Option<Size> {
        catalog.footprint(&self.kind, &self.label)
    }

    /// Scene-space corners of the rotated footprint.
    pub fn corners(&self, catalog: &Catalog) -> Option<[Point; 4]> {
        let size = self.footprint(catalog)?;
        Some(geometry::element_corners(self.position(), self.rot, size))
    }

    /// Axis-aligned bounds of the rotated footprint.
    pub fn bounds(&self, catalog: &Catalog) -> Option<Rect> {
        let size = self.footprint(catalog)?;
        Some(geometry::element_bounds(self.position(), self.rot, size))
    }

    /// Scene-space position of one of this element's ports.
    pub fn port_position(&self, catalog: &Catalog, port: &str) -> Option<Point> {
        let symbol = self.symbol(catalog)?;
        let def = symbol.describe().port(port)?;
        let size = symbol.footprint(&self.label);
        Some(geometry::local_to_global(self.position(), self.rot, size, def.offset))
    }

    /// Whether `point` falls on the element body (rotation-aware).
    pub fn contains_point(&self, catalog: &Catalog, point: Point) -> bool {
        let Some(size) = self.footprint(catalog) else {
            return false;
        };
        let local = geometry::global_to_local(self.position(), self.rot, size, point);
        geometry::rect_contains_inclusive(Rect::from_origin_size(Point::ZERO, size), local)
    }
}

/// One end of a wire: a port on an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(rename = "el")]
    pub element: ElementId,
    pub port: String,
}

impl Endpoint {
    pub fn new(element: impl Into<ElementId>, port: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            port: port.into(),
        }
    }
}

/// A connection between two ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: WireId,
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Wire {
    /// Whether either end sits on `element`.
    pub fn touches(&self, element: &str) -> bool {
        self.from.element == element || self.to.element == element
    }
}

/// The editable document: elements in z-order (back to front) and wires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, deserialize_with = "lenient_list")]
    pub elements: Vec<Element>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub wires: Vec<Wire>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the scene has no elements and no wires.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.wires.is_empty()
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains_element(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    pub fn wire(&self, id: &str) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    pub fn contains_wire(&self, id: &str) -> bool {
        self.wire(id).is_some()
    }

    /// Check that an endpoint names an existing element and one of its ports.
    pub fn validate_endpoint(&self, catalog: &Catalog, endpoint: &Endpoint) -> SceneResult<()> {
        let element = self
            .element(&endpoint.element)
            .ok_or_else(|| SceneError::UnknownElement(endpoint.element.clone()))?;
        let has_port = element
            .symbol(catalog)
            .is_some_and(|s| s.describe().port(&endpoint.port).is_some());
        if has_port {
            Ok(())
        } else {
            Err(SceneError::UnknownPort {
                element: endpoint.element.clone(),
                port: endpoint.port.clone(),
            })
        }
    }

    /// Scene position of a wire endpoint.
    pub fn port_position(&self, catalog: &Catalog, endpoint: &Endpoint) -> Option<Point> {
        self.element(&endpoint.element)?
            .port_position(catalog, &endpoint.port)
    }

    /// Routed polyline of a wire, `None` if an endpoint cannot be resolved.
    pub fn wire_path(&self, catalog: &Catalog, wire: &Wire) -> Option<[Point; 4]> {
        let from = self.port_position(catalog, &wire.from)?;
        let to = self.port_position(catalog, &wire.to)?;
        Some(geometry::orthogonal_path(from, to))
    }

    /// Remove the given elements and every wire touching any of them.
    ///
    /// Returns the ids of the removed wires.
    pub fn remove_elements_cascade(&mut self, ids: &HashSet<&str>) -> Vec<WireId> {
        let mut removed_wires = Vec::new();
        self.wires.retain(|w| {
            let hit = ids.contains(w.from.element.as_str()) || ids.contains(w.to.element.as_str());
            if hit {
                removed_wires.push(w.id.clone());
            }
            !hit
        });
        self.elements.retain(|e| !ids.contains(e.id.as_str()));
        removed_wires
    }

    /// Remove a wire by id.
    pub fn remove_wire(&mut self, id: &str) -> Option<Wire> {
        let idx = self.wires.iter().position(|w| w.id == id)?;
        Some(self.wires.remove(idx))
    }

    /// Union bounds of every renderable element.
    pub fn bounds(&self, catalog: &Catalog) -> Option<Rect> {
        geometry::union_bounds(self.elements.iter().filter_map(|e| e.bounds(catalog)))
    }

    /// Topmost element whose body contains `point`.
    pub fn element_at(&self, catalog: &Catalog, point: Point) -> Option<&Element> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(catalog, point))
    }

    /// Topmost connector within `radius` of `point`.
    pub fn port_at(&self, catalog: &Catalog, point: Point, radius: f64) -> Option<Endpoint> {
        self.elements.iter().rev().find_map(|element| {
            let symbol = element.symbol(catalog)?;
            symbol.describe().ports.iter().find_map(|def| {
                let pos = element.port_position(catalog, def.id)?;
                (pos.distance(point) <= radius).then(|| Endpoint::new(element.id.clone(), def.id))
            })
        })
    }

    /// Topmost wire passing within `tolerance` of `point`.
    pub fn wire_at(&self, catalog: &Catalog, point: Point, tolerance: f64) -> Option<&Wire> {
        self.wires.iter().rev().find(|wire| {
            self.wire_path(catalog, wire)
                .is_some_and(|path| geometry::distance_to_polyline(&path, point) <= tolerance)
        })
    }

    /// Elements whose four rotated corners all lie inside `rect`.
    pub fn elements_in_rect(&self, catalog: &Catalog, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| {
                e.corners(catalog).is_some_and(|corners| {
                    corners
                        .iter()
                        .all(|c| geometry::rect_contains_inclusive(rect, *c))
                })
            })
            .map(|e| e.id.clone())
            .collect()
    }

    /// Wires with an endpoint that does not resolve to an element port.
    ///
    /// Commands never produce these; they can only arrive through imported
    /// documents.
    pub fn dangling_wires(&self, catalog: &Catalog) -> Vec<&Wire> {
        self.wires
            .iter()
            .filter(|w| {
                self.validate_endpoint(catalog, &w.from).is_err()
                    || self.validate_endpoint(catalog, &w.to).is_err()
            })
            .collect()
    }

    /// Serialize the scene to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a scene from JSON.
    ///
    /// `elements` / `wires` that are missing or not arrays become empty
    /// lists; anything else malformed is an error.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Accept an array of `T`, substituting an empty list for any other value.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match serde_json::Value::deserialize(deserializer)? {
        value @ serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(D::Error::custom)
        }
        _ => Ok(Vec::new()),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: &str, kind: &str, x: f64, y: f64, rot: f64) -> Element {
        Element {
            id: id.to_string(),
            kind: kind.to_string(),
            x,
            y,
            rot,
            label: String::new(),
        }
    }

    fn wire(id: &str, a: (&str, &str), b: (&str, &str)) -> Wire {
        Wire {
            id: id.to_string(),
            from: Endpoint::new(a.0, a.1),
            to: Endpoint::new(b.0, b.1),
        }
    }

    fn chain() -> Scene {
        Scene {
            elements: vec![
                element("A", "resistor", 0.0, 0.0, 0.0),
                element("B", "resistor", 100.0, 0.0, 0.0),
                element("C", "resistor", 200.0, 0.0, 0.0),
            ],
            wires: vec![
                wire("w1", ("A", "B"), ("B", "A")),
                wire("w2", ("B", "B"), ("C", "A")),
            ],
        }
    }

    #[test]
    fn test_cascade_removes_touching_wires() {
        let mut scene = chain();
        let removed = scene.remove_elements_cascade(&HashSet::from(["B"]));
        assert_eq!(removed, vec!["w1".to_string(), "w2".to_string()]);
        assert!(scene.wires.is_empty());
        assert_eq!(scene.elements.len(), 2);
    }

    #[test]
    fn test_cascade_keeps_unrelated_wires() {
        let mut scene = chain();
        scene.remove_elements_cascade(&HashSet::from(["A"]));
        assert_eq!(scene.wires.len(), 1);
        assert_eq!(scene.wires[0].id, "w2");
    }

    #[test]
    fn test_port_position_follows_rotation() {
        let catalog = Catalog::builtin();
        let el = element("A", "resistor", 100.0, 100.0, 90.0);
        let b = el.port_position(&catalog, "B").unwrap();
        assert!((b.x - 140.0).abs() < 1e-9);
        assert!((b.y - 160.0).abs() < 1e-9);
        assert!(el.port_position(&catalog, "Z").is_none());
    }

    #[test]
    fn test_validate_endpoint() {
        let catalog = Catalog::builtin();
        let scene = chain();
        assert!(scene.validate_endpoint(&catalog, &Endpoint::new("A", "A")).is_ok());
        assert_eq!(
            scene.validate_endpoint(&catalog, &Endpoint::new("Q", "A")),
            Err(SceneError::UnknownElement("Q".to_string()))
        );
        assert!(matches!(
            scene.validate_endpoint(&catalog, &Endpoint::new("A", "G")),
            Err(SceneError::UnknownPort { .. })
        ));
    }

    #[test]
    fn test_hit_testing() {
        let catalog = Catalog::builtin();
        let scene = chain();
        let hit = scene.element_at(&catalog, Point::new(40.0, 20.0));
        assert_eq!(hit.map(|e| e.id.as_str()), Some("A"));
        assert!(scene.element_at(&catalog, Point::new(40.0, 60.0)).is_none());

        let port = scene.port_at(&catalog, Point::new(181.0, 21.0), 4.0).unwrap();
        assert_eq!(port, Endpoint::new("B", "B"));

        // w1 runs straight from (80,20) to (100,20)
        let hit = scene.wire_at(&catalog, Point::new(90.0, 22.0), 4.0);
        assert_eq!(hit.map(|w| w.id.as_str()), Some("w1"));
    }

    #[test]
    fn test_elements_in_rect_requires_full_containment() {
        let catalog = Catalog::builtin();
        let scene = Scene {
            elements: vec![
                element("flat", "resistor", 0.0, 0.0, 0.0),
                element("turned", "resistor", 0.0, 100.0, 90.0),
            ],
            wires: vec![],
        };
        // The unrotated footprint of "turned" fits in this box, its rotated
        // footprint (x 20..60, y 80..160) does not.
        let rect = Rect::new(-1.0, -1.0, 81.0, 141.0);
        assert_eq!(scene.elements_in_rect(&catalog, rect), vec!["flat".to_string()]);
        let tall = Rect::new(-1.0, -1.0, 81.0, 161.0);
        assert_eq!(scene.elements_in_rect(&catalog, tall).len(), 2);
    }

    #[test]
    fn test_unknown_type_is_inert() {
        let catalog = Catalog::builtin();
        let scene = Scene {
            elements: vec![element("x", "transistor", 0.0, 0.0, 0.0)],
            wires: vec![],
        };
        assert!(scene.bounds(&catalog).is_none());
        assert!(scene.element_at(&catalog, Point::new(1.0, 1.0)).is_none());
        let everywhere = Rect::new(-100.0, -100.0, 100.0, 100.0);
        assert!(scene.elements_in_rect(&catalog, everywhere).is_empty());
    }

    #[test]
    fn test_json_shape() {
        let scene = chain();
        let value: serde_json::Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
        assert_eq!(value["elements"][0]["type"], "resistor");
        assert_eq!(value["elements"][0]["rot"], 0.0);
        assert_eq!(value["wires"][0]["from"]["el"], "A");
        assert_eq!(value["wires"][0]["to"]["port"], "A");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut scene = chain();
        scene.elements[1].label = "R2 <10k>".to_string();
        scene.elements[2].rot = 270.0;
        let back = Scene::from_json(&scene.to_json().unwrap()).unwrap();
        assert_eq!(back, scene);
    }

    #[test]
    fn test_lenient_lists() {
        let scene = Scene::from_json(r#"{ "elements": {"oops": 1} }"#).unwrap();
        assert!(scene.is_empty());

        let json = r#"{
            "elements": [{"id": "a", "type": "lamp", "x": 10, "y": 20, "label": null}],
            "wires": 7
        }"#;
        let scene = Scene::from_json(json).unwrap();
        assert_eq!(scene.elements.len(), 1);
        assert_eq!(scene.elements[0].rot, 0.0);
        assert_eq!(scene.elements[0].label, "");
        assert!(scene.wires.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Scene::from_json("{ not json").is_err());
        assert!(Scene::from_json(r#"{ "elements": [{"id": 5}] }"#).is_err());
    }

    #[test]
    fn test_dangling_wires_detected() {
        let catalog = Catalog::builtin();
        let mut scene = chain();
        scene.elements.retain(|e| e.id != "C");
        let dangling: Vec<_> = scene
            .dangling_wires(&catalog)
            .into_iter()
            .map(|w| w.id.clone())
            .collect();
        assert_eq!(dangling, vec!["w2".to_string()]);
    }
}
