//! Selection state.

use crate::scene::{ElementId, Scene, WireId};

/// What the user currently has selected.
///
/// Multi-selections only ever hold elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Element(ElementId),
    Wire(WireId),
    /// Two or more elements.
    Elements(Vec<ElementId>),
}

impl Selection {
    /// Build a selection from element ids, collapsing to the smallest form.
    pub fn from_elements(mut ids: Vec<ElementId>) -> Self {
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        match ids.len() {
            0 => Selection::None,
            1 => Selection::Element(ids.remove(0)),
            _ => Selection::Elements(ids),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Selected element ids, empty when a wire or nothing is selected.
    pub fn element_ids(&self) -> Vec<&str> {
        match self {
            Selection::Element(id) => vec![id.as_str()],
            Selection::Elements(ids) => ids.iter().map(String::as_str).collect(),
            Selection::None | Selection::Wire(_) => Vec::new(),
        }
    }

    /// The single selected element, if exactly one is selected.
    pub fn single_element(&self) -> Option<&str> {
        match self {
            Selection::Element(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn wire(&self) -> Option<&str> {
        match self {
            Selection::Wire(id) => Some(id.as_str()),
            _ => None,
        }
    }

    /// Check if an element is part of the selection.
    pub fn contains_element(&self, id: &str) -> bool {
        match self {
            Selection::Element(sel) => sel == id,
            Selection::Elements(ids) => ids.iter().any(|s| s == id),
            _ => false,
        }
    }

    /// Check if the selection holds more than one element.
    pub fn is_multi(&self) -> bool {
        matches!(self, Selection::Elements(_))
    }

    /// Drop ids that no longer exist in `scene`.
    pub fn retain_existing(&mut self, scene: &Scene) {
        *self = match std::mem::take(self) {
            Selection::Element(id) if scene.contains_element(&id) => Selection::Element(id),
            Selection::Wire(id) if scene.contains_wire(&id) => Selection::Wire(id),
            Selection::Elements(ids) => Selection::from_elements(
                ids.into_iter()
                    .filter(|id| scene.contains_element(id))
                    .collect(),
            ),
            _ => Selection::None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Element, Endpoint, Wire};

    fn ids(names: &[&str]) -> Vec<ElementId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_elements_normalizes() {
        assert_eq!(Selection::from_elements(vec![]), Selection::None);
        assert_eq!(Selection::from_elements(ids(&["a"])), Selection::Element("a".into()));
        assert_eq!(Selection::from_elements(ids(&["a", "a"])), Selection::Element("a".into()));
        assert_eq!(
            Selection::from_elements(ids(&["a", "b"])),
            Selection::Elements(ids(&["a", "b"]))
        );
    }

    #[test]
    fn test_contains_element() {
        let multi = Selection::Elements(ids(&["a", "b"]));
        assert!(multi.contains_element("b"));
        assert!(!multi.contains_element("c"));
        assert!(!Selection::Wire("a".into()).contains_element("a"));
        assert!(Selection::Wire("w".into()).element_ids().is_empty());
    }

    #[test]
    fn test_retain_existing() {
        let el = |id: &str| Element {
            id: id.to_string(),
            kind: "resistor".to_string(),
            x: 0.0,
            y: 0.0,
            rot: 0.0,
            label: String::new(),
        };
        let scene = Scene {
            elements: vec![el("a"), el("b")],
            wires: vec![Wire {
                id: "w".to_string(),
                from: Endpoint::new("a", "B"),
                to: Endpoint::new("b", "A"),
            }],
        };

        let mut sel = Selection::Elements(ids(&["a", "gone"]));
        sel.retain_existing(&scene);
        assert_eq!(sel, Selection::Element("a".into()));

        let mut sel = Selection::Wire("gone".into());
        sel.retain_existing(&scene);
        assert!(sel.is_none());

        let mut sel = Selection::Wire("w".into());
        sel.retain_existing(&scene);
        assert_eq!(sel.wire(), Some("w"));
    }
}
