//! Editor session: the document and everything needed to edit it.
//!
//! Every mutating command records the pre-mutation scene in history, applies
//! its change, then bumps [`Session::revision`]. Hosts re-render whenever the
//! revision moves. Commands with nothing to act on are silent no-ops and
//! leave history untouched.

use crate::camera::ViewTransform;
use crate::catalog::{Catalog, SymbolKind};
use crate::commands::EditorCommand;
use crate::config::EditorConfig;
use crate::error::{DocumentError, SceneError, SceneResult};
use crate::geometry;
use crate::history::History;
use crate::scene::{Element, ElementId, Endpoint, Scene, Wire, WireId, new_element_id, new_wire_id};
use crate::selection::Selection;
use crate::storage::{Storage, StorageResult};
use crate::tools::ToolKind;
use kurbo::{Point, Size, Vec2};
use std::collections::{HashMap, HashSet};

/// Parse a numeric inspector field. Anything that is not a finite number
/// reads as 0.
pub fn parse_field(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Raw text of the inspector fields for one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InspectorFields {
    pub x: String,
    pub y: String,
    pub rot: String,
    pub label: String,
}

impl InspectorFields {
    pub fn from_element(element: &Element) -> Self {
        Self {
            x: element.x.to_string(),
            y: element.y.to_string(),
            rot: element.rot.to_string(),
            label: element.label.clone(),
        }
    }
}

/// One editor instance.
#[derive(Debug, Clone)]
pub struct Session {
    scene: Scene,
    selection: Selection,
    history: History,
    view: ViewTransform,
    tool: ToolKind,
    catalog: Catalog,
    config: EditorConfig,
    revision: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    /// Create a session with an empty scene.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            scene: Scene::new(),
            selection: Selection::None,
            history: History::new(config.history_limit),
            view: ViewTransform::with_zoom_bounds(config.min_zoom, config.max_zoom),
            tool: ToolKind::default(),
            catalog: Catalog::builtin(),
            config,
            revision: 0,
        }
    }

    /// Create a session editing `scene`, with empty history.
    pub fn with_scene(config: EditorConfig, scene: Scene) -> Self {
        Self {
            scene,
            ..Self::new(config)
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Counter bumped on every visible change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn record(&mut self) {
        self.history.push(&self.scene);
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    fn snap(&self, point: Point) -> Point {
        geometry::snap_point(point, self.config.grid_size)
    }

    // --- Elements ---

    /// Place a new element and select it.
    pub fn add_element(&mut self, kind: &str, x: f64, y: f64, rot: f64, label: &str) -> ElementId {
        self.record();
        let id = new_element_id();
        let position = self.snap(Point::new(x, y));
        self.scene.elements.push(Element {
            id: id.clone(),
            kind: kind.to_string(),
            x: position.x,
            y: position.y,
            rot: geometry::normalize_degrees(rot),
            label: label.to_string(),
        });
        if self.catalog.lookup(kind).is_none() {
            log::warn!("Added element {} of unknown type {:?}", id, kind);
        }
        log::debug!("Added {} {}", kind, id);
        self.selection = Selection::Element(id.clone());
        self.touch();
        id
    }

    /// Drop a palette symbol centered on `center`, labelled with its name.
    pub fn place_symbol(&mut self, kind: SymbolKind, center: Point) -> ElementId {
        let info = kind.describe();
        self.add_element(
            kind.type_name(),
            center.x - info.width / 2.0,
            center.y - info.height / 2.0,
            0.0,
            info.name,
        )
    }

    /// Create a text element at `position` with the configured label.
    pub fn add_text(&mut self, position: Point) -> ElementId {
        let label = self.config.text_label.clone();
        self.add_element(SymbolKind::Text.type_name(), position.x, position.y, 0.0, &label)
    }

    /// Remove an element and every wire attached to it.
    pub fn remove_element(&mut self, id: &str) -> bool {
        self.remove_elements([id])
    }

    /// Remove several elements and their wires as one history step.
    pub fn remove_elements<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets: Vec<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .filter(|id| self.scene.contains_element(id))
            .collect();
        if targets.is_empty() {
            return false;
        }

        self.record();
        let set: HashSet<&str> = targets.iter().map(String::as_str).collect();
        let wires = self.scene.remove_elements_cascade(&set);
        self.selection.retain_existing(&self.scene);
        log::debug!("Removed {} element(s) and {} wire(s)", set.len(), wires.len());
        self.touch();
        true
    }

    // --- Wires ---

    /// Connect two ports.
    ///
    /// Both endpoints must name an existing element and one of its ports,
    /// and must differ. Rejected wires leave history untouched.
    pub fn add_wire(&mut self, from: Endpoint, to: Endpoint) -> SceneResult<WireId> {
        self.scene.validate_endpoint(&self.catalog, &from)?;
        self.scene.validate_endpoint(&self.catalog, &to)?;
        if from == to {
            return Err(SceneError::SelfConnection {
                element: from.element,
                port: from.port,
            });
        }

        self.record();
        let id = new_wire_id();
        log::debug!(
            "Wired {}.{} -> {}.{} as {}",
            from.element,
            from.port,
            to.element,
            to.port,
            id
        );
        self.scene.wires.push(Wire {
            id: id.clone(),
            from,
            to,
        });
        self.touch();
        Ok(id)
    }

    pub fn remove_wire(&mut self, id: &str) -> bool {
        if !self.scene.contains_wire(id) {
            return false;
        }
        self.record();
        self.scene.remove_wire(id);
        self.selection.retain_existing(&self.scene);
        self.touch();
        true
    }

    // --- Selection-driven edits ---

    fn selected_existing(&self) -> Vec<ElementId> {
        self.selection
            .element_ids()
            .into_iter()
            .filter(|id| self.scene.contains_element(id))
            .map(str::to_string)
            .collect()
    }

    /// Copy the selected elements, and the wires running between them,
    /// offset by `duplicate_offset`. The copies become the selection.
    pub fn duplicate_selected(&mut self) -> Vec<ElementId> {
        let source = self.selected_existing();
        if source.is_empty() {
            return Vec::new();
        }

        self.record();
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let mut remap: HashMap<&str, ElementId> = HashMap::new();
        let mut copies = Vec::with_capacity(source.len());
        for id in &source {
            let Some(original) = self.scene.element(id) else {
                continue;
            };
            let mut copy = original.clone();
            copy.id = new_element_id();
            copy.set_position(self.snap(original.position() + offset));
            remap.insert(id.as_str(), copy.id.clone());
            copies.push(copy);
        }

        let new_wires: Vec<Wire> = self
            .scene
            .wires
            .iter()
            .filter_map(|wire| {
                let from = remap.get(wire.from.element.as_str())?;
                let to = remap.get(wire.to.element.as_str())?;
                Some(Wire {
                    id: new_wire_id(),
                    from: Endpoint::new(from.clone(), wire.from.port.clone()),
                    to: Endpoint::new(to.clone(), wire.to.port.clone()),
                })
            })
            .collect();

        let new_ids: Vec<ElementId> = copies.iter().map(|e| e.id.clone()).collect();
        log::debug!("Duplicated {} element(s), {} wire(s)", copies.len(), new_wires.len());
        self.scene.elements.extend(copies);
        self.scene.wires.extend(new_wires);
        self.selection = Selection::from_elements(new_ids.clone());
        self.touch();
        new_ids
    }

    /// Rotate every selected element about its own center.
    pub fn rotate_selected(&mut self, delta_degrees: f64) -> bool {
        let targets = self.selected_existing();
        if targets.is_empty() {
            return false;
        }
        self.record();
        for element in self
            .scene
            .elements
            .iter_mut()
            .filter(|e| targets.contains(&e.id))
        {
            element.rot = geometry::normalize_degrees(element.rot + delta_degrees);
        }
        self.touch();
        true
    }

    /// Delete whatever is selected.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection.clone() {
            Selection::None => false,
            Selection::Element(id) => self.remove_element(&id),
            Selection::Wire(id) => self.remove_wire(&id),
            Selection::Elements(ids) => self.remove_elements(ids),
        }
    }

    fn edit_selected(&mut self, edit: impl FnOnce(&mut Element)) -> bool {
        let Some(id) = self.selection.single_element().map(str::to_string) else {
            return false;
        };
        if !self.scene.contains_element(&id) {
            return false;
        }
        self.record();
        if let Some(element) = self.scene.element_mut(&id) {
            edit(element);
        }
        self.touch();
        true
    }

    /// Current inspector values of the single selected element.
    pub fn inspector(&self) -> Option<InspectorFields> {
        let id = self.selection.single_element()?;
        self.scene.element(id).map(InspectorFields::from_element)
    }

    /// Move the selected element to the parsed, grid-snapped position.
    pub fn set_selected_position(&mut self, x: &str, y: &str) -> bool {
        let position = self.snap(Point::new(parse_field(x), parse_field(y)));
        self.edit_selected(|element| element.set_position(position))
    }

    pub fn set_selected_rotation(&mut self, rot: &str) -> bool {
        let rot = geometry::normalize_degrees(parse_field(rot));
        self.edit_selected(|element| element.rot = rot)
    }

    pub fn set_selected_label(&mut self, label: &str) -> bool {
        let label = label.to_string();
        self.edit_selected(|element| element.label = label)
    }

    /// Apply all inspector fields as one history step.
    pub fn apply_inspector_fields(&mut self, fields: &InspectorFields) -> bool {
        let position = self.snap(Point::new(parse_field(&fields.x), parse_field(&fields.y)));
        let rot = geometry::normalize_degrees(parse_field(&fields.rot));
        let label = fields.label.clone();
        self.edit_selected(|element| {
            element.set_position(position);
            element.rot = rot;
            element.label = label;
        })
    }

    // --- Drag support ---

    /// Record the pre-drag scene. Moves that follow are not recorded.
    pub fn begin_drag(&mut self) {
        self.record();
    }

    /// Reposition elements during a drag. Positions are snapped again.
    pub fn drag_elements(&mut self, targets: &[(ElementId, Point)]) {
        let grid = self.config.grid_size;
        for (id, position) in targets {
            if let Some(element) = self.scene.element_mut(id) {
                element.set_position(geometry::snap_point(*position, grid));
            }
        }
        self.touch();
    }

    // --- Selection only ---

    pub fn select_element(&mut self, id: &str) -> bool {
        if !self.scene.contains_element(id) {
            return false;
        }
        self.selection = Selection::Element(id.to_string());
        self.touch();
        true
    }

    pub fn select_wire(&mut self, id: &str) -> bool {
        if !self.scene.contains_wire(id) {
            return false;
        }
        self.selection = Selection::Wire(id.to_string());
        self.touch();
        true
    }

    /// Select the given elements, dropping ids that do not exist.
    pub fn select_elements(&mut self, ids: Vec<ElementId>) {
        let ids = ids
            .into_iter()
            .filter(|id| self.scene.contains_element(id))
            .collect();
        self.selection = Selection::from_elements(ids);
        self.touch();
    }

    /// Select every element. Returns whether the selection changed.
    pub fn select_all(&mut self) -> bool {
        let ids = self.scene.elements.iter().map(|e| e.id.clone()).collect();
        let before = self.selection.clone();
        self.select_elements(ids);
        self.selection != before
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_none() {
            self.selection = Selection::None;
            self.touch();
        }
    }

    // --- Document ---

    /// Clear the document as one undoable step.
    pub fn new_document(&mut self) -> bool {
        if self.scene.is_empty() {
            return false;
        }
        self.record();
        self.scene = Scene::new();
        self.selection = Selection::None;
        log::info!("Started a new document");
        self.touch();
        true
    }

    fn restore(&mut self, scene: Scene) {
        self.scene = scene;
        self.selection = Selection::None;
        self.touch();
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.scene) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.scene) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Owned copy of the current document.
    pub fn export_document(&self) -> Scene {
        self.scene.clone()
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.scene.to_json()
    }

    /// Replace the document with `scene` as one undoable step.
    pub fn load_scene(&mut self, scene: Scene) {
        self.record();
        let dangling = scene.dangling_wires(&self.catalog).len();
        if dangling > 0 {
            log::warn!("Loaded document has {} dangling wire(s)", dangling);
        }
        log::info!(
            "Loaded document with {} element(s) and {} wire(s)",
            scene.elements.len(),
            scene.wires.len()
        );
        self.restore(scene);
    }

    /// Parse and load a JSON document. On failure the scene is untouched.
    pub fn import_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let scene = Scene::from_json(json)?;
        self.load_scene(scene);
        Ok(())
    }

    pub fn save_to_storage(&self, storage: &dyn Storage, key: &str) -> StorageResult<()> {
        storage.save(key, &self.scene)
    }

    /// Load from storage. On failure the scene is untouched.
    pub fn load_from_storage(&mut self, storage: &dyn Storage, key: &str) -> StorageResult<()> {
        let scene = storage.load(key)?;
        self.load_scene(scene);
        Ok(())
    }

    // --- Tool and view ---

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            log::debug!("Tool {} -> {}", self.tool.name(), tool.name());
            self.tool = tool;
            self.touch();
        }
    }

    pub fn screen_to_scene(&self, screen_point: Point) -> Point {
        self.view.screen_to_scene(screen_point)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.view.set_viewport(viewport);
        self.touch();
    }

    /// Set the pan offset directly (screen space).
    pub fn set_pan(&mut self, pan: Vec2) {
        self.view.pan = pan;
        self.touch();
    }

    pub fn zoom_at(&mut self, screen_point: Point, delta: f64) {
        self.view.zoom_at(screen_point, delta);
        self.touch();
    }

    pub fn zoom_in(&mut self) {
        let step = self.config.zoom_step;
        self.view.zoom_by(step);
        self.touch();
    }

    pub fn zoom_out(&mut self) {
        let step = self.config.zoom_step;
        self.view.zoom_by(-step);
        self.touch();
    }

    pub fn zoom_reset(&mut self) {
        self.view.reset();
        self.touch();
    }

    /// Fit all elements into the viewport. No-op on an empty scene.
    pub fn zoom_fit(&mut self) -> bool {
        let Some(bounds) = self.scene.bounds(&self.catalog) else {
            return false;
        };
        self.view.fit_to_bounds(bounds, self.config.fit_padding);
        self.touch();
        true
    }

    /// Run a command. Returns whether anything changed.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        log::debug!("Executing {:?}", command);
        match command {
            EditorCommand::SetTool(tool) => {
                let changed = self.tool != tool;
                self.set_tool(tool);
                changed
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::NewDocument => self.new_document(),
            EditorCommand::SelectAll => self.select_all(),
            EditorCommand::Duplicate => !self.duplicate_selected().is_empty(),
            EditorCommand::DeleteSelection => self.delete_selected(),
            EditorCommand::Rotate(delta) => self.rotate_selected(delta),
            EditorCommand::ZoomIn => {
                self.zoom_in();
                true
            }
            EditorCommand::ZoomOut => {
                self.zoom_out();
                true
            }
            EditorCommand::ZoomReset => {
                self.zoom_reset();
                true
            }
            EditorCommand::ZoomFit => self.zoom_fit(),
            EditorCommand::Cancel => {
                let had = !self.selection.is_none();
                self.clear_selection();
                had
            }
        }
    }
}
