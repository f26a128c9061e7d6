//! Interaction controller: turns pointer and keyboard events into session
//! commands.
//!
//! The controller owns exactly one [`Gesture`]. Pointer-down arms a gesture
//! according to the active tool, moves update it, pointer-up completes it.
//! Event handlers return `true` when the host should redraw.

use crate::commands::{EditorCommand, command_for_key};
use crate::geometry;
use crate::gesture::{DragState, Gesture, Marquee, PendingWire};
use crate::input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::selection::Selection;
use crate::session::Session;
use crate::tools::ToolKind;
use kurbo::{Point, Rect};

/// Transient feedback for the active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Marquee rectangle in scene coordinates.
    pub marquee: Option<Rect>,
    /// Routed preview of the wire being strung.
    pub wire_preview: Option<[Point; 4]>,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.marquee.is_none() && self.wire_preview.is_none()
    }
}

/// Gesture state machine for one session.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
    space_held: bool,
    /// Tool the current gesture was armed under.
    armed_tool: ToolKind,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Abandon the gesture in progress.
    pub fn cancel(&mut self) {
        if !self.gesture.is_idle() {
            log::debug!("Cancelled {}", self.gesture.name());
        }
        self.gesture = Gesture::Idle;
    }

    fn sync_tool(&mut self, session: &Session) {
        if session.tool() != self.armed_tool {
            self.cancel();
            self.armed_tool = session.tool();
        }
    }

    fn set_gesture(&mut self, gesture: Gesture) {
        if gesture.name() != self.gesture.name() {
            log::debug!("Gesture {} -> {}", self.gesture.name(), gesture.name());
        }
        self.gesture = gesture;
    }

    // --- Pointer ---

    /// Feed a pointer event.
    pub fn handle_pointer(
        &mut self,
        session: &mut Session,
        event: PointerEvent,
        modifiers: Modifiers,
    ) -> bool {
        self.sync_tool(session);
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(session, position, button),
            PointerEvent::Move { position } => self.pointer_move(session, position),
            PointerEvent::Up { position, .. } => self.pointer_up(session, position),
            PointerEvent::Scroll { position, delta } => {
                if modifiers.command() {
                    let step = session.config().zoom_step;
                    let zoom_delta = if delta.y < 0.0 {
                        step
                    } else if delta.y > 0.0 {
                        -step
                    } else {
                        return false;
                    };
                    session.zoom_at(position, zoom_delta);
                } else {
                    let pan = session.view().pan - delta;
                    session.set_pan(pan);
                }
                true
            }
        }
    }

    fn pointer_down(
        &mut self,
        session: &mut Session,
        position: Point,
        button: MouseButton,
    ) -> bool {
        if button == MouseButton::Middle || (button == MouseButton::Left && self.space_held) {
            self.begin_pan(session, position);
            return true;
        }
        if button != MouseButton::Left {
            return false;
        }

        let point = session.screen_to_scene(position);
        match session.tool() {
            ToolKind::Select => self.select_down(session, point),
            ToolKind::Wire => self.wire_down(session, point),
            ToolKind::Text => self.text_down(session, point),
        }
        true
    }

    fn begin_pan(&mut self, session: &Session, position: Point) {
        let resume_wire = match std::mem::take(&mut self.gesture) {
            Gesture::StringingWire(wire) => Some(wire),
            Gesture::Panning { resume_wire, .. } => resume_wire,
            _ => None,
        };
        self.set_gesture(Gesture::Panning {
            origin: position,
            start_pan: session.view().pan,
            resume_wire,
        });
    }

    fn select_down(&mut self, session: &mut Session, point: Point) {
        let scene = session.scene();
        let catalog = session.catalog();
        let config = session.config();

        // A connector click in the select tool picks its element
        if let Some(port) = scene.port_at(catalog, point, config.port_hit_radius) {
            session.select_element(&port.element);
            self.set_gesture(Gesture::Idle);
            return;
        }

        if let Some(id) = scene.element_at(catalog, point).map(|e| e.id.clone()) {
            let in_group =
                matches!(session.selection(), Selection::Elements(ids) if ids.contains(&id));
            let ids: Vec<String> = if in_group {
                session.selection().element_ids().into_iter().map(str::to_string).collect()
            } else {
                session.select_element(&id);
                vec![id]
            };
            let origins = ids
                .into_iter()
                .filter_map(|id| {
                    let position = session.scene().element(&id)?.position();
                    Some((id, position))
                })
                .collect();
            self.set_gesture(Gesture::Dragging(DragState::new(point, origins)));
            return;
        }

        if let Some(id) = scene
            .wire_at(catalog, point, config.wire_hit_tolerance)
            .map(|w| w.id.clone())
        {
            session.select_wire(&id);
            self.set_gesture(Gesture::Idle);
            return;
        }

        self.set_gesture(Gesture::BoxSelecting(Marquee::new(point)));
    }

    fn wire_down(&mut self, session: &mut Session, point: Point) {
        let radius = session.config().port_hit_radius;
        let port = session.scene().port_at(session.catalog(), point, radius);

        match (port, std::mem::take(&mut self.gesture)) {
            (Some(port), Gesture::StringingWire(pending)) => {
                if port == pending.from {
                    self.gesture = Gesture::StringingWire(pending);
                    return;
                }
                match session.add_wire(pending.from, port) {
                    Ok(id) => log::debug!("Completed wire {}", id),
                    Err(err) => log::warn!("Rejected wire: {}", err),
                }
                self.set_gesture(Gesture::Idle);
            }
            (Some(port), _) => {
                self.set_gesture(Gesture::StringingWire(PendingWire {
                    from: port,
                    pointer: point,
                }));
            }
            (None, _) => {
                self.set_gesture(Gesture::Idle);
                session.clear_selection();
            }
        }
    }

    fn text_down(&mut self, session: &mut Session, point: Point) {
        let hit = session
            .scene()
            .element_at(session.catalog(), point)
            .map(|e| e.id.clone());
        match hit {
            Some(id) => {
                session.select_element(&id);
            }
            None => {
                session.add_text(point);
            }
        }
        self.set_gesture(Gesture::Idle);
    }

    fn pointer_move(&mut self, session: &mut Session, position: Point) -> bool {
        let point = session.screen_to_scene(position);
        match &mut self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging(drag) => {
                let targets = drag.targets(point, session.config().grid_size);
                let changed = targets.iter().any(|(id, target)| {
                    session
                        .scene()
                        .element(id)
                        .is_some_and(|e| e.position() != *target)
                });
                if !changed {
                    return false;
                }
                if !drag.moved {
                    session.begin_drag();
                    drag.moved = true;
                }
                session.drag_elements(&targets);
                true
            }
            Gesture::BoxSelecting(marquee) => {
                marquee.current = point;
                true
            }
            Gesture::StringingWire(wire) => {
                wire.pointer = point;
                true
            }
            Gesture::Panning {
                origin, start_pan, resume_wire,
            } => {
                if let Some(wire) = resume_wire {
                    wire.pointer = point;
                }
                let pan = *start_pan + (position - *origin);
                session.set_pan(pan);
                true
            }
        }
    }

    fn pointer_up(&mut self, session: &mut Session, position: Point) -> bool {
        let point = session.screen_to_scene(position);
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Dragging(drag) => {
                if drag.moved {
                    log::debug!("Moved {} element(s)", drag.origins.len());
                }
                self.set_gesture(Gesture::Idle);
                true
            }
            Gesture::BoxSelecting(mut marquee) => {
                marquee.current = point;
                let ids = session
                    .scene()
                    .elements_in_rect(session.catalog(), marquee.to_rect());
                if ids.is_empty() {
                    session.clear_selection();
                } else {
                    session.select_elements(ids);
                }
                self.set_gesture(Gesture::Idle);
                true
            }
            Gesture::StringingWire(wire) => {
                // Wires complete on a second connector click, not on release
                self.gesture = Gesture::StringingWire(wire);
                false
            }
            Gesture::Panning { resume_wire, .. } => {
                self.set_gesture(resume_wire.map_or(Gesture::Idle, Gesture::StringingWire));
                true
            }
        }
    }

    // --- Keyboard ---

    /// Feed a key event.
    pub fn handle_key(
        &mut self,
        session: &mut Session,
        event: KeyEvent,
        modifiers: Modifiers,
    ) -> bool {
        match event {
            KeyEvent::Pressed(Key::Space) => {
                self.space_held = true;
                false
            }
            KeyEvent::Released(Key::Space) => {
                self.space_held = false;
                false
            }
            KeyEvent::Released(_) => false,
            KeyEvent::Pressed(key) => match command_for_key(key, modifiers) {
                Some(command) => self.execute(session, command),
                None => false,
            },
        }
    }

    /// Run a command, settling the gesture first.
    pub fn execute(&mut self, session: &mut Session, command: EditorCommand) -> bool {
        match command {
            EditorCommand::Cancel => {
                if matches!(self.gesture, Gesture::StringingWire(_)) {
                    self.cancel();
                    true
                } else if matches!(self.gesture, Gesture::BoxSelecting(_) | Gesture::Dragging(_)) {
                    // An aborted drag keeps what it already moved
                    self.cancel();
                    session.clear_selection();
                    true
                } else {
                    session.execute(command)
                }
            }
            EditorCommand::SetTool(tool) => {
                self.cancel();
                self.armed_tool = tool;
                session.execute(command)
            }
            EditorCommand::ZoomIn
            | EditorCommand::ZoomOut
            | EditorCommand::ZoomReset
            | EditorCommand::ZoomFit => session.execute(command),
            _ => {
                self.cancel();
                session.execute(command)
            }
        }
    }

    /// Feedback to draw over the scene.
    pub fn overlay(&self, session: &Session) -> Overlay {
        let pending = match &self.gesture {
            Gesture::StringingWire(wire) => Some(wire),
            Gesture::Panning {
                resume_wire: Some(wire),
                ..
            } => Some(wire),
            _ => None,
        };
        Overlay {
            marquee: match &self.gesture {
                Gesture::BoxSelecting(marquee) => Some(marquee.to_rect()),
                _ => None,
            },
            wire_preview: pending.and_then(|wire| {
                let from = session.scene().port_position(session.catalog(), &wire.from)?;
                Some(geometry::orthogonal_path(from, wire.pointer))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Endpoint;
    use kurbo::Vec2;

    fn down(ctl: &mut InteractionController, s: &mut Session, x: f64, y: f64) -> bool {
        ctl.handle_pointer(
            s,
            PointerEvent::Down {
                position: Point::new(x, y),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        )
    }

    fn mv(ctl: &mut InteractionController, s: &mut Session, x: f64, y: f64) -> bool {
        ctl.handle_pointer(s, PointerEvent::Move { position: Point::new(x, y) }, Modifiers::NONE)
    }

    fn up(ctl: &mut InteractionController, s: &mut Session, x: f64, y: f64) -> bool {
        ctl.handle_pointer(
            s,
            PointerEvent::Up {
                position: Point::new(x, y),
                button: MouseButton::Left,
            },
            Modifiers::NONE,
        )
    }

    fn press(
        ctl: &mut InteractionController,
        s: &mut Session,
        key: Key,
        modifiers: Modifiers,
    ) -> bool {
        ctl.handle_key(s, KeyEvent::Pressed(key), modifiers)
    }

    #[test]
    fn test_box_select_full_containment() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let a = s.add_element("resistor", 0.0, 0.0, 0.0, "");
        s.add_element("resistor", 200.0, 0.0, 0.0, "");

        down(&mut ctl, &mut s, -10.0, -10.0);
        assert_eq!(ctl.gesture().name(), "box-selecting");
        mv(&mut ctl, &mut s, 60.0, 30.0);
        assert!(ctl.overlay(&s).marquee.is_some());
        up(&mut ctl, &mut s, 100.0, 50.0);

        assert_eq!(s.selection(), &Selection::Element(a));
        assert!(ctl.gesture().is_idle());
        assert!(ctl.overlay(&s).is_empty());
    }

    #[test]
    fn test_empty_box_clears_selection() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.add_element("resistor", 0.0, 0.0, 0.0, "");
        assert!(!s.selection().is_none());

        down(&mut ctl, &mut s, 300.0, 300.0);
        up(&mut ctl, &mut s, 320.0, 320.0);
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let id = s.add_element("resistor", 0.0, 0.0, 0.0, "");
        let depth = s.history().undo_depth();

        down(&mut ctl, &mut s, 40.0, 20.0);
        mv(&mut ctl, &mut s, 52.0, 27.0);
        mv(&mut ctl, &mut s, 73.0, 44.0);
        up(&mut ctl, &mut s, 73.0, 44.0);

        let el = s.scene().element(&id).unwrap();
        assert_eq!((el.x, el.y), (30.0, 20.0));
        assert_eq!(s.history().undo_depth(), depth + 1);

        s.undo();
        let el = s.scene().element(&id).unwrap();
        assert_eq!((el.x, el.y), (0.0, 0.0));
    }

    #[test]
    fn test_escape_during_drag_disarms_it() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let id = s.add_element("resistor", 0.0, 0.0, 0.0, "");

        down(&mut ctl, &mut s, 40.0, 20.0);
        mv(&mut ctl, &mut s, 60.0, 20.0);
        assert!(press(&mut ctl, &mut s, Key::Escape, Modifiers::NONE));
        assert!(ctl.gesture().is_idle());
        assert!(s.selection().is_none());

        assert!(!mv(&mut ctl, &mut s, 140.0, 20.0));
        let el = s.scene().element(&id).unwrap();
        assert_eq!((el.x, el.y), (20.0, 0.0));

        s.undo();
        let el = s.scene().element(&id).unwrap();
        assert_eq!((el.x, el.y), (0.0, 0.0));
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.add_element("lamp", 0.0, 0.0, 0.0, "");
        let depth = s.history().undo_depth();

        down(&mut ctl, &mut s, 40.0, 10.0);
        mv(&mut ctl, &mut s, 41.0, 11.0);
        up(&mut ctl, &mut s, 41.0, 11.0);
        assert_eq!(s.history().undo_depth(), depth);
    }

    #[test]
    fn test_multi_selection_moves_together() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let a = s.add_element("resistor", 0.0, 0.0, 0.0, "");
        let b = s.add_element("resistor", 200.0, 0.0, 0.0, "");
        s.select_all();

        down(&mut ctl, &mut s, 40.0, 20.0);
        mv(&mut ctl, &mut s, 40.0, 120.0);
        up(&mut ctl, &mut s, 40.0, 120.0);

        assert_eq!(s.scene().element(&a).unwrap().y, 100.0);
        assert_eq!(s.scene().element(&b).unwrap().y, 100.0);
        assert!(s.selection().is_multi());
    }

    #[test]
    fn test_drag_unselected_element_replaces_selection() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.add_element("resistor", 0.0, 0.0, 0.0, "");
        s.add_element("resistor", 200.0, 0.0, 0.0, "");
        let c = s.add_element("resistor", 0.0, 200.0, 0.0, "");
        s.select_elements(s.scene().elements[..2].iter().map(|e| e.id.clone()).collect());

        down(&mut ctl, &mut s, 40.0, 220.0);
        assert_eq!(s.selection(), &Selection::Element(c));
    }

    #[test]
    fn test_connector_click_in_select_tool_selects_owner() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let a = s.add_element("resistor", 0.0, 0.0, 0.0, "");
        s.clear_selection();

        down(&mut ctl, &mut s, 81.0, 20.0);
        assert_eq!(s.selection(), &Selection::Element(a));
        assert!(ctl.gesture().is_idle());
    }

    #[test]
    fn test_wire_click_selects_wire() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let a = s.add_element("resistor", 0.0, 0.0, 0.0, "");
        let b = s.add_element("resistor", 200.0, 0.0, 0.0, "");
        let w = s.add_wire(Endpoint::new(a, "B"), Endpoint::new(b, "A")).unwrap();

        down(&mut ctl, &mut s, 140.0, 21.0);
        assert_eq!(s.selection(), &Selection::Wire(w));
    }

    #[test]
    fn test_string_wire_between_ports() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let r = s.add_element("resistor", 0.0, 0.0, 0.0, "");
        let c = s.add_element("capacitor", 100.0, 0.0, 0.0, "");
        press(&mut ctl, &mut s, Key::Character('w'), Modifiers::NONE);
        assert_eq!(s.tool(), ToolKind::Wire);

        down(&mut ctl, &mut s, 80.0, 20.0);
        assert_eq!(ctl.gesture().name(), "stringing-wire");
        mv(&mut ctl, &mut s, 150.0, 80.0);
        let preview = ctl.overlay(&s).wire_preview.unwrap();
        assert_eq!(preview[0], Point::new(80.0, 20.0));
        assert_eq!(preview[3], Point::new(150.0, 80.0));

        // Releasing does not finish the wire
        up(&mut ctl, &mut s, 150.0, 80.0);
        assert_eq!(ctl.gesture().name(), "stringing-wire");

        // Same connector again is ignored
        down(&mut ctl, &mut s, 80.0, 20.0);
        assert_eq!(ctl.gesture().name(), "stringing-wire");

        down(&mut ctl, &mut s, 101.0, 21.0);
        assert!(ctl.gesture().is_idle());
        assert_eq!(s.scene().wires.len(), 1);
        let wire = &s.scene().wires[0];
        assert_eq!(wire.from, Endpoint::new(r, "B"));
        assert_eq!(wire.to, Endpoint::new(c, "A"));
        assert!(ctl.overlay(&s).wire_preview.is_none());
    }

    #[test]
    fn test_wire_tool_empty_click_cancels() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.add_element("resistor", 0.0, 0.0, 0.0, "");
        s.set_tool(ToolKind::Wire);

        down(&mut ctl, &mut s, 80.0, 20.0);
        down(&mut ctl, &mut s, 300.0, 300.0);
        assert!(ctl.gesture().is_idle());
        assert!(s.selection().is_none());
        assert!(s.scene().wires.is_empty());
    }

    #[test]
    fn test_escape_cancels_wire_then_clears_selection() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.add_element("resistor", 0.0, 0.0, 0.0, "");
        s.set_tool(ToolKind::Wire);
        down(&mut ctl, &mut s, 0.0, 20.0);

        press(&mut ctl, &mut s, Key::Escape, Modifiers::NONE);
        assert!(ctl.gesture().is_idle());
        assert!(!s.selection().is_none());

        press(&mut ctl, &mut s, Key::Escape, Modifiers::NONE);
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_switching_tool_cancels_gesture() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.add_element("resistor", 0.0, 0.0, 0.0, "");
        s.set_tool(ToolKind::Wire);
        down(&mut ctl, &mut s, 0.0, 20.0);

        ctl.execute(&mut s, EditorCommand::SetTool(ToolKind::Select));
        assert!(ctl.gesture().is_idle());
        assert_eq!(s.tool(), ToolKind::Select);
    }

    #[test]
    fn test_text_tool_places_label() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.set_tool(ToolKind::Text);
        s.set_pan(Vec2::new(100.0, 0.0));

        down(&mut ctl, &mut s, 133.0, 47.0);
        assert_eq!(s.scene().elements.len(), 1);
        let el = &s.scene().elements[0];
        assert_eq!(el.kind, "text");
        assert_eq!(el.label, "Text");
        assert_eq!((el.x, el.y), (30.0, 50.0));
        assert_eq!(s.tool(), ToolKind::Text);
        assert!(ctl.gesture().is_idle());
    }

    #[test]
    fn test_space_drag_pans_by_screen_delta() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.zoom_at(Point::ZERO, 1.0);
        let start = s.view().pan;
        press(&mut ctl, &mut s, Key::Space, Modifiers::NONE);

        down(&mut ctl, &mut s, 100.0, 100.0);
        assert_eq!(ctl.gesture().name(), "panning");
        mv(&mut ctl, &mut s, 130.0, 90.0);
        assert_eq!(s.view().pan, start + Vec2::new(30.0, -10.0));
        up(&mut ctl, &mut s, 130.0, 90.0);
        assert!(ctl.gesture().is_idle());
        assert!(s.scene().is_empty());
    }

    #[test]
    fn test_pan_resumes_pending_wire() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        s.add_element("resistor", 0.0, 0.0, 0.0, "");
        s.set_tool(ToolKind::Wire);
        down(&mut ctl, &mut s, 80.0, 20.0);

        let middle = |position| PointerEvent::Down {
            position,
            button: MouseButton::Middle,
        };
        ctl.handle_pointer(&mut s, middle(Point::new(10.0, 10.0)), Modifiers::NONE);
        assert_eq!(ctl.gesture().name(), "panning");
        assert!(ctl.overlay(&s).wire_preview.is_some());
        mv(&mut ctl, &mut s, 20.0, 10.0);
        up(&mut ctl, &mut s, 20.0, 10.0);
        assert_eq!(ctl.gesture().name(), "stringing-wire");
    }

    #[test]
    fn test_ctrl_wheel_zooms_at_cursor() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let cursor = Point::new(200.0, 100.0);
        let before = s.screen_to_scene(cursor);

        ctl.handle_pointer(
            &mut s,
            PointerEvent::Scroll {
                position: cursor,
                delta: Vec2::new(0.0, -1.0),
            },
            Modifiers::CTRL,
        );
        assert!((s.view().zoom - 1.1).abs() < 1e-12);
        let after = s.screen_to_scene(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_keyboard_commands_reach_session() {
        let mut s = Session::default();
        let mut ctl = InteractionController::new();
        let id = s.add_element("resistor", 0.0, 0.0, 0.0, "");

        press(&mut ctl, &mut s, Key::Character('r'), Modifiers::NONE);
        assert_eq!(s.scene().element(&id).unwrap().rot, 270.0);
        press(&mut ctl, &mut s, Key::Character('R'), Modifiers::SHIFT);
        assert_eq!(s.scene().element(&id).unwrap().rot, 0.0);

        press(&mut ctl, &mut s, Key::Character('d'), Modifiers::CTRL);
        assert_eq!(s.scene().elements.len(), 2);
        press(&mut ctl, &mut s, Key::Character('z'), Modifiers::CTRL);
        assert_eq!(s.scene().elements.len(), 1);

        press(&mut ctl, &mut s, Key::Character('a'), Modifiers::CTRL);
        press(&mut ctl, &mut s, Key::Delete, Modifiers::NONE);
        assert!(s.scene().is_empty());
    }
}
