//! Editor command surface and keyboard bindings.

use crate::input::{Key, Modifiers};
use crate::tools::ToolKind;

/// Discrete commands toolbars, menus and the keyboard can issue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCommand {
    SetTool(ToolKind),
    Undo,
    Redo,
    NewDocument,
    SelectAll,
    Duplicate,
    DeleteSelection,
    /// Rotate the selection by the given degrees.
    Rotate(f64),
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ZoomFit,
    /// Cancel a pending wire, or otherwise clear the selection.
    Cancel,
}

impl EditorCommand {
    /// Human readable name.
    pub fn description(&self) -> &'static str {
        match self {
            EditorCommand::SetTool(ToolKind::Select) => "Select tool",
            EditorCommand::SetTool(ToolKind::Wire) => "Wire tool",
            EditorCommand::SetTool(ToolKind::Text) => "Text tool",
            EditorCommand::Undo => "Undo",
            EditorCommand::Redo => "Redo",
            EditorCommand::NewDocument => "New document",
            EditorCommand::SelectAll => "Select all elements",
            EditorCommand::Duplicate => "Duplicate selection",
            EditorCommand::DeleteSelection => "Delete selection",
            EditorCommand::Rotate(d) if *d < 0.0 => "Rotate selection 90° counter-clockwise",
            EditorCommand::Rotate(_) => "Rotate selection 90° clockwise",
            EditorCommand::ZoomIn => "Zoom in",
            EditorCommand::ZoomOut => "Zoom out",
            EditorCommand::ZoomReset => "Reset zoom",
            EditorCommand::ZoomFit => "Zoom to fit",
            EditorCommand::Cancel => "Cancel wire or clear selection",
        }
    }
}

/// Translate a key press into a command.
///
/// Space is not mapped here; holding it arms panning in the controller.
pub fn command_for_key(key: Key, modifiers: Modifiers) -> Option<EditorCommand> {
    match key {
        Key::Escape => Some(EditorCommand::Cancel),
        Key::Delete | Key::Backspace => Some(EditorCommand::DeleteSelection),
        Key::Space => None,
        Key::Character(c) if modifiers.command() => match c.to_ascii_lowercase() {
            'a' => Some(EditorCommand::SelectAll),
            'n' => Some(EditorCommand::NewDocument),
            'd' => Some(EditorCommand::Duplicate),
            'z' if modifiers.shift => Some(EditorCommand::Redo),
            'z' => Some(EditorCommand::Undo),
            'y' => Some(EditorCommand::Redo),
            '+' | '=' => Some(EditorCommand::ZoomIn),
            '-' | '_' => Some(EditorCommand::ZoomOut),
            '0' => Some(EditorCommand::ZoomReset),
            _ => None,
        },
        Key::Character(_) if modifiers.alt => None,
        Key::Character('r') if !modifiers.shift => Some(EditorCommand::Rotate(-90.0)),
        Key::Character('r' | 'R') => Some(EditorCommand::Rotate(90.0)),
        Key::Character(c) => {
            let lower = c.to_ascii_lowercase();
            ToolKind::ALL
                .into_iter()
                .find(|tool| tool.shortcut() == lower)
                .map(EditorCommand::SetTool)
        }
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Every binding [`command_for_key`] honors, plus the pointer chords.
pub fn shortcuts() -> Vec<Shortcut> {
    vec![
        Shortcut::new("V", false, false, "Select tool"),
        Shortcut::new("W", false, false, "Wire tool"),
        Shortcut::new("T", false, false, "Text tool"),
        Shortcut::new("Delete", false, false, "Delete selection"),
        Shortcut::new("Backspace", false, false, "Delete selection"),
        Shortcut::new("Escape", false, false, "Cancel wire or clear selection"),
        Shortcut::new("A", true, false, "Select all elements"),
        Shortcut::new("N", true, false, "New document"),
        Shortcut::new("D", true, false, "Duplicate selection"),
        Shortcut::new("Z", true, false, "Undo"),
        Shortcut::new("Y", true, false, "Redo"),
        Shortcut::new("Z", true, true, "Redo"),
        Shortcut::new("R", false, false, "Rotate selection 90° counter-clockwise"),
        Shortcut::new("R", false, true, "Rotate selection 90° clockwise"),
        Shortcut::new("+", true, false, "Zoom in"),
        Shortcut::new("-", true, false, "Zoom out"),
        Shortcut::new("0", true, false, "Reset zoom"),
        Shortcut::new("Space+Drag", false, false, "Pan"),
        Shortcut::new("Middle-Drag", false, false, "Pan"),
        Shortcut::new("Wheel", true, false, "Zoom at cursor"),
    ]
}
