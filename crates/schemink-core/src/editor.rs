//! A session paired with its interaction controller.

use crate::commands::EditorCommand;
use crate::config::EditorConfig;
use crate::controller::{InteractionController, Overlay};
use crate::input::{KeyEvent, Modifiers, PointerEvent};
use crate::session::Session;

/// Everything a host needs to drive one editor.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    pub session: Session,
    pub controller: InteractionController,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            session: Session::new(config),
            controller: InteractionController::new(),
        }
    }

    pub fn pointer(&mut self, event: PointerEvent, modifiers: Modifiers) -> bool {
        self.controller
            .handle_pointer(&mut self.session, event, modifiers)
    }

    pub fn key(&mut self, event: KeyEvent, modifiers: Modifiers) -> bool {
        self.controller.handle_key(&mut self.session, event, modifiers)
    }

    pub fn execute(&mut self, command: EditorCommand) -> bool {
        self.controller.execute(&mut self.session, command)
    }

    pub fn overlay(&self) -> Overlay {
        self.controller.overlay(&self.session)
    }
}
