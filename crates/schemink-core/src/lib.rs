//! SchemInk Core Library
//!
//! Platform-agnostic editing engine for the SchemInk schematic editor:
//! scene model, snapshot history, geometry and the interaction state machine.

pub mod camera;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod scene;
pub mod selection;
pub mod session;
pub mod storage;
pub mod tools;

pub use camera::ViewTransform;
pub use catalog::{Catalog, PortDef, Side, SymbolInfo, SymbolKind};
pub use commands::{EditorCommand, Shortcut, command_for_key, shortcuts};
pub use config::{EditorConfig, GRID_SIZE, MAX_UNDO_HISTORY};
pub use controller::{InteractionController, Overlay};
pub use editor::Editor;
pub use error::{ConfigError, DocumentError, SceneError, SceneResult};
pub use gesture::Gesture;
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use scene::{Element, ElementId, Endpoint, Scene, Wire, WireId};
pub use selection::Selection;
pub use session::{InspectorFields, Session};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use tools::ToolKind;
