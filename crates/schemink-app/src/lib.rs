//! SchemInk Application
//!
//! Headless command-line shell around the editing engine: document loading,
//! SVG export, summaries and reference tables.

mod config;
mod document;
mod error;
mod shortcuts;

pub use config::AppConfig;
pub use document::{
    DocumentInfo, RenderOptions, catalog_table, read_scene, render_svg, write_output,
};
pub use error::{AppError, AppResult};
pub use shortcuts::{print_all as print_shortcuts, shortcut_table};
