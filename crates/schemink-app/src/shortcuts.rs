//! Keyboard shortcut documentation.

use schemink_core::commands::shortcuts;

/// Shortcut table, one binding per line.
pub fn shortcut_table() -> String {
    shortcuts()
        .iter()
        .map(|shortcut| format!("  {:20} {}\n", shortcut.format(), shortcut.description))
        .collect()
}

/// Print all shortcuts to console.
pub fn print_all() {
    println!("\n=== Keyboard Shortcuts ===");
    print!("{}", shortcut_table());
    println!();
}
