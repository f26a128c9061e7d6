//! Tool modes.
//!
//! The active tool decides which gesture a pointer-down on the canvas arms.

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Wire,
    Text,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Select, ToolKind::Wire, ToolKind::Text];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Wire => "wire",
            ToolKind::Text => "text",
        }
    }

    /// Single-key shortcut that switches to this tool.
    pub fn shortcut(self) -> char {
        match self {
            ToolKind::Select => 'v',
            ToolKind::Wire => 'w',
            ToolKind::Text => 't',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_is_select() {
        assert_eq!(ToolKind::default(), ToolKind::Select);
    }

    #[test]
    fn test_shortcuts_are_distinct() {
        let keys: std::collections::HashSet<_> =
            ToolKind::ALL.iter().map(|t| t.shortcut()).collect();
        assert_eq!(keys.len(), ToolKind::ALL.len());
        assert_eq!(serde_json::to_string(&ToolKind::Wire).unwrap(), "\"wire\"");
    }
}
