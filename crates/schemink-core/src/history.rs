//! Snapshot-based undo/redo.

use crate::config::MAX_UNDO_HISTORY;
use crate::scene::Scene;
use std::collections::VecDeque;

/// Past and future scene snapshots.
///
/// Snapshots are owned clones, so later edits to the live scene can never
/// reach into a stored entry.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Scene>,
    future: Vec<Scene>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_UNDO_HISTORY)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` past snapshots.
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record `scene` as the state before a mutation.
    ///
    /// Clears the redo stack and evicts the oldest snapshot past the limit.
    pub fn push(&mut self, scene: &Scene) {
        self.past.push_back(scene.clone());
        self.future.clear();
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    /// Step back. Returns the snapshot to restore, or `None` if there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &Scene) -> Option<Scene> {
        let snapshot = self.past.pop_back()?;
        self.future.push(current.clone());
        Some(snapshot)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: &Scene) -> Option<Scene> {
        let snapshot = self.future.pop()?;
        self.past.push_back(current.clone());
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        Some(snapshot)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Forget every snapshot.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Element;

    fn scene_with(n: usize) -> Scene {
        Scene {
            elements: (0..n)
                .map(|i| Element {
                    id: format!("el-{i}"),
                    kind: "resistor".to_string(),
                    x: i as f64 * 10.0,
                    y: 0.0,
                    rot: 0.0,
                    label: String::new(),
                })
                .collect(),
            wires: Vec::new(),
        }
    }

    #[test]
    fn test_undo_empty_is_noop() {
        let mut history = History::default();
        assert!(history.undo(&Scene::new()).is_none());
        assert!(history.redo(&Scene::new()).is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::default();
        let before = scene_with(1);
        let after = scene_with(2);
        history.push(&before);

        let restored = history.undo(&after).unwrap();
        assert_eq!(restored, before);
        assert!(history.can_redo());

        let again = history.redo(&restored).unwrap();
        assert_eq!(again, after);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::default();
        history.push(&scene_with(0));
        history.undo(&scene_with(1));
        assert!(history.can_redo());
        history.push(&scene_with(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut history = History::new(3);
        for n in 0..5 {
            history.push(&scene_with(n));
        }
        assert_eq!(history.undo_depth(), 3);
        let mut current = scene_with(5);
        let mut oldest = None;
        while let Some(s) = history.undo(&current) {
            oldest = Some(s.clone());
            current = s;
        }
        assert_eq!(oldest.unwrap().elements.len(), 2);
    }

    #[test]
    fn test_snapshots_do_not_alias() {
        let mut history = History::default();
        let mut live = scene_with(1);
        history.push(&live);
        live.elements[0].x = 999.0;
        let restored = history.undo(&live).unwrap();
        assert_eq!(restored.elements[0].x, 0.0);
    }
}
