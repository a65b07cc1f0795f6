use std::collections::HashMap;

use super::CellEdit;
use crate::layer::RasterId;

/// Undo and redo stacks of cell edits for one raster
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    /// Edits that can be undone, most recent last
    undo_stack: Vec<CellEdit>,
    /// Edits that can be redone, most recent last
    redo_stack: Vec<CellEdit>,
}

impl EditHistory {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a fresh edit onto the undo stack.
    ///
    /// The redo stack is left alone: redo stays available after new edits.
    pub fn record(&mut self, edit: CellEdit) {
        self.undo_stack.push(edit);
    }

    /// Moves the most recent edit to the redo stack and returns it.
    ///
    /// The caller restores `old_values` of the returned edit.
    pub fn undo(&mut self) -> Option<&CellEdit> {
        let edit = self.undo_stack.pop()?;
        self.redo_stack.push(edit);
        self.redo_stack.last()
    }

    /// Moves the most recently undone edit back to the undo stack and returns it.
    ///
    /// The caller re-applies `new_values` of the returned edit.
    pub fn redo(&mut self) -> Option<&CellEdit> {
        let edit = self.redo_stack.pop()?;
        self.undo_stack.push(edit);
        self.undo_stack.last()
    }

    pub fn peek_undo(&self) -> Option<&CellEdit> {
        self.undo_stack.last()
    }

    pub fn peek_redo(&self) -> Option<&CellEdit> {
        self.redo_stack.last()
    }

    /// Returns true if there are edits that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[CellEdit] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[CellEdit] {
        &self.redo_stack
    }

    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Clear the history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Edit histories of every raster touched during the session.
///
/// A raster that has never been edited behaves like an empty history; its
/// entry is only created when the first edit is recorded.
#[derive(Debug, Clone, Default)]
pub struct HistoryMap {
    histories: HashMap<RasterId, EditHistory>,
    clear_redo_on_edit: bool,
}

impl HistoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// With `clear_redo_on_edit` set, recording an edit drops the raster's
    /// redo stack like most editors do.
    pub fn with_clear_redo_on_edit(clear_redo_on_edit: bool) -> Self {
        Self {
            histories: HashMap::new(),
            clear_redo_on_edit,
        }
    }

    pub fn set_clear_redo_on_edit(&mut self, clear_redo_on_edit: bool) {
        self.clear_redo_on_edit = clear_redo_on_edit;
    }

    pub fn record_edit(&mut self, raster: &RasterId, edit: CellEdit) {
        let history = self.histories.entry(raster.clone()).or_default();
        if self.clear_redo_on_edit {
            history.clear_redo();
        }
        let cell = edit.cell();
        history.record(edit);
        log::debug!(
            "Recorded edit at {} on {} (undo depth {})",
            cell,
            raster,
            history.undo_stack().len()
        );
    }

    pub fn undo(&mut self, raster: &RasterId) -> Option<&CellEdit> {
        self.histories.get_mut(raster)?.undo()
    }

    pub fn redo(&mut self, raster: &RasterId) -> Option<&CellEdit> {
        self.histories.get_mut(raster)?.redo()
    }

    pub fn peek_undo(&self, raster: &RasterId) -> Option<&CellEdit> {
        self.histories.get(raster)?.peek_undo()
    }

    pub fn peek_redo(&self, raster: &RasterId) -> Option<&CellEdit> {
        self.histories.get(raster)?.peek_redo()
    }

    pub fn has_undo(&self, raster: &RasterId) -> bool {
        self.histories.get(raster).is_some_and(EditHistory::can_undo)
    }

    pub fn has_redo(&self, raster: &RasterId) -> bool {
        self.histories.get(raster).is_some_and(EditHistory::can_redo)
    }

    pub fn history(&self, raster: &RasterId) -> Option<&EditHistory> {
        self.histories.get(raster)
    }

    /// Drops the history of one raster, e.g. after the layer was removed.
    pub fn forget(&mut self, raster: &RasterId) -> Option<EditHistory> {
        self.histories.remove(raster)
    }

    pub fn clear(&mut self) {
        self.histories.clear();
    }

    /// Number of rasters with a recorded history
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::{BandDataType, BandValue};
    use crate::geometry::{CellCoord, MapPoint};

    fn edit(old: i64, new: i64) -> CellEdit {
        CellEdit::new(
            vec![BandValue::Int(old)],
            vec![BandValue::Int(new)],
            CellCoord::new(2, 3),
            MapPoint::new(2.5, 6.5),
            vec![BandDataType::Byte],
        )
    }

    #[test]
    fn empty_history_undo_and_redo_are_noops() {
        let mut history = EditHistory::new();
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(history.undo_stack().is_empty());
        assert!(history.redo_stack().is_empty());
    }

    #[test]
    fn undo_moves_record_to_redo_stack() {
        let mut history = EditHistory::new();
        history.record(edit(5, 42));

        let undone = history.undo().cloned().unwrap();
        assert_eq!(undone.old_values(), &[BandValue::Int(5)]);
        assert_eq!(history.undo_stack().len(), 0);
        assert_eq!(history.redo_stack().len(), 1);

        let redone = history.redo().cloned().unwrap();
        assert_eq!(redone, undone);
        assert_eq!(history.undo_stack().len(), 1);
        assert_eq!(history.redo_stack().len(), 0);
    }

    #[test]
    fn new_edit_keeps_redo_stack_by_default() {
        let mut history = EditHistory::new();
        history.record(edit(1, 2));
        history.undo();
        history.record(edit(1, 3));
        assert!(history.can_redo());
        assert_eq!(history.undo_stack().len(), 1);
    }

    #[test]
    fn map_defaults_to_empty_histories() {
        let map = HistoryMap::new();
        let raster = RasterId::from("unseen");
        assert!(!map.has_undo(&raster));
        assert!(!map.has_redo(&raster));
        assert!(map.is_empty());
    }

    #[test]
    fn map_keeps_histories_apart() {
        let mut map = HistoryMap::new();
        let a = RasterId::from("a");
        let b = RasterId::from("b");
        map.record_edit(&a, edit(0, 1));

        assert!(map.has_undo(&a));
        assert!(!map.has_undo(&b));
        assert!(map.undo(&b).is_none());
        assert!(map.undo(&a).is_some());
        assert!(map.has_redo(&a));
        assert!(!map.has_redo(&b));
    }

    #[test]
    fn clear_redo_on_edit_opt_in() {
        let mut map = HistoryMap::with_clear_redo_on_edit(true);
        let raster = RasterId::from("r");
        map.record_edit(&raster, edit(0, 1));
        map.undo(&raster);
        assert!(map.has_redo(&raster));

        map.record_edit(&raster, edit(0, 2));
        assert!(!map.has_redo(&raster));
    }
}
