mod cell_edit;
mod history;

pub use cell_edit::CellEdit;
pub use history::{EditHistory, HistoryMap};
