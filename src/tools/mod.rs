mod active_raster;
mod cell_edit_tool;

pub use active_raster::ActiveRaster;
pub use cell_edit_tool::{CellEditTool, NodataPrompt};

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a click on the canvas does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Read the cell values into the band spin boxes
    #[default]
    Probe,
    /// Write the spin box values into the cell
    Draw,
    /// Write each band's NODATA value into the cell
    SetNodata,
}

impl ToolMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Probe => "probe",
            Self::Draw => "draw",
            Self::SetNodata => "set_nodata",
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
