use crate::band::BandValue;
use crate::geometry::{CellCoord, MapPoint};
use crate::host::MapTool;
use crate::layer::RasterId;
use crate::tools::ToolMode;
use crate::widgets::{Rgb, ToolbarAction};

/// Input delivered by the host to the tool
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    ActiveLayerChanged,
    LayersAdded,
    /// Symbology or properties of a layer changed
    RendererChanged(RasterId),
    MapToolChanged(MapTool),
    /// Click on the canvas, in canvas coordinates
    CanvasClicked(MapPoint),
    Action(ToolbarAction),
    /// Enter pressed in a band spin box with `text` typed in
    SpinBoxCommitted { band: usize, text: String },
    /// Spin box value changed by arrows or dragging
    SpinBoxEdited { band: usize, value: f64 },
    ColorPicked(Rgb),
    /// Answer to the NODATA prompt, `None` when cancelled
    NodataSubmitted(Option<String>),
}

/// Changes the tool reports to its subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ModeChanged {
        old: ToolMode,
        new: ToolMode,
    },
    RasterActivated(RasterId),
    RasterReset,
    CellProbed {
        cell: CellCoord,
        values: Vec<Option<f64>>,
    },
    CellWritten {
        raster: RasterId,
        cell: CellCoord,
        values: Vec<BandValue>,
    },
    EditUndone {
        raster: RasterId,
        cell: CellCoord,
    },
    EditRedone {
        raster: RasterId,
        cell: CellCoord,
    },
    NodataPromptOpened,
    NodataChanged {
        raster: RasterId,
        value: BandValue,
    },
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
}
