use crate::crs::{Crs, TransformError};
use crate::geometry::MapPoint;
use crate::layer::LayerRef;
use crate::notify::Notifier;
use crate::tools::ToolMode;

/// Map tool installed on the host's canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapTool {
    /// The host's own pan tool
    Pan,
    /// One of the cell editing modes
    Cell(ToolMode),
    /// Any other tool, by name
    Other(String),
}

/// Services the hosting application provides to the cell editing tool
pub trait MapHost: Notifier {
    /// The layer currently selected in the host's layer tree
    fn active_layer(&self) -> Option<LayerRef>;

    /// Reference system the map canvas renders in
    fn canvas_crs(&self) -> Crs;

    fn transform(&self, point: MapPoint, from: &Crs, to: &Crs) -> Result<MapPoint, TransformError>;

    fn set_map_tool(&mut self, tool: MapTool);

    fn open_url(&mut self, url: &str);
}
