#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod band;
pub mod command;
pub mod components;
pub mod config;
pub mod crs;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;
pub mod layer;
pub mod memory;
pub mod notify;
pub mod panels;
pub mod provider;
pub mod tools;
pub mod util;
pub mod widgets;

pub use app::{RasterEditApp, demo_layers};
pub use band::{BandDataType, BandInfo, BandValue, NumericDomain};
pub use command::{CellEdit, EditHistory, HistoryMap};
pub use config::EditorConfig;
pub use error::{EditError, EditResult};
pub use geometry::{CellCoord, MapPoint, PixelSize, RasterBounds, cell_at};
pub use host::{MapHost, MapTool};
pub use layer::{DataProvider, LayerRef, RasterId, RasterLayer};
pub use tools::{CellEditTool, ToolMode};
