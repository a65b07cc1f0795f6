use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::band::{BandDataType, BandValue};
use crate::crs::Crs;
use crate::geometry::{MapPoint, PixelSize, RasterBounds};

/// Identity of a map layer as assigned by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RasterId(String);

impl RasterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a unique id of the form `<name>_<uuid>`.
    pub fn generate(name: &str) -> Self {
        Self(format!("{}_{}", name, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RasterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for RasterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Raster,
    Vector,
    Other,
}

/// What a data provider allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProviderCapabilities {
    /// The provider can create and write raster blocks
    pub write: bool,
}

/// Range of values the user declared as NODATA in the layer's properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodataRange {
    pub min: f64,
    pub max: f64,
}

impl NodataRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn single(value: f64) -> Self {
        Self::new(value, value)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Band {0} does not exist")]
    NoSuchBand(usize),

    #[error("Cell {col},{row} is outside the raster")]
    CellOutOfRange { col: usize, row: usize },

    #[error("The provider is not in editable state")]
    NotEditable,

    #[error("The provider does not support writing")]
    ReadOnly,

    #[error("Write failed: {0}")]
    WriteFailed(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Value access to the storage behind a raster layer.
///
/// Bands are numbered from 1. Methods take `&self`: providers are handles
/// owned by the host.
pub trait DataProvider: Send + Sync {
    fn capabilities(&self) -> ProviderCapabilities;

    fn data_type(&self, band: usize) -> BandDataType;

    /// NODATA value stored in the raster source, if any
    fn source_nodata(&self, band: usize) -> Option<f64>;

    /// Additional NODATA ranges defined on the layer by the user
    fn user_nodata(&self, band: usize) -> Vec<NodataRange>;

    /// Makes rendering and identify honor the source NODATA value.
    fn set_use_source_nodata(&self, band: usize, use_source: bool);

    /// Writes a new source NODATA value.
    fn set_nodata(&self, band: usize, value: BandValue) -> ProviderResult<()>;

    fn is_editable(&self) -> bool;

    /// Switches the editable state, returning false when the host refuses.
    fn set_editable(&self, editable: bool) -> bool;

    /// Writes a single-cell block into `band` at `col`, `row`.
    fn write_cell(
        &self,
        band: usize,
        col: usize,
        row: usize,
        value: BandValue,
    ) -> ProviderResult<()>;

    /// Reads all band values at `point`.
    ///
    /// A band maps to `None` when the cell holds NODATA or no number.
    fn identify(&self, point: MapPoint) -> BTreeMap<usize, Option<f64>>;
}

/// A map layer as seen through the host's layer model
pub trait RasterLayer: Send + Sync {
    fn id(&self) -> RasterId;

    fn name(&self) -> String;

    fn kind(&self) -> LayerKind;

    fn is_valid(&self) -> bool;

    fn crs(&self) -> Option<Crs>;

    fn extent(&self) -> RasterBounds;

    fn pixel_size(&self) -> PixelSize;

    fn band_count(&self) -> usize;

    fn provider(&self) -> &dyn DataProvider;

    /// Asks the host to redraw the layer.
    fn trigger_repaint(&self);
}

pub type LayerRef = Arc<dyn RasterLayer>;

impl fmt::Debug for dyn RasterLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterLayer")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("bands", &self.band_count())
            .finish()
    }
}
