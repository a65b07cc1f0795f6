use thiserror::Error;

use crate::band::BandDataType;
use crate::config::NoticeDurations;
use crate::crs::TransformError;
use crate::geometry::{Axis, OutOfBounds};
use crate::layer::ProviderError;
use crate::notify::Notice;

/// Everything that can stop a cell read, write, undo or NODATA change.
///
/// None of these leave the tool: [`EditError::notice`] turns each into the
/// message the user sees.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EditError {
    #[error("Choose a raster to work with...")]
    NoActiveRaster,

    #[error("Select a raster layer to define/change NoData value!")]
    NoRasterForNodata,

    #[error("The raster data type is: {0}.\nThe cell editor can't work with it, sorry!")]
    UnsupportedDataType(BandDataType),

    #[error("Out of {0} bounds")]
    OutOfBounds(Axis),

    #[error(
        "NODATA value is not defined for one of the raster's bands.\n\
         Please define it in raster properties dialog!"
    )]
    MissingNodata { band: usize },

    #[error("Point coordinates transformation failed! Check the raster projection:\n\n{0}")]
    Transform(#[from] TransformError),

    #[error("The host can't modify this type of raster")]
    NotEditable,

    #[error("The raster has no coordinate reference system, cells can't be located")]
    MissingCrs,

    #[error("The host can't modify this type of raster")]
    WriteFailed { band: usize, source: ProviderError },

    #[error("Band {band} has no value at the clicked cell")]
    UnreadableCell { band: usize },

    #[error("Wrong NODATA value!")]
    InvalidNodata(String),

    #[error("Setting new NODATA value failed!")]
    NodataNotSet,

    #[error(
        "Band {band} changed its data type from {recorded} to {current}, \
         the edit can't be replayed"
    )]
    BandTypeChanged {
        band: usize,
        recorded: BandDataType,
        current: BandDataType,
    },
}

pub type EditResult<T> = Result<T, EditError>;

impl From<OutOfBounds> for EditError {
    fn from(err: OutOfBounds) -> Self {
        EditError::OutOfBounds(err.0)
    }
}

impl EditError {
    /// The notice shown for this error
    pub fn notice(&self, durations: &NoticeDurations) -> Notice {
        let text = self.to_string();
        match self {
            Self::OutOfBounds(_) => Notice::bar_info(text, durations.info()),
            Self::NoActiveRaster | Self::NoRasterForNodata | Self::UnreadableCell { .. } => {
                Notice::bar_warn(text, durations.warn())
            }
            Self::Transform(_) => Notice::bar_warn(text, durations.transform_warn()),
            Self::UnsupportedDataType(_)
            | Self::MissingNodata { .. }
            | Self::NotEditable
            | Self::MissingCrs
            | Self::WriteFailed { .. }
            | Self::InvalidNodata(_)
            | Self::NodataNotSet
            | Self::BandTypeChanged { .. } => Notice::show_warn(text),
        }
    }
}
