use crate::band::{BandDataType, BandValue};
use crate::geometry::{CellCoord, MapPoint};

/// One reversible write of up to three band values into a single raster cell.
///
/// Records are immutable once created: undo and redo move the same record
/// between the two stacks of an [`super::EditHistory`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    old_values: Vec<BandValue>,
    new_values: Vec<BandValue>,
    cell: CellCoord,
    point: MapPoint,
    data_types: Vec<BandDataType>,
}

impl CellEdit {
    pub fn new(
        old_values: Vec<BandValue>,
        new_values: Vec<BandValue>,
        cell: CellCoord,
        point: MapPoint,
        data_types: Vec<BandDataType>,
    ) -> Self {
        Self {
            old_values,
            new_values,
            cell,
            point,
            data_types,
        }
    }

    /// Values the cell held before the edit, band 1 first
    pub fn old_values(&self) -> &[BandValue] {
        &self.old_values
    }

    /// Values written by the edit, band 1 first
    pub fn new_values(&self) -> &[BandValue] {
        &self.new_values
    }

    pub fn cell(&self) -> CellCoord {
        self.cell
    }

    pub fn x(&self) -> usize {
        self.cell.col
    }

    pub fn y(&self) -> usize {
        self.cell.row
    }

    /// Clicked point in the raster's coordinate reference system
    pub fn point(&self) -> MapPoint {
        self.point
    }

    /// Band data types at the time of the edit
    pub fn data_types(&self) -> &[BandDataType] {
        &self.data_types
    }

    pub fn band_count(&self) -> usize {
        self.new_values.len()
    }
}
