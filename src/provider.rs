use crate::band::BandValue;
use crate::error::{EditError, EditResult};
use crate::geometry::CellCoord;
use crate::layer::DataProvider;

/// Scoped editable state of a data provider.
///
/// `begin` switches the provider into editable state when it isn't already,
/// and dropping the session switches it back. The release happens on every
/// path out of the write, failed writes included.
pub struct EditSession<'a> {
    provider: &'a dyn DataProvider,
    acquired: bool,
}

impl<'a> EditSession<'a> {
    pub fn begin(provider: &'a dyn DataProvider) -> EditResult<Self> {
        let mut acquired = false;
        if !provider.is_editable() {
            if !provider.set_editable(true) {
                log::warn!("Provider refused to become editable");
                return Err(EditError::NotEditable);
            }
            acquired = true;
        }
        Ok(Self { provider, acquired })
    }

    /// Writes `value` into the cell of 1-based `band`.
    pub fn write(&self, band: usize, cell: CellCoord, value: BandValue) -> EditResult<()> {
        self.provider
            .write_cell(band, cell.col, cell.row, value)
            .map_err(|source| {
                log::warn!("Writing band {} at {} failed: {}", band, cell, source);
                EditError::WriteFailed { band, source }
            })
    }

    /// Writes one value per band, band 1 first, stopping at the first failure.
    pub fn write_bands(&self, cell: CellCoord, values: &[BandValue]) -> EditResult<()> {
        for (i, value) in values.iter().enumerate() {
            self.write(i + 1, cell, *value)?;
        }
        Ok(())
    }
}

impl Drop for EditSession<'_> {
    fn drop(&mut self) {
        if self.acquired && !self.provider.set_editable(false) {
            log::warn!("Provider did not leave editable state");
        }
    }
}
