use crate::band::{BandDataType, BandInfo, MAX_EDIT_BANDS};
use crate::crs::Crs;
use crate::geometry::{PixelSize, RasterBounds};
use crate::layer::{LayerKind, LayerRef, RasterId, RasterLayer};

/// The raster the tool is working on, with cached extent and band metadata
#[derive(Debug, Clone)]
pub struct ActiveRaster {
    layer: LayerRef,
    id: RasterId,
    crs: Crs,
    bounds: RasterBounds,
    pixel_size: PixelSize,
    bands: Vec<BandInfo>,
}

impl ActiveRaster {
    /// Accepts a layer the tool can edit: a valid raster with a writable
    /// provider and a reference system.
    pub fn accept(layer: LayerRef) -> Option<Self> {
        if !Self::is_editable_layer(layer.as_ref()) {
            return None;
        }
        let crs = layer.crs()?;
        Some(Self {
            id: layer.id(),
            crs,
            bounds: layer.extent(),
            pixel_size: layer.pixel_size(),
            bands: Vec::new(),
            layer,
        })
    }

    pub fn is_editable_layer(layer: &dyn RasterLayer) -> bool {
        layer.is_valid()
            && layer.kind() == LayerKind::Raster
            && layer.provider().capabilities().write
            && layer.crs().is_some()
    }

    /// First band among the edited ones whose data type can't be edited
    pub fn unsupported_type(layer: &dyn RasterLayer) -> Option<BandDataType> {
        (1..=edit_band_count(layer))
            .map(|band| layer.provider().data_type(band))
            .find(|data_type| !data_type.is_supported())
    }

    /// Re-reads extent, pixel size, data types and NODATA values from the layer.
    ///
    /// A source NODATA value is switched into use; without one, the lower end
    /// of the first user NODATA range stands in.
    pub fn refresh(&mut self) {
        let provider = self.layer.provider();
        self.bounds = self.layer.extent();
        self.pixel_size = self.layer.pixel_size();
        self.bands = (1..=edit_band_count(self.layer.as_ref()))
            .map(|band| {
                let nodata = match provider.source_nodata(band) {
                    Some(value) => {
                        provider.set_use_source_nodata(band, true);
                        Some(value)
                    }
                    None => provider.user_nodata(band).first().map(|range| range.min),
                };
                BandInfo {
                    band,
                    data_type: provider.data_type(band),
                    nodata,
                }
            })
            .collect();
    }

    pub fn layer(&self) -> &LayerRef {
        &self.layer
    }

    pub fn id(&self) -> &RasterId {
        &self.id
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn bounds(&self) -> &RasterBounds {
        &self.bounds
    }

    pub fn pixel_size(&self) -> PixelSize {
        self.pixel_size
    }

    pub fn bands(&self) -> &[BandInfo] {
        &self.bands
    }

    pub fn band_count(&self) -> usize {
        self.layer.band_count()
    }

    /// Current data types of the edited bands, straight from the provider
    pub fn current_data_types(&self) -> Vec<BandDataType> {
        (1..=edit_band_count(self.layer.as_ref()))
            .map(|band| self.layer.provider().data_type(band))
            .collect()
    }

    /// Raster has enough bands to be edited as RGB
    pub fn is_rgb(&self) -> bool {
        self.band_count() >= MAX_EDIT_BANDS
    }
}

fn edit_band_count(layer: &dyn RasterLayer) -> usize {
    layer.band_count().min(MAX_EDIT_BANDS)
}
