//! In-memory raster layers and map host.
//!
//! Used by the demo application and the tests. Cell values live in plain
//! vectors guarded by a [`parking_lot::Mutex`], so layer handles can be shared
//! between the tool and the GUI.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::band::{BandDataType, BandValue};
use crate::crs::{BuiltinTransformer, CoordinateTransformer, Crs, TransformError};
use crate::geometry::{MapPoint, PixelSize, RasterBounds, cell_at};
use crate::host::{MapHost, MapTool};
use crate::layer::{
    DataProvider, LayerKind, LayerRef, NodataRange, ProviderCapabilities, ProviderError,
    ProviderResult, RasterId, RasterLayer,
};
use crate::notify::{Notice, Notifier};

#[derive(Debug, Clone)]
struct MemoryBand {
    data_type: BandDataType,
    values: Vec<f64>,
    source_nodata: Option<f64>,
    use_source_nodata: bool,
    user_nodata: Vec<NodataRange>,
}

impl MemoryBand {
    fn is_nodata(&self, value: f64) -> bool {
        let source = self.use_source_nodata
            && self
                .source_nodata
                .is_some_and(|nd| nd == value || (nd.is_nan() && value.is_nan()));
        source || self.user_nodata.iter().any(|r| r.min <= value && value <= r.max)
    }
}

#[derive(Debug)]
struct ProviderState {
    bands: Vec<MemoryBand>,
    editable: bool,
    refuse_editable: bool,
    failing_band: Option<usize>,
    failing_nodata: bool,
}

/// Data provider storing every band as a row-major vector of `f64`
#[derive(Debug)]
pub struct MemoryProvider {
    width: usize,
    height: usize,
    bounds: RasterBounds,
    pixel_size: PixelSize,
    capabilities: ProviderCapabilities,
    state: Mutex<ProviderState>,
}

impl MemoryProvider {
    fn new(width: usize, height: usize, bounds: RasterBounds, data_types: &[BandDataType]) -> Self {
        let bands = data_types
            .iter()
            .map(|data_type| MemoryBand {
                data_type: *data_type,
                values: vec![0.0; width * height],
                source_nodata: None,
                use_source_nodata: true,
                user_nodata: Vec::new(),
            })
            .collect();
        Self {
            width,
            height,
            bounds,
            pixel_size: PixelSize::new(
                bounds.width() / width.max(1) as f64,
                bounds.height() / height.max(1) as f64,
            ),
            capabilities: ProviderCapabilities { write: true },
            state: Mutex::new(ProviderState {
                bands,
                editable: false,
                refuse_editable: false,
                failing_band: None,
                failing_nodata: false,
            }),
        }
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.width && row < self.height).then(|| row * self.width + col)
    }

    /// Value stored in `band` at `col`, `row`
    pub fn value(&self, band: usize, col: usize, row: usize) -> Option<f64> {
        let index = self.index(col, row)?;
        let state = self.state.lock();
        state.bands.get(band.checked_sub(1)?)?.values.get(index).copied()
    }

    /// Sets a value directly, bypassing editable state.
    pub fn set_value(&self, band: usize, col: usize, row: usize, value: f64) {
        let Some(index) = self.index(col, row) else {
            return;
        };
        let mut state = self.state.lock();
        if let Some(band) = band.checked_sub(1).and_then(|i| state.bands.get_mut(i)) {
            band.values[index] = value;
        }
    }

    /// Fills every cell of `band` with `value`.
    pub fn fill(&self, band: usize, value: f64) {
        let mut state = self.state.lock();
        if let Some(band) = band.checked_sub(1).and_then(|i| state.bands.get_mut(i)) {
            band.values.fill(value);
        }
    }

    pub fn set_source_nodata(&self, band: usize, value: Option<f64>) {
        let mut state = self.state.lock();
        if let Some(band) = band.checked_sub(1).and_then(|i| state.bands.get_mut(i)) {
            band.source_nodata = value;
        }
    }

    pub fn add_user_nodata(&self, band: usize, range: NodataRange) {
        let mut state = self.state.lock();
        if let Some(band) = band.checked_sub(1).and_then(|i| state.bands.get_mut(i)) {
            band.user_nodata.push(range);
        }
    }

    /// Changes the data type of a band behind the tool's back.
    pub fn set_data_type(&self, band: usize, data_type: BandDataType) {
        let mut state = self.state.lock();
        if let Some(band) = band.checked_sub(1).and_then(|i| state.bands.get_mut(i)) {
            band.data_type = data_type;
        }
    }

    /// Makes the provider refuse to become editable.
    pub fn refuse_editable(&self, refuse: bool) {
        self.state.lock().refuse_editable = refuse;
    }

    /// Makes every write into `band` fail.
    pub fn fail_writes_on(&self, band: Option<usize>) {
        self.state.lock().failing_band = band;
    }

    pub fn fail_nodata_writes(&self, fail: bool) {
        self.state.lock().failing_nodata = fail;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl DataProvider for MemoryProvider {
    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    fn data_type(&self, band: usize) -> BandDataType {
        let state = self.state.lock();
        band.checked_sub(1)
            .and_then(|i| state.bands.get(i))
            .map_or(BandDataType::Unknown, |b| b.data_type)
    }

    fn source_nodata(&self, band: usize) -> Option<f64> {
        let state = self.state.lock();
        state.bands.get(band.checked_sub(1)?)?.source_nodata
    }

    fn user_nodata(&self, band: usize) -> Vec<NodataRange> {
        let state = self.state.lock();
        band.checked_sub(1)
            .and_then(|i| state.bands.get(i))
            .map(|b| b.user_nodata.clone())
            .unwrap_or_default()
    }

    fn set_use_source_nodata(&self, band: usize, use_source: bool) {
        let mut state = self.state.lock();
        if let Some(band) = band.checked_sub(1).and_then(|i| state.bands.get_mut(i)) {
            band.use_source_nodata = use_source;
        }
    }

    fn set_nodata(&self, band: usize, value: BandValue) -> ProviderResult<()> {
        if !self.capabilities.write {
            return Err(ProviderError::ReadOnly);
        }
        let mut state = self.state.lock();
        if state.failing_nodata {
            return Err(ProviderError::WriteFailed("NODATA is read-only".to_owned()));
        }
        let band_data = band
            .checked_sub(1)
            .and_then(|i| state.bands.get_mut(i))
            .ok_or(ProviderError::NoSuchBand(band))?;
        band_data.source_nodata = Some(value.as_f64());
        Ok(())
    }

    fn is_editable(&self) -> bool {
        self.state.lock().editable
    }

    fn set_editable(&self, editable: bool) -> bool {
        let mut state = self.state.lock();
        if editable && (state.refuse_editable || !self.capabilities.write) {
            return false;
        }
        state.editable = editable;
        true
    }

    fn write_cell(
        &self,
        band: usize,
        col: usize,
        row: usize,
        value: BandValue,
    ) -> ProviderResult<()> {
        if !self.capabilities.write {
            return Err(ProviderError::ReadOnly);
        }
        let index = self
            .index(col, row)
            .ok_or(ProviderError::CellOutOfRange { col, row })?;
        let mut state = self.state.lock();
        if !state.editable {
            return Err(ProviderError::NotEditable);
        }
        if state.failing_band == Some(band) {
            return Err(ProviderError::WriteFailed(format!("band {band} is locked")));
        }
        let band_data = band
            .checked_sub(1)
            .and_then(|i| state.bands.get_mut(i))
            .ok_or(ProviderError::NoSuchBand(band))?;
        band_data.values[index] = value.as_f64();
        Ok(())
    }

    fn identify(&self, point: MapPoint) -> BTreeMap<usize, Option<f64>> {
        let cell = cell_at(&self.bounds, self.pixel_size, point)
            .ok()
            .and_then(|cell| self.index(cell.col, cell.row));
        let state = self.state.lock();
        state
            .bands
            .iter()
            .enumerate()
            .map(|(i, band)| {
                let value = cell
                    .map(|index| band.values[index])
                    .filter(|value| !value.is_nan() && !band.is_nodata(*value));
                (i + 1, value)
            })
            .collect()
    }
}

/// A raster layer held entirely in memory
#[derive(Debug)]
pub struct MemoryRaster {
    id: RasterId,
    name: String,
    kind: LayerKind,
    valid: bool,
    crs: Option<Crs>,
    provider: MemoryProvider,
    repaints: AtomicUsize,
}

impl MemoryRaster {
    pub fn new(
        name: &str,
        width: usize,
        height: usize,
        bounds: RasterBounds,
        data_types: &[BandDataType],
        crs: Option<Crs>,
    ) -> Self {
        Self {
            id: RasterId::generate(name),
            name: name.to_owned(),
            kind: LayerKind::Raster,
            valid: true,
            crs,
            provider: MemoryProvider::new(width, height, bounds, data_types),
            repaints: AtomicUsize::new(0),
        }
    }

    /// Raster with one cell per map unit and its south-west corner at the origin
    pub fn unit_grid(name: &str, width: usize, height: usize, data_types: &[BandDataType]) -> Self {
        let bounds = RasterBounds::new(0.0, 0.0, width as f64, height as f64);
        Self::new(name, width, height, bounds, data_types, Some(Crs::new("EPSG:32634")))
    }

    /// Three Byte bands holding the red, green and blue channels of `image`
    pub fn from_rgb_image(
        name: &str,
        image: &image::RgbImage,
        bounds: RasterBounds,
        crs: Crs,
    ) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let raster = Self::new(name, width, height, bounds, &[BandDataType::Byte; 3], Some(crs));
        for (x, y, pixel) in image.enumerate_pixels() {
            for (band, channel) in pixel.0.iter().enumerate() {
                raster
                    .provider
                    .set_value(band + 1, x as usize, y as usize, f64::from(*channel));
            }
        }
        raster
    }

    /// Marks the layer as some other layer type, e.g. a vector layer.
    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Disables writing on the provider.
    pub fn read_only(mut self) -> Self {
        self.provider.capabilities.write = false;
        self
    }

    pub fn memory_provider(&self) -> &MemoryProvider {
        &self.provider
    }

    pub fn repaint_count(&self) -> usize {
        self.repaints.load(Ordering::Relaxed)
    }

    pub fn into_ref(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl RasterLayer for MemoryRaster {
    fn id(&self) -> RasterId {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn crs(&self) -> Option<Crs> {
        self.crs.clone()
    }

    fn extent(&self) -> RasterBounds {
        self.provider.bounds
    }

    fn pixel_size(&self) -> PixelSize {
        self.provider.pixel_size
    }

    fn band_count(&self) -> usize {
        self.provider.state.lock().bands.len()
    }

    fn provider(&self) -> &dyn DataProvider {
        &self.provider
    }

    fn trigger_repaint(&self) {
        self.repaints.fetch_add(1, Ordering::Relaxed);
    }
}

/// Map host keeping its layers, notices and map tool in memory
#[derive(Debug)]
pub struct MemoryHost {
    layers: Vec<LayerRef>,
    active: Option<usize>,
    canvas_crs: Crs,
    transformer: BuiltinTransformer,
    map_tool: MapTool,
    notices: Vec<Notice>,
    opened_urls: Vec<String>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(Crs::new("EPSG:32634"))
    }
}

impl MemoryHost {
    pub fn new(canvas_crs: Crs) -> Self {
        Self {
            layers: Vec::new(),
            active: None,
            canvas_crs,
            transformer: BuiltinTransformer,
            map_tool: MapTool::Pan,
            notices: Vec::new(),
            opened_urls: Vec::new(),
        }
    }

    /// Adds a layer and makes it the active one.
    pub fn add_layer(&mut self, layer: LayerRef) {
        log::info!("Adding layer {}", layer.name());
        self.layers.push(layer);
        self.active = Some(self.layers.len() - 1);
    }

    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = index.filter(|i| *i < self.layers.len());
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn layers(&self) -> &[LayerRef] {
        &self.layers
    }

    pub fn set_canvas_crs(&mut self, crs: Crs) {
        self.canvas_crs = crs;
    }

    pub fn map_tool(&self) -> &MapTool {
        &self.map_tool
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn opened_urls(&self) -> &[String] {
        &self.opened_urls
    }

    pub fn take_opened_urls(&mut self) -> Vec<String> {
        std::mem::take(&mut self.opened_urls)
    }
}

impl Notifier for MemoryHost {
    fn notify(&mut self, notice: Notice) {
        log::debug!("Notice: {}", notice.text);
        self.notices.push(notice);
    }
}

impl MapHost for MemoryHost {
    fn active_layer(&self) -> Option<LayerRef> {
        self.active.and_then(|i| self.layers.get(i)).cloned()
    }

    fn canvas_crs(&self) -> Crs {
        self.canvas_crs.clone()
    }

    fn transform(&self, point: MapPoint, from: &Crs, to: &Crs) -> Result<MapPoint, TransformError> {
        self.transformer.transform(point, from, to)
    }

    fn set_map_tool(&mut self, tool: MapTool) {
        self.map_tool = tool;
    }

    fn open_url(&mut self, url: &str) {
        self.opened_urls.push(url.to_owned());
    }
}
