use crate::band::{BandDataType, BandValue};
use crate::command::{CellEdit, HistoryMap};
use crate::config::EditorConfig;
use crate::error::{EditError, EditResult};
use crate::event::{EditorEvent, EventBus, HostEvent};
use crate::geometry::{CellCoord, MapPoint, cell_at};
use crate::host::{MapHost, MapTool};
use crate::layer::{LayerKind, LayerRef};
use crate::notify::{Notice, Notifier};
use crate::provider::EditSession;
use crate::util::number::parse_number;
use crate::widgets::{Rgb, Toolbar, ToolbarAction};

use super::{ActiveRaster, ToolMode};

/// Open "Define NODATA Value" dialog
#[derive(Debug, Clone, PartialEq)]
pub struct NodataPrompt {
    pub title: String,
    pub label: String,
    /// Text the input starts with: the current source NODATA value, if any
    pub initial: String,
    /// Type of band 1, used to interpret the answer
    pub data_type: BandDataType,
}

/// Map tool for reading and writing single raster cells.
///
/// The host drives it through [`CellEditTool::setup`],
/// [`CellEditTool::handle_event`] and [`CellEditTool::teardown`]. Every
/// failure is turned into a notice for the user at the event boundary.
#[derive(Debug)]
pub struct CellEditTool<H: MapHost> {
    host: H,
    config: EditorConfig,
    toolbar: Toolbar,
    mode: ToolMode,
    raster: Option<ActiveRaster>,
    /// Last clicked point, in the reference system of the raster
    last_point: Option<MapPoint>,
    history: HistoryMap,
    event_bus: EventBus,
    nodata_prompt: Option<NodataPrompt>,
}

impl<H: MapHost> CellEditTool<H> {
    pub fn new(host: H, config: EditorConfig) -> Self {
        Self {
            host,
            toolbar: Toolbar::new(config.toolbar_title.clone()),
            history: HistoryMap::with_clear_redo_on_edit(config.clear_redo_on_edit),
            config,
            mode: ToolMode::Probe,
            raster: None,
            last_point: None,
            event_bus: EventBus::new(),
            nodata_prompt: None,
        }
    }

    /// Registers the toolbar and picks up the host's active layer.
    pub fn setup(&mut self) {
        log::info!("Setting up {}", self.config.toolbar_title);
        self.toolbar.register();
        let result = self.set_active_raster();
        self.report(result);
        self.check_undo_redo();
    }

    /// Hands the canvas back to the pan tool and drops all session state.
    pub fn teardown(&mut self) {
        log::info!("Tearing down {}", self.config.toolbar_title);
        self.host.set_map_tool(MapTool::Pan);
        self.toolbar.unregister();
        self.raster = None;
        self.last_point = None;
        self.nodata_prompt = None;
        self.history.clear();
    }

    /// Dispatches one host event.
    pub fn handle_event(&mut self, event: HostEvent) {
        log::debug!("Handling {:?}", event);
        let result = match event {
            HostEvent::ActiveLayerChanged | HostEvent::LayersAdded => self.set_active_raster(),
            HostEvent::RendererChanged(id) => {
                if self.raster.as_ref().is_some_and(|r| *r.id() == id) {
                    self.prepare_raster();
                }
                Ok(())
            }
            HostEvent::MapToolChanged(tool) => {
                self.check_active_tool(&tool);
                Ok(())
            }
            HostEvent::CanvasClicked(point) => self.point_clicked(Some(point)),
            HostEvent::Action(action) => self.trigger(action),
            HostEvent::SpinBoxCommitted { band, text } => self.commit_spin_box(band, &text),
            HostEvent::SpinBoxEdited { band, value } => {
                if let Some(sbox) = self.toolbar.spin_box_mut(band) {
                    sbox.set_value(value);
                }
                Ok(())
            }
            HostEvent::ColorPicked(color) => {
                self.set_rgb_from_picker(color);
                Ok(())
            }
            HostEvent::NodataSubmitted(input) => self.submit_nodata(input.as_deref()),
        };
        self.report(result);
    }

    /// Runs a toolbar action. Disabled actions are ignored.
    pub fn trigger(&mut self, action: ToolbarAction) -> EditResult<()> {
        if !self.toolbar.is_enabled(action) {
            log::debug!("Ignoring disabled action {}", action);
            return Ok(());
        }
        match action {
            ToolbarAction::ShowToolbar => {
                self.toolbar.show();
                Ok(())
            }
            ToolbarAction::Probe => {
                self.activate_mode(ToolMode::Probe);
                Ok(())
            }
            ToolbarAction::Draw => {
                self.activate_mode(ToolMode::Draw);
                Ok(())
            }
            ToolbarAction::SetNodata => {
                self.activate_mode(ToolMode::SetNodata);
                Ok(())
            }
            ToolbarAction::DefineNodata => self.begin_define_nodata(),
            ToolbarAction::Undo => self.undo(),
            ToolbarAction::Redo => self.redo(),
            ToolbarAction::Help => {
                let url = self.config.help_url.clone();
                self.host.open_url(&url);
                Ok(())
            }
        }
    }

    pub fn activate_mode(&mut self, mode: ToolMode) {
        let old = self.mode;
        self.mode = mode;
        self.host.set_map_tool(MapTool::Cell(mode));
        self.toolbar.set_checked_mode(Some(mode));
        log::info!("Switched to {} mode", mode);
        self.event_bus.emit(EditorEvent::ModeChanged { old, new: mode });
    }

    /// Unchecks the mode buttons when the host switched to a foreign map tool.
    fn check_active_tool(&mut self, tool: &MapTool) {
        if !matches!(tool, MapTool::Cell(_)) {
            self.toolbar.set_checked_mode(None);
        }
    }

    /// Reads or writes the cell under `point`, depending on the mode.
    ///
    /// `point` is in canvas coordinates. Without a point the last clicked
    /// position is used again.
    pub fn point_clicked(&mut self, point: Option<MapPoint>) -> EditResult<()> {
        let raster = self.raster.clone().ok_or(EditError::NoActiveRaster)?;

        let pos = match point {
            Some(point) => {
                let canvas_crs = self.host.canvas_crs();
                if canvas_crs == *raster.crs() {
                    point
                } else {
                    self.host.transform(point, &canvas_crs, raster.crs())?
                }
            }
            None => match self.last_point {
                Some(last) => last,
                None => return Ok(()),
            },
        };
        self.last_point = Some(pos);

        let cell = cell_at(raster.bounds(), raster.pixel_size(), pos)?;
        let identified = raster.layer().provider().identify(pos);
        let values: Vec<Option<f64>> = raster
            .bands()
            .iter()
            .map(|info| identified.get(&info.band).copied().flatten())
            .collect();

        if self.mode == ToolMode::SetNodata {
            if let Some(info) = raster.bands().iter().find(|info| info.nodata.is_none()) {
                return Err(EditError::MissingNodata { band: info.band });
            }
        }

        match self.mode {
            ToolMode::Probe => {
                for (info, value) in raster.bands().iter().zip(&values) {
                    let shown = value.or(info.nodata);
                    let sbox = self.toolbar.spin_box_mut(info.band);
                    if let (Some(shown), Some(sbox)) = (shown, sbox) {
                        sbox.set_value(shown);
                    }
                }
                self.event_bus.emit(EditorEvent::CellProbed { cell, values });
            }
            ToolMode::Draw | ToolMode::SetNodata => {
                let old_values = raster
                    .bands()
                    .iter()
                    .zip(&values)
                    .map(|(info, value)| match value.or(info.nodata) {
                        Some(v) => Ok(BandValue::coerce(info.data_type, v)),
                        // An empty float cell holds NaN, which undo writes back
                        None if !info.data_type.is_integral() => Ok(BandValue::Float(f64::NAN)),
                        None => Err(EditError::UnreadableCell { band: info.band }),
                    })
                    .collect::<EditResult<Vec<_>>>()?;

                let new_values = raster
                    .bands()
                    .iter()
                    .map(|info| {
                        if self.mode == ToolMode::SetNodata {
                            info.nodata_value()
                                .ok_or(EditError::MissingNodata { band: info.band })
                        } else {
                            let value = self
                                .toolbar
                                .spin_box(info.band)
                                .map(|sbox| sbox.value())
                                .unwrap_or_default();
                            Ok(BandValue::coerce(info.data_type, value))
                        }
                    })
                    .collect::<EditResult<Vec<_>>>()?;

                let data_types = raster.bands().iter().map(|info| info.data_type).collect();
                self.write_cell_values(&raster, cell, &new_values)?;

                let edit = CellEdit::new(old_values, new_values.clone(), cell, pos, data_types);
                self.history.record_edit(raster.id(), edit);
                self.event_bus.emit(EditorEvent::CellWritten {
                    raster: raster.id().clone(),
                    cell,
                    values: new_values,
                });
                self.prepare_raster();
                self.check_undo_redo();
            }
        }

        self.sync_color_button();
        Ok(())
    }

    /// Writes one value per band into `cell`, releasing the provider's
    /// editable state whatever happens.
    fn write_cell_values(
        &self,
        raster: &ActiveRaster,
        cell: CellCoord,
        values: &[BandValue],
    ) -> EditResult<()> {
        {
            let session = EditSession::begin(raster.layer().provider())?;
            session.write_bands(cell, values)?;
        }
        raster.layer().trigger_repaint();
        log::info!("Wrote {:?} at {} on {}", values, cell, raster.id());
        Ok(())
    }

    /// Keeps the color button in line with the first three spin boxes.
    fn sync_color_button(&mut self) {
        if !self.raster.as_ref().is_some_and(ActiveRaster::is_rgb) {
            return;
        }
        let [r, g, b] = [1, 2, 3].map(|band| {
            self.toolbar
                .spin_box(band)
                .map(|sbox| sbox.value())
                .unwrap_or_default()
        });
        self.toolbar.color_button_mut().color = Rgb::from_values(r, g, b);
    }

    /// Sets band 1-3 spin boxes from a color picked in the color button.
    pub fn set_rgb_from_picker(&mut self, color: Rgb) {
        for (band, channel) in [(1, color.r), (2, color.g), (3, color.b)] {
            if let Some(sbox) = self.toolbar.spin_box_mut(band) {
                sbox.set_value(f64::from(channel));
            }
        }
        self.toolbar.color_button_mut().color = color;
    }

    /// Enter pressed in a spin box: takes the typed value and writes the
    /// spin box values at the last clicked point, as in draw mode.
    pub fn commit_spin_box(&mut self, band: usize, text: &str) -> EditResult<()> {
        let Some(sbox) = self.toolbar.spin_box_mut(band) else {
            return Ok(());
        };
        if sbox.commit_text(text).is_none() {
            log::debug!("Ignoring non-numeric input {:?} for band {}", text, band);
            return Ok(());
        }
        if self.last_point.is_none() {
            return Ok(());
        }

        let previous = self.mode;
        self.mode = ToolMode::Draw;
        let result = self.point_clicked(None);
        self.mode = previous;
        result
    }

    /// Restores the values the most recent edit of the active raster overwrote.
    pub fn undo(&mut self) -> EditResult<()> {
        let raster = self.raster.clone().ok_or(EditError::NoActiveRaster)?;
        let Some(edit) = self.history.peek_undo(raster.id()).cloned() else {
            return Ok(());
        };
        check_band_types(&raster, &edit)?;
        self.write_cell_values(&raster, edit.cell(), edit.old_values())?;
        self.history.undo(raster.id());
        self.event_bus.emit(EditorEvent::EditUndone {
            raster: raster.id().clone(),
            cell: edit.cell(),
        });
        self.prepare_raster();
        self.check_undo_redo();
        Ok(())
    }

    /// Writes the values of the most recently undone edit again.
    pub fn redo(&mut self) -> EditResult<()> {
        let raster = self.raster.clone().ok_or(EditError::NoActiveRaster)?;
        let Some(edit) = self.history.peek_redo(raster.id()).cloned() else {
            return Ok(());
        };
        check_band_types(&raster, &edit)?;
        self.write_cell_values(&raster, edit.cell(), edit.new_values())?;
        self.history.redo(raster.id());
        self.event_bus.emit(EditorEvent::EditRedone {
            raster: raster.id().clone(),
            cell: edit.cell(),
        });
        self.prepare_raster();
        self.check_undo_redo();
        Ok(())
    }

    /// Opens the NODATA prompt for the active raster.
    pub fn begin_define_nodata(&mut self) -> EditResult<()> {
        let raster = self.raster.clone().ok_or(EditError::NoRasterForNodata)?;
        let provider = raster.layer().provider();

        let note = if provider.user_nodata(1).is_empty() {
            ""
        } else {
            "\nNote: there is a user defined NODATA value.\n\
             Check the raster properties (Transparency)."
        };
        let data_type = provider.data_type(1);
        let initial = match provider.source_nodata(1) {
            Some(value) if data_type.is_integral() => format!("{}", value.trunc() as i64),
            Some(value) => value.to_string(),
            None => String::new(),
        };

        self.nodata_prompt = Some(NodataPrompt {
            title: "Define NODATA Value".to_owned(),
            label: format!(
                "Define/change raster NODATA value.\n\nRaster data type: {}.{}",
                data_type.name(),
                note
            ),
            initial,
            data_type,
        });
        self.event_bus.emit(EditorEvent::NodataPromptOpened);
        Ok(())
    }

    /// Answers the NODATA prompt. `None` cancels it.
    pub fn submit_nodata(&mut self, input: Option<&str>) -> EditResult<()> {
        let Some(prompt) = self.nodata_prompt.take() else {
            return Ok(());
        };
        let Some(text) = input else {
            log::debug!("NODATA prompt cancelled");
            return Ok(());
        };
        let raster = self.raster.clone().ok_or(EditError::NoRasterForNodata)?;

        let value = parse_number(text).ok_or_else(|| EditError::InvalidNodata(text.to_owned()))?;
        let fits = prompt.data_type.domain().is_some_and(|domain| domain.contains(value))
            || (value.is_nan() && !prompt.data_type.is_integral());
        if !fits {
            return Err(EditError::InvalidNodata(text.to_owned()));
        }
        let nodata = BandValue::coerce(prompt.data_type, value);

        let provider = raster.layer().provider();
        let mut failed = false;
        for info in raster.bands() {
            if let Err(err) = provider.set_nodata(info.band, nodata) {
                log::warn!("Setting NODATA on band {} failed: {}", info.band, err);
                failed = true;
            }
        }

        self.prepare_raster();
        raster.layer().trigger_repaint();

        if failed {
            return Err(EditError::NodataNotSet);
        }
        self.event_bus.emit(EditorEvent::NodataChanged {
            raster: raster.id().clone(),
            value: nodata,
        });
        let duration = self.config.notices.info();
        self.host
            .notify(Notice::bar_info("Successfully set new NODATA values!", duration));
        Ok(())
    }

    /// Picks up the host's active layer if the tool can edit it.
    ///
    /// Anything but a valid raster layer is ignored quietly. Rasters the tool
    /// can't edit are rejected with an explanation.
    pub fn set_active_raster(&mut self) -> EditResult<()> {
        for sbox in self.toolbar.spin_boxes_mut() {
            sbox.set_value(0.0);
        }

        let layer = self
            .host
            .active_layer()
            .filter(|layer| layer.is_valid() && layer.kind() == LayerKind::Raster);
        let result = match layer {
            Some(layer) => self.activate_layer(layer),
            None => {
                self.reset_raster();
                Ok(())
            }
        };
        self.check_undo_redo();
        result
    }

    fn activate_layer(&mut self, layer: LayerRef) -> EditResult<()> {
        let rejection = if !layer.provider().capabilities().write {
            Some(EditError::NotEditable)
        } else if layer.crs().is_none() {
            Some(EditError::MissingCrs)
        } else {
            ActiveRaster::unsupported_type(layer.as_ref()).map(EditError::UnsupportedDataType)
        };
        let raster = match (rejection, ActiveRaster::accept(layer)) {
            (None, Some(raster)) => raster,
            (rejection, _) => {
                let err = rejection.unwrap_or(EditError::NotEditable);
                log::warn!("Rejecting active layer: {}", err);
                self.reset_raster();
                return Err(err);
            }
        };

        log::info!("Active raster is {}", raster.id());
        let id = raster.id().clone();
        self.raster = Some(raster);
        self.toolbar.enable_all();
        self.prepare_raster();
        self.event_bus.emit(EditorEvent::RasterActivated(id));
        Ok(())
    }

    fn reset_raster(&mut self) {
        let had_raster = self.raster.take().is_some();
        self.toolbar.color_button_mut().enabled = false;
        self.toolbar.disable_editing();
        self.prepare_raster();
        if had_raster {
            self.event_bus.emit(EditorEvent::RasterReset);
        }
    }

    /// Refreshes band metadata and configures the spin boxes for the active raster.
    fn prepare_raster(&mut self) {
        for sbox in self.toolbar.spin_boxes_mut() {
            sbox.set_enabled(false);
        }
        let Some(raster) = self.raster.as_mut() else {
            return;
        };
        raster.refresh();

        self.toolbar.color_button_mut().enabled = raster.is_rgb();
        for info in raster.bands() {
            if let Some(sbox) = self.toolbar.spin_box_mut(info.band) {
                if let Some(domain) = info.domain() {
                    sbox.configure(domain);
                }
                sbox.set_enabled(true);
            }
        }
    }

    /// Enables undo and redo according to the active raster's history.
    fn check_undo_redo(&mut self) {
        let (can_undo, can_redo) = match &self.raster {
            Some(raster) => (
                self.history.has_undo(raster.id()),
                self.history.has_redo(raster.id()),
            ),
            None => (false, false),
        };
        let changed = self.toolbar.is_enabled(ToolbarAction::Undo) != can_undo
            || self.toolbar.is_enabled(ToolbarAction::Redo) != can_redo;
        self.toolbar.set_enabled(ToolbarAction::Undo, can_undo);
        self.toolbar.set_enabled(ToolbarAction::Redo, can_redo);
        if changed {
            self.event_bus
                .emit(EditorEvent::HistoryChanged { can_undo, can_redo });
        }
    }

    fn report(&mut self, result: EditResult<()>) {
        if let Err(err) = result {
            log::debug!("Reporting {:?}", err);
            let notice = err.notice(&self.config.notices);
            self.host.notify(notice);
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.toolbar.set_title(config.toolbar_title.clone());
        self.history.set_clear_redo_on_edit(config.clear_redo_on_edit);
        self.config = config;
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn active_raster(&self) -> Option<&ActiveRaster> {
        self.raster.as_ref()
    }

    pub fn last_point(&self) -> Option<MapPoint> {
        self.last_point
    }

    pub fn history(&self) -> &HistoryMap {
        &self.history
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn nodata_prompt(&self) -> Option<&NodataPrompt> {
        self.nodata_prompt.as_ref()
    }
}

/// Refuses to replay an edit onto bands whose data type changed since.
fn check_band_types(raster: &ActiveRaster, edit: &CellEdit) -> EditResult<()> {
    let current = raster.current_data_types();
    for (i, recorded) in edit.data_types().iter().enumerate() {
        let now = current.get(i).copied().unwrap_or(BandDataType::Unknown);
        if now != *recorded {
            return Err(EditError::BandTypeChanged {
                band: i + 1,
                recorded: *recorded,
                current: now,
            });
        }
    }
    Ok(())
}
