use crate::band::BandDataType;
use crate::config::EditorConfig;
use crate::crs::Crs;
use crate::event::{EventLog, EventRecorder, HostEvent};
use crate::geometry::RasterBounds;
use crate::layer::{LayerRef, NodataRange};
use crate::memory::{MemoryHost, MemoryRaster};
use crate::notify::{Notice, NoticeKind};
use crate::panels;
use crate::tools::CellEditTool;

/// Transient notice with the time (in seconds of app time) it disappears
struct BarMessage {
    notice: Notice,
    expires: f64,
}

/// Desktop front-end: an in-memory map host with the cell editing tool on top.
pub struct RasterEditApp {
    tool: CellEditTool<MemoryHost>,
    events: EventLog,
    bar: Vec<BarMessage>,
    blocking: Vec<Notice>,
    nodata_input: Option<String>,
}

impl RasterEditApp {
    /// Called once before the first frame.
    ///
    /// A config given on the command line wins over the one stored by eframe.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        layers: Vec<LayerRef>,
        config: Option<EditorConfig>,
    ) -> Self {
        // Only the configuration survives restarts, edit history never does
        let config = config
            .or_else(|| {
                cc.storage
                    .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            })
            .unwrap_or_default();
        Self::with_layers(config, layers)
    }

    pub fn with_layers(config: EditorConfig, layers: Vec<LayerRef>) -> Self {
        let canvas_crs = layers
            .first()
            .and_then(|layer| layer.crs())
            .unwrap_or_else(Crs::wgs84);
        let mut host = MemoryHost::new(canvas_crs);
        for layer in layers {
            host.add_layer(layer);
        }
        host.set_active(Some(0));

        let mut tool = CellEditTool::new(host, config);
        let (recorder, events) = EventRecorder::with_capacity(Some(100));
        tool.event_bus().subscribe(Box::new(recorder));
        tool.setup();

        Self {
            tool,
            events,
            bar: Vec::new(),
            blocking: Vec::new(),
            nodata_input: None,
        }
    }

    fn dispatch(&mut self, events: Vec<HostEvent>) {
        for event in events {
            self.tool.handle_event(event);
        }
    }

    fn collect_notices(&mut self, now: f64) {
        for notice in self.tool.host_mut().take_notices() {
            match notice.kind {
                NoticeKind::Blocking => self.blocking.push(notice),
                NoticeKind::Transient(duration) => self.bar.push(BarMessage {
                    expires: now + duration.as_secs_f64(),
                    notice,
                }),
            }
        }
        self.bar.retain(|message| message.expires > now);
    }

    fn nodata_dialog(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.tool.nodata_prompt().cloned() else {
            self.nodata_input = None;
            return;
        };
        let input = self.nodata_input.get_or_insert_with(|| prompt.initial.clone());

        let mut answer = None;
        egui::Window::new(prompt.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(prompt.label.as_str());
                ui.text_edit_singleline(input);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        answer = Some(Some(input.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(None);
                    }
                });
            });

        if let Some(answer) = answer {
            self.nodata_input = None;
            self.tool.handle_event(HostEvent::NodataSubmitted(answer));
        }
    }

    fn blocking_dialog(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.blocking.first() else {
            return;
        };
        let mut acknowledged = false;
        egui::Window::new("Warning")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(notice.text.as_str());
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });
        if acknowledged {
            self.blocking.remove(0);
        }
    }

    fn message_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("message_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.bar.last() {
                    Some(message) => ui.label(message.notice.text.as_str()),
                    None => ui.label(format!("Mode: {}", self.tool.mode())),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("{} events", self.events.len()));
                });
            });
        });
    }
}

impl eframe::App for RasterEditApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.tool.config());
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.tool.teardown();
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);
        self.collect_notices(now);
        for url in self.tool.host_mut().take_opened_urls() {
            ctx.open_url(egui::OpenUrl::new_tab(url));
        }

        let events = panels::toolbar_panel(self.tool.toolbar(), ctx);
        self.dispatch(events);

        self.message_bar(ctx);

        let history = self
            .tool
            .active_raster()
            .and_then(|raster| self.tool.history().history(raster.id()));
        let chosen = panels::tools_panel(
            self.tool.host().layers(),
            self.tool.host().active_index(),
            history,
            ctx,
        );
        if let Some(index) = chosen {
            self.tool.host_mut().set_active(Some(index));
            self.tool.handle_event(HostEvent::ActiveLayerChanged);
        }

        let events = panels::central_panel(self.tool.active_raster(), ctx);
        self.dispatch(events);

        self.nodata_dialog(ctx);
        self.blocking_dialog(ctx);

        if !self.bar.is_empty() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}

/// A handful of rasters to try the tool on
pub fn demo_layers() -> Vec<LayerRef> {
    let crs = Crs::new("EPSG:32634");

    let rgb = MemoryRaster::new(
        "rgb",
        48,
        32,
        RasterBounds::new(500_000.0, 5_800_000.0, 500_480.0, 5_800_320.0),
        &[BandDataType::Byte; 3],
        Some(crs.clone()),
    );
    let provider = rgb.memory_provider();
    for row in 0..32 {
        for col in 0..48 {
            provider.set_value(1, col, row, (col * 255 / 47) as f64);
            provider.set_value(2, col, row, (row * 255 / 31) as f64);
            provider.set_value(3, col, row, 128.0);
        }
    }

    let dem = MemoryRaster::new(
        "dem",
        40,
        30,
        RasterBounds::new(500_000.0, 5_800_000.0, 500_400.0, 5_800_300.0),
        &[BandDataType::Int16],
        Some(crs.clone()),
    );
    dem.memory_provider().set_source_nodata(1, Some(-9999.0));
    for row in 0..30 {
        for col in 0..40 {
            let height = 100.0 + (col as f64 * 0.3).sin() * 40.0 + row as f64 * 2.0;
            dem.memory_provider().set_value(1, col, row, height.round());
        }
    }
    dem.memory_provider().set_value(1, 0, 0, -9999.0);

    let flow = MemoryRaster::new(
        "flow",
        20,
        20,
        RasterBounds::new(500_000.0, 5_800_000.0, 500_200.0, 5_800_200.0),
        &[BandDataType::Float32],
        Some(crs.clone()),
    );
    flow.memory_provider().add_user_nodata(1, NodataRange::single(0.0));

    let complex = MemoryRaster::new(
        "complex",
        8,
        8,
        RasterBounds::new(500_000.0, 5_800_000.0, 500_080.0, 5_800_080.0),
        &[BandDataType::CFloat32],
        Some(crs),
    );

    vec![
        rgb.into_ref() as LayerRef,
        dem.into_ref() as LayerRef,
        flow.into_ref() as LayerRef,
        complex.into_ref() as LayerRef,
    ]
}
