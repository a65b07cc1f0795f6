use eframe::egui;

use crate::event::HostEvent;
use crate::geometry::MapPoint;
use crate::tools::ActiveRaster;

/// Draws the active raster, one rectangle per cell, and turns clicks into
/// canvas events in map coordinates.
pub fn central_panel(raster: Option<&ActiveRaster>, ctx: &egui::Context) -> Vec<HostEvent> {
    let mut events = Vec::new();

    egui::CentralPanel::default().show(ctx, |ui| {
        let Some(raster) = raster else {
            ui.centered_and_justified(|ui| {
                ui.label("Select a raster layer to work with.");
            });
            return;
        };

        let bounds = *raster.bounds();
        let pixel_size = raster.pixel_size();
        let cols = (bounds.width() / pixel_size.x).round().max(1.0) as usize;
        let rows = (bounds.height() / pixel_size.y).round().max(1.0) as usize;

        let available = ui.available_size();
        let scale = (available.x / cols as f32).min(available.y / rows as f32).max(1.0);
        let size = egui::vec2(cols as f32 * scale, rows as f32 * scale);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click());
        let origin = response.rect.min;

        let provider = raster.layer().provider();
        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let center = MapPoint::new(
                    bounds.xmin + (col as f64 + 0.5) * pixel_size.x,
                    bounds.ymax - (row as f64 + 0.5) * pixel_size.y,
                );
                let values = provider.identify(center);
                cells.push(
                    raster
                        .bands()
                        .iter()
                        .map(|info| values.get(&info.band).copied().flatten())
                        .collect::<Vec<_>>(),
                );
            }
        }

        // Stretch single bands between their minimum and maximum
        let (lo, hi) = cells
            .iter()
            .filter_map(|c| c.first().copied().flatten())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let span = if hi > lo { hi - lo } else { 1.0 };

        for (i, values) in cells.iter().enumerate() {
            let (col, row) = (i % cols, i / cols);
            let rect = egui::Rect::from_min_size(
                origin + egui::vec2(col as f32 * scale, row as f32 * scale),
                egui::vec2(scale, scale),
            );
            let color = match values.as_slice() {
                [Some(r), Some(g), Some(b), ..] => egui::Color32::from_rgb(
                    r.clamp(0.0, 255.0) as u8,
                    g.clamp(0.0, 255.0) as u8,
                    b.clamp(0.0, 255.0) as u8,
                ),
                [Some(v), ..] if values.len() < 3 => {
                    egui::Color32::from_gray((((v - lo) / span) * 255.0).clamp(0.0, 255.0) as u8)
                }
                _ => egui::Color32::from_rgba_unmultiplied(200, 0, 200, 60),
            };
            painter.rect_filled(rect, 0.0, color);
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let local = pos - origin;
                let point = MapPoint::new(
                    bounds.xmin + f64::from(local.x / scale) * pixel_size.x,
                    bounds.ymax - f64::from(local.y / scale) * pixel_size.y,
                );
                log::debug!("Canvas clicked at {}", point);
                events.push(HostEvent::CanvasClicked(point));
            }
        }
    });

    events
}
