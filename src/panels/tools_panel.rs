use eframe::egui;

use crate::command::{CellEdit, EditHistory};
use crate::layer::LayerRef;

fn edit_label(edit: &CellEdit) -> String {
    let values: Vec<String> = edit.new_values().iter().map(|v| v.to_string()).collect();
    format!("{} → {}", edit.cell(), values.join(", "))
}

/// Side panel with the host's layer list and the active raster's edit history.
///
/// Returns the index of a newly chosen layer, if the user picked one.
pub fn tools_panel(
    layers: &[LayerRef],
    active: Option<usize>,
    history: Option<&EditHistory>,
    ctx: &egui::Context,
) -> Option<usize> {
    let mut chosen = None;

    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            for (i, layer) in layers.iter().enumerate() {
                let label = format!("{} ({} bands)", layer.name(), layer.band_count());
                if ui.selectable_label(active == Some(i), label).clicked() && active != Some(i) {
                    log::info!("Layer selected from UI: {}", layer.name());
                    chosen = Some(i);
                }
            }
            ui.separator();

            ui.heading("History");
            let empty = EditHistory::new();
            let history = history.unwrap_or(&empty);
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", history.undo_stack().len()));
                ui.label(format!("Redo stack size: {}", history.redo_stack().len()));
            });

            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("edit_history_grid")
                    .num_columns(2)
                    .spacing([20.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Undo Stack");
                        ui.strong("Redo Stack");
                        ui.end_row();

                        let undo_stack = history.undo_stack();
                        let redo_stack = history.redo_stack();
                        for i in 0..undo_stack.len().max(redo_stack.len()) {
                            ui.label(undo_stack.get(i).map(edit_label).unwrap_or_default());
                            ui.label(redo_stack.get(i).map(edit_label).unwrap_or_default());
                            ui.end_row();
                        }
                    });
            });
        });

    chosen
}
