use eframe::egui;

use crate::components::ToolButton;
use crate::event::HostEvent;
use crate::widgets::{Rgb, Toolbar, ToolbarAction};

/// Draws the tool's toolbar and returns the events the user triggered.
pub fn toolbar_panel(toolbar: &Toolbar, ctx: &egui::Context) -> Vec<HostEvent> {
    let mut events = Vec::new();

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("Plugins", |ui| {
                ui.menu_button(toolbar.title(), |ui| {
                    for action in ToolbarAction::ALL.into_iter().filter(|a| a.in_menu()) {
                        let enabled = toolbar.is_enabled(action);
                        if ui.add_enabled(enabled, egui::Button::new(action.text())).clicked() {
                            events.push(HostEvent::Action(action));
                            ui.close_menu();
                        }
                    }
                });
            });
        });
    });

    if !toolbar.is_visible() {
        return events;
    }

    egui::TopBottomPanel::top("cell_toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            for action in ToolbarAction::ALL.into_iter().filter(|a| a.on_toolbar()) {
                if action == ToolbarAction::Undo {
                    // Color button and band spin boxes sit between the mode
                    // buttons and undo/redo
                    band_controls(toolbar, ui, &mut events);
                    ui.separator();
                }
                if ToolButton::new(action, toolbar.action(action)).clicked(ui) {
                    log::info!("Toolbar action: {}", action);
                    events.push(HostEvent::Action(action));
                }
            }
        });
    });

    events
}

fn band_controls(toolbar: &Toolbar, ui: &mut egui::Ui, events: &mut Vec<HostEvent>) {
    let color_button = toolbar.color_button();
    let mut rgb = [color_button.color.r, color_button.color.g, color_button.color.b];
    ui.add_enabled_ui(color_button.enabled, |ui| {
        if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
            events.push(HostEvent::ColorPicked(Rgb::new(rgb[0], rgb[1], rgb[2])));
        }
    });

    for sbox in toolbar.spin_boxes() {
        let mut value = sbox.value();
        let (min, max) = sbox.range();
        let response = ui.add_enabled(
            sbox.is_enabled(),
            egui::DragValue::new(&mut value)
                .range(min..=max)
                .max_decimals(sbox.decimals())
                .speed(1.0),
        );
        let band = sbox.band();
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            events.push(HostEvent::SpinBoxCommitted {
                band,
                text: value.to_string(),
            });
        } else if response.changed() {
            events.push(HostEvent::SpinBoxEdited { band, value });
        }
    }
}
