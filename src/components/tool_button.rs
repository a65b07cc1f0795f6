use eframe::egui;

use crate::widgets::{ActionState, ToolbarAction};

/// Square toolbar button drawing an action's icon glyph
pub struct ToolButton {
    pub action: ToolbarAction,
    pub state: ActionState,
}

impl ToolButton {
    pub fn new(action: ToolbarAction, state: ActionState) -> Self {
        Self { action, state }
    }

    pub fn show(&self, ui: &mut egui::Ui) -> egui::Response {
        let button_size = egui::vec2(28.0, 28.0);
        let sense = if self.state.enabled {
            egui::Sense::click()
        } else {
            egui::Sense::hover()
        };
        let (rect, response) = ui.allocate_exact_size(button_size, sense);

        if ui.is_rect_visible(rect) {
            let bg_color = if self.state.checked {
                egui::Color32::from_rgb(100, 181, 246) // Light blue when checked
            } else if response.hovered() && self.state.enabled {
                egui::Color32::from_gray(60)
            } else {
                egui::Color32::from_gray(40)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let text_color = if !self.state.enabled {
                egui::Color32::from_gray(100)
            } else if self.state.checked {
                egui::Color32::BLACK
            } else {
                egui::Color32::WHITE
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.action.icon(),
                egui::FontId::proportional(18.0),
                text_color,
            );

            if self.state.checked {
                ui.painter().rect_stroke(
                    rect,
                    4.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(33, 150, 243)),
                );
            }
        }

        response.on_hover_text(self.action.text())
    }

    /// Shows the button and reports whether it was clicked while enabled.
    pub fn clicked(&self, ui: &mut egui::Ui) -> bool {
        self.show(ui).clicked() && self.state.enabled
    }
}
