use std::fmt;

use super::BandSpinBox;
use crate::band::MAX_EDIT_BANDS;
use crate::tools::ToolMode;

/// Actions the tool registers with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarAction {
    ShowToolbar,
    Probe,
    Draw,
    SetNodata,
    DefineNodata,
    Undo,
    Redo,
    Help,
}

impl ToolbarAction {
    /// Registration order; the menu-only show-toolbar action comes first
    pub const ALL: [ToolbarAction; 8] = [
        Self::ShowToolbar,
        Self::Probe,
        Self::Draw,
        Self::SetNodata,
        Self::DefineNodata,
        Self::Undo,
        Self::Redo,
        Self::Help,
    ];

    pub fn text(self) -> &'static str {
        match self {
            Self::ShowToolbar => "Show Toolbar",
            Self::Probe => "Probing Mode",
            Self::Draw => "Drawing Mode",
            Self::SetNodata => "Set Raster Cell Value to NoData",
            Self::DefineNodata => "Define/Change Raster NoData Value",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Help => "Help",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::ShowToolbar => "☰",
            Self::Probe => "🔍",
            Self::Draw => "✏",
            Self::SetNodata => "⊘",
            Self::DefineNodata => "∅",
            Self::Undo => "⟲",
            Self::Redo => "⟳",
            Self::Help => "?",
        }
    }

    /// Whether the action has a toolbar button (the rest live in the menu)
    pub fn on_toolbar(self) -> bool {
        self != Self::ShowToolbar
    }

    pub fn in_menu(self) -> bool {
        matches!(self, Self::ShowToolbar | Self::Help)
    }

    /// The tool mode a checkable action switches to
    pub fn mode(self) -> Option<ToolMode> {
        match self {
            Self::Probe => Some(ToolMode::Probe),
            Self::Draw => Some(ToolMode::Draw),
            Self::SetNodata => Some(ToolMode::SetNodata),
            _ => None,
        }
    }

    /// Actions that stay usable without an editable raster
    pub fn always_enabled(self) -> bool {
        matches!(self, Self::Help | Self::ShowToolbar | Self::DefineNodata)
    }
}

impl fmt::Display for ToolbarAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionState {
    pub enabled: bool,
    pub checked: bool,
}

impl Default for ActionState {
    fn default() -> Self {
        Self {
            enabled: true,
            checked: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from three band values, clamped to 0..=255.
    pub fn from_values(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| if v.is_nan() { 0 } else { v.round().clamp(0.0, 255.0) as u8 };
        Self::new(channel(r), channel(g), channel(b))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorButton {
    pub enabled: bool,
    pub color: Rgb,
}

/// State of every control on the tool's toolbar.
///
/// The tool mutates this model; a GUI renders it and reports clicks back as
/// host events.
#[derive(Debug, Clone)]
pub struct Toolbar {
    title: String,
    visible: bool,
    registered: bool,
    actions: [ActionState; ToolbarAction::ALL.len()],
    spin_boxes: [BandSpinBox; MAX_EDIT_BANDS],
    color_button: ColorButton,
}

impl Toolbar {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            visible: true,
            registered: false,
            actions: [ActionState::default(); ToolbarAction::ALL.len()],
            spin_boxes: [BandSpinBox::new(1), BandSpinBox::new(2), BandSpinBox::new(3)],
            color_button: ColorButton::default(),
        }
    }

    fn index(action: ToolbarAction) -> usize {
        ToolbarAction::ALL
            .iter()
            .position(|a| *a == action)
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn register(&mut self) {
        self.registered = true;
        self.visible = true;
    }

    pub fn unregister(&mut self) {
        self.registered = false;
        self.visible = false;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.registered && self.visible
    }

    pub fn action(&self, action: ToolbarAction) -> ActionState {
        self.actions[Self::index(action)]
    }

    pub fn is_enabled(&self, action: ToolbarAction) -> bool {
        self.action(action).enabled
    }

    pub fn is_checked(&self, action: ToolbarAction) -> bool {
        self.action(action).checked
    }

    pub fn set_enabled(&mut self, action: ToolbarAction, enabled: bool) {
        self.actions[Self::index(action)].enabled = enabled;
    }

    pub fn enable_all(&mut self) {
        for state in &mut self.actions {
            state.enabled = true;
        }
    }

    /// Disables every action except help and show-toolbar.
    pub fn disable_editing(&mut self) {
        for action in ToolbarAction::ALL {
            if !action.always_enabled() {
                self.set_enabled(action, false);
            }
        }
    }

    /// Checks the button of `mode` and unchecks the other mode buttons.
    pub fn set_checked_mode(&mut self, mode: Option<ToolMode>) {
        for action in ToolbarAction::ALL {
            if let Some(action_mode) = action.mode() {
                self.actions[Self::index(action)].checked = Some(action_mode) == mode;
            }
        }
    }

    pub fn checked_mode(&self) -> Option<ToolMode> {
        ToolbarAction::ALL
            .into_iter()
            .filter(|a| self.is_checked(*a))
            .find_map(ToolbarAction::mode)
    }

    pub fn spin_boxes(&self) -> &[BandSpinBox] {
        &self.spin_boxes
    }

    /// Spin box of 1-based `band`
    pub fn spin_box(&self, band: usize) -> Option<&BandSpinBox> {
        self.spin_boxes.get(band.checked_sub(1)?)
    }

    pub fn spin_box_mut(&mut self, band: usize) -> Option<&mut BandSpinBox> {
        self.spin_boxes.get_mut(band.checked_sub(1)?)
    }

    pub fn spin_boxes_mut(&mut self) -> &mut [BandSpinBox] {
        &mut self.spin_boxes
    }

    pub fn color_button(&self) -> &ColorButton {
        &self.color_button
    }

    pub fn color_button_mut(&mut self) -> &mut ColorButton {
        &mut self.color_button
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_mode_is_checked() {
        let mut toolbar = Toolbar::new("t");
        toolbar.set_checked_mode(Some(ToolMode::Draw));
        assert!(toolbar.is_checked(ToolbarAction::Draw));
        assert!(!toolbar.is_checked(ToolbarAction::Probe));
        assert_eq!(toolbar.checked_mode(), Some(ToolMode::Draw));

        toolbar.set_checked_mode(None);
        assert_eq!(toolbar.checked_mode(), None);
    }

    #[test]
    fn disable_editing_keeps_help() {
        let mut toolbar = Toolbar::new("t");
        toolbar.disable_editing();
        assert!(toolbar.is_enabled(ToolbarAction::Help));
        assert!(toolbar.is_enabled(ToolbarAction::ShowToolbar));
        assert!(!toolbar.is_enabled(ToolbarAction::Draw));
        assert!(!toolbar.is_enabled(ToolbarAction::Undo));
    }

    #[test]
    fn spin_boxes_are_addressed_by_band_number() {
        let toolbar = Toolbar::new("t");
        assert_eq!(toolbar.spin_box(1).map(|s| s.band()), Some(1));
        assert_eq!(toolbar.spin_box(3).map(|s| s.band()), Some(3));
        assert!(toolbar.spin_box(0).is_none());
        assert!(toolbar.spin_box(4).is_none());
    }

    #[test]
    fn rgb_from_band_values_clamps() {
        assert_eq!(Rgb::from_values(300.0, -5.0, 127.6), Rgb::new(255, 0, 128));
    }
}
