mod spin_box;
mod toolbar;

pub use spin_box::BandSpinBox;
pub use toolbar::{ActionState, ColorButton, Rgb, Toolbar, ToolbarAction};
