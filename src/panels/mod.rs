mod central_panel;
mod toolbar_panel;
mod tools_panel;

pub use central_panel::central_panel;
pub use toolbar_panel::toolbar_panel;
pub use tools_panel::tools_panel;
