mod central_panel;
mod symmetry_panel;
mod tools_panel;

pub use central_panel::central_panel;
pub use symmetry_panel::symmetry_panel;
pub use tools_panel::tools_panel;
