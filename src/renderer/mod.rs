pub mod cell;
pub mod display;
pub mod surface;

pub use display::DisplayManager;
pub use display::DisplayMode;
pub use surface::{CellCanvas, Surface};
