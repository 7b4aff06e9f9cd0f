pub mod detached;
pub mod keybindings;
pub mod media_loader;
pub mod tile_grid;
pub mod tilt;
pub mod viewer;
pub mod window;

pub use window::MainWindow;
