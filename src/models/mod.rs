pub mod catalog;
pub mod media_item;
pub mod session;
pub mod tile_state;

pub use catalog::*;
pub use media_item::*;
pub use session::*;
pub use tile_state::*;
