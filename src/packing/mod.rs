mod packer;
mod rect;
mod skyline;

pub use packer::{RectanglePacker, SkylinePacker};
pub use rect::Rect;
pub use skyline::{Breakpoint, Placement, SkylineProfile};
