pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod layer;
pub mod output;
pub mod packing;

pub use atlas::{Atlas, AtlasBuilder};
pub use cli::{CliArgs, Command, CommonArgs, LayerOrder, PackMode};
pub use error::{AtlasError, PackError};
pub use layer::{Layer, PackedLayer};
pub use packing::{Placement, RectanglePacker, SkylinePacker};
