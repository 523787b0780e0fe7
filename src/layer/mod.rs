mod layer;
mod loader;

pub use layer::{Layer, PackedLayer};
pub use loader::load_layers;
