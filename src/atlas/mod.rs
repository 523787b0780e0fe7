mod builder;
mod types;

pub use builder::{AtlasBuilder, nearest_power_of_two};
pub use types::Atlas;
