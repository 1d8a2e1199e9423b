mod index;

pub use index::{PositionKey, SpatialIndex};
