pub mod raster;
pub mod summary;

pub use raster::*;
pub use summary::*;
