pub mod equivalence;
pub mod scan;
pub mod compact;
pub mod labelers;
pub mod preprocessing;
pub mod postprocessing;
pub mod colorize;

pub use equivalence::*;
pub use scan::*;
pub use compact::compact;
pub use labelers::*;
pub use preprocessing::*;
pub use postprocessing::*;
pub use colorize::*;
