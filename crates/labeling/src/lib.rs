//! # Connected Component Labeling Library
//!
//! Labels 4- or 8-connected groups of foreground pixels in a binary raster,
//! giving each group a unique identifier in a dense `1..=K` range.
//!
//! ## Core Features
//!
//! - **Two-pass engine**: a forward raster scan with a union-find equivalence
//!   table, followed by root resolution and compaction
//! - **Trait-based Architecture**: swap preprocessors, labelers, post-processors and color sources
//! - **Pipeline System**: threshold, label and filter an image in one call
//! - **Visualization**: seeded or fixed palettes for colorized output
//! - **JSON Summaries**: per-component area, bounding box and centroid
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labeling::{Pipeline, RandomColors};
//!
//! let image = labeling::load_gray("shapes.png")?;
//! let pipeline = Pipeline::builder().with_threshold(127).build();
//! let result = pipeline.process(&image)?;
//!
//! println!("{} components", result.component_count());
//! result.save_colorized("labeled.png", &RandomColors::seeded(42))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Using the engine directly
//!
//! ```rust
//! use labeling::{label_components, BinaryMask, Connectivity};
//!
//! let mask = BinaryMask::from_rows::<u8, _>(&[
//!     [1u8, 0, 1],
//!     [1, 0, 1],
//!     [1, 1, 1],
//! ])?;
//! let labeling = label_components(&mask, Connectivity::Four)?;
//! assert_eq!(labeling.component_count(), 1);
//! # Ok::<(), labeling::LabelingError>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;
pub mod manager;

// Re-exports for convenience
pub use error::{LabelingError, Result};
pub use types::{BinaryMask, ComponentStats, Connectivity, LabelGrid, LabelImage, LabeledImage, Labeling};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::*;
pub use manager::{LabelCommand, LabelManager};
