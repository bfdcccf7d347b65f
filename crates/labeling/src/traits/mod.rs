use image::{GrayImage, Rgb};
use crate::{error::Result, types::{BinaryMask, Labeling}};

/// Trait for image preprocessing algorithms
pub trait ImagePreprocessor: Send + Sync {
    /// Preprocess the input image (e.g., blur, threshold)
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for connected component labeling algorithms
pub trait ComponentLabeler: Send + Sync {
    /// Label the foreground components of a binary mask
    fn label(&self, mask: &BinaryMask) -> Result<Labeling>;
}

/// Trait for labeling post-processing algorithms
pub trait LabelPostProcessor: Send + Sync {
    /// Post-process a labeling in place, keeping labels dense
    fn process(&self, labeling: &mut Labeling) -> Result<()>;
}

/// Trait for sources of component colors used in visualization
pub trait ColorSource: Send + Sync {
    /// One color per label, indexed by `label - 1`
    fn palette(&self, count: u32) -> Vec<Rgb<u8>>;
}
