pub mod builder;

use image::GrayImage;
use crate::{
    error::Result,
    types::{BinaryMask, LabeledImage},
    traits::{ImagePreprocessor, ComponentLabeler, LabelPostProcessor},
};

/// A flexible pipeline for component labeling with multiple processing stages
pub struct Pipeline {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    labeler: Box<dyn ComponentLabeler>,
    postprocessors: Vec<Box<dyn LabelPostProcessor>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        labeler: Box<dyn ComponentLabeler>,
        postprocessors: Vec<Box<dyn LabelPostProcessor>>,
    ) -> Self {
        Self {
            preprocessors,
            labeler,
            postprocessors,
        }
    }

    /// Process an image through the entire pipeline
    pub fn process(&self, image: &GrayImage) -> Result<LabeledImage> {
        // Step 1: Apply all preprocessors in sequence
        let mut processed_image = image.clone();
        for preprocessor in &self.preprocessors {
            processed_image = preprocessor.preprocess(&processed_image)?;
        }

        // Step 2: Reduce to a two-valued mask and label it
        let mask = BinaryMask::from_gray(&processed_image)?;
        let mut labeling = self.labeler.label(&mask)?;

        // Step 3: Apply all post-processors in sequence
        for postprocessor in &self.postprocessors {
            postprocessor.process(&mut labeling)?;
        }

        tracing::info!(
            width = image.width(),
            height = image.height(),
            foreground = mask.foreground_count(),
            components = labeling.component_count(),
            "labeled image"
        );

        Ok(LabeledImage {
            labeling,
            image_width: image.width(),
            image_height: image.height(),
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} preprocessors, 1 labeler, {} postprocessors",
            self.preprocessors.len(),
            self.postprocessors.len()
        )
    }
}
