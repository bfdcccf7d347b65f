use crate::{
    pipeline::Pipeline,
    traits::{ImagePreprocessor, ComponentLabeler, LabelPostProcessor},
    types::Connectivity,
    algorithms::{
        TwoPassLabeler,
        ThresholdPreprocessor,
        GaussianBlurPreprocessor,
        InvertPreprocessor,
        MinimumAreaFilter,
        MaximumComponentsFilter,
    },
};

/// Builder for creating labeling pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    labeler: Option<Box<dyn ComponentLabeler>>,
    postprocessors: Vec<Box<dyn LabelPostProcessor>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            labeler: None,
            postprocessors: Vec::new(),
        }
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the labeler (replaces any existing one)
    pub fn set_labeler<L>(mut self, labeler: L) -> Self
    where
        L: ComponentLabeler + 'static,
    {
        self.labeler = Some(Box::new(labeler));
        self
    }

    /// Add a post-processor to the pipeline
    pub fn add_postprocessor<P>(mut self, postprocessor: P) -> Self
    where
        P: LabelPostProcessor + 'static,
    {
        self.postprocessors.push(Box::new(postprocessor));
        self
    }

    /// Add a binary threshold as a preprocessing step
    pub fn with_threshold(self, threshold: u8) -> Self {
        self.add_preprocessor(ThresholdPreprocessor { threshold })
    }

    /// Add Gaussian blur as a preprocessing step
    pub fn with_blur(self, sigma: f32) -> Self {
        self.add_preprocessor(GaussianBlurPreprocessor { sigma })
    }

    /// Invert intensities as a preprocessing step
    pub fn with_inversion(self) -> Self {
        self.add_preprocessor(InvertPreprocessor)
    }

    /// Use the two-pass labeler with the given connectivity
    pub fn with_connectivity(self, connectivity: Connectivity) -> Self {
        self.set_labeler(TwoPassLabeler::new(connectivity))
    }

    /// Drop components smaller than `min_area` pixels
    pub fn with_min_area(self, min_area: usize) -> Self {
        self.add_postprocessor(MinimumAreaFilter { min_area })
    }

    /// Keep only the `max_components` largest components
    pub fn with_max_components(self, max_components: usize) -> Self {
        self.add_postprocessor(MaximumComponentsFilter { max_components })
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let labeler = self.labeler
            .unwrap_or_else(|| Box::new(TwoPassLabeler::default()));

        Pipeline::new(self.preprocessors, labeler, self.postprocessors)
    }

    /// Build a simple pipeline with basic threshold preprocessing
    pub fn build_simple(threshold: u8) -> Pipeline {
        Self::new()
            .with_threshold(threshold)
            .build()
    }

    /// Build a thresholded pipeline with the given connectivity
    pub fn build_with_connectivity(threshold: u8, connectivity: Connectivity) -> Pipeline {
        Self::new()
            .with_threshold(threshold)
            .with_connectivity(connectivity)
            .build()
    }

    /// Build a thresholded pipeline that drops small components
    pub fn build_with_min_area(threshold: u8, min_area: usize) -> Pipeline {
        Self::new()
            .with_threshold(threshold)
            .with_min_area(min_area)
            .build()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
