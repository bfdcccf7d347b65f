use std::path::Path;
use std::sync::Arc;

use image::GrayImage;
use crate::{
    error::{LabelingError, Result},
    io::{decode_gray, load_gray},
    types::{Connectivity, LabeledImage},
    pipeline::{Pipeline, builder::PipelineBuilder},
};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;
use strum::{Display, EnumString, EnumIter, IntoStaticStr, VariantNames};

/// Threshold used by the manager's built-in pipelines
pub const DEFAULT_THRESHOLD: u8 = 127;

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum LabelCommand {
    /// Label connected components with the manager's pipeline
    #[serde(rename = "label")]
    Label,

    /// Label connected components with an explicit connectivity
    #[serde(rename = "label_with_connectivity")]
    LabelWithConnectivity {
        connectivity: Connectivity,
    },

    /// Label connected components and drop the ones below a pixel area
    #[serde(rename = "label_with_min_area")]
    LabelWithMinArea {
        #[schemars(range(min = 1))]
        min_area: usize,
    },
}

impl LabelCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(LabelCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::Label => "Label 4-connected foreground components of a thresholded mask",
            Self::LabelWithConnectivity { .. } => "Label foreground components using 4- or 8-connectivity",
            Self::LabelWithMinArea { .. } => "Label foreground components and discard components below a minimum area",
        }
    }
}

/// Holds a source image and runs labeling commands against it
#[derive(Clone)]
pub struct LabelManager {
    image: Option<GrayImage>,
    pipeline: Arc<Pipeline>,
}

impl LabelManager {
    pub fn new() -> Self {
        Self {
            image: None,
            pipeline: Arc::new(PipelineBuilder::build_simple(DEFAULT_THRESHOLD)),
        }
    }

    /// Create a new LabelManager with a custom pipeline
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            image: None,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Load a mask image from file
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.image = Some(load_gray(path)?);
        Ok(())
    }

    /// Load a mask image from memory
    pub fn load_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.image = Some(decode_gray(bytes)?);
        Ok(())
    }

    /// Set the mask image directly
    pub fn set_image(&mut self, image: GrayImage) {
        self.image = Some(image);
    }

    pub fn execute(&self, command: LabelCommand) -> Result<LabeledImage> {
        let image = self.image.as_ref()
            .ok_or(LabelingError::NoImageLoaded)?;

        tracing::debug!(command = %command, "executing label command");
        match command {
            LabelCommand::Label => {
                self.pipeline.process(image)
            }
            LabelCommand::LabelWithConnectivity { connectivity } => {
                let pipeline = PipelineBuilder::build_with_connectivity(DEFAULT_THRESHOLD, connectivity);
                pipeline.process(image)
            }
            LabelCommand::LabelWithMinArea { min_area } => {
                let pipeline = PipelineBuilder::build_with_min_area(DEFAULT_THRESHOLD, min_area);
                pipeline.process(image)
            }
        }
    }
}

impl Default for LabelManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn diagonal_pair() -> GrayImage {
        let mut img = GrayImage::new(2, 2);
        img.put_pixel(0, 0, Luma([255u8]));
        img.put_pixel(1, 1, Luma([255u8]));
        img
    }

    #[test]
    fn test_execute_without_image_fails() {
        let manager = LabelManager::new();
        assert!(matches!(
            manager.execute(LabelCommand::Label),
            Err(LabelingError::NoImageLoaded)
        ));
    }

    #[test]
    fn test_commands_select_connectivity_and_filters() {
        let mut manager = LabelManager::new();
        manager.set_image(diagonal_pair());

        let four = manager.execute(LabelCommand::Label).unwrap();
        assert_eq!(four.component_count(), 2);

        let eight = manager
            .execute(LabelCommand::LabelWithConnectivity { connectivity: Connectivity::Eight })
            .unwrap();
        assert_eq!(eight.component_count(), 1);

        let filtered = manager
            .execute(LabelCommand::LabelWithMinArea { min_area: 2 })
            .unwrap();
        assert_eq!(filtered.component_count(), 0);
    }

    #[test]
    fn test_loaded_images_are_labeled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pair.png");
        diagonal_pair().save(&path).unwrap();

        let mut manager = LabelManager::new();
        manager.load_image(&path).unwrap();
        assert_eq!(manager.execute(LabelCommand::Label).unwrap().component_count(), 2);

        let mut from_bytes = LabelManager::new();
        from_bytes.load_image_from_bytes(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(from_bytes.execute(LabelCommand::Label).unwrap().component_count(), 2);

        assert!(matches!(
            manager.load_image(dir.path().join("missing.png")),
            Err(LabelingError::ImageLoad(_))
        ));
    }

    #[test]
    fn test_command_json_shape() {
        let command = LabelCommand::LabelWithConnectivity { connectivity: Connectivity::Eight };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["type"], "label_with_connectivity");
        assert_eq!(json["params"]["connectivity"], "eight");

        let parsed: LabelCommand = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, command);
        assert_eq!(command.to_string(), "label_with_connectivity");
        assert!(LabelCommand::command_names().contains(&"label_with_min_area"));
    }
}
