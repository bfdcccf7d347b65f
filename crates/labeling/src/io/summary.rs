use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::{
    error::Result,
    types::{ComponentStats, LabeledImage},
};

/// Serializable description of a labeled image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(description = "Connected components found in a labeled image")]
pub struct LabelingSummary {
    #[schemars(description = "Source image width in pixels")]
    pub image_width: u32,
    #[schemars(description = "Source image height in pixels")]
    pub image_height: u32,
    #[schemars(description = "Number of connected components")]
    pub component_count: u32,
    #[schemars(description = "Per-component measurements, ordered by label")]
    pub components: Vec<ComponentStats>,
}

impl LabelingSummary {
    /// Load a summary from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl LabeledImage {
    /// Summarize the components of this labeling
    pub fn summary(&self) -> LabelingSummary {
        LabelingSummary {
            image_width: self.image_width,
            image_height: self.image_height,
            component_count: self.labeling.component_count(),
            components: self.labeling.components(),
        }
    }

    /// Export the summary as a pretty-printed JSON string
    pub fn to_summary_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }

    /// Save the summary as JSON
    pub fn save_summary<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_summary_string()?)?;
        Ok(())
    }
}
