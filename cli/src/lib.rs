use labeling::{Connectivity, FixedPalette, Pipeline, RandomColors, ColorSource};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions picked up when generating a batch from a directory
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// How every image of a batch is thresholded, labeled and rendered
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct LabelSettings {
    /// Pixels strictly above this value are foreground
    pub threshold: u8,
    pub connectivity: Connectivity,
    /// Seed for random component colors; a fixed palette is used when absent
    pub seed: Option<u64>,
    /// Blur sigma applied before thresholding
    pub blur_sigma: Option<f32>,
    /// Treat dark pixels as foreground
    pub invert: bool,
    /// Drop components smaller than this many pixels
    pub min_area: Option<usize>,
    /// Keep only this many of the largest components
    pub max_components: Option<usize>,
    /// Write a JSON summary next to each colorized image
    pub write_summary: bool,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            threshold: 127,
            connectivity: Connectivity::Four,
            seed: None,
            blur_sigma: None,
            invert: false,
            min_area: None,
            max_components: None,
            write_summary: true,
        }
    }
}

impl LabelSettings {
    /// Assemble the processing pipeline described by these settings
    pub fn pipeline(&self) -> Pipeline {
        let mut builder = Pipeline::builder();
        if let Some(sigma) = self.blur_sigma {
            builder = builder.with_blur(sigma);
        }
        builder = builder.with_threshold(self.threshold);
        if self.invert {
            builder = builder.with_inversion();
        }
        builder = builder.with_connectivity(self.connectivity);
        if let Some(min_area) = self.min_area {
            builder = builder.with_min_area(min_area);
        }
        if let Some(max_components) = self.max_components {
            builder = builder.with_max_components(max_components);
        }
        builder.build()
    }

    /// Seeded random colors when a seed is configured, otherwise the fixed palette
    pub fn color_source(&self) -> Box<dyn ColorSource> {
        match self.seed {
            Some(seed) => Box::new(RandomColors::seeded(seed)),
            None => Box::new(FixedPalette::default()),
        }
    }
}

/// One source image in a batch
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImageEntry {
    pub path: String,
    /// Output file stem; defaults to the source file stem
    pub name: Option<String>,
}

impl ImageEntry {
    pub fn output_stem(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            Path::new(&self.path)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "labels".to_string())
        })
    }
}

/// Batch labeling configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LabelBatch {
    pub output_dir: String,
    #[serde(default)]
    pub settings: LabelSettings,
    pub images: Vec<ImageEntry>,
}

impl LabelBatch {
    /// Load LabelBatch configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load LabelBatch configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load LabelBatch configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load LabelBatch configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    /// Auto-detect file format and save configuration
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CliError> {
        let content = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(CliError::UnsupportedFileFormat),
        };
        fs::write(path, content)?;
        Ok(())
    }

    /// Convert LabelBatch to TOML string
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert LabelBatch to JSON string
    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Get the JSON schema of the batch configuration
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(LabelBatch)
    }

    /// Build a batch covering every image file directly inside `input_dir`,
    /// sorted by path
    pub fn skeleton<P: AsRef<Path>>(input_dir: P, output_dir: P, settings: LabelSettings) -> Result<Self, CliError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(input_dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        Ok(Self {
            output_dir: output_dir.as_ref().to_string_lossy().to_string(),
            settings,
            images: paths
                .into_iter()
                .map(|path| ImageEntry {
                    path: path.to_string_lossy().to_string(),
                    name: None,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH_TOML: &str = r#"
output_dir = "out"

[settings]
threshold = 100
connectivity = "eight"
seed = 42
min_area = 4

[[images]]
path = "masks/cells.png"

[[images]]
path = "masks/coins.png"
name = "coins_labeled"
"#;

    #[test]
    fn test_toml_batch_with_partial_settings() {
        let batch = LabelBatch::from_toml(BATCH_TOML).unwrap();
        assert_eq!(batch.output_dir, "out");
        assert_eq!(batch.settings.threshold, 100);
        assert_eq!(batch.settings.connectivity, Connectivity::Eight);
        assert_eq!(batch.settings.seed, Some(42));
        assert_eq!(batch.settings.min_area, Some(4));
        // Unset fields fall back to defaults.
        assert!(batch.settings.write_summary);
        assert!(!batch.settings.invert);
        assert_eq!(batch.images[0].output_stem(), "cells");
        assert_eq!(batch.images[1].output_stem(), "coins_labeled");
    }

    #[test]
    fn test_settings_section_is_optional() {
        let batch = LabelBatch::from_json(r#"{"output_dir": "out", "images": []}"#).unwrap();
        assert_eq!(batch.settings, LabelSettings::default());
    }

    #[test]
    fn test_file_round_trip_in_both_formats() {
        let batch = LabelBatch::from_toml(BATCH_TOML).unwrap();
        let dir = tempfile::tempdir().unwrap();

        for name in ["batch.toml", "batch.json"] {
            let path = dir.path().join(name);
            batch.to_file(&path).unwrap();
            assert_eq!(LabelBatch::from_file(&path).unwrap(), batch);
        }

        let unsupported = dir.path().join("batch.yaml");
        assert!(matches!(
            batch.to_file(&unsupported),
            Err(CliError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_skeleton_lists_image_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.PNG", "notes.txt", "c.tif"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let batch = LabelBatch::skeleton(dir.path(), Path::new("out"), LabelSettings::default()).unwrap();
        let stems: Vec<String> = batch.images.iter().map(ImageEntry::output_stem).collect();
        assert_eq!(stems, vec!["a", "b", "c"]);
        assert_eq!(batch.output_dir, "out");
    }

    #[test]
    fn test_settings_build_pipeline() {
        let settings = LabelSettings {
            blur_sigma: Some(1.0),
            invert: true,
            min_area: Some(3),
            ..LabelSettings::default()
        };
        assert_eq!(
            settings.pipeline().info(),
            "Pipeline: 3 preprocessors, 1 labeler, 1 postprocessors"
        );
    }
}
