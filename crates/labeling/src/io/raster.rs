use std::path::Path;

use image::{GrayImage, RgbImage};
use crate::{
    algorithms::{colorize, DEFAULT_BACKGROUND},
    error::Result,
    traits::ColorSource,
    types::LabeledImage,
};

/// Decode any supported image file and convert it to 8-bit luma
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    let image = image::open(path.as_ref())?;
    tracing::debug!(path = %path.as_ref().display(), "loaded source image");
    Ok(image.to_luma8())
}

/// Decode an in-memory encoded image and convert it to 8-bit luma
pub fn decode_gray(bytes: &[u8]) -> Result<GrayImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_luma8())
}

impl LabeledImage {
    /// Render components with colors from `source` on a black background
    pub fn colorize(&self, source: &dyn ColorSource) -> RgbImage {
        colorize(&self.labeling, source, DEFAULT_BACKGROUND)
    }

    /// Render and save the colorized labeling; the format follows the file extension
    pub fn save_colorized<P: AsRef<Path>>(&self, path: P, source: &dyn ColorSource) -> Result<()> {
        self.colorize(source).save(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "saved colorized labels");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::FixedPalette, pipeline::Pipeline};
    use image::Luma;

    #[test]
    fn test_colorized_png_round_trips_through_disk() {
        let mut source = GrayImage::new(4, 4);
        source.put_pixel(0, 0, Luma([255u8]));
        source.put_pixel(3, 3, Luma([255u8]));

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("mask.png");
        source.save(&input).unwrap();

        let image = load_gray(&input).unwrap();
        let result = Pipeline::builder().with_threshold(127).build().process(&image).unwrap();
        assert_eq!(result.component_count(), 2);

        let output = dir.path().join("labels.png");
        let palette = FixedPalette::default();
        result.save_colorized(&output, &palette).unwrap();

        let written = image::open(&output).unwrap().to_rgb8();
        assert_eq!(*written.get_pixel(0, 0), palette.colors[0]);
        assert_eq!(*written.get_pixel(3, 3), palette.colors[1]);
        assert_eq!(*written.get_pixel(1, 1), DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_decode_gray_matches_file_loading() {
        let mut source = GrayImage::new(3, 2);
        source.put_pixel(1, 1, Luma([200u8]));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.png");
        source.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(decode_gray(&bytes).unwrap(), load_gray(&path).unwrap());
        assert!(decode_gray(b"not an image").is_err());
    }
}
