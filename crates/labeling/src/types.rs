use image::{GrayImage, ImageBuffer, Luma};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

use crate::error::{LabelingError, Result};

/// Image of raw `u32` labels, as produced by [`LabelGrid::to_image`].
pub type LabelImage = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Allocate a vector of `len` copies of `value`, surfacing allocation failure.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len)?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Which already-visited neighbors join a pixel to its component.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Connectivity {
    /// Pixels connect through shared edges only (top and left during the scan)
    #[default]
    Four,
    /// Pixels also connect through shared corners
    Eight,
}

/// Two-valued input raster, row-major. Any nonzero source value is foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl BinaryMask {
    /// Build a mask from row-major data, validating the dimensions up front.
    pub fn new(width: usize, height: usize, data: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LabelingError::EmptyMask { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(LabelingError::TooLarge { pixels: usize::MAX })?;
        if data.len() != expected {
            return Err(LabelingError::DimensionMismatch {
                expected,
                found: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    /// Build a mask from nested rows. Values different from `T::default()` are foreground.
    pub fn from_rows<T, R>(rows: &[R]) -> Result<Self>
    where
        T: Copy + Default + PartialEq,
        R: AsRef<[T]>,
    {
        let height = rows.len();
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(LabelingError::EmptyMask { width, height });
        }

        let mut data = Vec::new();
        data.try_reserve_exact(width * height)?;
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(LabelingError::RaggedRows {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            data.extend(row.iter().map(|value| *value != T::default()));
        }

        Self::new(width, height, data)
    }

    /// Treat every nonzero luma value as foreground.
    pub fn from_gray(image: &GrayImage) -> Result<Self> {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let data = image.pixels().map(|pixel| pixel[0] != 0).collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel at column `x`, row `y` is foreground
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&value| value).count()
    }
}

/// Grid of component labels with the same shape as its mask. `0` is background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    width: usize,
    height: usize,
    labels: Vec<u32>,
}

impl LabelGrid {
    /// Zero-filled grid, allocated fallibly.
    pub(crate) fn zeroed(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            width,
            height,
            labels: try_filled(width * height, 0u32)?,
        })
    }

    pub(crate) fn from_raw(width: usize, height: usize, labels: Vec<u32>) -> Self {
        debug_assert_eq!(labels.len(), width * height);
        Self { width, height, labels }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.labels[y * self.width + x]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.labels
    }

    /// Iterate over the grid one row at a time
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.labels.chunks_exact(self.width)
    }

    /// Copy the labels into an image buffer for use with `image`/`imageproc`.
    pub fn to_image(&self) -> Result<LabelImage> {
        let pixels = self.labels.len();
        let width = u32::try_from(self.width).map_err(|_| LabelingError::TooLarge { pixels })?;
        let height = u32::try_from(self.height).map_err(|_| LabelingError::TooLarge { pixels })?;
        ImageBuffer::from_raw(width, height, self.labels.clone()).ok_or(
            LabelingError::DimensionMismatch {
                expected: self.width * self.height,
                found: pixels,
            },
        )
    }
}

/// Result of running a pipeline over a source image
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledImage {
    pub labeling: Labeling,
    /// Original image dimensions
    pub image_width: u32,
    pub image_height: u32,
}

impl LabeledImage {
    pub fn component_count(&self) -> u32 {
        self.labeling.component_count()
    }
}

/// Measurements of a single labeled component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentStats {
    pub label: u32,
    /// Number of pixels in the component
    pub area: usize,
    /// Inclusive bounding box as `[min_x, min_y, max_x, max_y]`
    pub bounding_box: [usize; 4],
    pub centroid: [f64; 2],
}

/// Final engine output: a compacted label grid and the component count `K`.
///
/// Foreground labels always form exactly `1..=component_count`. The fields
/// are only changed by operations that keep that range dense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeling {
    grid: LabelGrid,
    component_count: u32,
}

impl Labeling {
    pub(crate) fn new(grid: LabelGrid, component_count: u32) -> Self {
        Self { grid, component_count }
    }

    pub fn grid(&self) -> &LabelGrid {
        &self.grid
    }

    /// Number of components `K`
    pub fn component_count(&self) -> u32 {
        self.component_count
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Per-component statistics, indexed by `label - 1`.
    pub fn components(&self) -> Vec<ComponentStats> {
        let count = self.component_count as usize;
        let mut area = vec![0usize; count];
        let mut sums = vec![[0f64; 2]; count];
        let mut boxes = vec![[usize::MAX, usize::MAX, 0, 0]; count];

        for (y, row) in self.grid.rows().enumerate() {
            for (x, &label) in row.iter().enumerate() {
                if label == 0 {
                    continue;
                }
                let index = label as usize - 1;
                area[index] += 1;
                sums[index][0] += x as f64;
                sums[index][1] += y as f64;
                let bbox = &mut boxes[index];
                bbox[0] = bbox[0].min(x);
                bbox[1] = bbox[1].min(y);
                bbox[2] = bbox[2].max(x);
                bbox[3] = bbox[3].max(y);
            }
        }

        (0..count)
            .map(|index| ComponentStats {
                label: index as u32 + 1,
                area: area[index],
                bounding_box: boxes[index],
                centroid: [
                    sums[index][0] / area[index] as f64,
                    sums[index][1] / area[index] as f64,
                ],
            })
            .collect()
    }

    /// Drop every component failing `keep` and renumber the survivors densely,
    /// in the order they are first met in a row-major sweep.
    ///
    /// Returns the number of removed components.
    pub fn retain<F>(&mut self, mut keep: F) -> u32
    where
        F: FnMut(&ComponentStats) -> bool,
    {
        let kept: Vec<bool> = self.components().iter().map(|stats| keep(stats)).collect();
        if kept.iter().all(|&k| k) {
            return 0;
        }

        let mut relabel = vec![0u32; kept.len() + 1];
        let mut next_label = 1u32;
        for label in self.grid.as_mut_slice() {
            if *label == 0 {
                continue;
            }
            let old = *label as usize;
            if !kept[old - 1] {
                *label = 0;
                continue;
            }
            if relabel[old] == 0 {
                relabel[old] = next_label;
                next_label += 1;
            }
            *label = relabel[old];
        }

        let removed = self.component_count - (next_label - 1);
        self.component_count = next_label - 1;
        removed
    }

    /// Whether both labelings describe the same partition, ignoring label values.
    pub fn same_partition(&self, other: &Labeling) -> bool {
        if self.width() != other.width()
            || self.height() != other.height()
            || self.component_count != other.component_count
        {
            return false;
        }

        let size = self.component_count as usize + 1;
        let mut forward = vec![0u32; size];
        let mut backward = vec![0u32; size];
        for (&a, &b) in self.grid.as_slice().iter().zip(other.grid.as_slice()) {
            if (a == 0) != (b == 0) {
                return false;
            }
            if a == 0 {
                continue;
            }
            let (a_index, b_index) = (a as usize, b as usize);
            if a_index >= size || b_index >= size {
                return false;
            }
            if forward[a_index] == 0 && backward[b_index] == 0 {
                forward[a_index] = b;
                backward[b_index] = a;
            } else if forward[a_index] != b || backward[b_index] != a {
                return false;
            }
        }
        true
    }
}
