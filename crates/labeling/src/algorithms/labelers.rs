use image::{GrayImage, Luma};
use imageproc::region_labelling::{self, Connectivity as ImageprocConnectivity};

use crate::{
    algorithms::{
        compact::{compact, compact_with},
        equivalence::{EquivalenceTable, RootTable},
        scan::{scan, ProvisionalLabels},
    },
    error::{LabelingError, Result},
    traits::ComponentLabeler,
    types::{BinaryMask, Connectivity, LabelGrid, Labeling},
};

/// Collapse the equivalences recorded by the scan into canonical roots.
pub fn resolve(equivalences: EquivalenceTable) -> Result<RootTable> {
    let roots = equivalences.resolve()?;
    tracing::debug!(
        provisional = roots.len(),
        classes = roots.class_count(),
        "resolved label equivalences"
    );
    Ok(roots)
}

/// Two-pass connected component labeling: scan, resolve, compact.
pub fn label_components(mask: &BinaryMask, connectivity: Connectivity) -> Result<Labeling> {
    let ProvisionalLabels { grid, equivalences } = scan(mask, connectivity)?;
    let roots = resolve(equivalences)?;
    compact(grid, &roots)
}

/// The two-pass union-find labeler
#[derive(Debug, Clone, Default)]
pub struct TwoPassLabeler {
    pub connectivity: Connectivity,
}

impl TwoPassLabeler {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl ComponentLabeler for TwoPassLabeler {
    fn label(&self, mask: &BinaryMask) -> Result<Labeling> {
        label_components(mask, self.connectivity)
    }
}

/// Imageproc-based labeler, renumbered to the same dense encounter order
#[derive(Debug, Clone, Default)]
pub struct ImageprocLabeler {
    pub connectivity: Connectivity,
}

impl ComponentLabeler for ImageprocLabeler {
    fn label(&self, mask: &BinaryMask) -> Result<Labeling> {
        let (width, height) = (mask.width(), mask.height());
        let pixels = width * height;
        let too_large = |_: std::num::TryFromIntError| LabelingError::TooLarge { pixels };
        let image_width = u32::try_from(width).map_err(too_large)?;
        let image_height = u32::try_from(height).map_err(too_large)?;

        let raw = mask
            .as_slice()
            .iter()
            .map(|&foreground| if foreground { 255u8 } else { 0 })
            .collect();
        let image = GrayImage::from_raw(image_width, image_height, raw).ok_or(
            LabelingError::DimensionMismatch {
                expected: pixels,
                found: mask.as_slice().len(),
            },
        )?;

        let connectivity = match self.connectivity {
            Connectivity::Four => ImageprocConnectivity::Four,
            Connectivity::Eight => ImageprocConnectivity::Eight,
        };
        let labels = region_labelling::connected_components(&image, connectivity, Luma([0u8]));

        let raw_labels = labels.into_raw();
        let max_label = raw_labels.iter().copied().max().unwrap_or(0) as usize;
        compact_with(LabelGrid::from_raw(width, height, raw_labels), max_label, |label| label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(rows: &[&[u8]]) -> BinaryMask {
        BinaryMask::from_rows::<u8, _>(rows).expect("valid mask")
    }

    #[test]
    fn test_full_square_is_one_component() {
        let labeling = label_components(&mask(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]]), Connectivity::Four)
            .unwrap();
        assert_eq!(labeling.component_count(), 1);
        assert!(labeling.grid().as_slice().iter().all(|&label| label == 1));
    }

    #[test]
    fn test_diagonal_pixels_are_separate_under_four_connectivity() {
        let mask = mask(&[&[1, 0], &[0, 1]]);
        let labeling = label_components(&mask, Connectivity::Four).unwrap();
        assert_eq!(labeling.component_count(), 2);
        assert_eq!(labeling.grid().as_slice(), &[1, 0, 0, 2]);

        let labeling = label_components(&mask, Connectivity::Eight).unwrap();
        assert_eq!(labeling.component_count(), 1);
    }

    #[test]
    fn test_u_shape_resolves_to_one_component() {
        let labeling = label_components(
            &mask(&[
                &[1, 0, 0, 1],
                &[1, 0, 0, 1],
                &[1, 0, 0, 1],
                &[1, 1, 1, 1],
            ]),
            Connectivity::Four,
        )
        .unwrap();
        assert_eq!(labeling.component_count(), 1);
        assert!(labeling
            .grid()
            .as_slice()
            .iter()
            .all(|&label| label == 0 || label == 1));
    }

    #[test]
    fn test_empty_mask_has_no_components() {
        let labeling = label_components(&mask(&[&[0, 0, 0], &[0, 0, 0]]), Connectivity::Four).unwrap();
        assert_eq!(labeling.component_count(), 0);
        assert!(labeling.grid().as_slice().iter().all(|&label| label == 0));
    }

    #[test]
    fn test_spiral_needs_multi_hop_resolution() {
        // Each arm of the spiral opens its own provisional label before the
        // arms are joined through several merge points.
        let labeling = label_components(
            &mask(&[
                &[1, 0, 1, 0, 1, 0, 1],
                &[1, 0, 1, 0, 1, 0, 1],
                &[1, 0, 1, 1, 1, 0, 1],
                &[1, 0, 0, 0, 1, 0, 1],
                &[1, 1, 1, 1, 1, 1, 1],
            ]),
            Connectivity::Four,
        )
        .unwrap();
        assert_eq!(labeling.component_count(), 1);
    }

    #[test]
    fn test_labels_follow_first_encounter_order() {
        let labeling = label_components(
            &mask(&[
                &[0, 0, 1, 0, 1],
                &[1, 0, 1, 0, 1],
                &[1, 0, 1, 1, 1],
            ]),
            Connectivity::Four,
        )
        .unwrap();
        assert_eq!(labeling.component_count(), 2);
        assert_eq!(labeling.grid().get(2, 0), 1);
        assert_eq!(labeling.grid().get(4, 0), 1);
        assert_eq!(labeling.grid().get(0, 1), 2);
    }

    #[test]
    fn test_imageproc_labeler_matches_two_pass_output() {
        let mask = mask(&[
            &[1, 1, 0, 1, 0],
            &[0, 1, 0, 1, 1],
            &[1, 0, 0, 0, 1],
            &[1, 1, 1, 0, 1],
        ]);
        for connectivity in [Connectivity::Four, Connectivity::Eight] {
            let ours = TwoPassLabeler::new(connectivity).label(&mask).unwrap();
            let theirs = ImageprocLabeler { connectivity }.label(&mask).unwrap();
            assert_eq!(ours, theirs);
        }
    }
}
