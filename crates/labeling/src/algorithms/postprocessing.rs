use crate::{error::Result, traits::LabelPostProcessor, types::Labeling};

/// Drops components smaller than `min_area` pixels
#[derive(Debug, Clone)]
pub struct MinimumAreaFilter {
    pub min_area: usize,
}

impl Default for MinimumAreaFilter {
    fn default() -> Self {
        Self { min_area: 10 }
    }
}

impl LabelPostProcessor for MinimumAreaFilter {
    fn process(&self, labeling: &mut Labeling) -> Result<()> {
        let removed = labeling.retain(|stats| stats.area >= self.min_area);
        tracing::debug!(
            min_area = self.min_area,
            removed,
            remaining = labeling.component_count(),
            "applied minimum area filter"
        );
        Ok(())
    }
}

/// Keeps only the `max_components` largest components.
///
/// Components tied in area with the smallest survivor are kept in label order.
#[derive(Debug, Clone)]
pub struct MaximumComponentsFilter {
    pub max_components: usize,
}

impl LabelPostProcessor for MaximumComponentsFilter {
    fn process(&self, labeling: &mut Labeling) -> Result<()> {
        let mut components = labeling.components();
        if components.len() <= self.max_components {
            return Ok(());
        }

        // Stable sort keeps lower labels first among equal areas.
        components.sort_by(|a, b| b.area.cmp(&a.area));
        let mut keep = vec![false; components.len() + 1];
        for stats in components.iter().take(self.max_components) {
            keep[stats.label as usize] = true;
        }

        let removed = labeling.retain(|stats| keep[stats.label as usize]);
        tracing::debug!(
            max_components = self.max_components,
            removed,
            "applied component count filter"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::label_components, types::{BinaryMask, Connectivity}};

    fn labeled(rows: &[&[u8]]) -> Labeling {
        let mask = BinaryMask::from_rows::<u8, _>(rows).expect("valid mask");
        label_components(&mask, Connectivity::Four).expect("labeling")
    }

    #[test]
    fn test_minimum_area_filter_removes_specks() {
        let mut labeling = labeled(&[
            &[1, 0, 1, 1],
            &[0, 0, 1, 1],
            &[1, 0, 0, 0],
        ]);
        assert_eq!(labeling.component_count(), 3);

        MinimumAreaFilter { min_area: 2 }.process(&mut labeling).unwrap();
        assert_eq!(labeling.component_count(), 1);
        assert_eq!(labeling.grid().as_slice(), &[0, 0, 1, 1, 0, 0, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_maximum_components_filter_keeps_largest() {
        let mut labeling = labeled(&[
            &[1, 0, 1, 1, 1],
            &[0, 0, 0, 0, 0],
            &[1, 1, 0, 1, 0],
        ]);
        assert_eq!(labeling.component_count(), 4);

        MaximumComponentsFilter { max_components: 2 }
            .process(&mut labeling)
            .unwrap();
        assert_eq!(labeling.component_count(), 2);
        assert_eq!(labeling.grid().get(2, 0), 1);
        assert_eq!(labeling.grid().get(0, 2), 2);
        assert_eq!(labeling.grid().get(0, 0), 0);
        assert_eq!(labeling.grid().get(3, 2), 0);
    }
}
