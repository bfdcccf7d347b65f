use crate::{
    algorithms::equivalence::RootTable,
    error::Result,
    types::{try_filled, LabelGrid, Labeling},
};

/// Rewrite every label through `root` and renumber the distinct roots to
/// `1..=K` in the order a row-major sweep first meets them.
///
/// `max_label` bounds both the input labels and the values `root` returns.
pub(crate) fn compact_with<F>(mut grid: LabelGrid, max_label: usize, root: F) -> Result<Labeling>
where
    F: Fn(u32) -> u32,
{
    let mut final_labels = try_filled(max_label + 1, 0u32)?;
    let mut next_label = 1u32;

    for label in grid.as_mut_slice() {
        if *label == 0 {
            continue;
        }
        let canonical = root(*label) as usize;
        if final_labels[canonical] == 0 {
            final_labels[canonical] = next_label;
            next_label += 1;
        }
        *label = final_labels[canonical];
    }

    Ok(Labeling::new(grid, next_label - 1))
}

/// Replace provisional labels by their canonical roots and compact the roots
/// into a dense `1..=K` range.
pub fn compact(grid: LabelGrid, roots: &RootTable) -> Result<Labeling> {
    let labeling = compact_with(grid, roots.len(), |label| roots.root(label))?;
    tracing::debug!(
        provisional = roots.len(),
        components = labeling.component_count(),
        "compacted labels"
    );
    Ok(labeling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::equivalence::EquivalenceTable;

    #[test]
    fn test_sparse_roots_become_dense_in_encounter_order() {
        let mut table = EquivalenceTable::new();
        for _ in 0..5 {
            table.make_label().unwrap();
        }
        table.union(5, 3);
        table.union(4, 1);
        let roots = table.resolve().unwrap();

        // Root 3 shows up before root 1 and root 2 in the sweep.
        let grid = LabelGrid::from_raw(4, 2, vec![5, 0, 3, 2, 0, 4, 1, 0]);
        let labeling = compact(grid, &roots).unwrap();

        assert_eq!(labeling.component_count(), 3);
        assert_eq!(labeling.grid().as_slice(), &[1, 0, 1, 2, 0, 3, 3, 0]);
    }

    #[test]
    fn test_all_background_yields_no_components() {
        let roots = EquivalenceTable::new().resolve().unwrap();
        let labeling = compact(LabelGrid::zeroed(3, 3).unwrap(), &roots).unwrap();
        assert_eq!(labeling.component_count(), 0);
        assert!(labeling.grid().as_slice().iter().all(|&label| label == 0));
    }
}
