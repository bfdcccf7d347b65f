use crate::{
    algorithms::equivalence::EquivalenceTable,
    error::{LabelingError, Result},
    types::{BinaryMask, Connectivity, LabelGrid},
};

/// Output of the forward raster scan: provisional labels plus the
/// equivalences discovered between them.
#[derive(Debug, Clone)]
pub struct ProvisionalLabels {
    pub grid: LabelGrid,
    pub equivalences: EquivalenceTable,
}

/// Labels of the already-visited neighbors of pixel `(x, y)` that are foreground.
///
/// Only pixels earlier in row-major order are inspected: left and top, plus
/// the two upper corners under 8-connectivity.
#[inline]
fn visited_neighbors(
    labels: &[u32],
    width: usize,
    x: usize,
    y: usize,
    connectivity: Connectivity,
    out: &mut [u32; 4],
) -> usize {
    let index = y * width + x;
    let mut count = 0;
    let mut push = |label: u32| {
        if label != 0 {
            out[count] = label;
            count += 1;
        }
    };

    if y > 0 {
        let above = index - width;
        push(labels[above]);
        if connectivity == Connectivity::Eight {
            if x > 0 {
                push(labels[above - 1]);
            }
            if x + 1 < width {
                push(labels[above + 1]);
            }
        }
    }
    if x > 0 {
        push(labels[index - 1]);
    }
    count
}

/// Single top-to-bottom, left-to-right pass assigning provisional labels.
///
/// A foreground pixel with no labeled neighbor opens a fresh label; otherwise
/// it takes the minimum neighbor label and every neighbor class is merged
/// into that label's class.
pub fn scan(mask: &BinaryMask, connectivity: Connectivity) -> Result<ProvisionalLabels> {
    let (width, height) = (mask.width(), mask.height());
    let pixels = width * height;
    if pixels >= u32::MAX as usize {
        return Err(LabelingError::TooLarge { pixels });
    }

    let mut grid = LabelGrid::zeroed(width, height)?;
    let mut equivalences = EquivalenceTable::new();
    let foreground = mask.as_slice();
    let labels = grid.as_mut_slice();
    let mut neighbors = [0u32; 4];

    for y in 0..height {
        for x in 0..width {
            let index = y * width + x;
            if !foreground[index] {
                continue;
            }

            let count = visited_neighbors(labels, width, x, y, connectivity, &mut neighbors);
            if count == 0 {
                labels[index] = equivalences.make_label()?;
                continue;
            }

            let adjacent = &neighbors[..count];
            let assigned = adjacent.iter().copied().min().unwrap_or_default();
            labels[index] = assigned;
            for &neighbor in adjacent {
                if neighbor != assigned {
                    equivalences.union(assigned, neighbor);
                }
            }
        }
    }

    tracing::debug!(
        width,
        height,
        provisional = equivalences.len(),
        %connectivity,
        "raster scan finished"
    );

    Ok(ProvisionalLabels { grid, equivalences })
}
