use std::collections::HashSet;

use image::{Rgb, RgbImage};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{traits::ColorSource, types::Labeling};

/// Background color used when none is given
pub const DEFAULT_BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Number of 24-bit colors other than [`DEFAULT_BACKGROUND`]. Palettes stay
/// free of repeats up to this many labels and cycle beyond it.
pub const DISTINCT_COLORS: usize = (1 << 24) - 1;

fn from_packed(packed: u32) -> Rgb<u8> {
    let [_, r, g, b] = packed.to_be_bytes();
    Rgb([r, g, b])
}

/// Collect `count` colors from `candidates`, skipping repeats and the
/// background, then cycle once the distinct colors run out.
fn distinct_palette<I>(count: u32, candidates: I) -> Vec<Rgb<u8>>
where
    I: IntoIterator<Item = Rgb<u8>>,
{
    let count = count as usize;
    let mut seen = HashSet::with_capacity(count.min(DISTINCT_COLORS));
    let mut palette: Vec<Rgb<u8>> = candidates
        .into_iter()
        .filter(|&color| color != DEFAULT_BACKGROUND && seen.insert(color))
        .take(count.min(DISTINCT_COLORS))
        .collect();

    let distinct = palette.len();
    if distinct > 0 {
        for index in distinct..count {
            let color = palette[index % distinct];
            palette.push(color);
        }
    }
    palette
}

/// Uniformly random colors per label, redrawn until every label has its own.
///
/// With a seed the palette is reproducible; without one every call draws
/// from OS entropy.
#[derive(Debug, Clone, Default)]
pub struct RandomColors {
    pub seed: Option<u64>,
}

impl RandomColors {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl ColorSource for RandomColors {
    fn palette(&self, count: u32) -> Vec<Rgb<u8>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let draws = std::iter::repeat_with(move || {
            Rgb([rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()])
        });
        distinct_palette(count, draws)
    }
}

/// Fixed list of colors, used in order.
///
/// Labels past the end of the list get further colors from a deterministic
/// walk over the RGB cube, so no two labels share a color.
#[derive(Debug, Clone)]
pub struct FixedPalette {
    pub colors: Vec<Rgb<u8>>,
}

impl Default for FixedPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                Rgb([230, 25, 75]),
                Rgb([60, 180, 75]),
                Rgb([255, 225, 25]),
                Rgb([0, 130, 200]),
                Rgb([245, 130, 48]),
                Rgb([145, 30, 180]),
                Rgb([70, 240, 240]),
                Rgb([240, 50, 230]),
                Rgb([210, 245, 60]),
                Rgb([250, 190, 212]),
                Rgb([0, 128, 128]),
                Rgb([170, 110, 40]),
            ],
        }
    }
}

impl ColorSource for FixedPalette {
    fn palette(&self, count: u32) -> Vec<Rgb<u8>> {
        // Multiplying by an odd constant permutes the 24-bit values while
        // spreading consecutive steps across the cube.
        let lattice = (1..=DISTINCT_COLORS as u32)
            .map(|step| from_packed(step.wrapping_mul(0x9E_3779) & 0xFF_FFFF));
        distinct_palette(count, self.colors.iter().copied().chain(lattice))
    }
}

/// Paint each component with its palette color and background with `background`.
pub fn colorize(labeling: &Labeling, source: &dyn ColorSource, background: Rgb<u8>) -> RgbImage {
    let palette = source.palette(labeling.component_count());
    let width = labeling.width() as u32;
    let height = labeling.height() as u32;
    let labels = labeling.grid().as_slice();

    RgbImage::from_fn(width, height, |x, y| {
        let label = labels[y as usize * labeling.width() + x as usize];
        if label == 0 {
            background
        } else {
            palette[label as usize - 1]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{algorithms::label_components, types::{BinaryMask, Connectivity}};

    #[test]
    fn test_seeded_colors_are_reproducible() {
        let a = RandomColors::seeded(7).palette(16);
        let b = RandomColors::seeded(7).palette(16);
        assert_eq!(a.len(), 16);
        assert_eq!(a, b);
    }

    fn assert_all_distinct(palette: &[Rgb<u8>]) {
        let unique: HashSet<_> = palette.iter().collect();
        assert_eq!(unique.len(), palette.len(), "palette repeats a color");
        assert!(!palette.contains(&DEFAULT_BACKGROUND));
    }

    #[test]
    fn test_fixed_palette_extends_past_listed_colors() {
        let listed = FixedPalette::default().colors;
        let palette = FixedPalette::default().palette(500);
        assert_eq!(palette.len(), 500);
        assert_eq!(&palette[..listed.len()], listed.as_slice());
        assert_all_distinct(&palette);
        assert_eq!(palette, FixedPalette::default().palette(500));
    }

    #[test]
    fn test_fixed_palette_skips_repeated_and_background_entries() {
        let palette = FixedPalette {
            colors: vec![Rgb([1, 1, 1]), DEFAULT_BACKGROUND, Rgb([1, 1, 1]), Rgb([2, 2, 2])],
        }
        .palette(4);
        assert_eq!(&palette[..2], &[Rgb([1, 1, 1]), Rgb([2, 2, 2])]);
        assert_all_distinct(&palette);

        assert_all_distinct(&FixedPalette { colors: Vec::new() }.palette(64));
    }

    #[test]
    fn test_random_colors_never_repeat() {
        assert_all_distinct(&RandomColors::seeded(3).palette(2000));
        assert_all_distinct(&RandomColors::default().palette(200));
    }

    #[test]
    fn test_many_components_get_distinct_colors() {
        let row: Vec<u8> = (0..25).map(|x| (x % 2 == 0) as u8).collect();
        let mask = BinaryMask::from_rows::<u8, _>(&[row]).unwrap();
        let labeling = label_components(&mask, Connectivity::Four).unwrap();
        assert_eq!(labeling.component_count(), 13);

        let image = colorize(&labeling, &FixedPalette::default(), DEFAULT_BACKGROUND);
        let colors: Vec<Rgb<u8>> = (0..25).step_by(2).map(|x| *image.get_pixel(x, 0)).collect();
        assert_all_distinct(&colors);
    }

    #[test]
    fn test_colorize_paints_components_and_background() {
        let mask = BinaryMask::from_rows::<u8, _>(&[[1u8, 0, 1]]).unwrap();
        let labeling = label_components(&mask, Connectivity::Four).unwrap();
        let image = colorize(&labeling, &FixedPalette::default(), DEFAULT_BACKGROUND);

        let colors = FixedPalette::default().colors;
        assert_eq!(image.dimensions(), (3, 1));
        assert_eq!(*image.get_pixel(0, 0), colors[0]);
        assert_eq!(*image.get_pixel(1, 0), DEFAULT_BACKGROUND);
        assert_eq!(*image.get_pixel(2, 0), colors[1]);
    }
}
