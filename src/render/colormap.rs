//! Magma colormap for spectrogram panels

use plotters::style::RGBColor;

/// Evenly spaced anchors from black through purple and orange to pale yellow
const MAGMA: [(u8, u8, u8); 9] = [
    (0, 0, 4),
    (28, 16, 68),
    (79, 18, 123),
    (129, 37, 129),
    (181, 54, 122),
    (229, 80, 100),
    (251, 135, 97),
    (254, 194, 135),
    (252, 253, 191),
];

/// Colour at position `t` (clamped to `0..=1`), linearly interpolated
pub fn magma(t: f32) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (MAGMA.len() - 1) as f32;
    let lower = (scaled.floor() as usize).min(MAGMA.len() - 2);
    let frac = scaled - lower as f32;

    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * frac).round() as u8;
    let (a, b) = (MAGMA[lower], MAGMA[lower + 1]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(magma(0.0), RGBColor(0, 0, 4));
        assert_eq!(magma(1.0), RGBColor(252, 253, 191));
        assert_eq!(magma(-3.0), magma(0.0));
        assert_eq!(magma(f32::NAN), magma(0.0));
    }

    #[test]
    fn test_brightens_monotonically() {
        let luma = |c: RGBColor| c.0 as u32 + c.1 as u32 + c.2 as u32;
        let samples: Vec<u32> = (0..=20).map(|i| luma(magma(i as f32 / 20.0))).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }
}
