//! Scale Module
//! Categorical band scale and sequential color scale used by the renderer.

use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::RGBColor;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Collect distinct values preserving first-occurrence order.
pub fn first_occurrence<T, I>(values: I) -> Vec<T>
where
    T: Clone + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v.clone()) {
            out.push(v);
        }
    }
    out
}

/// Categorical mapping from discrete domain values to equal-width bands
/// within a pixel span.
///
/// Bands are uniform width with equal inner/outer padding and center
/// alignment. A reversed range (`stop < start`) reverses the band positions,
/// which is how the y axis puts the first variable at the bottom.
pub struct BandScale<T: Eq + Hash + Clone> {
    domain: Vec<T>,
    index: HashMap<T, usize>,
    positions: Vec<f64>,
    bandwidth: f64,
}

impl<T: Eq + Hash + Clone> BandScale<T> {
    pub fn new(domain: Vec<T>, range: (f64, f64), padding: f64) -> Self {
        let domain = first_occurrence(domain);
        let (range_start, range_stop) = range;
        let reverse = range_stop < range_start;
        let (r0, r1) = if reverse {
            (range_stop, range_start)
        } else {
            (range_start, range_stop)
        };

        let n = domain.len() as f64;
        let step = (r1 - r0) / 1f64.max(n - padding + padding * 2.0);
        let bandwidth = step * (1.0 - padding);
        let first = r0 + (r1 - r0 - step * (n - padding)) * 0.5;

        let mut positions: Vec<f64> = (0..domain.len())
            .map(|i| first + step * i as f64)
            .collect();
        if reverse {
            positions.reverse();
        }

        let index = domain
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();

        Self {
            domain,
            index,
            positions,
            bandwidth,
        }
    }

    /// Start position of the band for `key`, `None` for values outside the
    /// domain.
    pub fn position(&self, key: &T) -> Option<f64> {
        self.index.get(key).map(|&i| self.positions[i])
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn domain(&self) -> &[T] {
        &self.domain
    }
}

/// Continuous mapping from a fixed numeric domain through the Viridis
/// interpolation.
///
/// Out-of-domain input clamps to the endpoints; non-finite input has no
/// color.
pub struct SequentialScale {
    min: f64,
    max: f64,
}

impl SequentialScale {
    pub fn new(domain: (f64, f64)) -> Self {
        let (d0, d1) = domain;
        let (min, max) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        Self { min, max }
    }

    pub fn color(&self, value: f64) -> Option<RGBColor> {
        if !value.is_finite() {
            return None;
        }
        let clamped = value.clamp(self.min, self.max);
        Some(ViridisRGB.get_color_normalized(clamped, self.min, self.max))
    }
}
