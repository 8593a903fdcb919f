//! Running sum of triangle areas.

use serde::{Deserialize, Serialize};

/// `sums[i]` is the total area of triangles `0..=i`.
///
/// Non-decreasing by construction; the last entry is the total surface area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CumulativeAreaTable {
    sums: Vec<f32>,
}

impl CumulativeAreaTable {
    /// Builds the table as a serial prefix sum over per-triangle areas.
    pub fn from_areas<I: IntoIterator<Item = f32>>(areas: I) -> Self {
        let mut running = 0.0f32;
        let sums = areas
            .into_iter()
            .map(|area| {
                running += area;
                running
            })
            .collect();
        Self { sums }
    }

    pub fn len(&self) -> usize {
        self.sums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }

    /// Total area, or 0 for an empty table.
    pub fn total(&self) -> f32 {
        self.sums.last().copied().unwrap_or(0.0)
    }

    pub fn sums(&self) -> &[f32] {
        &self.sums
    }

    /// Area of triangle `index`, recovered from neighbouring sums.
    pub fn area_of(&self, index: usize) -> Option<f32> {
        let upper = *self.sums.get(index)?;
        let lower = if index == 0 { 0.0 } else { self.sums[index - 1] };
        Some(upper - lower)
    }

    /// Smallest `i` with `sums[i] >= r`.
    ///
    /// Values past the total clamp to the last triangle; `None` only for an
    /// empty table.
    pub fn lower_bound(&self, r: f32) -> Option<usize> {
        if self.sums.is_empty() {
            return None;
        }
        let i = self.sums.partition_point(|&s| s < r);
        Some(i.min(self.sums.len() - 1))
    }
}
