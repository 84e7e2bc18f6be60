//! Width tracks and integer width distribution

use crate::config::LayoutConfig;
use crate::model::ColumnDescriptor;

/// Working width state of one column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Track {
    pub field: String,
    pub width: u32,
    pub min: u32,
    pub max: Option<u32>,
    pub flex: Option<f64>,
    /// The descriptor carried an explicit width.
    pub explicit: bool,
    /// Width captured at the end of initialization, restored on reset.
    pub initial: u32,
}

impl Track {
    pub fn from_descriptor(column: &ColumnDescriptor, config: &LayoutConfig) -> Self {
        let min = column.min_width.unwrap_or(config.default_min_width);
        // An inverted range collapses to the minimum.
        let max = column.max_width.map(|max| max.max(min));
        let mut track = Self {
            field: column.field_name.clone(),
            width: 0,
            min,
            max,
            flex: column.flex_weight(),
            explicit: column.width.is_some(),
            initial: 0,
        };
        track.width = track.clamp(i64::from(column.width.unwrap_or(config.default_width)));
        track
    }

    /// Eligible to absorb width during redistribution.
    pub fn is_adjustable(&self) -> bool {
        !self.explicit || self.flex.is_some()
    }

    pub fn clamp(&self, width: i64) -> u32 {
        let upper = self.max.map_or(i64::from(u32::MAX), i64::from);
        width.clamp(i64::from(self.min), upper) as u32
    }

    /// Moves the width by up to `delta` within bounds; returns the applied change.
    pub fn adjust(&mut self, delta: i64) -> i64 {
        let before = i64::from(self.width);
        self.width = self.clamp(before + delta);
        i64::from(self.width) - before
    }

    /// Whether the width can still move in the direction of `delta`.
    pub fn has_room(&self, delta: i64) -> bool {
        match delta.signum() {
            1 => self.max.is_none_or(|max| self.width < max),
            -1 => self.width > self.min,
            _ => false,
        }
    }
}

/// Sum of all widths.
pub(crate) fn total(tracks: &[Track]) -> i64 {
    tracks.iter().map(|t| i64::from(t.width)).sum()
}

/// Spreads `delta` pixels over the `(index, weight)` candidates in proportion
/// to weight, clamping every track to its bounds.
///
/// Shares are truncated toward zero; pixels lost to truncation are handed out
/// one at a time starting from the last candidate. Candidates that hit a bound
/// drop out and the rest is re-spread over the remaining ones. Returns the
/// part of `delta` that no candidate could take.
pub(crate) fn distribute(tracks: &mut [Track], candidates: &[(usize, f64)], mut delta: i64) -> i64 {
    let mut open: Vec<(usize, f64)> = candidates
        .iter()
        .copied()
        .filter(|&(i, weight)| weight > 0.0 && tracks[i].has_room(delta))
        .collect();

    while delta != 0 && !open.is_empty() {
        let total_weight: f64 = open.iter().map(|&(_, w)| w).sum();
        let mut placed = 0;
        for &(i, weight) in &open {
            let share = (delta as f64 * weight / total_weight).trunc() as i64;
            placed += tracks[i].adjust(share);
        }
        delta -= placed;

        if placed == 0 {
            let step = delta.signum();
            for &(i, _) in open.iter().rev() {
                if delta == 0 {
                    break;
                }
                delta -= tracks[i].adjust(step);
            }
        }

        open.retain(|&(i, _)| tracks[i].has_room(delta));
    }

    delta
}

/// Pushes a leftover onto the last column, spilling leftward past columns
/// that are pinned at a bound. Returns what still could not be placed.
pub(crate) fn settle(tracks: &mut [Track], mut rest: i64) -> i64 {
    for track in tracks.iter_mut().rev() {
        if rest == 0 {
            break;
        }
        rest -= track.adjust(rest);
    }
    rest
}
