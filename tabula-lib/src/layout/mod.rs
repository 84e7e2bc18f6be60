//! Column width layout
//!
//! [`ColumnLayoutEngine`] partitions a container width into per-column pixel
//! widths. After every operation the widths sum to the container width
//! exactly and each width lies within its column's `[min, max]` bounds.
//! The two can only disagree when the bounds themselves make an exact fit
//! impossible, in which case the bounds win.

mod drag;
mod track;

use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::model::ColumnDescriptor;

use drag::BorderDrag;
pub use drag::Throttle;
use track::Track;
use track::distribute;
use track::settle;
use track::total;

/// Keeps the widths of a fixed column set consistent under resizing.
///
/// Every method is a no-op before
/// [`initialize_columns`](Self::initialize_columns) and for unknown fields.
///
/// # Example
///
/// ```
/// use tabula_lib::config::LayoutConfig;
/// use tabula_lib::layout::ColumnLayoutEngine;
/// use tabula_lib::model::{CellType, ColumnDescriptor};
///
/// let columns = vec![
///     ColumnDescriptor::new("name", "Name", CellType::Text),
///     ColumnDescriptor::new("age", "Age", CellType::Number).width(80),
/// ];
///
/// let mut layout = ColumnLayoutEngine::new(LayoutConfig::default());
/// layout.initialize_columns(&columns, 500);
/// assert_eq!(layout.column_width("name"), 420);
/// assert_eq!(layout.column_width("age"), 80);
///
/// layout.update_column_widths("name", 400, "age", 100);
/// assert_eq!(layout.track_sizes(), "400px 100px");
/// ```
#[derive(Debug, Clone)]
pub struct ColumnLayoutEngine {
    config: LayoutConfig,
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
    container_width: u32,
    initialized: bool,
    drag: Option<BorderDrag>,
}

impl Default for ColumnLayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl ColumnLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            index: HashMap::new(),
            container_width: 0,
            initialized: false,
            drag: None,
        }
    }

    /// Computes starting widths for `columns` inside `container_width`.
    ///
    /// Each column starts at its explicit width (or the configured default),
    /// raised to its minimum. The difference to the container is spread over
    /// the adjustable columns by flex weight, or evenly when none has a
    /// weight. The resulting widths are remembered for
    /// [`reset_to_initial_sizes`](Self::reset_to_initial_sizes).
    pub fn initialize_columns(&mut self, columns: &[ColumnDescriptor], container_width: u32) {
        self.tracks = Vec::with_capacity(columns.len());
        self.index = HashMap::with_capacity(columns.len());
        for column in columns {
            if self.index.contains_key(&column.field_name) {
                continue;
            }
            self.index
                .insert(column.field_name.clone(), self.tracks.len());
            self.tracks.push(Track::from_descriptor(column, &self.config));
        }

        self.container_width = container_width;
        self.initialized = true;
        self.drag = None;
        self.fit_adjustable();

        for track in &mut self.tracks {
            track.initial = track.width;
        }
        log::debug!(
            "layout initialized: {} columns in {}px",
            self.tracks.len(),
            container_width
        );
    }

    /// Resizes one column, trading width with its neighbor.
    ///
    /// The neighbor is the column to the right, or to the left for the last
    /// column. A grid with a single column cannot change its width this way.
    pub fn resize_column(&mut self, field: &str, width: u32) {
        let Some(a) = self.lookup(field) else {
            return;
        };
        let b = if a + 1 < self.tracks.len() {
            a + 1
        } else if a > 0 {
            a - 1
        } else {
            log::debug!("resize_column: '{}' has no neighbor", field);
            return;
        };
        self.apply_pair(a, b, i64::from(width));
    }

    /// Sets the widths of two adjacent columns from a border drag.
    ///
    /// The combined width of the pair never changes. The requested change is
    /// taken as the shift of the shared border, `width_a` growing as
    /// `width_b` shrinks; when the two requests disagree the shift is their
    /// average. If a bound stops one column, the other column absorbs the rest.
    pub fn update_column_widths(&mut self, field_a: &str, width_a: u32, field_b: &str, width_b: u32) {
        let (Some(a), Some(b)) = (self.lookup(field_a), self.lookup(field_b)) else {
            return;
        };
        if a == b {
            return;
        }
        let grow_a = i64::from(width_a) - i64::from(self.tracks[a].width);
        let shrink_b = i64::from(self.tracks[b].width) - i64::from(width_b);
        let shift = (grow_a + shrink_b).div_euclid(2) + (grow_a + shrink_b).rem_euclid(2);
        let target = i64::from(self.tracks[a].width) + shift;
        self.apply_pair(a, b, target);
    }

    /// Rescales every column to a new container width.
    ///
    /// Widths are multiplied by `new / old` and clamped. What clamping and
    /// rounding leave over is spread over all columns by their scaled width,
    /// and the final pixel correction lands on the last column.
    pub fn update_container_width(&mut self, container_width: u32) {
        if !self.initialized {
            log::debug!("update_container_width before initialization ignored");
            return;
        }
        let old = self.container_width;
        self.container_width = container_width;
        if old == container_width || self.tracks.is_empty() {
            return;
        }
        if old == 0 {
            self.fit_adjustable();
            if let Some(drag) = self.drag.as_mut() {
                drag.rebase(self.tracks[drag.left].width);
            }
            return;
        }

        let ratio = f64::from(container_width) / f64::from(old);
        for track in &mut self.tracks {
            let scaled = (f64::from(track.width) * ratio).round() as i64;
            track.width = track.clamp(scaled);
        }

        let candidates: Vec<(usize, f64)> = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (i, f64::from(t.width.max(1))))
            .collect();
        let delta = i64::from(container_width) - total(&self.tracks);
        let rest = distribute(&mut self.tracks, &candidates, delta);
        self.settle(rest);

        if let Some(drag) = self.drag.as_mut() {
            drag.rebase(self.tracks[drag.left].width);
        }
    }

    /// Restores the widths captured at initialization, then fits them to the
    /// current container width.
    pub fn reset_to_initial_sizes(&mut self) {
        if !self.initialized {
            return;
        }
        for track in &mut self.tracks {
            track.width = track.initial;
        }
        self.drag = None;
        self.fit_adjustable();
    }

    // -------------------------------------------------------------------------
    // Border drag
    // -------------------------------------------------------------------------

    /// Starts dragging the border between `left` and `right` at pointer `x`.
    ///
    /// Returns `false` if either field is unknown or both are the same.
    pub fn begin_drag(&mut self, left: &str, right: &str, x: f64) -> bool {
        let (Some(l), Some(r)) = (self.lookup(left), self.lookup(right)) else {
            return false;
        };
        if l == r {
            return false;
        }
        self.drag = Some(BorderDrag {
            left: l,
            right: r,
            start_x: x,
            last_x: x,
            left_start: self.tracks[l].width,
        });
        true
    }

    /// Moves the dragged border to pointer `x`.
    pub fn drag_to(&mut self, x: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.last_x = x;
        let (left, right, target) = (drag.left, drag.right, drag.left_target(x));
        self.apply_pair(left, right, target);
    }

    /// Finishes the drag session.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Whether a border drag is in progress.
    pub fn is_resizing(&self) -> bool {
        self.drag.is_some()
    }

    /// Moves the border between `left` and `right` by `delta` pixels.
    pub fn nudge_border(&mut self, left: &str, right: &str, delta: i64) {
        let (Some(l), Some(r)) = (self.lookup(left), self.lookup(right)) else {
            return;
        };
        if l == r {
            return;
        }
        let target = i64::from(self.tracks[l].width) + delta;
        self.apply_pair(l, r, target);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current width of a column, or 0 for unknown fields.
    pub fn column_width(&self, field: &str) -> u32 {
        self.index
            .get(field)
            .map_or(0, |&i| self.tracks[i].width)
    }

    /// `(field, width)` pairs in column order.
    pub fn widths(&self) -> Vec<(String, u32)> {
        self.tracks
            .iter()
            .map(|t| (t.field.clone(), t.width))
            .collect()
    }

    pub fn width_map(&self) -> HashMap<String, u32> {
        self.tracks
            .iter()
            .map(|t| (t.field.clone(), t.width))
            .collect()
    }

    /// Track list for a CSS grid template, e.g. `"120px 80px"`.
    pub fn track_sizes(&self) -> String {
        self.tracks
            .iter()
            .map(|t| format!("{}px", t.width))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `(min, max)` bounds of a column.
    pub fn bounds(&self, field: &str) -> Option<(u32, Option<u32>)> {
        self.index
            .get(field)
            .map(|&i| (self.tracks[i].min, self.tracks[i].max))
    }

    pub fn container_width(&self) -> u32 {
        self.container_width
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn lookup(&self, field: &str) -> Option<usize> {
        if !self.initialized {
            log::debug!("layout call before initialization ignored");
            return None;
        }
        let found = self.index.get(field).copied();
        if found.is_none() {
            log::debug!("layout: unknown field '{}'", field);
        }
        found
    }

    /// Fits the current widths to the container by adjusting the adjustable
    /// columns, weighted by flex when any of them has a weight.
    fn fit_adjustable(&mut self) {
        let adjustable: Vec<usize> = (0..self.tracks.len())
            .filter(|&i| self.tracks[i].is_adjustable())
            .collect();
        let weighted = adjustable.iter().any(|&i| self.tracks[i].flex.is_some());
        let candidates: Vec<(usize, f64)> = adjustable
            .into_iter()
            .map(|i| {
                let weight = if weighted {
                    self.tracks[i].flex.unwrap_or(0.0)
                } else {
                    1.0
                };
                (i, weight)
            })
            .collect();

        let delta = i64::from(self.container_width) - total(&self.tracks);
        let rest = distribute(&mut self.tracks, &candidates, delta);
        self.settle(rest);
    }

    fn settle(&mut self, rest: i64) {
        let rest = settle(&mut self.tracks, rest);
        if rest != 0 {
            log::debug!(
                "column bounds leave {}px unplaced in {}px container",
                rest,
                self.container_width
            );
        }
    }

    /// Sets column `a` as close to `target` as the bounds of both columns
    /// allow, giving `b` the remainder of their combined width.
    fn apply_pair(&mut self, a: usize, b: usize, target: i64) {
        let combined = i64::from(self.tracks[a].width) + i64::from(self.tracks[b].width);
        let (ta, tb) = (&self.tracks[a], &self.tracks[b]);

        let lower = match tb.max {
            Some(max) => i64::from(ta.min).max(combined - i64::from(max)),
            None => i64::from(ta.min),
        };
        let upper = match ta.max {
            Some(max) => i64::from(max).min(combined - i64::from(tb.min)),
            None => combined - i64::from(tb.min),
        };
        if lower > upper {
            log::debug!(
                "no width for '{}' satisfies both columns' bounds",
                ta.field
            );
            return;
        }

        let width_a = target.clamp(lower, upper);
        self.tracks[a].width = width_a as u32;
        self.tracks[b].width = (combined - width_a) as u32;
    }
}
