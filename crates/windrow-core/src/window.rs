#![forbid(unsafe_code)]

//! Visible window computation.
//!
//! Given a scroll offset, a viewport extent and an item count, the planner
//! answers "which indices intersect the viewport right now, and how big is
//! each". Three paths:
//!
//! - **Uniform**: no overrides, O(1). First/last index fall out of a
//!   division by the item stride.
//! - **Scan**: overrides present, O(n). A linear walk accumulating a running
//!   offset, exactly mirroring the uniform result where extents agree.
//! - **Indexed**: overrides present and the collection is large. A
//!   [`PrefixSums`] tree over per-item strides is built lazily and reused
//!   across passes until the measure generation or the count changes,
//!   resolving the first index in O(log n) and filling extents in
//!   O(visible).
//!
//! The planner owns a reusable extents buffer; a [`Window`] borrows it, so
//! planning allocates nothing in the steady state.

use crate::measure::MeasureModel;
use crate::prefix::PrefixSums;
use std::ops::Range;

/// Item count above which override-aware planning switches from the linear
/// scan to the lazily built prefix index.
pub const PREFIX_THRESHOLD: usize = 256;

/// One computed visible window: the first intersecting index, its leading
/// edge in content coordinates, and the extent of every visible index in
/// ascending order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window<'a> {
    /// First index intersecting the viewport.
    pub first: usize,
    /// Accumulated offset of `first` (its leading edge).
    pub origin: f32,
    /// Extents of indices `first..first + extents.len()`.
    pub extents: &'a [f32],
}

impl Window<'_> {
    /// Number of visible indices.
    #[inline]
    pub fn len(&self) -> usize {
        self.extents.len()
    }

    /// Whether nothing is visible (degenerate geometry, empty collection,
    /// or no dimensions established yet).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extents.is_empty()
    }

    /// The visible index range, empty when the window is empty.
    #[inline]
    pub fn indices(&self) -> Range<usize> {
        self.first..self.first + self.extents.len()
    }

    /// The last visible index, if any.
    #[inline]
    pub fn last(&self) -> Option<usize> {
        self.extents.len().checked_sub(1).map(|k| self.first + k)
    }
}

/// Computes visible windows, reusing its buffers across passes.
#[derive(Debug, Default)]
pub struct WindowPlanner {
    extents: Vec<f32>,
    strides: Vec<f32>,
    prefix: Option<PrefixSums>,
    prefix_generation: u64,
    prefix_spacing: f32,
}

impl WindowPlanner {
    /// Create a planner with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the window for `offset` within a viewport of `viewport`
    /// extent over `count` items, with `spacing` between consecutive items.
    ///
    /// A negative offset is treated as 0. `viewport <= 0`, `count == 0`, or
    /// an all-zero stride (no dimensions established yet) yield an empty
    /// window.
    pub fn plan<'a>(
        &'a mut self,
        offset: f32,
        viewport: f32,
        count: usize,
        measures: &MeasureModel,
        spacing: f32,
    ) -> Window<'a> {
        self.extents.clear();
        let offset = offset.max(0.0);
        let (first, origin) = if count == 0
            || viewport <= 0.0
            || measures.aggregate(count, spacing) <= 0.0
        {
            (0, 0.0)
        } else if !measures.has_overrides() {
            self.plan_uniform(offset, viewport, count, measures.default_extent(), spacing)
        } else if count >= PREFIX_THRESHOLD {
            self.plan_indexed(offset, viewport, count, measures, spacing)
        } else {
            self.plan_scan(offset, viewport, count, measures, spacing)
        };
        Window {
            first,
            origin,
            extents: &self.extents,
        }
    }

    /// Uniform stride: first and last indices by division, O(1).
    fn plan_uniform(
        &mut self,
        offset: f32,
        viewport: f32,
        count: usize,
        extent: f32,
        spacing: f32,
    ) -> (usize, f32) {
        let stride = extent + spacing;
        if stride <= 0.0 {
            return (0, 0.0);
        }
        let last_index = count as i64 - 1;
        let first = ((offset / stride).floor() as i64).clamp(0, last_index);
        // Last index whose leading edge is above the viewport's far edge.
        let last = (((offset + viewport) / stride).ceil() as i64 - 1).clamp(first, last_index);
        for _ in first..=last {
            self.extents.push(extent);
        }
        (first as usize, first as f32 * stride)
    }

    /// Override-aware linear walk from index 0, O(n).
    ///
    /// An index is first-visible when its accumulated offset falls within
    /// `(offset - extent - spacing, offset]`; the walk stops once the
    /// accumulated offset reaches the viewport's far edge.
    fn plan_scan(
        &mut self,
        offset: f32,
        viewport: f32,
        count: usize,
        measures: &MeasureModel,
        spacing: f32,
    ) -> (usize, f32) {
        let limit = offset + viewport;
        let mut acc = 0.0f32;
        let mut first = 0usize;
        let mut origin = 0.0f32;
        let mut visible = false;
        for index in 0..count {
            let extent = measures.effective(index);
            if acc <= offset - extent - spacing {
                // Wholly above the viewport, trailing gap included.
            } else if acc <= offset {
                first = index;
                origin = acc;
                visible = true;
            }
            if acc >= limit {
                break;
            }
            acc += extent + spacing;
            if visible {
                self.extents.push(extent);
            }
        }
        if self.extents.is_empty() {
            (0, 0.0)
        } else {
            (first, origin)
        }
    }

    /// Override-aware planning through the prefix index, O(log n + visible).
    fn plan_indexed(
        &mut self,
        offset: f32,
        viewport: f32,
        count: usize,
        measures: &MeasureModel,
        spacing: f32,
    ) -> (usize, f32) {
        self.ensure_prefix(count, measures, spacing);
        let Some(sums) = self.prefix.as_ref() else {
            return (0, 0.0);
        };

        // find_prefix names the last item wholly above the offset; the
        // window starts at the one after it.
        let first = match sums.find_prefix(offset) {
            Some(before) => before + 1,
            None => 0,
        };
        if first >= count {
            // Scrolled at or past the end of the content.
            return (0, 0.0);
        }
        let origin = if first == 0 { 0.0 } else { sums.prefix(first - 1) };
        if origin + measures.effective(first) + spacing <= offset {
            // Float descent picked an index that no longer intersects.
            return (0, 0.0);
        }

        let limit = offset + viewport;
        let mut acc = origin;
        for index in first..count {
            if acc >= limit {
                break;
            }
            let extent = measures.effective(index);
            self.extents.push(extent);
            acc += extent + spacing;
        }
        (first, origin)
    }

    /// Rebuild the stride prefix tree when the measure generation, the item
    /// count, or the spacing has changed since it was last built.
    fn ensure_prefix(&mut self, count: usize, measures: &MeasureModel, spacing: f32) {
        let generation = measures.generation();
        let stale = match &self.prefix {
            Some(sums) => {
                sums.len() != count
                    || self.prefix_generation != generation
                    || self.prefix_spacing != spacing
            }
            None => true,
        };
        if stale {
            self.strides.clear();
            self.strides
                .extend((0..count).map(|index| measures.effective(index) + spacing));
            self.prefix = Some(PrefixSums::from_values(&self.strides));
            self.prefix_generation = generation;
            self.prefix_spacing = spacing;
        }
    }
}
