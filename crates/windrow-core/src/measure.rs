#![forbid(unsafe_code)]

//! Per-item measure model.
//!
//! Lists are uniform by default: every item takes the extent of the measured
//! template instance. Individual items can override that extent; overrides
//! are kept sparse so that a million-row list with three custom rows stays
//! cheap to aggregate.
//!
//! Overrides referencing indices at or past the current item count are
//! ignored by aggregate queries but retained in the map. The count is
//! external state that can grow back; stale entries are only removed by an
//! explicit clear.

use std::collections::HashMap;

/// Sparse per-index extent overrides over a uniform default.
///
/// Answers "what is the extent of item `i` along the scroll axis". All
/// extents are clamped non-negative. Every effective mutation bumps a
/// generation counter so derived structures (notably the window planner's
/// prefix index) can invalidate lazily.
#[derive(Debug, Clone, Default)]
pub struct MeasureModel {
    default_extent: f32,
    overrides: HashMap<usize, f32>,
    generation: u64,
}

impl MeasureModel {
    /// Create a model with the given uniform default extent.
    pub fn new(default_extent: f32) -> Self {
        Self {
            default_extent: default_extent.max(0.0),
            overrides: HashMap::new(),
            generation: 0,
        }
    }

    /// The uniform fallback extent, taken from the template item.
    #[inline]
    pub fn default_extent(&self) -> f32 {
        self.default_extent
    }

    /// Replace the uniform default (template re-measured, e.g. theme change).
    pub fn set_default(&mut self, extent: f32) {
        let extent = extent.max(0.0);
        if extent != self.default_extent {
            self.default_extent = extent;
            self.generation += 1;
        }
    }

    /// Record a custom extent for one index.
    ///
    /// Returns `false` without storing anything when the new value equals the
    /// current effective value, so callers can skip a redundant refresh.
    pub fn set_override(&mut self, index: usize, extent: f32) -> bool {
        let extent = extent.max(0.0);
        if extent == self.effective(index) {
            return false;
        }
        self.overrides.insert(index, extent);
        self.generation += 1;
        true
    }

    /// Remove the override for one index. Returns whether one was present.
    pub fn clear_override(&mut self, index: usize) -> bool {
        let removed = self.overrides.remove(&index).is_some();
        if removed {
            self.generation += 1;
        }
        removed
    }

    /// Drop all overrides, reverting every item to the default extent.
    pub fn clear_overrides(&mut self) {
        if !self.overrides.is_empty() {
            self.overrides.clear();
            self.generation += 1;
        }
    }

    /// The override for `index` if present, else the default.
    #[inline]
    pub fn effective(&self, index: usize) -> f32 {
        self.overrides
            .get(&index)
            .copied()
            .unwrap_or(self.default_extent)
    }

    /// Whether any override is recorded (stale ones included).
    #[inline]
    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Number of recorded overrides (stale ones included).
    #[inline]
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Mutation counter; changes whenever an answer from this model may
    /// have changed.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Accumulated offset of item `index`'s leading edge: the extents of all
    /// items before it plus one `spacing` per preceding item.
    ///
    /// O(1) with no overrides, O(overrides) otherwise.
    pub fn leading_edge(&self, index: usize, spacing: f32) -> f32 {
        let gaps = index as f32 * spacing;
        if self.overrides.is_empty() {
            return self.default_extent * index as f32 + gaps;
        }
        let mut custom = 0usize;
        let mut total = 0.0;
        for (&i, &extent) in &self.overrides {
            if i < index {
                custom += 1;
                total += extent;
            }
        }
        total + (index - custom) as f32 * self.default_extent + gaps
    }

    /// Total extent of `count` items plus `spacing` between consecutive ones.
    ///
    /// O(1) when no overrides exist, O(overrides) otherwise: the sparse map
    /// is walked, never the index range. Overrides at or past `count` do not
    /// contribute.
    pub fn aggregate(&self, count: usize, spacing: f32) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let items = if self.overrides.is_empty() {
            self.default_extent * count as f32
        } else {
            let mut total = 0.0;
            let mut custom = 0usize;
            for (&index, &extent) in &self.overrides {
                if index < count {
                    custom += 1;
                    total += extent;
                }
            }
            total + (count - custom) as f32 * self.default_extent
        };
        (items + spacing * (count as f32 - 1.0)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_falls_back_to_default() {
        let mut model = MeasureModel::new(20.0);
        assert_eq!(model.effective(7), 20.0);
        model.set_override(7, 50.0);
        assert_eq!(model.effective(7), 50.0);
        assert_eq!(model.effective(8), 20.0);
    }

    #[test]
    fn set_override_signals_no_change() {
        let mut model = MeasureModel::new(20.0);
        // Equal to the effective (default) value: nothing stored.
        assert!(!model.set_override(3, 20.0));
        assert!(!model.has_overrides());

        assert!(model.set_override(3, 50.0));
        // Same value again: no change.
        assert!(!model.set_override(3, 50.0));
        // Back to the default is still a change while an override exists.
        assert!(model.set_override(3, 20.0));
    }

    #[test]
    fn generation_tracks_effective_mutations() {
        let mut model = MeasureModel::new(20.0);
        let g0 = model.generation();
        model.set_override(1, 20.0); // no-op
        assert_eq!(model.generation(), g0);
        model.set_override(1, 30.0);
        assert!(model.generation() > g0);
        let g1 = model.generation();
        model.set_default(20.0); // unchanged default
        assert_eq!(model.generation(), g1);
        model.set_default(24.0);
        assert!(model.generation() > g1);
    }

    #[test]
    fn aggregate_uniform() {
        let model = MeasureModel::new(20.0);
        // 100 items of 20 with 99 gaps of 2.
        assert_eq!(model.aggregate(100, 2.0), 100.0 * 20.0 + 99.0 * 2.0);
        assert_eq!(model.aggregate(1, 2.0), 20.0);
    }

    #[test]
    fn aggregate_zero_count_is_zero() {
        let mut model = MeasureModel::new(20.0);
        assert_eq!(model.aggregate(0, 2.0), 0.0);
        model.set_override(3, 50.0);
        assert_eq!(model.aggregate(0, 2.0), 0.0);
    }

    #[test]
    fn aggregate_with_overrides() {
        let mut model = MeasureModel::new(20.0);
        model.set_override(3, 50.0);
        model.set_override(7, 10.0);
        let expected = 8.0 * 20.0 + 50.0 + 10.0 + 9.0 * 2.0;
        assert_eq!(model.aggregate(10, 2.0), expected);
    }

    #[test]
    fn aggregate_ignores_stale_overrides() {
        let mut model = MeasureModel::new(20.0);
        model.set_override(50, 500.0);
        // Override beyond count contributes nothing but stays recorded.
        assert_eq!(model.aggregate(10, 0.0), 200.0);
        assert_eq!(model.override_count(), 1);
        assert_eq!(model.effective(50), 500.0);
    }

    #[test]
    fn leading_edge_accumulates_preceding_strides() {
        let mut model = MeasureModel::new(20.0);
        assert_eq!(model.leading_edge(0, 2.0), 0.0);
        assert_eq!(model.leading_edge(3, 2.0), 3.0 * 20.0 + 3.0 * 2.0);

        model.set_override(1, 50.0);
        // Items 0 and 2 at 20, item 1 at 50, three gaps of 2.
        assert_eq!(model.leading_edge(3, 2.0), 20.0 + 50.0 + 20.0 + 6.0);
        // Overrides at or past the index do not contribute.
        model.set_override(10, 99.0);
        assert_eq!(model.leading_edge(3, 2.0), 20.0 + 50.0 + 20.0 + 6.0);
    }

    #[test]
    fn clear_override_reverts_to_default() {
        let mut model = MeasureModel::new(20.0);
        model.set_override(2, 40.0);
        assert!(model.clear_override(2));
        assert!(!model.clear_override(2));
        assert_eq!(model.effective(2), 20.0);
        assert!(!model.has_overrides());
    }

    #[test]
    fn negative_extents_clamp_to_zero() {
        let mut model = MeasureModel::new(-5.0);
        assert_eq!(model.default_extent(), 0.0);
        model.set_override(0, -3.0);
        assert_eq!(model.effective(0), 0.0);
    }
}
