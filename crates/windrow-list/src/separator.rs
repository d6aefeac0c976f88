#![forbid(unsafe_code)]

//! Divider management between visible items.
//!
//! A window of `k` visible items carries `k - 1` dividers, one straddling
//! each boundary. The track reuses its divider slots across window updates
//! and never shrinks its backing storage: when fewer dividers are needed,
//! the stale trailing slots are hidden rather than destroyed.

use windrow_core::{Orientation, Pos, Size};

/// One divider between two adjacent visible items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Separator {
    /// Top-left corner in content coordinates.
    pub pos: Pos,
    /// Extent: `thickness` along the main axis, the list's cross extent
    /// across.
    pub size: Size,
    /// Whether this slot is part of the current window. Hidden slots are
    /// retained storage, not content.
    pub visible: bool,
}

/// Reusable divider slots, rebuilt on every window update.
#[derive(Debug, Default)]
pub struct SeparatorTrack {
    slots: Vec<Separator>,
    used: usize,
}

impl SeparatorTrack {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a rebuild; every slot becomes reusable.
    pub fn begin(&mut self) {
        self.used = 0;
    }

    /// Place the next divider straddling the boundary before the item whose
    /// leading edge is `edge`: centred in the gap, accounting for its own
    /// thickness.
    pub fn place(
        &mut self,
        orientation: Orientation,
        edge: f32,
        spacing: f32,
        thickness: f32,
        cross: f32,
    ) {
        let main = edge - (spacing + thickness) / 2.0;
        let divider = Separator {
            pos: Pos::from_main_cross(orientation, main, 0.0),
            size: Size::from_main_cross(orientation, thickness, cross),
            visible: true,
        };
        if self.used < self.slots.len() {
            self.slots[self.used] = divider;
        } else {
            self.slots.push(divider);
        }
        self.used += 1;
    }

    /// Finish a rebuild: hide every slot not placed this round.
    pub fn finish(&mut self) {
        for slot in &mut self.slots[self.used..] {
            slot.visible = false;
        }
    }

    /// Dividers placed by the most recent rebuild, in order.
    pub fn placed(&self) -> impl Iterator<Item = &Separator> {
        self.slots[..self.used].iter()
    }

    /// Number of dividers placed by the most recent rebuild.
    #[inline]
    pub fn placed_count(&self) -> usize {
        self.used
    }

    /// Total slots ever allocated, hidden ones included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebuild(track: &mut SeparatorTrack, edges: &[f32]) {
        track.begin();
        for &edge in edges {
            track.place(Orientation::Vertical, edge, 4.0, 1.0, 120.0);
        }
        track.finish();
    }

    #[test]
    fn dividers_straddle_boundaries() {
        let mut track = SeparatorTrack::new();
        rebuild(&mut track, &[24.0, 48.0]);

        let placed: Vec<_> = track.placed().copied().collect();
        assert_eq!(placed.len(), 2);
        // Centred in the 4-wide gap before each edge: 24 - (4 + 1) / 2.
        assert_eq!(placed[0].pos, Pos::new(0.0, 21.5));
        assert_eq!(placed[0].size, Size::new(120.0, 1.0));
        assert!(placed[0].visible);
        assert_eq!(placed[1].pos.y, 45.5);
    }

    #[test]
    fn horizontal_dividers_swap_axes() {
        let mut track = SeparatorTrack::new();
        track.begin();
        track.place(Orientation::Horizontal, 30.0, 4.0, 1.0, 80.0);
        track.finish();

        let divider = track.placed().next().copied().unwrap();
        assert_eq!(divider.pos, Pos::new(27.5, 0.0));
        assert_eq!(divider.size, Size::new(1.0, 80.0));
    }

    #[test]
    fn storage_never_shrinks() {
        let mut track = SeparatorTrack::new();
        rebuild(&mut track, &[24.0, 48.0, 72.0, 96.0]);
        assert_eq!(track.placed_count(), 4);
        assert_eq!(track.capacity(), 4);

        rebuild(&mut track, &[24.0]);
        assert_eq!(track.placed_count(), 1);
        // The three stale slots stay allocated but hidden.
        assert_eq!(track.capacity(), 4);

        rebuild(&mut track, &[]);
        assert_eq!(track.placed_count(), 0);
        assert_eq!(track.capacity(), 4);
    }

    #[test]
    fn slots_are_reused_on_regrowth() {
        let mut track = SeparatorTrack::new();
        rebuild(&mut track, &[24.0, 48.0]);
        rebuild(&mut track, &[10.0, 20.0, 30.0]);
        assert_eq!(track.placed_count(), 3);
        assert_eq!(track.capacity(), 3);
        let edges: Vec<f32> = track.placed().map(|s| s.pos.y).collect();
        assert_eq!(edges, vec![7.5, 17.5, 27.5]);
    }
}
