#![forbid(unsafe_code)]

//! Fenwick tree (Binary Indexed Tree) over item strides.
//!
//! Backs the window planner's sub-linear path: entry `i` stores the stride
//! of item `i` (extent plus inter-item spacing), `prefix(i)` gives the
//! leading edge of item `i + 1`, and [`PrefixSums::find_prefix`] resolves a
//! scroll offset to an item index in O(log n).
//!
//! The tree is stored 1-indexed in a contiguous `Vec<f32>` of length
//! `n + 1` (index 0 unused) for cache-friendly sequential access.
//!
//! | Operation | Time |
//! |-----------|------|
//! | `from_values(v)` | O(n) |
//! | `set(i, v)` / `get(i)` | O(log n) |
//! | `prefix(i)` / `total()` | O(log n) |
//! | `find_prefix(target)` | O(log n) |

/// Prefix-sum index over non-negative `f32` strides.
#[derive(Debug, Clone, Default)]
pub struct PrefixSums {
    /// 1-indexed tree storage. `tree[0]` is unused.
    tree: Vec<f32>,
    /// Number of elements (not including index 0).
    n: usize,
}

impl PrefixSums {
    /// Create a tree of size `n` initialised to all zeros.
    pub fn new(n: usize) -> Self {
        Self {
            tree: vec![0.0; n + 1],
            n,
        }
    }

    /// Build a tree from initial values in O(n).
    ///
    /// Faster than `n` individual `set` calls, which would be O(n log n).
    pub fn from_values(values: &[f32]) -> Self {
        let n = values.len();
        let mut tree = vec![0.0f32; n + 1];

        for (i, &v) in values.iter().enumerate() {
            tree[i + 1] = v;
        }

        // Parent-propagation trick: each node folds into its parent once.
        for i in 1..=n {
            let parent = i + lowbit(i);
            if parent <= n {
                tree[parent] += tree[i];
            }
        }

        Self { tree, n }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the tree is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Value at position `i` (0-indexed), as `prefix(i) - prefix(i - 1)`.
    ///
    /// # Panics
    /// Panics if `i >= n`.
    pub fn get(&self, i: usize) -> f32 {
        if i == 0 {
            self.prefix(0)
        } else {
            self.prefix(i) - self.prefix(i - 1)
        }
    }

    /// Set the value at position `i` (0-indexed). O(log n).
    ///
    /// # Panics
    /// Panics if `i >= n`.
    pub fn set(&mut self, i: usize, value: f32) {
        assert!(i < self.n, "index {i} out of bounds (n={})", self.n);
        let delta = value - self.get(i);
        let mut idx = i + 1;
        while idx <= self.n {
            self.tree[idx] += delta;
            idx += lowbit(idx);
        }
    }

    /// Prefix sum of elements `[0..=i]` (0-indexed). O(log n).
    ///
    /// # Panics
    /// Panics if `i >= n`.
    pub fn prefix(&self, i: usize) -> f32 {
        assert!(i < self.n, "index {i} out of bounds (n={})", self.n);
        let mut sum = 0.0;
        let mut idx = i + 1;
        while idx > 0 {
            sum += self.tree[idx];
            idx -= lowbit(idx);
        }
        sum
    }

    /// Total sum of all elements. O(log n).
    pub fn total(&self) -> f32 {
        if self.n == 0 {
            0.0
        } else {
            self.prefix(self.n - 1)
        }
    }

    /// The largest index `i` with `prefix(i) <= target`, or `None` when even
    /// the first element exceeds `target`.
    ///
    /// This is the binary-search-by-offset primitive: with strides in the
    /// tree, `find_prefix(offset)` names the last item wholly above the
    /// scroll position. O(log n).
    pub fn find_prefix(&self, target: f32) -> Option<usize> {
        if self.n == 0 {
            return None;
        }

        let mut pos = 0usize;
        let mut remaining = target;
        let mut bit = most_significant_bit(self.n);

        while bit > 0 {
            let next = pos + bit;
            if next <= self.n && self.tree[next] <= remaining {
                remaining -= self.tree[next];
                pos = next;
            }
            bit >>= 1;
        }

        // pos counts elements whose running sum fits within target.
        if pos == 0 { None } else { Some(pos - 1) }
    }
}

/// Lowest set bit of `x`. E.g. `lowbit(6) = 2`, `lowbit(4) = 4`.
#[inline]
fn lowbit(x: usize) -> usize {
    x & x.wrapping_neg()
}

/// Largest power of two `<= x`. Requires `x > 0`.
#[inline]
fn most_significant_bit(x: usize) -> usize {
    1 << (usize::BITS - 1 - x.leading_zeros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_matches_naive_prefix() {
        let values = [22.0, 22.0, 52.0, 22.0, 7.0, 0.0, 13.5];
        let sums = PrefixSums::from_values(&values);
        let mut acc = 0.0;
        for (i, &v) in values.iter().enumerate() {
            acc += v;
            assert_eq!(sums.prefix(i), acc, "prefix({i})");
            assert_eq!(sums.get(i), v, "get({i})");
        }
        assert_eq!(sums.total(), acc);
    }

    #[test]
    fn set_updates_downstream_prefixes() {
        let mut sums = PrefixSums::from_values(&[10.0, 10.0, 10.0, 10.0]);
        sums.set(1, 25.0);
        assert_eq!(sums.get(1), 25.0);
        assert_eq!(sums.prefix(0), 10.0);
        assert_eq!(sums.prefix(1), 35.0);
        assert_eq!(sums.prefix(3), 55.0);
    }

    #[test]
    fn find_prefix_basic() {
        // Strides 22 each: prefix(i) = 22 * (i + 1).
        let sums = PrefixSums::from_values(&[22.0; 10]);
        assert_eq!(sums.find_prefix(0.0), None);
        assert_eq!(sums.find_prefix(21.9), None);
        assert_eq!(sums.find_prefix(22.0), Some(0));
        assert_eq!(sums.find_prefix(43.9), Some(0));
        assert_eq!(sums.find_prefix(44.0), Some(1));
        assert_eq!(sums.find_prefix(1000.0), Some(9));
    }

    #[test]
    fn find_prefix_variable_strides() {
        let sums = PrefixSums::from_values(&[5.0, 30.0, 5.0, 5.0]);
        assert_eq!(sums.find_prefix(4.9), None);
        assert_eq!(sums.find_prefix(5.0), Some(0));
        assert_eq!(sums.find_prefix(34.9), Some(0));
        assert_eq!(sums.find_prefix(35.0), Some(1));
        assert_eq!(sums.find_prefix(40.0), Some(2));
    }

    #[test]
    fn find_prefix_negative_target() {
        let sums = PrefixSums::from_values(&[1.0, 2.0]);
        assert_eq!(sums.find_prefix(-3.0), None);
    }

    #[test]
    fn empty_tree() {
        let sums = PrefixSums::new(0);
        assert!(sums.is_empty());
        assert_eq!(sums.total(), 0.0);
        assert_eq!(sums.find_prefix(10.0), None);
    }

    #[test]
    fn non_power_of_two_length() {
        let values: Vec<f32> = (0..37).map(|i| (i % 5) as f32 + 1.0).collect();
        let sums = PrefixSums::from_values(&values);
        let mut acc = 0.0;
        for (i, &v) in values.iter().enumerate() {
            acc += v;
            assert!((sums.prefix(i) - acc).abs() < 1e-3);
            // find_prefix at an exact boundary includes element i.
            assert_eq!(sums.find_prefix(acc), Some(i.min(values.len() - 1)));
        }
    }
}
