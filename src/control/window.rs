//! Fixed-length sample history with a running mean.
//!
//! Backed by a `heapless::Deque`, so shift-append is O(1) and nothing is
//! heap-allocated.  The window is always exactly `N` long: it is born
//! full (every slot holding a baseline value) and each append evicts the
//! oldest sample.

use heapless::Deque;

/// Samples kept for humidity, temperature and water level.
pub const HISTORY_LEN: usize = 14;

/// The window length the controller uses.
pub type History = SlidingWindow<HISTORY_LEN>;

#[derive(Debug, Clone)]
pub struct SlidingWindow<const N: usize> {
    slots: Deque<f64, N>,
}

impl<const N: usize> SlidingWindow<N> {
    /// A window whose every slot holds `baseline`.
    pub fn filled(baseline: f64) -> Self {
        const { assert!(N > 0, "a sliding window needs at least one slot") };
        let mut w = Self {
            slots: Deque::new(),
        };
        w.fill_with(baseline);
        w
    }

    /// Overwrite every slot with `value`.
    pub fn fill_with(&mut self, value: f64) {
        self.slots.clear();
        for _ in 0..N {
            // Cannot fail: the deque was just cleared and has capacity N.
            let _ = self.slots.push_back(value);
        }
    }

    /// Drop the oldest sample and append `value` as the newest.
    pub fn shift_append(&mut self, value: f64) {
        self.slots.pop_front();
        let _ = self.slots.push_back(value);
    }

    /// Arithmetic mean over all `N` slots.
    pub fn average(&self) -> f64 {
        self.slots.iter().sum::<f64>() / N as f64
    }

    /// Most recently appended sample.
    pub fn latest(&self) -> f64 {
        self.slots.back().copied().unwrap_or_default()
    }

    /// Samples oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.slots.iter().copied()
    }

    /// Always `N`.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Never true.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
