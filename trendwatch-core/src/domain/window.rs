//! PriceWindow — fixed-capacity FIFO buffer of observed prices.

use std::collections::VecDeque;

/// Rolling view of the most recent prices, oldest first.
///
/// Pushing into a full window evicts the oldest price, so `len()` never
/// exceeds `capacity()` and never decreases. Indicators read the contents
/// through `snapshot()`, which preserves arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceWindow {
    capacity: usize,
    prices: VecDeque<f64>,
}

impl PriceWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "window capacity must be >= 1");
        Self {
            capacity,
            prices: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a price, evicting the oldest one if the window is full.
    pub fn push(&mut self, price: f64) {
        if self.prices.len() == self.capacity {
            self.prices.pop_front();
        }
        self.prices.push_back(price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// True once the window holds `capacity` prices. Monotonic: a full
    /// window stays full because every eviction pairs with an insert.
    pub fn is_full(&self) -> bool {
        self.prices.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate the contents in arrival order (oldest first) without copying.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.prices.iter().copied()
    }

    /// The current contents in arrival order (oldest first).
    pub fn snapshot(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// The most recently pushed price.
    pub fn latest(&self) -> Option<f64> {
        self.prices.back().copied()
    }
}
