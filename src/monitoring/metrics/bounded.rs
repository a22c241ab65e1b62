//! FIFO capping for metric series

use std::collections::VecDeque;

/// Samples kept per series before the oldest is evicted
pub const MAX_METRIC_SAMPLES: usize = 1_000;

pub(super) trait BoundedPush<T> {
    fn push_bounded(&mut self, value: T, max_size: usize);
}

impl<T> BoundedPush<T> for VecDeque<T> {
    fn push_bounded(&mut self, value: T, max_size: usize) {
        if self.len() >= max_size {
            self.pop_front();
        }
        self.push_back(value);
    }
}
