//! Median filter over the most recent raw samples.
//!
//! Fixed-capacity ring buffer: no reallocation on the hot sampling path.
//! The median (not the mean) collapses the window so single-tick spikes
//! from electrical noise or a mechanical knock are rejected outright.

/// Ring buffer of the last N raw samples with median extraction.
///
/// While fewer than N samples have arrived, the median of what is
/// present is returned so readings are available immediately after
/// startup. Capacity 1 degenerates to pass-through, a valid mode for
/// demo and bring-up.
#[derive(Debug)]
pub struct MedianWindow {
    buf: Vec<i32>,
    head: usize,
    len: usize,
    scratch: Vec<i32>,
}

impl MedianWindow {
    /// `capacity` is clamped to at least 1; config validation rejects 0
    /// before it gets here.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = capacity.max(1);
        Self {
            buf: vec![0; cap],
            head: 0,
            len: 0,
            scratch: Vec::with_capacity(cap),
        }
    }

    /// Insert a sample, evicting the oldest once the window is full.
    pub fn push(&mut self, raw: i32) {
        let cap = self.buf.len();
        self.buf[self.head] = raw;
        self.head = (self.head + 1) % cap;
        if self.len < cap {
            self.len += 1;
        }
    }

    /// Median of the current contents, or `None` when empty.
    ///
    /// Even-length windows take the mean of the two middle values.
    pub fn median(&mut self) -> Option<f64> {
        if self.len == 0 {
            return None;
        }
        // Occupied slots are exactly buf[..len]: head wraps only after
        // the buffer fills.
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.buf[..self.len]);
        self.scratch.sort_unstable();
        let mid = self.len / 2;
        if self.len % 2 == 1 {
            Some(f64::from(self.scratch[mid]))
        } else {
            Some((f64::from(self.scratch[mid - 1]) + f64::from(self.scratch[mid])) / 2.0)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn filled(capacity: usize, samples: &[i32]) -> MedianWindow {
        let mut w = MedianWindow::new(capacity);
        for &s in samples {
            w.push(s);
        }
        w
    }

    #[rstest]
    #[case::spike_rejected(&[10, 12, 1000, 11, 9], 11.0)]
    #[case::partial_window_at_startup(&[10, 12], 11.0)]
    #[case::single_sample(&[42], 42.0)]
    #[case::even_count_averages_middles(&[10, 20, 30, 40], 25.0)]
    fn median_cases(#[case] samples: &[i32], #[case] expected: f64) {
        let mut w = filled(5, samples);
        assert_eq!(w.len(), samples.len());
        assert_eq!(w.median(), Some(expected));
    }

    #[test]
    fn empty_window_has_no_median() {
        let mut w = MedianWindow::new(5);
        assert_eq!(w.median(), None);
    }

    #[test]
    fn capacity_one_is_pass_through() {
        let mut w = MedianWindow::new(1);
        for v in [5, -3, 99] {
            w.push(v);
            assert_eq!(w.median(), Some(f64::from(v)));
        }
    }

    #[test]
    fn full_window_evicts_oldest() {
        let mut w = filled(3, &[1, 2, 3]);
        w.push(100); // evicts 1 -> contents {2, 3, 100}
        assert_eq!(w.median(), Some(3.0));
        w.push(100); // {3, 100, 100}
        w.push(100); // {100, 100, 100}
        assert_eq!(w.median(), Some(100.0));
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn negative_samples() {
        let mut w = filled(5, &[-10, -12, -1000, -11, -9]);
        assert_eq!(w.median(), Some(-11.0));
    }

    #[test]
    fn clear_resets_contents() {
        let mut w = filled(3, &[7, 8, 9]);
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.median(), None);
        w.push(4);
        assert_eq!(w.median(), Some(4.0));
    }
}
