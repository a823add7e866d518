//! Size streams for packing runs.

/// Rectangles with harmonically decreasing sides.
///
/// Yields `(1/i, 1/(i+1))` for `i = n0, n0 + 1, ...`, or the swapped pair
/// when `is_width_smaller` is set. The stream is infinite; bound it with
/// [`Iterator::take`] or a placer limit.
///
/// The areas telescope: all rectangles from `n0` on sum to `1/n0`, the area
/// of [`Self::base_size`].
#[derive(Debug, Clone)]
pub struct HarmonicRectangleGenerator {
    n0: u64,
    is_width_smaller: bool,
    next_index: u64,
}

impl HarmonicRectangleGenerator {
    /// Creates a generator starting at index `n0`.
    ///
    /// # Panics
    ///
    /// Panics if `n0` is zero.
    pub fn new(n0: u64, is_width_smaller: bool) -> Self {
        assert!(n0 >= 1, "n0 must be at least 1");
        Self {
            n0,
            is_width_smaller,
            next_index: n0,
        }
    }

    /// Index of the first rectangle.
    pub fn n0(&self) -> u64 {
        self.n0
    }

    /// Whether the shorter side comes first.
    pub fn is_width_smaller(&self) -> bool {
        self.is_width_smaller
    }

    /// Side lengths of the square sheet that holds the whole stream.
    pub fn base_size(&self) -> (f64, f64) {
        let side = (1.0 / self.n0 as f64).sqrt();
        (side, side)
    }

    /// The size of rectangle `index`.
    pub fn size_at(&self, index: u64) -> (f64, f64) {
        let longer = 1.0 / index as f64;
        let shorter = 1.0 / (index + 1) as f64;
        if self.is_width_smaller {
            (shorter, longer)
        } else {
            (longer, shorter)
        }
    }
}

impl Iterator for HarmonicRectangleGenerator {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        let size = self.size_at(self.next_index);
        self.next_index += 1;
        Some(size)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
