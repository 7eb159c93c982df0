//! Line buffer and zero-padded window view for the streaming stages.
//!
//! A stage with kernel size K keeps the most recent K rows of its input
//! stream. After consuming the sample at linear position `n` the window
//! centered on position `n − (K/2·W + K/2)` is complete, so the stage can
//! emit one output per input once that latency has passed. Window taps are
//! masked by the raster bounds and read 0 outside, which also keeps the
//! garbage warm-up samples of upstream tails out of every valid output.
//!
//! The row ring only holds K rows, so the raster must be at least K pixels
//! wide; [`crate::config::CannyParams::validate`] enforces that.

/// Ring of the most recent `kernel` input rows.
pub struct LineBuffer<T> {
    width: usize,
    kernel: usize,
    rows: Vec<Vec<T>>,
}

impl<T: Copy + Default> LineBuffer<T> {
    pub fn new(width: usize, kernel: usize) -> Self {
        Self {
            width,
            kernel,
            rows: (0..kernel).map(|_| vec![T::default(); width]).collect(),
        }
    }

    /// Store the sample at linear stream position `n`.
    #[inline]
    pub fn store(&mut self, n: usize, value: T) {
        let row = (n / self.width) % self.kernel;
        self.rows[row][n % self.width] = value;
    }

    /// Window centered on raster position (`cy`, `cx`).
    ///
    /// Only valid once every in-bounds tap of the window has been stored,
    /// i.e. once position `(cy + K/2)·W + cx + K/2` has been consumed.
    #[inline]
    pub fn window(&self, cy: usize, cx: usize, height: usize) -> Window<'_, T> {
        Window {
            buffer: self,
            cy: cy as isize,
            cx: cx as isize,
            height: height as isize,
        }
    }
}

/// Zero-padded view of one kernel window.
pub struct Window<'a, T> {
    buffer: &'a LineBuffer<T>,
    cy: isize,
    cx: isize,
    height: isize,
}

impl<T: Copy + Default> Window<'_, T> {
    /// Tap at offset (`dy`, `dx`) from the center, zero outside the raster.
    #[inline]
    pub fn at(&self, dy: isize, dx: isize) -> T {
        let y = self.cy + dy;
        let x = self.cx + dx;
        if y < 0 || x < 0 || y >= self.height || x >= self.buffer.width as isize {
            return T::default();
        }
        self.buffer.rows[(y as usize) % self.buffer.kernel][x as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_reads_back_stored_samples() {
        // 4×4 raster streamed into a 3-row buffer, up to the last tap the
        // window at (1, 1) needs; further samples would recycle row 0.
        let mut buf = LineBuffer::<u8>::new(4, 3);
        for n in 0..=10usize {
            buf.store(n, n as u8);
        }
        let win = buf.window(1, 1, 4);
        assert_eq!(win.at(-1, -1), 0);
        assert_eq!(win.at(0, 0), 5);
        assert_eq!(win.at(1, 1), 10);
    }

    #[test]
    fn taps_outside_the_raster_are_zero() {
        let mut buf = LineBuffer::<u8>::new(4, 3);
        for n in 0..16usize {
            buf.store(n, 200);
        }
        let win = buf.window(0, 0, 4);
        assert_eq!(win.at(-1, 0), 0);
        assert_eq!(win.at(0, -1), 0);
        assert_eq!(win.at(0, 0), 200);

        let win = buf.window(3, 3, 4);
        assert_eq!(win.at(1, 0), 0);
        assert_eq!(win.at(0, 1), 0);
    }

    #[test]
    fn ring_recycles_rows_without_corrupting_the_window() {
        // Stream two extra rows past a 3-row window and check the oldest
        // needed row is still intact where the window reads it.
        let width = 8usize;
        let mut buf = LineBuffer::<u16>::new(width, 3);
        for n in 0..width * 5 {
            buf.store(n, n as u16);
        }
        // Center (3, 4): rows 2..=4 are the last three complete rows.
        let win = buf.window(3, 4, 5);
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                let pos = (3 + dy) as usize * width + (4 + dx) as usize;
                assert_eq!(win.at(dy, dx), pos as u16);
            }
        }
    }
}
