// Cumulative and windowed averages, each owned by exactly one task
use super::Reading;

pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// One averaging step: take a sample, return the updated average.
pub trait RunningAverage: Send {
    fn push(&mut self, x: Reading) -> Reading;
}

/// Lifetime mean of every sample pushed.
#[derive(Debug, Default, Clone)]
pub struct SimpleAverage {
    sum: f64,
    count: u64,
}

impl SimpleAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: Reading) -> Reading {
        self.sum += x as f64;
        self.count += 1;
        (self.sum / self.count as f64) as Reading
    }

    pub fn mean(&self) -> Option<Reading> {
        (self.count > 0).then(|| (self.sum / self.count as f64) as Reading)
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Mean over the most recent `window_size` samples, kept in a circular
/// buffer with a running sum so each push is O(1).
///
/// Invariant: `sum` equals the sum of the first `filled` slots written, and
/// `filled <= window.len()`.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: Box<[Reading]>,
    sum: f64,
    cursor: usize,
    filled: usize,
}

impl MovingAverage {
    /// A zero window is widened to one sample.
    pub fn new(window_size: usize) -> Self {
        Self {
            window: vec![0.0; window_size.max(1)].into_boxed_slice(),
            sum: 0.0,
            cursor: 0,
            filled: 0,
        }
    }

    pub fn push(&mut self, x: Reading) -> Reading {
        // Unfilled slots hold 0.0, so eviction is a no-op until the window wraps.
        self.sum -= self.window[self.cursor] as f64;
        self.window[self.cursor] = x;
        self.sum += x as f64;
        self.cursor = (self.cursor + 1) % self.window.len();
        if self.filled < self.window.len() {
            self.filled += 1;
        }
        (self.sum / self.filled as f64) as Reading
    }

    pub fn mean(&self) -> Option<Reading> {
        (self.filled > 0).then(|| (self.sum / self.filled as f64) as Reading)
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn window_size(&self) -> usize {
        self.window.len()
    }
}

impl RunningAverage for SimpleAverage {
    fn push(&mut self, x: Reading) -> Reading {
        SimpleAverage::push(self, x)
    }
}

impl RunningAverage for MovingAverage {
    fn push(&mut self, x: Reading) -> Reading {
        MovingAverage::push(self, x)
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
