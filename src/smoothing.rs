use std::collections::VecDeque;

/// Smoothing stage applied to the vertical component before the
/// local-maximum test. Output length must equal input length.
pub trait Smoother {
    fn smooth(&self, signal: &[f64], window: usize) -> Vec<f64>;
}

/// Trailing moving average over the last `window_size` samples
pub struct MeanSmoother {
    window: VecDeque<f64>,
    window_size: usize,
}

impl MeanSmoother {
    /// Create a new smoother with given window size
    pub fn new(window_size: usize) -> Self {
        MeanSmoother {
            window: VecDeque::with_capacity(window_size),
            window_size: window_size.max(1),
        }
    }

    /// Push a sample and return the mean of the current window.
    /// Until the window is full, averages over the samples seen so far.
    pub fn apply(&mut self, value: f64) -> f64 {
        self.window.push_back(value);

        while self.window.len() > self.window_size {
            self.window.pop_front();
        }

        // Depends only on the window contents, not on earlier samples.
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }
}

/// Batch mean filter. `window <= 1` returns the signal unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanFilter;

impl Smoother for MeanFilter {
    fn smooth(&self, signal: &[f64], window: usize) -> Vec<f64> {
        if window <= 1 {
            return signal.to_vec();
        }
        let mut smoother = MeanSmoother::new(window);
        signal.iter().map(|&v| smoother.apply(v)).collect()
    }
}

impl<F> Smoother for F
where
    F: Fn(&[f64], usize) -> Vec<f64>,
{
    fn smooth(&self, signal: &[f64], window: usize) -> Vec<f64> {
        self(signal, window)
    }
}
