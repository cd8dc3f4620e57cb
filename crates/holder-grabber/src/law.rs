//! Closed-form laws for angle and height along a path.

/// A scalar function of path progress.
///
/// `progress` runs over `[0, 1]`; `index` is the sample index, used only by
/// [`Law::Stepped`] so per-step increments stay exact regardless of the
/// sample count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Law {
    /// The same value everywhere.
    Constant(f64),
    /// Linear from `start` at progress 0 to `end` at progress 1.
    Linear {
        /// Value at progress 0.
        start: f64,
        /// Value at progress 1.
        end: f64,
    },
    /// Symmetric power-law tent: `edge` at both ends, `peak` at the middle.
    ///
    /// `peak - |2p - 1|^exponent * (peak - edge)`. Exponents above 1 flatten
    /// the ends and sharpen the peak.
    Tent {
        /// Value at progress 0 and 1.
        edge: f64,
        /// Value at progress 0.5.
        peak: f64,
        /// Shape exponent, > 0.
        exponent: f64,
    },
    /// `start + step * index`.
    Stepped {
        /// Value at sample 0.
        start: f64,
        /// Increment per sample.
        step: f64,
    },
}

impl Law {
    /// Evaluate at `progress` (sample `index`).
    pub fn eval(&self, progress: f64, index: usize) -> f64 {
        match *self {
            Law::Constant(v) => v,
            Law::Linear { start, end } => start + (end - start) * progress,
            Law::Tent {
                edge,
                peak,
                exponent,
            } => peak - mid_distance(progress).powf(exponent) * (peak - edge),
            Law::Stepped { start, step } => start + step * index as f64,
        }
    }

    /// Value at the first sample.
    pub fn initial(&self) -> f64 {
        self.eval(0.0, 0)
    }
}

/// Normalized distance from the middle of the path: `|2p - 1|`.
pub fn mid_distance(progress: f64) -> f64 {
    (2.0 * progress - 1.0).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear() {
        let law = Law::Linear {
            start: 90.0,
            end: 270.0,
        };
        assert_relative_eq!(law.eval(0.0, 0), 90.0);
        assert_relative_eq!(law.eval(0.5, 7), 180.0);
        assert_relative_eq!(law.eval(1.0, 99), 270.0);
    }

    #[test]
    fn test_tent() {
        let law = Law::Tent {
            edge: 0.0,
            peak: 100.0,
            exponent: 1.25,
        };
        assert_relative_eq!(law.eval(0.0, 0), 0.0);
        assert_relative_eq!(law.eval(1.0, 0), 0.0);
        assert_relative_eq!(law.eval(0.5, 0), 100.0);
        assert_relative_eq!(law.eval(0.25, 0), law.eval(0.75, 0), epsilon = 1e-12);
        assert_relative_eq!(law.eval(0.25, 0), 100.0 - 0.5f64.powf(1.25) * 100.0);
    }

    #[test]
    fn test_stepped_ignores_progress() {
        let law = Law::Stepped {
            start: 48.6,
            step: -1.5,
        };
        assert_relative_eq!(law.initial(), 48.6);
        assert_relative_eq!(law.eval(0.9, 10), 33.6, epsilon = 1e-12);
    }

    #[test]
    fn test_mid_distance() {
        assert_relative_eq!(mid_distance(0.0), 1.0);
        assert_relative_eq!(mid_distance(0.5), 0.0);
        assert_relative_eq!(mid_distance(0.75), 0.5);
    }
}
