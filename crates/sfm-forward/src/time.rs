//! Discretized simulation time axis

use crate::error::{ForwardError, Result};

/// A uniformly sampled time axis
///
/// The sample count is chosen so the axis covers `[start, stop]`; `stop`
/// is then re-derived from the count so the axis always ends exactly on
/// a sample (it may overshoot the requested stop by less than one step).
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    start: f32,
    step: f32,
    stop: f32,
    num: usize,
}

impl TimeAxis {
    /// Create a time axis from start and stop times and a step, all in ms
    pub fn new(start: f32, stop: f32, step: f32) -> Result<Self> {
        if !(step > 0.0) {
            return Err(ForwardError::invalid_parameter(
                "step",
                step.to_string(),
                "> 0",
            ));
        }
        if !(stop > start) {
            return Err(ForwardError::invalid_parameter(
                "stop",
                stop.to_string(),
                format!("> start ({})", start),
            ));
        }
        let num = ((f64::from(stop) - f64::from(start) + f64::from(step)) / f64::from(step)).ceil()
            as usize;
        let stop = start + step * (num - 1) as f32;
        Ok(Self {
            start,
            step,
            stop,
            num,
        })
    }

    /// Number of samples
    pub fn num(&self) -> usize {
        self.num
    }

    /// Step between samples (ms)
    pub fn step(&self) -> f32 {
        self.step
    }

    /// First sample time (ms)
    pub fn start(&self) -> f32 {
        self.start
    }

    /// Last sample time (ms)
    pub fn stop(&self) -> f32 {
        self.stop
    }

    /// Time of sample `i` (ms)
    pub fn at(&self, i: usize) -> f32 {
        self.start + self.step * i as f32
    }

    /// All sample times (ms)
    pub fn values(&self) -> Vec<f32> {
        (0..self.num).map(|i| self.at(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_axis() {
        let time = TimeAxis::new(0.0, 1000.0, 2.0).unwrap();
        assert_eq!(time.num(), 501);
        assert_eq!(time.stop(), 1000.0);
        assert_eq!(time.at(0), 0.0);
        assert_eq!(time.at(500), 1000.0);
        assert_eq!(time.values().len(), 501);
    }

    #[test]
    fn test_non_divisible_axis_overshoots() {
        let time = TimeAxis::new(0.0, 10.0, 3.0).unwrap();
        assert_eq!(time.num(), 5);
        assert_eq!(time.stop(), 12.0);
    }

    #[test]
    fn test_invalid_step() {
        assert!(TimeAxis::new(0.0, 10.0, 0.0).is_err());
        assert!(TimeAxis::new(0.0, 10.0, -1.0).is_err());
        assert!(TimeAxis::new(0.0, 10.0, f32::NAN).is_err());
    }

    #[test]
    fn test_invalid_range() {
        assert!(TimeAxis::new(10.0, 10.0, 1.0).is_err());
        assert!(TimeAxis::new(10.0, 5.0, 1.0).is_err());
    }
}
