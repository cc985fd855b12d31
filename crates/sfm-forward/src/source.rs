//! Point sources and receivers

use std::f32::consts::PI;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, ArrayViewMut2};

use crate::error::{ForwardError, Result};
use crate::time::TimeAxis;

/// A point source emitting a Ricker wavelet
///
/// The wavelet is centred at `t0 = 1/f0` so it ramps up from (near) zero
/// at the start of the axis, and is precomputed over the whole time axis
/// at construction.
#[derive(Debug, Clone)]
pub struct RickerSource {
    f0: f32,
    t0: f32,
    coordinates: Array2<f32>,
    wavelet: Array1<f32>,
}

impl RickerSource {
    /// Create a Ricker source with peak frequency `f0` (kHz)
    ///
    /// Coordinates hold one row of physical coordinates per source point.
    pub fn new(f0: f32, time: &TimeAxis, coordinates: Array2<f32>) -> Result<Self> {
        if !(f0 > 0.0) {
            return Err(ForwardError::invalid_parameter("f0", f0.to_string(), "> 0"));
        }
        if coordinates.nrows() == 0 {
            return Err(ForwardError::invalid_parameter(
                "coordinates",
                "0 points",
                ">= 1 source point",
            ));
        }
        let t0 = 1.0 / f0;
        let wavelet = Array1::from_iter(time.values().into_iter().map(|t| ricker(f0, t - t0)));
        Ok(Self {
            f0,
            t0,
            coordinates,
            wavelet,
        })
    }

    /// Peak frequency (kHz)
    pub fn f0(&self) -> f32 {
        self.f0
    }

    /// Wavelet centre time (ms)
    pub fn t0(&self) -> f32 {
        self.t0
    }

    /// Number of source points
    pub fn npoint(&self) -> usize {
        self.coordinates.nrows()
    }

    /// Source point coordinates, one row per point
    pub fn coordinates(&self) -> ArrayView2<'_, f32> {
        self.coordinates.view()
    }

    /// Mutable source point coordinates
    pub fn coordinates_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.coordinates.view_mut()
    }

    /// Precomputed wavelet samples over the time axis
    pub fn wavelet(&self) -> ArrayView1<'_, f32> {
        self.wavelet.view()
    }
}

/// Ricker wavelet value at offset `tau` from the centre time
fn ricker(f0: f32, tau: f32) -> f32 {
    let arg = (PI * f0 * tau).powi(2);
    (1.0 - 2.0 * arg) * (-arg).exp()
}

/// A set of receiver points sampling the wavefield
///
/// Seismograms are the solver's return value; receivers only carry the
/// sampling coordinates.
#[derive(Debug, Clone)]
pub struct Receiver {
    coordinates: Array2<f32>,
}

impl Receiver {
    /// Create receivers from physical coordinates, one row per point
    pub fn new(coordinates: Array2<f32>) -> Self {
        Self { coordinates }
    }

    /// Number of receiver points
    pub fn npoint(&self) -> usize {
        self.coordinates.nrows()
    }

    /// Receiver point coordinates, one row per point
    pub fn coordinates(&self) -> ArrayView2<'_, f32> {
        self.coordinates.view()
    }

    /// Mutable receiver point coordinates
    pub fn coordinates_mut(&mut self) -> ArrayViewMut2<'_, f32> {
        self.coordinates.view_mut()
    }
}
