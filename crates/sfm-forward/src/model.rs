//! Velocity models on regular grids

use ndarray::{Array2, ArrayD, ArrayViewD};

use crate::error::{ForwardError, Result};
use crate::solver;
use crate::source::{Receiver, RickerSource};
use crate::time::TimeAxis;

/// Courant factor for 2-D grids
const CFL_2D: f32 = 0.42;
/// Courant factor for 3-D grids
const CFL_3D: f32 = 0.38;

/// A P-wave velocity model on a regular grid
///
/// Holds the physical grid geometry (origin, spacing, shape) and the
/// velocity field in km/s. The solver runs on a grid padded on every
/// side by the absorbing layer plus the stencil halo.
#[derive(Debug, Clone)]
pub struct VelocityModel {
    origin: Vec<f32>,
    spacing: Vec<f32>,
    shape: Vec<usize>,
    space_order: usize,
    n_pml: usize,
    vp: ArrayD<f32>,
}

impl VelocityModel {
    /// Create a model, validating grid geometry and the velocity field
    pub fn new(
        origin: Vec<f32>,
        spacing: Vec<f32>,
        shape: Vec<usize>,
        vp: ArrayD<f32>,
        space_order: usize,
        n_pml: usize,
    ) -> Result<Self> {
        let ndim = shape.len();
        if !(2..=3).contains(&ndim) {
            return Err(ForwardError::invalid_parameter(
                "shape",
                format!("{:?}", shape),
                "2 or 3 dimensions",
            ));
        }
        if origin.len() != ndim {
            return Err(ForwardError::invalid_parameter(
                "origin",
                format!("{:?}", origin),
                format!("{} entries", ndim),
            ));
        }
        if spacing.len() != ndim {
            return Err(ForwardError::invalid_parameter(
                "spacing",
                format!("{:?}", spacing),
                format!("{} entries", ndim),
            ));
        }
        for (d, &n) in shape.iter().enumerate() {
            if n < 2 {
                return Err(ForwardError::invalid_parameter(
                    format!("shape[{}]", d),
                    n.to_string(),
                    ">= 2",
                ));
            }
        }
        for (d, &h) in spacing.iter().enumerate() {
            if !(h > 0.0) {
                return Err(ForwardError::invalid_parameter(
                    format!("spacing[{}]", d),
                    h.to_string(),
                    "> 0",
                ));
            }
        }
        if space_order % 2 != 0 || !(2..=16).contains(&space_order) {
            return Err(ForwardError::invalid_parameter(
                "space_order",
                space_order.to_string(),
                "even, within 2..=16",
            ));
        }
        Self::check_vp(&shape, &vp)?;
        Ok(Self {
            origin,
            spacing,
            shape,
            space_order,
            n_pml,
            vp,
        })
    }

    fn check_vp(shape: &[usize], vp: &ArrayD<f32>) -> Result<()> {
        if vp.shape() != shape {
            return Err(ForwardError::shape_mismatch(
                shape.to_vec(),
                vp.shape().to_vec(),
            ));
        }
        if !vp.iter().all(|&v| v.is_finite() && v > 0.0) {
            return Err(ForwardError::invalid_parameter(
                "vp",
                "non-positive or non-finite entries",
                "finite, > 0",
            ));
        }
        Ok(())
    }

    /// Number of grid dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Grid points per dimension
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Grid spacing per dimension (m)
    pub fn spacing(&self) -> &[f32] {
        &self.spacing
    }

    /// Physical coordinate of the first grid point per dimension (m)
    pub fn origin(&self) -> &[f32] {
        &self.origin
    }

    /// Order of accuracy of the spatial stencil
    pub fn space_order(&self) -> usize {
        self.space_order
    }

    /// Width of the absorbing layer in grid points
    pub fn n_pml(&self) -> usize {
        self.n_pml
    }

    /// Velocity field (km/s)
    pub fn vp(&self) -> ArrayViewD<'_, f32> {
        self.vp.view()
    }

    /// Physical extent of the model per dimension (shape × spacing, in m)
    pub fn domain_size(&self) -> Vec<f32> {
        self.shape
            .iter()
            .zip(&self.spacing)
            .map(|(&n, &h)| n as f32 * h)
            .collect()
    }

    /// Replace the velocity field, keeping the grid
    pub fn set_vp(&mut self, vp: ArrayD<f32>) -> Result<()> {
        Self::check_vp(&self.shape, &vp)?;
        self.vp = vp;
        Ok(())
    }

    /// Largest stable time step for the explicit scheme (ms)
    pub fn critical_dt(&self) -> f32 {
        let coeff = if self.ndim() == 3 { CFL_3D } else { CFL_2D };
        let min_spacing = self.spacing.iter().copied().fold(f32::INFINITY, f32::min);
        let max_vp = self.vp.iter().copied().fold(0.0_f32, f32::max);
        coeff * min_spacing / max_vp
    }

    /// Run the acoustic solver and return `nt × npoint` seismograms
    pub fn solve(
        &self,
        source: &RickerSource,
        receivers: &Receiver,
        time: &TimeAxis,
    ) -> Result<Array2<f32>> {
        solver::solve(self, source, receivers, time)
    }

    // Padding applied to every side of the solver grid: absorbing layer
    // plus the stencil halo.
    pub(crate) fn pad(&self) -> usize {
        self.n_pml + self.space_order / 2
    }

    pub(crate) fn halo(&self) -> usize {
        self.space_order / 2
    }

    pub(crate) fn padded_shape(&self) -> Vec<usize> {
        self.shape.iter().map(|&n| n + 2 * self.pad()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    fn uniform_vp(shape: &[usize], vp: f32) -> ArrayD<f32> {
        ArrayD::from_elem(shape.to_vec(), vp)
    }

    fn model_2d() -> VelocityModel {
        let shape = vec![20, 20];
        VelocityModel::new(
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            shape.clone(),
            uniform_vp(&shape, 1.5),
            2,
            10,
        )
        .unwrap()
    }

    #[test]
    fn test_domain_size() {
        let model = model_2d();
        assert_eq!(model.domain_size(), vec![200.0, 200.0]);
        assert_eq!(model.ndim(), 2);
    }

    #[test]
    fn test_critical_dt() {
        let model = model_2d();
        let expected = 0.42 * 10.0 / 1.5;
        assert!((model.critical_dt() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_padded_shape() {
        let model = model_2d();
        // 10 absorbing points plus a halo of 1 on each side
        assert_eq!(model.pad(), 11);
        assert_eq!(model.padded_shape(), vec![42, 42]);
    }

    #[test]
    fn test_set_vp_checks_shape() {
        let mut model = model_2d();
        assert!(model.set_vp(uniform_vp(&[20, 20], 2.0)).is_ok());
        let err = model.set_vp(uniform_vp(&[20, 30], 2.0)).unwrap_err();
        assert!(matches!(err, ForwardError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_rejects_bad_geometry() {
        let shape = vec![20, 20];
        let vp = uniform_vp(&shape, 1.5);

        // 1-D grids are not supported
        assert!(VelocityModel::new(
            vec![0.0],
            vec![10.0],
            vec![20],
            uniform_vp(&[20], 1.5),
            2,
            10
        )
        .is_err());

        // Odd space order
        assert!(VelocityModel::new(
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            shape.clone(),
            vp.clone(),
            3,
            10
        )
        .is_err());

        // Non-positive spacing
        assert!(VelocityModel::new(
            vec![0.0, 0.0],
            vec![10.0, 0.0],
            shape.clone(),
            vp.clone(),
            2,
            10
        )
        .is_err());

        // Non-positive velocity
        assert!(VelocityModel::new(
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            shape.clone(),
            uniform_vp(&shape, 0.0),
            2,
            10
        )
        .is_err());
    }
}
