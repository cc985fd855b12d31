//! Roeth-Tarantola layered velocity models
//!
//! Realizations follow the randomized layered construction of Roeth &
//! Tarantola (1994): the grid is split into horizontal slabs along the
//! last (depth) axis, the shallowest layer velocity is drawn from an
//! initial range, and each deeper layer perturbs the previous one by a
//! uniform draw. Velocities are in km/s.

use ndarray::{ArrayD, Axis, Slice};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, VelocityError};

/// Generator for Roeth-Tarantola layered velocity realizations
///
/// Owns its RNG; the same seed and draw order always reproduce the same
/// sequence of realizations.
#[derive(Debug)]
pub struct RoethTarantolaGenerator {
    shape: Vec<usize>,
    n_layers: usize,
    initial_vp: (f32, f32),
    vp_perturbation: (f32, f32),
    rng: StdRng,
}

impl RoethTarantolaGenerator {
    /// Create a generator for realizations of the given shape
    ///
    /// `initial_vp` and `vp_perturbation` are inclusive `(min, max)`
    /// ranges in km/s; the perturbation range may be negative.
    pub fn new(
        shape: Vec<usize>,
        n_layers: usize,
        initial_vp: (f32, f32),
        vp_perturbation: (f32, f32),
        seed: u64,
    ) -> Result<Self> {
        if !(2..=3).contains(&shape.len()) {
            return Err(VelocityError::invalid_parameter(
                "shape",
                format!("{:?}", shape),
                "2 or 3 dimensions",
            ));
        }
        for (d, &n) in shape.iter().enumerate() {
            if n == 0 {
                return Err(VelocityError::invalid_parameter(
                    format!("shape[{}]", d),
                    "0",
                    ">= 1",
                ));
            }
        }
        if n_layers == 0 {
            return Err(VelocityError::invalid_parameter("n_layers", "0", ">= 1"));
        }
        if !(initial_vp.0 > 0.0) || initial_vp.1 < initial_vp.0 {
            return Err(VelocityError::invalid_parameter(
                "initial_vp",
                format!("{:?}", initial_vp),
                "0 < min <= max",
            ));
        }
        if vp_perturbation.1 < vp_perturbation.0 {
            return Err(VelocityError::invalid_parameter(
                "vp_perturbation",
                format!("{:?}", vp_perturbation),
                "min <= max",
            ));
        }
        Ok(Self {
            shape,
            n_layers,
            initial_vp,
            vp_perturbation,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Dimensions of generated realizations
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Generate the next realization
    pub fn generate(&mut self) -> ArrayD<f32> {
        let depth_axis = self.shape.len() - 1;
        let depth = self.shape[depth_axis];

        // Layer boundaries: evenly spaced over the depth axis, rounded
        // to grid indices
        let boundaries: Vec<usize> = (0..=self.n_layers)
            .map(|k| (k as f64 * depth as f64 / self.n_layers as f64).round() as usize)
            .collect();

        // Layer velocities: a random walk starting in the initial range
        let mut velocities = Vec::with_capacity(self.n_layers);
        let mut vp = self.rng.gen_range(self.initial_vp.0..=self.initial_vp.1);
        velocities.push(vp);
        for _ in 1..self.n_layers {
            vp += self
                .rng
                .gen_range(self.vp_perturbation.0..=self.vp_perturbation.1);
            velocities.push(vp);
        }

        let mut model = ArrayD::zeros(self.shape.clone());
        for (layer, window) in boundaries.windows(2).enumerate() {
            let (lo, hi) = (window[0], window[1]);
            if lo == hi {
                continue;
            }
            model
                .slice_axis_mut(Axis(depth_axis), Slice::from(lo..hi))
                .fill(velocities[layer]);
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(shape: Vec<usize>, seed: u64) -> RoethTarantolaGenerator {
        RoethTarantolaGenerator::new(shape, 8, (1.35, 1.65), (-0.19, 0.57), seed).unwrap()
    }

    #[test]
    fn test_same_seed_reproduces_realizations() {
        let mut first = generator(vec![30, 40], 42);
        let mut second = generator(vec![30, 40], 42);
        assert_eq!(first.generate(), second.generate());
        assert_eq!(first.generate(), second.generate());
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut first = generator(vec![30, 40], 42);
        let mut second = generator(vec![30, 40], 43);
        assert_ne!(first.generate(), second.generate());
    }

    #[test]
    fn test_layers_are_horizontal() {
        let mut generator = generator(vec![6, 50], 7);
        let model = generator.generate();
        assert_eq!(model.shape(), &[6, 50]);

        // Velocity depends only on depth, so all rows are identical
        let reference = model.index_axis(Axis(0), 0);
        for i in 1..6 {
            assert_eq!(model.index_axis(Axis(0), i), reference);
        }
    }

    #[test]
    fn test_layer_count_bounded() {
        let mut generator =
            RoethTarantolaGenerator::new(vec![4, 60], 5, (1.35, 1.65), (-0.19, 0.57), 1).unwrap();
        let model = generator.generate();

        let mut distinct = 0;
        let mut last = f32::NAN;
        for &v in model.index_axis(Axis(0), 0).iter() {
            if v != last {
                distinct += 1;
                last = v;
            }
        }
        assert!(distinct <= 5);
        assert!(distinct >= 2);
    }

    #[test]
    fn test_first_layer_in_initial_range() {
        for seed in 0..20 {
            let mut generator = generator(vec![10, 64], seed);
            let model = generator.generate();
            let surface = model[[0, 0]];
            assert!((1.35..=1.65).contains(&surface));
        }
    }

    #[test]
    fn test_three_dimensional_models() {
        let mut generator = generator(vec![6, 7, 40], 42);
        let model = generator.generate();
        assert_eq!(model.shape(), &[6, 7, 40]);

        // Constant across both horizontal axes
        let reference = model
            .index_axis(Axis(0), 0)
            .index_axis(Axis(0), 0)
            .to_owned();
        for i in 0..6 {
            for j in 0..7 {
                assert_eq!(
                    model.index_axis(Axis(0), i).index_axis(Axis(0), j),
                    reference
                );
            }
        }
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(RoethTarantolaGenerator::new(vec![30], 8, (1.35, 1.65), (-0.19, 0.57), 42).is_err());
        assert!(RoethTarantolaGenerator::new(vec![30, 40], 0, (1.35, 1.65), (-0.19, 0.57), 42).is_err());
        assert!(RoethTarantolaGenerator::new(vec![30, 40], 8, (0.0, 1.65), (-0.19, 0.57), 42).is_err());
        assert!(RoethTarantolaGenerator::new(vec![30, 40], 8, (1.65, 1.35), (-0.19, 0.57), 42).is_err());
        assert!(RoethTarantolaGenerator::new(vec![30, 40], 8, (1.35, 1.65), (0.57, -0.19), 42).is_err());
    }
}
