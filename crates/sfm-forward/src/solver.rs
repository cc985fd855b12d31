//! Explicit time stepping for the acoustic wave equation
//!
//! Second order in time, configurable even order in space. The wavefield
//! is damped towards zero inside the absorbing layer; the stencil halo
//! outside the layer stays at zero and acts as a rigid backstop.

use log::warn;
use ndarray::{Array2, Array3, ArrayView2, Ix2, Ix3};

use crate::error::{ForwardError, Result};
use crate::model::VelocityModel;
use crate::source::{Receiver, RickerSource};
use crate::time::TimeAxis;

/// Central-difference weights for the second derivative
///
/// Entry 0 is the centre weight, entry `k` the weight applied at offsets
/// `±k` grid points, for an even order of accuracy `space_order`.
pub(crate) fn stencil_weights(space_order: usize) -> Vec<f32> {
    let half = space_order / 2;
    let mut weights = vec![0.0_f32; half + 1];
    let mut centre = 0.0_f64;
    for k in 1..=half {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let numerator = 2.0 * factorial(half).powi(2);
        let denominator = (k * k) as f64 * factorial(half - k) * factorial(half + k);
        weights[k] = (sign * numerator / denominator) as f32;
        centre -= 2.0 / (k * k) as f64;
    }
    weights[0] = centre as f32;
    weights
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|v| v as f64).product()
}

/// Damping at normalized depth `pos` into the absorbing layer (1 at the
/// outer edge, approaching 0 at the inner edge)
fn damping_profile(pos: f32) -> f32 {
    use std::f32::consts::PI;
    let coeff = 1.5 * (1000.0_f32).ln() / 40.0;
    coeff * (pos - (2.0 * PI * pos).sin() / (2.0 * PI))
}

/// The grid cell enclosing an off-grid point, one entry per dimension
#[derive(Debug)]
struct GridPoint {
    idx: Vec<usize>,
    frac: Vec<f32>,
}

/// Map physical point coordinates onto the padded grid
fn locate(model: &VelocityModel, coordinates: ArrayView2<'_, f32>) -> Result<Vec<GridPoint>> {
    let pad = model.pad();
    let padded = model.padded_shape();
    let mut points = Vec::with_capacity(coordinates.nrows());
    for row in coordinates.rows() {
        let mut idx = Vec::with_capacity(row.len());
        let mut frac = Vec::with_capacity(row.len());
        for (d, &coordinate) in row.iter().enumerate() {
            let pos = (coordinate - model.origin()[d]) / model.spacing()[d] + pad as f32;
            let n = padded[d];
            if !pos.is_finite() || pos < 0.0 || pos > (n - 1) as f32 {
                let min = model.origin()[d] - pad as f32 * model.spacing()[d];
                let max = model.origin()[d] + (n - 1 - pad) as f32 * model.spacing()[d];
                return Err(ForwardError::out_of_grid(coordinate, d, min, max));
            }
            let mut i = pos.floor() as usize;
            let mut f = pos - i as f32;
            if i >= n - 1 {
                i = n - 2;
                f = 1.0;
            }
            idx.push(i);
            frac.push(f);
        }
        points.push(GridPoint { idx, frac });
    }
    Ok(points)
}

/// Run the solver for the model's dimensionality
pub(crate) fn solve(
    model: &VelocityModel,
    source: &RickerSource,
    receivers: &Receiver,
    time: &TimeAxis,
) -> Result<Array2<f32>> {
    let ndim = model.ndim();
    if source.coordinates().ncols() != ndim {
        return Err(ForwardError::shape_mismatch(
            vec![source.npoint(), ndim],
            vec![source.npoint(), source.coordinates().ncols()],
        ));
    }
    if receivers.coordinates().ncols() != ndim {
        return Err(ForwardError::shape_mismatch(
            vec![receivers.npoint(), ndim],
            vec![receivers.npoint(), receivers.coordinates().ncols()],
        ));
    }
    if time.step() > model.critical_dt() {
        warn!(
            "time step {} ms exceeds the stability limit {} ms; output may be unstable",
            time.step(),
            model.critical_dt()
        );
    }

    let src_points = locate(model, source.coordinates())?;
    let rec_points = locate(model, receivers.coordinates())?;

    match ndim {
        2 => propagate_2d(model, source, &src_points, &rec_points, time),
        3 => propagate_3d(model, source, &src_points, &rec_points, time),
        _ => Err(ForwardError::invalid_parameter(
            "shape",
            format!("{} dimensions", ndim),
            "2 or 3 dimensions",
        )),
    }
}

fn propagate_2d(
    model: &VelocityModel,
    source: &RickerSource,
    src_points: &[GridPoint],
    rec_points: &[GridPoint],
    time: &TimeAxis,
) -> Result<Array2<f32>> {
    let pad = model.pad();
    let halo = model.halo();
    let weights = stencil_weights(model.space_order());

    let vp = model
        .vp()
        .into_dimensionality::<Ix2>()
        .map_err(|_| ForwardError::shape_mismatch(model.shape().to_vec(), model.vp().shape().to_vec()))?;
    let (n0, n1) = vp.dim();
    let (p0, p1) = (n0 + 2 * pad, n1 + 2 * pad);

    // Slowness squared on the padded grid, velocity edge-replicated
    let m = Array2::from_shape_fn((p0, p1), |(i, j)| {
        let si = i.saturating_sub(pad).min(n0 - 1);
        let sj = j.saturating_sub(pad).min(n1 - 1);
        let v = vp[[si, sj]];
        1.0 / (v * v)
    });
    let damp = damping_mask_2d((p0, p1), model.spacing(), model.n_pml(), halo);

    let dt = time.step();
    let dt2 = dt * dt;
    let inv_h0 = 1.0 / (model.spacing()[0] * model.spacing()[0]);
    let inv_h1 = 1.0 / (model.spacing()[1] * model.spacing()[1]);

    let mut u_prev = Array2::<f32>::zeros((p0, p1));
    let mut u_cur = Array2::<f32>::zeros((p0, p1));
    let mut u_next = Array2::<f32>::zeros((p0, p1));

    let nt = time.num();
    let mut seismogram = Array2::<f32>::zeros((nt, rec_points.len()));

    for n in 0..nt {
        // Row n of the seismogram is the field at time sample n
        for (r, point) in rec_points.iter().enumerate() {
            seismogram[[n, r]] = sample_2d(&u_cur, point);
        }
        if n + 1 == nt {
            break;
        }

        for i in halo..p0 - halo {
            for j in halo..p1 - halo {
                let mut lap = weights[0] * u_cur[[i, j]] * (inv_h0 + inv_h1);
                for k in 1..=halo {
                    lap += weights[k]
                        * ((u_cur[[i - k, j]] + u_cur[[i + k, j]]) * inv_h0
                            + (u_cur[[i, j - k]] + u_cur[[i, j + k]]) * inv_h1);
                }
                let m_ij = m[[i, j]];
                let eta = damp[[i, j]];
                u_next[[i, j]] = (lap
                    + m_ij / dt2 * (2.0 * u_cur[[i, j]] - u_prev[[i, j]])
                    + eta / dt * u_cur[[i, j]])
                    / (m_ij / dt2 + eta / dt);
            }
        }

        let amplitude = source.wavelet()[n] * dt2;
        for point in src_points {
            inject_2d(&mut u_next, &m, point, amplitude);
        }

        // Rotate: cur becomes prev, next becomes cur
        std::mem::swap(&mut u_prev, &mut u_cur);
        std::mem::swap(&mut u_cur, &mut u_next);
    }

    Ok(seismogram)
}

fn propagate_3d(
    model: &VelocityModel,
    source: &RickerSource,
    src_points: &[GridPoint],
    rec_points: &[GridPoint],
    time: &TimeAxis,
) -> Result<Array2<f32>> {
    let pad = model.pad();
    let halo = model.halo();
    let weights = stencil_weights(model.space_order());

    let vp = model
        .vp()
        .into_dimensionality::<Ix3>()
        .map_err(|_| ForwardError::shape_mismatch(model.shape().to_vec(), model.vp().shape().to_vec()))?;
    let (n0, n1, n2) = vp.dim();
    let (p0, p1, p2) = (n0 + 2 * pad, n1 + 2 * pad, n2 + 2 * pad);

    let m = Array3::from_shape_fn((p0, p1, p2), |(i, j, l)| {
        let si = i.saturating_sub(pad).min(n0 - 1);
        let sj = j.saturating_sub(pad).min(n1 - 1);
        let sl = l.saturating_sub(pad).min(n2 - 1);
        let v = vp[[si, sj, sl]];
        1.0 / (v * v)
    });
    let damp = damping_mask_3d((p0, p1, p2), model.spacing(), model.n_pml(), halo);

    let dt = time.step();
    let dt2 = dt * dt;
    let inv_h0 = 1.0 / (model.spacing()[0] * model.spacing()[0]);
    let inv_h1 = 1.0 / (model.spacing()[1] * model.spacing()[1]);
    let inv_h2 = 1.0 / (model.spacing()[2] * model.spacing()[2]);

    let mut u_prev = Array3::<f32>::zeros((p0, p1, p2));
    let mut u_cur = Array3::<f32>::zeros((p0, p1, p2));
    let mut u_next = Array3::<f32>::zeros((p0, p1, p2));

    let nt = time.num();
    let mut seismogram = Array2::<f32>::zeros((nt, rec_points.len()));

    for n in 0..nt {
        for (r, point) in rec_points.iter().enumerate() {
            seismogram[[n, r]] = sample_3d(&u_cur, point);
        }
        if n + 1 == nt {
            break;
        }

        for i in halo..p0 - halo {
            for j in halo..p1 - halo {
                for l in halo..p2 - halo {
                    let mut lap = weights[0] * u_cur[[i, j, l]] * (inv_h0 + inv_h1 + inv_h2);
                    for k in 1..=halo {
                        lap += weights[k]
                            * ((u_cur[[i - k, j, l]] + u_cur[[i + k, j, l]]) * inv_h0
                                + (u_cur[[i, j - k, l]] + u_cur[[i, j + k, l]]) * inv_h1
                                + (u_cur[[i, j, l - k]] + u_cur[[i, j, l + k]]) * inv_h2);
                    }
                    let m_ijl = m[[i, j, l]];
                    let eta = damp[[i, j, l]];
                    u_next[[i, j, l]] = (lap
                        + m_ijl / dt2 * (2.0 * u_cur[[i, j, l]] - u_prev[[i, j, l]])
                        + eta / dt * u_cur[[i, j, l]])
                        / (m_ijl / dt2 + eta / dt);
                }
            }
        }

        let amplitude = source.wavelet()[n] * dt2;
        for point in src_points {
            inject_3d(&mut u_next, &m, point, amplitude);
        }

        std::mem::swap(&mut u_prev, &mut u_cur);
        std::mem::swap(&mut u_cur, &mut u_next);
    }

    Ok(seismogram)
}

fn damping_mask_2d(
    shape: (usize, usize),
    spacing: &[f32],
    n_pml: usize,
    halo: usize,
) -> Array2<f32> {
    let (p0, p1) = shape;
    let mut damp = Array2::<f32>::zeros(shape);
    for layer in 0..n_pml {
        let pos = (n_pml - layer) as f32 / n_pml as f32;
        let val0 = damping_profile(pos) / spacing[0];
        let val1 = damping_profile(pos) / spacing[1];
        let (lo0, hi0) = (halo + layer, p0 - 1 - halo - layer);
        let (lo1, hi1) = (halo + layer, p1 - 1 - halo - layer);
        for j in 0..p1 {
            damp[[lo0, j]] += val0;
            damp[[hi0, j]] += val0;
        }
        for i in 0..p0 {
            damp[[i, lo1]] += val1;
            damp[[i, hi1]] += val1;
        }
    }
    damp
}

fn damping_mask_3d(
    shape: (usize, usize, usize),
    spacing: &[f32],
    n_pml: usize,
    halo: usize,
) -> Array3<f32> {
    let (p0, p1, p2) = shape;
    let mut damp = Array3::<f32>::zeros(shape);
    for layer in 0..n_pml {
        let pos = (n_pml - layer) as f32 / n_pml as f32;
        let val0 = damping_profile(pos) / spacing[0];
        let val1 = damping_profile(pos) / spacing[1];
        let val2 = damping_profile(pos) / spacing[2];
        let (lo0, hi0) = (halo + layer, p0 - 1 - halo - layer);
        let (lo1, hi1) = (halo + layer, p1 - 1 - halo - layer);
        let (lo2, hi2) = (halo + layer, p2 - 1 - halo - layer);
        for j in 0..p1 {
            for l in 0..p2 {
                damp[[lo0, j, l]] += val0;
                damp[[hi0, j, l]] += val0;
            }
        }
        for i in 0..p0 {
            for l in 0..p2 {
                damp[[i, lo1, l]] += val1;
                damp[[i, hi1, l]] += val1;
            }
        }
        for i in 0..p0 {
            for j in 0..p1 {
                damp[[i, j, lo2]] += val2;
                damp[[i, j, hi2]] += val2;
            }
        }
    }
    damp
}

fn sample_2d(u: &Array2<f32>, point: &GridPoint) -> f32 {
    let (i, j) = (point.idx[0], point.idx[1]);
    let (fi, fj) = (point.frac[0], point.frac[1]);
    u[[i, j]] * (1.0 - fi) * (1.0 - fj)
        + u[[i, j + 1]] * (1.0 - fi) * fj
        + u[[i + 1, j]] * fi * (1.0 - fj)
        + u[[i + 1, j + 1]] * fi * fj
}

fn inject_2d(u: &mut Array2<f32>, m: &Array2<f32>, point: &GridPoint, amplitude: f32) {
    let (i, j) = (point.idx[0], point.idx[1]);
    let (fi, fj) = (point.frac[0], point.frac[1]);
    u[[i, j]] += amplitude * (1.0 - fi) * (1.0 - fj) / m[[i, j]];
    u[[i, j + 1]] += amplitude * (1.0 - fi) * fj / m[[i, j + 1]];
    u[[i + 1, j]] += amplitude * fi * (1.0 - fj) / m[[i + 1, j]];
    u[[i + 1, j + 1]] += amplitude * fi * fj / m[[i + 1, j + 1]];
}

fn sample_3d(u: &Array3<f32>, point: &GridPoint) -> f32 {
    let (i, j, l) = (point.idx[0], point.idx[1], point.idx[2]);
    let (fi, fj, fl) = (point.frac[0], point.frac[1], point.frac[2]);
    let mut value = 0.0;
    for corner in 0..8_usize {
        let (di, dj, dl) = (corner >> 2 & 1, corner >> 1 & 1, corner & 1);
        let weight = corner_weight(fi, di) * corner_weight(fj, dj) * corner_weight(fl, dl);
        value += u[[i + di, j + dj, l + dl]] * weight;
    }
    value
}

fn inject_3d(u: &mut Array3<f32>, m: &Array3<f32>, point: &GridPoint, amplitude: f32) {
    let (i, j, l) = (point.idx[0], point.idx[1], point.idx[2]);
    let (fi, fj, fl) = (point.frac[0], point.frac[1], point.frac[2]);
    for corner in 0..8_usize {
        let (di, dj, dl) = (corner >> 2 & 1, corner >> 1 & 1, corner & 1);
        let weight = corner_weight(fi, di) * corner_weight(fj, dj) * corner_weight(fl, dl);
        let target = [i + di, j + dj, l + dl];
        u[target] += amplitude * weight / m[target];
    }
}

fn corner_weight(frac: f32, offset: usize) -> f32 {
    if offset == 1 {
        frac
    } else {
        1.0 - frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::ArrayD;

    fn model_2d(shape: (usize, usize), vp: f32, space_order: usize, n_pml: usize) -> VelocityModel {
        let shape = vec![shape.0, shape.1];
        VelocityModel::new(
            vec![0.0; 2],
            vec![10.0; 2],
            shape.clone(),
            ArrayD::from_elem(shape, vp),
            space_order,
            n_pml,
        )
        .unwrap()
    }

    #[test]
    fn test_stencil_weights_second_order() {
        let weights = stencil_weights(2);
        assert_eq!(weights, vec![-2.0, 1.0]);
    }

    #[test]
    fn test_stencil_weights_fourth_order() {
        let weights = stencil_weights(4);
        assert!((weights[0] + 5.0 / 2.0).abs() < 1e-6);
        assert!((weights[1] - 4.0 / 3.0).abs() < 1e-6);
        assert!((weights[2] + 1.0 / 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_stencil_weights_annihilate_constants() {
        for space_order in [2, 4, 8, 16] {
            let weights = stencil_weights(space_order);
            let sum: f32 = weights[0] + 2.0 * weights[1..].iter().sum::<f32>();
            assert!(sum.abs() < 1e-5, "order {}: sum {}", space_order, sum);
        }
    }

    #[test]
    fn test_damping_mask_layout() {
        // Shape (20, 20), space order 2, 10 absorbing points: padded 42x42
        let damp = damping_mask_2d((42, 42), &[10.0, 10.0], 10, 1);

        // Physical interior has no damping
        for i in 11..31 {
            for j in 11..31 {
                assert_eq!(damp[[i, j]], 0.0);
            }
        }
        // Outermost absorbing cell is the strongest, corners add up
        assert!(damp[[1, 21]] > 0.0);
        assert!(damp[[1, 21]] > damp[[10, 21]]);
        assert!(damp[[1, 1]] > damp[[1, 21]]);
    }

    #[test]
    fn test_locate_maps_physical_coordinates() {
        let model = model_2d((20, 20), 1.5, 2, 10);
        let coords =
            ndarray::Array2::from_shape_vec((2, 2), vec![100.0, 0.0, 95.0, 0.0]).unwrap();
        let points = locate(&model, coords.view()).unwrap();

        // pad = 11, spacing = 10
        assert_eq!(points[0].idx, vec![21, 11]);
        assert_eq!(points[0].frac, vec![0.0, 0.0]);
        assert_eq!(points[1].idx, vec![20, 11]);
        assert!((points[1].frac[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_locate_rejects_out_of_grid_points() {
        let model = model_2d((20, 20), 1.5, 2, 10);
        let coords = ndarray::Array2::from_shape_vec((1, 2), vec![-200.0, 0.0]).unwrap();
        let err = locate(&model, coords.view()).unwrap_err();
        assert!(matches!(err, ForwardError::OutOfGrid { axis: 0, .. }));
    }

    #[test]
    fn test_solve_produces_finite_seismogram() {
        let model = model_2d((21, 21), 1.5, 2, 10);
        let time = TimeAxis::new(0.0, 300.0, 2.0).unwrap();
        let src_coords = ndarray::Array2::from_shape_vec((1, 2), vec![105.0, 0.0]).unwrap();
        let source = RickerSource::new(0.01, &time, src_coords).unwrap();
        let receivers = Receiver::new(
            ndarray::Array2::from_shape_vec((2, 2), vec![115.0, 0.0, 195.0, 0.0]).unwrap(),
        );

        let seismogram = model.solve(&source, &receivers, &time).unwrap();
        assert_eq!(seismogram.dim(), (151, 2));

        // Quiescent start, finite throughout, signal arrives eventually
        assert!(seismogram.row(0).iter().all(|&v| v == 0.0));
        assert!(seismogram.iter().all(|v| v.is_finite()));
        assert!(seismogram.iter().any(|&v| v.abs() > 1e-6));
    }

    #[test]
    fn test_nearer_receiver_peaks_first_and_stronger() {
        let model = model_2d((21, 21), 1.5, 2, 10);
        let time = TimeAxis::new(0.0, 300.0, 2.0).unwrap();
        let src_coords = ndarray::Array2::from_shape_vec((1, 2), vec![105.0, 0.0]).unwrap();
        let source = RickerSource::new(0.01, &time, src_coords).unwrap();
        let receivers = Receiver::new(
            ndarray::Array2::from_shape_vec((2, 2), vec![115.0, 0.0, 195.0, 0.0]).unwrap(),
        );

        let seismogram = model.solve(&source, &receivers, &time).unwrap();
        let peak_sample = |col: usize| -> (usize, f32) {
            let mut best = (0, 0.0_f32);
            for (i, &v) in seismogram.column(col).iter().enumerate() {
                if v.abs() > best.1 {
                    best = (i, v.abs());
                }
            }
            best
        };
        let (near_peak, near_amp) = peak_sample(0);
        let (far_peak, far_amp) = peak_sample(1);
        assert!(near_peak < far_peak);
        assert!(near_amp > far_amp);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let model = model_2d((15, 15), 2.0, 4, 5);
        let time = TimeAxis::new(0.0, 100.0, 1.0).unwrap();
        let src_coords = ndarray::Array2::from_shape_vec((1, 2), vec![75.0, 0.0]).unwrap();
        let source = RickerSource::new(0.02, &time, src_coords).unwrap();
        let receivers =
            Receiver::new(ndarray::Array2::from_shape_vec((1, 2), vec![40.0, 0.0]).unwrap());

        let first = model.solve(&source, &receivers, &time).unwrap();
        let second = model.solve(&source, &receivers, &time).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_solve_3d_smoke() {
        let shape = vec![12, 12, 12];
        let model = VelocityModel::new(
            vec![0.0; 3],
            vec![10.0; 3],
            shape.clone(),
            ArrayD::from_elem(shape, 1.5),
            2,
            5,
        )
        .unwrap();
        let time = TimeAxis::new(0.0, 150.0, 2.0).unwrap();
        let src_coords =
            ndarray::Array2::from_shape_vec((1, 3), vec![60.0, 60.0, 0.0]).unwrap();
        let source = RickerSource::new(0.01, &time, src_coords).unwrap();
        let receivers = Receiver::new(
            ndarray::Array2::from_shape_vec((2, 3), vec![40.0, 40.0, 0.0, 80.0, 80.0, 0.0])
                .unwrap(),
        );

        let seismogram = model.solve(&source, &receivers, &time).unwrap();
        assert_eq!(seismogram.dim(), (76, 2));
        assert!(seismogram.row(0).iter().all(|&v| v == 0.0));
        assert!(seismogram.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_solve_rejects_mismatched_coordinates() {
        let model = model_2d((20, 20), 1.5, 2, 10);
        let time = TimeAxis::new(0.0, 100.0, 2.0).unwrap();
        let src_coords =
            ndarray::Array2::from_shape_vec((1, 3), vec![100.0, 100.0, 0.0]).unwrap();
        let source = RickerSource::new(0.01, &time, src_coords).unwrap();
        let receivers =
            Receiver::new(ndarray::Array2::from_shape_vec((1, 2), vec![50.0, 0.0]).unwrap());

        let err = model.solve(&source, &receivers, &time).unwrap_err();
        assert!(matches!(err, ForwardError::ShapeMismatch { .. }));
    }
}
