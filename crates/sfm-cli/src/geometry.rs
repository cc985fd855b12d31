//! Acquisition geometry: source and receiver placement
//!
//! Coordinates are physical, in m, with the depth axis last. The last
//! coordinate of every point is 0 (the surface); domain extents come
//! from the model (shape × spacing).

use ndarray::Array2;

/// One point source at the horizontal centre of the domain, on the surface
pub fn source_position(domain_size: &[f32]) -> Array2<f32> {
    let ndim = domain_size.len();
    let mut coords = Array2::zeros((1, ndim));
    for d in 0..ndim - 1 {
        coords[[0, d]] = domain_size[d] * 0.5;
    }
    coords
}

/// Receivers on a regular surface grid
///
/// Each horizontal dimension carries the `n` interior samples of an
/// `(n + 2)`-point inclusive linspace over its extent, so the grid spans
/// the domain without touching either edge. Points are laid out
/// row-major across the horizontal dimensions.
pub fn receiver_grid(domain_size: &[f32], n: usize) -> Array2<f32> {
    let ndim = domain_size.len();
    let horizontal = ndim - 1;
    let npoint = n.pow(horizontal as u32);

    let axes: Vec<Vec<f32>> = (0..horizontal)
        .map(|d| {
            let step = domain_size[d] / (n + 1) as f32;
            (1..=n).map(|i| i as f32 * step).collect()
        })
        .collect();

    let mut coords = Array2::zeros((npoint, ndim));
    for p in 0..npoint {
        let mut rem = p;
        for d in (0..horizontal).rev() {
            coords[[p, d]] = axes[d][rem % n];
            rem /= n;
        }
    }
    coords
}
