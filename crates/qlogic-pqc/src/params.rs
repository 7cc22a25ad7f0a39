//! Trainable parameter tensors.
//!
//! A tensor has shape `[num_blocks, 2, k]`: one row of `k` angles per wire
//! per block. Angles are stored per wire in the order `[θ, φ, λ, α, β]`; the
//! plain ansatz uses only the first three.

use std::f64::consts::PI;

use ndarray::{Array3, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{PqcError, PqcResult};
use crate::gates::NUM_INPUTS;

/// Index of θ (first RY) within a wire row.
pub const THETA: usize = 0;
/// Index of φ (RZ).
pub const PHI: usize = 1;
/// Index of λ (second RY).
pub const LAMBDA: usize = 2;
/// Index of α (RX for angle encoding, bit-0 re-upload otherwise).
pub const ALPHA: usize = 3;
/// Index of β (RZ for angle encoding, bit-1 re-upload otherwise).
pub const BETA: usize = 4;

/// Parameter tensor of a circuit model.
pub type ParameterTensor = Array3<f64>;

/// Per-block slice of a [`ParameterTensor`], shape `[2, k]`.
pub type BlockParams<'a> = ArrayView2<'a, f64>;

/// Draw a tensor of shape `[num_blocks, 2, params_per_wire]` uniformly from `[-π, π)`.
pub fn init_params(num_blocks: usize, params_per_wire: usize, seed: u64) -> ParameterTensor {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_simple_fn((num_blocks, NUM_INPUTS, params_per_wire), || {
        rng.gen_range(-PI..PI)
    })
}

/// Fail with [`PqcError::ParameterShape`] unless `params` has the expected shape.
pub fn check_shape(params: &ParameterTensor, expected: [usize; 3]) -> PqcResult<()> {
    if params.shape() != expected {
        return Err(PqcError::ParameterShape {
            expected,
            got: params.shape().to_vec(),
        });
    }
    Ok(())
}

/// Round every entry to `decimals` places, for logging.
pub fn rounded(params: &ParameterTensor, decimals: i32) -> ParameterTensor {
    let factor = 10f64.powi(decimals);
    params.mapv(|v| (v * factor).round() / factor)
}
