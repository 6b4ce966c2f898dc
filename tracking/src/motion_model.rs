//! Constant-velocity motion model over the 7-dimensional bounding box
//! state `[cx, cy, s, r, vx, vy, vs]`.
//!
//! Generalized from `ConstantVelocity2DModel` (previously
//! `motion_model_2d.rs`, state `[x, y, xvel, yvel]`): the transition
//! matrix is still identity plus a unit-time velocity coupling, just on
//! the first three state components instead of two — aspect ratio `r` is
//! assumed quasi-static and carries no velocity term, per spec.md §4.D.

use nalgebra::allocator::Allocator;
use nalgebra::core::dimension::U7;
use nalgebra::core::MatrixN;
use nalgebra::{DefaultAllocator, OMatrix, RealField};

use adskalman::TransitionModelLinearNoControl;

/// Constant-velocity model for `[cx, cy, s, r, vx, vy, vs]` with `dt = 1`
/// (one tracker tick per video frame; spec.md does not call for a
/// variable-dt model).
#[derive(Debug)]
pub struct ConstantVelocityBoxModel<R: RealField>
where
    DefaultAllocator: Allocator<R, U7, U7>,
    DefaultAllocator: Allocator<R, U7>,
{
    transition_model: MatrixN<R, U7>,
    transition_model_transpose: MatrixN<R, U7>,
    transition_noise_covariance: MatrixN<R, U7>,
}

impl<R: RealField> ConstantVelocityBoxModel<R>
where
    DefaultAllocator: Allocator<R, U7, U7>,
    DefaultAllocator: Allocator<R, U7>,
{
    /// `process_noise_scale` is the process noise `Q`'s overall scale;
    /// spec.md §4.D calls for "small (~0.01I)".
    pub fn new(process_noise_scale: R) -> Self {
        use num_traits::{One, Zero};
        let zero: R = Zero::zero();
        let one: R = One::one();

        // nalgebra's componentwise `::new(...)` constructor only exists up
        // to 6x6; a 7x7 matrix has to be built from a slice instead (the
        // teacher's `ConstantVelocity3DModel::calc_for_dt`, U6, does the
        // same with `from_row_slice`).
        #[rustfmt::skip]
        let transition_model = OMatrix::<R, U7, U7>::from_row_slice(&[
            one,  zero, zero, zero,  one, zero, zero,
            zero,  one, zero, zero, zero,  one, zero,
            zero, zero,  one, zero, zero, zero,  one,
            zero, zero, zero,  one, zero, zero, zero,
            zero, zero, zero, zero,  one, zero, zero,
            zero, zero, zero, zero, zero,  one, zero,
            zero, zero, zero, zero, zero, zero,  one,
        ]);
        let transition_model_transpose = transition_model.transpose();

        let transition_noise_covariance =
            MatrixN::<R, U7>::identity() * process_noise_scale;

        Self {
            transition_model,
            transition_model_transpose,
            transition_noise_covariance,
        }
    }
}

impl<R: RealField> TransitionModelLinearNoControl<R, U7> for ConstantVelocityBoxModel<R>
where
    DefaultAllocator: Allocator<R, U7, U7>,
    DefaultAllocator: Allocator<R, U7>,
{
    fn F(&self) -> &MatrixN<R, U7> {
        &self.transition_model
    }
    fn FT(&self) -> &MatrixN<R, U7> {
        &self.transition_model_transpose
    }
    fn Q(&self) -> &MatrixN<R, U7> {
        &self.transition_noise_covariance
    }
}
